//! Lifetime dispatch: which store to use, and whether to reuse or create.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::container::Container;
use crate::error::Result;
use crate::holder::InstanceHolder;
use crate::lifetime::Lifetime;
use crate::registration::{ErasedRecord, RecordMap, Registration, downcast_record};

/// The stores a single resolve call may touch.
///
/// `global` always belongs to the root container, `scope` and `requests`
/// to the container the resolve was called on.
pub(crate) struct Stores<'s> {
    pub global: &'s RecordMap,
    pub scope: &'s RecordMap,
    pub requests: &'s Mutex<Vec<ErasedRecord>>,
}

impl<T, A> Registration<T, A>
where
    T: ?Sized + Send + Sync + 'static,
    A: 'static,
{
    /// Returns an instance satisfying this record's lifetime.
    pub(crate) fn try_get_instance(
        &self,
        scope: &Container<'_>,
        stores: Stores<'_>,
        args: A,
    ) -> Result<Arc<T>> {
        match self.lifetime {
            Lifetime::GlobalSingleton => self.cached_instance(stores.global, scope, args),
            Lifetime::PerScope => self.cached_instance(stores.scope, scope, args),
            Lifetime::PerRequest => self.request_instance(stores.requests, scope, args),
        }
    }

    fn cached_instance(&self, store: &RecordMap, scope: &Container<'_>, args: A) -> Result<Arc<T>> {
        // insert-if-absent is atomic, the shard lock is released before the
        // factory runs
        let record = store
            .entry(self.key)
            .or_insert_with(|| {
                trace!(key = %self.key, lifetime = %self.lifetime, "Creating instance holder");
                Arc::new(InstanceHolder::new(self.clone())) as ErasedRecord
            })
            .value()
            .clone();

        let holder = downcast_record::<InstanceHolder<T, A>>(record)?;
        holder.get_or_generate(scope, args)
    }

    fn request_instance(
        &self,
        requests: &Mutex<Vec<ErasedRecord>>,
        scope: &Container<'_>,
        args: A,
    ) -> Result<Arc<T>> {
        let holder = Arc::new(InstanceHolder::new(self.clone()));
        let instance = holder.generate(scope, args)?;

        // unowned per-request instances belong to the caller alone
        if self.owns_instances {
            requests.lock().push(holder);
        }

        Ok(instance)
    }
}
