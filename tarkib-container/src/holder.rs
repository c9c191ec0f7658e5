//! Instance holders: a registration plus the instances it produced.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::container::Container;
use crate::error::Result;
use crate::key::TypeKey;
use crate::lifetime::Lifetime;
use crate::registration::{Registration, RegistrationBase};

/// A registration that holds the instances generated from it.
///
/// Holders are created lazily by the lifetime dispatcher and live in the
/// store the lifetime selects. The holder keeps a strong reference to
/// every distinct instance, so a cached lifetime keeps returning its first
/// instance whatever callers do with theirs. Dropping the holder gives up
/// those references: owned instances are released, instances of a
/// non-owning registration live on with whoever else shares them.
pub(crate) struct InstanceHolder<T: ?Sized, A> {
    registration: Registration<T, A>,
    instances: Mutex<Vec<Arc<T>>>,
}

impl<T, A> InstanceHolder<T, A>
where
    T: ?Sized + Send + Sync + 'static,
    A: 'static,
{
    pub fn new(registration: Registration<T, A>) -> Self {
        Self {
            registration,
            instances: Mutex::new(Vec::new()),
        }
    }

    /// Builds a new instance and records it.
    pub fn generate(&self, scope: &Container<'_>, args: A) -> Result<Arc<T>> {
        let mut instances = self.instances.lock();
        self.generate_into(&mut instances, scope, args)
    }

    /// Returns the first instance, generating one if there is none.
    ///
    /// The holder's lock is held while the factory runs, so concurrent
    /// callers never build a second instance.
    pub fn get_or_generate(&self, scope: &Container<'_>, args: A) -> Result<Arc<T>> {
        let mut instances = self.instances.lock();

        if let Some(existing) = instances.first() {
            trace!(key = %self.registration.key, "Reusing cached instance");
            return Ok(Arc::clone(existing));
        }

        self.generate_into(&mut instances, scope, args)
    }

    fn generate_into(
        &self,
        instances: &mut Vec<Arc<T>>,
        scope: &Container<'_>,
        args: A,
    ) -> Result<Arc<T>> {
        let instance = (self.registration.factory)(scope, args)?;

        if instances.iter().any(|known| Arc::ptr_eq(known, &instance)) {
            trace!(key = %self.registration.key, "Factory returned a known instance");
        } else {
            instances.push(Arc::clone(&instance));
            trace!(
                key = %self.registration.key,
                count = instances.len(),
                "Generated instance"
            );
        }

        Ok(instance)
    }
}

impl<T, A> RegistrationBase for InstanceHolder<T, A>
where
    T: ?Sized + Send + Sync + 'static,
    A: 'static,
{
    fn key(&self) -> TypeKey {
        self.registration.key
    }

    fn lifetime(&self) -> Lifetime {
        self.registration.lifetime
    }

    fn owns_instances(&self) -> bool {
        self.registration.owns_instances
    }

    fn instance_count(&self) -> usize {
        self.instances.lock().len()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl<T: ?Sized, A> Drop for InstanceHolder<T, A> {
    fn drop(&mut self) {
        let instances = self.instances.get_mut();
        if instances.is_empty() {
            return;
        }
        if self.registration.owns_instances {
            trace!(
                key = %self.registration.key,
                released = instances.len(),
                "Releasing owned instances"
            );
        } else {
            trace!(
                key = %self.registration.key,
                shared = instances.len(),
                "Handing instances back to their owners"
            );
        }
        instances.clear();
    }
}

impl<T: ?Sized, A> fmt::Debug for InstanceHolder<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceHolder")
            .field("registration", &self.registration)
            .field("instances", &self.instances.lock().len())
            .finish()
    }
}
