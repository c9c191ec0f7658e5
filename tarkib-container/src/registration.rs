//! Registration records and the fluent registration handle.
//!
//! A [`Registration`] describes how to build one abstraction. Records of
//! every abstraction and argument type live side by side in one map, so
//! they are stored behind the non-generic [`RegistrationBase`] trait and
//! downcast back at the point of use.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::container::Container;
use crate::error::{Result, TarkibError};
use crate::key::TypeKey;
use crate::lifetime::Lifetime;

/// Type alias for stored factory functions.
///
/// A factory receives the *resolving* container (to resolve its own
/// dependencies) and the arguments passed to
/// [`Container::resolve_with`], and returns a shared instance.
///
/// # Why `Arc`?
/// The same factory is shared by a record, every copy of it filed under
/// another key, and every instance holder created from it.
pub type Factory<T, A> = Arc<dyn Fn(&Container<'_>, A) -> Result<Arc<T>> + Send + Sync>;

/// Minimal non-generic view of a registration or instance holder.
pub(crate) trait RegistrationBase: Send + Sync {
    fn key(&self) -> TypeKey;

    fn lifetime(&self) -> Lifetime;

    fn owns_instances(&self) -> bool;

    /// Live instances held; always 0 for a bare registration.
    fn instance_count(&self) -> usize;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

pub(crate) type ErasedRecord = Arc<dyn RegistrationBase>;

/// Key-indexed store of erased records, used for registrations as well as
/// for the global and per-scope instance tables.
pub(crate) type RecordMap = DashMap<TypeKey, ErasedRecord>;

/// Recovers the concrete record type behind an erased one.
///
/// # Errors
/// [`TarkibError::TypeMismatch`] if the record was built for another
/// abstraction or argument type.
pub(crate) fn downcast_record<R: Any + Send + Sync>(record: ErasedRecord) -> Result<Arc<R>> {
    let key = record.key();
    record
        .into_any()
        .downcast::<R>()
        .map_err(|_| TarkibError::TypeMismatch {
            key,
            expected: type_name::<R>(),
        })
}

/// Registration entry for a single abstraction.
pub(crate) struct Registration<T: ?Sized, A> {
    pub key: TypeKey,
    pub factory: Factory<T, A>,
    pub owns_instances: bool,
    pub lifetime: Lifetime,
}

impl<T: ?Sized, A> Registration<T, A> {
    pub fn new(key: TypeKey, factory: Factory<T, A>, owns_instances: bool) -> Self {
        Self {
            key,
            factory,
            owns_instances,
            lifetime: Lifetime::default(),
        }
    }
}

impl<T: ?Sized, A> Clone for Registration<T, A> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            factory: Arc::clone(&self.factory),
            owns_instances: self.owns_instances,
            lifetime: self.lifetime,
        }
    }
}

impl<T: ?Sized, A> fmt::Debug for Registration<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("key", &self.key)
            .field("lifetime", &self.lifetime)
            .field("owns_instances", &self.owns_instances)
            .finish()
    }
}

impl<T, A> RegistrationBase for Registration<T, A>
where
    T: ?Sized + Send + Sync + 'static,
    A: 'static,
{
    fn key(&self) -> TypeKey {
        self.key
    }

    fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    fn owns_instances(&self) -> bool {
        self.owns_instances
    }

    fn instance_count(&self) -> usize {
        0
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Handle returned by [`Container::register`].
///
/// Nothing is stored until a lifetime is picked. Picking one files the
/// record in the container the handle came from, under the handle's
/// current key.
///
/// ```
/// use std::sync::Arc;
/// use tarkib_container::prelude::*;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// #[derive(Default)]
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".into()
///     }
/// }
///
/// let container = Container::new();
/// container
///     .register_default::<English>()?
///     .as_interface::<dyn Greeter>(|english| english)
///     .global_singleton();
///
/// let greeter: Arc<dyn Greeter> = container.resolve()?;
/// assert_eq!(greeter.greet(), "hello");
/// # Ok::<(), TarkibError>(())
/// ```
#[must_use = "a registration is only stored once a lifetime is chosen"]
pub struct RegistrationBuilder<'c, 'p, T: ?Sized, A> {
    container: &'c Container<'p>,
    registration: Registration<T, A>,
}

impl<'c, 'p, T, A> RegistrationBuilder<'c, 'p, T, A>
where
    T: ?Sized + Send + Sync + 'static,
    A: 'static,
{
    pub(crate) fn new(container: &'c Container<'p>, registration: Registration<T, A>) -> Self {
        Self {
            container,
            registration,
        }
    }

    /// The key the record will be filed under.
    pub fn key(&self) -> TypeKey {
        self.registration.key
    }

    /// Sets whether the container owns the instances it generates.
    ///
    /// Either way a cached lifetime keeps returning its first instance.
    /// Owned instances are released with the store holding them, and
    /// every per-request instance is kept until its container is dropped.
    /// Unowned instances are treated as shared with an outside owner: the
    /// container drops its references on teardown without releasing them,
    /// and does not retain per-request instances at all.
    pub fn with_ownership(mut self, owns_instances: bool) -> Self {
        self.registration.owns_instances = owns_instances;
        self
    }

    /// Returns a handle filing a copy of this registration under
    /// abstraction `I`.
    ///
    /// `cast` converts the built instance, usually through an unsizing
    /// coercion such as `|db| db` for `Arc<Postgres> -> Arc<dyn Database>`.
    /// This handle is left untouched, so one implementation can be filed
    /// under several interfaces.
    ///
    /// ```
    /// use tarkib_container::prelude::*;
    ///
    /// trait Reader: Send + Sync {}
    /// trait Writer: Send + Sync {}
    ///
    /// #[derive(Default)]
    /// struct File;
    /// impl Reader for File {}
    /// impl Writer for File {}
    ///
    /// let container = Container::new();
    /// let file = container.register_default::<File>()?;
    /// file.as_interface::<dyn Reader>(|f| f).instance_per_scope();
    /// file.as_interface::<dyn Writer>(|f| f).instance_per_scope();
    ///
    /// assert!(container.can_resolve::<dyn Reader>());
    /// assert!(container.can_resolve::<dyn Writer>());
    /// assert!(!container.is_registered::<File>());
    /// # Ok::<(), TarkibError>(())
    /// ```
    pub fn as_interface<I>(&self, cast: fn(Arc<T>) -> Arc<I>) -> RegistrationBuilder<'c, 'p, I, A>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let interface = TypeKey::of::<I>();
        debug!(from = %self.registration.key, to = %interface, "Registering as interface");

        let inner = Arc::clone(&self.registration.factory);
        let factory: Factory<I, A> =
            Arc::new(move |scope: &Container<'_>, args: A| inner(scope, args).map(cast));

        RegistrationBuilder {
            container: self.container,
            registration: Registration {
                key: interface,
                factory,
                owns_instances: self.registration.owns_instances,
                lifetime: self.registration.lifetime,
            },
        }
    }

    /// One instance for the root container and all of its scopes.
    pub fn global_singleton(self) {
        self.with_lifetime(Lifetime::GlobalSingleton)
    }

    /// One instance per resolving container.
    pub fn instance_per_scope(self) {
        self.with_lifetime(Lifetime::PerScope)
    }

    /// A new instance on every resolve.
    pub fn instance_per_request(self) {
        self.with_lifetime(Lifetime::PerRequest)
    }

    /// Files the registration with the given lifetime, replacing any
    /// record already filed under the same key in this container.
    pub fn with_lifetime(self, lifetime: Lifetime) {
        let mut registration = self.registration;
        registration.lifetime = lifetime;
        self.container.store_registration(Arc::new(registration));
    }
}

impl<T: ?Sized, A> fmt::Debug for RegistrationBuilder<'_, '_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationBuilder")
            .field("registration", &self.registration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Database;

    fn record(key: TypeKey) -> ErasedRecord {
        let factory: Factory<i32, ()> = Arc::new(|_: &Container<'_>, ()| Ok(Arc::new(42)));
        Arc::new(Registration::new(key, factory, true))
    }

    #[test]
    fn new_registration_defaults_to_per_request() {
        let erased = record(TypeKey::of::<Database>());
        assert_eq!(erased.lifetime(), Lifetime::PerRequest);
        assert_eq!(erased.instance_count(), 0);
        assert!(erased.owns_instances());
    }

    #[test]
    fn downcast_to_matching_type() {
        let erased = record(TypeKey::of::<i32>());
        let typed = downcast_record::<Registration<i32, ()>>(erased).unwrap();
        assert_eq!(typed.key, TypeKey::of::<i32>());
    }

    #[test]
    fn downcast_with_wrong_arguments_fails() {
        let erased = record(TypeKey::of::<i32>());
        match downcast_record::<Registration<i32, (u8,)>>(erased) {
            Err(TarkibError::TypeMismatch { key, .. }) => assert_eq!(key, TypeKey::of::<i32>()),
            other => panic!("Expected TypeMismatch, got: {other:?}"),
        }
    }

    #[test]
    fn handle_stores_only_on_lifetime_call() {
        let container = Container::new();
        let handle = container.register_default::<u64>().unwrap();
        assert!(!container.is_registered::<u64>());

        handle.instance_per_scope();
        assert!(container.is_registered::<u64>());
    }

    #[test]
    fn as_interface_changes_key_only() {
        trait Named: Send + Sync {}
        #[derive(Default)]
        struct Thing;
        impl Named for Thing {}

        let container = Container::new();
        let original = container
            .register_default::<Thing>()
            .unwrap()
            .with_ownership(false);
        let handle = original.as_interface::<dyn Named>(|thing| thing);

        assert_eq!(handle.key(), TypeKey::of::<dyn Named>());
        assert!(!handle.registration.owns_instances);
        assert_eq!(original.key(), TypeKey::of::<Thing>());
        handle.global_singleton();

        assert!(container.is_registered::<dyn Named>());
        assert!(!container.is_registered::<Thing>());
    }

    #[test]
    fn one_implementation_under_two_interfaces() {
        trait Reader: Send + Sync {
            fn read(&self) -> u8;
        }
        trait Writer: Send + Sync {
            fn written(&self) -> u8;
        }
        #[derive(Default)]
        struct Buffer;
        impl Reader for Buffer {
            fn read(&self) -> u8 {
                1
            }
        }
        impl Writer for Buffer {
            fn written(&self) -> u8 {
                2
            }
        }

        let container = Container::new();
        let buffer = container.register_default::<Buffer>().unwrap();
        buffer.as_interface::<dyn Reader>(|b| b).global_singleton();
        buffer.as_interface::<dyn Writer>(|b| b).instance_per_scope();
        buffer.instance_per_request();

        assert_eq!(container.resolve::<dyn Reader>().unwrap().read(), 1);
        assert_eq!(container.resolve::<dyn Writer>().unwrap().written(), 2);
        assert!(container.resolve::<Buffer>().is_ok());
        assert_eq!(container.registered_keys().len(), 3);
    }
}
