//! # The Container — heart of Tarkib
//!
//! A tree of containers that resolve registered abstractions and manage
//! the lifetime of what they build.
//!
//! # Architecture
//! ```text
//! ContainerBuilder ──build()──> root Container ─── global singletons
//!                                     │
//!                                new_scope()
//!                                     │
//!                                     ▼
//!                              child Container ─── per-scope instances
//!                                     │            per-request instances
//!                                new_scope()
//!                                     ▼
//!                                    ...
//! ```
//!
//! A child borrows its parent, so the borrow checker guarantees that a
//! parent outlives every scope created from it.
//!
//! # Examples
//! ```rust
//! use std::sync::Arc;
//! use tarkib_container::prelude::*;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, msg: &str);
//! }
//!
//! #[derive(Default)]
//! struct ConsoleLogger;
//!
//! impl Logger for ConsoleLogger {
//!     fn log(&self, msg: &str) { println!("{msg}"); }
//! }
//!
//! struct Connection {
//!     logger: Arc<dyn Logger>,
//! }
//!
//! let root = Container::new();
//! root.register_default::<ConsoleLogger>()?
//!     .as_interface::<dyn Logger>(|logger| logger)
//!     .global_singleton();
//! root.register(|scope: &Container<'_>, ()| {
//!     Ok(Connection { logger: scope.resolve()? })
//! })?
//! .instance_per_scope();
//!
//! let request = root.new_scope();
//! let a: Arc<Connection> = request.resolve()?;
//! let b: Arc<Connection> = request.resolve()?;
//! assert!(Arc::ptr_eq(&a, &b));
//! a.logger.log("connected");
//! # Ok::<(), TarkibError>(())
//! ```

use std::fmt;
use std::iter;
use std::sync::Arc;

use parking_lot::Mutex;
use tarkib_support::rendering::suggest_similar;
use tracing::{debug, info, instrument, trace};

use crate::dispatch::Stores;
use crate::error::{AlreadyRegisteredError, NotRegisteredError, Result, TarkibError};
use crate::key::TypeKey;
use crate::module::Module;
use crate::registration::{
    ErasedRecord, Factory, RecordMap, Registration, RegistrationBuilder, downcast_record,
};

// ═══════════════════════════════════════════
// Settings & ContainerBuilder
// ═══════════════════════════════════════════

/// Behaviour switches shared by a root container and all of its scopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSettings {
    /// Let `register` replace an existing registration in the same
    /// container instead of failing with `AlreadyRegistered`.
    pub allow_override: bool,
    /// Default ownership flag for new registrations.
    pub owns_instances: bool,
    /// Maximum number of "did you mean" suggestions in errors.
    pub max_suggestions: usize,
}

impl Default for ContainerSettings {
    fn default() -> Self {
        Self {
            allow_override: false,
            owns_instances: true,
            max_suggestions: 3,
        }
    }
}

/// Configures and builds a root [`Container`].
///
/// # Examples
/// ```rust
/// use tarkib_container::prelude::*;
///
/// let root = Container::builder()
///     .allow_override(true)
///     .max_suggestions(5)
///     .build();
/// assert!(root.settings().allow_override);
/// ```
#[derive(Debug, Default)]
pub struct ContainerBuilder {
    settings: ContainerSettings,
}

impl ContainerBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Allow re-registering an abstraction in the same container.
    pub fn allow_override(mut self, allow: bool) -> Self {
        self.settings.allow_override = allow;
        self
    }

    /// Default ownership of generated instances.
    pub fn owns_instances(mut self, owns: bool) -> Self {
        self.settings.owns_instances = owns;
        self
    }

    /// Cap on "did you mean" suggestions.
    pub fn max_suggestions(mut self, max: usize) -> Self {
        self.settings.max_suggestions = max;
        self
    }

    /// Build the root container.
    pub fn build(self) -> Container<'static> {
        debug!(settings = ?self.settings, "Building root container");
        Container::root_with(Arc::new(self.settings))
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// Where a container sits in the tree. Only the root owns the global
/// singleton table.
enum Position<'p> {
    Root { global_singletons: RecordMap },
    Child { parent: &'p Container<'p> },
}

/// A dependency injection container: the root of a tree, or a scope in it.
///
/// Created by [`Container::new`], [`ContainerBuilder::build`] or
/// [`Container::new_scope`].
pub struct Container<'p> {
    registrations: RecordMap,
    scope_instances: RecordMap,
    request_instances: Mutex<Vec<ErasedRecord>>,
    position: Position<'p>,
    settings: Arc<ContainerSettings>,
    depth: usize,
}

impl Container<'static> {
    /// Create a root container with default settings.
    pub fn new() -> Self {
        Self::root_with(Arc::default())
    }

    /// Create a builder for a configured root container.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    fn root_with(settings: Arc<ContainerSettings>) -> Self {
        Container {
            registrations: RecordMap::new(),
            scope_instances: RecordMap::new(),
            request_instances: Mutex::new(Vec::new()),
            position: Position::Root {
                global_singletons: RecordMap::new(),
            },
            settings,
            depth: 0,
        }
    }
}

impl Default for Container<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p> Container<'p> {
    // ── Registration ──

    /// Register a factory for `T`.
    ///
    /// The factory receives the resolving container and the arguments
    /// given to [`resolve_with`](Container::resolve_with) (`()` for
    /// [`resolve`](Container::resolve)). Nothing is stored until a
    /// lifetime is picked on the returned handle.
    ///
    /// # Errors
    /// [`TarkibError::AlreadyRegistered`] if `T` is already registered in
    /// *this* container. Registrations in parent containers are not
    /// consulted, so a scope may shadow them.
    pub fn register<T, A, F>(&self, factory: F) -> Result<RegistrationBuilder<'_, 'p, T, A>>
    where
        T: Send + Sync + 'static,
        A: 'static,
        F: Fn(&Container<'_>, A) -> Result<T> + Send + Sync + 'static,
    {
        self.register_shared(move |scope: &Container<'_>, args: A| {
            factory(scope, args).map(Arc::new)
        })
    }

    /// Register a factory that hands out shared instances of `T`.
    ///
    /// Unlike [`register`](Container::register) the factory returns the
    /// `Arc` itself, so it may return an instance that already exists
    /// elsewhere. A holder records each distinct instance once, however
    /// often the factory returns it.
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use tarkib_container::prelude::*;
    ///
    /// struct Pool;
    ///
    /// let pool = Arc::new(Pool);
    /// let root = Container::new();
    /// root.register_shared({
    ///     let pool = Arc::clone(&pool);
    ///     move |_: &Container<'_>, ()| Ok(Arc::clone(&pool))
    /// })?
    /// .with_ownership(false)
    /// .instance_per_scope();
    ///
    /// assert!(Arc::ptr_eq(&root.new_scope().resolve::<Pool>()?, &pool));
    /// # Ok::<(), TarkibError>(())
    /// ```
    ///
    /// # Errors
    /// [`TarkibError::AlreadyRegistered`], as for [`register`](Container::register).
    pub fn register_shared<T, A, F>(
        &self,
        factory: F,
    ) -> Result<RegistrationBuilder<'_, 'p, T, A>>
    where
        T: ?Sized + Send + Sync + 'static,
        A: 'static,
        F: Fn(&Container<'_>, A) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        let key = TypeKey::of::<T>();

        if !self.settings.allow_override && self.registrations.contains_key(&key) {
            return Err(TarkibError::AlreadyRegistered(AlreadyRegisteredError { key }));
        }

        debug!(key = %key, depth = self.depth, "Registering factory");
        let factory: Factory<T, A> = Arc::new(factory);

        Ok(RegistrationBuilder::new(
            self,
            Registration::new(key, factory, self.settings.owns_instances),
        ))
    }

    /// Register `T` built with [`Default::default`].
    pub fn register_default<T>(&self) -> Result<RegistrationBuilder<'_, 'p, T, ()>>
    where
        T: Default + Send + Sync + 'static,
    {
        self.register(|_: &Container<'_>, ()| Ok(T::default()))
    }

    /// Register `T` built from the resolve arguments with [`From`].
    ///
    /// ```rust
    /// use tarkib_container::prelude::*;
    ///
    /// struct Port(u16);
    ///
    /// impl From<u16> for Port {
    ///     fn from(port: u16) -> Self { Port(port) }
    /// }
    ///
    /// let root = Container::new();
    /// root.register_from::<Port, u16>()?.instance_per_request();
    /// assert_eq!(root.resolve_with::<Port, u16>(8080)?.0, 8080);
    /// # Ok::<(), TarkibError>(())
    /// ```
    pub fn register_from<T, A>(&self) -> Result<RegistrationBuilder<'_, 'p, T, A>>
    where
        T: From<A> + Send + Sync + 'static,
        A: 'static,
    {
        self.register(|_: &Container<'_>, args: A| Ok(T::from(args)))
    }

    /// Hand this container to `module` so it can register its abstractions.
    #[instrument(skip_all, fields(module = module.name()))]
    pub fn register_module(&self, module: &dyn Module) -> Result<()> {
        info!(depth = self.depth, "Loading module");
        module.load(self)?;
        debug!(registered = self.registrations.len(), "Module loaded");
        Ok(())
    }

    pub(crate) fn store_registration(&self, record: ErasedRecord) {
        let key = record.key();
        debug!(key = %key, lifetime = %record.lifetime(), depth = self.depth, "Stored registration");
        if self.registrations.insert(key, record).is_some() {
            trace!(key = %key, "Replaced previous registration");
        }
    }

    // ── Resolution ──

    /// Resolve `T`, passing no arguments to its factory.
    ///
    /// ```rust,ignore
    /// let db: Arc<dyn Database> = scope.resolve()?;
    /// ```
    pub fn resolve<T>(&self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve_with::<T, ()>(())
    }

    /// Resolve `T`, passing `args` to its factory if a new instance has
    /// to be built. Cached instances ignore the arguments.
    ///
    /// # Errors
    /// - [`TarkibError::NotRegistered`]: `T` is unknown to this
    ///   container and all of its ancestors
    /// - [`TarkibError::TypeMismatch`]: `T` was registered with a
    ///   different argument type
    /// - any error returned by the factory
    pub fn resolve_with<T, A>(&self, args: A) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
        A: 'static,
    {
        let key = TypeKey::of::<T>();
        trace!(key = %key, depth = self.depth, "Resolving");

        let record = self.try_resolve(&key)?;
        let registration = downcast_record::<Registration<T, A>>(record)?;

        let stores = Stores {
            global: self.global_instances(),
            scope: &self.scope_instances,
            requests: &self.request_instances,
        };
        registration.try_get_instance(self, stores, args)
    }

    /// Finds the record for `key` here or in the closest ancestor.
    fn try_resolve(&self, key: &TypeKey) -> Result<ErasedRecord> {
        for scope in self.ancestors() {
            if let Some(record) = scope.registrations.get(key) {
                if scope.depth != self.depth {
                    trace!(key = %key, found_at = scope.depth, "Resolved from ancestor");
                }
                return Ok(record.value().clone());
            }
        }

        Err(self.not_registered(key))
    }

    fn not_registered(&self, key: &TypeKey) -> TarkibError {
        let mut searched_scopes = 0;
        let mut names: Vec<&'static str> = Vec::new();
        for scope in self.ancestors() {
            searched_scopes += 1;
            names.extend(scope.registrations.iter().map(|entry| entry.key().type_name()));
        }

        TarkibError::NotRegistered(NotRegisteredError {
            requested: *key,
            searched_scopes,
            suggestions: suggest_similar(key.type_name(), &names, self.settings.max_suggestions),
        })
    }

    // ── Scopes ──

    /// Create a child scope.
    ///
    /// The child starts empty, resolves unknown abstractions through this
    /// container, shares the root's global singletons and keeps its own
    /// per-scope and per-request instances, released when it is dropped.
    pub fn new_scope(&self) -> Container<'_> {
        debug!(depth = self.depth + 1, "Creating scope");
        Container {
            registrations: RecordMap::new(),
            scope_instances: RecordMap::new(),
            request_instances: Mutex::new(Vec::new()),
            position: Position::Child { parent: self },
            settings: Arc::clone(&self.settings),
            depth: self.depth + 1,
        }
    }

    /// Create a heap-allocated child scope, released when the box is dropped.
    pub fn new_scope_boxed(&self) -> Box<Container<'_>> {
        Box::new(self.new_scope())
    }

    /// The parent container, or `None` at the root.
    pub fn parent(&self) -> Option<&'p Container<'p>> {
        match self.position {
            Position::Root { .. } => None,
            Position::Child { parent } => Some(parent),
        }
    }

    /// The root of this container's tree.
    pub fn root(&self) -> &Container<'p> {
        match self.position {
            Position::Root { .. } => self,
            Position::Child { parent } => parent.root(),
        }
    }

    /// This container followed by each of its ancestors, root last.
    fn ancestors(&self) -> impl Iterator<Item = &Container<'p>> {
        iter::successors(Some(self), |scope| scope.parent())
    }

    fn global_instances(&self) -> &RecordMap {
        match &self.position {
            Position::Root { global_singletons } => global_singletons,
            Position::Child { parent } => parent.global_instances(),
        }
    }

    // ── Introspection ──

    /// Returns `true` for the root container.
    pub fn is_root(&self) -> bool {
        matches!(self.position, Position::Root { .. })
    }

    /// Distance from the root (the root is 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Settings shared by the whole tree.
    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }

    /// Returns `true` if `T` is registered in this container itself.
    pub fn is_registered<T: ?Sized + 'static>(&self) -> bool {
        self.registrations.contains_key(&TypeKey::of::<T>())
    }

    /// Returns `true` if `T` is registered here or in an ancestor.
    pub fn can_resolve<T: ?Sized + 'static>(&self) -> bool {
        let key = TypeKey::of::<T>();
        self.ancestors().any(|scope| scope.registrations.contains_key(&key))
    }

    /// Keys registered in this container itself, sorted.
    pub fn registered_keys(&self) -> Vec<TypeKey> {
        let mut keys: Vec<TypeKey> = self.registrations.iter().map(|entry| *entry.key()).collect();
        keys.sort();
        keys
    }

    /// Live instances held in this container's per-scope table.
    pub fn scope_instance_count(&self) -> usize {
        count_instances(&self.scope_instances)
    }

    /// Live per-request instances owned by this container.
    pub fn request_instance_count(&self) -> usize {
        self.request_instances
            .lock()
            .iter()
            .map(|holder| holder.instance_count())
            .sum()
    }

    /// Live instances in the root's global singleton table.
    pub fn global_instance_count(&self) -> usize {
        count_instances(self.global_instances())
    }
}

fn count_instances(store: &RecordMap) -> usize {
    store.iter().map(|entry| entry.value().instance_count()).sum()
}

impl Drop for Container<'_> {
    fn drop(&mut self) {
        let requests = std::mem::take(self.request_instances.get_mut());
        let owned_scoped = self
            .scope_instances
            .iter()
            .filter(|entry| entry.value().owns_instances())
            .count();
        debug!(
            depth = self.depth,
            scoped = self.scope_instances.len(),
            owned_scoped,
            requested = requests.len(),
            "Releasing scope"
        );

        // newest first: request instances, then scope instances, then
        // the root's global singletons
        drop(requests);
        self.scope_instances.clear();
        self.registrations.clear();
        if let Position::Root { global_singletons } = &self.position {
            global_singletons.clear();
        }
    }
}

impl fmt::Debug for Container<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("depth", &self.depth)
            .field("is_root", &self.is_root())
            .field("registered", &self.registrations.len())
            .field("scope_instances", &self.scope_instances.len())
            .field("request_instances", &self.request_instances.lock().len())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, ContainerBuilder, ContainerSettings};
    pub use crate::error::{Result, TarkibError};
    pub use crate::key::TypeKey;
    pub use crate::lifetime::Lifetime;
    pub use crate::module::Module;
    pub use crate::registration::RegistrationBuilder;
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::lifetime::Lifetime;

    #[test]
    fn register_then_resolve_locally() {
        let root = Container::new();
        let scope = root.new_scope();
        scope.register_default::<u8>().unwrap().global_singleton();

        assert!(scope.is_registered::<u8>());
        assert!(!root.is_registered::<u8>());
        assert_eq!(*scope.resolve::<u8>().unwrap(), 0);
    }

    #[test]
    fn duplicate_register_fails() {
        let root = Container::new();
        root.register_default::<u8>().unwrap().global_singleton();

        match root.register_default::<u8>() {
            Err(TarkibError::AlreadyRegistered(e)) => assert_eq!(e.key, TypeKey::of::<u8>()),
            other => panic!("Expected AlreadyRegistered, got: {other:?}"),
        }
    }

    #[test]
    fn duplicate_register_allowed_with_override() {
        let root = Container::builder().allow_override(true).build();
        root.register(|_: &Container<'_>, ()| Ok(1u8)).unwrap().global_singleton();
        root.register(|_: &Container<'_>, ()| Ok(2u8)).unwrap().global_singleton();

        assert_eq!(*root.resolve::<u8>().unwrap(), 2);
    }

    #[test]
    fn child_may_shadow_parent() {
        let root = Container::new();
        root.register(|_: &Container<'_>, ()| Ok(String::from("root")))
            .unwrap()
            .instance_per_scope();

        let scope = root.new_scope();
        scope
            .register(|_: &Container<'_>, ()| Ok(String::from("scope")))
            .unwrap()
            .instance_per_scope();

        assert_eq!(*scope.resolve::<String>().unwrap(), "scope");
        assert_eq!(*root.resolve::<String>().unwrap(), "root");
    }

    #[test]
    fn resolve_not_registered() {
        let root = Container::new();

        match root.resolve::<i32>() {
            Err(TarkibError::NotRegistered(e)) => {
                assert_eq!(e.requested, TypeKey::of::<i32>());
                assert_eq!(e.searched_scopes, 1);
            }
            other => panic!("Expected NotRegistered, got: {other:?}"),
        }
    }

    #[test]
    fn not_registered_suggests_similar() {
        #[derive(Debug)]
        struct UserService;
        struct UserServiceConfig;

        let root = Container::new();
        root.register(|_: &Container<'_>, ()| Ok(UserServiceConfig))
            .unwrap()
            .global_singleton();
        let scope = root.new_scope();

        match scope.resolve::<UserService>() {
            Err(TarkibError::NotRegistered(e)) => {
                assert_eq!(e.searched_scopes, 2);
                assert_eq!(e.suggestions.len(), 1);
                assert!(e.suggestions[0].contains("UserServiceConfig"));
            }
            other => panic!("Expected NotRegistered, got: {other:?}"),
        }
    }

    #[test]
    fn resolve_with_wrong_arguments_is_type_mismatch() {
        let root = Container::new();
        root.register_from::<u64, u32>().unwrap().instance_per_request();

        assert_eq!(*root.resolve_with::<u64, u32>(7).unwrap(), 7);
        assert!(matches!(
            root.resolve::<u64>(),
            Err(TarkibError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn arguments_ignored_on_cache_hit() {
        let root = Container::new();
        root.register_from::<u64, u32>().unwrap().global_singleton();

        assert_eq!(*root.resolve_with::<u64, u32>(1).unwrap(), 1);
        assert_eq!(*root.resolve_with::<u64, u32>(2).unwrap(), 1);
    }

    #[test]
    fn factory_resolves_dependencies() {
        struct Url(String);
        struct Client {
            url: Arc<Url>,
        }

        let root = Container::new();
        root.register(|_: &Container<'_>, ()| Ok(Url("postgres://localhost".into())))
            .unwrap()
            .global_singleton();
        root.register(|scope: &Container<'_>, ()| Ok(Client { url: scope.resolve()? }))
            .unwrap()
            .instance_per_request();

        let client: Arc<Client> = root.new_scope().resolve().unwrap();
        assert_eq!(client.url.0, "postgres://localhost");
    }

    #[test]
    fn factory_error_propagates() {
        #[derive(Debug)]
        struct Flaky;

        let root = Container::new();
        root.register(|_: &Container<'_>, ()| -> Result<Flaky> {
            Err(TarkibError::construction_failed::<Flaky>("unavailable"))
        })
        .unwrap()
        .global_singleton();

        let err = root.resolve::<Flaky>().unwrap_err();
        assert!(matches!(err, TarkibError::ConstructionFailed { .. }));
        assert_eq!(root.global_instance_count(), 0);
    }

    #[test]
    fn shared_factory_records_existing_instance_once() {
        struct Pool;

        let pool = Arc::new(Pool);
        let root = Container::new();
        root.register_shared({
            let pool = Arc::clone(&pool);
            move |_: &Container<'_>, ()| Ok(Arc::clone(&pool))
        })
        .unwrap()
        .with_ownership(false)
        .instance_per_scope();

        {
            let scope = root.new_scope();
            for _ in 0..3 {
                let resolved: Arc<Pool> = scope.resolve().unwrap();
                assert!(Arc::ptr_eq(&resolved, &pool));
            }
            assert_eq!(scope.scope_instance_count(), 1);
            assert_eq!(Arc::strong_count(&pool), 3);
        }

        // root factory closure plus the test's own handle
        assert_eq!(Arc::strong_count(&pool), 2);
    }

    #[test]
    fn shared_factory_per_request_returns_existing_instance() {
        let shared = Arc::new(String::from("shared"));
        let root = Container::new();
        root.register_shared({
            let shared = Arc::clone(&shared);
            move |_: &Container<'_>, ()| Ok(Arc::clone(&shared))
        })
        .unwrap()
        .instance_per_request();

        let a = root.resolve::<String>().unwrap();
        let b = root.resolve::<String>().unwrap();
        assert!(Arc::ptr_eq(&a, &shared));
        assert!(Arc::ptr_eq(&b, &shared));
    }

    #[test]
    fn shared_factory_may_register_trait_objects() {
        trait Clock: Send + Sync {
            fn now(&self) -> u64;
        }
        struct Fixed;
        impl Clock for Fixed {
            fn now(&self) -> u64 {
                42
            }
        }

        let root = Container::new();
        root.register_shared(|_: &Container<'_>, ()| -> Result<Arc<dyn Clock>> {
            Ok(Arc::new(Fixed))
        })
        .unwrap()
        .instance_per_scope();

        let scope = root.new_scope();
        let a = scope.resolve::<dyn Clock>().unwrap();
        let b = scope.resolve::<dyn Clock>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.now(), 42);
        assert_eq!(scope.scope_instance_count(), 1);
    }

    #[test]
    fn shared_register_respects_duplicates() {
        let root = Container::new();
        root.register_default::<u8>().unwrap().global_singleton();

        assert!(matches!(
            root.register_shared(|_: &Container<'_>, ()| Ok(Arc::new(1u8))),
            Err(TarkibError::AlreadyRegistered(_))
        ));
    }

    #[test]
    fn singleton_factory_called_once() {
        let counter = Arc::new(AtomicU32::new(0));
        let root = Container::new();
        root.register({
            let counter = Arc::clone(&counter);
            move |_: &Container<'_>, ()| Ok(counter.fetch_add(1, Ordering::SeqCst))
        })
        .unwrap()
        .global_singleton();

        let scope = root.new_scope();
        for _ in 0..3 {
            root.resolve::<u32>().unwrap();
            scope.resolve::<u32>().unwrap();
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn with_lifetime_from_config() {
        let lifetime: Lifetime = serde_json::from_str(r#""per_scope""#).unwrap();
        let root = Container::new();
        root.register_default::<Vec<u8>>().unwrap().with_lifetime(lifetime);

        let scope = root.new_scope();
        let a = scope.resolve::<Vec<u8>>().unwrap();
        let b = scope.resolve::<Vec<u8>>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(scope.scope_instance_count(), 1);
        assert_eq!(root.scope_instance_count(), 0);
    }

    #[test]
    fn root_walks_to_tree_root() {
        let root = Container::new();
        let child = root.new_scope();
        let grandchild = child.new_scope_boxed();

        assert!(root.is_root());
        assert!(!grandchild.is_root());
        assert_eq!(grandchild.depth(), 2);
        assert!(std::ptr::eq(grandchild.root(), &root));
        assert!(std::ptr::eq(child.root(), &root));
        assert!(grandchild.parent().is_some_and(|p| std::ptr::eq(p, &child)));
    }

    #[test]
    fn settings_inherited_by_scopes() {
        let root = Container::builder().max_suggestions(1).owns_instances(false).build();
        let scope = root.new_scope();
        assert_eq!(scope.settings().max_suggestions, 1);
        assert!(!scope.settings().owns_instances);
    }

    #[test]
    fn registered_keys_are_local() {
        let root = Container::new();
        root.register_default::<u8>().unwrap().global_singleton();
        root.register_default::<u16>().unwrap().instance_per_scope();
        let scope = root.new_scope();

        assert_eq!(root.registered_keys().len(), 2);
        assert!(scope.registered_keys().is_empty());
        assert!(scope.can_resolve::<u16>());
        assert!(!scope.can_resolve::<u32>());
    }

    #[test]
    fn debug_display() {
        let root = Container::new();
        root.register_default::<u8>().unwrap().global_singleton();
        root.register_default::<u16>().unwrap().global_singleton();

        let debug = format!("{root:?}");
        assert!(debug.contains("Container"));
        assert!(debug.contains("registered: 2"));
    }
}
