//! Module trait: a unit of related registrations.
//!
//! Modules group registrations by concern so that application wiring
//! reads as a list of modules instead of one long block.
//!
//! # Examples
//! ```rust
//! use tarkib_container::prelude::*;
//!
//! #[derive(Default)]
//! struct Clock;
//!
//! struct TimeModule;
//!
//! impl Module for TimeModule {
//!     fn load(&self, container: &Container<'_>) -> Result<()> {
//!         container.register_default::<Clock>()?.global_singleton();
//!         Ok(())
//!     }
//! }
//!
//! let container = Container::new();
//! container.register_module(&TimeModule)?;
//! assert!(container.can_resolve::<Clock>());
//! # Ok::<(), TarkibError>(())
//! ```

use crate::container::Container;
use crate::error::Result;

/// A batch of registrations applied to one container.
///
/// [`Container::register_module`] hands the container to [`Module::load`]
/// exactly once. A module should register each abstraction it represents
/// once and pick its lifetime.
pub trait Module {
    /// Registers this module's abstractions into `container`.
    fn load(&self, container: &Container<'_>) -> Result<()>;

    /// Human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TarkibError;
    use std::sync::Arc;

    struct Greeting(&'static str);

    struct GreetingModule;

    impl Module for GreetingModule {
        fn load(&self, container: &Container<'_>) -> Result<()> {
            container
                .register(|_: &Container<'_>, ()| Ok(Greeting("hello")))?
                .global_singleton();
            container
                .register(|_: &Container<'_>, n: u32| Ok(n * 2))?
                .instance_per_request();
            Ok(())
        }
    }

    #[test]
    fn module_registers_dependencies() {
        let container = Container::new();
        container.register_module(&GreetingModule).unwrap();

        let greeting: Arc<Greeting> = container.resolve().unwrap();
        assert_eq!(greeting.0, "hello");
        assert_eq!(*container.resolve_with::<u32, u32>(21).unwrap(), 42);
    }

    #[test]
    fn loading_twice_fails() {
        let container = Container::new();
        container.register_module(&GreetingModule).unwrap();

        match container.register_module(&GreetingModule) {
            Err(TarkibError::AlreadyRegistered(e)) => {
                assert!(e.key.type_name().contains("Greeting"));
            }
            other => panic!("Expected AlreadyRegistered, got: {other:?}"),
        }
    }

    #[test]
    fn module_has_name() {
        assert!(GreetingModule.name().contains("GreetingModule"));
    }
}
