//! # Tarkib — scoped dependency injection for Rust
//!
//! Register how to build an abstraction once, pick a lifetime, and resolve
//! it from any scope of the container tree:
//!
//! - **global singleton**: one instance for the root and every scope
//! - **per scope**: one instance per container
//! - **per request**: a new instance on every resolve
//!
//! ```rust
//! use std::sync::Arc;
//! use tarkib::prelude::*;
//!
//! #[derive(Default)]
//! struct Logger;
//!
//! #[derive(Default)]
//! struct Connection;
//!
//! let root = Container::new();
//! root.register_default::<Logger>()?.global_singleton();
//! root.register_default::<Connection>()?.instance_per_scope();
//!
//! let a = root.new_scope();
//! let b = root.new_scope();
//! assert!(Arc::ptr_eq(&a.resolve::<Logger>()?, &b.resolve::<Logger>()?));
//! assert!(!Arc::ptr_eq(&a.resolve::<Connection>()?, &b.resolve::<Connection>()?));
//! # Ok::<(), TarkibError>(())
//! ```

pub use tarkib_container::*;
pub use tarkib_support::rendering;
