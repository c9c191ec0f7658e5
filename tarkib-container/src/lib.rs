//! Core container implementation for Tarkib DI.

pub mod container;
mod dispatch;
pub mod error;
mod holder;
pub mod key;
pub mod lifetime;
pub mod module;
pub mod registration;

pub use container::{Container, ContainerBuilder, ContainerSettings, prelude};
pub use error::{Result, TarkibError};
pub use key::TypeKey;
pub use lifetime::Lifetime;
pub use module::Module;
pub use registration::{Factory, RegistrationBuilder};
