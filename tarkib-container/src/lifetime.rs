//! Instance lifetime policies.
//!
//! A lifetime decides where a resolved instance is cached and for how long:
//! - [`Lifetime::GlobalSingleton`]: one instance for the whole container tree
//! - [`Lifetime::PerScope`]: one instance per container (scope)
//! - [`Lifetime::PerRequest`]: a new instance on every resolve

use std::fmt;

use serde::{Deserialize, Serialize};

/// Defines how long a resolved instance lives and who shares it.
///
/// # Examples
/// ```
/// use tarkib_container::lifetime::Lifetime;
///
/// assert_eq!(Lifetime::default(), Lifetime::PerRequest);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// One instance shared by the root container and every scope below it.
    ///
    /// Created on first resolve anywhere in the tree, released when the
    /// root container is dropped.
    ///
    /// # When to use
    /// - Connection pools
    /// - Configuration objects
    /// - Shared caches
    GlobalSingleton,

    /// One instance per container.
    ///
    /// Each scope that resolves the abstraction gets its own instance,
    /// even when the registration lives in an ancestor. Released when
    /// that scope is dropped.
    ///
    /// # When to use
    /// - Per-request transactions
    /// - Session data
    PerScope,

    /// A new instance on every resolve.
    ///
    /// Never reused. Owned instances are kept by the resolving scope and
    /// released together with it.
    #[default]
    PerRequest,
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::GlobalSingleton => write!(f, "GlobalSingleton"),
            Lifetime::PerScope => write!(f, "PerScope"),
            Lifetime::PerRequest => write!(f, "PerRequest"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifetime_defaults_to_per_request() {
        assert_eq!(Lifetime::default(), Lifetime::PerRequest);
    }

    #[test]
    fn lifetime_display() {
        assert_eq!(Lifetime::GlobalSingleton.to_string(), "GlobalSingleton");
        assert_eq!(Lifetime::PerScope.to_string(), "PerScope");
        assert_eq!(Lifetime::PerRequest.to_string(), "PerRequest");
    }

    #[test]
    fn lifetime_from_config() {
        let parsed: Vec<Lifetime> =
            serde_json::from_str(r#"["global_singleton", "per_scope", "per_request"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![Lifetime::GlobalSingleton, Lifetime::PerScope, Lifetime::PerRequest]
        );
    }
}
