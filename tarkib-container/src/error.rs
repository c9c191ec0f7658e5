//! Error types for Tarkib container operations.
//!
//! Wiring failures are configuration bugs, so every error carries the
//! offending key and, where it helps, a hint on how to fix it.

use std::fmt;

use crate::key::TypeKey;

/// Main error type for all Tarkib operations.
#[derive(Debug, thiserror::Error)]
pub enum TarkibError {
    /// Requested abstraction is not registered anywhere in the scope chain.
    #[error("{}", .0)]
    NotRegistered(NotRegisteredError),

    /// Abstraction was already registered in this container.
    #[error("{}", .0)]
    AlreadyRegistered(AlreadyRegisteredError),

    /// The record filed under a key was built for a different abstraction
    /// or argument type than the one requested.
    #[error("Type mismatch for {key}: expected {expected}")]
    TypeMismatch {
        key: TypeKey,
        expected: &'static str,
    },

    /// A factory returned an error during construction.
    #[error("Failed to construct {key}: {source}")]
    ConstructionFailed {
        key: TypeKey,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl TarkibError {
    /// Wraps a factory failure for abstraction `T`.
    ///
    /// ```
    /// use tarkib_container::error::TarkibError;
    ///
    /// struct Database;
    /// let err = TarkibError::construction_failed::<Database>("connection refused");
    /// assert!(err.to_string().contains("connection refused"));
    /// ```
    pub fn construction_failed<T: ?Sized + 'static>(
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        TarkibError::ConstructionFailed {
            key: TypeKey::of::<T>(),
            source: source.into(),
        }
    }

    /// Returns the key the error is about.
    pub fn key(&self) -> &TypeKey {
        match self {
            TarkibError::NotRegistered(e) => &e.requested,
            TarkibError::AlreadyRegistered(e) => &e.key,
            TarkibError::TypeMismatch { key, .. } => key,
            TarkibError::ConstructionFailed { key, .. } => key,
        }
    }
}

/// Error when an abstraction could not be found.
#[derive(Debug)]
pub struct NotRegisteredError {
    /// The abstraction that was requested
    pub requested: TypeKey,
    /// How many containers were searched, the resolving one included
    pub searched_scopes: usize,
    /// Registered names that look similar
    pub suggestions: Vec<String>,
}

impl fmt::Display for NotRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dependency not registered: {}", self.requested)?;
        write!(f, "\n  Searched {} scope(s) up to the root", self.searched_scopes)?;

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: Did you forget to call .register::<{}>() or .as_interface::<{}>()?",
            self.requested.short_name(),
            self.requested.short_name(),
        )
    }
}

/// Error when registering an abstraction that already exists.
#[derive(Debug)]
pub struct AlreadyRegisteredError {
    pub key: TypeKey,
}

impl fmt::Display for AlreadyRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dependency already registered: {}", self.key)?;
        write!(
            f,
            "\n  Hint: Register it in a child scope to shadow it, or enable allow_override in the builder"
        )
    }
}

/// Convenient Result type for Tarkib operations.
pub type Result<T> = std::result::Result<T, TarkibError>;
