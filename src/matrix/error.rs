use std::fmt;
use thiserror::Error;

/// Which kind of entry a lookup was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Criterion,
    Alternative,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Criterion => write!(f, "criterion"),
            EntityKind::Alternative => write!(f, "alternative"),
        }
    }
}

/// Errors raised by matrix edits and decision queries.
///
/// Every variant is recoverable: the model is left as it was before the
/// failing call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: EntityKind, name: String },

    #[error("alternative '{name}' already exists")]
    Duplicate { name: String },

    #[error("{context}: expected {expected} values, got {actual}")]
    Shape {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("no price given for alternative '{name}'")]
    MissingPrice { name: String },

    #[error("{count} alternatives exceed the combination limit of {limit}")]
    TooManyAlternatives { count: usize, limit: usize },
}

impl ModelError {
    pub(crate) fn criterion_not_found(name: &str) -> Self {
        ModelError::NotFound {
            kind: EntityKind::Criterion,
            name: name.to_string(),
        }
    }

    pub(crate) fn alternative_not_found(name: &str) -> Self {
        ModelError::NotFound {
            kind: EntityKind::Alternative,
            name: name.to_string(),
        }
    }
}
