//! Error types for the planning model.

use thiserror::Error;

/// Main error type for model construction and lookup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A declaration with this name already exists in the problem.
    #[error("duplicate declaration `{0}`")]
    Duplicate(String),

    /// An expression or effect references a fluent the problem does not declare.
    #[error("fluent `{0}` is not declared")]
    UndeclaredFluent(String),

    /// An object or variable references a user type the problem does not declare.
    #[error("type `{0}` is not declared")]
    UndeclaredType(String),

    /// An expression references an object the problem does not declare.
    #[error("object `{0}` is not declared")]
    UndeclaredObject(String),

    /// An action id does not belong to this problem.
    #[error("action id {0} is out of range")]
    UnknownAction(u32),
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
