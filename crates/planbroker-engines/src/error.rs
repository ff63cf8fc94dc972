//! Error types for engines and engine selection.

use thiserror::Error;

use planbroker_model::{EvalError, ModelError};

use crate::registry::Role;

/// Errors from engine selection.
///
/// The two variants keep a registry-configuration error (nothing
/// registered for the role at all) distinguishable from a capability
/// mismatch; callers branch on this distinction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// No engine was ever registered under this role.
    #[error("no engine registered for role `{0}`")]
    NotRegistered(Role),

    /// Engines are registered for the role, but none supports the
    /// requested problem kind and optimality guarantee.
    #[error("no registered `{0}` engine is compatible with the request")]
    NoMatch(Role),
}

/// Errors raised by an engine during a solve or validate call.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The problem uses constructs this engine does not support.
    #[error("engine `{engine}` does not support this problem: {reason}")]
    UnsupportedProblem { engine: String, reason: String },

    /// The plan's shape does not match what the engine expects.
    #[error("engine `{engine}` cannot process this plan: {reason}")]
    UnsupportedPlan { engine: String, reason: String },

    /// The problem is structurally invalid.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A ground expression could not be evaluated.
    #[error(transparent)]
    Eval(#[from] EvalError),
}
