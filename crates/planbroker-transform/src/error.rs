//! Error types for problem transformers.

use planbroker_model::{ActionId, ModelError};
use thiserror::Error;

/// Errors raised while rewriting a problem or mapping a plan back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// A quantified variable's type was never declared in the problem.
    ///
    /// Distinct from a declared type with zero objects, which is a legal
    /// empty domain.
    #[error("bound variable `{variable}` ranges over undeclared type `{ty}`")]
    UndeclaredType { variable: String, ty: String },

    /// A plan step references an action this transformer did not produce.
    #[error("action {0} was not produced by this transformer; the plan does not originate from its rewritten problem")]
    ForeignAction(ActionId),

    /// The queried action id does not belong to the source problem.
    #[error("action {0} is not part of the source problem")]
    UnknownSourceAction(ActionId),

    /// The source problem itself is malformed.
    #[error(transparent)]
    Model(#[from] ModelError),
}
