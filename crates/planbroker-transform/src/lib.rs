//! Problem transformers for planbroker.
//!
//! A transformer rewrites a problem into a normal form some engine
//! requires and maps plans for the rewritten problem back to plans for
//! the original. The one transformer provided here eliminates
//! existential and universal quantifiers over finite object domains.

pub mod eliminator;
pub mod error;

pub use eliminator::QuantifierEliminator;
pub use error::TransformError;

use planbroker_model::{Plan, Problem};

/// A problem rewriting that can be inverted on plans.
///
/// Implementations build lazily on first use, memoize the rewritten
/// problem, and never return a partially rewritten problem on failure.
pub trait ProblemTransformer {
    /// The source problem the transformer was constructed from.
    fn source(&self) -> &Problem;

    /// The rewritten, equivalent problem. Idempotent: repeated calls
    /// return the same value.
    fn rewritten_problem(&self) -> Result<&Problem, TransformError>;

    /// Maps a plan for the rewritten problem back to a plan for the
    /// source problem, preserving step order and timing.
    fn rewrite_back_plan(&self, plan: &Plan) -> Result<Plan, TransformError>;
}
