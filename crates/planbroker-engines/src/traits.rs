//! Engine interfaces and result types.

use std::fmt;

use serde::{Deserialize, Serialize};

use planbroker_model::{Plan, Problem};

use crate::error::EngineError;

/// A declared quality property of a planner's output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OptimalityGuarantee {
    /// Any valid plan may be returned.
    Satisficing,
    /// Returned plans are provably optimal.
    SolvedOptimally,
}

impl fmt::Display for OptimalityGuarantee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimalityGuarantee::Satisficing => write!(f, "satisficing"),
            OptimalityGuarantee::SolvedOptimally => write!(f, "solved_optimally"),
        }
    }
}

/// Outcome category of a plan generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanGenerationStatus {
    SolvedSatisficing,
    SolvedOptimally,
    /// The engine proved no plan exists.
    UnsolvableProven,
    /// The engine gave up without proving unsolvability.
    UnsolvableIncompletely,
}

impl PlanGenerationStatus {
    pub fn is_solved(self) -> bool {
        matches!(
            self,
            PlanGenerationStatus::SolvedSatisficing | PlanGenerationStatus::SolvedOptimally
        )
    }
}

/// Result of a plan generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanGenerationResult {
    pub status: PlanGenerationStatus,
    /// Present exactly when the status is a solved status.
    pub plan: Option<Plan>,
    pub engine_name: String,
}

/// Result of a plan validation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid { reason: String },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        ValidationResult::Invalid {
            reason: reason.into(),
        }
    }
}

/// An engine that produces a plan for a problem in a single call.
///
/// Instances are acquired from the registry for the duration of one
/// solve call; dropping the instance releases its resources on every
/// exit path.
pub trait OneshotPlanner {
    fn name(&self) -> &str;

    fn solve(&mut self, problem: &Problem) -> Result<PlanGenerationResult, EngineError>;
}

/// An engine that checks a plan against a problem.
pub trait PlanValidator {
    fn name(&self) -> &str;

    fn validate(
        &mut self,
        problem: &Problem,
        plan: &Plan,
    ) -> Result<ValidationResult, EngineError>;
}
