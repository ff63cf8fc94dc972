//! Broker entry point that hides transformer and registry wiring.

use tracing::{debug, info};

use planbroker_engines::{
    EngineError, EngineRegistry, OptimalityGuarantee, PlanGenerationResult, Role,
    SelectError, ValidationResult,
};
use planbroker_model::{Plan, Problem};
use planbroker_transform::{ProblemTransformer, QuantifierEliminator, TransformError};
use thiserror::Error;

/// Errors from a brokered solve or validate call.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error(transparent)]
    Select(#[from] SelectError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Routes problems to compatible engines.
///
/// Quantified problems are rewritten into quantifier-free form before
/// selection; plans an engine produces for the rewritten problem are
/// mapped back to the original problem's actions, so callers only ever
/// see their own action ids.
pub struct Broker {
    registry: EngineRegistry,
}

impl Default for Broker {
    fn default() -> Self {
        Broker::new()
    }
}

impl Broker {
    /// A broker backed by the built-in engines.
    pub fn new() -> Self {
        Broker {
            registry: EngineRegistry::with_builtin_engines(),
        }
    }

    /// A broker backed by a caller-assembled registry.
    pub fn with_registry(registry: EngineRegistry) -> Self {
        Broker { registry }
    }

    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EngineRegistry {
        &mut self.registry
    }

    /// Solves a problem with a compatible planner.
    ///
    /// Passing a guarantee restricts selection to planners that declare
    /// it; `None` accepts any compatible planner.
    pub fn solve(
        &self,
        problem: &Problem,
        guarantee: Option<OptimalityGuarantee>,
    ) -> Result<PlanGenerationResult, BrokerError> {
        let kind = problem.kind();
        if kind.has_existential_conditions() || kind.has_universal_conditions() {
            debug!(problem = problem.name(), "rewriting quantified problem");
            let eliminator = QuantifierEliminator::new(problem.clone());
            let rewritten = eliminator.rewritten_problem()?;
            let mut result = self.solve_direct(rewritten, guarantee)?;
            if let Some(plan) = result.plan.take() {
                result.plan = Some(eliminator.rewrite_back_plan(&plan)?);
            }
            Ok(result)
        } else {
            self.solve_direct(problem, guarantee)
        }
    }

    fn solve_direct(
        &self,
        problem: &Problem,
        guarantee: Option<OptimalityGuarantee>,
    ) -> Result<PlanGenerationResult, BrokerError> {
        let selected = self
            .registry
            .planner(Some(problem.kind()), guarantee)
            .into_result(Role::OneshotPlanner)?;
        info!(
            problem = problem.name(),
            engine = selected.name,
            "solving with selected planner"
        );
        let mut engine = selected.engine;
        Ok(engine.solve(problem)?)
    }

    /// Validates a plan against a problem with a compatible validator.
    ///
    /// Quantified problems are rewritten first and the plan is mapped
    /// onto the rewritten problem before validation.
    pub fn validate(
        &self,
        problem: &Problem,
        plan: &Plan,
    ) -> Result<ValidationResult, BrokerError> {
        let kind = problem.kind();
        if kind.has_existential_conditions() || kind.has_universal_conditions() {
            debug!(problem = problem.name(), "rewriting quantified problem");
            let eliminator = QuantifierEliminator::new(problem.clone());
            let rewritten = eliminator.rewritten_problem()?;
            let mapped = eliminator.rewrite_plan(plan)?;
            return self.validate_direct(rewritten, &mapped);
        }
        self.validate_direct(problem, plan)
    }

    fn validate_direct(
        &self,
        problem: &Problem,
        plan: &Plan,
    ) -> Result<ValidationResult, BrokerError> {
        let selected = self
            .registry
            .validator(Some(problem.kind()), None)
            .into_result(Role::PlanValidator)?;
        info!(
            problem = problem.name(),
            engine = selected.name,
            "validating with selected validator"
        );
        let mut engine = selected.engine;
        Ok(engine.validate(problem, plan)?)
    }
}
