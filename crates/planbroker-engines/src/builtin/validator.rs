//! A plan validator that simulates sequential plans step by step.

use std::collections::BTreeMap;

use tracing::debug;

use planbroker_model::eval::eval;
use planbroker_model::{bind_parameters, Action, Effect, Plan, Problem};

use crate::builtin::{apply_effects, supported_kind, EffectError};
use crate::error::EngineError;
use crate::traits::{PlanValidator, ValidationResult};

const ENGINE_NAME: &str = "sequential-simulator";

/// Validates a sequential plan by executing it from the initial state.
///
/// A step is rejected if any precondition evaluates to false in the
/// state it executes in; each step's effects all read from that same
/// state. After the last step every goal must hold.
#[derive(Debug, Default)]
pub struct SequentialSimulator;

impl SequentialSimulator {
    pub fn new() -> Self {
        SequentialSimulator
    }
}

impl PlanValidator for SequentialSimulator {
    fn name(&self) -> &str {
        ENGINE_NAME
    }

    fn validate(
        &mut self,
        problem: &Problem,
        plan: &Plan,
    ) -> Result<ValidationResult, EngineError> {
        if !problem.kind().is_subset_of(&supported_kind()) {
            return Err(EngineError::UnsupportedProblem {
                engine: ENGINE_NAME.into(),
                reason: format!("unsupported problem kind {}", problem.kind()),
            });
        }
        let Some(sequential) = plan.as_sequential() else {
            return Err(EngineError::UnsupportedPlan {
                engine: ENGINE_NAME.into(),
                reason: "only sequential plans can be simulated".into(),
            });
        };

        let mut state = problem.initial_state()?;
        for (index, step) in sequential.steps.iter().enumerate() {
            let Action::Instantaneous(action) = problem.action(step.action)? else {
                return Err(EngineError::UnsupportedPlan {
                    engine: ENGINE_NAME.into(),
                    reason: format!("step {} applies a durative action", index + 1),
                });
            };
            if step.params.len() != action.params.len() {
                return Ok(ValidationResult::invalid(format!(
                    "step {}: action `{}` takes {} parameters, {} given",
                    index + 1,
                    action.name,
                    action.params.len(),
                    step.params.len()
                )));
            }
            let binding: BTreeMap<_, _> = action
                .params
                .iter()
                .zip(step.params.iter())
                .map(|(p, a)| (p.name.clone(), a.clone()))
                .collect();

            for precondition in &action.preconditions {
                let ground = bind_parameters(precondition, &binding);
                if !eval(&ground, &state)?.as_bool()? {
                    debug!(step = index + 1, action = %action.name, "precondition failed");
                    return Ok(ValidationResult::invalid(format!(
                        "step {}: precondition {} of `{}` is false",
                        index + 1,
                        ground,
                        action.name
                    )));
                }
            }

            let effects: Vec<Effect> = action
                .effects
                .iter()
                .map(|e| Effect {
                    fluent: bind_parameters(&e.fluent, &binding),
                    value: bind_parameters(&e.value, &binding),
                    condition: bind_parameters(&e.condition, &binding),
                    kind: e.kind,
                })
                .collect();
            state = match apply_effects(&state, &effects) {
                Ok(next) => next,
                Err(EffectError::Conflict(key)) => {
                    return Ok(ValidationResult::invalid(format!(
                        "step {}: conflicting effects on `{}`",
                        index + 1,
                        key
                    )));
                }
                Err(EffectError::Eval(e)) => return Err(e.into()),
            };
        }

        for goal in problem.goals() {
            if !eval(goal, &state)?.as_bool()? {
                debug!(%goal, "goal not satisfied in final state");
                return Ok(ValidationResult::invalid(format!(
                    "goal {} is not satisfied in the final state",
                    goal
                )));
            }
        }
        Ok(ValidationResult::Valid)
    }
}

#[cfg(test)]
mod tests;
