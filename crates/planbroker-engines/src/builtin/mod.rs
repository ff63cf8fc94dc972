//! Built-in engines: a breadth-first planner and a sequential plan
//! simulator.
//!
//! Both operate on ground, quantifier-free, instantaneous-action
//! problems; [`supported_kind`] is their shared capability descriptor.
//! Quantified or temporal problems must be transformed first.

mod planner;
mod validator;

pub use planner::BreadthFirstPlanner;
pub use validator::SequentialSimulator;

use planbroker_model::eval::{eval, EvalError, FluentKey, State, Value};
use planbroker_model::{Effect, EffectKind, Feature, ProblemKind};

use crate::registry::{CapabilityRecord, EngineRegistry};
use crate::traits::OptimalityGuarantee;

/// Registers the built-in engines, planner first.
pub(crate) fn register(registry: &mut EngineRegistry) {
    registry.register_planner(
        CapabilityRecord::new("bfs", supported_kind())
            .with_guarantee(OptimalityGuarantee::Satisficing)
            .with_guarantee(OptimalityGuarantee::SolvedOptimally),
        || Box::new(BreadthFirstPlanner::new()),
    );
    registry.register_validator(
        CapabilityRecord::new("sequential-simulator", supported_kind()),
        || Box::new(SequentialSimulator::new()),
    );
}

/// The problem kind both built-in engines can handle.
///
/// Deliberately excludes quantified conditions and every temporal
/// feature, so a quantified problem never matches before it has been
/// rewritten.
pub fn supported_kind() -> ProblemKind {
    [
        Feature::DisjunctiveConditions,
        Feature::NegativeConditions,
        Feature::EqualityConditions,
        Feature::ConditionalEffects,
        Feature::NumericFluents,
        Feature::IncreaseEffects,
        Feature::DecreaseEffects,
        Feature::HierarchicalTyping,
    ]
    .into_iter()
    .collect()
}

/// Failure mode of a simultaneous effect application.
pub(crate) enum EffectError {
    Eval(EvalError),
    /// Two enabled effects wrote different values to the same fluent.
    Conflict(FluentKey),
}

impl From<EvalError> for EffectError {
    fn from(e: EvalError) -> Self {
        EffectError::Eval(e)
    }
}

/// Applies ground effects to a copy of `pre`.
///
/// All conditions and values are read from `pre`, so the effects of a
/// single step see the same snapshot regardless of order. Effects whose
/// condition is false are skipped.
pub(crate) fn apply_effects<'a>(
    pre: &State,
    effects: impl IntoIterator<Item = &'a Effect>,
) -> Result<State, EffectError> {
    let mut writes: Vec<(FluentKey, Value)> = Vec::new();
    for effect in effects {
        if !eval(&effect.condition, pre)?.as_bool()? {
            continue;
        }
        let key = FluentKey::of(&effect.fluent)?;
        let value = eval(&effect.value, pre)?;
        let written = match effect.kind {
            EffectKind::Assign => value,
            EffectKind::Increase => {
                let old = pre
                    .get(&key)
                    .ok_or_else(|| EvalError::Undefined(key.to_string()))?;
                old.as_int()?
                    .checked_add(value.as_int()?)
                    .map(Value::Int)
                    .ok_or(EvalError::Overflow)?
            }
            EffectKind::Decrease => {
                let old = pre
                    .get(&key)
                    .ok_or_else(|| EvalError::Undefined(key.to_string()))?;
                old.as_int()?
                    .checked_sub(value.as_int()?)
                    .map(Value::Int)
                    .ok_or(EvalError::Overflow)?
            }
        };
        if let Some((_, earlier)) = writes.iter().find(|(k, _)| *k == key) {
            if *earlier != written {
                return Err(EffectError::Conflict(key));
            }
            continue;
        }
        writes.push((key, written));
    }
    let mut post = pre.clone();
    for (key, value) in writes {
        post.set(key, value);
    }
    Ok(post)
}
