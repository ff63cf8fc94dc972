//! A breadth-first forward-search planner over ground states.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::debug;

use planbroker_model::eval::{eval, State};
use planbroker_model::{
    bind_parameters, Action, ActionId, ActionInstance, Effect, Expr, InstantaneousAction,
    Plan, Problem, SequentialPlan,
};

use crate::builtin::{apply_effects, supported_kind, EffectError};
use crate::error::EngineError;
use crate::traits::{OneshotPlanner, PlanGenerationResult, PlanGenerationStatus};

const ENGINE_NAME: &str = "bfs";

/// Default cap on the number of expanded states.
const DEFAULT_BUDGET: usize = 100_000;

/// A fully instantiated action: every parameter replaced by an object.
struct GroundAction {
    id: ActionId,
    params: Vec<Expr>,
    precondition: Expr,
    effects: Vec<Effect>,
}

/// Uninformed breadth-first search over the ground state space.
///
/// Explores states in order of plan length, so the first plan found is
/// among the shortest. Gives up with an incomplete answer once the
/// expansion budget is spent.
pub struct BreadthFirstPlanner {
    budget: usize,
}

impl BreadthFirstPlanner {
    pub fn new() -> Self {
        BreadthFirstPlanner {
            budget: DEFAULT_BUDGET,
        }
    }

    pub fn with_budget(budget: usize) -> Self {
        BreadthFirstPlanner { budget }
    }

    /// Enumerates every ground instance of every action.
    fn ground_actions(&self, problem: &Problem) -> Result<Vec<GroundAction>, EngineError> {
        let mut ground = Vec::new();
        for id in problem.action_ids() {
            let Action::Instantaneous(action) = problem.action(id)? else {
                return Err(EngineError::UnsupportedProblem {
                    engine: ENGINE_NAME.into(),
                    reason: format!("action `{}` is durative", problem.action(id)?.name()),
                });
            };
            for binding in bindings(problem, action) {
                ground.push(instantiate(id, action, &binding));
            }
        }
        Ok(ground)
    }
}

impl Default for BreadthFirstPlanner {
    fn default() -> Self {
        BreadthFirstPlanner::new()
    }
}

impl OneshotPlanner for BreadthFirstPlanner {
    fn name(&self) -> &str {
        ENGINE_NAME
    }

    fn solve(&mut self, problem: &Problem) -> Result<PlanGenerationResult, EngineError> {
        if !problem.kind().is_subset_of(&supported_kind()) {
            return Err(EngineError::UnsupportedProblem {
                engine: ENGINE_NAME.into(),
                reason: format!("unsupported problem kind {}", problem.kind()),
            });
        }

        let ground = self.ground_actions(problem)?;
        let goal = Expr::and(problem.goals().cloned());
        let initial = problem.initial_state()?;

        let mut visited: BTreeSet<State> = BTreeSet::new();
        let mut frontier: VecDeque<(State, Vec<ActionInstance>)> = VecDeque::new();
        visited.insert(initial.clone());
        frontier.push_back((initial, Vec::new()));

        let mut expanded = 0usize;
        while let Some((state, steps)) = frontier.pop_front() {
            if eval(&goal, &state)?.as_bool()? {
                debug!(expanded, plan_len = steps.len(), "goal reached");
                return Ok(PlanGenerationResult {
                    status: PlanGenerationStatus::SolvedOptimally,
                    plan: Some(Plan::Sequential(SequentialPlan::new(steps))),
                    engine_name: ENGINE_NAME.into(),
                });
            }
            expanded += 1;
            if expanded > self.budget {
                debug!(budget = self.budget, "search budget exhausted");
                return Ok(PlanGenerationResult {
                    status: PlanGenerationStatus::UnsolvableIncompletely,
                    plan: None,
                    engine_name: ENGINE_NAME.into(),
                });
            }
            for action in &ground {
                if !eval(&action.precondition, &state)?.as_bool()? {
                    continue;
                }
                let next = match apply_effects(&state, &action.effects) {
                    Ok(next) => next,
                    // Self-conflicting groundings are not applicable.
                    Err(EffectError::Conflict(_)) => continue,
                    Err(EffectError::Eval(e)) => return Err(e.into()),
                };
                if visited.insert(next.clone()) {
                    let mut extended = steps.clone();
                    extended.push(ActionInstance::new(action.id, action.params.clone()));
                    frontier.push_back((next, extended));
                }
            }
        }

        debug!(expanded, "state space exhausted without reaching the goal");
        Ok(PlanGenerationResult {
            status: PlanGenerationStatus::UnsolvableProven,
            plan: None,
            engine_name: ENGINE_NAME.into(),
        })
    }
}

/// Cartesian product of per-parameter object candidates, subtype-aware.
fn bindings(problem: &Problem, action: &InstantaneousAction) -> Vec<BTreeMap<String, Expr>> {
    let mut out = vec![BTreeMap::new()];
    for param in &action.params {
        let candidates: Vec<Expr> = problem
            .objects_of_type(&param.ty)
            .map(|o| Expr::object(&o.name, &o.ty))
            .collect();
        let mut extended = Vec::with_capacity(out.len() * candidates.len());
        for partial in &out {
            for candidate in &candidates {
                let mut binding = partial.clone();
                binding.insert(param.name.clone(), candidate.clone());
                extended.push(binding);
            }
        }
        out = extended;
    }
    out
}

fn instantiate(
    id: ActionId,
    action: &InstantaneousAction,
    binding: &BTreeMap<String, Expr>,
) -> GroundAction {
    let params = action
        .params
        .iter()
        .map(|p| binding[&p.name].clone())
        .collect();
    let precondition = bind_parameters(
        &Expr::and(action.preconditions.iter().cloned()),
        binding,
    );
    let effects = action
        .effects
        .iter()
        .map(|e| Effect {
            fluent: bind_parameters(&e.fluent, binding),
            value: bind_parameters(&e.value, binding),
            condition: bind_parameters(&e.condition, binding),
            kind: e.kind,
        })
        .collect();
    GroundAction {
        id,
        params,
        precondition,
        effects,
    }
}
