//! Quantifier elimination over finite object domains.

use std::cell::OnceCell;
use std::collections::BTreeMap;

use planbroker_model::{
    substitute, Action, ActionId, DurativeAction, Effect, Expr, InstantaneousAction, Plan,
    Problem, SequentialPlan, TimeTriggeredPlan, TimedStep,
};

use crate::error::TransformError;
use crate::ProblemTransformer;

/// Rewrites a problem containing quantified conditions into an
/// equivalent quantifier-free problem, and maps plans for the rewritten
/// problem back to plans for the original.
///
/// `Exists(e, v)` becomes the disjunction of `e` with `v` substituted by
/// every object of `v`'s type; `Forall` the analogous conjunction. An
/// empty object domain collapses `Exists` to `false` and `Forall` to
/// `true`. Quantifiers in conditional-effect guards are eliminated in
/// place, so every source action maps to exactly one rewritten action.
///
/// The transformer has two states: unbuilt and built. The first call to
/// any operation builds the rewritten problem and the bidirectional
/// action map; both are memoized and never rebuilt.
pub struct QuantifierEliminator {
    source: Problem,
    built: OnceCell<Built>,
}

struct Built {
    problem: Problem,
    /// Source action id to the rewritten actions it expanded into.
    /// Always a singleton list for this transformer; kept as a list so
    /// the map shape survives transformers that do case-split.
    forward: BTreeMap<ActionId, Vec<ActionId>>,
    /// Rewritten action id back to its originating source action.
    inverse: BTreeMap<ActionId, ActionId>,
}

impl QuantifierEliminator {
    /// Creates an unbuilt eliminator holding `source` immutably.
    pub fn new(source: Problem) -> Self {
        QuantifierEliminator {
            source,
            built: OnceCell::new(),
        }
    }

    /// The ordered rewritten actions a source action expanded into.
    pub fn transformed_actions(&self, action: ActionId) -> Result<&[ActionId], TransformError> {
        let built = self.built()?;
        built
            .forward
            .get(&action)
            .map(Vec::as_slice)
            .ok_or(TransformError::UnknownSourceAction(action))
    }

    /// Maps a plan for the source problem onto the rewritten problem.
    ///
    /// The forward direction of [`ProblemTransformer::rewrite_back_plan`];
    /// well defined because this transformer maps every source action to
    /// exactly one rewritten action.
    pub fn rewrite_plan(&self, plan: &Plan) -> Result<Plan, TransformError> {
        let built = self.built()?;
        match plan {
            Plan::Sequential(p) => {
                let mut steps = Vec::with_capacity(p.steps.len());
                for step in &p.steps {
                    steps.push(step.with_action(self.map_forward(built, step.action)?));
                }
                Ok(SequentialPlan { steps }.into())
            }
            Plan::TimeTriggered(p) => {
                let mut steps = Vec::with_capacity(p.steps.len());
                for step in &p.steps {
                    steps.push(TimedStep {
                        start: step.start,
                        instance: step
                            .instance
                            .with_action(self.map_forward(built, step.instance.action)?),
                        duration: step.duration,
                    });
                }
                Ok(TimeTriggeredPlan { steps }.into())
            }
        }
    }

    fn built(&self) -> Result<&Built, TransformError> {
        if let Some(built) = self.built.get() {
            return Ok(built);
        }
        // Build is all-or-nothing: on error the cell stays empty and no
        // partial problem escapes.
        let built = self.build()?;
        Ok(self.built.get_or_init(|| built))
    }

    fn build(&self) -> Result<Built, TransformError> {
        let mut problem = Problem::new(format!("{}_unquantified", self.source.name()));

        for ty in self.source.user_types() {
            problem.add_user_type(ty.clone())?;
        }
        for fluent in self.source.fluents() {
            problem.add_fluent(fluent.clone())?;
        }
        for object in self.source.objects() {
            problem.add_object(object.clone())?;
        }
        for (fluent, value) in self.source.initial_values() {
            problem.set_initial_value(fluent.clone(), value.clone())?;
        }

        let mut forward = BTreeMap::new();
        let mut inverse = BTreeMap::new();
        for source_id in self.source.action_ids() {
            let action = self.source.action(source_id)?;
            let rewritten_id = problem.add_action(self.transform_action(action)?)?;
            forward.insert(source_id, vec![rewritten_id]);
            inverse.insert(rewritten_id, source_id);
        }

        for goal in self.source.goals() {
            problem.add_goal(self.eliminate(goal)?);
        }
        for (interval, goal) in self.source.timed_goals() {
            problem.add_timed_goal(*interval, self.eliminate(goal)?);
        }
        for (timing, effect) in self.source.timed_effects() {
            problem.add_timed_effect(*timing, self.transform_effect(effect)?)?;
        }

        tracing::debug!(
            source = self.source.name(),
            actions = problem.action_count(),
            goals = self.source.goals().count(),
            "built quantifier-free problem"
        );

        Ok(Built {
            problem,
            forward,
            inverse,
        })
    }

    fn transform_action(&self, action: &Action) -> Result<Action, TransformError> {
        match action {
            Action::Instantaneous(a) => {
                let mut out = InstantaneousAction::new(a.name.clone());
                out.params = a.params.clone();
                for pre in &a.preconditions {
                    out.add_precondition(self.eliminate(pre)?);
                }
                for effect in &a.effects {
                    out.add_effect(self.transform_effect(effect)?);
                }
                Ok(out.into())
            }
            Action::Durative(a) => {
                let mut out = DurativeAction::new(a.name.clone()).with_duration(a.duration);
                out.params = a.params.clone();
                for (interval, condition) in &a.conditions {
                    out.add_condition(*interval, self.eliminate(condition)?);
                }
                // Per-anchor processing: the anchor key is preserved
                // unchanged, each effect condition is eliminated.
                for (timing, effects) in &a.effects {
                    for effect in effects {
                        out.add_effect(*timing, self.transform_effect(effect)?);
                    }
                }
                Ok(out.into())
            }
        }
    }

    fn transform_effect(&self, effect: &Effect) -> Result<Effect, TransformError> {
        Ok(Effect {
            fluent: effect.fluent.clone(),
            value: self.eliminate(&effect.value)?,
            condition: self.eliminate(&effect.condition)?,
            kind: effect.kind,
        })
    }

    /// Recursively replaces quantifiers with flattened disjunctions and
    /// conjunctions over the bound variable's object domain.
    fn eliminate(&self, expr: &Expr) -> Result<Expr, TransformError> {
        match expr {
            Expr::Exists { var, body } => {
                self.check_domain(var)?;
                let mut operands = Vec::new();
                for object in self.source.objects_of_type(&var.ty) {
                    let term = Expr::object(object.name.clone(), object.ty.clone());
                    operands.push(self.eliminate(&substitute(body, var, &term))?);
                }
                Ok(Expr::or(operands))
            }
            Expr::Forall { var, body } => {
                self.check_domain(var)?;
                let mut operands = Vec::new();
                for object in self.source.objects_of_type(&var.ty) {
                    let term = Expr::object(object.name.clone(), object.ty.clone());
                    operands.push(self.eliminate(&substitute(body, var, &term))?);
                }
                Ok(Expr::and(operands))
            }
            Expr::Not(e) => Ok(Expr::not(self.eliminate(e)?)),
            Expr::And(es) => {
                let parts: Result<Vec<_>, _> = es.iter().map(|e| self.eliminate(e)).collect();
                Ok(Expr::and(parts?))
            }
            Expr::Or(es) => {
                let parts: Result<Vec<_>, _> = es.iter().map(|e| self.eliminate(e)).collect();
                Ok(Expr::or(parts?))
            }
            Expr::Eq(l, r) => Ok(Expr::eq(self.eliminate(l)?, self.eliminate(r)?)),
            Expr::Lt(l, r) => Ok(Expr::lt(self.eliminate(l)?, self.eliminate(r)?)),
            Expr::Le(l, r) => Ok(Expr::le(self.eliminate(l)?, self.eliminate(r)?)),
            Expr::Add(l, r) => Ok(Expr::add(self.eliminate(l)?, self.eliminate(r)?)),
            Expr::Sub(l, r) => Ok(Expr::sub(self.eliminate(l)?, self.eliminate(r)?)),
            // Non-quantified leaves are left untouched.
            Expr::Bool(_)
            | Expr::Int(_)
            | Expr::Fluent { .. }
            | Expr::Param(_)
            | Expr::Var(_)
            | Expr::Object { .. } => Ok(expr.clone()),
        }
    }

    /// An undeclared variable type is malformed input; a declared type
    /// with zero objects is a legal empty domain.
    fn check_domain(&self, var: &planbroker_model::Variable) -> Result<(), TransformError> {
        if self.source.has_user_type(&var.ty) {
            Ok(())
        } else {
            Err(TransformError::UndeclaredType {
                variable: var.name.clone(),
                ty: var.ty.clone(),
            })
        }
    }

    fn map_forward(&self, built: &Built, action: ActionId) -> Result<ActionId, TransformError> {
        match built.forward.get(&action).map(Vec::as_slice) {
            Some([id]) => Ok(*id),
            _ => Err(TransformError::UnknownSourceAction(action)),
        }
    }

    fn map_back(&self, built: &Built, action: ActionId) -> Result<ActionId, TransformError> {
        built
            .inverse
            .get(&action)
            .copied()
            .ok_or(TransformError::ForeignAction(action))
    }
}

impl ProblemTransformer for QuantifierEliminator {
    fn source(&self) -> &Problem {
        &self.source
    }

    fn rewritten_problem(&self) -> Result<&Problem, TransformError> {
        Ok(&self.built()?.problem)
    }

    fn rewrite_back_plan(&self, plan: &Plan) -> Result<Plan, TransformError> {
        let built = self.built()?;
        match plan {
            Plan::Sequential(p) => {
                let mut steps = Vec::with_capacity(p.steps.len());
                for step in &p.steps {
                    steps.push(step.with_action(self.map_back(built, step.action)?));
                }
                Ok(SequentialPlan { steps }.into())
            }
            Plan::TimeTriggered(p) => {
                let mut steps = Vec::with_capacity(p.steps.len());
                for step in &p.steps {
                    steps.push(TimedStep {
                        start: step.start,
                        instance: step.instance.with_action(self.map_back(built, step.instance.action)?),
                        duration: step.duration,
                    });
                }
                Ok(TimeTriggeredPlan { steps }.into())
            }
        }
    }
}
