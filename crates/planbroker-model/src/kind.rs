//! Problem kind descriptors: capability vectors classifying which
//! planning constructs a problem uses or an engine supports.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::{Effect, EffectKind};
use crate::expr::Expr;
use crate::problem::Problem;

/// A single planning feature flag.
///
/// Serialized in SCREAMING_SNAKE_CASE; this spelling is the declared
/// configuration surface for engine capability manifests.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Feature {
    ExistentialConditions,
    UniversalConditions,
    DisjunctiveConditions,
    NegativeConditions,
    EqualityConditions,
    ConditionalEffects,
    IncreaseEffects,
    DecreaseEffects,
    TimedEffects,
    TimedGoals,
    DurativeActions,
    ContinuousTime,
    NumericFluents,
    HierarchicalTyping,
}

/// A set of feature flags.
///
/// Union only ever adds flags; subset comparison is the basis of
/// capability matching in the engine selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemKind {
    flags: BTreeSet<Feature>,
}

impl ProblemKind {
    /// The empty descriptor (trivially supported by any engine).
    pub fn empty() -> Self {
        ProblemKind::default()
    }

    pub fn has(&self, feature: Feature) -> bool {
        self.flags.contains(&feature)
    }

    pub fn insert(&mut self, feature: Feature) {
        self.flags.insert(feature);
    }

    /// Flag-wise set union.
    pub fn union(&self, other: &ProblemKind) -> ProblemKind {
        ProblemKind {
            flags: self.flags.union(&other.flags).copied().collect(),
        }
    }

    /// True if every flag of `self` is also in `other`.
    pub fn is_subset_of(&self, other: &ProblemKind) -> bool {
        self.flags.is_subset(&other.flags)
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn features(&self) -> impl Iterator<Item = Feature> + '_ {
        self.flags.iter().copied()
    }

    pub fn has_existential_conditions(&self) -> bool {
        self.has(Feature::ExistentialConditions)
    }

    pub fn has_universal_conditions(&self) -> bool {
        self.has(Feature::UniversalConditions)
    }

    pub fn has_disjunctive_conditions(&self) -> bool {
        self.has(Feature::DisjunctiveConditions)
    }

    pub fn has_negative_conditions(&self) -> bool {
        self.has(Feature::NegativeConditions)
    }

    pub fn has_conditional_effects(&self) -> bool {
        self.has(Feature::ConditionalEffects)
    }

    pub fn has_continuous_time(&self) -> bool {
        self.has(Feature::ContinuousTime)
    }

    pub fn has_numeric_fluents(&self) -> bool {
        self.has(Feature::NumericFluents)
    }

    pub fn has_hierarchical_typing(&self) -> bool {
        self.has(Feature::HierarchicalTyping)
    }

    /// Computes the descriptor of a problem by walking every condition,
    /// effect, goal and timing construct.
    ///
    /// Pure function; a problem with no actions and no goals yields the
    /// empty descriptor.
    pub fn of(problem: &Problem) -> ProblemKind {
        let mut kind = ProblemKind::empty();

        if problem.user_types().any(|t| t.parent.is_some()) {
            kind.insert(Feature::HierarchicalTyping);
        }

        for goal in problem.goals() {
            walk_condition(goal, &mut kind);
        }
        for (_, goal) in problem.timed_goals() {
            kind.insert(Feature::TimedGoals);
            kind.insert(Feature::ContinuousTime);
            walk_condition(goal, &mut kind);
        }
        for (_, effect) in problem.timed_effects() {
            kind.insert(Feature::TimedEffects);
            kind.insert(Feature::ContinuousTime);
            walk_effect(effect, &mut kind);
        }

        for action in problem.actions() {
            if action.is_durative() {
                kind.insert(Feature::DurativeActions);
                kind.insert(Feature::ContinuousTime);
            }
            for condition in action.conditions() {
                walk_condition(condition, &mut kind);
            }
            for effect in action.effects() {
                walk_effect(effect, &mut kind);
            }
        }

        kind
    }
}

impl FromIterator<Feature> for ProblemKind {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        ProblemKind {
            flags: iter.into_iter().collect(),
        }
    }
}

impl Extend<Feature> for ProblemKind {
    fn extend<I: IntoIterator<Item = Feature>>(&mut self, iter: I) {
        self.flags.extend(iter);
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, flag) in self.flags.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", flag)?;
        }
        write!(f, "}}")
    }
}

fn walk_effect(effect: &Effect, kind: &mut ProblemKind) {
    match effect.kind {
        EffectKind::Increase => {
            kind.insert(Feature::IncreaseEffects);
            kind.insert(Feature::NumericFluents);
        }
        EffectKind::Decrease => {
            kind.insert(Feature::DecreaseEffects);
            kind.insert(Feature::NumericFluents);
        }
        EffectKind::Assign => {}
    }
    if effect.is_conditional() {
        kind.insert(Feature::ConditionalEffects);
        walk_condition(&effect.condition, kind);
    }
    walk_value(&effect.value, kind);
}

fn walk_condition(expr: &Expr, kind: &mut ProblemKind) {
    match expr {
        Expr::Exists { body, .. } => {
            kind.insert(Feature::ExistentialConditions);
            walk_condition(body, kind);
        }
        Expr::Forall { body, .. } => {
            kind.insert(Feature::UniversalConditions);
            walk_condition(body, kind);
        }
        Expr::Or(es) => {
            kind.insert(Feature::DisjunctiveConditions);
            for e in es {
                walk_condition(e, kind);
            }
        }
        Expr::And(es) => {
            for e in es {
                walk_condition(e, kind);
            }
        }
        Expr::Not(e) => {
            kind.insert(Feature::NegativeConditions);
            walk_condition(e, kind);
        }
        Expr::Eq(l, r) => {
            kind.insert(Feature::EqualityConditions);
            walk_value(l, kind);
            walk_value(r, kind);
        }
        Expr::Lt(l, r) | Expr::Le(l, r) => {
            kind.insert(Feature::NumericFluents);
            walk_value(l, kind);
            walk_value(r, kind);
        }
        Expr::Bool(_)
        | Expr::Int(_)
        | Expr::Fluent { .. }
        | Expr::Param(_)
        | Expr::Var(_)
        | Expr::Object { .. }
        | Expr::Add(..)
        | Expr::Sub(..) => walk_value(expr, kind),
    }
}

fn walk_value(expr: &Expr, kind: &mut ProblemKind) {
    match expr {
        Expr::Int(_) => kind.insert(Feature::NumericFluents),
        Expr::Add(l, r) | Expr::Sub(l, r) => {
            kind.insert(Feature::NumericFluents);
            walk_value(l, kind);
            walk_value(r, kind);
        }
        Expr::Fluent { args, .. } => {
            for a in args {
                walk_value(a, kind);
            }
        }
        // A boolean-valued value (a quantified formula assigned to a
        // boolean fluent, say) carries the same flags as a condition.
        Expr::Exists { .. }
        | Expr::Forall { .. }
        | Expr::Not(_)
        | Expr::And(_)
        | Expr::Or(_)
        | Expr::Eq(..)
        | Expr::Lt(..)
        | Expr::Le(..) => walk_condition(expr, kind),
        Expr::Bool(_) | Expr::Param(_) | Expr::Var(_) | Expr::Object { .. } => {}
    }
}

#[cfg(test)]
mod tests;
