//! Instantaneous and durative actions and their effects.

use std::collections::BTreeMap;
use std::fmt;

use crate::expr::Expr;
use crate::timing::{TimeInterval, Timing};
use crate::typing::Parameter;

/// How an effect updates its target fluent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Assign,
    Increase,
    Decrease,
}

/// An assignment to a fluent, optionally guarded by a condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Effect {
    /// The fluent expression being updated.
    pub fluent: Expr,
    /// The value written (or added / subtracted).
    pub value: Expr,
    /// Guard condition; `true` for unconditional effects.
    pub condition: Expr,
    pub kind: EffectKind,
}

impl Effect {
    pub fn assign(fluent: Expr, value: Expr) -> Self {
        Effect {
            fluent,
            value,
            condition: Expr::Bool(true),
            kind: EffectKind::Assign,
        }
    }

    pub fn increase(fluent: Expr, value: Expr) -> Self {
        Effect {
            fluent,
            value,
            condition: Expr::Bool(true),
            kind: EffectKind::Increase,
        }
    }

    pub fn decrease(fluent: Expr, value: Expr) -> Self {
        Effect {
            fluent,
            value,
            condition: Expr::Bool(true),
            kind: EffectKind::Decrease,
        }
    }

    /// Guards the effect with a condition.
    pub fn when(mut self, condition: Expr) -> Self {
        self.condition = condition;
        self
    }

    pub fn is_conditional(&self) -> bool {
        !self.condition.is_true()
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.kind {
            EffectKind::Assign => ":=",
            EffectKind::Increase => "+=",
            EffectKind::Decrease => "-=",
        };
        if self.is_conditional() {
            write!(f, "if {} then {} {} {}", self.condition, self.fluent, op, self.value)
        } else {
            write!(f, "{} {} {}", self.fluent, op, self.value)
        }
    }
}

/// Inclusive bounds on a durative action's duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationInterval {
    pub lower: i64,
    pub upper: i64,
}

impl DurationInterval {
    pub fn fixed(d: i64) -> Self {
        DurationInterval { lower: d, upper: d }
    }

    pub fn between(lower: i64, upper: i64) -> Self {
        DurationInterval { lower, upper }
    }
}

/// An action whose effects apply instantaneously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstantaneousAction {
    pub name: String,
    pub params: Vec<Parameter>,
    pub preconditions: Vec<Expr>,
    pub effects: Vec<Effect>,
}

impl InstantaneousAction {
    pub fn new(name: impl Into<String>) -> Self {
        InstantaneousAction {
            name: name.into(),
            params: Vec::new(),
            preconditions: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.params.push(Parameter::new(name, ty));
        self
    }

    pub fn add_precondition(&mut self, condition: Expr) {
        self.preconditions.push(condition);
    }

    pub fn add_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }
}

/// An action whose conditions and effects are anchored to points within
/// its execution interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurativeAction {
    pub name: String,
    pub params: Vec<Parameter>,
    pub duration: DurationInterval,
    pub conditions: Vec<(TimeInterval, Expr)>,
    /// Effects keyed by their timing anchor.
    pub effects: BTreeMap<Timing, Vec<Effect>>,
}

impl DurativeAction {
    pub fn new(name: impl Into<String>) -> Self {
        DurativeAction {
            name: name.into(),
            params: Vec::new(),
            duration: DurationInterval::fixed(1),
            conditions: Vec::new(),
            effects: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.params.push(Parameter::new(name, ty));
        self
    }

    pub fn with_duration(mut self, duration: DurationInterval) -> Self {
        self.duration = duration;
        self
    }

    pub fn add_condition(&mut self, interval: TimeInterval, condition: Expr) {
        self.conditions.push((interval, condition));
    }

    pub fn add_effect(&mut self, timing: Timing, effect: Effect) {
        self.effects.entry(timing).or_default().push(effect);
    }

    /// Effects anchored at `timing`, empty if none.
    pub fn effects_at(&self, timing: Timing) -> &[Effect] {
        self.effects.get(&timing).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Either flavor of action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Instantaneous(InstantaneousAction),
    Durative(DurativeAction),
}

impl Action {
    pub fn name(&self) -> &str {
        match self {
            Action::Instantaneous(a) => &a.name,
            Action::Durative(a) => &a.name,
        }
    }

    pub fn params(&self) -> &[Parameter] {
        match self {
            Action::Instantaneous(a) => &a.params,
            Action::Durative(a) => &a.params,
        }
    }

    pub fn is_durative(&self) -> bool {
        matches!(self, Action::Durative(_))
    }

    /// Every condition expression of the action, in declaration order.
    pub fn conditions(&self) -> Vec<&Expr> {
        match self {
            Action::Instantaneous(a) => a.preconditions.iter().collect(),
            Action::Durative(a) => a.conditions.iter().map(|(_, c)| c).collect(),
        }
    }

    /// Every effect of the action, in declaration order.
    pub fn effects(&self) -> Vec<&Effect> {
        match self {
            Action::Instantaneous(a) => a.effects.iter().collect(),
            Action::Durative(a) => a.effects.values().flatten().collect(),
        }
    }
}

impl From<InstantaneousAction> for Action {
    fn from(a: InstantaneousAction) -> Self {
        Action::Instantaneous(a)
    }
}

impl From<DurativeAction> for Action {
    fn from(a: DurativeAction) -> Self {
        Action::Durative(a)
    }
}
