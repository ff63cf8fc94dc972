//! Plans: ordered or timed sequences of grounded action applications.

use std::fmt;

use smallvec::SmallVec;

use crate::expr::Expr;
use crate::problem::ActionId;

/// A grounded application of an action: the action's id plus actual
/// parameters (ground object or integer expressions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionInstance {
    pub action: ActionId,
    pub params: SmallVec<[Expr; 4]>,
}

impl ActionInstance {
    pub fn new(action: ActionId, params: impl IntoIterator<Item = Expr>) -> Self {
        ActionInstance {
            action,
            params: params.into_iter().collect(),
        }
    }

    /// The same instance re-pointed at another action id, parameters kept.
    pub fn with_action(&self, action: ActionId) -> Self {
        ActionInstance {
            action,
            params: self.params.clone(),
        }
    }
}

impl fmt::Display for ActionInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.action)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, ")")
    }
}

/// A totally ordered plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequentialPlan {
    pub steps: Vec<ActionInstance>,
}

impl SequentialPlan {
    pub fn new(steps: impl IntoIterator<Item = ActionInstance>) -> Self {
        SequentialPlan {
            steps: steps.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// One step of a time-triggered plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedStep {
    pub start: i64,
    pub instance: ActionInstance,
    /// `None` for instantaneous actions.
    pub duration: Option<i64>,
}

/// A plan whose steps carry absolute start times and durations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeTriggeredPlan {
    pub steps: Vec<TimedStep>,
}

/// Either flavor of plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Sequential(SequentialPlan),
    TimeTriggered(TimeTriggeredPlan),
}

impl Plan {
    pub fn len(&self) -> usize {
        match self {
            Plan::Sequential(p) => p.steps.len(),
            Plan::TimeTriggered(p) => p.steps.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_sequential(&self) -> Option<&SequentialPlan> {
        match self {
            Plan::Sequential(p) => Some(p),
            Plan::TimeTriggered(_) => None,
        }
    }
}

impl From<SequentialPlan> for Plan {
    fn from(p: SequentialPlan) -> Self {
        Plan::Sequential(p)
    }
}

impl From<TimeTriggeredPlan> for Plan {
    fn from(p: TimeTriggeredPlan) -> Self {
        Plan::TimeTriggered(p)
    }
}
