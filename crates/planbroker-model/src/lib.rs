//! Planbroker Model - Solver-independent planning problem representation
//!
//! This crate provides the fundamental abstractions for planbroker:
//! - Typed expression trees over fluents, objects and bound variables
//! - Instantaneous and durative actions with timed effects
//! - Problems with declaration tables and a stable action arena
//! - Problem kind descriptors classifying the constructs a problem uses
//! - Ground evaluation of quantifier-free expressions against a state

pub mod action;
pub mod error;
pub mod eval;
pub mod expr;
pub mod fluent;
pub mod kind;
pub mod plan;
pub mod problem;
pub mod timing;
pub mod typing;

pub use action::{Action, DurationInterval, DurativeAction, Effect, EffectKind, InstantaneousAction};
pub use error::ModelError;
pub use eval::{EvalError, State, Value};
pub use expr::{bind_parameters, substitute, Expr};
pub use fluent::{Fluent, ValueType};
pub use kind::{Feature, ProblemKind};
pub use plan::{ActionInstance, Plan, SequentialPlan, TimeTriggeredPlan, TimedStep};
pub use problem::{ActionId, Problem};
pub use timing::{TimeInterval, Timepoint, Timing};
pub use typing::{Object, Parameter, UserType, Variable};
