//! Planbroker - planning problem modeling, transformation and engine
//! brokering.
//!
//! Model a planning problem once, then let the broker pick a compatible
//! engine for it: quantified problems are rewritten into quantifier-free
//! form, the registry selects a planner whose declared capabilities
//! cover the problem's kind, and returned plans are mapped back to the
//! original problem's actions.
//!
//! # Example
//!
//! ```
//! use planbroker::prelude::*;
//!
//! let mut problem = Problem::new("light");
//! problem.add_fluent(Fluent::bool("lit")).unwrap();
//! problem
//!     .set_initial_value(Expr::fluent("lit", []), Expr::Bool(false))
//!     .unwrap();
//! let mut switch = InstantaneousAction::new("switch");
//! switch.add_effect(Effect::assign(Expr::fluent("lit", []), Expr::Bool(true)));
//! problem.add_action(switch).unwrap();
//! problem.add_goal(Expr::fluent("lit", []));
//!
//! let broker = Broker::new();
//! let result = broker.solve(&problem, None).unwrap();
//! assert!(result.status.is_solved());
//! ```

mod broker;

pub use broker::{Broker, BrokerError};

// Modeling types
pub use planbroker_model::{
    Action, ActionId, ActionInstance, DurationInterval, DurativeAction, Effect, EffectKind,
    EvalError, Expr, Feature, Fluent, InstantaneousAction, ModelError, Object, Parameter,
    Plan, Problem, ProblemKind, SequentialPlan, State, TimeInterval, TimeTriggeredPlan,
    TimedStep, Timepoint, Timing, UserType, ValueType, Variable,
};

// Transformers
pub use planbroker_transform::{ProblemTransformer, QuantifierEliminator, TransformError};

// Engine interfaces, registry and built-in engines
pub use planbroker_engines::{
    BreadthFirstPlanner, CapabilityRecord, EngineError, EngineRegistry, OneshotPlanner,
    OptimalityGuarantee, PlanGenerationResult, PlanGenerationStatus, PlanValidator, Role,
    SelectError, Selected, Selection, SequentialSimulator, ValidationResult,
};

// Capability manifests
pub use planbroker_config::{ConfigError, EngineDecl, EngineManifest};

/// Installs a `tracing` subscriber reading the `RUST_LOG` environment
/// variable. Does nothing if a subscriber is already set.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

pub mod prelude {
    pub use super::{
        Broker, BrokerError, Effect, EngineRegistry, Expr, Fluent, InstantaneousAction,
        Object, OptimalityGuarantee, Plan, Problem, ProblemTransformer, QuantifierEliminator,
        UserType, ValidationResult, Variable,
    };
}
