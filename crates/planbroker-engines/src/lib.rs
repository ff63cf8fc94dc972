//! Engine registry and capability-based selection for planbroker.
//!
//! Engines declare the problem kinds they support and the optimality
//! guarantees they can honor; the registry filters registered records
//! against a problem's kind descriptor and hands out a fresh engine
//! instance per acquisition. Selection is a total function returning a
//! tagged [`Selection`], so callers branch on an explicit outcome
//! instead of catching errors.

pub mod builtin;
pub mod error;
pub mod registry;
pub mod traits;

pub use builtin::{BreadthFirstPlanner, SequentialSimulator};
pub use error::{EngineError, SelectError};
pub use registry::{CapabilityRecord, EngineRegistry, Role, Selected, Selection};
pub use traits::{
    OneshotPlanner, OptimalityGuarantee, PlanGenerationResult, PlanGenerationStatus,
    PlanValidator, ValidationResult,
};
