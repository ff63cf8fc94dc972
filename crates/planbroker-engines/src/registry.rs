//! Capability records, the engine registry and the selector.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use planbroker_model::ProblemKind;

use crate::error::SelectError;
use crate::traits::{OneshotPlanner, OptimalityGuarantee, PlanValidator};

/// Logical role an engine is registered under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    OneshotPlanner,
    PlanValidator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::OneshotPlanner => write!(f, "oneshot_planner"),
            Role::PlanValidator => write!(f, "plan_validator"),
        }
    }
}

/// Declared capabilities of a registered engine. Immutable once
/// registered.
///
/// An engine can handle every problem whose kind descriptor is a subset
/// of `supported_kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityRecord {
    pub name: String,
    pub supported_kind: ProblemKind,
    pub guarantees: BTreeSet<OptimalityGuarantee>,
}

impl CapabilityRecord {
    pub fn new(name: impl Into<String>, supported_kind: ProblemKind) -> Self {
        CapabilityRecord {
            name: name.into(),
            supported_kind,
            guarantees: BTreeSet::new(),
        }
    }

    pub fn with_guarantee(mut self, guarantee: OptimalityGuarantee) -> Self {
        self.guarantees.insert(guarantee);
        self
    }

    /// True if this record satisfies the request filter.
    pub fn supports(
        &self,
        kind: Option<&ProblemKind>,
        guarantee: Option<OptimalityGuarantee>,
    ) -> bool {
        let kind_ok = kind.map_or(true, |k| k.is_subset_of(&self.supported_kind));
        let guarantee_ok = guarantee.map_or(true, |g| self.guarantees.contains(&g));
        kind_ok && guarantee_ok
    }
}

/// Outcome of a selection request.
///
/// Total tagged result: callers branch on the variant instead of
/// catching errors. `NotRegistered` is a configuration error (the role
/// has no records at all); `NoMatch` means records exist but none
/// satisfies the filter.
#[derive(Debug)]
pub enum Selection<T> {
    Found(T),
    NotRegistered,
    NoMatch,
}

impl<T> Selection<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Selection::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Selection::Found(t) => Some(t),
            _ => None,
        }
    }

    /// Converts the tagged outcome into a `Result` for callers that
    /// treat both kinds of absence as failures.
    pub fn into_result(self, role: Role) -> Result<T, SelectError> {
        match self {
            Selection::Found(t) => Ok(t),
            Selection::NotRegistered => Err(SelectError::NotRegistered(role)),
            Selection::NoMatch => Err(SelectError::NoMatch(role)),
        }
    }
}

/// A freshly acquired engine together with the record name it was
/// selected under. Dropping it releases the engine.
pub struct Selected<E> {
    pub name: String,
    pub engine: E,
}

type PlannerFactory = Box<dyn Fn() -> Box<dyn OneshotPlanner> + Send + Sync>;
type ValidatorFactory = Box<dyn Fn() -> Box<dyn PlanValidator> + Send + Sync>;

struct Entry<F> {
    record: CapabilityRecord,
    factory: F,
}

/// Registry of named engine implementations per role, in registration
/// order.
///
/// Populated once at startup and read-only thereafter; selection never
/// mutates records, so concurrent readers need no locking. Earlier
/// registrations win ties: the first compatible record in registration
/// order is selected.
#[derive(Default)]
pub struct EngineRegistry {
    planners: Vec<Entry<PlannerFactory>>,
    validators: Vec<Entry<ValidatorFactory>>,
}

impl EngineRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        EngineRegistry::default()
    }

    /// Creates a registry pre-populated with the built-in engines.
    pub fn with_builtin_engines() -> Self {
        let mut registry = EngineRegistry::new();
        crate::builtin::register(&mut registry);
        registry
    }

    pub fn register_planner(
        &mut self,
        record: CapabilityRecord,
        factory: impl Fn() -> Box<dyn OneshotPlanner> + Send + Sync + 'static,
    ) {
        info!(role = %Role::OneshotPlanner, name = %record.name, "registering engine");
        self.planners.push(Entry {
            record,
            factory: Box::new(factory),
        });
    }

    pub fn register_validator(
        &mut self,
        record: CapabilityRecord,
        factory: impl Fn() -> Box<dyn PlanValidator> + Send + Sync + 'static,
    ) {
        info!(role = %Role::PlanValidator, name = %record.name, "registering engine");
        self.validators.push(Entry {
            record,
            factory: Box::new(factory),
        });
    }

    /// Selects a planner compatible with the requested problem kind and
    /// optimality guarantee.
    ///
    /// Deterministic: with a fixed registration order the same request
    /// always yields the same engine.
    pub fn planner(
        &self,
        kind: Option<&ProblemKind>,
        guarantee: Option<OptimalityGuarantee>,
    ) -> Selection<Selected<Box<dyn OneshotPlanner>>> {
        select(&self.planners, Role::OneshotPlanner, kind, guarantee)
    }

    /// Selects a validator compatible with the requested problem kind.
    pub fn validator(
        &self,
        kind: Option<&ProblemKind>,
        guarantee: Option<OptimalityGuarantee>,
    ) -> Selection<Selected<Box<dyn PlanValidator>>> {
        select(&self.validators, Role::PlanValidator, kind, guarantee)
    }

    /// True if some planner record satisfies the filter.
    pub fn has_planner_for(
        &self,
        kind: Option<&ProblemKind>,
        guarantee: Option<OptimalityGuarantee>,
    ) -> bool {
        self.planners.iter().any(|e| e.record.supports(kind, guarantee))
    }

    /// True if some validator record satisfies the filter.
    pub fn has_validator_for(
        &self,
        kind: Option<&ProblemKind>,
        guarantee: Option<OptimalityGuarantee>,
    ) -> bool {
        self.validators
            .iter()
            .any(|e| e.record.supports(kind, guarantee))
    }

    /// The capability records registered under `role`, in registration
    /// order.
    pub fn records(&self, role: Role) -> impl Iterator<Item = &CapabilityRecord> {
        let entries: Box<dyn Iterator<Item = &CapabilityRecord>> = match role {
            Role::OneshotPlanner => Box::new(self.planners.iter().map(|e| &e.record)),
            Role::PlanValidator => Box::new(self.validators.iter().map(|e| &e.record)),
        };
        entries
    }
}

fn select<E>(
    entries: &[Entry<Box<dyn Fn() -> E + Send + Sync>>],
    role: Role,
    kind: Option<&ProblemKind>,
    guarantee: Option<OptimalityGuarantee>,
) -> Selection<Selected<E>> {
    if entries.is_empty() {
        debug!(%role, "no engine registered");
        return Selection::NotRegistered;
    }
    for entry in entries {
        if entry.record.supports(kind, guarantee) {
            debug!(%role, name = %entry.record.name, "selected engine");
            return Selection::Found(Selected {
                name: entry.record.name.clone(),
                engine: (entry.factory)(),
            });
        }
    }
    debug!(%role, "no compatible engine");
    Selection::NoMatch
}
