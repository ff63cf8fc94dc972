//! Engine capability manifests for planbroker.
//!
//! A manifest declares, per engine, the role it serves, the problem
//! features it supports and the optimality guarantees it honors.
//! Manifests load from TOML or YAML and turn into the capability
//! records the engine registry selects against, so capability data can
//! change without code changes.
//!
//! # Examples
//!
//! ```
//! use planbroker_config::EngineManifest;
//! use planbroker_engines::Role;
//!
//! let manifest = EngineManifest::from_toml_str(r#"
//!     [[engines]]
//!     role = "oneshot_planner"
//!     name = "bfs"
//!     features = ["DISJUNCTIVE_CONDITIONS", "NEGATIVE_CONDITIONS"]
//!     guarantees = ["solved_optimally"]
//!
//!     [[engines]]
//!     role = "plan_validator"
//!     name = "sequential-simulator"
//!     features = ["NEGATIVE_CONDITIONS"]
//! "#).unwrap();
//!
//! assert_eq!(manifest.engines.len(), 2);
//! assert_eq!(manifest.records(Role::OneshotPlanner).count(), 1);
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use planbroker_engines::{CapabilityRecord, OptimalityGuarantee, Role};
use planbroker_model::{Feature, ProblemKind};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid manifest: {0}")]
    Invalid(String),
}

/// A declared engine: its role, name and capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineDecl {
    pub role: Role,
    pub name: String,

    /// Problem features the engine supports.
    #[serde(default)]
    pub features: BTreeSet<Feature>,

    /// Optimality guarantees the engine honors.
    #[serde(default)]
    pub guarantees: BTreeSet<OptimalityGuarantee>,
}

impl EngineDecl {
    /// The supported problem kind built from the declared features.
    pub fn supported_kind(&self) -> ProblemKind {
        self.features.iter().copied().collect()
    }

    /// The capability record the registry selects against.
    pub fn record(&self) -> CapabilityRecord {
        let mut record = CapabilityRecord::new(&self.name, self.supported_kind());
        for guarantee in &self.guarantees {
            record = record.with_guarantee(*guarantee);
        }
        record
    }
}

/// A collection of engine declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineManifest {
    #[serde(default)]
    pub engines: Vec<EngineDecl>,
}

impl EngineManifest {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a manifest, picking the format from the file extension
    /// (`.yaml`/`.yml` parse as YAML, anything else as TOML).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads a manifest from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses a manifest from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let manifest: EngineManifest = toml::from_str(s)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Loads a manifest from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses a manifest from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let manifest: EngineManifest = serde_yaml::from_str(s)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Adds an engine declaration.
    pub fn with_engine(mut self, engine: EngineDecl) -> Self {
        self.engines.push(engine);
        self
    }

    /// Declarations for one role, in declaration order.
    pub fn for_role(&self, role: Role) -> impl Iterator<Item = &EngineDecl> {
        self.engines.iter().filter(move |e| e.role == role)
    }

    /// Capability records for one role, in declaration order.
    pub fn records(&self, role: Role) -> impl Iterator<Item = CapabilityRecord> + '_ {
        self.for_role(role).map(EngineDecl::record)
    }

    /// Checks the manifest invariants: engine names must be unique per
    /// role.
    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for engine in &self.engines {
            if !seen.insert((engine.role, engine.name.as_str())) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate engine `{}` for role `{}`",
                    engine.name, engine.role
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
