//! Tests for manifest parsing and validation.

use super::*;

use planbroker_engines::EngineRegistry;

const MANIFEST_TOML: &str = r#"
[[engines]]
role = "oneshot_planner"
name = "external-planner"
features = [
    "DISJUNCTIVE_CONDITIONS",
    "NEGATIVE_CONDITIONS",
    "CONDITIONAL_EFFECTS",
]
guarantees = ["satisficing", "solved_optimally"]

[[engines]]
role = "plan_validator"
name = "external-validator"
features = ["NEGATIVE_CONDITIONS"]
"#;

#[test]
fn parses_a_toml_manifest() {
    let manifest = EngineManifest::from_toml_str(MANIFEST_TOML).unwrap();
    assert_eq!(manifest.engines.len(), 2);

    let planner = manifest.for_role(Role::OneshotPlanner).next().unwrap();
    assert_eq!(planner.name, "external-planner");
    assert!(planner.guarantees.contains(&OptimalityGuarantee::SolvedOptimally));
    assert!(planner.supported_kind().has(Feature::DisjunctiveConditions));

    let validator = manifest.for_role(Role::PlanValidator).next().unwrap();
    assert!(validator.guarantees.is_empty());
}

#[test]
fn parses_a_yaml_manifest() {
    let manifest = EngineManifest::from_yaml_str(
        r#"
engines:
  - role: oneshot_planner
    name: yaml-planner
    features: [EXISTENTIAL_CONDITIONS, UNIVERSAL_CONDITIONS]
"#,
    )
    .unwrap();
    let planner = manifest.for_role(Role::OneshotPlanner).next().unwrap();
    assert!(planner.supported_kind().has(Feature::ExistentialConditions));
    assert!(planner.supported_kind().has(Feature::UniversalConditions));
}

#[test]
fn missing_capability_lists_default_to_empty() {
    let manifest = EngineManifest::from_toml_str(
        r#"
[[engines]]
role = "plan_validator"
name = "bare"
"#,
    )
    .unwrap();
    let decl = &manifest.engines[0];
    assert!(decl.features.is_empty());
    assert!(decl.supported_kind().is_empty());
    assert!(decl.guarantees.is_empty());
}

#[test]
fn duplicate_names_within_a_role_are_invalid() {
    let result = EngineManifest::from_toml_str(
        r#"
[[engines]]
role = "oneshot_planner"
name = "twice"

[[engines]]
role = "oneshot_planner"
name = "twice"
"#,
    );
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn same_name_under_different_roles_is_allowed() {
    let manifest = EngineManifest::from_toml_str(
        r#"
[[engines]]
role = "oneshot_planner"
name = "shared"

[[engines]]
role = "plan_validator"
name = "shared"
"#,
    )
    .unwrap();
    assert_eq!(manifest.engines.len(), 2);
}

#[test]
fn unknown_feature_spellings_are_parse_errors() {
    let result = EngineManifest::from_toml_str(
        r#"
[[engines]]
role = "oneshot_planner"
name = "bad"
features = ["disjunctive_conditions"]
"#,
    );
    assert!(matches!(result, Err(ConfigError::Toml(_))));
}

#[test]
fn records_drive_registry_filtering() {
    let manifest = EngineManifest::from_toml_str(MANIFEST_TOML).unwrap();
    let record = manifest.records(Role::OneshotPlanner).next().unwrap();

    let mut registry = EngineRegistry::new();
    registry.register_planner(record, || {
        Box::new(planbroker_engines::BreadthFirstPlanner::new())
    });

    let classical: ProblemKind = [Feature::NegativeConditions].into_iter().collect();
    assert!(registry.has_planner_for(Some(&classical), None));

    let temporal: ProblemKind = [Feature::DurativeActions].into_iter().collect();
    assert!(!registry.has_planner_for(Some(&temporal), None));
}

#[test]
fn manifest_round_trips_through_toml() {
    let manifest = EngineManifest::from_toml_str(MANIFEST_TOML).unwrap();
    let rendered = toml::to_string(&manifest).unwrap();
    let reparsed = EngineManifest::from_toml_str(&rendered).unwrap();
    assert_eq!(manifest, reparsed);
}
