//! End-to-end broker flows: model, rewrite, select, solve, map back,
//! validate.

use planbroker::prelude::*;
use planbroker::{
    ActionId, BreadthFirstPlanner, DurationInterval, DurativeAction, EngineManifest, Role,
    SelectError, Timing,
};

/// Blocks on a table: `on(b, t)` with a move action, plus a goal that
/// some block sits on `target`, stated with an existential quantifier.
fn blocks_problem() -> Problem {
    let mut problem = Problem::new("blocks");
    problem.add_user_type(UserType::new("Block")).unwrap();
    problem
        .add_fluent(Fluent::bool("clear").with_param("b", "Block"))
        .unwrap();
    problem
        .add_fluent(Fluent::bool("on").with_param("a", "Block").with_param("b", "Block"))
        .unwrap();

    for name in ["b1", "b2", "target"] {
        problem.add_object(Object::new(name, "Block")).unwrap();
    }

    let mut stack = InstantaneousAction::new("stack")
        .with_param("a", "Block")
        .with_param("b", "Block");
    stack.add_precondition(Expr::fluent("clear", [Expr::param("a")]));
    stack.add_precondition(Expr::fluent("clear", [Expr::param("b")]));
    stack.add_precondition(Expr::not(Expr::eq(Expr::param("a"), Expr::param("b"))));
    stack.add_effect(Effect::assign(
        Expr::fluent("on", [Expr::param("a"), Expr::param("b")]),
        Expr::Bool(true),
    ));
    stack.add_effect(Effect::assign(
        Expr::fluent("clear", [Expr::param("b")]),
        Expr::Bool(false),
    ));
    problem.add_action(stack).unwrap();

    for name in ["b1", "b2", "target"] {
        problem
            .set_initial_value(
                Expr::fluent("clear", [Expr::object(name, "Block")]),
                Expr::Bool(true),
            )
            .unwrap();
        for other in ["b1", "b2", "target"] {
            problem
                .set_initial_value(
                    Expr::fluent(
                        "on",
                        [Expr::object(name, "Block"), Expr::object(other, "Block")],
                    ),
                    Expr::Bool(false),
                )
                .unwrap();
        }
    }

    let b = Variable::new("b", "Block");
    problem.add_goal(Expr::exists(
        b.clone(),
        Expr::fluent("on", [Expr::var(b), Expr::object("target", "Block")]),
    ));
    problem
}

#[test]
fn quantified_problem_solves_end_to_end() {
    let problem = blocks_problem();
    let broker = Broker::new();

    let result = broker.solve(&problem, None).unwrap();
    assert!(result.status.is_solved());
    let plan = result.plan.unwrap();
    assert_eq!(plan.len(), 1);

    // The returned plan names the source problem's actions.
    let step = &plan.as_sequential().unwrap().steps[0];
    assert_eq!(problem.action(step.action).unwrap().name(), "stack");

    // And it validates against the source problem.
    let verdict = broker.validate(&problem, &plan).unwrap();
    assert!(verdict.is_valid(), "verdict: {verdict:?}");
}

#[test]
fn optimality_guarantee_can_be_requested() {
    let broker = Broker::new();
    let result = broker
        .solve(&blocks_problem(), Some(OptimalityGuarantee::SolvedOptimally))
        .unwrap();
    assert_eq!(
        result.status,
        planbroker::PlanGenerationStatus::SolvedOptimally
    );
}

#[test]
fn bogus_plans_are_rejected_against_the_source_problem() {
    let problem = blocks_problem();
    let broker = Broker::new();

    // stack(b1, b1) violates the inequality precondition.
    let bad: Plan = planbroker::SequentialPlan::new([planbroker::ActionInstance::new(
        ActionId(0),
        [
            Expr::object("b1", "Block"),
            Expr::object("b1", "Block"),
        ],
    )])
    .into();
    let verdict = broker.validate(&problem, &bad).unwrap();
    assert!(!verdict.is_valid());
}

#[test]
fn temporal_problems_find_no_builtin_engine() {
    let mut problem = Problem::new("temporal");
    problem.add_fluent(Fluent::bool("done")).unwrap();
    problem
        .set_initial_value(Expr::fluent("done", []), Expr::Bool(false))
        .unwrap();

    let mut wait = DurativeAction::new("wait").with_duration(DurationInterval::fixed(5));
    wait.add_effect(
        Timing::end(),
        Effect::assign(Expr::fluent("done", []), Expr::Bool(true)),
    );
    problem.add_action(wait).unwrap();
    problem.add_goal(Expr::fluent("done", []));

    let broker = Broker::new();
    let err = broker.solve(&problem, None).unwrap_err();
    assert!(matches!(
        err,
        BrokerError::Select(SelectError::NoMatch(Role::OneshotPlanner))
    ));
}

#[test]
fn empty_registry_is_a_configuration_error() {
    let broker = Broker::with_registry(EngineRegistry::new());
    let err = broker.solve(&blocks_problem(), None).unwrap_err();
    assert!(matches!(
        err,
        BrokerError::Select(SelectError::NotRegistered(Role::OneshotPlanner))
    ));
}

#[test]
fn manifest_records_can_back_a_broker() {
    let manifest = EngineManifest::from_toml_str(
        r#"
[[engines]]
role = "oneshot_planner"
name = "manifest-bfs"
features = [
    "DISJUNCTIVE_CONDITIONS",
    "NEGATIVE_CONDITIONS",
    "EQUALITY_CONDITIONS",
    "CONDITIONAL_EFFECTS",
]
guarantees = ["solved_optimally"]
"#,
    )
    .unwrap();

    let mut registry = EngineRegistry::new();
    for record in manifest.records(Role::OneshotPlanner) {
        registry.register_planner(record, || Box::new(BreadthFirstPlanner::new()));
    }

    let broker = Broker::with_registry(registry);
    let result = broker.solve(&blocks_problem(), None).unwrap();
    assert!(result.status.is_solved());
}
