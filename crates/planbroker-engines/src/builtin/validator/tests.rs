//! Tests for the sequential plan simulator.

use super::*;
use planbroker_model::{
    ActionId, ActionInstance, Expr, Fluent, InstantaneousAction, Object, SequentialPlan,
    TimeTriggeredPlan, UserType,
};

use crate::traits::ValidationResult;

/// One switch, off; `turn_on(s)` requires it off and flips it on.
fn switch_problem() -> (Problem, ActionId) {
    let mut problem = Problem::new("switch");
    problem.add_user_type(UserType::new("Switch")).unwrap();
    problem
        .add_fluent(Fluent::bool("on").with_param("s", "Switch"))
        .unwrap();
    problem.add_object(Object::new("s1", "Switch")).unwrap();
    problem
        .set_initial_value(
            Expr::fluent("on", [Expr::object("s1", "Switch")]),
            Expr::Bool(false),
        )
        .unwrap();

    let mut turn_on = InstantaneousAction::new("turn_on").with_param("s", "Switch");
    turn_on.add_precondition(Expr::not(Expr::fluent("on", [Expr::param("s")])));
    turn_on.add_effect(Effect::assign(
        Expr::fluent("on", [Expr::param("s")]),
        Expr::Bool(true),
    ));
    let id = problem.add_action(turn_on).unwrap();

    problem.add_goal(Expr::fluent("on", [Expr::object("s1", "Switch")]));
    (problem, id)
}

fn step(id: ActionId) -> ActionInstance {
    ActionInstance::new(id, [Expr::object("s1", "Switch")])
}

#[test]
fn accepts_a_valid_plan() {
    let (problem, id) = switch_problem();
    let plan = Plan::Sequential(SequentialPlan::new([step(id)]));
    let mut simulator = SequentialSimulator::new();
    let result = simulator.validate(&problem, &plan).unwrap();
    assert!(result.is_valid());
}

#[test]
fn rejects_a_failed_precondition() {
    let (problem, id) = switch_problem();
    // The second application finds the switch already on.
    let plan = Plan::Sequential(SequentialPlan::new([step(id), step(id)]));
    let mut simulator = SequentialSimulator::new();
    let result = simulator.validate(&problem, &plan).unwrap();
    let ValidationResult::Invalid { reason } = result else {
        panic!("expected an invalid plan");
    };
    assert!(reason.contains("step 2"), "unexpected reason: {reason}");
    assert!(reason.contains("precondition"), "unexpected reason: {reason}");
}

#[test]
fn rejects_an_unsatisfied_goal() {
    let (problem, id) = switch_problem();
    let _ = id;
    let plan = Plan::Sequential(SequentialPlan::default());
    let mut simulator = SequentialSimulator::new();
    let result = simulator.validate(&problem, &plan).unwrap();
    let ValidationResult::Invalid { reason } = result else {
        panic!("expected an invalid plan");
    };
    assert!(reason.contains("goal"), "unexpected reason: {reason}");
}

#[test]
fn rejects_a_wrong_arity_step() {
    let (problem, id) = switch_problem();
    let plan = Plan::Sequential(SequentialPlan::new([ActionInstance::new(id, [])]));
    let mut simulator = SequentialSimulator::new();
    let result = simulator.validate(&problem, &plan).unwrap();
    assert!(!result.is_valid());
}

#[test]
fn refuses_time_triggered_plans() {
    let (problem, _) = switch_problem();
    let plan = Plan::TimeTriggered(TimeTriggeredPlan::default());
    let mut simulator = SequentialSimulator::new();
    let err = simulator.validate(&problem, &plan).unwrap_err();
    assert!(matches!(err, EngineError::UnsupportedPlan { .. }));
}

#[test]
fn effects_of_one_step_read_the_same_snapshot() {
    let mut problem = Problem::new("swap");
    problem.add_fluent(Fluent::bool("p")).unwrap();
    problem.add_fluent(Fluent::bool("q")).unwrap();
    problem
        .set_initial_value(Expr::fluent("p", []), Expr::Bool(true))
        .unwrap();
    problem
        .set_initial_value(Expr::fluent("q", []), Expr::Bool(false))
        .unwrap();

    let mut swap = InstantaneousAction::new("swap");
    swap.add_effect(Effect::assign(Expr::fluent("p", []), Expr::fluent("q", [])));
    swap.add_effect(Effect::assign(Expr::fluent("q", []), Expr::fluent("p", [])));
    let id = problem.add_action(swap).unwrap();

    problem.add_goal(Expr::and([
        Expr::not(Expr::fluent("p", [])),
        Expr::fluent("q", []),
    ]));

    let plan = Plan::Sequential(SequentialPlan::new([ActionInstance::new(id, [])]));
    let mut simulator = SequentialSimulator::new();
    let result = simulator.validate(&problem, &plan).unwrap();
    assert!(result.is_valid());
}

#[test]
fn rejects_conflicting_simultaneous_assignments() {
    let mut problem = Problem::new("conflict");
    problem.add_fluent(Fluent::bool("p")).unwrap();
    problem
        .set_initial_value(Expr::fluent("p", []), Expr::Bool(false))
        .unwrap();

    let mut clash = InstantaneousAction::new("clash");
    clash.add_effect(Effect::assign(Expr::fluent("p", []), Expr::Bool(true)));
    clash.add_effect(Effect::assign(Expr::fluent("p", []), Expr::Bool(false)));
    let id = problem.add_action(clash).unwrap();

    let plan = Plan::Sequential(SequentialPlan::new([ActionInstance::new(id, [])]));
    let mut simulator = SequentialSimulator::new();
    let result = simulator.validate(&problem, &plan).unwrap();
    let ValidationResult::Invalid { reason } = result else {
        panic!("expected an invalid plan");
    };
    assert!(reason.contains("conflicting"), "unexpected reason: {reason}");
}

#[test]
fn increase_overflow_surfaces_as_an_eval_error() {
    use planbroker_model::EvalError;

    let mut problem = Problem::new("overflow");
    problem.add_fluent(Fluent::int("n")).unwrap();
    problem
        .set_initial_value(Expr::fluent("n", []), Expr::Int(i64::MAX))
        .unwrap();

    let mut bump = InstantaneousAction::new("bump");
    bump.add_effect(Effect::increase(Expr::fluent("n", []), Expr::Int(1)));
    let id = problem.add_action(bump).unwrap();

    let plan = Plan::Sequential(SequentialPlan::new([ActionInstance::new(id, [])]));
    let mut simulator = SequentialSimulator::new();
    let err = simulator.validate(&problem, &plan).unwrap_err();
    assert!(matches!(err, EngineError::Eval(EvalError::Overflow)));
}

#[test]
fn decrease_effects_update_numeric_fluents() {
    let mut problem = Problem::new("fuel");
    problem.add_fluent(Fluent::int("fuel")).unwrap();
    problem
        .set_initial_value(Expr::fluent("fuel", []), Expr::Int(2))
        .unwrap();

    let mut burn = InstantaneousAction::new("burn");
    burn.add_precondition(Expr::le(Expr::int(1), Expr::fluent("fuel", [])));
    burn.add_effect(Effect::decrease(Expr::fluent("fuel", []), Expr::Int(1)));
    let id = problem.add_action(burn).unwrap();

    problem.add_goal(Expr::eq(Expr::fluent("fuel", []), Expr::int(0)));

    let two = Plan::Sequential(SequentialPlan::new([
        ActionInstance::new(id, []),
        ActionInstance::new(id, []),
    ]));
    let mut simulator = SequentialSimulator::new();
    assert!(simulator.validate(&problem, &two).unwrap().is_valid());

    let one = Plan::Sequential(SequentialPlan::new([ActionInstance::new(id, [])]));
    assert!(!simulator.validate(&problem, &one).unwrap().is_valid());
}
