//! Tests for problem kind computation and set algebra.

use super::*;
use crate::action::{DurativeAction, Effect, InstantaneousAction};
use crate::fluent::Fluent;
use crate::timing::{TimeInterval, Timing};
use crate::typing::{Object, UserType, Variable};

#[test]
fn union_is_flagwise() {
    let a: ProblemKind = [Feature::ExistentialConditions].into_iter().collect();
    let b: ProblemKind = [Feature::DisjunctiveConditions].into_iter().collect();
    let u = a.union(&b);
    assert!(u.has_existential_conditions());
    assert!(u.has_disjunctive_conditions());
    assert!(a.is_subset_of(&u));
    assert!(b.is_subset_of(&u));
    assert!(!u.is_subset_of(&a));
}

#[test]
fn empty_kind_is_subset_of_everything() {
    let empty = ProblemKind::empty();
    let full: ProblemKind = [Feature::ContinuousTime, Feature::NumericFluents]
        .into_iter()
        .collect();
    assert!(empty.is_subset_of(&full));
    assert!(empty.is_subset_of(&empty));
}

#[test]
fn empty_problem_has_empty_kind() {
    let problem = Problem::new("empty");
    assert!(problem.kind().is_empty());
}

fn quantified_problem() -> Problem {
    let mut problem = Problem::new("quantified");
    problem.add_user_type(UserType::new("Obj")).unwrap();
    problem
        .add_fluent(Fluent::bool("y").with_param("o", "Obj"))
        .unwrap();
    problem.add_object(Object::new("o1", "Obj")).unwrap();
    let o = Variable::new("o", "Obj");
    problem.add_goal(Expr::exists(
        o.clone(),
        Expr::fluent("y", [Expr::var(o)]),
    ));
    problem
}

#[test]
fn exists_goal_sets_existential_flag() {
    let problem = quantified_problem();
    let kind = problem.kind();
    assert!(kind.has_existential_conditions());
    assert!(!kind.has_universal_conditions());
    assert!(!kind.has_disjunctive_conditions());
}

#[test]
fn forall_in_action_condition_sets_universal_flag() {
    let mut problem = Problem::new("p");
    problem.add_user_type(UserType::new("Obj")).unwrap();
    problem
        .add_fluent(Fluent::bool("y").with_param("o", "Obj"))
        .unwrap();
    problem.add_fluent(Fluent::bool("x")).unwrap();
    let o = Variable::new("o", "Obj");
    let mut a = InstantaneousAction::new("a");
    a.add_precondition(Expr::forall(
        o.clone(),
        Expr::fluent("y", [Expr::var(o)]),
    ));
    a.add_effect(Effect::assign(Expr::fluent("x", []), Expr::Bool(true)));
    problem.add_action(a).unwrap();
    assert!(problem.kind().has_universal_conditions());
}

#[test]
fn conditional_effect_and_durative_flags() {
    let mut problem = Problem::new("p");
    problem.add_user_type(UserType::new("Obj")).unwrap();
    problem.add_fluent(Fluent::bool("x")).unwrap();
    problem.add_fluent(Fluent::bool("g")).unwrap();

    let mut da = DurativeAction::new("da");
    da.add_condition(
        TimeInterval::at(Timing::start()),
        Expr::fluent("g", []),
    );
    da.add_effect(
        Timing::end(),
        Effect::assign(Expr::fluent("x", []), Expr::Bool(true)).when(Expr::fluent("g", [])),
    );
    problem.add_action(da).unwrap();

    let kind = problem.kind();
    assert!(kind.has(Feature::DurativeActions));
    assert!(kind.has_continuous_time());
    assert!(kind.has_conditional_effects());
}

#[test]
fn quantifier_in_effect_value_sets_flags() {
    let mut problem = Problem::new("p");
    problem.add_user_type(UserType::new("Obj")).unwrap();
    problem.add_fluent(Fluent::bool("x")).unwrap();
    problem
        .add_fluent(Fluent::bool("y").with_param("o", "Obj"))
        .unwrap();
    problem.add_object(Object::new("o1", "Obj")).unwrap();

    // x is assigned the value of a quantified formula.
    let o = Variable::new("o", "Obj");
    problem
        .add_timed_effect(
            Timing::global(4),
            Effect::assign(
                Expr::fluent("x", []),
                Expr::forall(o.clone(), Expr::fluent("y", [Expr::var(o.clone())])),
            )
            .when(Expr::exists(o.clone(), Expr::fluent("y", [Expr::var(o)]))),
        )
        .unwrap();

    let kind = problem.kind();
    assert!(kind.has_universal_conditions());
    assert!(kind.has_existential_conditions());
}

#[test]
fn timed_constructs_set_time_flags() {
    let mut problem = Problem::new("p");
    problem.add_fluent(Fluent::bool("x")).unwrap();
    problem
        .add_timed_effect(
            Timing::global(4),
            Effect::assign(Expr::fluent("x", []), Expr::Bool(true)),
        )
        .unwrap();
    problem.add_timed_goal(TimeInterval::at(Timing::global(6)), Expr::fluent("x", []));

    let kind = problem.kind();
    assert!(kind.has(Feature::TimedEffects));
    assert!(kind.has(Feature::TimedGoals));
    assert!(kind.has_continuous_time());
}

#[test]
fn numeric_and_negative_flags() {
    let mut problem = Problem::new("p");
    problem.add_fluent(Fluent::int("n")).unwrap();
    problem.add_fluent(Fluent::bool("x")).unwrap();
    problem.add_goal(Expr::lt(Expr::fluent("n", []), Expr::int(3)));
    problem.add_goal(Expr::not(Expr::fluent("x", [])));
    let kind = problem.kind();
    assert!(kind.has_numeric_fluents());
    assert!(kind.has_negative_conditions());
}

#[test]
fn hierarchical_typing_flag() {
    let mut problem = Problem::new("p");
    problem.add_user_type(UserType::new("Entity")).unwrap();
    problem
        .add_user_type(UserType::with_parent("Block", "Entity"))
        .unwrap();
    assert!(problem.kind().has_hierarchical_typing());
}

#[test]
fn kind_cache_cleared_on_mutation() {
    let mut problem = quantified_problem();
    assert!(problem.kind().has_existential_conditions());
    assert!(!problem.kind().has_disjunctive_conditions());
    // Mutating after the cache is taken must recompute on next access.
    problem.add_goal(Expr::Or(vec![
        Expr::fluent("y", [Expr::object("o1", "Obj")]),
        Expr::fluent("y", [Expr::object("o1", "Obj")]),
    ]));
    assert!(problem.kind().has_disjunctive_conditions());
}

#[test]
fn serde_screaming_snake_case() {
    let s = serde_yaml::to_string(&Feature::ExistentialConditions).unwrap();
    assert_eq!(s.trim(), "EXISTENTIAL_CONDITIONS");
    let f: Feature = serde_yaml::from_str("UNIVERSAL_CONDITIONS").unwrap();
    assert_eq!(f, Feature::UniversalConditions);
}
