use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::*;
use crate::ast::{Expr, Program, Statement};
use crate::encode::encode_disagreement;

fn prog(statements: Vec<(&str, Expr)>) -> Program {
    Program::new(
        statements
            .into_iter()
            .map(|(o, e)| Statement::new(o, e))
            .collect(),
    )
}

#[test]
fn test_identical_formulas_unsatisfiable() {
    let p = prog(vec![("x", Expr::var("a"))]);
    let query = encode_disagreement(&p, &p);
    let outcome = DpllSolver::new().check(&query).unwrap();
    assert_eq!(outcome, Outcome::Unsatisfiable);
}

#[test]
fn test_negated_formula_satisfiable() {
    let p = prog(vec![("x", Expr::var("a"))]);
    let q = prog(vec![("x", Expr::not(Expr::var("a")))]);
    let query = encode_disagreement(&p, &q);
    let outcome = DpllSolver::new().check(&query).unwrap();
    match outcome {
        Outcome::Satisfiable(witness) => {
            // `a` and `!a` differ under every assignment; the witness
            // just has to bind the input.
            assert!(witness.inputs.contains_key(&"a".into()));
        }
        Outcome::Unsatisfiable => panic!("expected a disagreeing assignment"),
    }
}

#[test]
fn test_tautology_unsatisfiable() {
    let p = prog(vec![("x", Expr::or(Expr::var("a"), Expr::not(Expr::var("a"))))]);
    let q = prog(vec![("x", Expr::Const(true))]);
    let query = encode_disagreement(&p, &q);
    assert_eq!(DpllSolver::new().check(&query).unwrap(), Outcome::Unsatisfiable);
}

#[test]
fn test_absorption_unsatisfiable() {
    // a == a | (a & b), with b free on one side only.
    let p = prog(vec![("x", Expr::var("a"))]);
    let q = prog(vec![(
        "x",
        Expr::or(Expr::var("a"), Expr::and(Expr::var("a"), Expr::var("b"))),
    )]);
    let query = encode_disagreement(&p, &q);
    assert_eq!(DpllSolver::new().check(&query).unwrap(), Outcome::Unsatisfiable);
}

#[test]
fn test_witness_covers_every_input() {
    let p = prog(vec![("x", Expr::var("a")), ("y", Expr::var("c"))]);
    let q = prog(vec![("x", Expr::not(Expr::var("a"))), ("y", Expr::var("c"))]);
    let query = encode_disagreement(&p, &q);
    match DpllSolver::new().check(&query).unwrap() {
        Outcome::Satisfiable(witness) => {
            for input in query.inputs().keys() {
                assert!(witness.inputs.contains_key(input), "missing {}", input);
            }
        }
        Outcome::Unsatisfiable => panic!("expected a disagreeing assignment"),
    }
}

#[test]
fn test_decision_limit_surfaces() {
    let p = prog(vec![("x", Expr::var("a"))]);
    let q = prog(vec![("x", Expr::not(Expr::var("a")))]);
    let query = encode_disagreement(&p, &q);
    let solver = DpllSolver::new().with_decision_limit(0);
    assert_eq!(solver.check(&query), Err(SolverError::DecisionLimit));
}

#[test]
fn test_cancellation_surfaces() {
    let p = prog(vec![("x", Expr::var("a"))]);
    let q = prog(vec![("x", Expr::not(Expr::var("a")))]);
    let query = encode_disagreement(&p, &q);
    let flag = Arc::new(AtomicBool::new(false));
    flag.store(true, Ordering::Relaxed);
    let solver = DpllSolver::new().with_cancel_flag(flag);
    assert_eq!(solver.check(&query), Err(SolverError::Cancelled));
}

#[test]
fn test_unraised_flag_does_not_interfere() {
    let p = prog(vec![("x", Expr::var("a"))]);
    let query = encode_disagreement(&p, &p);
    let solver = DpllSolver::new().with_cancel_flag(Arc::new(AtomicBool::new(false)));
    assert_eq!(solver.check(&query).unwrap(), Outcome::Unsatisfiable);
}

#[test]
fn test_de_morgan_unsatisfiable() {
    // !(a & b) == !a | !b
    let p = prog(vec![("x", Expr::not(Expr::and(Expr::var("a"), Expr::var("b"))))]);
    let q = prog(vec![(
        "x",
        Expr::or(Expr::not(Expr::var("a")), Expr::not(Expr::var("b"))),
    )]);
    let query = encode_disagreement(&p, &q);
    assert_eq!(DpllSolver::new().check(&query).unwrap(), Outcome::Unsatisfiable);
}

#[test]
fn test_multi_output_single_disagreement() {
    let p = prog(vec![
        ("x", Expr::and(Expr::var("a"), Expr::var("b"))),
        ("y", Expr::var("a")),
    ]);
    let q = prog(vec![
        ("x", Expr::and(Expr::var("b"), Expr::var("a"))),
        ("y", Expr::or(Expr::var("a"), Expr::var("b"))),
    ]);
    // x agrees everywhere; y disagrees when a = false, b = true.
    let query = encode_disagreement(&p, &q);
    match DpllSolver::new().check(&query).unwrap() {
        Outcome::Satisfiable(witness) => {
            assert_eq!(witness.inputs.get(&"a".into()), Some(&false));
            assert_eq!(witness.inputs.get(&"b".into()), Some(&true));
        }
        Outcome::Unsatisfiable => panic!("expected a disagreeing assignment"),
    }
}
