//! Equivalence-check latency across program sizes.
//!
//! Measures the two stages that dominate a check: building the
//! disagreement query and deciding it, for both an equivalent pair
//! (full UNSAT search) and a non-equivalent pair (first witness).

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use formeq::encode::encode_disagreement;
use formeq::{check_equivalence, DpllSolver, Expr, Program, Statement};

/// A program with one output over `n` inputs: alternating `&`/`|`
/// chain v0 op v1 op ... op v(n-1).
fn chain_program(n: usize) -> Program {
    let mut expr = Expr::var("v0");
    for i in 1..n {
        let v = Expr::var(format!("v{}", i));
        expr = if i % 2 == 0 {
            Expr::and(expr, v)
        } else {
            Expr::or(expr, v)
        };
    }
    Program::new(vec![Statement::new("out", expr)])
}

/// Same function as `chain_program(n)`, restructured so the content
/// hashes differ and the solver has to work.
fn absorbed_chain_program(n: usize) -> Program {
    let base = chain_program(n);
    let expr = base.statements()[0].expr.clone();
    let absorbed = Expr::or(expr.clone(), Expr::and(expr, Expr::var("v0")));
    Program::new(vec![Statement::new("out", absorbed)])
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for n in [4, 8, 16] {
        let p = chain_program(n);
        let q = absorbed_chain_program(n);
        group.bench_function(format!("{}_inputs", n), |b| {
            b.iter(|| encode_disagreement(black_box(&p), black_box(&q)))
        });
    }
    group.finish();
}

fn bench_equivalent_pair(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_equivalent");
    for n in [4, 8] {
        let p = chain_program(n);
        let q = absorbed_chain_program(n);
        group.bench_function(format!("{}_inputs", n), |b| {
            b.iter(|| check_equivalence(black_box(&p), black_box(&q), &DpllSolver::new()))
        });
    }
    group.finish();
}

fn bench_not_equivalent_pair(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_not_equivalent");
    for n in [4, 8] {
        let p = chain_program(n);
        let negated = Program::new(vec![Statement::new(
            "out",
            Expr::not(p.statements()[0].expr.clone()),
        )]);
        group.bench_function(format!("{}_inputs", n), |b| {
            b.iter(|| check_equivalence(black_box(&p), black_box(&negated), &DpllSolver::new()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_encode,
    bench_equivalent_pair,
    bench_not_equivalent_pair
);
criterion_main!(benches);
