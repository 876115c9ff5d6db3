//! Structural and reordering-tolerant comparison.
//!
//! Two relations are defined over the data model:
//!
//! - **Structural equality** is the derived `==`: element-wise, in
//!   order. Reordering two otherwise-identical programs makes them
//!   unequal.
//! - **Isomorphism** tolerates reordering at every level: statement
//!   lists compare as multisets, and the commutative connectives `&`
//!   and `|` accept swapped operands. Statement multisets are matched
//!   by exhaustive correspondence search rather than sorting, because
//!   the relation admits no total order to sort by.
//!
//! Both relations are total over their types; there is no runtime kind
//! inspection to get wrong.

use crate::ast::{Expr, Program, Statement};

/// Reordering-tolerant equivalence.
pub trait Isomorphic {
    fn isomorphic(&self, other: &Self) -> bool;
}

impl Isomorphic for Expr {
    fn isomorphic(&self, other: &Expr) -> bool {
        match (self, other) {
            (Expr::Const(a), Expr::Const(b)) => a == b,
            (Expr::Var(a), Expr::Var(b)) => a == b,
            (Expr::Not(a), Expr::Not(b)) => a.isomorphic(b),
            (Expr::And(a1, a2), Expr::And(b1, b2)) | (Expr::Or(a1, a2), Expr::Or(b1, b2)) => {
                (a1.isomorphic(b1) && a2.isomorphic(b2))
                    || (a1.isomorphic(b2) && a2.isomorphic(b1))
            }
            _ => false,
        }
    }
}

impl Isomorphic for Statement {
    fn isomorphic(&self, other: &Statement) -> bool {
        self.output == other.output && self.expr.isomorphic(&other.expr)
    }
}

impl Isomorphic for Program {
    fn isomorphic(&self, other: &Program) -> bool {
        unordered_match(self.statements(), other.statements())
    }
}

/// Multiset equality under [`Isomorphic`]: every element of `xs` pairs
/// with exactly one unmatched element of `ys`, and vice versa.
///
/// Backtracking search over all correspondences. Programs are tiny, so
/// the worst case is irrelevant; what matters is that a greedy pairing
/// never rejects a valid correspondence.
pub fn unordered_match<T: Isomorphic>(xs: &[T], ys: &[T]) -> bool {
    if xs.len() != ys.len() {
        return false;
    }
    let mut used = vec![false; ys.len()];
    match_from(xs, ys, 0, &mut used)
}

fn match_from<T: Isomorphic>(xs: &[T], ys: &[T], i: usize, used: &mut Vec<bool>) -> bool {
    if i == xs.len() {
        return true;
    }
    for j in 0..ys.len() {
        if !used[j] && xs[i].isomorphic(&ys[j]) {
            used[j] = true;
            if match_from(xs, ys, i + 1, used) {
                return true;
            }
            used[j] = false;
        }
    }
    false
}

// ─── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Statement;

    fn stmt(out: &str, expr: Expr) -> Statement {
        Statement::new(out, expr)
    }

    #[test]
    fn test_expr_commuted_operands() {
        let ab = Expr::and(Expr::var("a"), Expr::var("b"));
        let ba = Expr::and(Expr::var("b"), Expr::var("a"));
        assert_ne!(ab, ba);
        assert!(ab.isomorphic(&ba));

        let or1 = Expr::or(ab.clone(), Expr::var("c"));
        let or2 = Expr::or(Expr::var("c"), ba);
        assert!(or1.isomorphic(&or2));
    }

    #[test]
    fn test_expr_different_connectives() {
        let and = Expr::and(Expr::var("a"), Expr::var("b"));
        let or = Expr::or(Expr::var("a"), Expr::var("b"));
        assert!(!and.isomorphic(&or));
    }

    #[test]
    fn test_statement_output_must_match() {
        let s1 = stmt("x", Expr::var("a"));
        let s2 = stmt("y", Expr::var("a"));
        assert!(!s1.isomorphic(&s2));
        assert!(s1.isomorphic(&s1.clone()));
    }

    #[test]
    fn test_program_reflexive() {
        let p = Program::new(vec![
            stmt("x", Expr::and(Expr::var("a"), Expr::var("b"))),
            stmt("y", Expr::not(Expr::var("c"))),
        ]);
        assert_eq!(p, p.clone());
        assert!(p.isomorphic(&p));
    }

    #[test]
    fn test_program_reordered_statements() {
        let p = Program::new(vec![
            stmt("x", Expr::var("a")),
            stmt("y", Expr::var("b")),
        ]);
        let q = Program::new(vec![
            stmt("y", Expr::var("b")),
            stmt("x", Expr::var("a")),
        ]);
        assert_ne!(p, q);
        assert!(p.isomorphic(&q));
        assert!(q.isomorphic(&p));
    }

    #[test]
    fn test_program_multiset_not_set() {
        // Same statement twice on one side only.
        let s = stmt("x", Expr::var("a"));
        let p = Program::new(vec![s.clone(), s.clone()]);
        let q = Program::new(vec![s.clone()]);
        assert!(!p.isomorphic(&q));
    }

    #[test]
    fn test_program_length_mismatch() {
        let p = Program::new(vec![stmt("x", Expr::var("a"))]);
        let q = p.append(stmt("y", Expr::var("b")));
        assert!(!p.isomorphic(&q));
    }

    #[test]
    fn test_backtracking_finds_correspondence() {
        // Two pairs where a greedy first-fit on the first element could
        // consume the partner the second element needs.
        let ab = stmt("x", Expr::and(Expr::var("a"), Expr::var("b")));
        let ba = stmt("x", Expr::and(Expr::var("b"), Expr::var("a")));
        let p = Program::new(vec![ab.clone(), ba.clone()]);
        let q = Program::new(vec![ba, ab]);
        // Invalid as programs (duplicate outputs), but isomorphism is a
        // purely syntactic relation and must still match correctly.
        assert!(p.isomorphic(&q));
    }
}
