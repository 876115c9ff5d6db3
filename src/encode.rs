//! Constraint encoding: translate a pair of programs into a single
//! satisfiability query.
//!
//! The query asserts "some output variable shared by both programs
//! takes different values" — a miter over the two programs. Each
//! program's formulas are Tseitin-encoded into CNF with per-program
//! output literals; input variables are shared by name, so a variable
//! referenced by only one program is simply a free variable the other
//! ignores. The query is satisfiable exactly when an input assignment
//! exists on which the programs disagree.

use std::collections::BTreeMap;

use crate::ast::{Expr, Program, Var};

// ─── CNF ───────────────────────────────────────────────────────────

/// A literal: a CNF variable index with a polarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lit {
    pub var: u32,
    pub positive: bool,
}

impl Lit {
    pub fn pos(var: u32) -> Self {
        Self {
            var,
            positive: true,
        }
    }

    pub fn negated(self) -> Self {
        Self {
            var: self.var,
            positive: !self.positive,
        }
    }
}

/// A disjunction of literals.
pub type Clause = Vec<Lit>;

/// A formula in conjunctive normal form.
#[derive(Clone, Debug, Default)]
pub struct Cnf {
    num_vars: u32,
    clauses: Vec<Clause>,
}

impl Cnf {
    pub fn new_var(&mut self) -> u32 {
        let v = self.num_vars;
        self.num_vars += 1;
        v
    }

    pub fn add_clause(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }
}

// ─── Query ─────────────────────────────────────────────────────────

/// The literals computing one shared output in each program.
#[derive(Clone, Debug)]
pub struct OutputPair {
    pub var: Var,
    pub in_a: Lit,
    pub in_b: Lit,
}

/// The encoded disagreement query handed to a decision procedure.
///
/// Opaque to callers: the solver reads the CNF and reports its model
/// back through the input table, which maps each named input variable
/// to its CNF index.
#[derive(Clone, Debug)]
pub struct Query {
    cnf: Cnf,
    inputs: BTreeMap<Var, u32>,
    outputs: Vec<OutputPair>,
}

impl Query {
    pub fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    /// Named input variables and their CNF indices.
    pub fn inputs(&self) -> &BTreeMap<Var, u32> {
        &self.inputs
    }

    /// Per shared output, the literal computing it in each program.
    pub fn outputs(&self) -> &[OutputPair] {
        &self.outputs
    }
}

// ─── Encoder ───────────────────────────────────────────────────────

struct Encoder {
    cnf: Cnf,
    inputs: BTreeMap<Var, u32>,
    true_lit: Option<Lit>,
}

impl Encoder {
    fn new() -> Self {
        Self {
            cnf: Cnf::default(),
            inputs: BTreeMap::new(),
            true_lit: None,
        }
    }

    /// The literal for a named input, allocated on first use so both
    /// programs share it.
    fn input_lit(&mut self, var: &Var) -> Lit {
        if let Some(&idx) = self.inputs.get(var) {
            return Lit::pos(idx);
        }
        let idx = self.cnf.new_var();
        self.inputs.insert(var.clone(), idx);
        Lit::pos(idx)
    }

    /// A literal constrained to be true, allocated once.
    fn constant_true(&mut self) -> Lit {
        if let Some(t) = self.true_lit {
            return t;
        }
        let t = Lit::pos(self.cnf.new_var());
        self.cnf.add_clause(vec![t]);
        self.true_lit = Some(t);
        t
    }

    fn fresh(&mut self) -> Lit {
        Lit::pos(self.cnf.new_var())
    }

    /// Tseitin-encode an expression; the returned literal carries its
    /// value under any satisfying assignment.
    fn encode_expr(&mut self, expr: &Expr) -> Lit {
        match expr {
            Expr::Const(true) => self.constant_true(),
            Expr::Const(false) => self.constant_true().negated(),
            Expr::Var(v) => self.input_lit(v),
            Expr::Not(e) => self.encode_expr(e).negated(),
            Expr::And(l, r) => {
                let a = self.encode_expr(l);
                let b = self.encode_expr(r);
                let t = self.fresh();
                // t <-> (a & b)
                self.cnf.add_clause(vec![t.negated(), a]);
                self.cnf.add_clause(vec![t.negated(), b]);
                self.cnf.add_clause(vec![t, a.negated(), b.negated()]);
                t
            }
            Expr::Or(l, r) => {
                let a = self.encode_expr(l);
                let b = self.encode_expr(r);
                let t = self.fresh();
                // t <-> (a | b)
                self.cnf.add_clause(vec![t, a.negated()]);
                self.cnf.add_clause(vec![t, b.negated()]);
                self.cnf.add_clause(vec![t.negated(), a, b]);
                t
            }
        }
    }

    /// A literal equal to `a XOR b`.
    fn define_xor(&mut self, a: Lit, b: Lit) -> Lit {
        let d = self.fresh();
        self.cnf.add_clause(vec![d.negated(), a, b]);
        self.cnf.add_clause(vec![d.negated(), a.negated(), b.negated()]);
        self.cnf.add_clause(vec![d, a.negated(), b]);
        self.cnf.add_clause(vec![d, a, b.negated()]);
        d
    }
}

/// Build the disagreement query for two programs with identical output
/// variable sets (the equivalence checker verifies that precondition).
pub fn encode_disagreement(a: &Program, b: &Program) -> Query {
    debug_assert_eq!(a.output_vars(), b.output_vars());

    let formulas_a: BTreeMap<&Var, &Expr> =
        a.statements().iter().map(|s| (&s.output, &s.expr)).collect();
    let formulas_b: BTreeMap<&Var, &Expr> =
        b.statements().iter().map(|s| (&s.output, &s.expr)).collect();

    let mut enc = Encoder::new();
    let mut outputs = Vec::new();
    let mut disagreement = Vec::new();

    for (var, expr_a) in &formulas_a {
        let expr_b = match formulas_b.get(var) {
            Some(e) => e,
            None => continue,
        };
        let in_a = enc.encode_expr(expr_a);
        let in_b = enc.encode_expr(expr_b);
        let differs = enc.define_xor(in_a, in_b);
        disagreement.push(differs);
        outputs.push(OutputPair {
            var: (*var).clone(),
            in_a,
            in_b,
        });
    }

    // At least one shared output differs.
    enc.cnf.add_clause(disagreement);

    Query {
        cnf: enc.cnf,
        inputs: enc.inputs,
        outputs,
    }
}

// ─── Tests ─────────────────────────────────────────────────────────
