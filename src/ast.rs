//! Data model for boolean assignment-formula programs.
//!
//! A program is an ordered, immutable list of statements of the form
//! `out := expr`, where `expr` is a boolean expression over named input
//! variables. Every transform (`append`, `merge`, `simplify`) returns a
//! new `Program`; nothing is mutated in place, so a `Program` can be
//! shared freely across threads.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

// ─── Variables ─────────────────────────────────────────────────────

/// A named variable. Ordering is lexicographic on the name, which gives
/// all derived variable collections a deterministic iteration order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Var(String);

impl Var {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Var {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Var {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── Expressions ───────────────────────────────────────────────────

/// A boolean expression tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    /// A constant `true` or `false`.
    Const(bool),
    /// A named input variable.
    Var(Var),
    /// Negation: `!a`.
    Not(Box<Expr>),
    /// Conjunction: `a & b`.
    And(Box<Expr>, Box<Expr>),
    /// Disjunction: `a | b`.
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(Var::new(name))
    }

    pub fn not(e: Expr) -> Self {
        Expr::Not(Box::new(e))
    }

    pub fn and(l: Expr, r: Expr) -> Self {
        Expr::And(Box::new(l), Box::new(r))
    }

    pub fn or(l: Expr, r: Expr) -> Self {
        Expr::Or(Box::new(l), Box::new(r))
    }

    /// Collect every variable referenced by this expression.
    pub fn vars(&self) -> BTreeSet<Var> {
        let mut set = BTreeSet::new();
        self.collect_vars(&mut set);
        set
    }

    fn collect_vars(&self, set: &mut BTreeSet<Var>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var(v) => {
                set.insert(v.clone());
            }
            Expr::Not(e) => e.collect_vars(set),
            Expr::And(l, r) | Expr::Or(l, r) => {
                l.collect_vars(set);
                r.collect_vars(set);
            }
        }
    }

    /// Evaluate under a concrete assignment. Returns `None` if the
    /// expression references a variable the assignment does not bind.
    pub fn eval(&self, env: &BTreeMap<Var, bool>) -> Option<bool> {
        match self {
            Expr::Const(b) => Some(*b),
            Expr::Var(v) => env.get(v).copied(),
            Expr::Not(e) => e.eval(env).map(|b| !b),
            Expr::And(l, r) => Some(l.eval(env)? && r.eval(env)?),
            Expr::Or(l, r) => Some(l.eval(env)? || r.eval(env)?),
        }
    }

    /// Simplify obvious identities: `x & true = x`, `x | false = x`,
    /// `!!x = x`, constant folding, idempotence.
    pub fn simplify(&self) -> Expr {
        match self {
            Expr::Not(e) => {
                let e = e.simplify();
                match e {
                    Expr::Const(b) => Expr::Const(!b),
                    Expr::Not(inner) => *inner,
                    _ => Expr::Not(Box::new(e)),
                }
            }
            Expr::And(l, r) => {
                let l = l.simplify();
                let r = r.simplify();
                match (&l, &r) {
                    (Expr::Const(false), _) | (_, Expr::Const(false)) => Expr::Const(false),
                    (Expr::Const(true), _) => r,
                    (_, Expr::Const(true)) => l,
                    _ if l == r => l,
                    _ => Expr::And(Box::new(l), Box::new(r)),
                }
            }
            Expr::Or(l, r) => {
                let l = l.simplify();
                let r = r.simplify();
                match (&l, &r) {
                    (Expr::Const(true), _) | (_, Expr::Const(true)) => Expr::Const(true),
                    (Expr::Const(false), _) => r,
                    (_, Expr::Const(false)) => l,
                    _ if l == r => l,
                    _ => Expr::Or(Box::new(l), Box::new(r)),
                }
            }
            _ => self.clone(),
        }
    }

    // Precedence for rendering: `!` binds tighter than `&`, which binds
    // tighter than `|`. Parentheses appear only where required.
    fn precedence(&self) -> u8 {
        match self {
            Expr::Const(_) | Expr::Var(_) => 3,
            Expr::Not(_) => 2,
            Expr::And(_, _) => 1,
            Expr::Or(_, _) => 0,
        }
    }

    fn fmt_with_prec(&self, f: &mut fmt::Formatter<'_>, parent: u8) -> fmt::Result {
        let prec = self.precedence();
        if prec < parent {
            write!(f, "(")?;
        }
        match self {
            Expr::Const(b) => write!(f, "{}", b)?,
            Expr::Var(v) => write!(f, "{}", v)?,
            Expr::Not(e) => {
                write!(f, "!")?;
                e.fmt_with_prec(f, 2)?;
            }
            Expr::And(l, r) => {
                l.fmt_with_prec(f, 1)?;
                write!(f, " & ")?;
                r.fmt_with_prec(f, 1)?;
            }
            Expr::Or(l, r) => {
                l.fmt_with_prec(f, 0)?;
                write!(f, " | ")?;
                r.fmt_with_prec(f, 0)?;
            }
        }
        if prec < parent {
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with_prec(f, 0)
    }
}

// ─── Statements ────────────────────────────────────────────────────

/// One assignment statement: `output := expr`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    pub output: Var,
    pub expr: Expr,
}

impl Statement {
    pub fn new(output: impl Into<Var>, expr: Expr) -> Self {
        Self {
            output: output.into(),
            expr,
        }
    }

    /// Variables read by this statement's formula.
    pub fn input_vars(&self) -> BTreeSet<Var> {
        self.expr.vars()
    }

    /// Apply the per-formula simplification transform.
    pub fn simplify(&self) -> Statement {
        Statement {
            output: self.output.clone(),
            expr: self.expr.simplify(),
        }
    }

    /// Well-formedness: every variable name is non-empty.
    pub fn validate(&self) -> Result<(), ValidateError> {
        if self.output.as_str().is_empty() {
            return Err(ValidateError::EmptyVariableName);
        }
        for v in self.expr.vars() {
            if v.as_str().is_empty() {
                return Err(ValidateError::EmptyVariableName);
            }
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} := {}", self.output, self.expr)
    }
}

// ─── Programs ──────────────────────────────────────────────────────

/// An ordered collection of assignment statements forming one program.
///
/// Invariants (checked by [`Program::validate`], not by construction):
/// the sequence is non-empty, no two statements assign the same output
/// variable, and every statement is individually well-formed. Statement
/// order matters for rendering and `==`, but not for isomorphism or
/// semantic equivalence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// New program with `statement` added at the end. The caller keeps
    /// the no-duplicate-outputs invariant; violations surface through
    /// [`Program::validate`].
    pub fn append(&self, statement: Statement) -> Program {
        let mut statements = self.statements.clone();
        statements.push(statement);
        Program { statements }
    }

    /// New program holding the statements of both inputs. The shorter
    /// sequence is appended onto a copy of the longer one; the result
    /// length is always the sum of the input lengths. Duplicate outputs
    /// are never silently merged — they fail `validate` instead.
    pub fn merge(&self, other: &Program) -> Program {
        let (longer, shorter) = if self.statements.len() >= other.statements.len() {
            (&self.statements, &other.statements)
        } else {
            (&other.statements, &self.statements)
        };
        let mut statements = longer.clone();
        statements.extend(shorter.iter().cloned());
        debug_assert_eq!(
            statements.len(),
            self.statements.len() + other.statements.len()
        );
        Program { statements }
    }

    /// New program with every statement simplified. Order and count are
    /// preserved.
    pub fn simplify(&self) -> Program {
        Program {
            statements: self.statements.iter().map(Statement::simplify).collect(),
        }
    }

    /// The set of output variables assigned by this program, in
    /// lexicographic order.
    pub fn output_vars(&self) -> BTreeSet<Var> {
        self.statements.iter().map(|s| s.output.clone()).collect()
    }

    /// All variables any formula reads, in lexicographic order.
    pub fn input_vars(&self) -> BTreeSet<Var> {
        let mut set = BTreeSet::new();
        for s in &self.statements {
            set.extend(s.expr.vars());
        }
        set
    }

    /// Check every program invariant. Must pass before a program is
    /// handed to the semantic-equivalence checker.
    pub fn validate(&self) -> Result<(), ValidateError> {
        if self.statements.is_empty() {
            return Err(ValidateError::EmptyProgram);
        }
        let mut seen = BTreeSet::new();
        for s in &self.statements {
            s.validate()?;
            if !seen.insert(&s.output) {
                return Err(ValidateError::DuplicateOutput(s.output.clone()));
            }
        }
        Ok(())
    }
}

impl From<Vec<Statement>> for Program {
    fn from(statements: Vec<Statement>) -> Self {
        Program { statements }
    }
}

impl fmt::Display for Program {
    /// One statement per line, no trailing separator. An empty program
    /// renders as the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, s) in self.statements.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", s)?;
        }
        Ok(())
    }
}

// ─── Validation Errors ─────────────────────────────────────────────

/// Invariant violation detected by [`Program::validate`]. A program that
/// fails validation must not reach comparison or encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidateError {
    /// The program has no statements.
    EmptyProgram,
    /// Two statements assign the same output variable.
    DuplicateOutput(Var),
    /// A statement uses an empty variable name.
    EmptyVariableName,
}

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidateError::EmptyProgram => write!(f, "program has no statements"),
            ValidateError::DuplicateOutput(v) => {
                write!(f, "output variable '{}' is assigned more than once", v)
            }
            ValidateError::EmptyVariableName => write!(f, "empty variable name"),
        }
    }
}

impl std::error::Error for ValidateError {}

// ─── Tests ─────────────────────────────────────────────────────────
