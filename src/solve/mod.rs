//! Decision procedure boundary for disagreement queries.
//!
//! The equivalence checker talks to a [`Solver`] and nothing else: a
//! query goes in, SATISFIABLE (with a witness assignment) or
//! UNSATISFIABLE comes out. Backends are swappable behind the trait;
//! the built-in [`DpllSolver`] is complete for the tiny programs this
//! crate models. Solver failures are surfaced to the caller unchanged —
//! treating a failed solve as either verdict would be unsound, so
//! nothing here retries or guesses.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::ast::Var;
use crate::encode::Query;

mod dpll;
#[cfg(test)]
mod tests;

pub use dpll::DpllSolver;

// ─── Solver Interface ──────────────────────────────────────────────

/// A decision procedure for disagreement queries.
pub trait Solver {
    /// Decide the query. `Satisfiable` means an input assignment exists
    /// on which the two encoded programs disagree.
    fn check(&self, query: &Query) -> Result<Outcome, SolverError>;
}

/// Answer of a decision procedure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A disagreeing input assignment exists.
    Satisfiable(Witness),
    /// The programs agree on every input assignment.
    Unsatisfiable,
}

impl Outcome {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, Outcome::Satisfiable(_))
    }
}

/// A satisfying assignment, restricted to the named input variables of
/// the query. Inputs the search never had to branch on default to
/// `false`, so the assignment is always total over the query's inputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Witness {
    pub inputs: BTreeMap<Var, bool>,
}

// ─── Errors ────────────────────────────────────────────────────────

/// Failure of the decision procedure itself. Never converted into an
/// equivalence verdict.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolverError {
    /// The configured decision budget ran out before an answer.
    DecisionLimit,
    /// The caller-supplied cancellation flag was raised.
    Cancelled,
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::DecisionLimit => write!(f, "solver decision budget exhausted"),
            SolverError::Cancelled => write!(f, "solver cancelled"),
        }
    }
}

impl std::error::Error for SolverError {}
