use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{Outcome, Solver, SolverError, Witness};
use crate::encode::{Clause, Lit, Query};

// ─── DPLL Backend ──────────────────────────────────────────────────

/// The built-in decision procedure: DPLL with unit propagation and
/// chronological backtracking.
///
/// Unbounded by default. A decision budget caps the number of branch
/// decisions; a cancellation flag is polled at every decision point and
/// propagated to the caller as [`SolverError::Cancelled`] — the solver
/// attaches no meaning of its own to it.
#[derive(Clone, Debug, Default)]
pub struct DpllSolver {
    decision_limit: Option<u64>,
    cancel: Option<Arc<AtomicBool>>,
}

impl DpllSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`SolverError::DecisionLimit`] after `limit` branch
    /// decisions.
    pub fn with_decision_limit(mut self, limit: u64) -> Self {
        self.decision_limit = Some(limit);
        self
    }

    /// Poll `flag` during the search; a raised flag aborts the solve
    /// with [`SolverError::Cancelled`].
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }
}

impl Solver for DpllSolver {
    fn check(&self, query: &Query) -> Result<Outcome, SolverError> {
        let mut search = Search {
            clauses: query.cnf().clauses(),
            decisions: 0,
            limit: self.decision_limit,
            cancel: self.cancel.as_deref(),
        };
        search.checkpoint()?;

        let assignment = vec![None; query.cnf().num_vars() as usize];
        match search.dpll(assignment)? {
            Some(model) => {
                let mut inputs = BTreeMap::new();
                for (var, &idx) in query.inputs() {
                    inputs.insert(var.clone(), model[idx as usize].unwrap_or(false));
                }
                Ok(Outcome::Satisfiable(Witness { inputs }))
            }
            None => Ok(Outcome::Unsatisfiable),
        }
    }
}

// ─── Search ────────────────────────────────────────────────────────

enum ClauseState {
    Satisfied,
    Conflict,
    Unit(Lit),
    Open(Lit),
}

struct Search<'a> {
    clauses: &'a [Clause],
    decisions: u64,
    limit: Option<u64>,
    cancel: Option<&'a AtomicBool>,
}

impl Search<'_> {
    fn checkpoint(&self) -> Result<(), SolverError> {
        if let Some(flag) = self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(SolverError::Cancelled);
            }
        }
        Ok(())
    }

    fn dpll(&mut self, mut assignment: Vec<Option<bool>>) -> Result<SearchResult, SolverError> {
        // Unit propagation to fixpoint.
        loop {
            let mut changed = false;
            for clause in self.clauses {
                match clause_state(clause, &assignment) {
                    ClauseState::Satisfied | ClauseState::Open(_) => {}
                    ClauseState::Conflict => return Ok(None),
                    ClauseState::Unit(lit) => {
                        assignment[lit.var as usize] = Some(lit.positive);
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        // At fixpoint every clause is satisfied or has two or more
        // unassigned literals. No open clause means a model.
        let branch = self.clauses.iter().find_map(|c| {
            match clause_state(c, &assignment) {
                ClauseState::Open(lit) => Some(lit),
                _ => None,
            }
        });
        let lit = match branch {
            Some(lit) => lit,
            None => return Ok(Some(assignment)),
        };

        self.decisions += 1;
        if let Some(limit) = self.limit {
            if self.decisions > limit {
                return Err(SolverError::DecisionLimit);
            }
        }
        self.checkpoint()?;

        // Try the polarity that satisfies the open clause first.
        for value in [lit.positive, !lit.positive] {
            let mut next = assignment.clone();
            next[lit.var as usize] = Some(value);
            if let Some(model) = self.dpll(next)? {
                return Ok(Some(model));
            }
        }
        Ok(None)
    }
}

type SearchResult = Option<Vec<Option<bool>>>;

fn clause_state(clause: &Clause, assignment: &[Option<bool>]) -> ClauseState {
    let mut unassigned = None;
    let mut unassigned_count = 0;
    for &lit in clause {
        match assignment[lit.var as usize] {
            Some(value) if value == lit.positive => return ClauseState::Satisfied,
            Some(_) => {}
            None => {
                unassigned = Some(lit);
                unassigned_count += 1;
            }
        }
    }
    match (unassigned, unassigned_count) {
        (None, _) => ClauseState::Conflict,
        (Some(lit), 1) => ClauseState::Unit(lit),
        (Some(lit), _) => ClauseState::Open(lit),
    }
}
