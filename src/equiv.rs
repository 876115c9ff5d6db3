//! Semantic equivalence checking for assignment-formula programs.
//!
//! Two programs are equivalent when every output variable they share
//! computes the same value under every input assignment. The check
//! runs in stages, cheapest first:
//!
//! 1. Validate both programs — equivalence of a malformed program is a
//!    caller error, not a verdict.
//! 2. Compare output-variable sets; different sets can never be
//!    equivalent, and no query is built.
//! 3. Content-hash comparison (trivial equivalence).
//! 4. Encode the disagreement query and ask the decision procedure.
//!    UNSATISFIABLE — no disagreeing input exists — means equivalent,
//!    so the solver's answer is inverted.
//!
//! Input-variable sets need not match: a variable only one program
//! reads is "don't care" for the other and constrains nothing.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::ast::{Program, ValidateError, Var};
use crate::encode::encode_disagreement;
use crate::hash::program_hash;
use crate::solve::{DpllSolver, Outcome, Solver, SolverError};

// ─── Result Types ──────────────────────────────────────────────────

/// Result of an equivalence check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EquivalenceResult {
    /// Whether the programs are equivalent.
    pub verdict: Verdict,
    /// Method that determined the verdict.
    pub method: String,
    /// Counterexample (if not equivalent and one exists).
    pub counterexample: Option<Counterexample>,
}

impl EquivalenceResult {
    /// Format a human-readable report.
    pub fn format_report(&self) -> String {
        let mut report = String::new();
        report.push_str("Equivalence check\n");
        report.push_str(&format!("  Method: {}\n", self.method));
        report.push_str(&format!("  Verdict: {}\n", self.verdict));
        if let Some(ref ce) = self.counterexample {
            report.push_str("  Counterexample:\n");
            for (name, value) in &ce.inputs {
                report.push_str(&format!("    {} = {}\n", name, value));
            }
            for d in &ce.disagreements {
                report.push_str(&format!(
                    "    {} computes {} vs {}\n",
                    d.output, d.in_a, d.in_b
                ));
            }
        }
        report
    }
}

/// Verdict of an equivalence check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Verdict {
    /// The programs agree on every shared output for every input.
    Equivalent,
    /// Some input makes a shared output differ.
    NotEquivalent,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Equivalent => write!(f, "EQUIVALENT"),
            Verdict::NotEquivalent => write!(f, "NOT EQUIVALENT"),
        }
    }
}

/// An input assignment on which the two programs disagree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Counterexample {
    /// The witness assignment, sorted by variable name.
    pub inputs: Vec<(Var, bool)>,
    /// Shared outputs that differ under the witness.
    pub disagreements: Vec<Disagreement>,
}

/// One output variable's value in each program under the witness.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Disagreement {
    pub output: Var,
    pub in_a: bool,
    pub in_b: bool,
}

// ─── Errors ────────────────────────────────────────────────────────

/// Failure of the equivalence check itself — distinct from a
/// `NotEquivalent` verdict.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EquivError {
    /// One of the programs failed validation.
    Invalid(ValidateError),
    /// The decision procedure failed; no verdict is assumed.
    Solver(SolverError),
}

impl fmt::Display for EquivError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquivError::Invalid(e) => write!(f, "invalid program: {}", e),
            EquivError::Solver(e) => write!(f, "solver failure: {}", e),
        }
    }
}

impl std::error::Error for EquivError {}

impl From<ValidateError> for EquivError {
    fn from(e: ValidateError) -> Self {
        EquivError::Invalid(e)
    }
}

impl From<SolverError> for EquivError {
    fn from(e: SolverError) -> Self {
        EquivError::Solver(e)
    }
}

// ─── Main Entry Point ──────────────────────────────────────────────

/// Check whether two programs are semantically equivalent.
///
/// Both programs must pass [`Program::validate`]; solver failures
/// propagate unchanged.
pub fn check_equivalence(
    a: &Program,
    b: &Program,
    solver: &dyn Solver,
) -> Result<EquivalenceResult, EquivError> {
    a.validate()?;
    b.validate()?;

    // Output-variable sets must match exactly; input variables may
    // differ freely.
    if a.output_vars() != b.output_vars() {
        return Ok(EquivalenceResult {
            verdict: Verdict::NotEquivalent,
            method: "output-variable sets differ".to_string(),
            counterexample: None,
        });
    }

    // Fast path: equal normalized hashes mean the programs differ at
    // most by statement order and commuted operands.
    if program_hash(a) == program_hash(b) {
        return Ok(EquivalenceResult {
            verdict: Verdict::Equivalent,
            method: "content hash".to_string(),
            counterexample: None,
        });
    }

    let query = encode_disagreement(a, b);
    match solver.check(&query)? {
        Outcome::Unsatisfiable => Ok(EquivalenceResult {
            verdict: Verdict::Equivalent,
            method: "satisfiability query (no disagreeing assignment)".to_string(),
            counterexample: None,
        }),
        Outcome::Satisfiable(witness) => {
            let counterexample = build_counterexample(a, b, &witness.inputs);
            Ok(EquivalenceResult {
                verdict: Verdict::NotEquivalent,
                method: "satisfiability query (counterexample found)".to_string(),
                counterexample: Some(counterexample),
            })
        }
    }
}

impl Program {
    /// Semantic equivalence with the default decision procedure.
    pub fn equivalent(&self, other: &Program) -> Result<bool, EquivError> {
        let result = check_equivalence(self, other, &DpllSolver::new())?;
        Ok(result.verdict == Verdict::Equivalent)
    }
}

/// Evaluate both programs under the witness and record every shared
/// output that differs.
fn build_counterexample(a: &Program, b: &Program, env: &BTreeMap<Var, bool>) -> Counterexample {
    let mut disagreements = Vec::new();
    for stmt_a in a.statements() {
        let stmt_b = match b.statements().iter().find(|s| s.output == stmt_a.output) {
            Some(s) => s,
            None => continue,
        };
        // The witness binds every variable either formula reads.
        let in_a = stmt_a.expr.eval(env).unwrap_or(false);
        let in_b = stmt_b.expr.eval(env).unwrap_or(false);
        if in_a != in_b {
            disagreements.push(Disagreement {
                output: stmt_a.output.clone(),
                in_a,
                in_b,
            });
        }
    }
    Counterexample {
        inputs: env.iter().map(|(v, b)| (v.clone(), *b)).collect(),
        disagreements,
    }
}

// ─── Tests ─────────────────────────────────────────────────────────
