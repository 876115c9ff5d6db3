//! Boolean assignment-formula programs and SAT-backed semantic
//! equivalence checking.
//!
//! A [`Program`] is an ordered, immutable list of `out := expr`
//! statements over named boolean variables. Three relations compare two
//! programs:
//!
//! - `==` — strict structural equality, order-sensitive.
//! - [`Isomorphic::isomorphic`] — reordering-tolerant: statement lists
//!   compare as multisets and commuted `&`/`|` operands match.
//! - [`check_equivalence`] — semantic equivalence: the pair is encoded
//!   as a single satisfiability query asserting "some shared output
//!   differs", a [`Solver`] decides it, and UNSATISFIABLE means
//!   equivalent.
//!
//! ```
//! use formeq::{check_equivalence, DpllSolver, Expr, Program, Statement, Verdict};
//!
//! let p = Program::new(vec![Statement::new("out", Expr::var("a"))]);
//! let q = Program::new(vec![Statement::new(
//!     "out",
//!     Expr::or(Expr::var("a"), Expr::and(Expr::var("a"), Expr::var("b"))),
//! )]);
//!
//! let result = check_equivalence(&p, &q, &DpllSolver::new()).unwrap();
//! assert_eq!(result.verdict, Verdict::Equivalent);
//! ```

pub mod ast;
pub mod encode;
pub mod equiv;
pub mod examine;
pub mod hash;
pub mod solve;

pub use ast::{Expr, Program, Statement, ValidateError, Var};
pub use equiv::{
    check_equivalence, Counterexample, Disagreement, EquivError, EquivalenceResult, Verdict,
};
pub use examine::Isomorphic;
pub use hash::{program_hash, ContentHash};
pub use solve::{DpllSolver, Outcome, Solver, SolverError, Witness};
