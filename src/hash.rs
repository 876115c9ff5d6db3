//! Content addressing: AST normalization + BLAKE3 hashing.
//!
//! Every program gets a digest of its normalized form: statement
//! digests are sorted (statement order vanishes) and the operand
//! digests of the commutative connectives are sorted (operand order
//! vanishes). Both normalizations preserve meaning, so two programs
//! with equal hashes compute the same outputs — which lets the
//! equivalence checker answer hash-equal pairs without touching the
//! solver.

use std::fmt;

use crate::ast::{Expr, Program, Statement};

// Node type tags (1-byte prefix) for the digest serialization.
const TAG_CONST: u8 = 0x01;
const TAG_VAR: u8 = 0x02;
const TAG_NOT: u8 = 0x03;
const TAG_AND: u8 = 0x04;
const TAG_OR: u8 = 0x05;
const TAG_STMT: u8 = 0x06;
const TAG_PROGRAM: u8 = 0x07;

// Version byte for hash stability across releases.
const HASH_VERSION: u8 = 1;

/// A 256-bit BLAKE3 content hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Display as full hex.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Display as short hex (first 8 characters, 32 bits).
    pub fn to_short(&self) -> String {
        self.0[..4].iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.to_short())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Digest of a program's normalized form. Statement order and the
/// operand order of `&`/`|` do not affect the result.
pub fn program_hash(program: &Program) -> ContentHash {
    let mut digests: Vec<[u8; 32]> = program.statements().iter().map(statement_digest).collect();
    digests.sort();

    let mut hasher = blake3::Hasher::new();
    hasher.update(&[HASH_VERSION, TAG_PROGRAM]);
    for d in &digests {
        hasher.update(d);
    }
    ContentHash(*hasher.finalize().as_bytes())
}

fn statement_digest(statement: &Statement) -> [u8; 32] {
    let name = statement.output.as_str().as_bytes();
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[TAG_STMT]);
    hasher.update(&(name.len() as u32).to_le_bytes());
    hasher.update(name);
    hasher.update(&expr_digest(&statement.expr));
    *hasher.finalize().as_bytes()
}

fn expr_digest(expr: &Expr) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    match expr {
        Expr::Const(b) => {
            hasher.update(&[TAG_CONST, *b as u8]);
        }
        Expr::Var(v) => {
            let name = v.as_str().as_bytes();
            hasher.update(&[TAG_VAR]);
            hasher.update(&(name.len() as u32).to_le_bytes());
            hasher.update(name);
        }
        Expr::Not(e) => {
            hasher.update(&[TAG_NOT]);
            hasher.update(&expr_digest(e));
        }
        Expr::And(l, r) | Expr::Or(l, r) => {
            let tag = if matches!(expr, Expr::And(_, _)) {
                TAG_AND
            } else {
                TAG_OR
            };
            // Commutative: hash operand digests in sorted order.
            let a = expr_digest(l);
            let b = expr_digest(r);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            hasher.update(&[tag]);
            hasher.update(&lo);
            hasher.update(&hi);
        }
    }
    *hasher.finalize().as_bytes()
}

// ─── Tests ─────────────────────────────────────────────────────────
