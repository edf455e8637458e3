//! Crate-wide error type, in the hand-rolled style of `splr::types::SolverError`:
//! no `thiserror`/`anyhow` dependency, `Display`/`Error` implemented by hand.
use std::fmt;
use std::io;

/// Errors produced by GenPCE's external collaborators (I/O, DIMACS parsing)
/// and, more rarely, by the core itself when a solver-contract invariant is
/// violated.
#[derive(Debug)]
pub enum GenPceError {
    /// unopenable file or a read/write failure.
    Io(io::Error),
    /// malformed DIMACS input, reported by the parser collaborator.
    Dimacs { line: usize, message: String },
    /// a clause addition made the solver trivially UNSAT at the root level.
    Inconsistent,
    /// an assertion from the solver contract failed; this is a programmer
    /// error, not a recoverable condition.
    Internal(&'static str),
}

impl fmt::Display for GenPceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenPceError::Io(e) => write!(f, "I/O error: {}", e),
            GenPceError::Dimacs { line, message } => {
                write!(f, "malformed DIMACS at line {}: {}", line, message)
            }
            GenPceError::Inconsistent => write!(f, "formula is inconsistent at the root level"),
            GenPceError::Internal(msg) => write!(f, "internal consistency failure: {}", msg),
        }
    }
}

impl std::error::Error for GenPceError {}

impl From<io::Error> for GenPceError {
    fn from(e: io::Error) -> Self {
        GenPceError::Io(e)
    }
}

pub type GenPceResult<T> = Result<T, GenPceError>;
