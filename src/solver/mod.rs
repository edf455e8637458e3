//! The solver interface: an abstraction over an incremental CDCL SAT engine.
//! The encoding-construction algorithms depend on exactly this capability
//! set; [`cdcl::CdclSolver`] is the concrete backend that implements it.
mod cdcl;

pub use cdcl::CdclSolver;

use crate::types::{Lit, SatResult, VarId};

/// API a SAT engine must provide for the GenPCE core to build on.
///
/// Mirrors the shape of `splr`'s `AssignIF`/`ClauseDBIF` traits: a handful of
/// small, precisely contracted methods rather than one large monolith.
pub trait SatSolver {
    /// allocate a fresh variable, returning its id.
    fn new_var(&mut self) -> VarId;
    /// total number of variables known to the solver.
    fn n_vars(&self) -> usize;
    /// total number of clauses (original + learnt) currently stored.
    fn n_clauses(&self) -> usize;
    /// number of unit clauses among the stored clauses.
    fn n_units(&self) -> usize;
    /// number of stored clauses flagged as learnt rather than original.
    fn n_learnt(&self) -> usize;

    /// add a clause. Returns `Err` if this makes the solver trivially
    /// UNSAT at the root level.
    fn add_clause(&mut self, lits: &[Lit]) -> Result<(), crate::error::GenPceError>;

    /// assumption-based solve: returns `Sat` or `Unsat`. On `Unsat`,
    /// [`SatSolver::conflict`] returns a clause of negated assumptions
    /// sufficient for the inconsistency.
    fn solve(&mut self, assumptions: &[Lit]) -> SatResult;

    /// attempt BCP only (no decisions). Returns `false` iff a conflict is
    /// reached. Does not populate [`SatSolver::conflict`].
    fn propagate(&mut self, assumptions: &[Lit]) -> bool {
        self.propagate_locking(assumptions, false)
    }

    /// as [`SatSolver::propagate`], but when `lock` is set, every clause
    /// that BCP relies on to imply a literal is locked so it cannot be
    /// judged redundant until [`SatSolver::undo_locked`] or
    /// [`SatSolver::clear_locked`] runs. This is the plumbing the clause
    /// redundancy minimizer's `--minimal-lock` mode needs: locking is a
    /// side effect of propagation itself.
    fn propagate_locking(&mut self, assumptions: &[Lit], lock: bool) -> bool;

    /// the conflict clause from the most recent `Unsat` [`SatSolver::solve`].
    fn conflict(&self) -> &[Lit];

    /// the current trail (assigned literals, in assignment order).
    fn trail(&self) -> &[Lit];

    /// the literals of clause `i`.
    fn get_clause(&self, i: usize) -> &[Lit];
    /// whether clause `i` is currently locked.
    fn is_locked(&self, i: usize) -> bool;
    /// the clause currently justifying variable `v`'s assignment, if any.
    fn lock_reason(&self, v: VarId) -> Option<usize>;
    /// undo the locks acquired by the most recent `propagate_locking` call.
    fn undo_locked(&mut self);
    /// clear all locks.
    fn clear_locked(&mut self);

    /// structural clone: `dst` receives a copy of `self`'s clauses plus one
    /// fresh *selector* variable per clause, each stored as `clause ∨ selector`.
    /// Returns the number of variables `self` had before cloning.
    fn copy_to(&self, dst: &mut Self) -> usize
    where
        Self: Sized;

    /// declare the first `k` variables as the "real" variables; any beyond
    /// that (selectors, if any) occupy the remainder.
    fn set_assumptions(&mut self, k: usize);

    fn print_units(&self);
    fn print_clause(&self, i: usize);
    fn print_formula(&self);
}
