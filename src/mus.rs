//! Deletion-based minimal-unsat-subset shrinking.
use crate::solver::SatSolver;
use crate::types::{Lit, SatResult};

/// Given an assumption set `assumptions` with `solver.solve(assumptions) ==
/// Unsat`, repeatedly test whether dropping one literal keeps it UNSAT;
/// if so, drop it for good. Returns the shrunk assumption set and whether
/// any shrinkage occurred.
pub fn shrink_unsat_core<S: SatSolver>(solver: &mut S, assumptions: &[Lit]) -> (Vec<Lit>, bool) {
    let mut core: Vec<Lit> = assumptions.to_vec();
    let mut shrank = false;
    let mut i = 0;
    while i < core.len() {
        let mut candidate = core.clone();
        candidate.remove(i);
        if candidate.is_empty() {
            i += 1;
            continue;
        }
        if solver.solve(&candidate) == SatResult::Unsat {
            core = candidate;
            shrank = true;
            // don't advance i: the element at this position shifted in.
        } else {
            i += 1;
        }
    }
    (core, shrank)
}

/// converts a minimized unsat core (a set of assumption literals) back into
/// a clause ruling it out: the negation of every literal in the core.
pub fn core_to_clause(core: &[Lit]) -> Vec<Lit> {
    core.iter().map(|&l| -l).collect()
}
