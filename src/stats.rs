//! Running counters for a GenPCE invocation, printed as `c`-prefixed DIMACS
//! comment lines the way `splr::state::SolverState` reports solver progress.
use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct Stats {
    /// clauses learned by the core enumerator (both the target-refutes and
    /// the reference-unsat paths).
    pub clauses_learned: usize,
    /// times the unsat-core minimizer actually dropped a literal.
    pub mus_shrinks: usize,
    /// partial assignments popped off the enumerator's priority queue.
    pub assignments_explored: usize,
    /// fingerprinted branches skipped because they were already memoized.
    pub memo_hits: usize,
    /// clauses the redundancy minimizer found removable.
    pub redundant_removed: usize,
    /// auxiliary variables the greedy driver promoted into the input set.
    pub auxiliaries_promoted: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "c clauses learned: {}", self.clauses_learned)?;
        writeln!(f, "c mus shrinks: {}", self.mus_shrinks)?;
        writeln!(f, "c assignments explored: {}", self.assignments_explored)?;
        writeln!(f, "c memo hits: {}", self.memo_hits)?;
        writeln!(f, "c redundant clauses removed: {}", self.redundant_removed)?;
        write!(f, "c auxiliaries promoted: {}", self.auxiliaries_promoted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_reports_every_counter() {
        let mut s = Stats::default();
        s.clauses_learned = 3;
        s.auxiliaries_promoted = 1;
        let text = s.to_string();
        assert!(text.contains("clauses learned: 3"));
        assert!(text.contains("auxiliaries promoted: 1"));
    }
}
