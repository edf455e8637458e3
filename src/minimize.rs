//! Selector-variable clause-redundancy minimization (`minimize`).
use crate::solver::SatSolver;
use crate::stats::Stats;
use crate::types::Lit;

/// A candidate encoding cloned into a selector-augmented solver: clause `i`
/// of the original becomes `Ci ∨ selector(i)` in `encoding`, where asserting
/// `selector(i)` disables the clause and negating it re-enables it.
pub struct Minimized<S: SatSolver> {
    pub encoding: S,
    /// number of "real" variables (the original encoding's variable count).
    pub o: usize,
    /// `redundant[i]` iff clause `i` was found removable.
    pub redundant: Vec<bool>,
    pub removed: usize,
}

impl<S: SatSolver> Minimized<S> {
    fn selector(&self, i: usize) -> Lit {
        (self.o + i + 1) as Lit
    }

    /// the surviving clause count: kept clauses, units included (units are
    /// never tested for redundancy, so they are always kept).
    pub fn cost(&self) -> usize {
        (0..self.encoding.n_clauses())
            .filter(|&i| !self.redundant[i] && !self.encoding.get_clause(i).is_empty())
            .count()
    }

    /// print the surviving, non-redundant clauses as DIMACS, restricted to
    /// the `o` real variables.
    pub fn print(&self) {
        println!("p cnf {} {}", self.o, self.cost());
        for i in 0..self.encoding.n_clauses() {
            if self.redundant[i] {
                continue;
            }
            let lits = self.encoding.get_clause(i);
            if lits.is_empty() {
                continue;
            }
            let real: Vec<String> = lits
                .iter()
                .filter(|&&l| l.unsigned_abs() as usize <= self.o)
                .map(|l| l.to_string())
                .collect();
            println!("{} 0", real.join(" "));
        }
    }
}

/// clone `source` into a selector-augmented solver and find the clauses that
/// can be dropped without losing any implication any other clause provides.
pub fn minimize<S: SatSolver + Default>(source: &S, locking: bool, stats: &mut Stats) -> Minimized<S> {
    let mut clone = S::default();
    let o = source.copy_to(&mut clone);
    clone.set_assumptions(o);

    let n = clone.n_clauses();
    let mut redundant = vec![false; n];
    let mut removed = 0;

    for i in 0..n {
        if clone.is_locked(i) {
            continue;
        }
        let full = clone.get_clause(i).to_vec();
        if full.is_empty() {
            continue;
        }
        let selector_i = (o + i + 1) as Lit;
        let real_lits: Vec<Lit> = full.into_iter().filter(|&l| l != selector_i).collect();
        if real_lits.len() <= 1 {
            // unit clauses are never redundancy candidates: they are always
            // kept and counted separately.
            continue;
        }

        let mut implied_count = 0;
        for (j, &lj) in real_lits.iter().enumerate() {
            let mut assumptions: Vec<Lit> = Vec::with_capacity(real_lits.len() + n);
            for (z, &lz) in real_lits.iter().enumerate() {
                if z != j {
                    assumptions.push(-lz);
                }
            }
            assumptions.push(selector_i); // disable clause i itself
            for w in 0..n {
                if w == i {
                    continue;
                }
                let sw = (o + w + 1) as Lit;
                assumptions.push(if redundant[w] { sw } else { -sw });
            }

            if clone.propagate_locking(&assumptions, locking) && clone.trail().contains(&lj) {
                implied_count += 1;
            }
        }

        if implied_count == real_lits.len() {
            redundant[i] = true;
            removed += 1;
            stats.redundant_removed += 1;
        } else if locking {
            clone.undo_locked();
        }
    }

    Minimized { encoding: clone, o, redundant, removed }
}
