//! Greedy auxiliary-variable driver (`greedyOptimization`): wraps the core
//! enumerator and the redundancy minimizer in a hill-climb that promotes
//! interior variables into the input set whenever doing so shrinks the
//! minimized encoding.
use std::collections::HashSet;

use crate::enumerator::build_optimal;
use crate::minimize::{minimize, Minimized};
use crate::solver::SatSolver;
use crate::stats::Stats;
use crate::types::{Lit, VarId};

pub struct GreedyResult<S: SatSolver> {
    /// the final input literals: the original inputs plus every promoted
    /// auxiliary, in promotion order.
    pub inputs: Vec<Lit>,
    /// auxiliaries promoted, in the order they were promoted.
    pub promoted: Vec<VarId>,
    pub minimized: Minimized<S>,
    pub cost: usize,
}

fn build_and_minimize<S: SatSolver + Default>(
    reference: &mut S,
    inputs: &[Lit],
    random: bool,
    seed: u64,
    mus_enabled: bool,
    locking: bool,
    stats: &mut Stats,
) -> Minimized<S> {
    let mut target = S::default();
    for _ in 0..reference.n_vars() {
        target.new_var();
    }
    build_optimal(reference, &mut target, inputs, random, seed, mus_enabled, stats);
    minimize(&target, locking, stats)
}

/// iterates `buildOptimal` + `minimize`, growing the input set one
/// auxiliary variable at a time while the minimized clause count strictly
/// decreases, per the contract of component C7.
pub fn greedy_optimization<S: SatSolver + Default>(
    reference: &mut S,
    initial_inputs: &[Lit],
    random: bool,
    seed: u64,
    mus_enabled: bool,
    locking: bool,
    stats: &mut Stats,
) -> GreedyResult<S> {
    let n = reference.n_vars();
    let input_vars: HashSet<VarId> = initial_inputs.iter().map(|l| l.vi()).collect();
    let mut current_inputs: Vec<Lit> = initial_inputs.to_vec();
    let mut aux_pool: Vec<VarId> = (1..=n).filter(|v| !input_vars.contains(v)).collect();
    let mut promoted: Vec<VarId> = Vec::new();

    let mut current = build_and_minimize(
        reference, &current_inputs, random, seed, mus_enabled, locking, stats,
    );
    let mut cost_current = current.cost();

    loop {
        let mut best: Option<(VarId, Minimized<S>, usize)> = None;
        for &v in &aux_pool {
            let mut trial_inputs = current_inputs.clone();
            trial_inputs.push(v as Lit);
            let m = build_and_minimize(
                reference, &trial_inputs, random, seed, mus_enabled, locking, stats,
            );
            let c = m.cost();
            let is_better = match &best {
                Some((_, _, bc)) => c < *bc,
                None => true,
            };
            if is_better {
                best = Some((v, m, c));
            }
        }

        match best {
            Some((v, m, c)) if c < cost_current => {
                aux_pool.retain(|&x| x != v);
                current_inputs.push(v as Lit);
                promoted.push(v);
                cost_current = c;
                current = m;
                stats.auxiliaries_promoted += 1;
            }
            _ => break,
        }
    }

    GreedyResult {
        inputs: current_inputs,
        promoted,
        minimized: current,
        cost: cost_current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::CdclSolver;

    fn build(clauses: &[&[Lit]], nv: usize) -> CdclSolver {
        let mut s = CdclSolver::new();
        for _ in 0..nv {
            s.new_var();
        }
        for c in clauses {
            s.add_clause(c).unwrap();
        }
        s
    }

    #[test]
    fn never_makes_the_encoding_bigger_and_terminates() {
        // y <-> (a ∧ b), Tseitin var t aliased to y via (¬t∨y),(t∨¬y).
        // Starting with {a, b, t} as inputs, greedy search may or may not
        // find promoting y worthwhile, but it must always terminate and
        // never leave cost_current higher than where it started.
        let mut s = build(&[&[-3, 1], &[-3, 2], &[3, -1, -2], &[-4, 3], &[4, -3]], 4);
        let mut stats = Stats::default();
        let baseline = build_and_minimize(&mut s, &[1, 2, 4], false, 1, false, false, &mut stats);
        let baseline_cost = baseline.cost();

        let result = greedy_optimization(&mut s, &[1, 2, 4], false, 1, false, false, &mut stats);
        assert!(result.cost <= baseline_cost);
        assert_eq!(result.promoted.len(), result.inputs.len() - 3);
    }
}
