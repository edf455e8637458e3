//! Best-first enumeration over partial input assignments: constructs a
//! target encoding whose unit propagation matches a reference formula's
//! entailment over every partial input assignment.
use std::collections::{BinaryHeap, HashSet};

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::assignment::{fingerprint, Assignment};
use crate::mus;
use crate::solver::SatSolver;
use crate::stats::Stats;
use crate::types::{Lit, SatResult, VarId};

/// mutates `target` by adding clauses until, for every partial input
/// assignment `A ⊆ inputs`, BCP on `target` under `A` derives every literal
/// that `reference` entails under `A`.
///
/// Both polarity extensions of an unseen variable are treated as
/// independent: each is attempted whenever its own fingerprint is unseen,
/// rather than one polarity's exploration silently gating the other's.
pub fn build_optimal<S: SatSolver>(
    reference: &mut S,
    target: &mut S,
    inputs: &[Lit],
    random: bool,
    seed: u64,
    mus_enabled: bool,
    stats: &mut Stats,
) {
    // an unconditionally unsatisfiable reference has no model to witness;
    // any target, including one left untouched, is vacuously complete.
    if reference.solve(&[]) == SatResult::Unsat {
        return;
    }

    let order: Vec<Lit> = if random {
        let mut v = inputs.to_vec();
        let mut rng = SmallRng::seed_from_u64(seed);
        v.shuffle(&mut rng);
        v
    } else {
        inputs.to_vec()
    };

    let mut queue: BinaryHeap<Assignment> = BinaryHeap::new();
    queue.push(Assignment::empty());
    let mut memo: HashSet<Vec<Lit>> = HashSet::new();

    while let Some(mut current) = queue.pop() {
        if !target.propagate(&current.core) {
            continue; // branch already closed by a learned clause
        }
        stats.assignments_explored += 1;
        current.propagated = target.trail().to_vec();
        let seen: HashSet<VarId> = current.propagated.iter().map(|l| l.vi()).collect();

        for &p in &order {
            if seen.contains(&p.vi()) {
                continue;
            }
            let fp_pos = fingerprint(&current.core, p);
            if memo.insert(fp_pos) {
                extend(reference, target, &current, p, mus_enabled, &mut queue, stats);
            } else {
                stats.memo_hits += 1;
            }
            let fp_neg = fingerprint(&current.core, -p);
            if memo.insert(fp_neg) {
                extend(reference, target, &current, -p, mus_enabled, &mut queue, stats);
            } else {
                stats.memo_hits += 1;
            }
        }
    }
}

/// the single-literal extension step: try BCP first, fall back to a full
/// solve (against `target`, then `reference`) when BCP alone can't decide it.
fn extend<S: SatSolver>(
    reference: &mut S,
    target: &mut S,
    current: &Assignment,
    p: Lit,
    mus_enabled: bool,
    queue: &mut BinaryHeap<Assignment>,
    stats: &mut Stats,
) {
    let mut next_core = current.core.clone();
    next_core.push(p);

    if !target.propagate(&next_core) {
        // target already refutes next_core by BCP; solve is expected to
        // confirm UNSAT and hand back a tighter conflict clause.
        let res = target.solve(&next_core);
        debug_assert_eq!(res, SatResult::Unsat, "propagate failed but solve did not confirm UNSAT");
        let clause = target.conflict().to_vec();
        let _ = target.add_clause(&clause);
        stats.clauses_learned += 1;
        return;
    }

    let propagated = target.trail().to_vec();
    match reference.solve(&next_core) {
        SatResult::Sat => {
            queue.push(Assignment { core: next_core, propagated });
        }
        SatResult::Unsat => {
            let conflict = reference.conflict().to_vec();
            let learnt = if mus_enabled {
                let assumption_subset: Vec<Lit> = conflict.iter().map(|&l| -l).collect();
                let (shrunk, did_shrink) = mus::shrink_unsat_core(reference, &assumption_subset);
                if did_shrink {
                    stats.mus_shrinks += 1;
                }
                mus::core_to_clause(&shrunk)
            } else {
                conflict
            };
            let _ = target.add_clause(&learnt);
            stats.clauses_learned += 1;
        }
    }
}
