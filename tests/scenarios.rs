//! End-to-end scenarios driving the public crate API the way a CLI
//! invocation would: DIMACS text in, a solver built from it, then one of
//! the checker/construct/minimize/greedy paths over that solver.
use genpce::checker::check_optimal;
use genpce::dimacs::parse;
use genpce::enumerator::build_optimal;
use genpce::greedy::greedy_optimization;
use genpce::minimize::minimize;
use genpce::solver::{CdclSolver, SatSolver};
use genpce::stats::Stats;
use genpce::types::Cnf;
use std::io::{BufReader, Cursor};

fn parsed(text: &str) -> (Cnf, Vec<i32>) {
    let parsed = parse(BufReader::new(Cursor::new(text.as_bytes().to_vec()))).unwrap();
    (parsed.cnf, parsed.inputs)
}

fn solver_from(text: &str) -> (CdclSolver, Vec<i32>) {
    let (cnf, inputs) = parsed(text);
    (CdclSolver::from_cnf(&cnf).unwrap(), inputs)
}

fn fresh_target(n: usize) -> CdclSolver {
    let mut t = CdclSolver::new();
    for _ in 0..n {
        t.new_var();
    }
    t
}

/// a formula with no satisfying assignment at all (x1 XNOR x2 and x1 XOR
/// x2, both required) is vacuously propagation-complete, and buildOptimal
/// has nothing to witness: there's no model to fail against.
#[test]
fn contradictory_reference_is_vacuously_complete() {
    let (mut reference, inputs) = solver_from("p cnf 2 4\n1 2 0\n-1 2 0\n1 -2 0\n-1 -2 0\n");
    assert!(check_optimal(&mut reference, &inputs, false));

    let mut target = fresh_target(2);
    let mut stats = Stats::default();
    build_optimal(&mut reference, &mut target, &inputs, false, 1, false, &mut stats);
    assert_eq!(target.n_clauses(), 0);
}

/// an AND gate (y <-> a /\ b) is already propagation-complete over its own
/// clauses; constructing a target from scratch should reconstruct exactly
/// those three clauses and nothing more.
#[test]
fn and_gate_reference_reconstructs_to_a_fixpoint() {
    let (mut reference, inputs) = solver_from("c i 1 2 3 0\np cnf 3 3\n-3 1 0\n-3 2 0\n3 -1 -2 0\n");
    assert!(check_optimal(&mut reference, &inputs, false));

    let mut target = fresh_target(3);
    let mut stats = Stats::default();
    build_optimal(&mut reference, &mut target, &inputs, false, 1, false, &mut stats);
    assert!(target.propagate(&[1, 2]));
    assert!(target.trail().contains(&3));
    assert!(target.propagate(&[-1]));
    assert!(target.trail().contains(&-3));

    let minimized = minimize(&target, false, &mut stats);
    assert_eq!(minimized.cost(), 3);
    assert_eq!(minimized.removed, 0);
}

/// (a∨b), (¬a∨c), (¬b∨c): c is entailed unconditionally but only by
/// case-splitting on a, so checkOptimal must report a gap, and buildOptimal
/// must close it by learning the unit clause forcing c.
#[test]
fn resolution_only_gap_is_detected_and_then_closed() {
    let (mut reference, inputs) = solver_from("c i 1 2 3 0\np cnf 3 3\n1 2 0\n-1 3 0\n-2 3 0\n");
    assert!(!check_optimal(&mut reference, &inputs, false));

    let mut target = fresh_target(3);
    let mut stats = Stats::default();
    build_optimal(&mut reference, &mut target, &inputs, false, 1, false, &mut stats);
    assert!(target.propagate(&[]));
    assert!(target.trail().contains(&3));
    assert!(stats.clauses_learned > 0);
}

/// a transitive implication chain (¬a∨b), (¬b∨c), (¬a∨c): the third clause
/// is subsumed by resolving the first two through BCP under the selector
/// scheme, so C5 should drop it and report a smaller cost.
#[test]
fn redundant_transitive_clause_is_minimized_away() {
    let (reference, _inputs) = solver_from("p cnf 3 3\n-1 2 0\n-2 3 0\n-1 3 0\n");
    let mut stats = Stats::default();
    let minimized = minimize(&reference, false, &mut stats);
    assert_eq!(minimized.removed, 1);
    assert_eq!(minimized.cost(), 2);
    assert!(minimized.redundant[2]);
}

/// the full construct-then-minimize pipeline a `--minimal` CLI run takes:
/// building from scratch never ends up costing more than the reference's
/// own clause count once redundancy is cleaned up.
#[test]
fn construct_then_minimize_never_exceeds_the_reference_size() {
    let (mut reference, inputs) = solver_from("c i 1 2 3 0\np cnf 3 3\n-3 1 0\n-3 2 0\n3 -1 -2 0\n");
    let mut target = fresh_target(3);
    let mut stats = Stats::default();
    build_optimal(&mut reference, &mut target, &inputs, false, 1, true, &mut stats);
    let minimized = minimize(&target, true, &mut stats);
    assert!(minimized.cost() <= reference.n_clauses());
}

/// C7's hill-climb over a two-gate chain: greedy_optimization must
/// terminate, and whatever it settles on is never worse than the
/// already-minimized encoding over the original inputs alone.
#[test]
fn greedy_optimization_terminates_and_does_not_regress() {
    let (mut reference, _inputs) =
        solver_from("p cnf 4 5\n-3 1 0\n-3 2 0\n3 -1 -2 0\n-4 3 0\n4 -3 0\n");
    let initial_inputs = vec![1, 2, 4];
    let mut stats = Stats::default();

    let mut baseline_target = fresh_target(4);
    build_optimal(&mut reference, &mut baseline_target, &initial_inputs, false, 1, false, &mut stats);
    let baseline = minimize(&baseline_target, false, &mut stats);

    let result = greedy_optimization(&mut reference, &initial_inputs, false, 1, false, false, &mut stats);
    assert!(result.cost <= baseline.cost());
    assert_eq!(result.inputs.len(), initial_inputs.len() + result.promoted.len());
    assert!(stats.clauses_learned > 0);
}
