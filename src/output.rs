//! Debug traces and the greedy-mode `c i ...` / `c aux ...` report lines.
use crate::greedy::GreedyResult;
use crate::solver::SatSolver;
use crate::stats::Stats;

/// emit the final input set and the promoted-auxiliary list, then the
/// minimized DIMACS encoding itself.
pub fn print_greedy_result<S: SatSolver>(result: &GreedyResult<S>) {
    let inputs: Vec<String> = result.inputs.iter().map(|l| l.to_string()).collect();
    println!("c i {} 0", inputs.join(" "));
    let aux: Vec<String> = result.promoted.iter().map(|v| v.to_string()).collect();
    println!("c aux {} 0", aux.join(" "));
    result.minimized.print();
}

/// emitted only under `--print`.
pub fn print_stats(stats: &Stats) {
    println!("{}", stats);
}
