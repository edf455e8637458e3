//! CLI entry point: wires `Config`, DIMACS I/O, and the construction/
//! minimization/checker/greedy drivers together.
use std::process;

use structopt::StructOpt;

use genpce::checker::check_optimal;
use genpce::config::Config;
use genpce::dimacs::{read_cnf, ParsedCnf};
use genpce::enumerator::build_optimal;
use genpce::error::GenPceError;
use genpce::greedy::greedy_optimization;
use genpce::minimize::minimize;
use genpce::output::{print_greedy_result, print_stats};
use genpce::solver::{CdclSolver, SatSolver};
use genpce::stats::Stats;

fn main() {
    let config = Config::from_args();
    match run(&config) {
        Ok(code) => process::exit(code),
        Err(GenPceError::Internal(msg)) => panic!("internal consistency failure: {}", msg),
        Err(e) => {
            eprintln!("genpce: {}", e);
            process::exit(1);
        }
    }
}

fn run(config: &Config) -> Result<i32, GenPceError> {
    let ParsedCnf { cnf, inputs } = read_cnf(config.reference.as_deref())?;
    let mut reference = CdclSolver::from_cnf(&cnf)?;

    if config.optimal || config.optimal_naive {
        let is_optimal = check_optimal(&mut reference, &inputs, config.optimal_naive);
        println!("c {}", if is_optimal { "OPTIMAL" } else { "NOT OPTIMAL" });
        return Ok(if is_optimal { 10 } else { 20 });
    }

    let mut stats = Stats::default();

    if config.greedy {
        let result = greedy_optimization(
            &mut reference,
            &inputs,
            config.random,
            config.seed,
            config.mus,
            config.minimal_lock,
            &mut stats,
        );
        print_greedy_result(&result);
        if config.print {
            print_stats(&stats);
        }
        return Ok(10);
    }

    let mut target = CdclSolver::new();
    for _ in 0..reference.n_vars() {
        target.new_var();
    }
    if let Some(seed_path) = &config.seed_encoding {
        let seed = read_cnf(Some(seed_path.as_path()))?;
        for clause in &seed.cnf.clauses {
            target.add_clause(clause)?;
        }
    }

    build_optimal(&mut reference, &mut target, &inputs, config.random, config.seed, config.mus, &mut stats);

    if config.minimize_requested() {
        let minimized = minimize(&target, config.minimal_lock, &mut stats);
        minimized.print();
    } else {
        println!("c i {} 0", inputs.iter().map(|l| l.to_string()).collect::<Vec<_>>().join(" "));
        target.print_formula();
    }

    if config.print {
        print_stats(&stats);
    }
    Ok(10)
}
