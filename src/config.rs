//! Command-line configuration, built with `structopt` in the style the
//! teacher's own CLI binary uses.
use std::path::PathBuf;

use structopt::StructOpt;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// default seed used when `--random` is set without an explicit `--seed`.
pub const DEFAULT_SEED: u64 = 91_648_253;

#[derive(Debug, StructOpt)]
#[structopt(name = "genpce", version = VERSION, about = "constructs and certifies propagation-complete encodings of CNF formulas")]
pub struct Config {
    /// enable C4: shrink learned conflict clauses to a minimal unsat subset.
    #[structopt(long)]
    pub mus: bool,

    /// run C5 (clause-redundancy minimization) after construction.
    #[structopt(long)]
    pub minimal: bool,

    /// run C5 with the reason-locking heuristic.
    #[structopt(long = "minimal-lock")]
    pub minimal_lock: bool,

    /// run C6: check whether the reference is already propagation-complete.
    #[structopt(long)]
    pub optimal: bool,

    /// run C6 without the fingerprint memo (a trusted, slower oracle).
    #[structopt(long = "optimal-naive")]
    pub optimal_naive: bool,

    /// shuffle the traversal order over the input variables.
    #[structopt(long)]
    pub random: bool,

    /// seed for the input-order shuffle; only consulted when `--random` is set.
    #[structopt(long, default_value = "91648253")]
    pub seed: u64,

    /// run C7: greedily promote auxiliary variables into the input set.
    #[structopt(long)]
    pub greedy: bool,

    /// emit debug traces (statistics, intermediate clause counts) as `c` lines.
    #[structopt(long)]
    pub print: bool,

    /// the reference CNF. `-` or omitted reads from stdin.
    #[structopt(name = "reference.cnf")]
    pub reference: Option<PathBuf>,

    /// an optional CNF whose clauses seed the target encoding.
    #[structopt(name = "seed-encoding.cnf")]
    pub seed_encoding: Option<PathBuf>,
}

impl Config {
    /// both `--minimal` and `--minimal-lock` request C5; the latter also
    /// turns on locking.
    pub fn minimize_requested(&self) -> bool {
        self.minimal || self.minimal_lock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_seed_matches_the_documented_constant() {
        let cfg = Config::from_iter(&["genpce", "reference.cnf"]);
        assert_eq!(cfg.seed, DEFAULT_SEED);
        assert!(!cfg.random);
    }

    #[test]
    fn minimize_requested_covers_both_flags() {
        let cfg = Config::from_iter(&["genpce", "--minimal-lock", "reference.cnf"]);
        assert!(cfg.minimize_requested());
        assert!(cfg.minimal_lock);
        assert!(!cfg.minimal);
    }
}
