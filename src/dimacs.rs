//! DIMACS CNF parsing — the external I/O collaborator.
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use crate::error::{GenPceError, GenPceResult};
use crate::types::{Cnf, Lit};

/// a parsed reference formula plus the declared input literals, taken from
/// a leading `c i v1 v2 ... 0` comment line.
pub struct ParsedCnf {
    pub cnf: Cnf,
    pub inputs: Vec<Lit>,
}

/// reads `path`; `None` or `Some("-")` reads from stdin, mirroring the
/// stdin ergonomics the rest of this lineage's CLIs offer.
pub fn read_cnf(path: Option<&Path>) -> GenPceResult<ParsedCnf> {
    match path {
        None => parse(BufReader::new(io::stdin().lock())),
        Some(p) if p == Path::new("-") => parse(BufReader::new(io::stdin().lock())),
        Some(p) => {
            let file = File::open(p).map_err(GenPceError::Io)?;
            parse(BufReader::new(file))
        }
    }
}

/// parse a DIMACS CNF from any reader.
pub fn parse<R: Read>(reader: BufReader<R>) -> GenPceResult<ParsedCnf> {
    let mut num_vars = 0usize;
    let mut num_clauses_declared = 0usize;
    let mut clauses: Vec<Vec<Lit>> = Vec::new();
    let mut inputs: Vec<Lit> = Vec::new();
    let mut current: Vec<Lit> = Vec::new();
    let mut saw_header = false;

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(GenPceError::Io)?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('c') {
            let rest = line[1..].trim();
            if let Some(decl) = rest.strip_prefix('i') {
                inputs = parse_int_list(decl, lineno + 1)?;
            }
            continue;
        }
        if line.starts_with('p') {
            let mut it = line.split_whitespace();
            it.next(); // "p"
            let fmt = it.next().ok_or_else(|| dimacs_err(lineno + 1, "missing cnf tag"))?;
            if fmt != "cnf" {
                return Err(dimacs_err(lineno + 1, "expected 'p cnf'"));
            }
            num_vars = it
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| dimacs_err(lineno + 1, "missing variable count"))?;
            num_clauses_declared = it
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| dimacs_err(lineno + 1, "missing clause count"))?;
            saw_header = true;
            continue;
        }

        for tok in line.split_whitespace() {
            let v: Lit = tok
                .parse()
                .map_err(|_| dimacs_err(lineno + 1, &format!("not an integer: {}", tok)))?;
            if v == 0 {
                clauses.push(std::mem::take(&mut current));
            } else {
                current.push(v);
            }
        }
    }

    if !current.is_empty() {
        clauses.push(current);
    }
    if !saw_header {
        return Err(GenPceError::Dimacs { line: 0, message: "missing 'p cnf' header".into() });
    }
    let _ = num_clauses_declared; // informational only; we trust the parsed clause list.

    if inputs.is_empty() {
        // no declared input line: every variable is an input, the
        // permissive default for ad-hoc CNFs.
        inputs = (1..=num_vars as Lit).collect();
    }

    Ok(ParsedCnf { cnf: Cnf { num_vars, clauses }, inputs })
}

fn parse_int_list(s: &str, line: usize) -> GenPceResult<Vec<Lit>> {
    let mut out = Vec::new();
    for tok in s.split_whitespace() {
        let v: Lit = tok
            .parse()
            .map_err(|_| dimacs_err(line, &format!("not an integer: {}", tok)))?;
        if v == 0 {
            break;
        }
        out.push(v);
    }
    Ok(out)
}

fn dimacs_err(line: usize, message: &str) -> GenPceError {
    GenPceError::Dimacs { line, message: message.to_string() }
}
