//! Quine–McCluskey prime implicant search.
//!
//! The same merge loop serves minterms (minimal DNF) and maxterms (minimal
//! CNF). No covering step is run: every prime implicant found ends up in the
//! result, so the cover can contain redundant terms.

mod implicant;

pub use implicant::Implicant;

use crate::{
    derivation::{Derivation, Derived},
    normal_form::{maxterms, minterms, NormalForm, Polarity, Term},
    truth_table::{TruthVector, ROWS},
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Result of [`minimize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Minimized {
    pub form: NormalForm,
    pub prime_implicants: Vec<Implicant>,
    pub trace: Vec<String>,
}

impl Minimized {
    pub fn expression(&self) -> String {
        self.form.to_string()
    }
}

fn render(polarity: Polarity, imp: &Implicant) -> Term {
    match polarity {
        Polarity::Sop => imp.to_product(),
        Polarity::Pos => imp.to_sum(),
    }
}

fn group_by_ones(level: &[Implicant]) -> [Vec<Implicant>; 4] {
    let mut groups: [Vec<Implicant>; 4] = Default::default();
    for imp in level {
        groups[imp.ones() as usize].push(*imp);
    }
    groups
}

/// Minimize the function whose minterms (SOP) or maxterms (POS) are `terms`.
///
/// Rows outside `0..8` are ignored. An empty or full term set gives the
/// matching constant with an empty trace.
pub fn minimize(terms: &[u8], polarity: Polarity) -> Minimized {
    let terms: BTreeSet<u8> = terms
        .iter()
        .copied()
        .filter(|&t| (t as usize) < ROWS)
        .collect();

    if terms.is_empty() || terms.len() == ROWS {
        let full = terms.len() == ROWS;
        let prime_implicants = if full {
            vec![Implicant::new(0, 0b111)]
        } else {
            vec![]
        };
        return Minimized {
            form: NormalForm::constant(polarity, full == (polarity == Polarity::Sop)),
            prime_implicants,
            trace: vec![],
        };
    }

    let mut trace = vec![format!("Terms: {}", terms.iter().join(", "))];
    let mut level: Vec<Implicant> = terms.iter().copied().map(Implicant::minterm).collect();

    trace.push("Groups by number of ones:".to_string());
    for (ones, group) in group_by_ones(&level).iter().enumerate() {
        if !group.is_empty() {
            trace.push(format!("  {ones}: {}", group.iter().map(|imp| imp.value).join(", ")));
        }
    }

    let mut primes: BTreeSet<Implicant> = BTreeSet::new();
    let mut iteration = 0;
    loop {
        let groups = group_by_ones(&level);
        let mut used: HashSet<Implicant> = HashSet::new();
        let mut next: Vec<Implicant> = Vec::new();
        let mut combinations: Vec<String> = Vec::new();

        for (lower, upper) in groups.iter().tuple_windows() {
            for a in lower {
                for b in upper {
                    if let Some(c) = a.combine(b) {
                        trace!("combine {a} + {b} -> {c}");
                        used.insert(*a);
                        used.insert(*b);
                        combinations.push(format!(
                            "{} + {} → {} (mask: {})",
                            a.value, b.value, c.value, c.mask
                        ));
                        if !next.contains(&c) {
                            next.push(c);
                        }
                    }
                }
            }
        }

        primes.extend(level.iter().filter(|imp| !used.contains(*imp)));
        if combinations.is_empty() {
            break;
        }

        iteration += 1;
        trace.push(format!("Iteration {iteration}:"));
        trace.extend(
            combinations
                .iter()
                .enumerate()
                .map(|(n, line)| format!("  {}. {line}", n + 1)),
        );
        level = next;
    }

    let mut rendered: Vec<(String, Implicant, Term)> = primes
        .into_iter()
        .map(|imp| {
            let term = render(polarity, &imp);
            (polarity.render_term(&term), imp, term)
        })
        .collect();
    rendered.sort_by(|a, b| a.0.cmp(&b.0));
    rendered.dedup_by(|a, b| a.0 == b.0);

    trace.push(format!(
        "Prime implicants: {}",
        rendered.iter().map(|(s, _, _)| s).join(", ")
    ));
    let (prime_implicants, terms): (Vec<_>, Vec<_>) =
        rendered.into_iter().map(|(_, imp, term)| (imp, term)).unzip();
    let form = NormalForm::new(polarity, terms);
    trace.push(format!("Result: {form}"));
    debug!(
        "minimal {}: {form} after {iteration} iterations",
        polarity.name()
    );

    Minimized {
        form,
        prime_implicants,
        trace,
    }
}

/// Minimal DNF or CNF of a truth vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimalForm(pub Polarity);

impl MinimalForm {
    pub fn minimize(&self, v: &TruthVector) -> Minimized {
        match self.0 {
            Polarity::Sop => minimize(&minterms(v), Polarity::Sop),
            Polarity::Pos => minimize(&maxterms(v), Polarity::Pos),
        }
    }
}

impl Derivation for MinimalForm {
    fn name(&self) -> String {
        format!("minimal {}", self.0.name())
    }

    fn derive(&self, v: &TruthVector) -> Derived {
        let minimized = self.minimize(v);
        Derived {
            expression: minimized.expression(),
            steps: minimized.trace,
        }
    }
}
