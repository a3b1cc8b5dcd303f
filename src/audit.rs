//! Exhaustive check of every derived form over all 256 functions of x, y, z.

use crate::{
    minimize::MinimalForm,
    normal_form::{maxterms, minterms, NormalForm, Polarity},
    shannon::{decompose, ShannonTree},
    token::Variable,
    truth_table::{TruthVector, ROWS},
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub functions: usize,
    pub redundant_covers: usize,
    pub failures: Vec<String>,
}

impl AuditReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Problems found with the derived forms of `v`; empty when all round trip.
pub fn check(v: &TruthVector) -> Vec<String> {
    let mut failures = Vec::new();
    let mut expect = |what: &str, actual: TruthVector| {
        if actual != *v {
            failures.push(format!("{v}: {what} gives {actual}"));
        }
    };

    expect("canonical DNF", NormalForm::canonical_dnf(v).truth_vector());
    expect("canonical CNF", NormalForm::canonical_cnf(v).truth_vector());
    expect(
        "minimal DNF",
        MinimalForm(Polarity::Sop).minimize(v).form.truth_vector(),
    );
    expect(
        "minimal CNF",
        MinimalForm(Polarity::Pos).minimize(v).form.truth_vector(),
    );
    for var in Variable::ALL {
        expect(
            &format!("Shannon expansion by {var}"),
            decompose(v, var).reconstruct(),
        );
    }
    expect("Shannon tree", ShannonTree::build(v).expand());

    let (min, max) = (minterms(v), maxterms(v));
    if min.len() + max.len() != ROWS || min.iter().any(|i| max.contains(i)) {
        failures.push(format!("{v}: minterms {min:?} and maxterms {max:?} do not partition"));
    }
    failures
}

/// Whether dropping one prime implicant from the minimal DNF keeps it sound.
fn has_redundant_cover(v: &TruthVector) -> bool {
    let form = MinimalForm(Polarity::Sop).minimize(v).form;
    (0..form.terms.len()).any(|skip| {
        let mut reduced = form.clone();
        reduced.terms.remove(skip);
        reduced.truth_vector() == *v
    })
}

pub fn audit() -> AuditReport {
    info!("auditing all {} functions", 1 << ROWS);
    let (failures, redundant): (Vec<Vec<String>>, Vec<bool>) = (0u16..1 << ROWS)
        .into_par_iter()
        .map(|bits| {
            let v = TruthVector::from_bits(bits as u8);
            (check(&v), has_redundant_cover(&v))
        })
        .unzip();

    let report = AuditReport {
        functions: redundant.len(),
        redundant_covers: redundant.into_iter().filter(|&r| r).count(),
        failures: failures.into_iter().flatten().collect(),
    };
    if report.is_ok() {
        info!(
            "audit passed, {} functions keep redundant prime implicants",
            report.redundant_covers
        );
    } else {
        warn!("audit found {} failures", report.failures.len());
    }
    report
}
