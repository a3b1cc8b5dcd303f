use crate::{
    token::{Literal, Variable},
    truth_table::{TruthVector, ROWS},
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which way terms and literals are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    /// Sum of products: OR of AND-terms.
    Sop,
    /// Product of sums: AND of OR-clauses.
    Pos,
}

impl Polarity {
    pub fn name(self) -> &'static str {
        match self {
            Polarity::Sop => "DNF",
            Polarity::Pos => "CNF",
        }
    }

    /// Render one term: a product for SOP, a parenthesized sum for POS.
    pub fn render_term(self, term: &Term) -> String {
        match self {
            Polarity::Sop if term.is_empty() => "1".to_string(),
            Polarity::Pos if term.is_empty() => "0".to_string(),
            Polarity::Sop => term.iter().join("∧"),
            Polarity::Pos if term.len() == 1 => term[0].to_string(),
            Polarity::Pos => format!("({})", term.iter().join("∨")),
        }
    }
}

/// Literals of one product (SOP) or one clause (POS).
#[derive(
    Debug,
    Default,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Deref,
    derive_more::From,
)]
pub struct Term(pub Vec<Literal>);

impl FromIterator<Literal> for Term {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A two-level boolean expression.
///
/// With no terms a SOP is FALSE and a POS is TRUE. A term without literals
/// makes a SOP TRUE and a POS FALSE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalForm {
    pub polarity: Polarity,
    pub terms: Vec<Term>,
}

impl NormalForm {
    pub fn new(polarity: Polarity, terms: Vec<Term>) -> Self {
        Self { polarity, terms }
    }

    pub fn constant(polarity: Polarity, value: bool) -> Self {
        let identity = polarity == Polarity::Pos;
        let terms = if value == identity {
            vec![]
        } else {
            vec![Term::default()]
        };
        Self::new(polarity, terms)
    }

    /// Canonical DNF: one full product per minterm.
    pub fn canonical_dnf(v: &TruthVector) -> Self {
        let minterms = minterms(v);
        match minterms.len() {
            0 => Self::constant(Polarity::Sop, false),
            ROWS => Self::constant(Polarity::Sop, true),
            _ => Self::new(
                Polarity::Sop,
                minterms.into_iter().map(minterm_product).collect(),
            ),
        }
    }

    /// Canonical CNF: one full clause per maxterm.
    pub fn canonical_cnf(v: &TruthVector) -> Self {
        let maxterms = maxterms(v);
        match maxterms.len() {
            0 => Self::constant(Polarity::Pos, true),
            ROWS => Self::constant(Polarity::Pos, false),
            _ => Self::new(
                Polarity::Pos,
                maxterms.into_iter().map(maxterm_clause).collect(),
            ),
        }
    }

    /// Value in row `index`.
    pub fn eval(&self, index: u8) -> bool {
        match self.polarity {
            Polarity::Sop => self
                .terms
                .iter()
                .any(|t| t.iter().all(|lit| lit.eval(index))),
            Polarity::Pos => self
                .terms
                .iter()
                .all(|t| t.iter().any(|lit| lit.eval(index))),
        }
    }

    pub fn truth_vector(&self) -> TruthVector {
        TruthVector::from_fn(|i| self.eval(i))
    }
}

impl fmt::Display for NormalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (empty, absorbing, separator) = match self.polarity {
            Polarity::Sop => ("0", "1", " ∨ "),
            Polarity::Pos => ("1", "0", " ∧ "),
        };
        if self.terms.is_empty() {
            return f.write_str(empty);
        }
        if self.terms.iter().any(|t| t.is_empty()) {
            return f.write_str(absorbing);
        }

        let rendered = self
            .terms
            .iter()
            .map(|t| self.polarity.render_term(t))
            .join(separator);
        f.write_str(&rendered)
    }
}

/// Rows where `v` is true.
pub fn minterms(v: &TruthVector) -> Vec<u8> {
    (0..ROWS as u8).filter(|&i| v[i as usize]).collect()
}

/// Rows where `v` is false.
pub fn maxterms(v: &TruthVector) -> Vec<u8> {
    (0..ROWS as u8).filter(|&i| !v[i as usize]).collect()
}

fn minterm_product(index: u8) -> Term {
    Variable::ALL
        .into_iter()
        .map(|var| Literal::new(var, !var.bit(index)))
        .collect()
}

fn maxterm_clause(index: u8) -> Term {
    Variable::ALL
        .into_iter()
        .map(|var| Literal::new(var, var.bit(index)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        eval::{evaluate, Assignment},
        token::Expression,
    };
    use std::collections::BTreeSet;

    #[test]
    fn test_canonical_and() {
        let v = TruthVector::from_bits(0b1100_0000);
        assert_eq!(vec![6, 7], minterms(&v));
        assert_eq!(vec![0, 1, 2, 3, 4, 5], maxterms(&v));
        assert_eq!(
            "x∧y∧z\u{0304} ∨ x∧y∧z",
            NormalForm::canonical_dnf(&v).to_string()
        );
        assert_eq!(
            "(x∨y∨z) ∧ (x∨y∨z\u{0304}) ∧ (x∨y\u{0304}∨z) ∧ (x∨y\u{0304}∨z\u{0304}) \
             ∧ (x\u{0304}∨y∨z) ∧ (x\u{0304}∨y∨z\u{0304})",
            NormalForm::canonical_cnf(&v).to_string()
        );
    }

    #[test]
    fn test_constants() {
        let zero = TruthVector::default();
        assert_eq!("0", NormalForm::canonical_dnf(&zero).to_string());
        assert_eq!("0", NormalForm::canonical_cnf(&zero).to_string());

        let one = TruthVector([true; 8]);
        assert_eq!("1", NormalForm::canonical_dnf(&one).to_string());
        assert_eq!("1", NormalForm::canonical_cnf(&one).to_string());

        for polarity in [Polarity::Sop, Polarity::Pos] {
            assert_eq!(one, NormalForm::constant(polarity, true).truth_vector());
            assert_eq!(zero, NormalForm::constant(polarity, false).truth_vector());
        }
    }

    #[test]
    fn test_render_term() {
        let term = Term(vec![Literal::negative(Variable::Y)]);
        assert_eq!("y\u{0304}", Polarity::Sop.render_term(&term));
        assert_eq!("y\u{0304}", Polarity::Pos.render_term(&term));

        let term = Term(vec![Literal::plain(Variable::X), Literal::negative(Variable::Z)]);
        assert_eq!("x∧z\u{0304}", Polarity::Sop.render_term(&term));
        assert_eq!("(x∨z\u{0304})", Polarity::Pos.render_term(&term));
    }

    #[test]
    fn test_minterms_maxterms_partition() {
        for v in TruthVector::all() {
            let min: BTreeSet<u8> = minterms(&v).into_iter().collect();
            let max: BTreeSet<u8> = maxterms(&v).into_iter().collect();
            assert!(min.is_disjoint(&max));
            assert_eq!((0..8).collect::<BTreeSet<u8>>(), &min | &max);
        }
    }

    #[test]
    fn test_canonical_reproduces_vector() {
        for v in TruthVector::all() {
            assert_eq!(v, NormalForm::canonical_dnf(&v).truth_vector());
            assert_eq!(v, NormalForm::canonical_cnf(&v).truth_vector());
        }
    }

    #[test]
    fn test_canonical_dnf_reparses() {
        // AND binds tighter than OR, so a rendered DNF evaluates as written
        for v in TruthVector::all().filter(|v| v.iter().any(|&b| b) && !v.iter().all(|&b| b)) {
            let exp: Expression = NormalForm::canonical_dnf(&v).to_string().parse().unwrap();
            let actual = TruthVector::from_fn(|i| evaluate(&exp, &Assignment::from_index(i)));
            assert_eq!(v, actual);
        }
    }
}
