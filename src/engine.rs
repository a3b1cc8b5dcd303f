use crate::{
    derivation::{Derivation, Derived},
    minimize::{MinimalForm, Minimized},
    normal_form::{maxterms, minterms, NormalForm, Polarity},
    shannon::{ShannonBy, ShannonTree},
    token::{Expression, Token},
    truth_table::{StepColumn, TruthTable, TruthVector},
};
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The expression being edited and everything derived from it.
///
/// Every mutator recomputes the truth table before returning; the readers
/// only ever see a consistent snapshot.
#[derive(Debug, Default, Clone)]
pub struct Engine {
    expression: Expression,
    table: TruthTable,
}

impl Engine {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_expression(expression: Expression) -> Self {
        let mut engine = Self {
            expression,
            table: TruthTable::default(),
        };
        engine.recompute();
        engine
    }

    pub fn push(&mut self, token: impl Into<Token>) {
        self.expression.push(token);
        self.recompute();
    }

    /// Flip negation on the last variable token, if there is one.
    pub fn toggle_negation(&mut self) {
        if self.expression.toggle_last_negation() {
            self.recompute();
        }
    }

    pub fn pop(&mut self) -> Option<Token> {
        let token = self.expression.pop();
        self.recompute();
        token
    }

    pub fn clear(&mut self) {
        self.expression.clear();
        self.recompute();
    }

    /// Regenerate the truth vector, step columns and labels in full.
    pub fn recompute(&mut self) {
        self.table = TruthTable::generate(&self.expression);
        debug!(
            "recomputed `{}`: {} ({} steps)",
            self.expression,
            self.table.vector,
            self.table.columns.len()
        );
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn display(&self) -> String {
        self.expression.to_string()
    }

    pub fn table(&self) -> &TruthTable {
        &self.table
    }

    pub fn truth_vector(&self) -> &TruthVector {
        &self.table.vector
    }

    pub fn columns(&self) -> &[StepColumn] {
        &self.table.columns
    }

    pub fn labels(&self) -> &[String] {
        &self.table.labels
    }

    pub fn minterms(&self) -> Vec<u8> {
        minterms(&self.table.vector)
    }

    pub fn maxterms(&self) -> Vec<u8> {
        maxterms(&self.table.vector)
    }

    pub fn canonical_dnf(&self) -> NormalForm {
        NormalForm::canonical_dnf(&self.table.vector)
    }

    /// Canonical CNF; an empty expression reads as the constant 1.
    pub fn canonical_cnf(&self) -> NormalForm {
        if self.expression.is_empty() {
            return NormalForm::constant(Polarity::Pos, true);
        }
        NormalForm::canonical_cnf(&self.table.vector)
    }

    pub fn minimal_dnf(&self) -> Minimized {
        MinimalForm(Polarity::Sop).minimize(&self.table.vector)
    }

    pub fn minimal_cnf(&self) -> Minimized {
        MinimalForm(Polarity::Pos).minimize(&self.table.vector)
    }

    /// Shannon expansion by the variable named `variable`.
    pub fn shannon(&self, variable: &str) -> Derived {
        self.derive(&ShannonBy(variable.to_string()))
    }

    pub fn shannon_tree(&self) -> ShannonTree {
        ShannonTree::build(&self.table.vector)
    }

    pub fn derive(&self, derivation: &impl Derivation) -> Derived {
        debug!("deriving {} of `{}`", derivation.name(), self.expression);
        derivation.derive(&self.table.vector)
    }

    pub fn report(&self, shannon_variable: &str) -> Report {
        Report {
            expression: self.display(),
            truth_vector: self.table.vector,
            columns: self.table.columns.clone(),
            minterms: self.minterms(),
            maxterms: self.maxterms(),
            canonical_dnf: self.canonical_dnf().to_string(),
            canonical_cnf: self.canonical_cnf().to_string(),
            minimal_dnf: self.derive(&MinimalForm(Polarity::Sop)),
            minimal_cnf: self.derive(&MinimalForm(Polarity::Pos)),
            shannon: self.shannon(shannon_variable),
        }
    }
}

impl FromStr for Engine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::from_expression(s.parse()?))
    }
}

/// Every output of the engine for one expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub expression: String,
    pub truth_vector: TruthVector,
    pub columns: Vec<StepColumn>,
    pub minterms: Vec<u8>,
    pub maxterms: Vec<u8>,
    pub canonical_dnf: String,
    pub canonical_cnf: String,
    pub minimal_dnf: Derived,
    pub minimal_cnf: Derived,
    pub shannon: Derived,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        operator::Operator,
        tests::bits,
        token::{Literal, Variable},
    };

    #[test]
    fn test_and() {
        let mut engine = Engine::new();
        engine.push(Token::var(Variable::X));
        engine.push(Operator::And);
        engine.push(Token::var(Variable::Y));

        assert_eq!("x∧y", engine.display());
        assert_eq!(bits([0, 0, 0, 0, 0, 0, 1, 1]), *engine.truth_vector());
        assert_eq!(
            "x∧y∧z\u{0304} ∨ x∧y∧z",
            engine.canonical_dnf().to_string()
        );
        assert_eq!("x∧y", engine.minimal_dnf().expression());
        assert_eq!("x ∧ y", engine.minimal_cnf().expression());
    }

    #[test]
    fn test_or() {
        let engine: Engine = "x | y".parse().unwrap();
        assert_eq!(bits([0, 0, 1, 1, 1, 1, 1, 1]), *engine.truth_vector());
        assert_eq!(vec![2, 3, 4, 5, 6, 7], engine.minterms());
        assert_eq!(vec![0, 1], engine.maxterms());
        assert_eq!("x ∨ y", engine.minimal_dnf().expression());
    }

    #[test]
    fn test_empty() {
        let engine = Engine::new();
        assert_eq!(TruthVector::default(), *engine.truth_vector());
        assert_eq!("0", engine.canonical_dnf().to_string());
        assert_eq!("1", engine.canonical_cnf().to_string());
        assert!(engine.columns().is_empty());
        assert!(engine.labels().is_empty());
        assert!(engine.minimal_dnf().trace.is_empty());
        assert!(engine.minimal_cnf().trace.is_empty());
        assert_eq!("1", engine.report("x").canonical_cnf);

        // a contradiction is a real all-false function
        let engine: Engine = "x & !x".parse().unwrap();
        assert_eq!(TruthVector::default(), *engine.truth_vector());
        assert_eq!("0", engine.canonical_cnf().to_string());
    }

    #[test]
    fn test_toggle_negation() {
        let mut engine = Engine::new();
        engine.push(Token::var(Variable::X));
        engine.toggle_negation();
        assert_eq!(bits([1, 1, 1, 1, 0, 0, 0, 0]), *engine.truth_vector());
        assert_eq!(
            Some(&Token::Variable(Literal::negative(Variable::X))),
            engine.expression().last()
        );

        engine.toggle_negation();
        assert_eq!(bits([0, 0, 0, 0, 1, 1, 1, 1]), *engine.truth_vector());
    }

    #[test]
    fn test_xor() {
        let mut engine = Engine::new();
        engine.push(Token::var(Variable::X));
        engine.push(Operator::Xor);
        engine.push(Token::var(Variable::Y));
        assert_eq!(bits([0, 0, 1, 1, 1, 1, 0, 0]), *engine.truth_vector());
        assert_eq!(vec!["x⊕y"], engine.labels());
    }

    #[test]
    fn test_pop_and_clear_recompute() {
        let mut engine: Engine = "x & y | z".parse().unwrap();
        assert_eq!(Some(Token::var(Variable::Z)), engine.pop());
        assert_eq!("x∧y∨", engine.display());
        assert_eq!(bits([0, 0, 0, 0, 0, 0, 1, 1]), *engine.truth_vector());

        engine.clear();
        assert_eq!("", engine.display());
        assert_eq!(TruthVector::default(), *engine.truth_vector());
        assert!(engine.labels().is_empty());
        assert_eq!(None, engine.pop());
    }

    #[test]
    fn test_idempotent() {
        let mut engine: Engine = "!x -> y & z <-> x".parse().unwrap();
        let before = engine.table().clone();
        engine.recompute();
        assert_eq!(&before, engine.table());
        assert_eq!(before.labels, engine.labels());
    }

    #[test]
    fn test_shannon() {
        let engine: Engine = "x & y".parse().unwrap();
        let d = engine.shannon("x");
        assert_eq!("f(x,y,z) = x∧(y∧z\u{0304} ∨ y∧z) ∨ x\u{0304}∧(0)", d.expression);
        assert_eq!("Invalid variable: q", engine.shannon("q").expression);
        assert_eq!("Invalid variable: X", engine.shannon("X").expression);
        assert_eq!(*engine.truth_vector(), engine.shannon_tree().expand());
    }

    #[test]
    fn test_custom_derivation() {
        struct Weight;

        impl Derivation for Weight {
            fn name(&self) -> String {
                "weight".to_string()
            }

            fn derive(&self, v: &TruthVector) -> Derived {
                Derived {
                    expression: v.iter().filter(|&&b| b).count().to_string(),
                    steps: vec![],
                }
            }
        }

        let engine: Engine = "x | y".parse().unwrap();
        assert_eq!("6", engine.derive(&Weight).expression);
    }

    #[test]
    fn test_report() {
        let engine: Engine = "x & y".parse().unwrap();
        let report = engine.report("y");
        assert_eq!("x∧y", report.expression);
        assert_eq!("x∧y", report.minimal_dnf.expression);
        assert_eq!(engine.shannon("y"), report.shannon);
        let json = serde_json::to_string(&report).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(report, back);
    }
}
