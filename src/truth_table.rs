use crate::{
    eval::{evaluate, Assignment},
    operator::Operator,
    token::{render_tokens, Literal, Token, Variable},
};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};

pub const ROWS: usize = 8;

/// Function values over the 8 rows, indexed by `4x + 2y + z`.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Deref,
    derive_more::DerefMut,
    derive_more::From,
    derive_more::Into,
)]
pub struct TruthVector(pub [bool; ROWS]);

impl TruthVector {
    pub fn from_fn(f: impl Fn(u8) -> bool) -> Self {
        let mut v = [false; ROWS];
        for (i, b) in v.iter_mut().enumerate() {
            *b = f(i as u8);
        }
        Self(v)
    }

    /// Bit `i` of `bits` is the value of row `i`.
    pub fn from_bits(bits: u8) -> Self {
        Self::from_fn(|i| (bits >> i) & 1 == 1)
    }

    pub fn to_bits(&self) -> u8 {
        self.iter()
            .enumerate()
            .fold(0, |acc, (i, &b)| acc | (b as u8) << i)
    }

    /// Every truth vector over three inputs.
    pub fn all() -> impl Iterator<Item = TruthVector> {
        (0..=u8::MAX).map(Self::from_bits)
    }
}

impl fmt::Display for TruthVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.iter() {
            write!(f, "{}", b as u8)?;
        }
        Ok(())
    }
}

/// Values of one sub-expression across all rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepColumn {
    pub label: String,
    pub values: TruthVector,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum StepKind {
    Negation(Variable),
    Pair {
        left: Literal,
        op: Operator,
        right: Literal,
    },
    /// The first `n` tokens of the expression.
    Prefix(usize),
}

#[derive(Debug, Clone)]
struct Step {
    label: String,
    kind: StepKind,
}

impl Step {
    fn eval(&self, tokens: &[Token], assignment: &Assignment) -> bool {
        match self.kind {
            StepKind::Negation(var) => !assignment.get(var),
            StepKind::Pair { left, op, right } => {
                op.apply(assignment.literal(left), assignment.literal(right))
            }
            StepKind::Prefix(n) => evaluate(&tokens[..n], assignment),
        }
    }
}

/// Decide the ordered step columns for `tokens`.
///
/// Negated variables come first (once each, in order of appearance), then
/// every adjacent `variable op variable` triple, AND triples before OR
/// triples before the rest. Expressions longer than three tokens add their
/// proper prefixes of at least three tokens whose label is new and longer
/// than three characters.
fn plan_steps(tokens: &[Token]) -> Vec<Step> {
    let mut steps = Vec::new();

    let mut negated: Vec<Variable> = Vec::new();
    for token in tokens {
        if let Token::Variable(Literal { var, negated: true }) = *token {
            if !negated.contains(&var) {
                negated.push(var);
            }
        }
    }
    steps.extend(negated.into_iter().map(|var| Step {
        label: Literal::negative(var).to_string(),
        kind: StepKind::Negation(var),
    }));

    for precedence in [2, 1, 0] {
        for window in tokens.windows(3) {
            if let [Token::Variable(left), Token::Operator(op), Token::Variable(right)] = *window {
                if op.precedence() == precedence {
                    steps.push(Step {
                        label: format!("{left}{op}{right}"),
                        kind: StepKind::Pair { left, op, right },
                    });
                }
            }
        }
    }

    if tokens.len() > 3 {
        let mut seen: HashSet<String> = steps.iter().map(|s| s.label.clone()).collect();
        for n in 3..tokens.len() {
            let label = render_tokens(&tokens[..n]);
            if label.chars().count() > 3 && !seen.contains(&label) {
                seen.insert(label.clone());
                steps.push(Step {
                    label,
                    kind: StepKind::Prefix(n),
                });
            }
        }
    }

    steps
}

/// Truth vector of an expression together with its intermediate columns.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruthTable {
    pub vector: TruthVector,
    pub columns: Vec<StepColumn>,
    pub labels: Vec<String>,
}

impl TruthTable {
    /// Enumerate all 8 rows of `tokens`.
    ///
    /// The column layout is fixed before the first row and filled by index
    /// for every row.
    pub fn generate(tokens: &[Token]) -> Self {
        let steps = plan_steps(tokens);
        let labels: Vec<String> = steps.iter().map(|s| s.label.clone()).collect();
        let mut columns: Vec<StepColumn> = labels
            .iter()
            .map(|label| StepColumn {
                label: label.clone(),
                values: TruthVector::default(),
            })
            .collect();
        let mut vector = TruthVector::default();

        for row in 0..ROWS {
            let assignment = Assignment::from_index(row as u8);
            for (column, step) in columns.iter_mut().zip(&steps) {
                column.values[row] = step.eval(tokens, &assignment);
            }
            vector[row] = evaluate(tokens, &assignment);
        }

        trace!("truth table {vector} with {} step columns", columns.len());
        Self {
            vector,
            columns,
            labels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Expression;
    use proptest::prelude::*;

    fn table(exp: &str) -> TruthTable {
        let exp: Expression = exp.parse().unwrap();
        TruthTable::generate(&exp)
    }

    #[test]
    fn test_bits() {
        for v in TruthVector::all() {
            assert_eq!(v, TruthVector::from_bits(v.to_bits()));
        }
        assert_eq!(256, TruthVector::all().count());
        assert_eq!("00000011", TruthVector::from_bits(0b1100_0000).to_string());
    }

    #[test]
    fn test_empty() {
        let t = table("");
        assert_eq!(TruthVector([false; 8]), t.vector);
        assert!(t.columns.is_empty());
        assert!(t.labels.is_empty());
    }

    #[test]
    fn test_three_tokens() {
        let t = table("x & y");
        assert_eq!("00000011", t.vector.to_string());
        assert_eq!(vec!["x∧y"], t.labels);
        assert_eq!(t.vector, t.columns[0].values);
    }

    #[test]
    fn test_negation_columns() {
        let t = table("!x & y | !x");
        assert_eq!(
            vec!["x\u{0304}", "x\u{0304}∧y", "y∨x\u{0304}", "x\u{0304}∧y∨"],
            t.labels
        );
        assert_eq!("11110000", t.columns[0].values.to_string());
        assert_eq!("00110000", t.columns[1].values.to_string());
        assert_eq!("11110011", t.columns[2].values.to_string());
        // the dangling operator is dropped when the prefix is evaluated
        assert_eq!("00110000", t.columns[3].values.to_string());
        assert_eq!("11110000", t.vector.to_string());
    }

    #[test]
    fn test_pair_order_and_prefixes() {
        let t = table("x ^ y | z & x");
        assert_eq!(
            vec!["z∧x", "y∨z", "x⊕y", "x⊕y∨", "x⊕y∨z", "x⊕y∨z∧"],
            t.labels
        );
        assert_eq!(t.labels.len(), t.columns.len());
        for (label, column) in t.labels.iter().zip(&t.columns) {
            assert_eq!(label, &column.label);
        }
        // ⊕ is pending below ∨ and ∧, so it is reduced last
        let expect = TruthVector::from_fn(|i| {
            let a = Assignment::from_index(i);
            a.x != (a.y || (a.z && a.x))
        });
        assert_eq!(expect, t.vector);
    }

    #[test]
    fn test_idempotent() {
        let exp: Expression = "!x -> y <- !z ^ x".parse().unwrap();
        assert_eq!(TruthTable::generate(&exp), TruthTable::generate(&exp));
    }

    proptest! {
        #[test]
        fn test_generate_is_stable(exp in any::<Expression>()) {
            let table = TruthTable::generate(&exp);
            prop_assert_eq!(&table, &TruthTable::generate(&exp));
            prop_assert_eq!(table.labels.len(), table.columns.len());
            for (label, column) in table.labels.iter().zip(&table.columns) {
                prop_assert_eq!(label, &column.label);
            }
            for i in 0..ROWS as u8 {
                prop_assert_eq!(evaluate(&exp, &Assignment::from_index(i)), table.vector[i as usize]);
            }
        }
    }
}
