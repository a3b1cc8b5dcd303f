//! Shannon (Boole) expansion: `f = v∧f|v=1 ∨ v̄∧f|v=0`.

use crate::{
    derivation::{Derivation, Derived},
    token::{Literal, Variable},
    truth_table::{TruthVector, ROWS},
};
use itertools::Itertools;
use ptree::{Style, TreeItem};
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt, io};

/// The function left after fixing one variable, over the other two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cofactor {
    pub fixed: Variable,
    pub value: bool,
    /// Remaining variables in x, y, z order.
    pub vars: [Variable; 2],
    /// Indexed by `2a + b` for remaining variables `[a, b]`.
    pub values: [bool; 4],
}

impl Cofactor {
    pub fn new(v: &TruthVector, fixed: Variable, value: bool) -> Self {
        let vars = fixed.others();
        let mut values = [false; 4];
        for row in (0..ROWS as u8).filter(|&i| fixed.bit(i) == value) {
            values[Self::position(vars, row)] = v[row as usize];
        }
        Self {
            fixed,
            value,
            vars,
            values,
        }
    }

    fn position(vars: [Variable; 2], row: u8) -> usize {
        (vars[0].bit(row) as usize) << 1 | vars[1].bit(row) as usize
    }

    /// Value in row `index` of the full table; the fixed variable is ignored.
    pub fn eval(&self, index: u8) -> bool {
        self.values[Self::position(self.vars, index)]
    }

    /// Rows of the full table the cofactor is read from.
    pub fn rows(&self) -> Vec<u8> {
        (0..ROWS as u8)
            .filter(|&i| self.fixed.bit(i) == self.value)
            .collect()
    }

    /// `f(1,y,z)`-style signature.
    pub fn signature(&self) -> String {
        let args = Variable::ALL
            .iter()
            .map(|&var| {
                if var == self.fixed {
                    (self.value as u8).to_string()
                } else {
                    var.to_string()
                }
            })
            .join(",");
        format!("f({args})")
    }
}

impl fmt::Display for Cofactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b] = self.vars;
        let terms: Vec<String> = (0..4)
            .filter(|&i| self.values[i])
            .map(|i| {
                let lhs = Literal::new(a, i & 2 == 0);
                let rhs = Literal::new(b, i & 1 == 0);
                format!("{lhs}∧{rhs}")
            })
            .collect();
        if terms.is_empty() {
            f.write_str("0")
        } else {
            f.write_str(&terms.join(" ∨ "))
        }
    }
}

/// Expansion of a truth vector by one variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shannon {
    pub variable: Variable,
    pub high: Cofactor,
    pub low: Cofactor,
}

impl Shannon {
    pub fn one_line(&self) -> String {
        format!(
            "f(x,y,z) = {}∧({}) ∨ {}∧({})",
            Literal::plain(self.variable),
            self.high,
            Literal::negative(self.variable),
            self.low
        )
    }

    pub fn steps(&self) -> Vec<String> {
        let var = self.variable;
        let mut steps = vec![
            format!("Shannon expansion by {var}:"),
            format!(
                "f(x,y,z) = {}∧{} ∨ {}∧{}",
                Literal::plain(var),
                self.high.signature(),
                Literal::negative(var),
                self.low.signature()
            ),
        ];
        for cofactor in [&self.high, &self.low] {
            let [a, b] = cofactor.vars;
            steps.push(format!(
                "Cofactor {var} = {}: rows {}",
                cofactor.value as u8,
                cofactor.rows().iter().join(", ")
            ));
            steps.push(format!(
                "  {}: {}",
                cofactor.signature(),
                (0..4)
                    .map(|i| format!(
                        "{a}{b}={}{} → {}",
                        i >> 1,
                        i & 1,
                        cofactor.values[i] as u8
                    ))
                    .join(", ")
            ));
            steps.push(format!("  {} = {cofactor}", cofactor.signature()));
        }
        steps.push(format!("Result: {}", self.one_line()));
        steps
    }

    /// Rebuild the truth vector from both cofactors.
    pub fn reconstruct(&self) -> TruthVector {
        TruthVector::from_fn(|i| {
            if self.variable.bit(i) {
                self.high.eval(i)
            } else {
                self.low.eval(i)
            }
        })
    }
}

pub fn decompose(v: &TruthVector, variable: Variable) -> Shannon {
    Shannon {
        variable,
        high: Cofactor::new(v, variable, true),
        low: Cofactor::new(v, variable, false),
    }
}

/// Shannon expansion by a variable given by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShannonBy(pub String);

impl Derivation for ShannonBy {
    fn name(&self) -> String {
        format!("Shannon expansion by {}", self.0)
    }

    /// Names outside x, y, z yield an "Invalid variable" result.
    fn derive(&self, v: &TruthVector) -> Derived {
        let var = match self.0.as_str() {
            "x" => Variable::X,
            "y" => Variable::Y,
            "z" => Variable::Z,
            other => {
                debug!("shannon expansion rejected: {other:?}");
                let message = format!("Invalid variable: {other}");
                return Derived {
                    expression: message.clone(),
                    steps: vec![message],
                };
            }
        };
        let shannon = decompose(v, var);
        Derived {
            expression: shannon.one_line(),
            steps: shannon.steps(),
        }
    }
}

/// Full expansion over x, then y, then z, stopping at constant cofactors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShannonTree {
    Const {
        path: Vec<Literal>,
        value: bool,
    },
    Split {
        path: Vec<Literal>,
        var: Variable,
        high: Box<ShannonTree>,
        low: Box<ShannonTree>,
    },
}

impl ShannonTree {
    pub fn build(v: &TruthVector) -> Self {
        Self::build_inner(v, &Variable::ALL, Vec::new())
    }

    fn build_inner(v: &TruthVector, remaining: &[Variable], path: Vec<Literal>) -> Self {
        let mut rows = (0..ROWS as u8).filter(|&i| path.iter().all(|lit| lit.eval(i)));
        let first = rows.next().map_or(false, |i| v[i as usize]);
        let constant = rows.all(|i| v[i as usize] == first);

        match remaining.split_first() {
            Some((&var, rest)) if !constant => {
                let mut high_path = path.clone();
                high_path.push(Literal::plain(var));
                let mut low_path = path.clone();
                low_path.push(Literal::negative(var));
                ShannonTree::Split {
                    path,
                    var,
                    high: Box::new(Self::build_inner(v, rest, high_path)),
                    low: Box::new(Self::build_inner(v, rest, low_path)),
                }
            }
            _ => ShannonTree::Const { path, value: first },
        }
    }

    pub fn eval(&self, index: u8) -> bool {
        match self {
            ShannonTree::Const { value, .. } => *value,
            ShannonTree::Split { var, high, low, .. } => {
                if var.bit(index) {
                    high.eval(index)
                } else {
                    low.eval(index)
                }
            }
        }
    }

    pub fn expand(&self) -> TruthVector {
        TruthVector::from_fn(|i| self.eval(i))
    }

    fn path(&self) -> &[Literal] {
        match self {
            ShannonTree::Const { path, .. } | ShannonTree::Split { path, .. } => path,
        }
    }
}

impl TreeItem for ShannonTree {
    type Child = Self;

    fn write_self<W: io::Write>(&self, f: &mut W, style: &Style) -> io::Result<()> {
        let path = if self.path().is_empty() {
            "f".to_string()
        } else {
            self.path().iter().join("∧")
        };
        match self {
            ShannonTree::Const { value, .. } => {
                write!(f, "{path}: {}", style.paint(*value as u8))
            }
            ShannonTree::Split { var, .. } => write!(f, "{path}: {}", style.paint(var)),
        }
    }

    fn children(&self) -> Cow<[Self::Child]> {
        match self {
            ShannonTree::Const { .. } => Cow::from(vec![]),
            ShannonTree::Split { high, low, .. } => {
                Cow::from(vec![high.as_ref().clone(), low.as_ref().clone()])
            }
        }
    }
}

pub fn print_tree(tree: &ShannonTree) -> io::Result<()> {
    ptree::print_tree(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::ALL_VECTORS;

    #[test]
    fn test_and_by_x() {
        let v = TruthVector::from_bits(0b1100_0000);
        let s = decompose(&v, Variable::X);
        assert_eq!([false, false, true, true], s.high.values);
        assert_eq!([false; 4], s.low.values);
        assert_eq!(
            "f(x,y,z) = x∧(y∧z\u{0304} ∨ y∧z) ∨ x\u{0304}∧(0)",
            s.one_line()
        );
        assert_eq!(
            vec![
                "Shannon expansion by x:".to_string(),
                "f(x,y,z) = x∧f(1,y,z) ∨ x\u{0304}∧f(0,y,z)".to_string(),
                "Cofactor x = 1: rows 4, 5, 6, 7".to_string(),
                "  f(1,y,z): yz=00 → 0, yz=01 → 0, yz=10 → 1, yz=11 → 1".to_string(),
                "  f(1,y,z) = y∧z\u{0304} ∨ y∧z".to_string(),
                "Cofactor x = 0: rows 0, 1, 2, 3".to_string(),
                "  f(0,y,z): yz=00 → 0, yz=01 → 0, yz=10 → 0, yz=11 → 0".to_string(),
                "  f(0,y,z) = 0".to_string(),
                format!("Result: {}", s.one_line()),
            ],
            s.steps()
        );
    }

    #[test]
    fn test_middle_variable() {
        // f = x ⊕ z, expanded by y: both cofactors equal
        let v = TruthVector::from_fn(|i| Variable::X.bit(i) != Variable::Z.bit(i));
        let s = decompose(&v, Variable::Y);
        assert_eq!([Variable::X, Variable::Z], s.high.vars);
        assert_eq!(s.high.values, s.low.values);
        assert_eq!("x\u{0304}∧z ∨ x∧z\u{0304}", s.high.to_string());
        assert_eq!("f(x,1,z)", s.high.signature());
    }

    #[test]
    fn test_round_trip() {
        for v in ALL_VECTORS.iter() {
            for var in Variable::ALL {
                assert_eq!(*v, decompose(v, var).reconstruct(), "{v} by {var}");
            }
        }
    }

    #[test]
    fn test_invalid_variable() {
        let v = TruthVector::from_bits(0b1010_1010);
        let d = ShannonBy("w".to_string()).derive(&v);
        assert_eq!("Invalid variable: w", d.expression);
        assert_eq!(vec!["Invalid variable: w".to_string()], d.steps);

        // names are matched exactly, without case folding or trimming
        for name in ["X", " y ", "z ", ""] {
            let d = ShannonBy(name.to_string()).derive(&v);
            assert_eq!(format!("Invalid variable: {name}"), d.expression);
            assert_eq!(vec![d.expression.clone()], d.steps);
        }

        let d = ShannonBy("z".to_string()).derive(&v);
        assert_eq!("f(x,y,z) = z∧(x\u{0304}∧y\u{0304} ∨ x\u{0304}∧y ∨ x∧y\u{0304} ∨ x∧y) ∨ z\u{0304}∧(0)", d.expression);
    }

    #[test]
    fn test_tree() {
        let v = TruthVector::from_bits(0b1100_0000);
        let tree = ShannonTree::build(&v);
        assert_eq!(
            ShannonTree::Split {
                path: vec![],
                var: Variable::X,
                high: Box::new(ShannonTree::Split {
                    path: vec![Literal::plain(Variable::X)],
                    var: Variable::Y,
                    high: Box::new(ShannonTree::Const {
                        path: vec![Literal::plain(Variable::X), Literal::plain(Variable::Y)],
                        value: true,
                    }),
                    low: Box::new(ShannonTree::Const {
                        path: vec![Literal::plain(Variable::X), Literal::negative(Variable::Y)],
                        value: false,
                    }),
                }),
                low: Box::new(ShannonTree::Const {
                    path: vec![Literal::negative(Variable::X)],
                    value: false,
                }),
            },
            tree
        );
        print_tree(&tree).ok();
    }

    #[test]
    fn test_tree_expands() {
        for v in ALL_VECTORS.iter() {
            assert_eq!(*v, ShannonTree::build(v).expand());
        }
    }
}
