use anyhow::{bail, Error, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A binary boolean connective.
///
/// The set is closed: truth function and precedence are looked up from the
/// variant alone, and both the evaluator and the step labelling read them
/// from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum Operator {
    And,
    Or,
    Xor,
    Nor,
    Nand,
    Implies,
    ReverseImplies,
    Xnor,
}

impl Operator {
    pub const ALL: [Operator; 8] = [
        Operator::And,
        Operator::Or,
        Operator::Xor,
        Operator::Nor,
        Operator::Nand,
        Operator::Implies,
        Operator::ReverseImplies,
        Operator::Xnor,
    ];

    /// Apply the connective to `a` (left) and `b` (right).
    #[inline]
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            Operator::And => a && b,
            Operator::Or => a || b,
            Operator::Xor => a != b,
            Operator::Nor => !(a || b),
            Operator::Nand => !(a && b),
            Operator::Implies => !a || b,
            Operator::ReverseImplies => a || !b,
            Operator::Xnor => a == b,
        }
    }

    /// AND binds tightest, then OR; every other connective shares the lowest class.
    #[inline]
    pub fn precedence(self) -> u8 {
        match self {
            Operator::And => 2,
            Operator::Or => 1,
            _ => 0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::And => "∧",
            Operator::Or => "∨",
            Operator::Xor => "⊕",
            Operator::Nor => "↓",
            Operator::Nand => "↑",
            Operator::Implies => "→",
            Operator::ReverseImplies => "←",
            Operator::Xnor => "↔",
        }
    }

    /// Accepted spellings in textual input, besides the display symbol.
    pub(crate) fn spellings(self) -> &'static [&'static str] {
        match self {
            Operator::And => &["∧", "&", "and"],
            Operator::Or => &["∨", "|", "or"],
            Operator::Xor => &["⊕", "^", "xor"],
            Operator::Nor => &["↓", "nor"],
            Operator::Nand => &["↑", "nand"],
            Operator::Implies => &["→", "->", "imp"],
            Operator::ReverseImplies => &["←", "<-", "rimp"],
            Operator::Xnor => &["↔", "<->", "xnor"],
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        for op in Operator::ALL {
            if op.spellings().iter().any(|sp| sp.eq_ignore_ascii_case(s)) {
                return Ok(op);
            }
        }
        bail!("unknown operator: {s:?}")
    }
}
