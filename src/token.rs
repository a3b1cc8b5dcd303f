use crate::operator::Operator;
use anyhow::{bail, Context, Error, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Marker appended to a variable name to render its negation.
pub const NEGATION_MARK: char = '\u{0304}';

/// One of the three inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum Variable {
    X,
    Y,
    Z,
}

impl Variable {
    pub const ALL: [Variable; 3] = [Variable::X, Variable::Y, Variable::Z];

    /// Bit position of the variable in a row index (x is the most significant).
    #[inline]
    pub fn shift(self) -> u8 {
        match self {
            Variable::X => 2,
            Variable::Y => 1,
            Variable::Z => 0,
        }
    }

    /// Value of the variable in row `index`.
    #[inline]
    pub fn bit(self, index: u8) -> bool {
        (index >> self.shift()) & 1 == 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Variable::X => "x",
            Variable::Y => "y",
            Variable::Z => "z",
        }
    }

    /// The two variables left after fixing `self`, in x, y, z order.
    pub fn others(self) -> [Variable; 2] {
        match self {
            Variable::X => [Variable::Y, Variable::Z],
            Variable::Y => [Variable::X, Variable::Z],
            Variable::Z => [Variable::X, Variable::Y],
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "x" | "X" => Ok(Variable::X),
            "y" | "Y" => Ok(Variable::Y),
            "z" | "Z" => Ok(Variable::Z),
            other => bail!("unknown variable: {other:?}"),
        }
    }
}

/// A possibly negated variable.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Constructor,
)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Literal {
    pub var: Variable,
    pub negated: bool,
}

impl Literal {
    pub fn plain(var: Variable) -> Self {
        Self::new(var, false)
    }

    pub fn negative(var: Variable) -> Self {
        Self::new(var, true)
    }

    /// Value of the literal in row `index`.
    #[inline]
    pub fn eval(self, index: u8) -> bool {
        self.var.bit(index) != self.negated
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.var)?;
        if self.negated {
            write!(f, "{NEGATION_MARK}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum Token {
    Variable(Literal),
    Operator(Operator),
    LeftParen,
    RightParen,
}

impl Token {
    pub fn var(var: Variable) -> Self {
        Token::Variable(Literal::plain(var))
    }
}

impl From<Operator> for Token {
    fn from(op: Operator) -> Self {
        Token::Operator(op)
    }
}

impl From<Literal> for Token {
    fn from(lit: Literal) -> Self {
        Token::Variable(lit)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Variable(lit) => write!(f, "{lit}"),
            Token::Operator(op) => write!(f, "{op}"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
        }
    }
}

/// An ordered token sequence.
///
/// No structural validation happens on append; any sequence is accepted and
/// evaluated best-effort.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, derive_more::Deref, derive_more::From)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Expression(Vec<Token>);

impl Expression {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    pub fn push(&mut self, token: impl Into<Token>) {
        self.0.push(token.into());
    }

    /// Flip negation on the most recently appended variable token.
    /// Return `false` if the expression holds no variable.
    pub fn toggle_last_negation(&mut self) -> bool {
        match self.0.iter_mut().rev().find_map(|t| match t {
            Token::Variable(lit) => Some(lit),
            _ => None,
        }) {
            Some(lit) => {
                lit.negated = !lit.negated;
                true
            }
            None => false,
        }
    }

    pub fn pop(&mut self) -> Option<Token> {
        self.0.pop()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<Token> for Expression {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Render a token slice the way it is labelled on screen: symbols
/// concatenated without separators.
pub fn render_tokens(tokens: &[Token]) -> String {
    tokens.iter().map(Token::to_string).collect()
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_tokens(&self.0))
    }
}

impl FromStr for Expression {
    type Err = Error;

    /// Read a token sequence such as `x & !y | z` or `x∧ȳ∨z`.
    ///
    /// Variables are pushed and negated the same way an interactive caller
    /// would: append, then toggle.
    fn from_str(s: &str) -> Result<Self> {
        let mut spellings: Vec<(&str, Operator)> = Operator::ALL
            .iter()
            .flat_map(|&op| op.spellings().iter().map(move |&sp| (sp, op)))
            .collect();
        spellings.sort_by_key(|(sp, _)| std::cmp::Reverse(sp.len()));

        let mut exp = Expression::new();
        let mut pending_negation = false;
        let mut rest = s;
        while let Some(c) = rest.chars().next() {
            let offset = s.len() - rest.len();
            if c.is_whitespace() {
                rest = &rest[c.len_utf8()..];
                continue;
            }

            // word spellings only count when they stand apart from letters
            let glued = |sp: &str| {
                let is_letter = |c: Option<char>| c.map_or(false, |c| c.is_ascii_alphabetic());
                sp.starts_with(|c: char| c.is_ascii_alphabetic())
                    && (is_letter(s[..offset].chars().next_back())
                        || is_letter(rest[sp.len()..].chars().next()))
            };
            let lowered = rest.to_ascii_lowercase();
            if let Some(&(sp, op)) = spellings
                .iter()
                .find(|(sp, _)| lowered.starts_with(sp) && !glued(*sp))
            {
                if pending_negation {
                    bail!("negation before operator at byte {offset}");
                }
                exp.push(op);
                rest = &rest[sp.len()..];
                continue;
            }

            match c {
                '!' | '~' | '¬' => pending_negation = !pending_negation,
                '(' => exp.push(Token::LeftParen),
                ')' => exp.push(Token::RightParen),
                NEGATION_MARK => {
                    if !matches!(exp.last(), Some(Token::Variable(_))) {
                        bail!("negation mark without a variable at byte {offset}");
                    }
                    exp.toggle_last_negation();
                }
                _ => {
                    let var: Variable = c
                        .to_string()
                        .parse()
                        .with_context(|| format!("unexpected {c:?} at byte {offset}"))?;
                    exp.push(Token::var(var));
                    if pending_negation {
                        exp.toggle_last_negation();
                        pending_negation = false;
                    }
                }
            }
            rest = &rest[c.len_utf8()..];
        }

        if pending_negation {
            bail!("dangling negation at end of input");
        }
        Ok(exp)
    }
}
