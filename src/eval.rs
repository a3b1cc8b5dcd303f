use crate::{
    operator::Operator,
    token::{Literal, Token, Variable},
};
use serde::{Deserialize, Serialize};

/// Values of x, y and z for one row of the truth table.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Constructor,
)]
pub struct Assignment {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl Assignment {
    /// Decode row `index` (x = bit 2, y = bit 1, z = bit 0).
    pub fn from_index(index: u8) -> Self {
        Self {
            x: Variable::X.bit(index),
            y: Variable::Y.bit(index),
            z: Variable::Z.bit(index),
        }
    }

    pub fn index(&self) -> u8 {
        (self.x as u8) << 2 | (self.y as u8) << 1 | self.z as u8
    }

    #[inline]
    pub fn get(&self, var: Variable) -> bool {
        match var {
            Variable::X => self.x,
            Variable::Y => self.y,
            Variable::Z => self.z,
        }
    }

    #[inline]
    pub fn literal(&self, lit: Literal) -> bool {
        self.get(lit.var) != lit.negated
    }
}

/// Evaluate `tokens` under `assignment`.
///
/// Single left-to-right pass over an operand stack and an operator stack.
/// Before an operator is pushed, pending operators of greater or equal
/// precedence are reduced while two operands are available. Parentheses are
/// skipped without regrouping. Any token sequence is accepted; an expression
/// that leaves no operand evaluates to `false`.
pub fn evaluate(tokens: &[Token], assignment: &Assignment) -> bool {
    let mut operands: Vec<bool> = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Operator> = Vec::with_capacity(tokens.len());

    for token in tokens {
        match *token {
            Token::Variable(lit) => operands.push(assignment.literal(lit)),
            Token::Operator(op) => {
                while let Some(&top) = operators.last() {
                    if top.precedence() < op.precedence() || operands.len() < 2 {
                        break;
                    }
                    operators.pop();
                    reduce(&mut operands, top);
                }
                operators.push(op);
            }
            Token::LeftParen | Token::RightParen => {}
        }
    }

    while let Some(op) = operators.pop() {
        if operands.len() >= 2 {
            reduce(&mut operands, op);
        }
    }

    operands.last().copied().unwrap_or(false)
}

#[inline]
fn reduce(operands: &mut Vec<bool>, op: Operator) {
    if let (Some(b), Some(a)) = (operands.pop(), operands.pop()) {
        operands.push(op.apply(a, b));
    }
}
