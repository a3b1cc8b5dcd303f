use crate::{
    normal_form::Term,
    token::{Literal, Variable},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cube over x, y, z.
///
/// Set bits of `mask` are generalized away; `value` keeps the pattern of the
/// remaining bits and is zero under the mask.
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
pub struct Implicant {
    pub value: u8,
    pub mask: u8,
}

impl Implicant {
    pub fn minterm(index: u8) -> Self {
        Self::new(index, 0)
    }

    #[inline]
    pub fn ones(&self) -> u32 {
        self.value.count_ones()
    }

    /// Whether row `index` lies inside the cube.
    #[inline]
    pub fn covers(&self, index: u8) -> bool {
        index & !self.mask == self.value
    }

    /// Merge two cubes with equal masks whose values differ in exactly one
    /// unmasked bit.
    pub fn combine(&self, other: &Implicant) -> Option<Implicant> {
        if self.mask != other.mask {
            return None;
        }
        let diff = self.value ^ other.value;
        if diff.count_ones() != 1 || diff & self.mask != 0 {
            return None;
        }
        Some(Implicant::new(self.value & other.value, self.mask | diff))
    }

    fn fixed(&self) -> impl Iterator<Item = Variable> + '_ {
        Variable::ALL
            .into_iter()
            .filter(|var| self.mask >> var.shift() & 1 == 0)
    }

    /// Product term of a minterm cube: a set bit is a plain literal.
    pub fn to_product(&self) -> Term {
        self.fixed()
            .map(|var| Literal::new(var, !var.bit(self.value)))
            .collect()
    }

    /// Sum clause of a maxterm cube: a set bit is a negated literal.
    pub fn to_sum(&self) -> Term {
        self.fixed()
            .map(|var| Literal::new(var, var.bit(self.value)))
            .collect()
    }
}

impl fmt::Display for Implicant {
    /// Bit pattern from x to z, `-` for a generalized position.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for var in Variable::ALL {
            let c = if self.mask >> var.shift() & 1 == 1 {
                '-'
            } else if var.bit(self.value) {
                '1'
            } else {
                '0'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
