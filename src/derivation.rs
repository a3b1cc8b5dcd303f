use crate::truth_table::TruthVector;
use serde::{Deserialize, Serialize};

/// A derived expression together with the steps that explain it.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derived {
    pub expression: String,
    pub steps: Vec<String>,
}

/// A form derived from the truth vector alone.
///
/// Minimal normal forms and Shannon expansions implement this; further forms
/// such as the Zhegalkin polynomial plug into [`crate::Engine::derive`] the
/// same way.
pub trait Derivation {
    fn name(&self) -> String;

    fn derive(&self, v: &TruthVector) -> Derived;
}
