//! Boolean function engine over three inputs x, y, z.
//!
//! A token sequence is evaluated into an 8-row truth vector, from which the
//! canonical and minimal normal forms and Shannon expansions are derived,
//! each with a textual trace of how it was obtained.

#[macro_use]
extern crate tracing;

pub mod audit;
pub mod derivation;
pub mod engine;
pub mod eval;
pub mod minimize;
pub mod normal_form;
pub mod operator;
pub mod shannon;
pub mod token;
pub mod truth_table;
pub mod utils;


pub use derivation::{Derivation, Derived};
pub use engine::{Engine, Report};
pub use eval::{evaluate, Assignment};
pub use minimize::{minimize, Implicant, MinimalForm, Minimized};
pub use normal_form::{NormalForm, Polarity, Term};
pub use operator::Operator;
pub use shannon::{decompose, Shannon, ShannonBy, ShannonTree};
pub use token::{Expression, Literal, Token, Variable};
pub use truth_table::{StepColumn, TruthTable, TruthVector};
