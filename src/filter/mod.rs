//! label filter expressions
//!
//! a small boolean language for selecting entities by their labels:
//! - membership: `rack` is true when the entity has a `rack` label
//! - equality: `role=controller`
//! - logical operators: `not`, `and`, `or` (case-insensitive, in that binding order)
//! - grouping with parentheses, quoting with ' or "
//! - atoms placed side by side are OR'd: `a b` means `a or b`
//! - the empty expression matches everything
//!
//! an expression is compiled once (tokenize, then shunting-yard to postfix)
//! and can then be evaluated against any number of label sets.

mod error;
mod eval;
mod parser;
mod tokenizer;
mod types;

use std::fmt;
use std::str::FromStr;

use tracing::debug;

pub use error::FilterError;
pub use eval::{evaluate, referenced_labels, Labels};
pub use parser::{compile, to_postfix};
pub use tokenizer::tokenize;
pub use types::{Arity, Associativity, Instruction, Operator, Program, Token, TokenKind};

/// a compiled filter expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFilter {
    expression: String,
    program: Program,
}

impl LabelFilter {
    /// compile an expression
    pub fn new(expression: impl Into<String>) -> Result<Self, FilterError> {
        let expression = expression.into();
        let program = compile(&expression)?;
        debug!(%expression, %program, "compiled filter");

        Ok(Self {
            expression,
            program,
        })
    }

    /// check whether a label set satisfies the filter
    ///
    /// fails only when the expression cannot be reduced, e.g. `a and`
    pub fn matches<L: Labels + ?Sized>(&self, labels: &L) -> Result<bool, FilterError> {
        evaluate(&self.program, labels)
    }

    /// the source expression
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// label names the filter tests for
    pub fn referenced_labels(&self) -> Vec<&str> {
        referenced_labels(&self.program)
    }

    /// true when the filter accepts every entity without looking at labels
    pub fn is_match_all(&self) -> bool {
        self.program.iter().all(Instruction::is_fin)
    }
}

impl Default for LabelFilter {
    fn default() -> Self {
        Self {
            expression: String::new(),
            program: Program::new(Vec::new(), 0),
        }
    }
}

impl FromStr for LabelFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for LabelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)
    }
}
