//! postfix program evaluator
//!
//! walks a compiled program with a value stack private to each call, so one
//! program can be evaluated concurrently against any number of label sets

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::BuildHasher;

use super::error::FilterError;
use super::types::{Instruction, Operator, Program};

/// read-only label lookup for one candidate entity
pub trait Labels {
    /// value of the label `key`, if the entity carries it
    fn label(&self, key: &str) -> Option<&str>;

    fn has_label(&self, key: &str) -> bool {
        self.label(key).is_some()
    }
}

impl<S: BuildHasher> Labels for HashMap<String, String, S> {
    fn label(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl Labels for BTreeMap<String, String> {
    fn label(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl<T: Labels + ?Sized> Labels for &T {
    fn label(&self, key: &str) -> Option<&str> {
        (**self).label(key)
    }
}

/// intermediate value on the evaluation stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand<'p> {
    /// literal from the program
    Text(&'p str),
    /// result of an already reduced sub-expression
    Bool(bool),
}

impl Operand<'_> {
    /// a literal is true when it names a label the entity has; booleans pass through
    fn truthy<L: Labels + ?Sized>(self, labels: &L) -> bool {
        match self {
            Operand::Text(key) => labels.has_label(key),
            Operand::Bool(b) => b,
        }
    }
}

/// evaluate a program against one label set
pub fn evaluate<L: Labels + ?Sized>(program: &Program, labels: &L) -> Result<bool, FilterError> {
    let mut stack: Vec<Operand> = Vec::with_capacity(program.len());

    for instruction in program {
        match instruction {
            Instruction::Operand(text) => stack.push(Operand::Text(text.as_str())),
            Instruction::Operator { op, position } => {
                apply(*op, *position, &mut stack, labels)?;
            }
        }
    }

    // programs end with Fin, which always leaves exactly one boolean
    Ok(stack.pop().map_or(true, |result| result.truthy(labels)))
}

fn apply<'p, L: Labels + ?Sized>(
    op: Operator,
    position: usize,
    stack: &mut Vec<Operand<'p>>,
    labels: &L,
) -> Result<(), FilterError> {
    match op {
        // grouping is resolved by the converter
        Operator::LeftParen | Operator::RightParen => {}
        Operator::Not => {
            let a = pop(stack, op, position)?;
            stack.push(Operand::Bool(!a.truthy(labels)));
        }
        Operator::And => {
            let a = pop(stack, op, position)?;
            let b = pop(stack, op, position)?;
            stack.push(Operand::Bool(a.truthy(labels) && b.truthy(labels)));
        }
        Operator::Or => {
            let a = pop(stack, op, position)?;
            let b = pop(stack, op, position)?;
            stack.push(Operand::Bool(a.truthy(labels) || b.truthy(labels)));
        }
        Operator::Equal => {
            let value = pop(stack, op, position)?;
            let key = pop(stack, op, position)?;
            stack.push(Operand::Bool(label_equals(key, value, labels)));
        }
        Operator::Fin => {
            let Some(mut result) = stack.pop() else {
                // empty expression matches everything
                stack.push(Operand::Bool(true));
                return Ok(());
            };
            // bare atoms left side by side are OR'd together
            while let Some(next) = stack.pop() {
                result = Operand::Bool(result.truthy(labels) || next.truthy(labels));
            }
            stack.push(Operand::Bool(result.truthy(labels)));
        }
    }

    Ok(())
}

fn pop<'p>(
    stack: &mut Vec<Operand<'p>>,
    operator: Operator,
    position: usize,
) -> Result<Operand<'p>, FilterError> {
    stack
        .pop()
        .ok_or(FilterError::MissingOperands { operator, position })
}

fn label_equals<L: Labels + ?Sized>(key: Operand, value: Operand, labels: &L) -> bool {
    let Operand::Text(key) = key else {
        return false;
    };
    let Some(actual) = labels.label(key) else {
        return false;
    };

    match value {
        Operand::Text(expected) => actual == expected,
        // lowercase, the same text entity input gives JSON booleans
        Operand::Bool(b) => actual == if b { "true" } else { "false" },
    }
}

/// label names a program tests for, sorted and deduplicated
///
/// covers membership atoms and equality keys; equality values are skipped
pub fn referenced_labels(program: &Program) -> Vec<&str> {
    let mut stack: Vec<Option<&str>> = Vec::new();
    let mut names = BTreeSet::new();

    for instruction in program {
        match instruction {
            Instruction::Operand(text) => stack.push(Some(text.as_str())),
            Instruction::Operator { op, .. } => match op {
                Operator::LeftParen | Operator::RightParen => {}
                Operator::Equal => {
                    stack.pop();
                    if let Some(Some(key)) = stack.pop() {
                        names.insert(key);
                    }
                    stack.push(None);
                }
                Operator::Not | Operator::And | Operator::Or => {
                    let arity = if *op == Operator::Not { 1 } else { 2 };
                    for _ in 0..arity {
                        if let Some(Some(name)) = stack.pop() {
                            names.insert(name);
                        }
                    }
                    stack.push(None);
                }
                Operator::Fin => {
                    names.extend(stack.drain(..).flatten());
                    stack.push(None);
                }
            },
        }
    }

    names.into_iter().collect()
}
