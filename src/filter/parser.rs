//! infix to postfix conversion (shunting-yard)
//!
//! operands go straight to the output; operators wait on a stack until an
//! operator of lower or equal precedence arrives (all operators are
//! left-associative), parentheses group, and a Fin is appended when the
//! output does not already end with one

use super::error::FilterError;
use super::tokenizer::tokenize;
use super::types::{Instruction, Operator, Program, Token};

/// tokenize and convert an expression in one step
pub fn compile(expression: &str) -> Result<Program, FilterError> {
    to_postfix(&tokenize(expression))
}

/// convert a token stream into a postfix program
pub fn to_postfix(tokens: &[Token]) -> Result<Program, FilterError> {
    let mut output: Vec<Instruction> = Vec::with_capacity(tokens.len() + 1);
    let mut stack: Vec<(Operator, usize)> = Vec::new();

    for token in tokens {
        let op = match token.operator() {
            Some(op) => op,
            None => {
                output.push(Instruction::Operand(token.value().to_string()));
                continue;
            }
        };

        match op {
            Operator::LeftParen => stack.push((op, token.offset)),
            Operator::RightParen => loop {
                match stack.pop() {
                    Some((Operator::LeftParen, _)) => break,
                    Some((top, position)) => output.push(Instruction::operator(top, position)),
                    None => {
                        return Err(FilterError::UnmatchedClose {
                            position: token.offset,
                        })
                    }
                }
            },
            _ => {
                while let Some(&(top, position)) = stack.last() {
                    if top == Operator::LeftParen || !op.yields_to(top) {
                        break;
                    }
                    stack.pop();
                    output.push(Instruction::operator(top, position));
                }
                stack.push((op, token.offset));
            }
        }
    }

    while let Some((top, position)) = stack.pop() {
        if top == Operator::LeftParen {
            return Err(FilterError::UnclosedOpen { position });
        }
        output.push(Instruction::operator(top, position));
    }

    Ok(Program::new(output, end_offset(tokens)))
}

/// offset just past the last token
fn end_offset(tokens: &[Token]) -> usize {
    tokens
        .last()
        .map(|t| t.offset + t.text.chars().count())
        .unwrap_or(0)
}
