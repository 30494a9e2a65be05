//! tokenizer - splits a filter expression into tokens
//!
//! recognizes, in priority order:
//! - quoted strings: '...' or "..." (the matching quote may be escaped with a backslash)
//! - symbols: ( ) = ;
//! - bare words: any other run of non-whitespace, non-symbol characters
//!
//! the lexer never fails: an unterminated quote is lexed as part of a bare word

use super::types::{Token, TokenKind};

/// split an expression into tokens, dropping whitespace
pub fn tokenize(expression: &str) -> Vec<Token> {
    let chars: Vec<char> = expression.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];

        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        if is_quote(c) {
            if let Some(end) = find_closing_quote(&chars, pos) {
                let text: String = chars[pos..=end].iter().collect();
                tokens.push(Token::new(TokenKind::Quoted, text, pos));
                pos = end + 1;
                continue;
            }
        }

        if is_symbol(c) {
            tokens.push(Token::new(TokenKind::Symbol, c.to_string(), pos));
            pos += 1;
            continue;
        }

        let start = pos;
        while pos < chars.len() && !chars[pos].is_whitespace() && !is_symbol(chars[pos]) {
            pos += 1;
        }
        let text: String = chars[start..pos].iter().collect();
        tokens.push(Token::new(TokenKind::Word, text, start));
    }

    tokens
}

fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}

fn is_symbol(c: char) -> bool {
    matches!(c, '(' | ')' | '=' | ';')
}

/// index of the quote closing the string opened at `start`
///
/// the first unescaped matching quote wins; failing that, the last escaped one
/// closes the string (its backslash becomes content)
fn find_closing_quote(chars: &[char], start: usize) -> Option<usize> {
    let quote = chars[start];
    let mut last_escaped = None;

    for i in start + 1..chars.len() {
        if chars[i] != quote {
            continue;
        }
        if chars[i - 1] == '\\' && i - 1 > start {
            last_escaped = Some(i);
        } else {
            return Some(i);
        }
    }

    last_escaped
}
