//! core types for the filter engine

use std::fmt;

/// lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// text delimited by ' or "
    Quoted,
    /// one of the single-character symbols: ( ) = ;
    Symbol,
    /// any other run of non-whitespace characters
    Word,
}

/// a lexical unit produced by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// raw source text, quotes included
    pub text: String,
    /// character offset of the token in the expression
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    /// operand text: quoted strings lose their delimiters, escapes are kept as written
    pub fn value(&self) -> &str {
        match self.kind {
            // a hand-built quoted token may be too short to carry both quotes
            TokenKind::Quoted => self
                .text
                .get(1..self.text.len().saturating_sub(1))
                .unwrap_or_default(),
            TokenKind::Symbol | TokenKind::Word => &self.text,
        }
    }

    /// operator this token stands for, if any
    ///
    /// quoted strings are always operands, even `'and'`
    pub fn operator(&self) -> Option<Operator> {
        match self.kind {
            TokenKind::Quoted => None,
            TokenKind::Symbol | TokenKind::Word => Operator::lookup(&self.text),
        }
    }
}

/// operator associativity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// number of operands an operator consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// consumes exactly this many operands
    Fixed(usize),
    /// structural marker, never evaluated (parentheses)
    Grouping,
    /// folds whatever is left on the stack (Fin)
    Reduce,
}

/// the closed set of filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    LeftParen,
    RightParen,
    /// label equality: key=value
    Equal,
    Not,
    And,
    Or,
    /// terminal reduction, implicit at the end of every program
    Fin,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::LeftParen,
        Operator::RightParen,
        Operator::Equal,
        Operator::Not,
        Operator::And,
        Operator::Or,
        Operator::Fin,
    ];

    /// text the user types for this operator; Fin has none
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            Operator::LeftParen => Some("("),
            Operator::RightParen => Some(")"),
            Operator::Equal => Some("="),
            Operator::Not => Some("not"),
            Operator::And => Some("and"),
            Operator::Or => Some("or"),
            Operator::Fin => None,
        }
    }

    pub fn precedence(self) -> i32 {
        match self {
            Operator::LeftParen | Operator::RightParen => -1,
            Operator::Equal => 5,
            Operator::Not => 4,
            Operator::And => 3,
            Operator::Or => 2,
            Operator::Fin => -10,
        }
    }

    pub fn associativity(self) -> Associativity {
        Associativity::Left
    }

    pub fn arity(self) -> Arity {
        match self {
            Operator::Not => Arity::Fixed(1),
            Operator::Equal | Operator::And | Operator::Or => Arity::Fixed(2),
            Operator::LeftParen => Arity::Fixed(0),
            Operator::RightParen => Arity::Grouping,
            Operator::Fin => Arity::Reduce,
        }
    }

    /// classify a symbol or bare word
    ///
    /// keywords are case-insensitive; `;` is the explicit spelling of Fin
    pub fn lookup(word: &str) -> Option<Operator> {
        match word {
            "(" => Some(Operator::LeftParen),
            ")" => Some(Operator::RightParen),
            "=" => Some(Operator::Equal),
            ";" => Some(Operator::Fin),
            _ if word.eq_ignore_ascii_case("not") => Some(Operator::Not),
            _ if word.eq_ignore_ascii_case("and") => Some(Operator::And),
            _ if word.eq_ignore_ascii_case("or") => Some(Operator::Or),
            _ => None,
        }
    }

    /// true when an arriving `self` must pop `top` off the operator stack
    pub fn yields_to(self, top: Operator) -> bool {
        match top.associativity() {
            Associativity::Left => self.precedence() <= top.precedence(),
            Associativity::Right => self.precedence() < top.precedence(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Some(symbol) => write!(f, "{}", symbol),
            None => write!(f, "fin"),
        }
    }
}

/// one step of a postfix program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// literal operand, quotes already stripped
    Operand(String),
    /// operator with the offset of the token that produced it
    Operator { op: Operator, position: usize },
}

impl Instruction {
    pub fn operator(op: Operator, position: usize) -> Self {
        Instruction::Operator { op, position }
    }

    pub fn as_operand(&self) -> Option<&str> {
        match self {
            Instruction::Operand(s) => Some(s),
            Instruction::Operator { .. } => None,
        }
    }

    pub fn is_fin(&self) -> bool {
        matches!(
            self,
            Instruction::Operator {
                op: Operator::Fin,
                ..
            }
        )
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Operand(s) if needs_quotes(s) => write!(f, "\"{}\"", s),
            Instruction::Operand(s) => write!(f, "{}", s),
            Instruction::Operator { op, .. } => write!(f, "{}", op),
        }
    }
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || Operator::lookup(s).is_some()
        || s.chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '=' | ';' | '\'' | '"'))
}

/// a compiled filter in postfix order
///
/// always ends with a Fin instruction so evaluation yields exactly one boolean
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// wrap converter output, appending Fin at `end` unless already terminated
    pub fn new(mut instructions: Vec<Instruction>, end: usize) -> Self {
        if !instructions.last().is_some_and(Instruction::is_fin) {
            instructions.push(Instruction::operator(Operator::Fin, end));
        }
        Self { instructions }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// never true in practice; a program holds at least its Fin
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, instruction) in self.instructions.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", instruction)?;
        }
        Ok(())
    }
}
