use crate::ops::{self, Symbol};
use std::fmt;

/// Classes of tokens found in a formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Decimal literal, possibly signed
    Number,
    /// Variable name or cell reference
    Identifier,
    /// One of the binary operators
    Operator,
    /// Left parenthesis
    LParen,
    /// Right parenthesis
    RParen,
}

/// A slice of the formula text. The kind is derived from the text on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> Token<'a> {
    pub(crate) fn new(text: &'a str, offset: usize) -> Self {
        Token { text, offset }
    }

    /// Text of the token
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Byte offset of the token in the formula
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Classify the token
    pub fn kind(&self) -> TokenKind {
        match ops::lookup(self.text) {
            Some(Symbol::LParen) => TokenKind::LParen,
            Some(Symbol::RParen) => TokenKind::RParen,
            Some(Symbol::Binary(_)) => TokenKind::Operator,
            None if self.text.starts_with(|c: char| c.is_ascii_alphabetic()) => {
                TokenKind::Identifier
            }
            None => TokenKind::Number,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}
