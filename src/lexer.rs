use crate::error::{Error, Result};
use crate::ops;
use crate::token::{Token, TokenKind};
use std::iter::Peekable;
use std::str::CharIndices;

#[must_use]
/// Check if `ident` is a valid identifier: ASCII letters optionally followed
/// by digits.
///
/// # Examples
///
/// ```
/// # use cellcalc::is_identifier;
///
/// assert_eq!(is_identifier("AB12"), true);
/// assert_eq!(is_identifier("Hello"), true);
/// assert_eq!(is_identifier("1A"), false);
/// assert_eq!(is_identifier("A1B"), false);
/// ```
pub fn is_identifier(ident: &str) -> bool {
    let digits = ident.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    digits.len() < ident.len() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Split `formula` into tokens. The leading `=` of a cell formula must have
/// been stripped already.
pub fn tokenize(formula: &str) -> Result<Vec<Token<'_>>> {
    Lexer::new(formula).tokenize()
}

/// An helper struct for lexing the input
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    /// A sign can only start a number where an operand is expected
    expect_operand: bool,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `input`
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer {
            input,
            chars: input.char_indices().peekable(),
            expect_operand: true,
        }
    }

    /// Split the whole input into tokens
    pub fn tokenize(mut self) -> Result<Vec<Token<'a>>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            self.expect_operand = match token.kind() {
                TokenKind::Number | TokenKind::Identifier | TokenKind::RParen => false,
                TokenKind::Operator | TokenKind::LParen => true,
            };
            tokens.push(token);
        }
        trace!("tokenized '{}' into {:?}", self.input, tokens);
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Token<'a>>> {
        let (start, c) = match self.chars.next() {
            Some(next) => next,
            None => return Ok(None),
        };
        let end = match c {
            c if c.is_ascii_digit() => self.number(),
            '+' | '-' if self.expect_operand && self.next_is_digit() => self.number(),
            c if c.is_ascii_alphabetic() => {
                self.skip_while(|c| c.is_ascii_alphabetic());
                self.skip_while(|c| c.is_ascii_digit())
            }
            c if ops::is_operator_symbol(&self.input[start..start + c.len_utf8()]) => {
                start + c.len_utf8()
            }
            _ => {
                let end = self.skip_while(|c| !starts_token(c));
                return Err(Error::UnsupportedToken(self.input[start..end].into()));
            }
        };
        Ok(Some(Token::new(&self.input[start..end], start)))
    }

    /// Consume an unsigned decimal, with an optional fractional part
    fn number(&mut self) -> usize {
        self.skip_while(|c| c.is_ascii_digit());
        let mut lookahead = self.chars.clone();
        if let Some((_, '.')) = lookahead.next() {
            if lookahead.peek().map_or(false, |&(_, c)| c.is_ascii_digit()) {
                self.chars.next();
                self.skip_while(|c| c.is_ascii_digit());
            }
        }
        self.position()
    }

    fn next_is_digit(&mut self) -> bool {
        self.chars.peek().map_or(false, |&(_, c)| c.is_ascii_digit())
    }

    fn skip_while(&mut self, predicate: impl Fn(char) -> bool) -> usize {
        while let Some(&(_, c)) = self.chars.peek() {
            if !predicate(c) {
                break;
            }
            self.chars.next();
        }
        self.position()
    }

    fn position(&mut self) -> usize {
        let len = self.input.len();
        self.chars.peek().map_or(len, |&(offset, _)| offset)
    }
}

/// Check if `c` can appear at the first character of a token
fn starts_token(c: char) -> bool {
    let mut buffer = [0; 4];
    c.is_ascii_alphanumeric() || ops::is_operator_symbol(c.encode_utf8(&mut buffer))
}
