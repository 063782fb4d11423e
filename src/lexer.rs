use crate::error::CompileError;
use crate::Dialect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Literal,
    Dot,
    Star,
    LParen,
    RParen,
    Alternation,
    End,
}

/// A single pattern token.
///
/// `value` holds the source character for everything except `End`.
/// `position` is the character index in the pattern; for `End` it is the
/// pattern length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<char>,
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, value: char, position: usize) -> Self {
        Self {
            kind,
            value: Some(value),
            position,
        }
    }

    fn end(position: usize) -> Self {
        Self {
            kind: TokenKind::End,
            value: None,
            position,
        }
    }
}

/// Scans a pattern left to right, one character per token.
pub struct Lexer<'a> {
    chars: std::str::Chars<'a>,
    pos: usize,
    dialect: Dialect,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(pattern: &'a str, dialect: Dialect) -> Self {
        Self {
            chars: pattern.chars(),
            pos: 0,
            dialect,
            failed: false,
        }
    }

    /// Return the next token.
    ///
    /// Once the pattern is exhausted every call returns `End` at the same
    /// position. In the strict dialect a non-alphabetic literal is an
    /// `InvalidPattern` error.
    pub fn next_token(&mut self) -> Result<Token, CompileError> {
        let Some(ch) = self.chars.next() else {
            return Ok(Token::end(self.pos));
        };
        let position = self.pos;
        self.pos += 1;

        let kind = match ch {
            '*' => TokenKind::Star,
            '.' => TokenKind::Dot,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '|' => TokenKind::Alternation,
            c if self.dialect == Dialect::Strict && !c.is_alphabetic() => {
                return Err(CompileError::InvalidPattern { ch: c, position });
            }
            _ => TokenKind::Literal,
        };
        Ok(Token::new(kind, ch, position))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, CompileError>;

    /// Yields tokens up to, but not including, `End`. Stops after the
    /// first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.kind == TokenKind::End => None,
            Ok(token) => Some(Ok(token)),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
