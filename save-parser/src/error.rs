use std::fmt;

use crate::token::{Token, TokenKind};

/// Lexer state, used to describe illegal transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    Identifier,
    Number,
    String,
}

impl fmt::Display for LexState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Identifier => "IDENT",
            Self::Number => "NUMBER",
            Self::String => "STRING",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unexpected character: cannot transition from state {from} to {to}")]
    UnexpectedTransition { from: LexState, to: LexState },

    #[error("unterminated string")]
    UnterminatedString,

    #[error("read error: {0}")]
    Io(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("error tokenizing game state: {kind} at line {line}")]
pub struct LexError {
    pub line: usize,
    pub kind: LexErrorKind,
}

impl LexError {
    pub fn new(line: usize, kind: LexErrorKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeErrorKind {
    #[error("unexpected token: expected {expected}, got {found} ('{text}') at line {line}")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        text: String,
        line: usize,
    },

    #[error("unexpected boolean '{text}' at line {line}")]
    InvalidBoolean { text: String, line: usize },

    #[error("error parsing number '{text}' at line {line}: {reason}")]
    InvalidNumber {
        text: String,
        line: usize,
        reason: String,
    },

    #[error("unexpected end of token stream")]
    UnexpectedEof,
}

/// Decoding failure with the chain of enclosing keys.
///
/// The path is ordered outermost key first: a failure in
/// `country={ 0={ flag={ colors=... } } }` reports `country -> 0 -> flag -> colors`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub path: Vec<String>,
    pub kind: DecodeErrorKind,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind) -> Self {
        Self {
            path: Vec::new(),
            kind,
        }
    }

    pub fn unexpected(token: &Token, expected: TokenKind) -> Self {
        Self::new(DecodeErrorKind::UnexpectedToken {
            expected,
            found: token.kind,
            text: token.text.clone(),
            line: token.line,
        })
    }

    pub fn invalid_number(token: &Token, reason: impl fmt::Display) -> Self {
        Self::new(DecodeErrorKind::InvalidNumber {
            text: token.text.clone(),
            line: token.line,
            reason: reason.to_string(),
        })
    }

    pub fn eof() -> Self {
        Self::new(DecodeErrorKind::UnexpectedEof)
    }

    /// Prepend an enclosing key while the error unwinds
    pub fn within(mut self, key: &str) -> Self {
        self.path.insert(0, key.to_string());
        self
    }

    pub fn line(&self) -> Option<usize> {
        match &self.kind {
            DecodeErrorKind::UnexpectedToken { line, .. }
            | DecodeErrorKind::InvalidBoolean { line, .. }
            | DecodeErrorKind::InvalidNumber { line, .. } => Some(*line),
            DecodeErrorKind::UnexpectedEof => None,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "error decoding value: {}", self.kind)
        } else {
            write!(f, "error decoding value {}: {}", self.path.join(" -> "), self.kind)
        }
    }
}

impl std::error::Error for DecodeError {}

pub type DecodeResult<T = ()> = std::result::Result<T, DecodeError>;
