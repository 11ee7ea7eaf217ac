use std::fmt;

/// Identifier bound to "no value" in optional positions
pub const NONE_LITERAL: &str = "none";

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Number,
    String,
    EqualSign,
    CollectionStart,
    CollectionEnd,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Identifier => "IDENT",
            Self::Number => "NUMBER",
            Self::String => "STRING",
            Self::EqualSign => "EQUAL",
            Self::CollectionStart => "CSTART",
            Self::CollectionEnd => "CEND",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lexed token with the 1-based line it ends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// True for the bare `none` identifier
    pub fn is_none_literal(&self) -> bool {
        self.kind == TokenKind::Identifier && self.text == NONE_LITERAL
    }
}
