//! Byte-level tokenizer for the save-game tag language.
//!
//! A single pass state machine that accumulates identifiers, numbers and
//! strings and emits punctuation (`=`, `{`, `}`) as it goes. Digits inside an
//! identifier stay part of it (`pc_city2`), and a number that meets a letter
//! is reclassified as an identifier (`10x`). Any other change of
//! classification without an intervening separator is an error.

use std::collections::VecDeque;
use std::io::{self, BufReader, Read};

use crate::error::{LexError, LexErrorKind, LexState};
use crate::token::{Token, TokenKind};

pub struct Lexer<R: Read> {
    bytes: io::Bytes<BufReader<R>>,
    line: usize,
    state: Option<LexState>,
    buf: Vec<u8>,
    pending: VecDeque<Token>,
    error: Option<LexError>,
    done: bool,
}

impl<R: Read> Lexer<R> {
    pub fn new(input: R) -> Self {
        Self {
            bytes: BufReader::new(input).bytes(),
            line: 1,
            state: None,
            buf: Vec::with_capacity(32),
            pending: VecDeque::new(),
            error: None,
            done: false,
        }
    }

    /// Current 1-based line
    pub fn line(&self) -> usize {
        self.line
    }

    fn read_byte(&mut self) -> Result<Option<u8>, LexError> {
        match self.bytes.next() {
            None => Ok(None),
            Some(Ok(b)) => Ok(Some(b)),
            Some(Err(e)) => Err(self.error_at(LexErrorKind::Io(e.to_string()))),
        }
    }

    fn error_at(&self, kind: LexErrorKind) -> LexError {
        LexError::new(self.line, kind)
    }

    fn set_state(&mut self, state: LexState) -> Result<(), LexError> {
        match self.state {
            None => {
                self.state = Some(state);
                Ok(())
            }
            Some(current) if current == state => Ok(()),
            Some(current) => Err(self.error_at(LexErrorKind::UnexpectedTransition {
                from: current,
                to: state,
            })),
        }
    }

    fn emit(&mut self, kind: TokenKind, text: String) {
        self.pending.push_back(Token::new(kind, text, self.line));
    }

    fn flush(&mut self) {
        let Some(state) = self.state.take() else {
            return;
        };
        let kind = match state {
            LexState::Identifier => TokenKind::Identifier,
            LexState::Number => TokenKind::Number,
            LexState::String => TokenKind::String,
        };
        let text = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        self.emit(kind, text);
    }

    /// Quoted strings are taken verbatim up to the next quote; escapes are not processed.
    fn read_string(&mut self) -> Result<(), LexError> {
        self.set_state(LexState::String)?;
        loop {
            match self.read_byte()? {
                Some(b'"') => break,
                Some(b) => {
                    if b == b'\n' {
                        self.line += 1;
                    }
                    self.buf.push(b);
                }
                None => return Err(self.error_at(LexErrorKind::UnterminatedString)),
            }
        }
        self.flush();
        Ok(())
    }

    /// Consume one byte. Returns false at end of input.
    fn step(&mut self) -> Result<bool, LexError> {
        let Some(b) = self.read_byte()? else {
            self.flush();
            return Ok(false);
        };

        match b {
            b'"' => self.read_string()?,
            b'=' => {
                self.flush();
                self.emit(TokenKind::EqualSign, "=".into());
            }
            b'{' => {
                self.flush();
                self.emit(TokenKind::CollectionStart, "{".into());
            }
            b'}' => {
                self.flush();
                self.emit(TokenKind::CollectionEnd, "}".into());
            }
            b if b.is_ascii_whitespace() => {
                self.flush();
                if b == b'\n' {
                    self.line += 1;
                }
            }
            b'0'..=b'9' | b'.' => {
                if self.state != Some(LexState::Identifier) {
                    self.set_state(LexState::Number)?;
                }
                self.buf.push(b);
            }
            b'-' => {
                self.set_state(LexState::Number)?;
                self.buf.push(b);
            }
            _ => {
                if self.state == Some(LexState::Number) {
                    self.state = Some(LexState::Identifier);
                } else {
                    self.set_state(LexState::Identifier)?;
                }
                self.buf.push(b);
            }
        }
        Ok(true)
    }
}

impl<R: Read> Iterator for Lexer<R> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(Ok(token));
            }
            if let Some(err) = self.error.take() {
                self.done = true;
                return Some(Err(err));
            }
            if self.done {
                return None;
            }
            match self.step() {
                Ok(true) => {}
                Ok(false) => self.done = true,
                Err(err) => self.error = Some(err),
            }
        }
    }
}

/// Tokenize a complete in-memory text
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(text.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_OBJECT: &str = "
level=\"starbase_level_starport\"
modules={
\t0=shipyard\t\t\t\t1=trading_hub\t\t\t}
";

    fn tok(kind: TokenKind, text: &str, line: usize) -> Token {
        Token::new(kind, text, line)
    }

    #[test]
    fn test_tokenize_simple_object() {
        let tokens = tokenize(SIMPLE_OBJECT).unwrap();
        assert_eq!(
            tokens,
            vec![
                tok(TokenKind::Identifier, "level", 2),
                tok(TokenKind::EqualSign, "=", 2),
                tok(TokenKind::String, "starbase_level_starport", 2),
                tok(TokenKind::Identifier, "modules", 3),
                tok(TokenKind::EqualSign, "=", 3),
                tok(TokenKind::CollectionStart, "{", 3),
                tok(TokenKind::Number, "0", 4),
                tok(TokenKind::EqualSign, "=", 4),
                tok(TokenKind::Identifier, "shipyard", 4),
                tok(TokenKind::Number, "1", 4),
                tok(TokenKind::EqualSign, "=", 4),
                tok(TokenKind::Identifier, "trading_hub", 4),
                tok(TokenKind::CollectionEnd, "}", 4),
            ]
        );
    }

    #[test]
    fn test_token_ending_at_newline_keeps_its_line() {
        let tokens = tokenize("a=b\nc=d").unwrap();
        assert_eq!(tokens[2], tok(TokenKind::Identifier, "b", 1));
        assert_eq!(tokens[3], tok(TokenKind::Identifier, "c", 2));
    }

    #[test]
    fn test_digits_inside_identifier() {
        let tokens = tokenize("pc_city2 distantstars_init_06").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].text, "pc_city2");
        assert_eq!(tokens[1].text, "distantstars_init_06");
    }

    #[test]
    fn test_number_reclassified_as_identifier() {
        let tokens = tokenize("10x 2.5 -3").unwrap();
        assert_eq!(tokens[0], tok(TokenKind::Identifier, "10x", 1));
        assert_eq!(tokens[1], tok(TokenKind::Number, "2.5", 1));
        assert_eq!(tokens[2], tok(TokenKind::Number, "-3", 1));
    }

    #[test]
    fn test_minus_inside_identifier_is_error() {
        let err = tokenize("x=1\nabc-def").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(
            err.kind,
            LexErrorKind::UnexpectedTransition {
                from: LexState::Identifier,
                to: LexState::Number,
            }
        );
    }

    #[test]
    fn test_quote_inside_identifier_is_error() {
        let err = tokenize("abc\"def\"").unwrap_err();
        assert!(matches!(
            err.kind,
            LexErrorKind::UnexpectedTransition { to: LexState::String, .. }
        ));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("name=\"abc").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    }

    #[test]
    fn test_string_does_not_merge_with_neighbours() {
        let tokens = tokenize("\"a b\"\"c\"").unwrap();
        assert_eq!(
            tokens,
            vec![tok(TokenKind::String, "a b", 1), tok(TokenKind::String, "c", 1)]
        );
    }

    #[test]
    fn test_tokens_before_error_are_delivered() {
        let mut lexer = Lexer::new("a={ b-c".as_bytes());
        assert_eq!(lexer.next().unwrap().unwrap().text, "a");
        assert_eq!(lexer.next().unwrap().unwrap().text, "=");
        assert_eq!(lexer.next().unwrap().unwrap().text, "{");
        assert!(lexer.next().unwrap().is_err());
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_relex_scalar_tokens() {
        let text = "alpha 12 -4.5 pc_city \"quoted text\" 7up";
        for token in tokenize(text).unwrap() {
            let source = match token.kind {
                TokenKind::String => format!("\"{}\"", token.text),
                _ => token.text.clone(),
            };
            let again = tokenize(&source).unwrap();
            assert_eq!(again.len(), 1);
            assert_eq!(again[0].kind, token.kind);
            assert_eq!(again[0].text, token.text);
        }
    }
}
