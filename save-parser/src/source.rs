use std::io::Read;

use tokio::sync::mpsc;

use crate::error::LexError;
use crate::lexer::Lexer;
use crate::token::Token;

/// Ordered supply of tokens consumed by the decoder.
///
/// `None` means the stream is over, either at end of input or because the
/// producer stopped; producers report their own failures separately.
pub trait TokenSource {
    fn next_token(&mut self) -> Option<Token>;
}

/// Receiving end of the lexer pipeline. Blocks while the queue is empty.
impl TokenSource for mpsc::Receiver<Token> {
    fn next_token(&mut self) -> Option<Token> {
        self.blocking_recv()
    }
}

impl TokenSource for std::vec::IntoIter<Token> {
    fn next_token(&mut self) -> Option<Token> {
        self.next()
    }
}

/// Pull-based source that lexes on demand, without a second thread.
/// The first lexing error ends the stream and is kept for [`LexerSource::finish`].
pub struct LexerSource<R: Read> {
    lexer: Lexer<R>,
    error: Option<LexError>,
}

impl<R: Read> LexerSource<R> {
    pub fn new(input: R) -> Self {
        Self {
            lexer: Lexer::new(input),
            error: None,
        }
    }

    pub fn finish(self) -> Result<(), LexError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<R: Read> TokenSource for LexerSource<R> {
    fn next_token(&mut self) -> Option<Token> {
        if self.error.is_some() {
            return None;
        }
        match self.lexer.next()? {
            Ok(token) => Some(token),
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }
}
