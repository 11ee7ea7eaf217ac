//! Lexer and decoder running concurrently over a bounded token queue.
//!
//! The lexer stays on the calling thread (the input reader does not need to
//! be `Send`) and the decoder runs on a scoped thread. A full queue blocks
//! the lexer; an empty one blocks the decoder. When the decoder gives up its
//! receiver is dropped, the next send fails and the lexer stops, so no
//! producer outlives the call.
//!
//! Called from inside an async runtime the lexer cannot block on the queue,
//! so the pipeline degrades to [`decode_reader`] there. Use
//! `tokio::task::spawn_blocking` to keep the concurrent path from async code.

use std::io::Read;
use std::thread;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::decode::{decode, Record};
use crate::error::{DecodeError, LexError};
use crate::lexer::Lexer;
use crate::source::LexerSource;
use crate::token::Token;

/// Default token queue capacity
pub const DEFAULT_QUEUE_DEPTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Lex `input` and decode it into `dest` with the two stages running concurrently.
///
/// A lexing failure takes precedence over whatever the decoder reported,
/// since the decoder only saw a truncated stream.
///
/// On a thread driving a tokio runtime this lexes on demand instead.
pub fn decode_streaming<R, T>(input: R, dest: &mut T, queue_depth: usize) -> Result<(), ParseError>
where
    R: Read,
    T: Record + Send,
{
    if Handle::try_current().is_ok() {
        tracing::debug!("inside async runtime, decoding without token pipeline");
        return decode_reader(input, dest);
    }

    let (tx, mut rx) = mpsc::channel::<Token>(queue_depth.max(1));
    tracing::debug!(queue_depth, "starting token pipeline");

    thread::scope(|scope| {
        let decoder = scope.spawn(move || decode(&mut rx, dest));

        let lexed = produce(Lexer::new(input), &tx);
        drop(tx);

        let decoded = match decoder.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        };

        lexed?;
        decoded?;
        Ok(())
    })
}

fn produce<R: Read>(lexer: Lexer<R>, tx: &mpsc::Sender<Token>) -> Result<(), LexError> {
    let mut sent = 0usize;
    for token in lexer {
        if tx.blocking_send(token?).is_err() {
            tracing::debug!(sent, "decoder stopped, abandoning lexer");
            return Ok(());
        }
        sent += 1;
    }
    tracing::debug!(sent, "lexer finished");
    Ok(())
}

/// Decode a document on the current thread, lexing on demand
pub fn decode_reader<R: Read, T: Record>(input: R, dest: &mut T) -> Result<(), ParseError> {
    let mut source = LexerSource::new(input);
    let decoded = decode(&mut source, dest);
    source.finish()?;
    decoded?;
    Ok(())
}

/// Decode an in-memory document into a fresh value
pub fn decode_str<T: Record + Default>(text: &str) -> Result<T, ParseError> {
    let mut value = T::default();
    decode_reader(text.as_bytes(), &mut value)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Decode;
    use crate::error::{DecodeErrorKind, LexErrorKind};

    #[derive(Debug, Default)]
    struct Counts {
        values: Vec<u32>,
        label: String,
    }

    impl Record for Counts {
        fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
            let field: &mut dyn Decode = match key {
                "value" => &mut self.values,
                "label" => &mut self.label,
                _ => return None,
            };
            Some(field)
        }
    }

    fn repeated(n: u32) -> String {
        let mut text = String::from("label=counts\n");
        for i in 0..n {
            text.push_str(&format!("value={}\n", i));
        }
        text
    }

    #[test]
    fn test_streaming_preserves_order() {
        let text = repeated(1000);
        let mut counts = Counts::default();
        decode_streaming(text.as_bytes(), &mut counts, 4).unwrap();
        assert_eq!(counts.label, "counts");
        assert_eq!(counts.values, (0..1000).collect::<Vec<_>>());
    }

    #[test]
    fn test_streaming_inside_runtime() {
        let text = repeated(300);
        let mut counts = Counts::default();
        let result = tokio_test::block_on(async { decode_streaming(text.as_bytes(), &mut counts, 2) });
        result.unwrap();
        assert_eq!(counts.values.len(), 300);
        assert_eq!(counts.values[299], 299);
    }

    #[test]
    fn test_streaming_surfaces_lex_error() {
        let text = format!("{}bad-token=1\n", repeated(50));
        let mut counts = Counts::default();
        let err = decode_streaming(text.as_bytes(), &mut counts, 8).unwrap_err();
        let ParseError::Lex(err) = err else {
            panic!("expected lex error");
        };
        assert_eq!(err.line, 52);
        assert!(matches!(err.kind, LexErrorKind::UnexpectedTransition { .. }));
    }

    #[test]
    fn test_streaming_decoder_failure_stops_lexer() {
        let text = format!("value=oops\n{}", repeated(10_000));
        let mut counts = Counts::default();
        let err = decode_streaming(text.as_bytes(), &mut counts, 2).unwrap_err();
        let ParseError::Decode(err) = err else {
            panic!("expected decode error");
        };
        assert_eq!(err.path, vec!["value"]);
        assert!(matches!(err.kind, DecodeErrorKind::UnexpectedToken { .. }));
    }

    #[test]
    fn test_decode_reader_reports_lex_error_first() {
        let err = decode_str::<Counts>("value=1 label=\"open").unwrap_err();
        assert!(matches!(err, ParseError::Lex(_)));
    }
}
