//! Reader for the save-game tag language
//!
//! Architecture:
//! 1. `lexer` - Byte-level state machine producing [`Token`]s
//! 2. `source` - Token supply seen by the decoder (channel or on-demand lexer)
//! 3. `decode` - [`Decode`]/[`Record`] traits mapping tokens onto typed values
//! 4. `pipeline` - Lexer and decoder connected by a bounded queue

mod error;
mod token;
pub mod lexer;
pub mod source;
pub mod decode;
pub mod pipeline;

pub use error::{
    DecodeError, DecodeErrorKind, DecodeResult,
    LexError, LexErrorKind, LexState,
};
pub use token::{Token, TokenKind, NONE_LITERAL};
pub use lexer::{Lexer, tokenize};
pub use source::{TokenSource, LexerSource};
pub use decode::{Decode, Record, decode, skip_block};
pub use pipeline::{
    ParseError, DEFAULT_QUEUE_DEPTH,
    decode_streaming, decode_reader, decode_str,
};
