use save_parser::{DecodeError, LexError, ParseError};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("error loading sav file: {0}")]
    Io(#[from] std::io::Error),

    #[error("error reading sav archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("entry '{0}' is not found in sav file")]
    MissingEntry(String),

    #[error("error parsing gamestate: {0}")]
    Lex(#[from] LexError),

    #[error("error parsing gamestate: {0}")]
    Decode(#[from] DecodeError),

    #[error("load task failed: {0}")]
    Task(String),
}

impl From<ParseError> for LoadError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Lex(e) => Self::Lex(e),
            ParseError::Decode(e) => Self::Decode(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
