use thiserror::Error;

/// Errors raised by the preprocessing and term-statistics pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The token was never tokenized from the document (or collection) the
    /// mapping was built from. Zero counts are never materialized.
    #[error("token {token:?} is not present in this mapping")]
    MissingKey { token: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Inverse-document statistics are undefined over zero documents.
    #[error("cannot derive document statistics from an empty collection")]
    EmptyCollection,
}

impl Error {
    pub fn missing_key<S: Into<String>>(token: S) -> Self {
        Error::MissingKey { token: token.into() }
    }

    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Error::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
