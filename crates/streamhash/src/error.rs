use std::io;

use crate::HashAlgorithm;

#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("no digest primitive available for {0}")]
    UnsupportedAlgorithm(HashAlgorithm),

    #[error("unknown hash algorithm: {0:?}")]
    UnknownAlgorithm(String),

    #[error("illegal state: {0}")]
    InvalidState(&'static str),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    Mismatch { expected: String, actual: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, HashError>;
