use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    Network(String),
    NotFound(String),
    BadRef(String),
    DigestMismatch { expected: String, actual: String },
    Registry(String),
    Io(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Network(msg) => write!(f, "Network error: {msg}"),
            StoreError::NotFound(msg) => write!(f, "Artifact not found: {msg}"),
            StoreError::BadRef(msg) => write!(f, "Bad artifact reference: {msg}"),
            StoreError::DigestMismatch { expected, actual } => {
                write!(f, "Digest mismatch: expected {expected}, got {actual}")
            }
            StoreError::Registry(msg) => write!(f, "Registry error: {msg}"),
            StoreError::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl Error for StoreError {}
