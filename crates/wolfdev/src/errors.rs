//! Crate-wide error taxonomy.
//!
//! Each decoding stage has its own error type; [`Error`] gathers them for
//! callers that only need to know whether, and why, a load failed.

use std::{io, path::PathBuf};

use crate::{compression::DecompressionError, maps::LevelError, vswap::ResourceError};

pub use crate::chunks::MalformedIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Io,
    MalformedIndex,
    TruncatedStream,
    OutputOverrun,
    LengthMismatch,
    InvalidLevelSignature,
    ChunkIndexOutOfRange,
    UnrecognizedVariant,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    MalformedIndex(#[from] MalformedIndex),
    #[error(transparent)]
    Decompression(#[from] DecompressionError),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("No known archive layout found at {}", path.display())]
    UnrecognizedVariant { path: PathBuf },
}

impl From<DecompressionError> for ErrorKind {
    fn from(err: DecompressionError) -> Self {
        ErrorKind::from(&err)
    }
}

impl From<&DecompressionError> for ErrorKind {
    fn from(err: &DecompressionError) -> Self {
        match err {
            DecompressionError::TruncatedStream { .. } => ErrorKind::TruncatedStream,
            DecompressionError::OutputOverrun { .. } => ErrorKind::OutputOverrun,
            DecompressionError::LengthMismatch { .. } => ErrorKind::LengthMismatch,
        }
    }
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io { .. } => ErrorKind::Io,
            Error::MalformedIndex(_) => ErrorKind::MalformedIndex,
            Error::Decompression(err) => err.into(),
            Error::Level(err) => err.kind(),
            Error::Resource(err) => err.kind(),
            Error::UnrecognizedVariant { .. } => ErrorKind::UnrecognizedVariant,
        }
    }
}
