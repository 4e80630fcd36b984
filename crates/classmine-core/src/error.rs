use std::path::PathBuf;
use thiserror::Error;

use crate::classfile::ClassFileError;
use crate::scope::ScopeError;
use crate::signature::SignatureError;
use crate::sink::SinkError;

/// Failure of one class-file pass.
///
/// Everything except [`ExtractError::Sink`] is recovered by skipping the
/// offending class; a sink failure aborts the whole archive.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("malformed class file: {0}")]
    ClassFile(#[from] ClassFileError),

    #[error("malformed signature: {0}")]
    Signature(#[from] SignatureError),

    #[error("scope stack invariant violated: {0}")]
    Scope(#[from] ScopeError),

    #[error("fact sink failed: {0}")]
    Sink(#[from] SinkError),
}

/// Failure of one archive walk.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read archive {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("fact sink failed: {0}")]
    Sink(#[from] SinkError),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl WalkError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WalkError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn zip(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        WalkError::Zip {
            path: path.into(),
            source,
        }
    }
}
