//! Error types for wheelwright-engine.

use std::path::PathBuf;

/// Errors produced by the build hooks.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A filesystem operation failed.
    #[error("cannot access {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// A utility operation failed.
    #[error("{0}")]
    Util(#[from] wheelwright_util::error::UtilError),

    /// Running the build script failed.
    #[error("{0}")]
    Builder(#[from] wheelwright_builder::BuilderError),

    /// The built wheel has no `.dist-info` directory.
    #[error("no .dist-info directory found in built wheel {wheel}")]
    NoMetadataFound { wheel: PathBuf },

    /// The built wheel is not a readable zip archive.
    #[error("cannot unpack wheel {wheel}: {source}")]
    Wheel {
        wheel: PathBuf,
        source: zip::result::ZipError,
    },

    /// Writing the source distribution failed.
    #[error("cannot write source distribution {path}: {source}")]
    Archive {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl EngineError {
    /// The build script's exit code, when the failure came from it.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Builder(err) => err.exit_code(),
            _ => None,
        }
    }
}
