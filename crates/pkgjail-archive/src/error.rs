use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("archive file does not exist: '{path}'")]
    NotFound { path: PathBuf },

    #[error("unsupported archive format")]
    UnsupportedFormat,

    #[error("archive is corrupted: {0}")]
    Corrupted(#[source] io::Error),

    #[error("failed to read archive '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to create directory: {path}: {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("sandbox operation failed: {source}")]
    Sandbox { source: pkgjail_fs::Error },
}

impl From<pkgjail_fs::Error> for Error {
    fn from(e: pkgjail_fs::Error) -> Self {
        Self::Sandbox { source: e }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
