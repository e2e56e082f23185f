use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create directory '{path}': {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("'{path}' is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("failed to resolve '{path}': {source}")]
    Resolve { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;
