use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};

const DEFAULT_PREFIX: &str = "pkgjail-";

/// Who deletes the working directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Ownership {
    /// Removed by [`Sandbox::release`].
    #[default]
    Owned,
    /// Left on disk for the caller.
    Kept,
}

#[derive(Clone, Debug, Default)]
pub struct SandboxOptions {
    root: Option<PathBuf>,
    prefix: Option<String>,
    keep: bool,
}

impl SandboxOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory the working directory is created under. Defaults to the
    /// platform temp dir.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn keep(mut self, keep: bool) -> Self {
        self.keep = keep;
        self
    }

    pub fn root_dir(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn prefix_str(&self) -> &str {
        self.prefix.as_deref().unwrap_or(DEFAULT_PREFIX)
    }

    pub fn ownership(&self) -> Ownership {
        if self.keep {
            Ownership::Kept
        } else {
            Ownership::Owned
        }
    }
}

/// What [`Sandbox::release`] did. Failures are reported here instead of
/// being raised; callers are free to ignore the value.
#[derive(Debug)]
pub enum Cleanup {
    Removed,
    Kept,
    AlreadyReleased,
    Failed(io::Error),
}

impl Cleanup {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Open,
    Released,
}

/// The working directory that bounds every side effect of processing one
/// archive.
///
/// A sandbox is not synchronised; use one per archive when working
/// concurrently. Nothing stops calls after [`release`](Self::release), so do
/// not reuse a released sandbox.
#[derive(Debug)]
pub struct Sandbox {
    path: PathBuf,
    ownership: Ownership,
    state: State,
}

impl Sandbox {
    /// Allocate a fresh, uniquely named working directory.
    pub fn create(options: &SandboxOptions) -> Result<Self> {
        let root = options.root_dir();
        std::fs::create_dir_all(&root).map_err(|source| Error::CreateDir {
            path: root.clone(),
            source,
        })?;

        let dir = tempfile::Builder::new()
            .prefix(options.prefix_str())
            .tempdir_in(&root)
            .map_err(|source| Error::CreateDir {
                path: root.clone(),
                source,
            })?;

        // Deletion is driven by `release`, not by tempfile's drop.
        let path = dir.keep();
        info!(path = %path.display(), ownership = ?options.ownership(), "created sandbox");

        Ok(Self {
            path,
            ownership: options.ownership(),
            state: State::Open,
        })
    }

    /// Take over a directory prepared by someone else, creating it if absent.
    pub fn adopt(path: impl Into<PathBuf>, ownership: Ownership) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            std::fs::create_dir_all(&path).map_err(|source| Error::CreateDir {
                path: path.clone(),
                source,
            })?;
        } else if !path.is_dir() {
            return Err(Error::NotADirectory { path });
        }

        Ok(Self {
            path,
            ownership,
            state: State::Open,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    pub fn is_released(&self) -> bool {
        self.state == State::Released
    }

    /// Remove the working directory if the sandbox owns it. Never fails and
    /// only acts once.
    pub fn release(&mut self) -> Cleanup {
        if self.state == State::Released {
            return Cleanup::AlreadyReleased;
        }
        self.state = State::Released;

        if self.ownership == Ownership::Kept {
            return Cleanup::Kept;
        }

        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "removed sandbox");
                Cleanup::Removed
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Cleanup::Removed,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to remove sandbox");
                Cleanup::Failed(e)
            }
        }
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        let _ = self.release();
    }
}
