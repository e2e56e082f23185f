use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use pkgjail_fs::{Cleanup, Sandbox, SandboxOptions};
use tracing::info;

use crate::error::{Error, Result};
use crate::extract::{Extraction, extract_archive};
use crate::inspect::archive_tree;
use crate::list::list_files;

const FALLBACK_FILE_NAME: &str = "downloaded";

/// One downloaded archive bound to the sandbox that owns its working
/// directory.
///
/// Every operation opens its own read session over the archive file. Not
/// safe for concurrent use; build one per archive instead.
#[derive(Debug)]
pub struct ArchiveSandbox {
    sandbox: Sandbox,
    archive: PathBuf,
}

impl ArchiveSandbox {
    pub fn new(sandbox: Sandbox, archive: impl Into<PathBuf>) -> Self {
        Self {
            sandbox,
            archive: archive.into(),
        }
    }

    /// Create a fresh sandbox and copy an already fetched archive stream into
    /// it. Only the base name of `file_name` is used.
    pub fn ingest<R: Read>(
        options: &SandboxOptions,
        file_name: &str,
        mut reader: R,
    ) -> Result<Self> {
        let sandbox = Sandbox::create(options)?;
        let base = Path::new(file_name)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(FALLBACK_FILE_NAME));
        let archive = sandbox.path().join(base);

        let write_err = |source| Error::Write {
            path: archive.clone(),
            source,
        };
        let mut out_file = File::create(&archive).map_err(write_err)?;
        let bytes = io::copy(&mut reader, &mut out_file).map_err(write_err)?;
        info!(archive = %archive.display(), bytes, "stored archive in sandbox");

        Ok(Self::new(sandbox, archive))
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive
    }

    pub fn working_dir(&self) -> &Path {
        self.sandbox.path()
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    /// Tree of visible members. Fails with `NotFound` if the archive is gone.
    pub fn tree(&self) -> Result<String> {
        archive_tree(&self.archive, self.sandbox.path())
    }

    /// Extract into `destination`, or into the working directory when `None`.
    pub fn extract(&self, destination: Option<&Path>) -> Result<Extraction> {
        extract_archive(&self.archive, destination.unwrap_or(self.sandbox.path()))
    }

    /// Regular files, relative or joined under the working directory.
    pub fn list_files(&self, full: bool) -> Result<Vec<String>> {
        list_files(&self.archive, self.sandbox.path(), full)
    }

    pub fn release(&mut self) -> Cleanup {
        self.sandbox.release()
    }
}
