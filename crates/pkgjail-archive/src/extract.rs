//! Materialize sanitized members below a destination directory.
//!
//! Every member is sanitized again against the destination actually being
//! written, whatever root was used to inspect or list the archive.
//!
//! # Platform Behavior
//!
//! **Unix**: file mode bits from the archive, masked to `0o777`, are applied
//! to extracted files. A failed chmod is recorded on the entry and logged,
//! never raised.
//!
//! **Windows (non-Unix)**: mode bits are ignored.
//!
//! Extraction is additive and not atomic: unrelated files already under the
//! destination are left alone, and a write failure leaves whatever was
//! written before it on disk. A regular file sitting on a member's own path
//! is replaced, even when an earlier run left it read-only. A member that
//! resolves onto the archive itself is skipped.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use pkgjail_fs::ResolvedRoot;
use tracing::{debug, info, trace, warn};

use crate::error::{Error, Result};
use crate::member::MemberKind;
use crate::sanitize::sanitize;
use crate::session::{ArchiveSession, Member};

const MODE_MASK: u32 = 0o777;

/// Whether the archive's mode bits made it onto disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeStatus {
    Applied,
    /// chmod failed; the file keeps its default permissions.
    Failed,
    /// Directories, and every entry on platforms without mode bits.
    Skipped,
}

#[derive(Clone, Debug)]
pub struct ExtractedEntry {
    /// Archive-relative path after sanitization.
    pub path: PathBuf,
    /// Resolved location written on disk.
    pub target: PathBuf,
    pub kind: MemberKind,
    pub size: u64,
    pub mode: ModeStatus,
}

/// Summary of one extraction run.
#[derive(Clone, Debug)]
pub struct Extraction {
    pub destination: PathBuf,
    pub entries: Vec<ExtractedEntry>,
    /// Members filtered out by sanitization, plus any member that would
    /// overwrite the archive being read.
    pub skipped: usize,
    pub total_bytes: u64,
}

/// Extract every acceptable member of `archive` below `destination`,
/// creating the destination if needed.
pub fn extract_archive(
    archive: impl AsRef<Path>,
    destination: impl AsRef<Path>,
) -> Result<Extraction> {
    let archive = archive.as_ref();
    let destination = destination.as_ref();
    let mut session = ArchiveSession::open(archive)?;
    let archive_target = pkgjail_fs::resolve(archive).map_err(|source| Error::Read {
        path: archive.to_path_buf(),
        source,
    })?;

    std::fs::create_dir_all(destination).map_err(|source| Error::DirectoryCreationFailed {
        path: destination.to_path_buf(),
        source,
    })?;
    let root = ResolvedRoot::new(destination)?;

    let mut entries = Vec::new();
    let mut skipped = 0;
    let mut total_bytes = 0;

    for member in session.members()? {
        let mut member = member?;
        let Some(sanitized) = sanitize(member.raw(), &root).accepted() else {
            skipped += 1;
            continue;
        };
        let target = sanitized.resolved;
        if target == archive_target {
            debug!(member = %sanitized.path.display(), "member would overwrite the archive");
            skipped += 1;
            continue;
        }

        let (size, mode) = match sanitized.kind {
            MemberKind::Directory => {
                create_dir_all(&target)?;
                (0, ModeStatus::Skipped)
            }
            MemberKind::File => {
                if let Some(parent) = target.parent() {
                    create_dir_all(parent)?;
                }
                let written = write_file(&mut member, &target)?;
                (written, apply_mode(&target, sanitized.mode))
            }
        };
        trace!(path = %target.display(), size, "extracted member");

        total_bytes += size;
        entries.push(ExtractedEntry {
            path: sanitized.path,
            target,
            kind: sanitized.kind,
            size,
            mode,
        });
    }

    info!(
        destination = %destination.display(),
        entries = entries.len(),
        skipped,
        total_bytes,
        "extracted archive"
    );

    Ok(Extraction {
        destination: destination.to_path_buf(),
        entries,
        skipped,
        total_bytes,
    })
}

fn create_dir_all(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| Error::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(member: &mut Member<'_>, target: &Path) -> Result<u64> {
    let extraction_err = |source| Error::ExtractionFailed {
        path: target.to_path_buf(),
        source,
    };
    // Unlink first: a previous run may have made the file read-only.
    match std::fs::symlink_metadata(target) {
        Ok(meta) if meta.is_file() => std::fs::remove_file(target).map_err(extraction_err)?,
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(extraction_err(e)),
    }
    let mut out_file = File::create(target).map_err(extraction_err)?;
    io::copy(member, &mut out_file).map_err(extraction_err)
}

fn apply_mode(path: &Path, mode: u32) -> ModeStatus {
    match set_mode(path, mode & MODE_MASK) {
        Ok(true) => ModeStatus::Applied,
        Ok(false) => ModeStatus::Skipped,
        Err(e) => {
            warn!(
                path = %path.display(),
                mode = %format!("{mode:o}"),
                error = %e,
                "failed to apply mode"
            );
            ModeStatus::Failed
        }
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<bool> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))?;
    Ok(true)
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<bool> {
    Ok(false)
}
