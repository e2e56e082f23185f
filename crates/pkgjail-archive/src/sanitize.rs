use std::fmt;
use std::io;
use std::path::{Component, PathBuf};

use pkgjail_fs::ResolvedRoot;
use tracing::debug;

use crate::member::{MemberKind, Owner, RawKind, RawMember, SanitizedMember};

/// Outcome of running one raw member through the sanitizer.
#[derive(Debug)]
pub enum Sanitized {
    Accepted(SanitizedMember),
    Rejected(Rejection),
}

impl Sanitized {
    pub fn accepted(self) -> Option<SanitizedMember> {
        match self {
            Self::Accepted(member) => Some(member),
            Self::Rejected(_) => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Why a member was filtered out. Not an error: rejected members are
/// silently omitted.
#[derive(Debug)]
pub enum Rejection {
    /// A path segment is exactly `..`.
    ParentTraversal,
    /// Links, devices, fifos and anything else that is not a file or directory.
    UnsupportedKind(RawKind),
    /// A file whose name normalizes to nothing.
    EmptyName,
    /// The resolved destination is not below the root.
    Escapes { resolved: PathBuf },
    /// The destination could not be resolved at all.
    Unresolvable(io::Error),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParentTraversal => write!(f, "path contains a '..' segment"),
            Self::UnsupportedKind(kind) => write!(f, "unsupported entry type {kind:?}"),
            Self::EmptyName => write!(f, "file name is empty"),
            Self::Escapes { resolved } => {
                write!(f, "resolves outside the root to '{}'", resolved.display())
            }
            Self::Unresolvable(e) => write!(f, "destination cannot be resolved: {e}"),
        }
    }
}

/// Validate and normalize one archive member against `root`.
///
/// Leading separators and `.` segments are dropped, ownership is cleared and
/// containment is checked on the fully resolved destination.
pub fn sanitize(raw: &RawMember, root: &ResolvedRoot) -> Sanitized {
    let verdict = check(raw, root);
    if let Sanitized::Rejected(reason) = &verdict {
        debug!(member = %raw.name.display(), %reason, "filtered archive member");
    }
    verdict
}

fn check(raw: &RawMember, root: &ResolvedRoot) -> Sanitized {
    if raw.name.components().any(|c| c == Component::ParentDir) {
        return Sanitized::Rejected(Rejection::ParentTraversal);
    }

    let kind = match raw.kind {
        RawKind::File => MemberKind::File,
        RawKind::Directory => MemberKind::Directory,
        other => return Sanitized::Rejected(Rejection::UnsupportedKind(other)),
    };

    let path: PathBuf = raw
        .name
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();
    if kind == MemberKind::File && path.as_os_str().is_empty() {
        return Sanitized::Rejected(Rejection::EmptyName);
    }

    let resolved = match root.join(&path) {
        Ok(resolved) => resolved,
        Err(e) => return Sanitized::Rejected(Rejection::Unresolvable(e)),
    };
    if !root.contains(&resolved) {
        return Sanitized::Rejected(Rejection::Escapes { resolved });
    }

    Sanitized::Accepted(SanitizedMember {
        path,
        resolved,
        kind,
        mode: raw.mode,
        size: raw.size,
        owner: Owner::default(),
    })
}
