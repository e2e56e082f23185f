use std::path::Path;

use pkgjail_fs::ResolvedRoot;

use crate::error::Result;
use crate::member::SanitizedMember;
use crate::reserved::is_reserved;
use crate::sanitize::sanitize;
use crate::session::ArchiveSession;

/// Members a user gets to see: sanitized against `root` and stripped of
/// reserved names. Shared by the tree and the file listing.
pub(crate) fn visible_members(archive: &Path, root: &Path) -> Result<Vec<SanitizedMember>> {
    let mut session = ArchiveSession::open(archive)?;
    let root = ResolvedRoot::new(root)?;
    let archive_name = archive.file_name();

    let mut visible = Vec::new();
    for member in session.members()? {
        let member = member?;
        let Some(sanitized) = sanitize(member.raw(), &root).accepted() else {
            continue;
        };
        if is_reserved(&sanitized.name(), archive_name) {
            continue;
        }
        visible.push(sanitized);
    }
    Ok(visible)
}
