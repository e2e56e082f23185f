use std::path::Path;

use crate::catalog::visible_members;
use crate::error::Result;
use crate::tree;

/// Render the archive's visible members as a tree. Reads only; nothing is
/// written below `root`.
pub fn archive_tree(archive: impl AsRef<Path>, root: impl AsRef<Path>) -> Result<String> {
    let mut names: Vec<String> = visible_members(archive.as_ref(), root.as_ref())?
        .iter()
        .filter(|member| !member.name().is_empty())
        .map(|member| member.display_name())
        .collect();
    names.sort();
    Ok(tree::render(names))
}
