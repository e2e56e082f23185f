use std::path::Path;

use crate::catalog::visible_members;
use crate::error::Result;

/// Regular files of the archive in byte order.
///
/// With `full` each name is joined under `root`. This is path composition
/// only; the files need not have been extracted.
pub fn list_files(
    archive: impl AsRef<Path>,
    root: impl AsRef<Path>,
    full: bool,
) -> Result<Vec<String>> {
    let root = root.as_ref();
    let mut files: Vec<String> = visible_members(archive.as_ref(), root)?
        .iter()
        .filter(|member| member.is_file())
        .map(|member| {
            if full {
                root.join(&member.path).to_string_lossy().into_owned()
            } else {
                member.name()
            }
        })
        .collect();
    files.sort();
    Ok(files)
}
