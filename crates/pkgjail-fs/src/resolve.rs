use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Resolve `path` to an absolute path, following every symlink that already
/// exists on disk.
///
/// Components that do not exist yet are appended lexically, so the result is
/// the location a write to `path` would actually land on. A dangling or
/// looping symlink is an error rather than a guess.
pub fn resolve(path: impl AsRef<Path>) -> io::Result<PathBuf> {
    let path = path.as_ref();
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut resolved = PathBuf::new();
    // Once a component is missing, nothing below it can exist either.
    let mut on_disk = true;

    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(part) => {
                resolved.push(part);
                if !on_disk {
                    continue;
                }
                match std::fs::symlink_metadata(&resolved) {
                    Ok(meta) if meta.file_type().is_symlink() => {
                        resolved = std::fs::canonicalize(&resolved)?;
                    }
                    Ok(_) => {}
                    Err(e)
                        if matches!(
                            e.kind(),
                            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                        ) =>
                    {
                        on_disk = false
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }

    Ok(resolved)
}

/// A directory resolved once, against which candidate paths are checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRoot {
    root: PathBuf,
}

impl ResolvedRoot {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let root = resolve(path).map_err(|source| Error::Resolve {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve `relative` as if it were written below the root.
    pub fn join(&self, relative: impl AsRef<Path>) -> io::Result<PathBuf> {
        resolve(self.root.join(relative))
    }

    /// Component-wise descendant check; `root-backup` is not inside `root`.
    pub fn contains(&self, resolved: impl AsRef<Path>) -> bool {
        resolved.as_ref().starts_with(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_tail_is_appended_lexically() -> io::Result<()> {
        let dir = tempdir()?;
        let base = std::fs::canonicalize(dir.path())?;
        let resolved = resolve(dir.path().join("a/./b/../c.txt"))?;
        assert_eq!(resolved, base.join("a/c.txt"));
        Ok(())
    }

    #[test]
    fn sibling_with_shared_prefix_is_outside() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("target");
        std::fs::create_dir(&target).unwrap();
        let root = ResolvedRoot::new(&target).unwrap();

        let sibling = root.path().with_file_name("target-backup").join("x");
        assert!(!root.contains(&sibling));
        assert!(root.contains(root.path().join("x")));
        assert!(root.contains(root.path()));
    }

    #[cfg(unix)]
    #[test]
    fn existing_symlink_is_followed() -> io::Result<()> {
        let dir = tempdir()?;
        let outside = tempdir()?;
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link"))?;

        let resolved = resolve(dir.path().join("link/file.txt"))?;
        assert_eq!(
            resolved,
            std::fs::canonicalize(outside.path())?.join("file.txt")
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_an_error() -> io::Result<()> {
        let dir = tempdir()?;
        std::os::unix::fs::symlink("/nonexistent/pkgjail", dir.path().join("dangling"))?;
        assert!(resolve(dir.path().join("dangling/file.txt")).is_err());
        Ok(())
    }
}
