use std::path::{Component, Path, PathBuf};

/// Entry type as recorded in the archive header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawKind {
    File,
    Directory,
    Symlink,
    HardLink,
    CharDevice,
    BlockDevice,
    Fifo,
    Other(u8),
}

impl RawKind {
    pub fn from_entry_type(entry_type: tar::EntryType) -> Self {
        use tar::EntryType;
        match entry_type {
            EntryType::Regular | EntryType::Continuous | EntryType::GNUSparse => Self::File,
            EntryType::Directory => Self::Directory,
            EntryType::Symlink => Self::Symlink,
            EntryType::Link => Self::HardLink,
            EntryType::Char => Self::CharDevice,
            EntryType::Block => Self::BlockDevice,
            EntryType::Fifo => Self::Fifo,
            other => Self::Other(other.as_byte()),
        }
    }
}

/// Ownership metadata carried by a tar header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Owner {
    pub uid: u64,
    pub gid: u64,
    pub user: String,
    pub group: String,
}

impl Owner {
    pub fn is_cleared(&self) -> bool {
        *self == Self::default()
    }
}

/// An archive entry exactly as decoded, before any policy is applied.
#[derive(Clone, Debug)]
pub struct RawMember {
    pub name: PathBuf,
    pub kind: RawKind,
    pub mode: u32,
    pub size: u64,
    pub owner: Owner,
}

impl RawMember {
    pub fn new(name: impl Into<PathBuf>, kind: RawKind) -> Self {
        Self {
            name: name.into(),
            kind,
            mode: 0o644,
            size: 0,
            owner: Owner::default(),
        }
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_owner(mut self, owner: Owner) -> Self {
        self.owner = owner;
        self
    }

    pub(crate) fn from_header(name: PathBuf, header: &tar::Header, size: u64) -> Self {
        let mut kind = RawKind::from_entry_type(header.entry_type());
        // Pre-POSIX archives mark directories with a trailing slash only.
        if kind == RawKind::File && ends_with_separator(&name) {
            kind = RawKind::Directory;
        }

        Self {
            name,
            kind,
            mode: header.mode().unwrap_or(0),
            size,
            owner: Owner {
                uid: header.uid().unwrap_or(0),
                gid: header.gid().unwrap_or(0),
                user: header.username().ok().flatten().unwrap_or_default().to_owned(),
                group: header.groupname().ok().flatten().unwrap_or_default().to_owned(),
            },
        }
    }
}

fn ends_with_separator(path: &Path) -> bool {
    path.as_os_str()
        .as_encoded_bytes()
        .last()
        .is_some_and(|b| *b == b'/' || *b == b'\\')
}

/// The only entry types that survive sanitization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKind {
    File,
    Directory,
}

/// A member that passed sanitization against one particular root.
#[derive(Clone, Debug)]
pub struct SanitizedMember {
    /// Normalized archive-relative path: no root, no `.` and no `..`.
    pub path: PathBuf,
    /// Where the member lands once written below the root.
    pub resolved: PathBuf,
    pub kind: MemberKind,
    pub mode: u32,
    pub size: u64,
    /// Always cleared.
    pub owner: Owner,
}

impl SanitizedMember {
    /// `/`-joined archive-relative name without a trailing separator.
    pub fn name(&self) -> String {
        self.path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Name as shown to users; directories carry a trailing `/`.
    pub fn display_name(&self) -> String {
        match self.kind {
            MemberKind::Directory => format!("{}/", self.name()),
            MemberKind::File => self.name(),
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == MemberKind::File
    }

    pub fn is_directory(&self) -> bool {
        self.kind == MemberKind::Directory
    }
}
