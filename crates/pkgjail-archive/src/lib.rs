//! Inspect, list and extract untrusted tar archives without letting their
//! contents escape a working directory.
//!
//! # Architecture
//!
//! - `format.rs` - Compression detection and decoders
//! - `session.rs` - Per-operation read sessions
//! - `sanitize.rs` - The trust boundary every member passes through
//! - `reserved.rs` - Package metadata hidden from users
//! - `inspect.rs`, `list.rs`, `extract.rs` - The three archive operations
//! - `sandbox.rs` - An archive bound to its working directory

pub use error::{Error, Result};
pub use extract::{ExtractedEntry, Extraction, ModeStatus, extract_archive};
pub use inspect::archive_tree;
pub use list::list_files;
pub use member::{MemberKind, Owner, RawKind, RawMember, SanitizedMember};
pub use reserved::is_reserved;
pub use sandbox::ArchiveSandbox;
pub use sanitize::{Rejection, Sanitized, sanitize};
pub use session::{ArchiveSession, Member, Members};

pub use pkgjail_fs::{Cleanup, Ownership, ResolvedRoot, Sandbox, SandboxOptions};

mod catalog;
mod error;
mod extract;
pub mod format;
mod inspect;
mod list;
mod member;
mod reserved;
mod sandbox;
mod sanitize;
mod session;
pub mod tree;
