//! Filesystem side of the archive sandbox.
//!
//! - `resolve.rs` - Symlink-aware resolution and component-wise containment
//! - `sandbox.rs` - Working-directory creation and best-effort release

mod error;
mod resolve;
mod sandbox;

pub use error::{Error, Result};
pub use resolve::{ResolvedRoot, resolve};
pub use sandbox::{Cleanup, Ownership, Sandbox, SandboxOptions};
