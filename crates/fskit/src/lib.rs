//! Idempotent filesystem resources.
//!
//! Every module follows the same cycle: probe the actual state of a path
//! into a fresh [`FileInfo`], compare it with the desired state, and apply
//! only what differs.
//!
//! - [`probe`] reads kind, content checksum, mode and ownership
//! - [`ensure_content`] writes a payload only when the checksum differs
//! - [`ensure_permissions`] fixes mode and ownership independently of content
//! - [`FileModule`], [`CopyModule`] and [`TemplateModule`] compose them
//!
//! A directory is never replaced by a file and a file is never replaced by
//! a directory; such conflicts surface as [`Error::TypeMismatch`].

pub mod content;
pub mod copy;
pub mod error;
pub mod file;
pub mod permissions;
pub mod probe;
pub mod template;
pub mod types;

pub use content::ensure_content;
pub use copy::CopyModule;
pub use error::{Error, Result};
pub use file::FileModule;
pub use permissions::ensure_permissions;
pub use probe::{checksum_bytes, checksum_file, probe, probe_merged};
pub use template::{PlaceholderRenderer, Renderer, TemplateContext, TemplateModule};
pub use types::{Defaults, FileInfo, FileKind, FileState, Permissions};
