//! Resource trait for idempotent state management
//!
//! A Resource holds a desired state and knows how to converge the
//! system to it. Running it reports whether anything had to change.

use anyhow::Result;
use std::fmt;

/// Core trait for declarative resources
///
/// Every resource module implements this trait, which provides:
/// - Identity (id, description, type)
/// - Convergence (run)
///
/// `run` takes no arguments: the desired state lives in the resource
/// itself. It probes the actual state, applies the minimal delta and
/// returns `true` if the system was changed.
///
/// # Example
///
/// ```ignore
/// use declarative::Resource;
///
/// #[derive(Debug)]
/// struct Marker {
///     path: std::path::PathBuf,
/// }
///
/// impl Resource for Marker {
///     fn id(&self) -> String {
///         self.path.display().to_string()
///     }
///
///     fn description(&self) -> String {
///         format!("Ensure marker at {}", self.path.display())
///     }
///
///     fn resource_type(&self) -> &'static str {
///         "marker"
///     }
///
///     fn run(&self) -> anyhow::Result<bool> {
///         if self.path.exists() {
///             return Ok(false);
///         }
///         std::fs::write(&self.path, b"")?;
///         Ok(true)
///     }
/// }
/// ```
pub trait Resource: fmt::Debug {
    /// Unique identifier for this resource
    ///
    /// This should be stable and uniquely identify the resource
    /// within its type. Examples:
    /// - "htop" for a package
    /// - "D742B261" for a signing key
    /// - "/etc/steward/message" for a file
    fn id(&self) -> String;

    /// Human-readable description of what this resource does
    fn description(&self) -> String;

    /// Resource type category
    ///
    /// Used for grouping and filtering. Examples:
    /// - "file", "copy", "template"
    /// - "package", "apt_key", "apt_repository"
    fn resource_type(&self) -> &'static str;

    /// Converge actual state to the desired state
    ///
    /// Returns `Ok(true)` if anything was changed, `Ok(false)` if the
    /// system already matched. Running a resource twice in a row must
    /// report `false` the second time.
    fn run(&self) -> Result<bool>;
}

/// A boxed resource for type-erased storage
pub type BoxedResource = Box<dyn Resource>;
