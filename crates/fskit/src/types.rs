//! Snapshot and desired-state types for filesystem resources

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of object found at a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
    Absent,
    /// Reserved. Probing follows symlinks, so no snapshot carries this kind yet.
    Link,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::File => write!(f, "file"),
            FileKind::Directory => write!(f, "directory"),
            FileKind::Absent => write!(f, "absent"),
            FileKind::Link => write!(f, "link"),
        }
    }
}

/// Desired state of a path managed by [`crate::FileModule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileState {
    File,
    Directory,
    Absent,
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileState::File => write!(f, "file"),
            FileState::Directory => write!(f, "directory"),
            FileState::Absent => write!(f, "absent"),
        }
    }
}

/// Snapshot of a path as found on disk
///
/// Produced fresh by every probe and never mutated in place. `checksum`
/// is set only for regular files; `mode`, `uid` and `gid` are zero for
/// absent paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: PathBuf,
    pub kind: FileKind,
    pub checksum: Option<String>,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
}

impl FileInfo {
    /// Snapshot of a path that does not exist
    pub fn absent(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            kind: FileKind::Absent,
            checksum: None,
            mode: 0,
            uid: 0,
            gid: 0,
        }
    }

    /// Check if anything exists at the path
    pub fn exists(&self) -> bool {
        self.kind != FileKind::Absent
    }

    /// The probed permissions, every field specified
    pub fn permissions(&self) -> Permissions {
        Permissions {
            mode: Some(self.mode),
            uid: Some(self.uid),
            gid: Some(self.gid),
        }
    }

    /// Override the probed permissions with every specified desired field
    ///
    /// Unspecified fields keep the probed value, so an under-specified
    /// desired state never forces a change.
    pub fn merge(mut self, desired: &Permissions) -> Self {
        if let Some(mode) = desired.mode {
            self.mode = mode;
        }
        if let Some(uid) = desired.uid {
            self.uid = uid;
        }
        if let Some(gid) = desired.gid {
            self.gid = gid;
        }
        self
    }
}

/// Desired mode and ownership; `None` means "leave as found"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Permissions {
    pub mode: Option<u32>,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
}

impl Permissions {
    /// Permissions with an explicit mode and nothing else
    pub fn mode(mode: u32) -> Self {
        Self {
            mode: Some(mode),
            ..Self::default()
        }
    }

    /// Replace the fields that are specified in `other`
    pub fn overridden_by(mut self, other: &Permissions) -> Self {
        if other.mode.is_some() {
            self.mode = other.mode;
        }
        if other.uid.is_some() {
            self.uid = other.uid;
        }
        if other.gid.is_some() {
            self.gid = other.gid;
        }
        self
    }

    /// Whether no field is specified
    pub fn is_unspecified(&self) -> bool {
        self.mode.is_none() && self.uid.is_none() && self.gid.is_none()
    }
}

/// Defaults handed to module constructors
///
/// Keeps process identity out of the reconciliation code: callers
/// decide once whether new files belong to the invoking user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default = "default_file_mode")]
    pub file_mode: u32,
    #[serde(default = "default_dir_mode")]
    pub dir_mode: u32,
    #[serde(default)]
    pub uid: Option<u32>,
    #[serde(default)]
    pub gid: Option<u32>,
}

fn default_file_mode() -> u32 {
    Defaults::FILE_MODE
}

fn default_dir_mode() -> u32 {
    Defaults::DIR_MODE
}

impl Defaults {
    pub const FILE_MODE: u32 = 0o644;
    pub const DIR_MODE: u32 = 0o755;

    /// Defaults owned by the invoking process (real uid, effective gid)
    pub fn current_process() -> Self {
        // SAFETY: getuid and getegid cannot fail and touch no memory.
        #[allow(unsafe_code)]
        let (uid, gid) = unsafe { (libc::getuid(), libc::getegid()) };
        Self {
            uid: Some(uid),
            gid: Some(gid),
            ..Self::default()
        }
    }

    /// Fill unset ownership from the invoking process
    pub fn or_current_process(self) -> Self {
        let current = Self::current_process();
        Self {
            uid: self.uid.or(current.uid),
            gid: self.gid.or(current.gid),
            ..self
        }
    }

    /// Desired permissions for regular files
    pub fn file_permissions(&self) -> Permissions {
        Permissions {
            mode: Some(self.file_mode),
            uid: self.uid,
            gid: self.gid,
        }
    }

    /// Desired permissions for directories
    pub fn dir_permissions(&self) -> Permissions {
        Permissions {
            mode: Some(self.dir_mode),
            uid: self.uid,
            gid: self.gid,
        }
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            file_mode: Self::FILE_MODE,
            dir_mode: Self::DIR_MODE,
            uid: None,
            gid: None,
        }
    }
}
