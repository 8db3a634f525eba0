//! File resource - regular files, directories and absent paths

use anyhow::Result as AnyResult;
use declarative::Resource;
use std::fmt;
use std::fs;
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};

use crate::content::ensure_content;
use crate::error::{Error, Result};
use crate::permissions::ensure_permissions;
use crate::probe::probe;
use crate::types::{Defaults, FileInfo, FileKind, FileState, Permissions};

/// Ensures the state of a single path
///
/// - `File`: content, then mode and ownership
/// - `Directory`: created with all missing parents, then mode and ownership
/// - `Absent`: a file is removed, a directory is removed recursively
///
/// A directory is never turned into a file, nor a file into a directory.
#[derive(Debug, Clone)]
pub struct FileModule {
    pub path: PathBuf,
    pub state: FileState,
    pub content: Vec<u8>,
    pub permissions: Permissions,
}

impl FileModule {
    pub fn new(path: impl AsRef<Path>, state: FileState, defaults: &Defaults) -> Self {
        let permissions = match state {
            FileState::Directory => defaults.dir_permissions(),
            FileState::File | FileState::Absent => defaults.file_permissions(),
        };
        Self {
            path: path.as_ref().to_path_buf(),
            state,
            content: Vec::new(),
            permissions,
        }
    }

    pub fn with_content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.permissions.mode = Some(mode);
        self
    }

    /// Pin ownership; `None` keeps whatever the defaults chose
    pub fn with_owner(mut self, uid: Option<u32>, gid: Option<u32>) -> Self {
        self.permissions = self.permissions.overridden_by(&Permissions {
            mode: None,
            uid,
            gid,
        });
        self
    }

    /// Probe the path and converge it, returning whether anything changed
    pub fn converge(&self) -> Result<bool> {
        let target = probe(&self.path)?;
        match self.state {
            FileState::File => ensure_file(target, &self.content, &self.permissions),
            FileState::Directory => self.directory(target),
            FileState::Absent => self.absent(&target),
        }
    }

    fn directory(&self, target: FileInfo) -> Result<bool> {
        let created = match target.kind {
            FileKind::Absent => {
                let mode = self.permissions.mode.unwrap_or(Defaults::DIR_MODE);
                fs::DirBuilder::new()
                    .recursive(true)
                    .mode(mode)
                    .create(&self.path)
                    .map_err(|source| Error::CreateDir {
                        path: self.path.clone(),
                        source,
                    })?;
                log::info!("created directory {}", self.path.display());
                true
            }
            FileKind::Directory => false,
            actual => {
                return Err(Error::TypeMismatch {
                    path: self.path.clone(),
                    expected: FileKind::Directory,
                    actual,
                });
            }
        };

        // mkdir is subject to the umask; compare against what was really created
        let target = if created { probe(&self.path)? } else { target };
        let permissions_changed = ensure_permissions(&self.permissions, &target)?;
        Ok(created || permissions_changed)
    }

    fn absent(&self, target: &FileInfo) -> Result<bool> {
        let removed = match target.kind {
            FileKind::Absent => return Ok(false),
            FileKind::File => fs::remove_file(&self.path),
            FileKind::Directory => fs::remove_dir_all(&self.path),
            FileKind::Link => {
                return Err(Error::NotImplemented {
                    operation: format!("removing link {}", self.path.display()),
                });
            }
        };
        removed.map_err(|source| Error::Remove {
            path: self.path.clone(),
            source,
        })?;
        log::info!("removed {} {}", target.kind, self.path.display());
        Ok(true)
    }
}

/// Converge a regular file: content first, then mode and ownership.
///
/// Shared by the file and template modules. A freshly created file is
/// probed again so the permission step sees its real mode and owner.
pub(crate) fn ensure_file(
    target: FileInfo,
    content: &[u8],
    permissions: &Permissions,
) -> Result<bool> {
    let mode = permissions.mode.unwrap_or(Defaults::FILE_MODE);
    let content_changed = ensure_content(&target, content, mode)?;

    let target = if target.exists() {
        target
    } else {
        probe(&target.path)?
    };
    let permissions_changed = ensure_permissions(permissions, &target)?;

    Ok(content_changed || permissions_changed)
}

impl fmt::Display for FileModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.state, self.path.display())
    }
}

impl Resource for FileModule {
    fn id(&self) -> String {
        self.path.display().to_string()
    }

    fn description(&self) -> String {
        match self.state {
            FileState::File => format!("Ensure file {}", self.path.display()),
            FileState::Directory => format!("Ensure directory {}", self.path.display()),
            FileState::Absent => format!("Ensure {} is absent", self.path.display()),
        }
    }

    fn resource_type(&self) -> &'static str {
        "file"
    }

    fn run(&self) -> AnyResult<bool> {
        Ok(self.converge()?)
    }
}
