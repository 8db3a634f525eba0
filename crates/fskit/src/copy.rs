//! Copy resource - target becomes an exact copy of a source file

use anyhow::Result as AnyResult;
use declarative::Resource;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::permissions::ensure_permissions;
use crate::probe::{probe, probe_merged};
use crate::types::{FileInfo, FileKind, Permissions};

/// Ensures that the target is an exact copy of the source file
///
/// Content, mode and ownership are taken from the source. Any field set
/// in `permissions` overrides the source's value.
#[derive(Debug, Clone)]
pub struct CopyModule {
    pub source: PathBuf,
    pub target: PathBuf,
    pub permissions: Permissions,
}

impl CopyModule {
    pub fn new(source: impl AsRef<Path>, target: impl AsRef<Path>) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            target: target.as_ref().to_path_buf(),
            permissions: Permissions::default(),
        }
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.permissions.mode = Some(mode);
        self
    }

    pub fn with_owner(mut self, uid: Option<u32>, gid: Option<u32>) -> Self {
        self.permissions.uid = uid;
        self.permissions.gid = gid;
        self
    }

    /// Probe source and target and converge the target
    pub fn converge(&self) -> Result<bool> {
        let expected = probe_merged(&self.source, &self.permissions)?;
        match expected.kind {
            FileKind::File => {}
            FileKind::Absent => {
                return Err(Error::SourceMissing {
                    path: self.source.clone(),
                });
            }
            actual => {
                return Err(Error::TypeMismatch {
                    path: self.source.clone(),
                    expected: FileKind::File,
                    actual,
                });
            }
        }

        let target = probe(&self.target)?;
        ensure_copy(&expected, target)
    }
}

fn ensure_copy(expected: &FileInfo, target: FileInfo) -> Result<bool> {
    let content_changed = match target.kind {
        FileKind::Absent => true,
        FileKind::File => target.checksum != expected.checksum,
        actual => {
            return Err(Error::TypeMismatch {
                path: target.path,
                expected: FileKind::File,
                actual,
            });
        }
    };

    if content_changed {
        copy_content(&expected.path, &target.path, expected.mode)?;
        log::info!(
            "copied {} to {}",
            expected.path.display(),
            target.path.display()
        );
    } else {
        log::debug!("{} is up to date", target.path.display());
    }

    let target = if target.exists() {
        target
    } else {
        probe(&target.path)?
    };
    let permissions_changed = ensure_permissions(&expected.permissions(), &target)?;

    Ok(content_changed || permissions_changed)
}

/// Stream the source into the target, truncating it. `mode` applies on creation only.
fn copy_content(source: &Path, target: &Path, mode: u32) -> Result<()> {
    let mut reader = File::open(source).map_err(|source_err| Error::Read {
        path: source.to_path_buf(),
        source: source_err,
    })?;

    let write_error = |source| Error::Write {
        path: target.to_path_buf(),
        source,
    };
    let mut writer = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(target)
        .map_err(write_error)?;
    io::copy(&mut reader, &mut writer).map_err(write_error)?;
    Ok(())
}

impl Resource for CopyModule {
    fn id(&self) -> String {
        self.target.display().to_string()
    }

    fn description(&self) -> String {
        format!(
            "Copy {} to {}",
            self.source.display(),
            self.target.display()
        )
    }

    fn resource_type(&self) -> &'static str {
        "copy"
    }

    fn run(&self) -> AnyResult<bool> {
        Ok(self.converge()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str, mode: u32) {
        fs::write(path, content).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
    }

    fn mode_of(path: &Path) -> u32 {
        fs::metadata(path).unwrap().permissions().mode() & 0o7777
    }

    #[test]
    fn test_copy_to_missing_target_then_idempotent() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        write(&source, "a", 0o644);

        let copy = CopyModule::new(&source, &target);

        assert!(copy.converge().unwrap());
        assert_eq!(fs::read(&target).unwrap(), b"a");
        assert_eq!(mode_of(&target), 0o644);
        assert!(!copy.converge().unwrap());
    }

    #[test]
    fn test_copy_different_content() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        write(&source, "a", 0o644);
        write(&target, "bbbb", 0o644);

        assert!(CopyModule::new(&source, &target).converge().unwrap());
        assert_eq!(fs::read(&target).unwrap(), b"a");
    }

    #[test]
    fn test_copy_equal_content() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        write(&source, "a", 0o644);
        write(&target, "a", 0o644);

        assert!(!CopyModule::new(&source, &target).converge().unwrap());
    }

    #[test]
    fn test_copy_mode_from_source() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        write(&source, "a", 0o644);
        write(&target, "a", 0o755);

        assert!(CopyModule::new(&source, &target).converge().unwrap());
        assert_eq!(mode_of(&target), 0o644);
    }

    #[test]
    fn test_copy_explicit_mode_overrides_source() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        write(&source, "a", 0o755);
        write(&target, "a", 0o755);

        let copy = CopyModule::new(&source, &target).with_mode(0o644);

        assert!(copy.converge().unwrap());
        assert_eq!(mode_of(&target), 0o644);
        assert_eq!(mode_of(&source), 0o755);
    }

    #[test]
    fn test_copy_without_source() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        write(&target, "a", 0o644);

        let err = CopyModule::new(&source, &target).converge().unwrap_err();

        assert!(matches!(err, Error::SourceMissing { .. }));
        assert_eq!(fs::read(&target).unwrap(), b"a");
    }

    #[test]
    fn test_copy_from_directory_is_type_mismatch() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("target");

        let err = CopyModule::new(dir.path(), &target).converge().unwrap_err();

        assert!(err.is_type_mismatch());
        assert!(!target.exists());
    }

    #[test]
    fn test_copy_onto_directory_is_type_mismatch() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        write(&source, "a", 0o644);
        fs::create_dir(&target).unwrap();

        let err = CopyModule::new(&source, &target).converge().unwrap_err();

        assert!(err.is_type_mismatch());
        assert!(target.is_dir());
    }
}
