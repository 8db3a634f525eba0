//! Content reconciler - makes a file hold an expected payload

use crate::error::{Error, Result};
use crate::probe::checksum_bytes;
use crate::types::{FileInfo, FileKind};
use std::fs::OpenOptions;
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

/// Ensure `target` holds exactly `content`.
///
/// An absent target is created with `mode`. An existing file is only
/// rewritten when its checksum differs from the checksum of `content`;
/// equal content is never written. Anything else is a type mismatch.
pub fn ensure_content(target: &FileInfo, content: &[u8], mode: u32) -> Result<bool> {
    match target.kind {
        FileKind::Absent => {
            write_content(&target.path, content, mode)?;
            log::info!("created {}", target.path.display());
            Ok(true)
        }
        FileKind::File => {
            let checksum = checksum_bytes(content);
            if target.checksum.as_deref() == Some(checksum.as_str()) {
                log::debug!("content of {} is up to date", target.path.display());
                return Ok(false);
            }
            write_content(&target.path, content, mode)?;
            log::info!("updated content of {}", target.path.display());
            Ok(true)
        }
        actual => Err(Error::TypeMismatch {
            path: target.path.clone(),
            expected: FileKind::File,
            actual,
        }),
    }
}

/// Write a payload, truncating an existing file. `mode` applies on creation only.
pub(crate) fn write_content(path: &Path, content: &[u8], mode: u32) -> Result<()> {
    let write_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)
        .map_err(write_error)?;
    file.write_all(content).map_err(write_error)?;
    file.flush().map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::probe;
    use std::fs;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_content_creates_absent_file() {
        let dir = TempDir::new().unwrap();
        let target = probe(dir.path().join("target")).unwrap();

        let changed = ensure_content(&target, b"Hello My Name is", 0o644).unwrap();

        assert!(changed);
        assert_eq!(fs::read_to_string(&target.path).unwrap(), "Hello My Name is");
    }

    #[test]
    fn test_ensure_content_equal_content_is_not_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("target");
        fs::write(&path, "Hello My Name is").unwrap();
        let before = fs::metadata(&path).unwrap().modified().unwrap();
        thread::sleep(Duration::from_millis(20));

        let target = probe(&path).unwrap();
        let changed = ensure_content(&target, b"Hello My Name is", 0o644).unwrap();

        assert!(!changed);
        let after = fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_ensure_content_overwrites_other_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("target");
        fs::write(&path, "Hi My Name is. And this is longer").unwrap();

        let target = probe(&path).unwrap();
        let changed = ensure_content(&target, b"Hello My Name is", 0o644).unwrap();

        assert!(changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "Hello My Name is");
    }

    #[test]
    fn test_ensure_content_rejects_directory() {
        let dir = TempDir::new().unwrap();
        let target = probe(dir.path()).unwrap();

        let err = ensure_content(&target, b"x", 0o644).unwrap_err();

        assert!(err.is_type_mismatch());
        assert!(dir.path().is_dir());
    }
}
