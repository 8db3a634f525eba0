//! Resource probe - reads the actual state of a path

use crate::error::{Error, Result};
use crate::types::{FileInfo, FileKind, Permissions};
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::Path;

/// Mode bits compared and applied by the reconcilers
pub const MODE_MASK: u32 = 0o7777;

/// Probe a path into a fresh snapshot.
///
/// A missing path is a normal outcome and yields [`FileKind::Absent`].
/// Regular files are hashed in full. Any other stat failure is an error.
pub fn probe(path: impl AsRef<Path>) -> Result<FileInfo> {
    let path = path.as_ref();

    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("{} is absent", path.display());
            return Ok(FileInfo::absent(path));
        }
        Err(source) => {
            return Err(Error::Probe {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let (kind, checksum) = if metadata.is_dir() {
        (FileKind::Directory, None)
    } else if metadata.is_file() {
        (FileKind::File, Some(checksum_file(path)?))
    } else {
        return Err(Error::Special {
            path: path.to_path_buf(),
        });
    };

    let info = FileInfo {
        path: path.to_path_buf(),
        kind,
        checksum,
        mode: metadata.permissions().mode() & MODE_MASK,
        uid: metadata.uid(),
        gid: metadata.gid(),
    };
    log::debug!(
        "{} is {} (mode {:o}, owner {}:{})",
        path.display(),
        info.kind,
        info.mode,
        info.uid,
        info.gid
    );
    Ok(info)
}

/// Probe a path and override the snapshot with the specified desired fields.
///
/// Used to derive an expected state from a source path while still
/// letting the caller pin mode or ownership.
pub fn probe_merged(path: impl AsRef<Path>, desired: &Permissions) -> Result<FileInfo> {
    Ok(probe(path)?.merge(desired))
}

/// Hex-encoded content hash of a file, streamed
pub fn checksum_file(path: &Path) -> Result<String> {
    let read_error = |source| Error::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_error)?;
    let mut reader = BufReader::with_capacity(1024 * 1024, file);
    let mut hasher = blake3::Hasher::new();

    let mut buffer = [0u8; 65536];
    loop {
        let bytes_read = reader.read(&mut buffer).map_err(read_error)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}

/// Hex-encoded content hash of an in-memory payload
pub fn checksum_bytes(content: &[u8]) -> String {
    blake3::hash(content).to_hex().to_string()
}
