//! Permission reconciler - mode and ownership, independent of content

use crate::error::{Error, Result};
use crate::probe::MODE_MASK;
use crate::types::{FileInfo, Permissions};
use std::fs;
use std::os::unix::fs::{PermissionsExt, chown};

/// Ensure `target` carries the desired mode and ownership.
///
/// Mode and ownership are compared separately; when either owner field
/// differs, uid and gid are applied together in one change. Unspecified
/// fields are left as probed. A failure in either step is returned as is,
/// without undoing the other.
pub fn ensure_permissions(desired: &Permissions, target: &FileInfo) -> Result<bool> {
    let mut changed = false;

    if let Some(mode) = desired.mode.map(|m| m & MODE_MASK)
        && mode != target.mode
    {
        fs::set_permissions(&target.path, fs::Permissions::from_mode(mode)).map_err(|source| {
            Error::Chmod {
                path: target.path.clone(),
                mode,
                source,
            }
        })?;
        log::info!(
            "changed mode of {} from {:o} to {:o}",
            target.path.display(),
            target.mode,
            mode
        );
        changed = true;
    }

    let uid = desired.uid.unwrap_or(target.uid);
    let gid = desired.gid.unwrap_or(target.gid);
    if uid != target.uid || gid != target.gid {
        chown(&target.path, Some(uid), Some(gid)).map_err(|source| Error::Chown {
            path: target.path.clone(),
            uid,
            gid,
            source,
        })?;
        log::info!(
            "changed owner of {} from {}:{} to {}:{}",
            target.path.display(),
            target.uid,
            target.gid,
            uid,
            gid
        );
        changed = true;
    }

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::probe;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_permissions_changes_mode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("target");
        fs::write(&path, "a").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o777)).unwrap();

        let target = probe(&path).unwrap();
        let changed = ensure_permissions(&Permissions::mode(0o644), &target).unwrap();

        assert!(changed);
        assert_eq!(probe(&path).unwrap().mode, 0o644);
    }

    #[test]
    fn test_ensure_permissions_matching_is_no_change() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("target");
        fs::write(&path, "a").unwrap();

        let target = probe(&path).unwrap();
        let changed = ensure_permissions(&target.permissions(), &target).unwrap();

        assert!(!changed);
    }

    #[test]
    fn test_ensure_permissions_unspecified_is_no_change() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("target");
        fs::write(&path, "a").unwrap();

        let target = probe(&path).unwrap();
        assert!(!ensure_permissions(&Permissions::default(), &target).unwrap());
    }

    #[test]
    fn test_ensure_permissions_missing_path_fails() {
        let dir = TempDir::new().unwrap();
        let mut target = probe(dir.path()).unwrap();
        target.path = dir.path().join("gone");

        let err = ensure_permissions(&Permissions::mode(0o600), &target).unwrap_err();
        assert!(matches!(err, Error::Chmod { .. }));
    }
}
