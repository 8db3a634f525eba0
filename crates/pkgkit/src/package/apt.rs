//! Debian package backend using `dpkg` and `apt-get`.

use crate::error::Result;
use crate::package::PackageSystem;
use crate::runner::Invocation;
use crate::types::PackageInfo;

const APT_GET: &str = "apt-get";

/// Backend that executes real `dpkg` and `apt-get` commands.
///
/// Every `apt-get` run is non-interactive.
#[derive(Debug, Clone, Copy, Default)]
pub struct AptBackend;

impl AptBackend {
    fn apt_get<'a>(args: &[&'a str]) -> Invocation<'a> {
        Invocation::new(APT_GET, args).env("DEBIAN_FRONTEND", "noninteractive")
    }
}

impl PackageSystem for AptBackend {
    /// `dpkg -s` exits non-zero for unknown packages; any failure counts as not installed
    fn info(&self, name: &str) -> PackageInfo {
        PackageInfo {
            installed: Invocation::new("dpkg", &["-s", name]).succeeds(),
        }
    }

    fn install(&self, name: &str) -> Result<()> {
        Self::apt_get(&["-y", "update"]).run_checked()?;
        Self::apt_get(&["-y", "install", name]).run_checked()?;
        Ok(())
    }

    fn uninstall(&self, name: &str) -> Result<()> {
        Self::apt_get(&["-y", "remove", name]).run_checked()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apt_get_is_non_interactive() {
        let invocation = AptBackend::apt_get(&["-y", "remove", "jq"]);
        assert_eq!(invocation.command_line(), "apt-get -y remove jq");
        assert!(
            invocation
                .envs
                .contains(&("DEBIAN_FRONTEND", "noninteractive"))
        );
    }

    #[test]
    fn test_unknown_package_is_not_installed() {
        // Holds whether or not dpkg exists on the host
        let info = AptBackend.info("steward-package-that-does-not-exist");
        assert!(!info.installed);
    }
}
