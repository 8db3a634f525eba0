//! Path resolution for steward
//!
//! # Environment Variables
//!
//! - `STEWARD_MANIFEST` - Manifest to apply when none is given on the command line
//! - `STEWARD_CONFIG_DIR` - Override config directory (e.g., `~/dotfiles/steward`)
//!
//! # Path Resolution Priority
//!
//! For manifest_path():
//! 1. Path given on the command line
//! 2. `STEWARD_MANIFEST` environment variable
//! 3. `<config dir>/manifest.toml`
//!
//! For the config directory:
//! 1. `STEWARD_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/steward` (if set)
//! 3. `~/.config/steward`

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable for the manifest path
pub const ENV_MANIFEST: &str = "STEWARD_MANIFEST";

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "STEWARD_CONFIG_DIR";

/// File name of the default manifest inside the config directory
pub const MANIFEST_FILE: &str = "manifest.toml";

/// Get the manifest to operate on
pub fn manifest_path(explicit: Option<&Path>) -> Result<PathBuf> {
    resolve_manifest_path(explicit, &env_lookup)
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn resolve_manifest_path(
    explicit: Option<&Path>,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Some(path) = lookup(ENV_MANIFEST) {
        let path = expand(&path);
        log::debug!("Using manifest from {}: {}", ENV_MANIFEST, path.display());
        return Ok(path);
    }

    Ok(resolve_config_dir(lookup)?.join(MANIFEST_FILE))
}

fn resolve_config_dir(lookup: &dyn Fn(&str) -> Option<String>) -> Result<PathBuf> {
    if let Some(dir) = lookup(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Some(xdg_config) = lookup("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("steward");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("steward");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Expand ~ and environment variables in a path string.
///
/// Unknown variables are left as written.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_explicit_manifest_wins() {
        let lookup = env(&[(ENV_MANIFEST, "/from/env.toml")]);
        let path = resolve_manifest_path(Some(Path::new("site.toml")), &lookup).unwrap();
        assert_eq!(path, PathBuf::from("site.toml"));
    }

    #[test]
    fn test_manifest_from_env() {
        let lookup = env(&[(ENV_MANIFEST, "/srv/steward.toml")]);
        let path = resolve_manifest_path(None, &lookup).unwrap();
        assert_eq!(path, PathBuf::from("/srv/steward.toml"));
    }

    #[test]
    fn test_manifest_in_config_dir() {
        let lookup = env(&[(ENV_CONFIG_DIR, "/custom/config")]);
        let path = resolve_manifest_path(None, &lookup).unwrap();
        assert_eq!(path, PathBuf::from("/custom/config/manifest.toml"));
    }

    #[test]
    fn test_config_dir_env_override_with_tilde() {
        let home = dirs::home_dir().unwrap();
        let lookup = env(&[(ENV_CONFIG_DIR, "~/dotfiles/steward")]);
        assert_eq!(
            resolve_config_dir(&lookup).unwrap(),
            home.join("dotfiles").join("steward")
        );
    }

    #[test]
    fn test_xdg_config_home() {
        let lookup = env(&[("XDG_CONFIG_HOME", "/tmp/xdg-config-test")]);
        assert_eq!(
            resolve_config_dir(&lookup).unwrap(),
            PathBuf::from("/tmp/xdg-config-test/steward")
        );
    }

    #[test]
    fn test_default_config_dir() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(
            resolve_config_dir(&env(&[])).unwrap(),
            home.join(".config").join("steward")
        );
    }

    #[test]
    fn test_expand_with_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand("~/test/path"), home.join("test").join("path"));
    }

    #[test]
    fn test_expand_unknown_env_var_unchanged() {
        let result = expand("/path/$NONEXISTENT_VAR_12345/file");
        assert_eq!(result, PathBuf::from("/path/$NONEXISTENT_VAR_12345/file"));
    }
}
