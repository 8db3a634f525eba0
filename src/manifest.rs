//! TOML manifest - the declared resources and the defaults they share
//!
//! ```toml
//! [defaults]
//! file_mode = 0o644
//!
//! [apt]
//! keyserver = "hkp://keyserver.ubuntu.com:80"
//!
//! [[resource]]
//! type = "file"
//! path = "/etc/motd"
//! content = "managed by steward\n"
//!
//! [[resource]]
//! type = "package"
//! name = "jq"
//! ```

use anyhow::{Context, Result};
use declarative::{BoxedResource, ExecutionPlan};
use fskit::{CopyModule, Defaults, FileModule, FileState, TemplateContext, TemplateModule};
use pkgkit::{KeyModule, PackageModule, RepositoryModule, State};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

/// A parsed manifest
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub apt: AptConfig,
    #[serde(default, rename = "resource")]
    pub resources: Vec<ResourceSpec>,
}

/// Settings shared by the apt resources
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AptConfig {
    /// Directory holding `sources.list` (default `/etc/apt`)
    pub root: Option<String>,
    /// Key server for keys without their own
    pub keyserver: Option<String>,
}

/// One `[[resource]]` entry
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum ResourceSpec {
    File {
        path: String,
        #[serde(default = "default_file_state")]
        state: FileState,
        content: Option<String>,
        mode: Option<u32>,
        uid: Option<u32>,
        gid: Option<u32>,
    },
    Copy {
        source: String,
        target: String,
        mode: Option<u32>,
        uid: Option<u32>,
        gid: Option<u32>,
    },
    Template {
        path: String,
        template: Option<String>,
        template_file: Option<String>,
        #[serde(default)]
        context: TemplateContext,
        mode: Option<u32>,
        uid: Option<u32>,
        gid: Option<u32>,
    },
    Package {
        name: String,
        #[serde(default)]
        state: State,
    },
    AptKey {
        id: String,
        #[serde(default)]
        state: State,
        server: Option<String>,
    },
    AptRepository {
        name: String,
        line: String,
        #[serde(default)]
        state: State,
    },
}

fn default_file_state() -> FileState {
    FileState::File
}

impl Manifest {
    /// Read and parse a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Build every resource in manifest order
    ///
    /// Relative paths are taken from `base_dir`, the manifest's directory.
    pub fn plan(&self, base_dir: &Path) -> Result<ExecutionPlan> {
        let defaults = self.defaults.or_current_process();
        let mut plan = ExecutionPlan::new();
        for (index, spec) in self.resources.iter().enumerate() {
            let resource = self
                .build(spec, &defaults, base_dir)
                .with_context(|| format!("Invalid resource #{}", index + 1))?;
            plan.push(resource);
        }
        Ok(plan)
    }

    fn build(
        &self,
        spec: &ResourceSpec,
        defaults: &Defaults,
        base_dir: &Path,
    ) -> Result<BoxedResource> {
        let resolve = |path: &str| resolve_path(base_dir, path);

        let resource: BoxedResource = match spec {
            ResourceSpec::File {
                path,
                state,
                content,
                mode,
                uid,
                gid,
            } => {
                let mut file =
                    FileModule::new(resolve(path), *state, defaults).with_owner(*uid, *gid);
                if let Some(content) = content {
                    file = file.with_content(content.as_bytes());
                }
                if let Some(mode) = *mode {
                    file = file.with_mode(mode);
                }
                Box::new(file)
            }
            ResourceSpec::Copy {
                source,
                target,
                mode,
                uid,
                gid,
            } => {
                let mut copy =
                    CopyModule::new(resolve(source), resolve(target)).with_owner(*uid, *gid);
                if let Some(mode) = *mode {
                    copy = copy.with_mode(mode);
                }
                Box::new(copy)
            }
            ResourceSpec::Template {
                path,
                template,
                template_file,
                context,
                mode,
                uid,
                gid,
            } => {
                let text = match (template, template_file) {
                    (Some(text), None) => text.clone(),
                    (None, Some(file)) => {
                        let file = resolve(file);
                        fs::read_to_string(&file).with_context(|| {
                            format!("Failed to read template: {}", file.display())
                        })?
                    }
                    _ => anyhow::bail!(
                        "template {path} needs exactly one of 'template' or 'template_file'"
                    ),
                };
                let mut module =
                    TemplateModule::new(resolve(path), text, context.clone(), defaults)
                        .with_owner(*uid, *gid);
                if let Some(mode) = *mode {
                    module = module.with_mode(mode);
                }
                Box::new(module)
            }
            ResourceSpec::Package { name, state } => Box::new(PackageModule::apt(name, *state)),
            ResourceSpec::AptKey { id, state, server } => {
                let mut key = KeyModule::apt_key(id, *state);
                if let Some(server) = server.as_ref().or(self.apt.keyserver.as_ref()) {
                    key = key.with_server(server);
                }
                Box::new(key)
            }
            ResourceSpec::AptRepository { name, line, state } => {
                let mut repo = RepositoryModule::apt(name, line, *state);
                if let Some(root) = &self.apt.root {
                    repo = repo.with_root(paths::expand(root));
                }
                Box::new(repo)
            }
        };
        Ok(resource)
    }
}

fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
    let expanded = paths::expand(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base_dir.join(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::Resource;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
[defaults]
file_mode = 0o640
dir_mode = 0o750

[apt]
root = "/tmp/apt-root"
keyserver = "hkps://keys.openpgp.org"

[[resource]]
type = "file"
path = "/etc/motd"
content = "managed by steward\n"

[[resource]]
type = "file"
path = "/srv/data"
state = "directory"

[[resource]]
type = "copy"
source = "files/issue"
target = "/etc/issue.net"
mode = 0o644

[[resource]]
type = "template"
path = "/etc/hostname"
template = "{{ host }}\n"
context = { host = "sorbot" }

[[resource]]
type = "package"
name = "jq"

[[resource]]
type = "apt_key"
id = "D742B261"

[[resource]]
type = "apt_repository"
name = "scm-manager"
line = "deb http://maven.scm-manager.org/nexus/content/repositories/releases ./"
state = "present"
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::parse(MANIFEST).unwrap();

        assert_eq!(manifest.defaults.file_mode, 0o640);
        assert_eq!(manifest.defaults.dir_mode, 0o750);
        assert_eq!(manifest.apt.root.as_deref(), Some("/tmp/apt-root"));
        assert_eq!(manifest.resources.len(), 7);

        match &manifest.resources[1] {
            ResourceSpec::File { state, content, .. } => {
                assert_eq!(*state, FileState::Directory);
                assert!(content.is_none());
            }
            other => panic!("unexpected resource: {other:?}"),
        }
        match &manifest.resources[2] {
            ResourceSpec::Copy { mode, .. } => assert_eq!(*mode, Some(0o644)),
            other => panic!("unexpected resource: {other:?}"),
        }
        match &manifest.resources[4] {
            ResourceSpec::Package { state, .. } => assert_eq!(*state, State::Present),
            other => panic!("unexpected resource: {other:?}"),
        }
    }

    #[test]
    fn test_plan_keeps_manifest_order() {
        let manifest = Manifest::parse(MANIFEST).unwrap();
        let plan = manifest.plan(Path::new("/srv/site")).unwrap();

        let types: Vec<_> = plan.resources.iter().map(|r| r.resource_type()).collect();
        assert_eq!(
            types,
            vec![
                "file",
                "file",
                "copy",
                "template",
                "package",
                "apt_key",
                "apt_repository"
            ]
        );
        assert!(plan.resources[2].description().contains("/srv/site/files/issue"));
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = Manifest::parse("").unwrap();
        assert!(manifest.resources.is_empty());
        assert_eq!(manifest.defaults, Defaults::default());
        assert!(manifest.plan(Path::new(".")).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = Manifest::parse("[[resource]]\ntype = \"service\"\nname = \"ssh\"\n").unwrap_err();
        assert!(err.to_string().contains("service"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(Manifest::parse("[[resource]]\ntype = \"package\"\nname = \"jq\"\nversion = \"1\"\n").is_err());
    }

    #[test]
    fn test_template_needs_one_source() {
        let manifest = Manifest::parse(
            "[[resource]]\ntype = \"template\"\npath = \"/etc/x\"\n",
        )
        .unwrap();
        let err = manifest.plan(Path::new(".")).unwrap_err();
        assert!(format!("{err:#}").contains("template_file"));
    }

    #[test]
    fn test_template_file_is_read_relative_to_manifest() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("motd.tmpl"), "Hello My Name is {{ Name }}").unwrap();
        let target = dir.path().join("motd");

        let manifest = Manifest::parse(&format!(
            "[[resource]]\ntype = \"template\"\npath = \"{}\"\ntemplate_file = \"motd.tmpl\"\ncontext = {{ Name = \"sorbot\" }}\n",
            target.display()
        ))
        .unwrap();
        let plan = manifest.plan(dir.path()).unwrap();

        assert!(plan.resources[0].run().unwrap());
        assert_eq!(fs::read_to_string(&target).unwrap(), "Hello My Name is sorbot");
    }

    #[test]
    fn test_load_reports_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        let err = Manifest::load(&missing).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            resolve_path(Path::new("/srv/site"), "files/issue"),
            PathBuf::from("/srv/site/files/issue")
        );
        assert_eq!(
            resolve_path(Path::new("/srv/site"), "/etc/issue"),
            PathBuf::from("/etc/issue")
        );
    }
}
