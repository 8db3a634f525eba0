//! Template resource - renders text and converges it like a file

use anyhow::Result as AnyResult;
use declarative::Resource;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::file::ensure_file;
use crate::probe::probe;
use crate::types::{Defaults, Permissions};

/// Values available to a template
pub type TemplateContext = BTreeMap<String, String>;

/// Turns template text and a context into file content
pub trait Renderer: fmt::Debug + Send + Sync {
    fn render(&self, template: &str, context: &TemplateContext) -> Result<String>;
}

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_.-]*)\s*\}\}").expect("valid placeholder pattern")
});

/// Substitutes `{{ key }}` placeholders from the context
///
/// Every placeholder must name a key in the context. Text outside
/// placeholders is passed through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

impl Renderer for PlaceholderRenderer {
    fn render(&self, template: &str, context: &TemplateContext) -> Result<String> {
        if let Some(missing) = PLACEHOLDER
            .captures_iter(template)
            .map(|caps| caps[1].to_string())
            .find(|key| !context.contains_key(key))
        {
            return Err(Error::Render {
                message: format!("no value for placeholder '{missing}'"),
            });
        }

        let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
            context.get(&caps[1]).cloned().unwrap_or_default()
        });
        Ok(rendered.into_owned())
    }
}

/// Ensures that a file holds a rendered template
#[derive(Debug)]
pub struct TemplateModule {
    pub target: PathBuf,
    pub template: String,
    pub context: TemplateContext,
    pub permissions: Permissions,
    renderer: Box<dyn Renderer>,
}

impl TemplateModule {
    pub fn new(
        target: impl AsRef<Path>,
        template: impl Into<String>,
        context: TemplateContext,
        defaults: &Defaults,
    ) -> Self {
        Self {
            target: target.as_ref().to_path_buf(),
            template: template.into(),
            context,
            permissions: defaults.file_permissions(),
            renderer: Box::new(PlaceholderRenderer),
        }
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.permissions.mode = Some(mode);
        self
    }

    pub fn with_owner(mut self, uid: Option<u32>, gid: Option<u32>) -> Self {
        self.permissions = self.permissions.overridden_by(&Permissions {
            mode: None,
            uid,
            gid,
        });
        self
    }

    /// Render, then converge the target like a regular file
    pub fn converge(&self) -> Result<bool> {
        // Render before touching the target so a bad template changes nothing
        let content = self.renderer.render(&self.template, &self.context)?;
        let target = probe(&self.target)?;
        ensure_file(target, content.as_bytes(), &self.permissions)
    }
}

impl Resource for TemplateModule {
    fn id(&self) -> String {
        self.target.display().to_string()
    }

    fn description(&self) -> String {
        format!("Render template to {}", self.target.display())
    }

    fn resource_type(&self) -> &'static str {
        "template"
    }

    fn run(&self) -> AnyResult<bool> {
        Ok(self.converge()?)
    }
}
