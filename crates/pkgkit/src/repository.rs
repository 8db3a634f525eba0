//! Apt repository resource - registers a source line in its own list file

use anyhow::Result as AnyResult;
use declarative::Resource;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::State;

/// Default root holding `sources.list` and `sources.list.d`
pub const DEFAULT_ROOT: &str = "/etc/apt";

const SOURCES_LIST: &str = "sources.list";
const SOURCES_DIR: &str = "sources.list.d";

/// Ensures a repository line is configured for apt
///
/// Only `Present` can be converged. The line counts as present when any
/// line of `sources.list` or of a `sources.list.d/*.list` file equals it
/// after trimming. Registration writes `sources.list.d/<name>.list`.
#[derive(Debug, Clone)]
pub struct RepositoryModule {
    pub name: String,
    pub line: String,
    pub state: State,
    pub root: PathBuf,
}

impl RepositoryModule {
    pub fn new(name: impl Into<String>, line: impl Into<String>, state: State) -> Self {
        Self {
            name: name.into(),
            line: line.into(),
            state,
            root: PathBuf::from(DEFAULT_ROOT),
        }
    }

    /// Repository registered below `/etc/apt`
    pub fn apt(name: impl Into<String>, line: impl Into<String>, state: State) -> Self {
        Self::new(name, line, state)
    }

    pub fn with_root(mut self, root: impl AsRef<Path>) -> Self {
        self.root = root.as_ref().to_path_buf();
        self
    }

    /// The list file registration writes
    pub fn list_file(&self) -> PathBuf {
        self.root.join(SOURCES_DIR).join(format!("{}.list", self.name))
    }

    pub fn converge(&self) -> Result<bool> {
        self.validate()?;

        if self.state == State::Absent {
            return Err(Error::NotImplemented {
                operation: format!("removing apt repository {}", self.name),
            });
        }

        if self.is_present()? {
            log::debug!("repository {} is already present", self.name);
            return Ok(false);
        }

        self.register()?;
        Ok(true)
    }

    /// The name must be a single file name and the line must not be blank
    fn validate(&self) -> Result<()> {
        let reason = if self.line.trim().is_empty() {
            "source line is blank"
        } else if self.name.is_empty() || self.name == "." || self.name == ".." {
            "name is not a file name"
        } else if self.name.contains('/') {
            "name contains '/'"
        } else {
            return Ok(());
        };
        Err(Error::InvalidRepository {
            name: self.name.clone(),
            reason: reason.to_string(),
        })
    }

    /// Search `sources.list`, then every `*.list` file in `sources.list.d`
    pub fn is_present(&self) -> Result<bool> {
        let wanted = self.line.trim();

        if contains_line(&self.root.join(SOURCES_LIST), wanted)? {
            return Ok(true);
        }

        for list in list_files(&self.root.join(SOURCES_DIR))? {
            if contains_line(&list, wanted)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn register(&self) -> Result<()> {
        let dir = self.root.join(SOURCES_DIR);
        fs::DirBuilder::new()
            .recursive(true)
            .mode(0o755)
            .create(&dir)
            .map_err(|source| Error::Io {
                path: dir.clone(),
                source,
            })?;

        let path = self.list_file();
        let content = format!(
            "# {} repository created by steward\n{}\n",
            self.name,
            self.line.trim()
        );

        let write_error = |source| Error::Io {
            path: path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o644)
            .open(&path)
            .map_err(write_error)?;
        file.write_all(content.as_bytes()).map_err(write_error)?;

        log::info!("registered repository {} in {}", self.name, path.display());
        Ok(())
    }
}

/// Sorted `*.list` regular files in a directory; a missing directory has none
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let io_error = |source| Error::Io {
        path: dir.to_path_buf(),
        source,
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => return Err(io_error(source)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(io_error)?.path();
        if path.extension().is_some_and(|ext| ext == "list") && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Whether any trimmed line of the file equals `wanted`; a missing file has none
fn contains_line(path: &Path, wanted: &str) -> Result<bool> {
    let io_error = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(source) => return Err(io_error(source)),
    };

    for line in BufReader::new(file).split(b'\n') {
        let line = line.map_err(io_error)?;
        if String::from_utf8_lossy(&line).trim() == wanted {
            return Ok(true);
        }
    }
    Ok(false)
}

impl Resource for RepositoryModule {
    fn id(&self) -> String {
        self.name.clone()
    }

    fn description(&self) -> String {
        format!("Ensure apt repository {} is {}", self.name, self.state)
    }

    fn resource_type(&self) -> &'static str {
        "apt_repository"
    }

    fn run(&self) -> AnyResult<bool> {
        Ok(self.converge()?)
    }
}
