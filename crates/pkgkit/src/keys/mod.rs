//! Trusted signing keys with a pluggable key system

pub mod apt_key;

use anyhow::Result as AnyResult;
use declarative::Resource;
use regex::Regex;
use std::fmt;
use std::io::BufRead;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::types::State;

pub use apt_key::AptKeyBackend;

/// Key server used when none is configured
pub const DEFAULT_KEYSERVER: &str = "hkp://keyserver.ubuntu.com:80";

/// Operations a key store must expose.
pub trait KeySystem: fmt::Debug + Send + Sync {
    /// Fetch a key from a key server and trust it.
    fn add(&self, server: &str, id: &str) -> Result<()>;

    /// Stop trusting a key.
    fn remove(&self, id: &str) -> Result<()>;

    /// Whether the key is currently trusted.
    fn is_present(&self, id: &str) -> Result<bool>;
}

/// `pub   4096R/C0B21F32 2012-05-11`
static KEY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^pub\s+[0-9A-Z]+/([0-9A-Z]+) [0-9]{4}-[0-9]{2}-[0-9]{2}")
        .expect("valid key line pattern")
});

/// Scan a key listing for a public key entry with exactly this id.
///
/// Stops at the first match. A read failure before the end of the
/// listing is an error.
pub fn contains_key(listing: impl BufRead, id: &str) -> Result<bool> {
    for line in listing.split(b'\n') {
        let line = line.map_err(|source| Error::Listing {
            key: id.to_string(),
            source,
        })?;
        let line = String::from_utf8_lossy(&line);

        if KEY_LINE
            .captures(line.trim())
            .is_some_and(|caps| &caps[1] == id)
        {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Ensures a signing key is trusted or not trusted
#[derive(Debug)]
pub struct KeyModule {
    pub id: String,
    pub server: String,
    pub state: State,
    system: Box<dyn KeySystem>,
}

impl KeyModule {
    pub fn new(id: impl Into<String>, state: State, system: impl KeySystem + 'static) -> Self {
        Self {
            id: id.into(),
            server: DEFAULT_KEYSERVER.to_string(),
            state,
            system: Box::new(system),
        }
    }

    /// Key managed through apt-key
    pub fn apt_key(id: impl Into<String>, state: State) -> Self {
        Self::new(id, state, AptKeyBackend)
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    pub fn converge(&self) -> Result<bool> {
        let present = self.system.is_present(&self.id)?;

        match (self.state, present) {
            (State::Present, false) => {
                self.system.add(&self.server, &self.id)?;
                log::info!("added key {} from {}", self.id, self.server);
                Ok(true)
            }
            (State::Absent, true) => {
                self.system.remove(&self.id)?;
                log::info!("removed key {}", self.id);
                Ok(true)
            }
            _ => {
                log::debug!("key {} is already {}", self.id, self.state);
                Ok(false)
            }
        }
    }
}

impl Resource for KeyModule {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn description(&self) -> String {
        format!("Ensure key {} is {}", self.id, self.state)
    }

    fn resource_type(&self) -> &'static str {
        "apt_key"
    }

    fn run(&self) -> AnyResult<bool> {
        Ok(self.converge()?)
    }
}
