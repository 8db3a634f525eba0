//! Key backend using `apt-key`.

use std::io::Cursor;

use crate::error::Result;
use crate::keys::{KeySystem, contains_key};
use crate::runner::Invocation;

const APT_KEY: &str = "apt-key";

/// Backend that executes real `apt-key` commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct AptKeyBackend;

impl KeySystem for AptKeyBackend {
    fn add(&self, server: &str, id: &str) -> Result<()> {
        Invocation::new(APT_KEY, &["adv", "--recv-keys", "--keyserver", server, id])
            .run_checked()?;
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<()> {
        Invocation::new(APT_KEY, &["del", id]).run_checked()?;
        Ok(())
    }

    fn is_present(&self, id: &str) -> Result<bool> {
        let listing = Invocation::new(APT_KEY, &["list"]).run_checked()?;
        contains_key(Cursor::new(listing), id)
    }
}
