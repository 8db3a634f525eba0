//! Core types shared by the system resource modules

use serde::{Deserialize, Serialize};
use std::fmt;

/// Desired state of a package, key or repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    #[default]
    Present,
    Absent,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Present => write!(f, "present"),
            State::Absent => write!(f, "absent"),
        }
    }
}

/// Everything a package backend has to report about a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackageInfo {
    pub installed: bool,
}
