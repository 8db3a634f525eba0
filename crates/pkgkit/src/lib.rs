//! Idempotent system resources behind pluggable backends.
//!
//! - [`PackageModule`] installs or removes a package through a [`PackageSystem`]
//! - [`KeyModule`] trusts or distrusts a signing key through a [`KeySystem`]
//! - [`RepositoryModule`] registers an apt source line in its own list file
//!
//! The apt backends ([`AptBackend`], [`AptKeyBackend`]) shell out to
//! `dpkg`, `apt-get` and `apt-key`. Alternate package managers or key
//! stores plug in by implementing the traits; the convergence rules stay
//! in the modules.
//!
//! # Example
//!
//! ```rust,no_run
//! use declarative::Resource;
//! use pkgkit::{PackageModule, State};
//!
//! let jq = PackageModule::apt("jq", State::Present);
//! let changed = jq.run()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod error;
pub mod keys;
pub mod package;
pub mod repository;
pub mod runner;
pub mod types;

pub use error::{Error, Result};
pub use keys::{AptKeyBackend, DEFAULT_KEYSERVER, KeyModule, KeySystem, contains_key};
pub use package::{AptBackend, PackageModule, PackageSystem};
pub use repository::RepositoryModule;
pub use types::{PackageInfo, State};
