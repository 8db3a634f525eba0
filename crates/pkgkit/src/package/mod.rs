//! Package resource with a pluggable package system.
//!
//! The [`PackageSystem`] trait is the whole surface a package manager has
//! to offer; [`PackageModule`] holds the convergence rule.

pub mod apt;

use anyhow::Result as AnyResult;
use declarative::Resource;
use std::fmt;

use crate::error::Result;
use crate::types::{PackageInfo, State};

pub use apt::AptBackend;

/// Operations a package manager must expose.
pub trait PackageSystem: fmt::Debug + Send + Sync {
    /// Query the package. Backends that cannot query map failure to "not installed".
    fn info(&self, name: &str) -> PackageInfo;

    /// Install a package.
    fn install(&self, name: &str) -> Result<()>;

    /// Uninstall a package.
    fn uninstall(&self, name: &str) -> Result<()>;
}

/// Ensures a package is installed or not installed
#[derive(Debug)]
pub struct PackageModule {
    pub name: String,
    pub state: State,
    system: Box<dyn PackageSystem>,
}

impl PackageModule {
    pub fn new(name: impl Into<String>, state: State, system: impl PackageSystem + 'static) -> Self {
        Self {
            name: name.into(),
            state,
            system: Box::new(system),
        }
    }

    /// Package managed through apt and dpkg
    pub fn apt(name: impl Into<String>, state: State) -> Self {
        Self::new(name, state, AptBackend)
    }

    /// Query once, then install or uninstall if needed
    pub fn converge(&self) -> Result<bool> {
        let info = self.system.info(&self.name);

        match (self.state, info.installed) {
            (State::Present, false) => {
                self.system.install(&self.name)?;
                log::info!("installed package {}", self.name);
                Ok(true)
            }
            (State::Absent, true) => {
                self.system.uninstall(&self.name)?;
                log::info!("uninstalled package {}", self.name);
                Ok(true)
            }
            _ => {
                log::debug!("package {} is already {}", self.name, self.state);
                Ok(false)
            }
        }
    }
}

impl Resource for PackageModule {
    fn id(&self) -> String {
        self.name.clone()
    }

    fn description(&self) -> String {
        format!("Ensure package {} is {}", self.name, self.state)
    }

    fn resource_type(&self) -> &'static str {
        "package"
    }

    fn run(&self) -> AnyResult<bool> {
        Ok(self.converge()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default)]
    struct MockSystem {
        installed: bool,
        fail: bool,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockSystem {
        fn with(installed: bool) -> (Self, Arc<Mutex<Vec<String>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            let system = Self {
                installed,
                fail: false,
                calls: Arc::clone(&calls),
            };
            (system, calls)
        }

        fn record(&self, call: String) -> Result<()> {
            self.calls.lock().unwrap().push(call.clone());
            if self.fail {
                return Err(Error::CommandFailed {
                    command: call,
                    stderr: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    impl PackageSystem for MockSystem {
        fn info(&self, _name: &str) -> PackageInfo {
            PackageInfo {
                installed: self.installed,
            }
        }

        fn install(&self, name: &str) -> Result<()> {
            self.record(format!("install {name}"))
        }

        fn uninstall(&self, name: &str) -> Result<()> {
            self.record(format!("uninstall {name}"))
        }
    }

    #[test]
    fn test_install_missing_package() {
        let (system, calls) = MockSystem::with(false);
        let module = PackageModule::new("vim", State::Present, system);

        assert!(module.converge().unwrap());
        assert_eq!(*calls.lock().unwrap(), vec!["install vim"]);
    }

    #[test]
    fn test_installed_package_is_no_change() {
        let (system, calls) = MockSystem::with(true);
        let module = PackageModule::new("vim", State::Present, system);

        assert!(!module.converge().unwrap());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_uninstall_installed_package() {
        let (system, calls) = MockSystem::with(true);
        let module = PackageModule::new("vim", State::Absent, system);

        assert!(module.converge().unwrap());
        assert_eq!(*calls.lock().unwrap(), vec!["uninstall vim"]);
    }

    #[test]
    fn test_absent_package_is_no_change() {
        let (system, calls) = MockSystem::with(false);
        let module = PackageModule::new("vim", State::Absent, system);

        assert!(!module.converge().unwrap());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_install_failure_is_reported() {
        let (mut system, _calls) = MockSystem::with(false);
        system.fail = true;
        let module = PackageModule::new("vim", State::Present, system);

        let err = module.run().unwrap_err();
        assert!(err.downcast_ref::<Error>().is_some());
    }

    #[test]
    fn test_resource_contract() {
        let module = PackageModule::apt("jq", State::Present);
        assert_eq!(module.id(), "jq");
        assert_eq!(module.resource_type(), "package");
        assert_eq!(module.description(), "Ensure package jq is present");
    }
}
