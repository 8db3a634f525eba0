//! External command execution shared by the backends

use crate::error::{Error, Result};
use std::process::{Command, Output, Stdio};

/// A command line to run, with extra environment
#[derive(Debug, Clone, Default)]
pub struct Invocation<'a> {
    pub program: &'a str,
    pub args: Vec<&'a str>,
    pub envs: Vec<(&'a str, &'a str)>,
}

impl<'a> Invocation<'a> {
    pub fn new(program: &'a str, args: &[&'a str]) -> Self {
        Self {
            program,
            args: args.to_vec(),
            envs: Vec::new(),
        }
    }

    pub fn env(mut self, key: &'a str, value: &'a str) -> Self {
        self.envs.push((key, value));
        self
    }

    /// The command line as it would be typed
    pub fn command_line(&self) -> String {
        std::iter::once(self.program)
            .chain(self.args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn output(&self) -> Result<Output> {
        log::debug!("running {}", self.command_line());
        Command::new(self.program)
            .args(&self.args)
            .envs(self.envs.iter().copied())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::Spawn {
                command: self.command_line(),
                source,
            })
    }

    /// Run to completion and return stdout; a non-zero exit is an error
    pub fn run_checked(&self) -> Result<String> {
        let output = self.output()?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: self.command_line(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Run to completion and report only whether it succeeded
    pub fn succeeds(&self) -> bool {
        match self.output() {
            Ok(output) => output.status.success(),
            Err(e) => {
                log::debug!("{e}");
                false
            }
        }
    }
}
