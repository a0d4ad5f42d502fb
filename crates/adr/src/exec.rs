//! Permission-gated wrappers around external tools

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use which::which;

use crate::error::AdrError;
use crate::gate::PermissionGate;

/// Version-control client
pub const VCS_PROGRAM: &str = "git";

/// Hosting-service client
pub const HOSTING_PROGRAM: &str = "gh";

/// Result of a gated command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The gate refused; nothing was spawned
    Denied,
    /// The process ran; exit code is `None` when killed by a signal
    Exited(Option<i32>),
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        matches!(self, Self::Exited(Some(0)))
    }
}

/// Runs one external program behind a permission key
pub trait Executor {
    /// Name of the wrapped program
    fn program(&self) -> &str;

    /// Run with `args` if the gate allows `key`
    fn run(&self, label: &str, key: &str, args: &[String]) -> Result<RunOutcome>;
}

/// An external binary invoked in the ADR root
pub struct ExternalTool<'a> {
    program: String,
    require_on_path: bool,
    working_dir: PathBuf,
    gate: &'a PermissionGate<'a>,
}

impl<'a> ExternalTool<'a> {
    pub fn new(
        program: impl Into<String>,
        require_on_path: bool,
        working_dir: &Path,
        gate: &'a PermissionGate<'a>,
    ) -> Self {
        Self {
            program: program.into(),
            require_on_path,
            working_dir: working_dir.to_path_buf(),
            gate,
        }
    }

    /// The version-control wrapper
    pub fn vcs(working_dir: &Path, gate: &'a PermissionGate<'a>) -> Self {
        Self::new(VCS_PROGRAM, false, working_dir, gate)
    }

    /// The hosting-service wrapper; fails fast when `gh` is not installed
    pub fn hosting(working_dir: &Path, gate: &'a PermissionGate<'a>) -> Self {
        Self::new(HOSTING_PROGRAM, true, working_dir, gate)
    }
}

impl Executor for ExternalTool<'_> {
    fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, label: &str, key: &str, args: &[String]) -> Result<RunOutcome> {
        if self.require_on_path && which(&self.program).is_err() {
            bail!(AdrError::MissingBinary(self.program.clone()));
        }

        if !self.gate.check(label, key)? {
            return Ok(RunOutcome::Denied);
        }

        tracing::debug!(program = %self.program, ?args, dir = %self.working_dir.display(), "spawning");
        let status = Command::new(&self.program)
            .args(args)
            .current_dir(&self.working_dir)
            .status()
            .with_context(|| format!("Failed to run {}", self.program))?;

        Ok(RunOutcome::Exited(status.code()))
    }
}
