//! External command invocation seam.
//!
//! Both the stage scripts and the version-control tools are opaque
//! collaborators reached through [`CommandRunner`], so tests can script
//! exit statuses without spawning processes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Exit information from an external command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandStatus {
    /// Whether the command exited with status zero.
    pub success: bool,
    /// The raw exit code, if the process exited normally.
    pub code: Option<i32>,
}

impl CommandStatus {
    /// A zero exit status.
    #[must_use]
    pub fn success() -> Self {
        Self {
            success: true,
            code: Some(0),
        }
    }

    /// A non-zero exit status.
    #[must_use]
    pub fn failure(code: Option<i32>) -> Self {
        Self {
            success: false,
            code,
        }
    }
}

/// Trait for running external commands.
#[async_trait]
pub trait CommandRunner: Send + Sync + Debug {
    /// Runs a command to completion with stdio inherited from the parent
    /// process.
    ///
    /// # Errors
    ///
    /// Returns an error if the process could not be spawned.
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        cwd: &Path,
    ) -> std::io::Result<CommandStatus>;

    /// Runs a command to completion with its output suppressed.
    ///
    /// Used for probes whose exit code is the only signal of interest.
    ///
    /// # Errors
    ///
    /// Returns an error if the process could not be spawned.
    async fn run_quiet(
        &self,
        program: &Path,
        args: &[String],
        cwd: &Path,
    ) -> std::io::Result<CommandStatus>;
}

/// [`CommandRunner`] backed by real subprocesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    /// Creates a new system command runner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        cwd: &Path,
    ) -> std::io::Result<CommandStatus> {
        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .status()
            .await?;
        Ok(CommandStatus {
            success: status.success(),
            code: status.code(),
        })
    }

    async fn run_quiet(
        &self,
        program: &Path,
        args: &[String],
        cwd: &Path,
    ) -> std::io::Result<CommandStatus> {
        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;
        Ok(CommandStatus {
            success: status.success(),
            code: status.code(),
        })
    }
}
