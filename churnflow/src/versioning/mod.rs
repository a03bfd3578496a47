//! Conditional data versioning against a content-addressed store.
//!
//! [`DataVersioner`] wraps the external DVC and git tools: it probes whether
//! a set of output files changed and, only then, registers them with DVC,
//! stages the pointer files in git, optionally commits, and pushes the DVC
//! objects to the remote. Every failure inside the helper is reported as a
//! [`VersioningOutcome`] and never propagates — data versioning is auxiliary
//! to pipeline correctness.

mod command;

pub use command::{CommandRunner, CommandStatus, SystemCommandRunner};

use crate::config::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a single [`DataVersioner::version_files`] call.
///
/// Attached to stage results so callers can observe what happened without
/// any outcome being fatal to the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersioningOutcome {
    /// The status probe reported no change; nothing was invoked.
    Unchanged,
    /// The files were added, staged, and pushed.
    Versioned {
        /// Whether a git commit was created (a commit message was supplied).
        committed: bool,
    },
    /// A command failed; the remaining steps were skipped.
    Failed {
        /// Human-readable description of the failing step.
        reason: String,
    },
}

impl VersioningOutcome {
    /// Returns true if versioning failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for VersioningOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchanged => write!(f, "unchanged"),
            Self::Versioned { committed: true } => write!(f, "versioned (committed)"),
            Self::Versioned { committed: false } => write!(f, "versioned"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// Versions pipeline output files in DVC, but only if they changed.
#[derive(Debug, Clone)]
pub struct DataVersioner {
    dvc_executable: PathBuf,
    git_executable: PathBuf,
    workdir: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl DataVersioner {
    /// Creates a new versioner.
    #[must_use]
    pub fn new(
        dvc_executable: impl Into<PathBuf>,
        git_executable: impl Into<PathBuf>,
        workdir: impl Into<PathBuf>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            dvc_executable: dvc_executable.into(),
            git_executable: git_executable.into(),
            workdir: workdir.into(),
            runner,
        }
    }

    /// Creates a versioner from pipeline configuration.
    #[must_use]
    pub fn from_config(config: &PipelineConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self::new(
            &config.dvc_executable,
            &config.git_executable,
            &config.pipeline_dir,
            runner,
        )
    }

    /// Versions `files` into the content-addressed store if any of them
    /// changed, committing with `message` when one is supplied.
    ///
    /// Never fails: every error is folded into the returned outcome.
    pub async fn version_files(
        &self,
        files: &[PathBuf],
        message: Option<&str>,
    ) -> VersioningOutcome {
        if files.is_empty() {
            return VersioningOutcome::Unchanged;
        }

        let paths: Vec<String> = files
            .iter()
            .map(|f| f.to_string_lossy().into_owned())
            .collect();

        // `dvc status --unchanged <paths>` exits zero only when none of the
        // listed paths changed. The exit code is the whole contract here;
        // the textual output is ignored.
        let mut status_args = vec!["status".to_string(), "--unchanged".to_string()];
        status_args.extend(paths.iter().cloned());
        match self
            .runner
            .run_quiet(&self.dvc_executable, &status_args, &self.workdir)
            .await
        {
            Ok(status) if status.success => {
                debug!(files = ?paths, "no changes detected, skipping dvc add/push");
                return VersioningOutcome::Unchanged;
            }
            Ok(_) => {}
            Err(e) => {
                let reason = format!(
                    "failed to launch '{} status': {e}",
                    self.dvc_executable.display()
                );
                warn!(files = ?paths, reason = %reason, "versioning skipped");
                return VersioningOutcome::Failed { reason };
            }
        }

        info!(files = ?paths, "changes detected, adding to dvc");
        match self.add_stage_push(&paths, message).await {
            Ok(committed) => VersioningOutcome::Versioned { committed },
            Err(reason) => {
                warn!(files = ?paths, reason = %reason, "versioning failed");
                VersioningOutcome::Failed { reason }
            }
        }
    }

    /// Runs the mutating sequence: dvc add, git add of the pointer files,
    /// optional git commit, dvc push. The first failure short-circuits the
    /// rest.
    async fn add_stage_push(
        &self,
        paths: &[String],
        message: Option<&str>,
    ) -> Result<bool, String> {
        let mut add_args = vec!["add".to_string()];
        add_args.extend(paths.iter().cloned());
        self.checked(&self.dvc_executable, &add_args).await?;

        let mut git_add_args = vec!["add".to_string()];
        git_add_args.extend(paths.iter().map(|p| format!("{p}.dvc")));
        self.checked(&self.git_executable, &git_add_args).await?;

        let committed = if let Some(message) = message {
            let commit_args = vec![
                "commit".to_string(),
                "-m".to_string(),
                message.to_string(),
            ];
            self.checked(&self.git_executable, &commit_args).await?;
            true
        } else {
            false
        };

        self.checked(&self.dvc_executable, &["push".to_string()])
            .await?;
        Ok(committed)
    }

    async fn checked(&self, program: &Path, args: &[String]) -> Result<(), String> {
        match self.runner.run(program, args, &self.workdir).await {
            Ok(status) if status.success => Ok(()),
            Ok(status) => Err(format!(
                "'{} {}' exited with status {}",
                program.display(),
                args.join(" "),
                status
                    .code
                    .map_or_else(|| "unknown".to_string(), |c| c.to_string()),
            )),
            Err(e) => Err(format!("failed to launch '{}': {e}", program.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordedCommand, RecordingCommandRunner};
    use pretty_assertions::assert_eq;

    fn versioner(runner: Arc<RecordingCommandRunner>) -> DataVersioner {
        DataVersioner::new("dvc", "git", ".", runner)
    }

    fn files(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[tokio::test]
    async fn test_unchanged_performs_no_mutating_calls() {
        let runner = Arc::new(RecordingCommandRunner::new());
        let outcome = versioner(runner.clone())
            .version_files(&files(&["data/raw/telco_churn.csv"]), Some("msg"))
            .await;

        assert_eq!(outcome, VersioningOutcome::Unchanged);
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "dvc");
        assert_eq!(calls[0].args[..2], ["status".to_string(), "--unchanged".to_string()]);
        assert!(calls[0].quiet);
    }

    #[tokio::test]
    async fn test_changed_runs_add_stage_commit_push_in_order() {
        let runner = Arc::new(RecordingCommandRunner::new());
        runner.fail_command("dvc status");
        let outcome = versioner(runner.clone())
            .version_files(
                &files(&["data/raw/a.csv", "data/raw/b.csv"]),
                Some("Version raw ingested data"),
            )
            .await;

        assert_eq!(outcome, VersioningOutcome::Versioned { committed: true });
        let calls = runner.calls();
        let expected = vec![
            RecordedCommand {
                program: "dvc".to_string(),
                args: vec![
                    "status".to_string(),
                    "--unchanged".to_string(),
                    "data/raw/a.csv".to_string(),
                    "data/raw/b.csv".to_string(),
                ],
                quiet: true,
            },
            RecordedCommand {
                program: "dvc".to_string(),
                args: vec![
                    "add".to_string(),
                    "data/raw/a.csv".to_string(),
                    "data/raw/b.csv".to_string(),
                ],
                quiet: false,
            },
            RecordedCommand {
                program: "git".to_string(),
                args: vec![
                    "add".to_string(),
                    "data/raw/a.csv.dvc".to_string(),
                    "data/raw/b.csv.dvc".to_string(),
                ],
                quiet: false,
            },
            RecordedCommand {
                program: "git".to_string(),
                args: vec![
                    "commit".to_string(),
                    "-m".to_string(),
                    "Version raw ingested data".to_string(),
                ],
                quiet: false,
            },
            RecordedCommand {
                program: "dvc".to_string(),
                args: vec!["push".to_string()],
                quiet: false,
            },
        ];
        assert_eq!(calls, expected);
    }

    #[tokio::test]
    async fn test_changed_without_message_skips_commit() {
        let runner = Arc::new(RecordingCommandRunner::new());
        runner.fail_command("dvc status");
        let outcome = versioner(runner.clone())
            .version_files(&files(&["models/model.pkl"]), None)
            .await;

        assert_eq!(outcome, VersioningOutcome::Versioned { committed: false });
        let subcommands: Vec<String> = runner
            .calls()
            .iter()
            .map(|c| format!("{} {}", c.program, c.args[0]))
            .collect();
        assert_eq!(
            subcommands,
            vec!["dvc status", "dvc add", "git add", "dvc push"]
        );
    }

    #[tokio::test]
    async fn test_failure_short_circuits_remaining_steps() {
        let runner = Arc::new(RecordingCommandRunner::new());
        runner.fail_command("dvc status");
        runner.fail_command("git add");
        let outcome = versioner(runner.clone())
            .version_files(&files(&["features.json"]), Some("msg"))
            .await;

        assert!(outcome.is_failed());
        let subcommands: Vec<String> = runner
            .calls()
            .iter()
            .map(|c| format!("{} {}", c.program, c.args[0]))
            .collect();
        // No commit, no push after the git add failure.
        assert_eq!(subcommands, vec!["dvc status", "dvc add", "git add"]);
    }

    #[tokio::test]
    async fn test_status_launch_error_is_reported_not_raised() {
        let runner = Arc::new(RecordingCommandRunner::new());
        runner.error_command("dvc status");
        let outcome = versioner(runner.clone())
            .version_files(&files(&["features.json"]), None)
            .await;

        match outcome {
            VersioningOutcome::Failed { reason } => {
                assert!(reason.contains("status"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_add_exit_code_in_failure_reason() {
        let runner = Arc::new(RecordingCommandRunner::new());
        runner.fail_command("dvc status");
        runner.fail_command("dvc add");
        let outcome = versioner(runner.clone())
            .version_files(&files(&["features.json"]), None)
            .await;

        match outcome {
            VersioningOutcome::Failed { reason } => {
                assert!(reason.contains("dvc"));
                assert!(reason.contains('1'));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_file_set_is_a_no_op() {
        let runner = Arc::new(RecordingCommandRunner::new());
        let outcome = versioner(runner.clone()).version_files(&[], Some("msg")).await;
        assert_eq!(outcome, VersioningOutcome::Unchanged);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(VersioningOutcome::Unchanged.to_string(), "unchanged");
        assert_eq!(
            VersioningOutcome::Versioned { committed: true }.to_string(),
            "versioned (committed)"
        );
        assert_eq!(
            VersioningOutcome::Failed {
                reason: "boom".to_string()
            }
            .to_string(),
            "failed: boom"
        );
    }
}
