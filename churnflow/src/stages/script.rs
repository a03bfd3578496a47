//! Stage that runs an external script as a subprocess.

use super::{Stage, StageContext};
use crate::core::StageOutput;
use crate::versioning::CommandRunner;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Runs `interpreter script [args...]` in the pipeline directory, blocking
/// until the process exits. Stdio is inherited so the script's own output
/// reaches the operator unchanged.
///
/// A non-zero exit status or a spawn failure is a stage failure, which the
/// driver treats as fatal for the whole run.
#[derive(Debug)]
pub struct ScriptStage {
    name: String,
    interpreter: PathBuf,
    script: PathBuf,
    args: Vec<String>,
    runner: Arc<dyn CommandRunner>,
}

impl ScriptStage {
    /// Creates a new script stage.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        interpreter: impl Into<PathBuf>,
        script: impl Into<PathBuf>,
        args: Vec<String>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            name: name.into(),
            interpreter: interpreter.into(),
            script: script.into(),
            args,
            runner,
        }
    }

    /// The script path, relative to the pipeline directory.
    #[must_use]
    pub fn script(&self) -> &PathBuf {
        &self.script
    }
}

#[async_trait]
impl Stage for ScriptStage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, ctx: &StageContext) -> StageOutput {
        let mut args = vec![self.script.to_string_lossy().into_owned()];
        args.extend(self.args.iter().cloned());

        info!(
            stage = %self.name,
            script = %self.script.display(),
            "running stage script"
        );
        match self
            .runner
            .run(&self.interpreter, &args, ctx.pipeline_dir())
            .await
        {
            Ok(status) if status.success => StageOutput::ok_empty(),
            Ok(status) => StageOutput::fail(format!(
                "script '{}' exited with status {}",
                self.script.display(),
                status
                    .code
                    .map_or_else(|| "unknown".to_string(), |c| c.to_string()),
            )),
            Err(e) => StageOutput::fail(format!(
                "failed to launch '{}': {e}",
                self.interpreter.display()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingCommandRunner;
    use crate::versioning::SystemCommandRunner;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_script_args_follow_script_path() {
        let runner = Arc::new(RecordingCommandRunner::new());
        let stage = ScriptStage::new(
            "train",
            "python3",
            "scripts/model_training.py",
            vec!["--db-path".to_string(), "data/processed/customer_features.db".to_string()],
            runner.clone(),
        );
        let ctx = StageContext::new(Uuid::new_v4(), ".");

        let output = stage.execute(&ctx).await;
        assert!(output.is_success());

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "python3");
        assert_eq!(
            calls[0].args,
            vec![
                "scripts/model_training.py".to_string(),
                "--db-path".to_string(),
                "data/processed/customer_features.db".to_string(),
            ]
        );
        assert!(!calls[0].quiet);
    }

    #[tokio::test]
    async fn test_nonzero_exit_fails_the_stage() {
        let runner = Arc::new(RecordingCommandRunner::new());
        runner.fail_command("python3 scripts/validate.py");
        let stage = ScriptStage::new(
            "validate",
            "python3",
            "scripts/validate.py",
            Vec::new(),
            runner,
        );
        let ctx = StageContext::new(Uuid::new_v4(), ".");

        let output = stage.execute(&ctx).await;
        assert!(!output.is_success());
        assert!(output.error.unwrap().contains("scripts/validate.py"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_real_script_success_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let ok_script = dir.path().join("ok.sh");
        let bad_script = dir.path().join("bad.sh");
        std::fs::write(&ok_script, "exit 0\n").unwrap();
        std::fs::write(&bad_script, "exit 7\n").unwrap();
        let ctx = StageContext::new(Uuid::new_v4(), dir.path());
        let runner = Arc::new(SystemCommandRunner::new());

        let ok_stage = ScriptStage::new("ok", "/bin/sh", "ok.sh", Vec::new(), runner.clone());
        assert!(ok_stage.execute(&ctx).await.is_success());

        let bad_stage = ScriptStage::new("bad", "/bin/sh", "bad.sh", Vec::new(), runner);
        let output = bad_stage.execute(&ctx).await;
        assert!(!output.is_success());
        assert!(output.error.unwrap().contains('7'));
    }
}
