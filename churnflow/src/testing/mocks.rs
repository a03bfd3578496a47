//! Mock collaborators that record calls and return scripted results.

use crate::core::StageOutput;
use crate::errors::ChurnflowError;
use crate::registry::SchemaSource;
use crate::stages::{Stage, StageContext};
use crate::versioning::{CommandRunner, CommandStatus};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::Path;

/// A mock stage that records calls and returns a configurable output.
#[derive(Debug)]
pub struct MockStage {
    name: String,
    output: Mutex<StageOutput>,
    call_count: Mutex<usize>,
}

impl MockStage {
    /// Creates a new mock stage with a success output.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            output: Mutex::new(StageOutput::ok_empty()),
            call_count: Mutex::new(0),
        }
    }

    /// Sets the output to return.
    pub fn set_output(&self, output: StageOutput) {
        *self.output.lock() = output;
    }

    /// Returns the number of times the stage was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.call_count.lock()
    }
}

#[async_trait]
impl Stage for MockStage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, _ctx: &StageContext) -> StageOutput {
        *self.call_count.lock() += 1;
        self.output.lock().clone()
    }
}

/// A recorded invocation of an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    /// File name of the invoked program.
    pub program: String,
    /// Arguments, in order.
    pub args: Vec<String>,
    /// Whether the quiet entry point was used.
    pub quiet: bool,
}

/// A [`CommandRunner`] that records every invocation and returns scripted
/// exit statuses instead of spawning processes.
///
/// Commands are keyed by `"<program> <first-arg>"` (e.g. `"dvc status"`,
/// `"git add"`). Unkeyed commands succeed.
#[derive(Debug, Default)]
pub struct RecordingCommandRunner {
    calls: Mutex<Vec<RecordedCommand>>,
    failures: Mutex<HashSet<String>>,
    launch_errors: Mutex<HashSet<String>>,
}

impl RecordingCommandRunner {
    /// Creates a runner where every command succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the keyed command exit with status 1.
    pub fn fail_command(&self, key: impl Into<String>) {
        self.failures.lock().insert(key.into());
    }

    /// Makes the keyed command fail to spawn.
    pub fn error_command(&self, key: impl Into<String>) {
        self.launch_errors.lock().insert(key.into());
    }

    /// Returns every recorded invocation, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCommand> {
        self.calls.lock().clone()
    }

    fn key(program: &Path, args: &[String]) -> String {
        let name = program
            .file_name()
            .map_or_else(|| program.to_string_lossy(), |n| n.to_string_lossy());
        match args.first() {
            Some(first) => format!("{name} {first}"),
            None => name.into_owned(),
        }
    }

    fn respond(
        &self,
        program: &Path,
        args: &[String],
        quiet: bool,
    ) -> std::io::Result<CommandStatus> {
        self.calls.lock().push(RecordedCommand {
            program: program.to_string_lossy().into_owned(),
            args: args.to_vec(),
            quiet,
        });

        let key = Self::key(program, args);
        if self.launch_errors.lock().contains(&key) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no such program: {key}"),
            ));
        }
        if self.failures.lock().contains(&key) {
            return Ok(CommandStatus::failure(Some(1)));
        }
        Ok(CommandStatus::success())
    }
}

#[async_trait]
impl CommandRunner for RecordingCommandRunner {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        cwd: &Path,
    ) -> std::io::Result<CommandStatus> {
        let _ = cwd;
        self.respond(program, args, false)
    }

    async fn run_quiet(
        &self,
        program: &Path,
        args: &[String],
        cwd: &Path,
    ) -> std::io::Result<CommandStatus> {
        let _ = cwd;
        self.respond(program, args, true)
    }
}

/// A [`SchemaSource`] returning a fixed column list.
#[derive(Debug, Clone)]
pub struct StaticSchemaSource {
    columns: Vec<String>,
}

impl StaticSchemaSource {
    /// Creates a source that lists `columns` for any table.
    #[must_use]
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

impl SchemaSource for StaticSchemaSource {
    fn column_names(&self, _table: &str) -> Result<Vec<String>, ChurnflowError> {
        Ok(self.columns.clone())
    }
}
