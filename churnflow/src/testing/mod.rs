//! Test support: recording doubles for stages, commands, and schemas.

mod mocks;

pub use mocks::{MockStage, RecordedCommand, RecordingCommandRunner, StaticSchemaSource};
