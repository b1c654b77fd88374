//! Scenario schema for timeline runs.
//!
//! The schema is designed to be serialized as part of repro artifacts and CLI
//! scenario files. It keeps tasks, segments, and run options explicit and
//! deterministic.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::runner::RunReport;

/// Current scenario schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// How a segment occupies its worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Occupies the shared worker; nothing else may run meanwhile.
    Blocking,
    /// Releases control; other ready tasks may run during the delay.
    Yielding,
}

/// A single delay segment within a task.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Logical time units; must be finite and non-negative.
    pub duration: f64,
}

impl Segment {
    pub fn blocking(duration: f64) -> Self {
        Self {
            kind: SegmentKind::Blocking,
            duration,
        }
    }

    pub fn yielding(duration: f64) -> Self {
        Self {
            kind: SegmentKind::Yielding,
            duration,
        }
    }
}

/// A named task with an ordered segment sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub name: String,
    pub segments: Vec<Segment>,
}

impl TaskSpec {
    pub fn new(name: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            name: name.into(),
            segments,
        }
    }
}

/// Execution model applied to a task set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionModel {
    /// Tasks run strictly one after another; every segment blocks.
    Sync,
    /// One logical worker; yielding segments release it, blocking ones do not.
    Cooperative,
    /// One logical worker per task, with join/daemon semantics.
    Concurrent,
}

impl fmt::Display for ExecutionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Sync => "sync",
            Self::Cooperative => "cooperative",
            Self::Concurrent => "concurrent",
        };
        f.write_str(label)
    }
}

/// Join/daemon options for a run.
///
/// Both lists have set semantics: duplicates are harmless, order is ignored.
/// Names are validated against the task set for every model, but only the
/// concurrent model consults them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Tasks whose completion extends the main timeline.
    #[serde(default)]
    pub join: Vec<String>,
    /// Tasks aborted when the main timeline ends.
    #[serde(default)]
    pub daemon: Vec<String>,
}

/// Top-level scenario schema: a task set plus model and options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Schema version for forward-compatible evolution.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub model: ExecutionModel,
    pub tasks: Vec<TaskSpec>,
    #[serde(default)]
    pub options: RunOptions,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl Scenario {
    pub fn new(model: ExecutionModel, tasks: Vec<TaskSpec>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            model,
            tasks,
            options: RunOptions::default(),
        }
    }

    /// Run the scenario and produce a report.
    pub fn run(&self) -> Result<RunReport, ConfigError> {
        crate::runner::simulate(&self.tasks, self.model, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_json_defaults_version_and_options() {
        let json = r#"{
            "model": "cooperative",
            "tasks": [
                { "name": "a", "segments": [ { "kind": "blocking", "duration": 1.0 } ] }
            ]
        }"#;

        let scenario: Scenario = serde_json::from_str(json).expect("parse scenario");
        assert_eq!(scenario.schema_version, SCHEMA_VERSION);
        assert_eq!(scenario.model, ExecutionModel::Cooperative);
        assert!(scenario.options.join.is_empty());
        assert!(scenario.options.daemon.is_empty());
        assert_eq!(scenario.tasks[0].segments[0].kind, SegmentKind::Blocking);
    }
}
