//! Deterministic task-interleaving timeline simulator.
//!
//! ## Scope
//! This crate computes execution timelines for sets of tasks made of blocking
//! and yielding delay segments, under three execution models: fully
//! synchronous, cooperative (one logical worker, voluntary yield), and
//! concurrent (one logical worker per task, with join/daemon semantics).
//!
//! ## Key invariants
//! - Runs are pure logical-clock arithmetic: no real waiting, no OS threads,
//!   no wall-clock reads. Identical inputs produce bit-identical reports.
//! - Per task, segments execute strictly in order; segment `i + 1` never
//!   starts before segment `i` ends.
//! - Under the cooperative model at most one task occupies a blocking segment
//!   at any instant; yielding segments may overlap freely.
//! - Configuration errors are detected before any simulation step; a failed
//!   run never produces a partial timeline.
//!
//! ## Run flow
//! `TaskSpec set -> validate -> model runner -> Timeline + total elapsed`
//!
//! ## Notable entry points
//! - `simulate` / `RunReport`: run a task set under a model.
//! - `Scenario`: serializable task set + model + options, used by the CLI and
//!   repro artifacts.
//! - `Timeline` / `TimelineRecord`: recorded events with query helpers.
//! - `ReproArtifact` / `timeline_hash`: capture and replay recorded runs.

mod artifact;
mod clock;
mod error;
mod runner;
mod scenario;
mod timeline;

pub use artifact::{assert_deterministic, timeline_hash, ReproArtifact};
pub use clock::SimClock;
pub use error::ConfigError;
pub use runner::{simulate, RunReport};
pub use scenario::{
    ExecutionModel, RunOptions, Scenario, Segment, SegmentKind, TaskSpec, SCHEMA_VERSION,
};
pub use timeline::{Timeline, TimelineEvent, TimelineRecord};
