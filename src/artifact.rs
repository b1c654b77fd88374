//! Reproducible run artifacts and timeline hashing.
//!
//! Artifacts are serialized to disk so a recorded run can be replayed and
//! checked bit-for-bit later. The schema is versioned for forward-compatible
//! evolution.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ConfigError;
use crate::runner::RunReport;
use crate::scenario::Scenario;

/// Stable 64-bit hash of a run report.
///
/// Covers every record plus the reported total, so two reports hash equal
/// only when they match bit-for-bit.
pub fn timeline_hash(report: &RunReport) -> u64 {
    let mut hasher = Sha256::new();
    for record in report.timeline.records() {
        hasher.update(format!("{record:?}").as_bytes());
    }
    hasher.update(format!("{:?}", report.total_elapsed).as_bytes());
    let digest = hasher.finalize();
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(out)
}

/// Self-contained reproduction artifact for a recorded run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReproArtifact {
    pub schema_version: u32,
    pub scenario: Scenario,
    pub expected_timeline_hash: u64,
}

impl ReproArtifact {
    /// Run the scenario and capture its expected hash.
    pub fn capture(scenario: Scenario) -> Result<Self, ConfigError> {
        let report = scenario.run()?;
        Ok(Self {
            schema_version: scenario.schema_version,
            expected_timeline_hash: timeline_hash(&report),
            scenario,
        })
    }

    /// Re-run the scenario and check the recorded hash still matches.
    pub fn replay(&self) -> Result<bool, ConfigError> {
        let report = self.scenario.run()?;
        Ok(timeline_hash(&report) == self.expected_timeline_hash)
    }
}

/// Assert that a scenario produces identical reports across runs.
pub fn assert_deterministic(scenario: &Scenario) {
    let first = scenario.run();
    let second = scenario.run();
    assert_eq!(first, second, "non-deterministic report");
}
