//! Monotonic simulated clock for deterministic timeline runs.
//!
//! The clock only advances when the simulation explicitly moves time forward.
//! This keeps time-based logic deterministic and replayable.

/// Simulated clock over logical time units.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimClock {
    now: f64,
}

impl SimClock {
    /// Create a new clock at time 0.
    pub fn new() -> Self {
        Self { now: 0.0 }
    }

    /// Current time in logical units.
    #[inline(always)]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Advance to an absolute time.
    #[inline(always)]
    pub fn advance_to(&mut self, t: f64) {
        debug_assert!(t >= self.now);
        self.now = t;
    }

    /// Advance by a non-negative delta.
    #[inline(always)]
    pub fn advance_by(&mut self, dt: f64) {
        debug_assert!(dt >= 0.0);
        self.now += dt;
    }
}
