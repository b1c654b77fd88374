//! Timeline records produced by a run.
//!
//! Records are retained in execution order. Within one task, timestamps are
//! non-decreasing and segment spans never overlap.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Event markers recorded on the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEvent {
    /// Task received control for the first time.
    Start,
    BlockStart,
    BlockEnd,
    YieldStart,
    YieldEnd,
    /// Segment sequence exhausted.
    Finish,
    /// Task truncated when the main timeline ended.
    Aborted,
}

impl fmt::Display for TimelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Start => "start",
            Self::BlockStart => "block_start",
            Self::BlockEnd => "block_end",
            Self::YieldStart => "yield_start",
            Self::YieldEnd => "yield_end",
            Self::Finish => "finish",
            Self::Aborted => "aborted",
        };
        f.write_str(label)
    }
}

/// One `(timestamp, task, event)` record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineRecord {
    pub at: f64,
    pub task: String,
    pub event: TimelineEvent,
}

/// Ordered record sequence for one run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    records: Vec<TimelineRecord>,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, at: f64, task: &str, event: TimelineEvent) {
        self.records.push(TimelineRecord {
            at,
            task: task.to_string(),
            event,
        });
    }

    pub(crate) fn push_record(&mut self, record: TimelineRecord) {
        self.records.push(record);
    }

    /// All records in execution order.
    pub fn records(&self) -> &[TimelineRecord] {
        &self.records
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records belonging to one task, in order.
    pub fn events_for<'a>(&'a self, task: &'a str) -> impl Iterator<Item = &'a TimelineRecord> {
        self.records.iter().filter(move |rec| rec.task == task)
    }

    /// Finish timestamp for a task, if it finished.
    pub fn finish_time(&self, task: &str) -> Option<f64> {
        self.records.iter().find_map(|rec| {
            (rec.task == task && rec.event == TimelineEvent::Finish).then_some(rec.at)
        })
    }

    /// Abort timestamp for a task, if it was aborted.
    pub fn abort_time(&self, task: &str) -> Option<f64> {
        self.records.iter().find_map(|rec| {
            (rec.task == task && rec.event == TimelineEvent::Aborted).then_some(rec.at)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_and_abort_lookups() {
        let mut timeline = Timeline::new();
        timeline.push(0.0, "a", TimelineEvent::Start);
        timeline.push(2.0, "a", TimelineEvent::Finish);
        timeline.push(0.0, "b", TimelineEvent::Start);
        timeline.push(1.0, "b", TimelineEvent::Aborted);

        assert_eq!(timeline.finish_time("a"), Some(2.0));
        assert_eq!(timeline.finish_time("b"), None);
        assert_eq!(timeline.abort_time("b"), Some(1.0));
        assert_eq!(timeline.events_for("a").count(), 2);
        assert_eq!(timeline.len(), 4);
    }
}
