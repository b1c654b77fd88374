//! Timeline runner: validation and the three execution models.
//!
//! The runner interprets a task set over a `SimClock` and records every
//! scheduling event on a `Timeline`. All three models are pure logical-clock
//! arithmetic: no real waiting, no OS threads, and identical inputs produce
//! bit-identical reports.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::clock::SimClock;
use crate::error::ConfigError;
use crate::scenario::{ExecutionModel, RunOptions, SegmentKind, TaskSpec};
use crate::timeline::{Timeline, TimelineEvent, TimelineRecord};

/// Result of a run: the recorded timeline plus total elapsed time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub timeline: Timeline,
    pub total_elapsed: f64,
}

/// Run `tasks` under `model` and report the resulting timeline.
///
/// Fails fast with `ConfigError`; a failed call never produces a partial
/// timeline. The runner holds no state between calls.
pub fn simulate(
    tasks: &[TaskSpec],
    model: ExecutionModel,
    options: &RunOptions,
) -> Result<RunReport, ConfigError> {
    let marks = validate(tasks, options)?;
    let report = match model {
        ExecutionModel::Sync => run_sync(tasks),
        ExecutionModel::Cooperative => run_cooperative(tasks),
        ExecutionModel::Concurrent => run_concurrent(tasks, &marks),
    };
    Ok(report)
}

/// Per-task join/daemon marks resolved from `RunOptions`.
struct TaskMarks {
    joined: Vec<bool>,
    daemon: Vec<bool>,
}

fn validate(tasks: &[TaskSpec], options: &RunOptions) -> Result<TaskMarks, ConfigError> {
    if tasks.is_empty() {
        return Err(ConfigError::EmptyTaskSet);
    }

    for (idx, task) in tasks.iter().enumerate() {
        if tasks[..idx].iter().any(|other| other.name == task.name) {
            return Err(ConfigError::DuplicateTask {
                name: task.name.clone(),
            });
        }
        for (seg_idx, seg) in task.segments.iter().enumerate() {
            if !seg.duration.is_finite() || seg.duration < 0.0 {
                return Err(ConfigError::InvalidDuration {
                    task: task.name.clone(),
                    segment: seg_idx,
                    duration: seg.duration,
                });
            }
        }
    }

    let index_of = |name: &str| tasks.iter().position(|task| task.name == name);

    let mut marks = TaskMarks {
        joined: vec![false; tasks.len()],
        daemon: vec![false; tasks.len()],
    };
    for name in &options.join {
        match index_of(name) {
            Some(idx) => marks.joined[idx] = true,
            None => {
                return Err(ConfigError::UnknownJoinTask { name: name.clone() });
            }
        }
    }
    for name in &options.daemon {
        match index_of(name) {
            Some(idx) => {
                if marks.joined[idx] {
                    return Err(ConfigError::JoinedDaemon { name: name.clone() });
                }
                marks.daemon[idx] = true;
            }
            None => {
                return Err(ConfigError::UnknownDaemonTask { name: name.clone() });
            }
        }
    }

    Ok(marks)
}

/// Strictly sequential execution: one clock, tasks in list order, every
/// segment treated as blocking.
fn run_sync(tasks: &[TaskSpec]) -> RunReport {
    let mut clock = SimClock::new();
    let mut timeline = Timeline::new();

    for task in tasks {
        timeline.push(clock.now(), &task.name, TimelineEvent::Start);
        for seg in &task.segments {
            timeline.push(clock.now(), &task.name, TimelineEvent::BlockStart);
            clock.advance_by(seg.duration);
            timeline.push(clock.now(), &task.name, TimelineEvent::BlockEnd);
        }
        timeline.push(clock.now(), &task.name, TimelineEvent::Finish);
    }

    RunReport {
        total_elapsed: clock.now(),
        timeline,
    }
}

/// Pending wake-up for a task inside a yielding segment.
struct Sleeper {
    wake: f64,
    task: usize,
}

/// Single logical worker with voluntary yields.
///
/// One segment per dispatch. Blocking segments advance the shared clock and
/// keep every other task off the worker for the whole interval. Yielding
/// segments register a wake-up and surrender the worker. A task that has just
/// run a blocking segment re-enters the run queue only after the next wake-up
/// delivery: pending wake-ups are serviced before a task that monopolized the
/// worker may claim it again.
fn run_cooperative(tasks: &[TaskSpec]) -> RunReport {
    let mut clock = SimClock::new();
    let mut timeline = Timeline::new();

    let mut cursor = vec![0usize; tasks.len()];
    let mut started = vec![false; tasks.len()];

    let mut ready: VecDeque<usize> = (0..tasks.len()).collect();
    let mut penalized: VecDeque<usize> = VecDeque::new();
    let mut sleepers: Vec<Sleeper> = Vec::new();

    loop {
        while let Some(idx) = ready.pop_front() {
            let task = &tasks[idx];
            if !started[idx] {
                started[idx] = true;
                timeline.push(clock.now(), &task.name, TimelineEvent::Start);
            }

            let Some(seg) = task.segments.get(cursor[idx]) else {
                timeline.push(clock.now(), &task.name, TimelineEvent::Finish);
                continue;
            };
            cursor[idx] += 1;

            match seg.kind {
                SegmentKind::Blocking => {
                    timeline.push(clock.now(), &task.name, TimelineEvent::BlockStart);
                    clock.advance_by(seg.duration);
                    timeline.push(clock.now(), &task.name, TimelineEvent::BlockEnd);
                    if cursor[idx] < task.segments.len() {
                        penalized.push_back(idx);
                    } else {
                        timeline.push(clock.now(), &task.name, TimelineEvent::Finish);
                    }
                }
                SegmentKind::Yielding => {
                    timeline.push(clock.now(), &task.name, TimelineEvent::YieldStart);
                    sleepers.push(Sleeper {
                        wake: clock.now() + seg.duration,
                        task: idx,
                    });
                }
            }
        }

        if sleepers.is_empty() && penalized.is_empty() {
            break;
        }

        if !sleepers.is_empty() {
            let next = sleepers
                .iter()
                .map(|sleeper| sleeper.wake)
                .fold(f64::INFINITY, f64::min);
            if next > clock.now() {
                clock.advance_to(next);
            }
            deliver_due(
                &mut sleepers,
                tasks,
                &cursor,
                clock.now(),
                &mut ready,
                &mut timeline,
            );
        }

        // Penalized tasks rejoin behind freshly woken ones.
        while let Some(idx) = penalized.pop_front() {
            ready.push_back(idx);
        }
    }

    RunReport {
        total_elapsed: clock.now(),
        timeline,
    }
}

/// Deliver every wake-up due at `now`, in (wake, task index) order.
///
/// The yield's end is observed when the worker acknowledges it, which may be
/// later than the wake time if a blocking segment held the worker meanwhile.
fn deliver_due(
    sleepers: &mut Vec<Sleeper>,
    tasks: &[TaskSpec],
    cursor: &[usize],
    now: f64,
    ready: &mut VecDeque<usize>,
    timeline: &mut Timeline,
) {
    let mut due = Vec::new();
    let mut rest = Vec::new();
    for sleeper in sleepers.drain(..) {
        if sleeper.wake <= now {
            due.push(sleeper);
        } else {
            rest.push(sleeper);
        }
    }
    *sleepers = rest;

    due.sort_by(|a, b| a.wake.total_cmp(&b.wake).then(a.task.cmp(&b.task)));
    for sleeper in due {
        let task = &tasks[sleeper.task];
        timeline.push(now, &task.name, TimelineEvent::YieldEnd);
        if cursor[sleeper.task] < task.segments.len() {
            ready.push_back(sleeper.task);
        } else {
            timeline.push(now, &task.name, TimelineEvent::Finish);
        }
    }
}

/// One independent logical worker per task.
///
/// Each task advances a private clock through its own segments; other tasks'
/// blocking segments are invisible to it. The main timeline ends when the
/// last joined task completes, or immediately when nothing is joined.
/// Non-joined daemon tasks are truncated at the main end; other non-joined
/// tasks run to completion in the record but never extend the reported total.
fn run_concurrent(tasks: &[TaskSpec], marks: &TaskMarks) -> RunReport {
    let completion: Vec<f64> = tasks
        .iter()
        .map(|task| {
            let mut local = SimClock::new();
            for seg in &task.segments {
                local.advance_by(seg.duration);
            }
            local.now()
        })
        .collect();

    let main_end = completion
        .iter()
        .zip(&marks.joined)
        .filter(|(_, joined)| **joined)
        .map(|(at, _)| *at)
        .fold(0.0f64, f64::max);

    let mut all: Vec<(usize, usize, TimelineRecord)> = Vec::new();
    for (idx, task) in tasks.iter().enumerate() {
        let mut records = Vec::new();
        let mut local = SimClock::new();

        records.push(TimelineRecord {
            at: local.now(),
            task: task.name.clone(),
            event: TimelineEvent::Start,
        });
        for seg in &task.segments {
            let (start_event, end_event) = match seg.kind {
                SegmentKind::Blocking => (TimelineEvent::BlockStart, TimelineEvent::BlockEnd),
                SegmentKind::Yielding => (TimelineEvent::YieldStart, TimelineEvent::YieldEnd),
            };
            records.push(TimelineRecord {
                at: local.now(),
                task: task.name.clone(),
                event: start_event,
            });
            local.advance_by(seg.duration);
            records.push(TimelineRecord {
                at: local.now(),
                task: task.name.clone(),
                event: end_event,
            });
        }
        records.push(TimelineRecord {
            at: local.now(),
            task: task.name.clone(),
            event: TimelineEvent::Finish,
        });

        if marks.daemon[idx] && local.now() > main_end {
            truncate_at(&mut records, main_end);
            records.push(TimelineRecord {
                at: main_end,
                task: task.name.clone(),
                event: TimelineEvent::Aborted,
            });
        }

        for (seq, record) in records.into_iter().enumerate() {
            all.push((idx, seq, record));
        }
    }

    all.sort_by(|a, b| {
        a.2.at
            .total_cmp(&b.2.at)
            .then(a.0.cmp(&b.0))
            .then(a.1.cmp(&b.1))
    });

    let mut timeline = Timeline::new();
    for (_, _, record) in all {
        timeline.push_record(record);
    }

    RunReport {
        timeline,
        total_elapsed: main_end,
    }
}

/// Drop records past the cutoff.
///
/// Records execute in order; the first one that cannot run (a segment start
/// at or past the cutoff, or anything strictly past it) ends the task, so
/// everything from that point on is dropped.
fn truncate_at(records: &mut Vec<TimelineRecord>, cutoff: f64) {
    let keep = records
        .iter()
        .position(|rec| {
            rec.at > cutoff
                || (rec.at == cutoff
                    && matches!(
                        rec.event,
                        TimelineEvent::BlockStart | TimelineEvent::YieldStart
                    ))
        })
        .unwrap_or(records.len());
    records.truncate(keep);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Segment;

    #[test]
    fn cooperative_completes_a_simple_task() {
        let tasks = vec![TaskSpec::new("main", vec![Segment::yielding(1.0)])];

        let report =
            simulate(&tasks, ExecutionModel::Cooperative, &RunOptions::default()).unwrap();
        assert_eq!(report.total_elapsed, 1.0);
        assert_eq!(report.timeline.finish_time("main"), Some(1.0));
    }

    #[test]
    fn sync_runs_tasks_back_to_back() {
        let tasks = vec![
            TaskSpec::new("a", vec![Segment::blocking(2.0)]),
            TaskSpec::new("b", vec![Segment::yielding(3.0)]),
        ];

        let report = simulate(&tasks, ExecutionModel::Sync, &RunOptions::default()).unwrap();
        assert_eq!(report.timeline.finish_time("a"), Some(2.0));
        assert_eq!(report.timeline.finish_time("b"), Some(5.0));
        assert_eq!(report.total_elapsed, 5.0);
    }

    #[test]
    fn validation_runs_before_any_step() {
        let tasks = vec![TaskSpec::new("a", vec![Segment::blocking(-1.0)])];

        let err = simulate(&tasks, ExecutionModel::Sync, &RunOptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDuration { segment: 0, .. }));
    }
}
