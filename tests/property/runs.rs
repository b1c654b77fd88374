//! Property tests over randomly generated task sets.
//!
//! Durations are drawn from small integers so every sum and comparison is
//! exact in `f64`.

use proptest::prelude::*;

use interleave_rs::{simulate, ExecutionModel, RunOptions, Segment, TaskSpec, TimelineEvent};

const MODELS: [ExecutionModel; 3] = [
    ExecutionModel::Sync,
    ExecutionModel::Cooperative,
    ExecutionModel::Concurrent,
];

fn segment_strategy() -> impl Strategy<Value = Segment> {
    (any::<bool>(), 0u16..=50).prop_map(|(blocking, ticks)| {
        let duration = f64::from(ticks);
        if blocking {
            Segment::blocking(duration)
        } else {
            Segment::yielding(duration)
        }
    })
}

fn task_set_strategy() -> impl Strategy<Value = Vec<TaskSpec>> {
    prop::collection::vec(prop::collection::vec(segment_strategy(), 0..6), 1..6).prop_map(
        |segment_lists| {
            segment_lists
                .into_iter()
                .enumerate()
                .map(|(idx, segments)| TaskSpec::new(format!("task{idx}"), segments))
                .collect()
        },
    )
}

fn total_duration(tasks: &[TaskSpec]) -> f64 {
    tasks
        .iter()
        .flat_map(|task| task.segments.iter().map(|seg| seg.duration))
        .sum()
}

fn slowest_task(tasks: &[TaskSpec]) -> f64 {
    tasks
        .iter()
        .map(|task| task.segments.iter().map(|seg| seg.duration).sum())
        .fold(0.0f64, f64::max)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Sync elapsed time equals the sum of every segment duration.
    #[test]
    fn sync_elapsed_is_the_total_duration(tasks in task_set_strategy()) {
        let report = simulate(&tasks, ExecutionModel::Sync, &RunOptions::default()).unwrap();
        prop_assert_eq!(report.total_elapsed, total_duration(&tasks));
    }

    /// Cooperative yielding never increases total time over sequential runs.
    #[test]
    fn cooperative_never_exceeds_sync(tasks in task_set_strategy()) {
        let sync = simulate(&tasks, ExecutionModel::Sync, &RunOptions::default()).unwrap();
        let coop = simulate(&tasks, ExecutionModel::Cooperative, &RunOptions::default()).unwrap();
        prop_assert!(coop.total_elapsed <= sync.total_elapsed);
    }

    /// Identical inputs produce identical reports under every model.
    #[test]
    fn repeated_runs_are_identical(tasks in task_set_strategy()) {
        for model in MODELS {
            let first = simulate(&tasks, model, &RunOptions::default()).unwrap();
            let second = simulate(&tasks, model, &RunOptions::default()).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    /// Without joins the concurrent model reports an immediate return.
    #[test]
    fn concurrent_without_joins_is_immediate(tasks in task_set_strategy()) {
        let report = simulate(&tasks, ExecutionModel::Concurrent, &RunOptions::default()).unwrap();
        prop_assert_eq!(report.total_elapsed, 0.0);
    }

    /// Joining every task waits exactly for the slowest one.
    #[test]
    fn concurrent_join_all_waits_for_the_slowest(tasks in task_set_strategy()) {
        let options = RunOptions {
            join: tasks.iter().map(|task| task.name.clone()).collect(),
            daemon: Vec::new(),
        };
        let report = simulate(&tasks, ExecutionModel::Concurrent, &options).unwrap();
        prop_assert_eq!(report.total_elapsed, slowest_task(&tasks));
    }

    /// Each task records one start, one finish, and time never runs backwards.
    #[test]
    fn per_task_records_are_well_formed(tasks in task_set_strategy()) {
        for model in MODELS {
            let report = simulate(&tasks, model, &RunOptions::default()).unwrap();
            for task in &tasks {
                let recs: Vec<_> = report.timeline.events_for(&task.name).collect();
                prop_assert!(!recs.is_empty());
                prop_assert_eq!(recs[0].event, TimelineEvent::Start);
                prop_assert_eq!(recs[recs.len() - 1].event, TimelineEvent::Finish);
                prop_assert_eq!(
                    recs.iter().filter(|rec| rec.event == TimelineEvent::Start).count(),
                    1
                );
                prop_assert_eq!(
                    recs.iter().filter(|rec| rec.event == TimelineEvent::Finish).count(),
                    1
                );
                for pair in recs.windows(2) {
                    prop_assert!(pair[0].at <= pair[1].at);
                }
            }
        }
    }
}
