//! Timeline Simulator CLI
//!
//! Runs a task set under a chosen execution model and prints the resulting
//! timeline and total elapsed time.
//!
//! # Output Format
//!
//! Records are written to stdout as `t=<time> <task> <event>`, followed by a
//! final `total_elapsed=<time>` line. With `--json` the full run report is
//! written as a single JSON document instead.
//!
//! A stats line is written to stderr upon completion:
//! `tasks=N records=N total_elapsed=N model=<model>`
//!
//! # Exit Codes
//!
//! - `0`: Success
//! - `2`: Invalid arguments or configuration error

use std::env;
use std::fs;
use std::process;

use interleave_rs::{simulate, ExecutionModel, RunOptions, Scenario, Segment, TaskSpec};

fn print_usage(exe: &std::ffi::OsStr) {
    eprintln!(
        "usage: {} [OPTIONS]

OPTIONS:
    --model=<MODEL>         Execution model: sync, cooperative, concurrent
                            (default: cooperative)
    --task=<NAME=SEGS>      Add a task; SEGS is a comma-separated list of
                            kind:duration pairs, e.g. --task=a=block:3,yield:1
                            (repeatable)
    --join=<NAME>           Join the named task (concurrent only, repeatable)
    --daemon=<NAME>         Mark the named task as daemon (concurrent only,
                            repeatable)
    --scenario=<FILE>       Load a scenario JSON file instead of --task flags
    --json                  Emit the run report as JSON
    --help, -h              Show this help message",
        exe.to_string_lossy()
    );
}

fn parse_model(value: &str) -> Option<ExecutionModel> {
    match value {
        "sync" => Some(ExecutionModel::Sync),
        "cooperative" => Some(ExecutionModel::Cooperative),
        "concurrent" => Some(ExecutionModel::Concurrent),
        _ => None,
    }
}

/// Parse `kind:duration` pairs, e.g. `block:3,yield:1.5`.
fn parse_segments(value: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    if value.is_empty() {
        return Some(segments);
    }
    for part in value.split(',') {
        let (kind, duration) = part.split_once(':')?;
        let duration: f64 = duration.parse().ok()?;
        let segment = match kind {
            "block" => Segment::blocking(duration),
            "yield" => Segment::yielding(duration),
            _ => return None,
        };
        segments.push(segment);
    }
    Some(segments)
}

fn main() {
    let mut args = env::args_os();
    let exe = args.next().unwrap_or_else(|| "interleave-rs".into());

    let mut model = ExecutionModel::Cooperative;
    let mut tasks: Vec<TaskSpec> = Vec::new();
    let mut options = RunOptions::default();
    let mut scenario_path: Option<String> = None;
    let mut json = false;

    for arg in args {
        let Some(flag) = arg.to_str() else {
            eprintln!("invalid argument: {}", arg.to_string_lossy());
            process::exit(2);
        };
        if let Some(value) = flag.strip_prefix("--model=") {
            model = parse_model(value).unwrap_or_else(|| {
                eprintln!("invalid --model value: {}", value);
                process::exit(2);
            });
            continue;
        }
        if let Some(value) = flag.strip_prefix("--task=") {
            let Some((name, segs)) = value.split_once('=') else {
                eprintln!("invalid --task value: {}", value);
                process::exit(2);
            };
            let Some(segments) = parse_segments(segs) else {
                eprintln!("invalid --task segments: {}", segs);
                process::exit(2);
            };
            tasks.push(TaskSpec::new(name, segments));
            continue;
        }
        if let Some(value) = flag.strip_prefix("--join=") {
            options.join.push(value.to_string());
            continue;
        }
        if let Some(value) = flag.strip_prefix("--daemon=") {
            options.daemon.push(value.to_string());
            continue;
        }
        if let Some(value) = flag.strip_prefix("--scenario=") {
            scenario_path = Some(value.to_string());
            continue;
        }
        match flag {
            "--json" => json = true,
            "--help" | "-h" => {
                print_usage(&exe);
                process::exit(0);
            }
            _ => {
                eprintln!("unknown flag: {}", flag);
                print_usage(&exe);
                process::exit(2);
            }
        }
    }

    let scenario = match scenario_path {
        Some(path) => {
            if !tasks.is_empty() {
                eprintln!("--scenario cannot be combined with --task");
                process::exit(2);
            }
            let contents = fs::read_to_string(&path).unwrap_or_else(|err| {
                eprintln!("cannot read {}: {}", path, err);
                process::exit(2);
            });
            serde_json::from_str::<Scenario>(&contents).unwrap_or_else(|err| {
                eprintln!("cannot parse {}: {}", path, err);
                process::exit(2);
            })
        }
        None => {
            let mut scenario = Scenario::new(model, tasks);
            scenario.options = options;
            scenario
        }
    };

    let report = match simulate(&scenario.tasks, scenario.model, &scenario.options) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("configuration error: {}", err);
            process::exit(2);
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(err) => {
                eprintln!("cannot serialize report: {}", err);
                process::exit(1);
            }
        }
    } else {
        for record in report.timeline.records() {
            println!("t={} {} {}", record.at, record.task, record.event);
        }
        println!("total_elapsed={}", report.total_elapsed);
    }

    eprintln!(
        "tasks={} records={} total_elapsed={} model={}",
        scenario.tasks.len(),
        report.timeline.len(),
        report.total_elapsed,
        scenario.model
    );
}
