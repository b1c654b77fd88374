//! Property-based tests for timeline runs.
//!
//! Run with: `cargo test --test property`

mod runs;
