//! runtime-log - Rolling per-file history of test-suite durations
//!
//! This library keeps a bounded, most-recent-first window of run durations for
//! every test file, persisted as a sorted tab-separated table, so that
//! test-splitting schedulers can rank files by historical cost.
//!
//! - [`aggregator`] sums top-level unit durations per file for one run
//! - [`history`] loads, merges (rotate, truncate, prune) and serializes the table
//! - [`logger`] wires both into the start / unit / dump lifecycle of a test run

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod history;
pub mod logger;
pub mod report;
pub mod runner;
