//! # alloc-sweep
//!
//! Runs allocator micro-benchmarks across a matrix of thread counts and
//! appends one CSV row per run to a log per benchmark kind.
//!
//! Every benchmark binary is built once per allocator and named
//! `{allocator}_{benchmark}_test`. For each cell of the matrix the harness
//! launches the matching binary, scrapes one number out of its stdout, and
//! appends `allocator,threads,metric` to `{benchmark}.csv`. Logs are opened
//! in append mode, so repeated sweeps accumulate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use alloc_sweep::{Sweep, SweepConfig};
//!
//! // Defaults: all four benchmarks, allocators cxlalloc/r/je,
//! // threads 1..=40, binaries and logs in the current directory.
//! let summary = Sweep::new(SweepConfig::from_env())?.run()?;
//! eprintln!("{} rows", summary.total_rows());
//! # Ok::<(), alloc_sweep::SweepError>(())
//! ```
//!
//! Any failing benchmark process or unparsable metric aborts the whole
//! sweep; there are no retries.

pub mod benches;
mod config;
mod error;
mod extract;
mod matrix;
mod report;
mod result;
mod runner;
mod sink;
mod sweep;

pub use benches::{BenchmarkSpec, Invocation, MetricRule};
pub use config::SweepConfig;
pub use error::{Result, SweepError};
pub use extract::extract_metric;
pub use matrix::{Cell, Matrix, DEFAULT_ALLOCATORS, DEFAULT_THREADS};
pub use report::{ConsoleReporter, JsonReporter, MultiReporter, Reporter};
pub use result::{Metric, RunResult, SweepSummary};
pub use runner::{run_process, Executor, ProcessRunner};
pub use sink::ResultLog;
pub use sweep::{measure, Sweep};
