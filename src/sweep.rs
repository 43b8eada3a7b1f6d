//! The sweep driver.

use crate::config::SweepConfig;
use crate::error::{Result, SweepError};
use crate::extract::extract_metric;
use crate::matrix::{Cell, Matrix};
use crate::report::{ConsoleReporter, JsonReporter, Reporter};
use crate::result::{RunResult, SweepSummary};
use crate::runner::{Executor, ProcessRunner};
use crate::sink::ResultLog;
use std::collections::BTreeMap;
use std::time::Instant;

/// Walks the matrix one cell at a time and appends each result to its
/// benchmark's log.
///
/// # Example
///
/// ```rust,no_run
/// use alloc_sweep::{Sweep, SweepConfig};
///
/// let config = SweepConfig::new()
///     .benchmarks(["larson"])
///     .allocators(["je"])
///     .threads([1, 2, 4]);
///
/// let summary = Sweep::new(config)?.run()?;
/// assert_eq!(summary.total_rows(), 3);
/// # Ok::<(), alloc_sweep::SweepError>(())
/// ```
pub struct Sweep<E = ProcessRunner> {
    config: SweepConfig,
    matrix: Matrix,
    executor: E,
    reporters: Vec<Box<dyn Reporter>>,
}

impl Sweep<ProcessRunner> {
    /// Sweep real benchmark binaries from `config.bin_dir`.
    pub fn new(config: SweepConfig) -> Result<Self> {
        let executor = ProcessRunner::new(config.bin_dir.clone());
        Self::with_executor(config, executor)
    }
}

impl<E: Executor> Sweep<E> {
    pub fn with_executor(config: SweepConfig, executor: E) -> Result<Self> {
        let matrix = config.matrix()?;

        let mut reporters: Vec<Box<dyn Reporter>> = Vec::new();
        if config.verbose {
            reporters.push(Box::new(ConsoleReporter::new()));
        }
        if let Some(path) = &config.summary_path {
            reporters.push(Box::new(JsonReporter::new(path.clone())));
        }

        Ok(Self {
            config,
            matrix,
            executor,
            reporters,
        })
    }

    /// Replace reporters with a custom set.
    pub fn reporters(&mut self, reporters: Vec<Box<dyn Reporter>>) -> &mut Self {
        self.reporters = reporters;
        self
    }

    /// Add an additional reporter.
    pub fn add_reporter(&mut self, reporter: Box<dyn Reporter>) -> &mut Self {
        self.reporters.push(reporter);
        self
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Run every cell.
    ///
    /// The first error aborts the sweep: rows already written stay, and no
    /// further cell or benchmark is attempted.
    pub fn run(mut self) -> Result<SweepSummary> {
        let start = Instant::now();
        let started_at = unix_millis();

        for r in &self.reporters {
            r.sweep_start(&self.matrix, &self.config);
        }

        let mut rows = BTreeMap::new();

        for &benchmark in &self.matrix.benchmarks {
            let mut log = ResultLog::open(&self.config.output_dir, benchmark.name)?;
            for r in &self.reporters {
                r.benchmark_start(benchmark.name, log.path());
            }

            for cell in self.matrix.cells_for(benchmark) {
                for r in &self.reporters {
                    r.cell_start(&cell);
                }

                let result = measure(&mut self.executor, &cell)?;
                log.append(&result)?;

                for r in &self.reporters {
                    r.cell_end(&result);
                }
            }

            rows.insert(benchmark.name.to_string(), log.rows());
            for r in &self.reporters {
                r.benchmark_end(benchmark.name, log.rows());
            }
        }

        let summary = SweepSummary {
            benchmarks: self
                .matrix
                .benchmarks
                .iter()
                .map(|b| b.name.to_string())
                .collect(),
            allocators: self.matrix.allocators.clone(),
            threads: self.matrix.threads.clone(),
            trials: self.matrix.trials,
            rows,
            total_duration: start.elapsed(),
            started_at,
            git_sha: self.config.git_sha.clone(),
        };

        for r in &self.reporters {
            r.sweep_end(&summary);
        }

        Ok(summary)
    }
}

/// Measure one cell: build its command line, run it, and pull out the metric.
///
/// Output without the benchmark's marker is rejected as
/// [`SweepError::MetricNotFound`].
pub fn measure<E: Executor + ?Sized>(executor: &mut E, cell: &Cell<'_>) -> Result<RunResult> {
    let benchmark = cell.benchmark;
    let invocation = benchmark.invocation(cell.allocator, cell.threads);

    let start = Instant::now();
    let output = executor.execute(&invocation)?;
    let elapsed = start.elapsed();

    let metric =
        extract_metric(&output, &benchmark.rule)?.ok_or_else(|| SweepError::MetricNotFound {
            benchmark: benchmark.name.to_string(),
            allocator: cell.allocator.to_string(),
            threads: cell.threads,
            marker: benchmark.rule.marker.to_string(),
        })?;

    Ok(RunResult {
        benchmark: benchmark.name.to_string(),
        allocator: cell.allocator.to_string(),
        threads: cell.threads,
        trial: cell.trial,
        metric,
        elapsed,
    })
}

fn unix_millis() -> String {
    let now = std::time::SystemTime::now();
    let duration = now
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", duration.as_millis())
}
