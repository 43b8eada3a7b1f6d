//! Pluggable reporters for sweep progress.

use crate::config::SweepConfig;
use crate::matrix::{Cell, Matrix};
use crate::result::{RunResult, SweepSummary};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Trait for sweep progress reporters.
pub trait Reporter {
    /// Called once before the first result log is opened.
    fn sweep_start(&self, _matrix: &Matrix, _config: &SweepConfig) {}

    /// Called after a benchmark's result log is opened.
    fn benchmark_start(&self, _benchmark: &str, _log: &Path) {}

    /// Called right before a cell's process is launched.
    fn cell_start(&self, _cell: &Cell<'_>) {}

    /// Called after a cell's row has been written.
    fn cell_end(&self, _result: &RunResult) {}

    /// Called after every cell of a benchmark has been attempted.
    fn benchmark_end(&self, _benchmark: &str, _rows: usize) {}

    /// Called when the whole sweep completes.
    fn sweep_end(&self, _summary: &SweepSummary) {}
}

/// Console reporter that prints progress to stderr.
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    fn format_duration(d: std::time::Duration) -> String {
        if d.as_secs() > 0 {
            format!("{:.2}s", d.as_secs_f64())
        } else if d.as_millis() > 0 {
            format!("{:.2}ms", d.as_secs_f64() * 1000.0)
        } else {
            format!("{:.2}µs", d.as_secs_f64() * 1_000_000.0)
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn sweep_start(&self, matrix: &Matrix, config: &SweepConfig) {
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        eprintln!("  Allocator sweep: {} cell(s)", matrix.len());
        eprintln!("  Allocators: {}", matrix.allocators.join(", "));
        eprintln!(
            "  Threads: {}, Trials: {}",
            matrix
                .threads
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(","),
            matrix.trials
        );
        eprintln!("  Binaries: {}", config.bin_dir.display());
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    fn benchmark_start(&self, benchmark: &str, log: &Path) {
        eprintln!("  {} -> {}", benchmark, log.display());
    }

    fn cell_start(&self, cell: &Cell<'_>) {
        eprint!("    {:<10} {:>3} thread(s) ... ", cell.allocator, cell.threads);
        std::io::stderr().flush().ok();
    }

    fn cell_end(&self, result: &RunResult) {
        eprintln!(
            "{} ({})",
            result.metric,
            Self::format_duration(result.elapsed)
        );
    }

    fn sweep_end(&self, summary: &SweepSummary) {
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        eprintln!(
            "  Recorded {} row(s) in {:.2}s",
            summary.total_rows(),
            summary.total_duration.as_secs_f64()
        );
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }
}

/// JSON reporter that writes the run summary to a file.
pub struct JsonReporter {
    path: PathBuf,
}

impl JsonReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Reporter for JsonReporter {
    fn sweep_end(&self, summary: &SweepSummary) {
        if let Err(e) = write_json_summary(&self.path, summary) {
            eprintln!("Warning: failed to write sweep summary: {}", e);
        }
    }
}

fn write_json_summary(path: &Path, summary: &SweepSummary) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(summary).map_err(std::io::Error::other)?;
    std::fs::write(path, json)?;

    Ok(())
}

/// Combines multiple reporters.
pub struct MultiReporter {
    reporters: Vec<Box<dyn Reporter>>,
}

impl MultiReporter {
    pub fn new(reporters: Vec<Box<dyn Reporter>>) -> Self {
        Self { reporters }
    }
}

impl Reporter for MultiReporter {
    fn sweep_start(&self, matrix: &Matrix, config: &SweepConfig) {
        for r in &self.reporters {
            r.sweep_start(matrix, config);
        }
    }

    fn benchmark_start(&self, benchmark: &str, log: &Path) {
        for r in &self.reporters {
            r.benchmark_start(benchmark, log);
        }
    }

    fn cell_start(&self, cell: &Cell<'_>) {
        for r in &self.reporters {
            r.cell_start(cell);
        }
    }

    fn cell_end(&self, result: &RunResult) {
        for r in &self.reporters {
            r.cell_end(result);
        }
    }

    fn benchmark_end(&self, benchmark: &str, rows: usize) {
        for r in &self.reporters {
            r.benchmark_end(benchmark, rows);
        }
    }

    fn sweep_end(&self, summary: &SweepSummary) {
        for r in &self.reporters {
            r.sweep_end(summary);
        }
    }
}
