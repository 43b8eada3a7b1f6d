//! Configuration for a sweep.

use crate::benches;
use crate::error::Result;
use crate::matrix::{
    canonical_allocators, canonical_threads, Matrix, DEFAULT_ALLOCATORS, DEFAULT_THREADS,
};
use std::path::PathBuf;

/// Configuration for a sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Directory holding the `{allocator}_{benchmark}_test` binaries.
    pub bin_dir: PathBuf,
    /// Directory the `{benchmark}.csv` logs are appended in.
    pub output_dir: PathBuf,
    /// Benchmark kinds to run, by name.
    pub benchmarks: Vec<String>,
    /// Allocator identifiers, in sweep order.
    pub allocators: Vec<String>,
    /// Thread counts, in sweep order.
    pub threads: Vec<u32>,
    /// Trials per cell.
    pub trials: usize,
    /// Print progress to stderr.
    pub verbose: bool,
    /// Write a JSON run summary here when the sweep finishes.
    pub summary_path: Option<PathBuf>,
    /// Git SHA recorded in the summary.
    pub git_sha: Option<String>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            bin_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            benchmarks: benches::ALL.iter().map(|b| b.name.to_string()).collect(),
            allocators: DEFAULT_ALLOCATORS.iter().map(|a| a.to_string()).collect(),
            threads: DEFAULT_THREADS.to_vec(),
            trials: 1,
            verbose: true,
            summary_path: None,
            git_sha: None,
        }
    }
}

impl SweepConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config from environment variables.
    ///
    /// Supported variables:
    /// - `SWEEP_BIN_DIR`: benchmark binary directory (default: `.`)
    /// - `SWEEP_OUTPUT_DIR`: result log directory (default: `.`)
    /// - `SWEEP_BENCHMARKS`: comma-separated benchmark names
    /// - `SWEEP_ALLOCATORS`: comma-separated allocator identifiers
    /// - `SWEEP_THREADS`: comma-separated thread counts
    /// - `SWEEP_TRIALS`: trials per cell (default: 1)
    /// - `SWEEP_VERBOSE`: progress output (default: true)
    /// - `SWEEP_SUMMARY`: JSON summary path
    /// - `SWEEP_GIT_SHA`: git commit hash
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("SWEEP_BIN_DIR") {
            cfg.bin_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("SWEEP_OUTPUT_DIR") {
            cfg.output_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("SWEEP_BENCHMARKS") {
            if let Some(list) = parse_list(&v) {
                cfg.benchmarks = list;
            }
        }
        if let Ok(v) = std::env::var("SWEEP_ALLOCATORS") {
            if let Some(list) = parse_list(&v) {
                cfg.allocators = list;
            }
        }
        if let Ok(v) = std::env::var("SWEEP_THREADS") {
            if let Some(list) = parse_list(&v) {
                cfg.threads = list;
            }
        }
        if let Ok(v) = std::env::var("SWEEP_TRIALS") {
            if let Ok(n) = v.parse() {
                cfg.trials = n;
            }
        }
        if let Ok(v) = std::env::var("SWEEP_VERBOSE") {
            cfg.verbose = v != "0" && !v.eq_ignore_ascii_case("false");
        }
        if let Ok(v) = std::env::var("SWEEP_SUMMARY") {
            cfg.summary_path = Some(PathBuf::from(v));
        }
        if let Ok(v) = std::env::var("SWEEP_GIT_SHA") {
            cfg.git_sha = Some(v);
        }

        if cfg.git_sha.is_none() {
            cfg.git_sha = detect_git_sha();
        }

        cfg
    }

    pub fn bin_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.bin_dir = path.into();
        self
    }

    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    /// Restrict the sweep to these benchmark kinds.
    pub fn benchmarks<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.benchmarks = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn allocators<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.allocators = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn threads(mut self, counts: impl IntoIterator<Item = u32>) -> Self {
        self.threads = counts.into_iter().collect();
        self
    }

    pub fn trials(mut self, n: usize) -> Self {
        self.trials = n;
        self
    }

    pub fn verbose(mut self, v: bool) -> Self {
        self.verbose = v;
        self
    }

    pub fn summary(mut self, path: impl Into<PathBuf>) -> Self {
        self.summary_path = Some(path.into());
        self
    }

    pub fn git_sha(mut self, sha: impl Into<String>) -> Self {
        self.git_sha = Some(sha.into());
        self
    }

    /// Resolve the configured names into the run space.
    ///
    /// Subsets keep the canonical order of every dimension: benchmarks as
    /// listed in the catalog, known allocators as in the default sweep (others
    /// after them), and thread counts ascending. Repeats are dropped.
    pub fn matrix(&self) -> Result<Matrix> {
        Ok(Matrix {
            benchmarks: benches::select(&self.benchmarks)?,
            allocators: canonical_allocators(&self.allocators),
            threads: canonical_threads(&self.threads),
            trials: self.trials,
        })
    }
}

/// Split a comma list, rejecting it whole if any item fails to parse or
/// nothing is left.
fn parse_list<T: std::str::FromStr>(v: &str) -> Option<Vec<T>> {
    v.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().ok())
        .collect::<Option<Vec<T>>>()
        .filter(|list| !list.is_empty())
}

fn detect_git_sha() -> Option<String> {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|o| {
            if o.status.success() {
                String::from_utf8(o.stdout)
                    .ok()
                    .map(|s| s.trim().to_string())
            } else {
                None
            }
        })
}
