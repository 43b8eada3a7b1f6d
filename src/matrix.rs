//! The run space of a sweep.

use crate::benches::{self, BenchmarkSpec};

/// Allocator builds swept by default.
pub const DEFAULT_ALLOCATORS: [&str; 3] = ["cxlalloc", "r", "je"];

/// Thread counts swept by default, ascending.
pub const DEFAULT_THREADS: [u32; 10] = [1, 2, 4, 6, 10, 16, 20, 24, 32, 40];

/// Order allocators the way the default sweep does: known builds in
/// [`DEFAULT_ALLOCATORS`] order, then any others as first given. Repeats are
/// dropped.
pub fn canonical_allocators(allocators: &[String]) -> Vec<String> {
    let mut out: Vec<String> = DEFAULT_ALLOCATORS
        .iter()
        .filter(|known| allocators.iter().any(|a| a == *known))
        .map(|known| known.to_string())
        .collect();
    for a in allocators {
        if !out.contains(a) {
            out.push(a.clone());
        }
    }
    out
}

/// Thread counts ascending, without repeats.
pub fn canonical_threads(threads: &[u32]) -> Vec<u32> {
    let mut out = threads.to_vec();
    out.sort_unstable();
    out.dedup();
    out
}

/// One unit of execution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell<'a> {
    pub benchmark: &'static BenchmarkSpec,
    pub allocator: &'a str,
    pub threads: u32,
    pub trial: usize,
}

impl std::fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}t#{}",
            self.benchmark.name, self.allocator, self.threads, self.trial
        )
    }
}

/// Benchmark kinds × allocators × thread counts × trials.
///
/// Enumeration order is fixed: benchmark outermost, then allocator, then
/// thread count, then trial.
#[derive(Debug, Clone)]
pub struct Matrix {
    pub benchmarks: Vec<&'static BenchmarkSpec>,
    pub allocators: Vec<String>,
    pub threads: Vec<u32>,
    pub trials: usize,
}

impl Default for Matrix {
    fn default() -> Self {
        Self {
            benchmarks: benches::ALL.to_vec(),
            allocators: DEFAULT_ALLOCATORS.iter().map(|a| a.to_string()).collect(),
            threads: DEFAULT_THREADS.to_vec(),
            trials: 1,
        }
    }
}

impl Matrix {
    /// Cells of a single benchmark kind, in order.
    pub fn cells_for<'a>(
        &'a self,
        benchmark: &'static BenchmarkSpec,
    ) -> impl Iterator<Item = Cell<'a>> + 'a {
        self.allocators.iter().flat_map(move |allocator| {
            self.threads.iter().flat_map(move |&threads| {
                (0..self.trials).map(move |trial| Cell {
                    benchmark,
                    allocator: allocator.as_str(),
                    threads,
                    trial,
                })
            })
        })
    }

    /// Every cell of the sweep, in order.
    pub fn cells(&self) -> impl Iterator<Item = Cell<'_>> + '_ {
        self.benchmarks
            .iter()
            .flat_map(move |&benchmark| self.cells_for(benchmark))
    }

    /// Number of cells per benchmark kind.
    pub fn cells_per_benchmark(&self) -> usize {
        self.allocators.len() * self.threads.len() * self.trials
    }

    pub fn len(&self) -> usize {
        self.benchmarks.len() * self.cells_per_benchmark()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benches::{LARSON, SHBENCH};

    #[test]
    fn should_cover_default_sweep() {
        let m = Matrix::default();
        assert_eq!(m.len(), 4 * 3 * 10);
        assert_eq!(m.cells().count(), m.len());
    }

    #[test]
    fn should_nest_benchmark_allocator_threads_trial() {
        let m = Matrix {
            benchmarks: vec![&LARSON, &SHBENCH],
            allocators: vec!["a".into(), "b".into()],
            threads: vec![1, 2],
            trials: 2,
        };
        let order: Vec<String> = m.cells().map(|c| c.to_string()).collect();
        assert_eq!(
            order,
            [
                "larson/a/1t#0",
                "larson/a/1t#1",
                "larson/a/2t#0",
                "larson/a/2t#1",
                "larson/b/1t#0",
                "larson/b/1t#1",
                "larson/b/2t#0",
                "larson/b/2t#1",
                "shbench/a/1t#0",
                "shbench/a/1t#1",
                "shbench/a/2t#0",
                "shbench/a/2t#1",
                "shbench/b/1t#0",
                "shbench/b/1t#1",
                "shbench/b/2t#0",
                "shbench/b/2t#1",
            ]
        );
    }

    #[test]
    fn should_start_each_benchmark_with_first_allocator_and_one_thread() {
        let m = Matrix::default();
        let first = m.cells_for(&SHBENCH).next().unwrap();
        assert_eq!(first.allocator, "cxlalloc");
        assert_eq!(first.threads, 1);
        assert_eq!(first.trial, 0);
        let last = m.cells_for(&SHBENCH).last().unwrap();
        assert_eq!(last.allocator, "je");
        assert_eq!(last.threads, 40);
    }

    #[test]
    fn should_order_known_allocators_first() {
        let given: Vec<String> = ["je", "x", "cxlalloc", "je", "y", "x"]
            .iter()
            .map(|a| a.to_string())
            .collect();
        assert_eq!(canonical_allocators(&given), ["cxlalloc", "je", "x", "y"]);
    }

    #[test]
    fn should_sort_and_dedup_threads() {
        assert_eq!(canonical_threads(&[40, 1, 16, 1]), [1, 16, 40]);
    }

    #[test]
    fn should_yield_nothing_when_no_trials() {
        let m = Matrix {
            trials: 0,
            ..Matrix::default()
        };
        assert!(m.is_empty());
        assert_eq!(m.cells().count(), 0);
    }
}
