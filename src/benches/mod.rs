//! Benchmark adapters.
//!
//! Each benchmark kind turns an (allocator, thread count) pair into the
//! exact command line its binary expects. The binaries parse positional
//! arguments, so the templates below must not be reordered.

use crate::error::{Result, SweepError};

/// Where the metric lives in a benchmark's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricRule {
    /// Substring identifying the line that carries the metric.
    pub marker: &'static str,
    /// Zero-based whitespace-delimited column on that line.
    pub column: usize,
}

/// One concrete process launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// File name of the program, `{allocator}_{binary}`.
    pub program: String,
    pub args: Vec<String>,
    /// Text fed to the program's stdin, if any.
    pub stdin: Option<String>,
}

impl Invocation {
    fn new(program: String) -> Self {
        Self {
            program,
            args: Vec::new(),
            stdin: None,
        }
    }

    fn arg(mut self, arg: impl ToString) -> Self {
        self.args.push(arg.to_string());
        self
    }

    fn stdin(mut self, text: String) -> Self {
        self.stdin = Some(text);
        self
    }

    /// Program name followed by its arguments.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Shell-like rendering for diagnostics.
    pub fn display(&self) -> String {
        self.argv().join(" ")
    }
}

/// A registered benchmark kind.
pub struct BenchmarkSpec {
    /// Name used for the result log (`{name}.csv`) and for selection.
    pub name: &'static str,
    /// Binary suffix; the program is `{allocator}_{binary}`.
    pub binary: &'static str,
    /// Builds the command line for one cell.
    pub build: fn(&str, u32) -> Invocation,
    pub rule: MetricRule,
}

impl BenchmarkSpec {
    pub fn program(&self, allocator: &str) -> String {
        format!("{}_{}", allocator, self.binary)
    }

    pub fn invocation(&self, allocator: &str, threads: u32) -> Invocation {
        (self.build)(allocator, threads)
    }
}

impl std::fmt::Debug for BenchmarkSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkSpec")
            .field("name", &self.name)
            .field("binary", &self.binary)
            .field("rule", &self.rule)
            .finish()
    }
}

impl PartialEq for BenchmarkSpec {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

pub static LARSON: BenchmarkSpec = BenchmarkSpec {
    name: "larson",
    binary: "larson_test",
    build: larson,
    rule: MetricRule {
        marker: "Throughput",
        column: 2,
    },
};

pub static PROD_CON: BenchmarkSpec = BenchmarkSpec {
    name: "prod_con",
    binary: "prod-con_test",
    build: prod_con,
    rule: MetricRule {
        marker: "Time elapsed",
        column: 3,
    },
};

pub static SHBENCH: BenchmarkSpec = BenchmarkSpec {
    name: "shbench",
    binary: "sh6bench_test",
    build: shbench,
    rule: MetricRule {
        marker: "rdtsc time",
        column: 2,
    },
};

pub static THREADTEST: BenchmarkSpec = BenchmarkSpec {
    name: "threadtest",
    binary: "threadtest_test",
    build: threadtest,
    rule: MetricRule {
        marker: "Time elapsed",
        column: 3,
    },
};

/// Every benchmark kind, in sweep order.
pub static ALL: [&BenchmarkSpec; 4] = [&LARSON, &PROD_CON, &SHBENCH, &THREADTEST];

/// Look up a benchmark kind by name.
pub fn find(name: &str) -> Result<&'static BenchmarkSpec> {
    ALL.iter()
        .copied()
        .find(|b| b.name == name)
        .ok_or_else(|| SweepError::UnknownBenchmark {
            name: name.to_string(),
        })
}

/// Resolve names to benchmark kinds, in sweep order regardless of input order.
pub fn select<S: AsRef<str>>(names: &[S]) -> Result<Vec<&'static BenchmarkSpec>> {
    let mut picked = Vec::with_capacity(names.len());
    for name in names {
        let bench = find(name.as_ref())?;
        if !picked.contains(&bench) {
            picked.push(bench);
        }
    }
    picked.sort_by_key(|b| position(b));
    Ok(picked)
}

fn position(bench: &BenchmarkSpec) -> usize {
    ALL.iter()
        .position(|b| b.name == bench.name)
        .unwrap_or(usize::MAX)
}

fn larson(allocator: &str, threads: u32) -> Invocation {
    Invocation::new(LARSON.program(allocator))
        .arg(30)
        .arg(64)
        .arg(400)
        .arg(1000)
        .arg(10000)
        .arg(123)
        .arg(threads)
}

fn prod_con(allocator: &str, threads: u32) -> Invocation {
    Invocation::new(PROD_CON.program(allocator))
        .arg(threads)
        .arg(10000000)
        .arg(64)
}

// sh6bench reads its parameters interactively.
fn shbench(allocator: &str, threads: u32) -> Invocation {
    Invocation::new(SHBENCH.program(allocator)).stdin(format!("100000\n64\n400\n{}\n", threads))
}

fn threadtest(allocator: &str, threads: u32) -> Invocation {
    Invocation::new(THREADTEST.program(allocator))
        .arg(threads)
        .arg(10000)
        .arg(100000)
        .arg(0)
        .arg(8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn should_build_larson_command_line() {
        let inv = LARSON.invocation("je", 4);
        assert_eq!(
            inv.argv(),
            argv(&["je_larson_test", "30", "64", "400", "1000", "10000", "123", "4"])
        );
        assert_eq!(inv.stdin, None);
    }

    #[test]
    fn should_build_prod_con_command_line() {
        let inv = PROD_CON.invocation("r", 10);
        assert_eq!(
            inv.argv(),
            argv(&["r_prod-con_test", "10", "10000000", "64"])
        );
        assert_eq!(inv.stdin, None);
    }

    #[test]
    fn should_feed_shbench_parameters_through_stdin() {
        let inv = SHBENCH.invocation("cxlalloc", 6);
        assert_eq!(inv.argv(), argv(&["cxlalloc_sh6bench_test"]));
        assert_eq!(inv.stdin.as_deref(), Some("100000\n64\n400\n6\n"));
    }

    #[test]
    fn should_build_threadtest_command_line() {
        let inv = THREADTEST.invocation("cxlalloc", 40);
        assert_eq!(
            inv.argv(),
            argv(&["cxlalloc_threadtest_test", "40", "10000", "100000", "0", "8"])
        );
    }

    #[test]
    fn should_carry_extraction_rule_per_benchmark() {
        assert_eq!(LARSON.rule, MetricRule { marker: "Throughput", column: 2 });
        assert_eq!(PROD_CON.rule, MetricRule { marker: "Time elapsed", column: 3 });
        assert_eq!(SHBENCH.rule, MetricRule { marker: "rdtsc time", column: 2 });
        assert_eq!(THREADTEST.rule, MetricRule { marker: "Time elapsed", column: 3 });
    }

    #[test]
    fn should_list_benchmarks_in_sweep_order() {
        let names: Vec<_> = ALL.iter().map(|b| b.name).collect();
        assert_eq!(names, ["larson", "prod_con", "shbench", "threadtest"]);
    }

    #[test]
    fn should_restore_sweep_order_when_selecting() {
        let picked = select(&["threadtest", "larson", "larson"]).unwrap();
        let names: Vec<_> = picked.iter().map(|b| b.name).collect();
        assert_eq!(names, ["larson", "threadtest"]);
    }

    #[test]
    fn should_reject_unknown_benchmark() {
        let err = find("mstress").unwrap_err();
        assert!(matches!(err, SweepError::UnknownBenchmark { ref name } if name == "mstress"));
    }
}
