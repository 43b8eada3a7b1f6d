//! alloc-sweep: run the allocator benchmark matrix and append results.
//!
//! Expects the benchmark binaries (`{allocator}_{benchmark}_test`) in the
//! binary directory, `.` by default, and appends to `{benchmark}.csv` in the
//! output directory, also `.` by default.

use alloc_sweep::{benches, Sweep, SweepConfig};
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "alloc-sweep",
    about = "Sweep allocator micro-benchmarks across thread counts",
    long_about = "
alloc-sweep runs each benchmark binary once per allocator and thread count,
scrapes the metric from its output, and appends `allocator,threads,metric`
rows to {benchmark}.csv.

Example:
    alloc-sweep                              # Full default matrix
    alloc-sweep -b larson -a je -t 1,2,4     # A slice of it
    alloc-sweep --list                       # Show the cells without running
"
)]
struct Cli {
    // ========================================================================
    // Matrix Selection
    // ========================================================================
    /// Benchmark kinds to run (larson, prod_con, shbench, threadtest)
    #[arg(long = "benchmark", short = 'b', value_delimiter = ',')]
    benchmarks: Vec<String>,

    /// Allocator identifiers, in sweep order
    #[arg(long = "allocator", short = 'a', value_delimiter = ',')]
    allocators: Vec<String>,

    /// Thread counts, in sweep order
    #[arg(long, short = 't', value_delimiter = ',')]
    threads: Vec<u32>,

    /// Trials per cell
    #[arg(long)]
    trials: Option<usize>,

    /// List the cells that would run and exit
    #[arg(long)]
    list: bool,

    // ========================================================================
    // Locations
    // ========================================================================
    /// Directory containing the benchmark binaries
    #[arg(long)]
    bin_dir: Option<PathBuf>,

    /// Directory the result logs are appended in
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Write a JSON summary of the run to this file
    #[arg(long)]
    summary: Option<PathBuf>,

    // ========================================================================
    // Output Control
    // ========================================================================
    /// Verbose output (overrides SWEEP_VERBOSE=0)
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(long, short = 'q')]
    quiet: bool,
}

impl Cli {
    /// Layer command-line flags over the environment-derived config.
    fn apply(&self, mut config: SweepConfig) -> SweepConfig {
        if !self.benchmarks.is_empty() {
            config = config.benchmarks(self.benchmarks.iter().cloned());
        }
        if !self.allocators.is_empty() {
            config = config.allocators(self.allocators.iter().cloned());
        }
        if !self.threads.is_empty() {
            config = config.threads(self.threads.iter().copied());
        }
        if let Some(n) = self.trials {
            config = config.trials(n);
        }
        if let Some(ref dir) = self.bin_dir {
            config = config.bin_dir(dir);
        }
        if let Some(ref dir) = self.output_dir {
            config = config.output_dir(dir);
        }
        if let Some(ref path) = self.summary {
            config = config.summary(path);
        }
        if self.verbose {
            config = config.verbose(true);
        }
        if self.quiet {
            config = config.verbose(false);
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.apply(SweepConfig::from_env());

    if config.trials == 0 {
        bail!("--trials must be at least 1");
    }

    if cli.list {
        let matrix = config.matrix().context("Invalid benchmark selection")?;
        for cell in matrix.cells() {
            let inv = cell.benchmark.invocation(cell.allocator, cell.threads);
            match inv.stdin {
                Some(ref input) => println!("{}\t{}\t< {:?}", cell, inv.display(), input),
                None => println!("{}\t{}", cell, inv.display()),
            }
        }
        return Ok(());
    }

    if !config.bin_dir.is_dir() {
        bail!(
            "Benchmark directory does not exist: {}",
            config.bin_dir.display()
        );
    }

    let sweep = Sweep::new(config).with_context(|| {
        format!(
            "Invalid benchmark selection (known: {})",
            benches::ALL
                .iter()
                .map(|b| b.name)
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;

    sweep.run().context("Sweep aborted")?;

    Ok(())
}
