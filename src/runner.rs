//! Launching benchmark binaries.

use crate::benches::Invocation;
use crate::error::{Result, SweepError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Runs one invocation and hands back its stdout.
///
/// The sweep driver only talks to this trait, so it can be exercised without
/// real benchmark binaries.
pub trait Executor {
    fn execute(&mut self, invocation: &Invocation) -> Result<String>;
}

impl<F> Executor for F
where
    F: FnMut(&Invocation) -> Result<String>,
{
    fn execute(&mut self, invocation: &Invocation) -> Result<String> {
        self(invocation)
    }
}

/// Executes benchmark binaries found in a directory.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    bin_dir: PathBuf,
}

impl ProcessRunner {
    pub fn new(bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
        }
    }

    /// Path the program of `invocation` is launched from.
    pub fn program_path(&self, invocation: &Invocation) -> PathBuf {
        self.bin_dir.join(&invocation.program)
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Executor for ProcessRunner {
    fn execute(&mut self, invocation: &Invocation) -> Result<String> {
        let program = self.program_path(invocation);
        run_process(&program, &invocation.args, invocation.stdin.as_deref())
    }
}

/// Run `program` to completion and return its stdout.
///
/// `input`, when given, is written to the child's stdin which is then closed.
/// Without input the child gets the null device. stderr is inherited. Any
/// exit other than success is a [`SweepError::ProcessFailure`]. There is no
/// timeout.
pub fn run_process(program: &Path, args: &[String], input: Option<&str>) -> Result<String> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());

    let mut child = cmd.spawn().map_err(|source| SweepError::Spawn {
        program: program.display().to_string(),
        source,
    })?;

    // Feed stdin from a separate thread so a child that writes before it
    // finishes reading cannot fill the stdout pipe and stall us.
    let feeder = match (input, child.stdin.take()) {
        (Some(text), Some(mut stdin)) => {
            let text = text.to_owned();
            Some(std::thread::spawn(move || {
                // A child that exits without reading everything closes the
                // pipe; its exit status decides the outcome.
                let _ = stdin.write_all(text.as_bytes());
            }))
        }
        _ => None,
    };

    let output = child.wait_with_output().map_err(|source| SweepError::Wait {
        program: program.display().to_string(),
        source,
    })?;

    if let Some(handle) = feeder {
        let _ = handle.join();
    }

    if !output.status.success() {
        return Err(SweepError::ProcessFailure {
            command: command_line(program, args),
            status: output.status,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn command_line(program: &Path, args: &[String]) -> String {
    std::iter::once(program.display().to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ")
}
