//! Append-only per-benchmark result logs.

use crate::error::{Result, SweepError};
use crate::result::RunResult;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// An open `{benchmark}.csv`, held for the duration of one benchmark's sweep.
///
/// Rows are `allocator,threads,metric` with no header. The file is opened in
/// append mode so repeated sweeps accumulate.
#[derive(Debug)]
pub struct ResultLog {
    path: PathBuf,
    file: File,
    rows: usize,
}

impl ResultLog {
    /// Open (creating if needed) the log for `benchmark` inside `dir`.
    pub fn open(dir: &Path, benchmark: &str) -> Result<Self> {
        let path = Self::path_for(dir, benchmark);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SweepError::ResultLog {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            file,
            rows: 0,
        })
    }

    pub fn path_for(dir: &Path, benchmark: &str) -> PathBuf {
        dir.join(format!("{}.csv", benchmark))
    }

    /// Write one row and push it to the file before returning.
    pub fn append(&mut self, result: &RunResult) -> Result<()> {
        let line = format!("{}\n", result.csv_row());
        self.file
            .write_all(line.as_bytes())
            .and_then(|_| self.file.flush())
            .map_err(|source| SweepError::ResultLog {
                path: self.path.clone(),
                source,
            })?;
        self.rows += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows appended through this handle.
    pub fn rows(&self) -> usize {
        self.rows
    }
}
