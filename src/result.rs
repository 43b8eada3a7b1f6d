//! Measured values and run summaries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// A number scraped from benchmark output.
///
/// Integers and reals are kept apart so the result log can render each in
/// its native form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Integer(i128),
    Real(f64),
}

impl Metric {
    /// Parse a token, trying an integer before a real.
    ///
    /// Only integers wider than 128 bits fall through to a real.
    pub fn parse(token: &str) -> Option<Self> {
        if let Ok(i) = token.parse::<i128>() {
            return Some(Metric::Integer(i));
        }
        token.parse::<f64>().ok().map(Metric::Real)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Integer(i) => write!(f, "{}", i),
            Metric::Real(r) => f.write_str(&format_real(*r)),
        }
    }
}

/// Render a real the way existing result logs spell them: shortest
/// round-trip digits, always a decimal point in positional form, and a
/// signed two-digit exponent outside `1e-4 <= |r| < 1e16`.
fn format_real(r: f64) -> String {
    if r.is_nan() {
        return "nan".to_string();
    }
    if r.is_infinite() {
        return if r > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if r == 0.0 {
        return if r.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let sci = format!("{:e}", r);
    let parts = sci
        .split_once('e')
        .and_then(|(m, e)| Some((m, e.parse::<i32>().ok()?)));
    let (mantissa, exp) = match parts {
        Some(parts) => parts,
        None => return sci,
    };

    if !(-4..16).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exp.abs());
    }

    let fixed = r.to_string();
    if fixed.contains('.') {
        fixed
    } else {
        format!("{}.0", fixed)
    }
}

/// The outcome of one cell, between extraction and the result log.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub benchmark: String,
    pub allocator: String,
    pub threads: u32,
    pub trial: usize,
    pub metric: Metric,
    /// Wall-clock time of the child process.
    pub elapsed: Duration,
}

impl RunResult {
    /// The row appended to the result log, without the trailing newline.
    pub fn csv_row(&self) -> String {
        format!("{},{},{}", self.allocator, self.threads, self.metric)
    }
}

/// Summary of a completed sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSummary {
    pub benchmarks: Vec<String>,
    pub allocators: Vec<String>,
    pub threads: Vec<u32>,
    pub trials: usize,
    /// Rows appended per benchmark during this run.
    pub rows: BTreeMap<String, usize>,
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Unix milliseconds when the sweep started.
    pub started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_sha: Option<String>,
}

impl SweepSummary {
    pub fn total_rows(&self) -> usize {
        self.rows.values().sum()
    }

    /// Load a summary from a JSON file.
    pub fn load(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        d.as_nanos().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let nanos = u128::deserialize(d)?;
        Ok(Duration::from_nanos(nanos as u64))
    }
}
