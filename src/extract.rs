//! Pulling a metric out of benchmark output.

use crate::benches::MetricRule;
use crate::error::{Result, SweepError};
use crate::result::Metric;

/// Find the first line containing `rule.marker` and parse the token at
/// `rule.column`.
///
/// Returns `Ok(None)` when no line carries the marker. A matching line whose
/// column is missing or not numeric is an error.
pub fn extract_metric(output: &str, rule: &MetricRule) -> Result<Option<Metric>> {
    let line = match output.lines().find(|l| l.contains(rule.marker)) {
        Some(line) => line,
        None => return Ok(None),
    };

    let token = line
        .split_whitespace()
        .nth(rule.column)
        .ok_or_else(|| SweepError::MissingColumn {
            line: line.to_string(),
            column: rule.column,
        })?;

    Metric::parse(token)
        .map(Some)
        .ok_or_else(|| SweepError::MetricParseFailure {
            line: line.to_string(),
            column: rule.column,
            token: token.to_string(),
        })
}
