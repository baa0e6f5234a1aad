//! Turns per-build reduce rows from the results service into timeline input.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::state::BuildRecord;

use super::data::{BuildNumber, TimelineData};
use super::error::TimelineError;

/// One reduced build as served by the results backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ReduceBuild {
    pub version: String,
    pub abs_passed: f64,
    pub abs_failed: f64,
    pub rel_passed: f64,
    pub rel_failed: f64,
    pub rel_executed: f64,
}

impl ReduceBuild {
    /// Release part of the version, e.g. `"4.0.0"` for `"4.0.0-1712"`.
    pub fn main_version(&self) -> &str {
        self.version.split('-').next().unwrap_or_default()
    }

    pub fn build_number(&self) -> Option<BuildNumber> {
        self.version.split('-').nth(1)?.trim().parse().ok()
    }

    fn is_placeholder(&self) -> bool {
        self.version.to_ascii_uppercase().contains("XX")
    }

    fn has_release_number(&self) -> bool {
        self.main_version()
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_digit())
    }
}

/// Chart input plus the build list aligned with it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineRows {
    pub data: TimelineData,
    pub version_builds: Vec<BuildRecord>,
    pub rows: Vec<ReduceBuild>,
}

impl TimelineRows {
    pub fn row_for(&self, build: BuildNumber) -> Option<&ReduceBuild> {
        self.rows.iter().find(|row| row.build_number() == Some(build))
    }
}

pub fn parse_rows(raw: &str) -> Result<Vec<ReduceBuild>, TimelineError> {
    serde_json::from_str(raw).map_err(|err| TimelineError::MalformedRows(err.to_string()))
}

/// Keep the rows that name a real numbered build, in input order.
pub fn timeline_from_rows(rows: Vec<ReduceBuild>) -> Result<TimelineRows, TimelineError> {
    let total = rows.len();
    let mut passed = Vec::with_capacity(total);
    let mut failed = Vec::with_capacity(total);
    let mut version_builds = Vec::with_capacity(total);
    let mut kept = Vec::with_capacity(total);

    for row in rows {
        if row.is_placeholder() || !row.has_release_number() {
            debug!(version = %row.version, "skipping build row");
            continue;
        }
        let Some(build) = row.build_number() else {
            debug!(version = %row.version, "skipping build row without build number");
            continue;
        };

        passed.push((build, count(row.abs_passed)));
        failed.push((build, count(row.abs_failed.abs())));
        version_builds.push(BuildRecord::new(row.version.clone()));
        kept.push(row);
    }

    let data = TimelineData::new(passed, failed);
    data.validate()?;
    debug!(total, kept = kept.len(), "build rows ingested");

    Ok(TimelineRows {
        data,
        version_builds,
        rows: kept,
    })
}

/// Parse and ingest in one go.
pub fn timeline_from_json(raw: &str) -> Result<TimelineRows, TimelineError> {
    timeline_from_rows(parse_rows(raw)?)
}

fn count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}
