//! Timeline input model: two index-aligned series of `(build, count)` pairs.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::TimelineError;

pub type BuildNumber = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Passed,
    Failed,
}

impl SeriesKind {
    /// Draw order. Passed layer first, failed layer on top.
    pub const ALL: [SeriesKind; 2] = [SeriesKind::Passed, SeriesKind::Failed];

    pub fn name(self) -> &'static str {
        match self {
            SeriesKind::Passed => "passed",
            SeriesKind::Failed => "failed",
        }
    }

    /// Failed counts render below the baseline.
    pub(crate) fn sign(self) -> i64 {
        match self {
            SeriesKind::Passed => 1,
            SeriesKind::Failed => -1,
        }
    }
}

/// Wire shape of one series: `{ "values": [[build, count], ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesInput {
    pub values: Vec<(BuildNumber, u64)>,
}

/// The `[passed, failed]` payload handed over by the data collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SeriesInput>", into = "Vec<SeriesInput>")]
pub struct TimelineData {
    pub passed: SeriesInput,
    pub failed: SeriesInput,
}

impl TryFrom<Vec<SeriesInput>> for TimelineData {
    type Error = TimelineError;

    fn try_from(series: Vec<SeriesInput>) -> Result<Self, Self::Error> {
        let count = series.len();
        let mut iter = series.into_iter();
        match (iter.next(), iter.next(), iter.next()) {
            (Some(passed), Some(failed), None) => Ok(Self { passed, failed }),
            _ => Err(TimelineError::SeriesCount(count)),
        }
    }
}

impl From<TimelineData> for Vec<SeriesInput> {
    fn from(data: TimelineData) -> Self {
        vec![data.passed, data.failed]
    }
}

impl TimelineData {
    pub fn new(passed: Vec<(BuildNumber, u64)>, failed: Vec<(BuildNumber, u64)>) -> Self {
        Self {
            passed: SeriesInput { values: passed },
            failed: SeriesInput { values: failed },
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Number of builds on the passed series (the one that defines the x domain).
    pub fn len(&self) -> usize {
        self.passed.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passed.values.is_empty() && self.failed.values.is_empty()
    }

    /// Check the upstream contract before anything touches a scale.
    pub fn validate(&self) -> Result<(), TimelineError> {
        let passed = self.passed.values.len();
        let failed = self.failed.values.len();
        if passed != failed {
            return Err(TimelineError::MisalignedSeries { passed, failed });
        }
        if passed == 0 {
            return Err(TimelineError::EmptyDataset);
        }

        let mut seen = HashSet::with_capacity(passed);
        for (build, _) in &self.passed.values {
            if !seen.insert(*build) {
                return Err(TimelineError::DuplicateBuild(*build));
            }
        }
        Ok(())
    }

    /// Validated `[passed, failed]` series.
    pub fn series(&self) -> Result<[TimelineSeries; 2], TimelineError> {
        self.validate()?;
        Ok([
            TimelineSeries {
                kind: SeriesKind::Passed,
                entries: self.passed.values.clone(),
            },
            TimelineSeries {
                kind: SeriesKind::Failed,
                entries: self.failed.values.clone(),
            },
        ])
    }
}

/// One named series, oldest build first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineSeries {
    pub kind: SeriesKind,
    pub entries: Vec<(BuildNumber, u64)>,
}

impl TimelineSeries {
    pub fn builds(&self) -> Vec<BuildNumber> {
        self.entries.iter().map(|(build, _)| *build).collect()
    }

    pub fn max_count(&self) -> u64 {
        self.entries
            .iter()
            .map(|(_, count)| *count)
            .max()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
