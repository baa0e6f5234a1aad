use thiserror::Error;

/// Failures the timeline core can report. None of them reach the user: callers keep the
/// last valid drawing and log the condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    #[error("timeline dataset is empty")]
    EmptyDataset,

    #[error("passed series has {passed} builds but failed series has {failed}")]
    MisalignedSeries { passed: usize, failed: usize },

    #[error("brush extent does not cover any build")]
    EmptyBrushRange,

    #[error("build {0} appears more than once in the dataset")]
    DuplicateBuild(u64),

    #[error("expected exactly two series (passed, failed), got {0}")]
    SeriesCount(usize),

    #[error("invalid timeline config: {0}")]
    InvalidConfig(String),

    #[error("malformed build rows: {0}")]
    MalformedRows(String),
}
