//! Focus + context timeline of passed/failed test counts per build.

pub mod brush;
pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod ingest;
pub mod lifecycle;
pub mod render;
pub mod scale;
pub mod selection;
mod view;

pub use brush::{BrushController, BrushState, FocusPatch, IndexRange};
pub use config::{Margin, TimelineConfig};
pub use data::{BuildNumber, SeriesInput, SeriesKind, TimelineData, TimelineSeries};
pub use error::TimelineError;
pub use ingest::{parse_rows, timeline_from_json, timeline_from_rows, ReduceBuild, TimelineRows};
pub use lifecycle::{DatasetOutcome, TimelineChart, TimelineLifecycle};
pub use render::{full_render, ChartScene, RenderContext};
pub use selection::{select_build, SelectionChange};
pub use view::BuildTimeline;
