//! Lifecycle controller: owns one chart per distinct dataset and routes pointer and
//! click events to the brush and selection logic.

use tracing::{debug, warn};

use crate::core::state::{BuildState, QueryWriter};

use super::brush::{BrushController, FocusPatch};
use super::config::TimelineConfig;
use super::data::{BuildNumber, TimelineData};
use super::error::TimelineError;
use super::render::{self, ChartScene, RenderContext};
use super::scale::BandScale;
use super::selection::{self, SelectionChange};

/// A drawn chart: its immutable context, the current scene and the brush driving it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineChart {
    ctx: RenderContext,
    scene: ChartScene,
    brush: BrushController,
    focus_x: BandScale,
}

impl TimelineChart {
    /// Full render followed by the initial brush change at the default extent.
    pub fn build(
        data: &TimelineData,
        config: TimelineConfig,
        selected: Option<BuildNumber>,
    ) -> Result<Self, TimelineError> {
        let ctx = RenderContext::new(data, config)?;
        let scene = render::full_render(&ctx, selected);
        let brush = BrushController::new(&ctx.config);
        let focus_x = ctx.scales.focus_x.clone();

        let mut chart = Self {
            ctx,
            scene,
            brush,
            focus_x,
        };
        let patch = chart.brush.brush_changed(&chart.ctx);
        chart.apply(patch);
        Ok(chart)
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn scene(&self) -> &ChartScene {
        &self.scene
    }

    pub fn brush(&self) -> &BrushController {
        &self.brush
    }

    /// Focus x scale as last re-domained by the brush.
    pub fn focus_x(&self) -> &BandScale {
        &self.focus_x
    }

    pub fn drag_start(&mut self, px: f64) {
        self.brush.drag_start(px);
        self.scene.set_brush_extent(self.brush.extent());
    }

    /// Returns whether the focus strip changed.
    pub fn drag_move(&mut self, px: f64) -> bool {
        let patch = self.brush.drag_move(&self.ctx, px);
        self.apply(patch)
    }

    /// Returns the series index under a tap, if the press never moved.
    pub fn drag_release(&mut self) -> Option<usize> {
        let tap = self.brush.drag_release();
        self.scene.set_brush_extent(self.brush.extent());
        self.ctx.scales.context_x.index_at(tap?)
    }

    pub fn set_brush_extent(&mut self, extent: (f64, f64)) -> bool {
        let patch = self.brush.set_extent(&self.ctx, extent);
        self.apply(patch)
    }

    /// Bar click in either strip.
    pub fn select(
        &mut self,
        index: usize,
        state: &mut BuildState,
        query: &mut dyn QueryWriter,
    ) -> Option<SelectionChange> {
        let change = selection::select_build(state, query, index)?;
        self.scene.apply_emphasis(&self.ctx, change.build);
        Some(change)
    }

    /// Re-sync emphasis with a selection made elsewhere.
    pub fn emphasize(&mut self, selected: Option<BuildNumber>) {
        self.scene.apply_emphasis(&self.ctx, selected);
    }

    fn apply(&mut self, patch: Option<FocusPatch>) -> bool {
        self.scene.set_brush_extent(self.brush.extent());
        match patch {
            Some(patch) => {
                self.scene.apply_focus_patch(&patch);
                self.focus_x = patch.focus_x;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetOutcome {
    /// The previous drawing was torn down and replaced.
    Rebuilt,
    /// Same content as the current drawing.
    Unchanged,
    /// Invalid input; the previous drawing is kept.
    Rejected(TimelineError),
}

/// Holds at most one chart and rebuilds it exactly once per distinct dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineLifecycle {
    config: TimelineConfig,
    current: Option<TimelineData>,
    chart: Option<TimelineChart>,
    generation: u64,
}

impl TimelineLifecycle {
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn chart(&self) -> Option<&TimelineChart> {
        self.chart.as_ref()
    }

    pub fn chart_mut(&mut self) -> Option<&mut TimelineChart> {
        self.chart.as_mut()
    }

    /// Bumped on every rebuild; views key the drawing on it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Dataset notification. Absent or empty data never touches the drawing.
    pub fn on_dataset(
        &mut self,
        data: Option<&TimelineData>,
        selected: Option<BuildNumber>,
    ) -> DatasetOutcome {
        let Some(data) = data.filter(|data| !data.is_empty()) else {
            debug!("no timeline data yet");
            return DatasetOutcome::Rejected(TimelineError::EmptyDataset);
        };

        if self.current.as_ref() == Some(data) {
            return DatasetOutcome::Unchanged;
        }

        match TimelineChart::build(data, self.config.clone(), selected) {
            Ok(chart) => {
                self.chart = Some(chart);
                self.current = Some(data.clone());
                self.generation += 1;
                debug!(
                    builds = data.len(),
                    generation = self.generation,
                    "timeline rebuilt"
                );
                DatasetOutcome::Rebuilt
            }
            Err(err) => {
                warn!(%err, "timeline dataset rejected, keeping previous drawing");
                DatasetOutcome::Rejected(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{BuildRecord, QueryParams};
    use crate::timeline::data::SeriesKind;

    fn sample() -> TimelineData {
        TimelineData::new(vec![(1, 5), (2, 3), (3, 8)], vec![(1, 1), (2, 0), (3, 2)])
    }

    #[test]
    fn first_render_focuses_most_recent_builds() {
        let chart = TimelineChart::build(&sample(), TimelineConfig::default(), None).unwrap();
        assert_eq!(chart.scene().brush.extent, (600.0, 800.0));
        assert_eq!(chart.focus_x().domain(), &[3]);

        let hidden = chart.scene().focus.bar(SeriesKind::Passed, 0).unwrap();
        assert_eq!(hidden.rect.height, 0.0);
        assert_eq!(chart.context().scales.context_x.domain(), &[1, 2, 3]);
    }

    #[test]
    fn clicking_build_two_emphasises_it_everywhere() {
        let mut chart = TimelineChart::build(&sample(), TimelineConfig::default(), Some(3)).unwrap();
        let mut state = BuildState::new(vec![
            BuildRecord::new("5.0.0-1"),
            BuildRecord::new("5.0.0-2"),
            BuildRecord::new("5.0.0-3"),
        ]);
        let mut query = QueryParams::default();

        let change = chart.select(1, &mut state, &mut query).unwrap();
        assert_eq!(change.build, Some(2));
        assert_eq!(state.selected_build(), Some(2));

        let scene = chart.scene();
        for bar in scene.focus.bars().chain(scene.context.bars()) {
            let expected = if bar.build == 2 { 1.0 } else { 0.5 };
            assert_eq!(bar.opacity, expected, "build {}", bar.build);
        }
    }

    fn sixty_builds() -> (TimelineData, BuildState) {
        let builds: Vec<u64> = (1..=60).collect();
        let data = TimelineData::new(
            builds.iter().map(|b| (*b, 40 + b % 7)).collect(),
            builds.iter().map(|b| (*b, b % 3)).collect(),
        );
        let records = builds
            .iter()
            .map(|b| BuildRecord::new(format!("5.0.0-{b}")))
            .collect();
        (data, BuildState::new(records))
    }

    #[test]
    fn tap_in_the_middle_of_any_context_bar_selects_that_build() {
        let (data, mut state) = sixty_builds();
        let mut chart = TimelineChart::build(&data, TimelineConfig::default(), None).unwrap();
        let mut query = QueryParams::default();
        let extent = chart.scene().brush.extent;

        for index in 0..data.len() {
            let bar = chart.scene().context.bar(SeriesKind::Passed, index).unwrap().clone();
            chart.drag_start(bar.rect.x + bar.rect.width / 2.0);
            assert_eq!(chart.drag_release(), Some(index), "bar {index}");
            assert_eq!(chart.scene().brush.extent, extent);

            chart.select(index, &mut state, &mut query).unwrap();
            assert_eq!(state.selected_build(), Some(bar.build), "bar {index}");
        }
    }

    #[test]
    fn dragged_press_is_not_a_tap() {
        let (data, _) = sixty_builds();
        let mut chart = TimelineChart::build(&data, TimelineConfig::default(), None).unwrap();
        chart.drag_start(300.0);
        chart.drag_move(420.0);
        assert_eq!(chart.drag_release(), None);
    }

    #[test]
    fn same_dataset_twice_is_a_no_op() {
        let mut lifecycle = TimelineLifecycle::new(TimelineConfig::default());
        assert_eq!(lifecycle.on_dataset(Some(&sample()), None), DatasetOutcome::Rebuilt);
        assert_eq!(lifecycle.on_dataset(Some(&sample()), None), DatasetOutcome::Unchanged);
        assert_eq!(lifecycle.generation(), 1);
    }

    #[test]
    fn invalid_dataset_keeps_previous_drawing() {
        let mut lifecycle = TimelineLifecycle::new(TimelineConfig::default());
        lifecycle.on_dataset(Some(&sample()), None);
        let before = lifecycle.chart().cloned();

        let broken = TimelineData::new(vec![(1, 5), (2, 3)], vec![(1, 1)]);
        let outcome = lifecycle.on_dataset(Some(&broken), None);
        assert!(matches!(
            outcome,
            DatasetOutcome::Rejected(TimelineError::MisalignedSeries { .. })
        ));
        assert_eq!(lifecycle.chart().cloned(), before);

        assert_eq!(
            lifecycle.on_dataset(None, None),
            DatasetOutcome::Rejected(TimelineError::EmptyDataset)
        );
        assert_eq!(lifecycle.generation(), 1);
    }

    #[test]
    fn new_dataset_mid_drag_restarts_from_default_extent() {
        let mut lifecycle = TimelineLifecycle::new(TimelineConfig::default());
        lifecycle.on_dataset(Some(&sample()), None);

        let chart = lifecycle.chart_mut().unwrap();
        chart.drag_start(700.0);
        assert!(chart.drag_move(100.0));
        assert!(chart.brush().is_dragging());

        let next = TimelineData::new(
            vec![(1, 5), (2, 3), (3, 8), (4, 6)],
            vec![(1, 1), (2, 0), (3, 2), (4, 1)],
        );
        assert_eq!(lifecycle.on_dataset(Some(&next), None), DatasetOutcome::Rebuilt);

        let chart = lifecycle.chart().unwrap();
        assert!(!chart.brush().is_dragging());
        assert_eq!(chart.brush().extent(), (600.0, 800.0));
        assert_eq!(chart.focus_x().domain(), &[4]);
    }
}
