//! Brush controller: the draggable window over the context strip and the partial focus
//! update it drives.

use tracing::debug;

use super::config::TimelineConfig;
use super::data::SeriesKind;
use super::error::TimelineError;
use super::geometry;
use super::render::{self, RenderContext, Tick};
use super::scale::BandScale;

/// Pixel extent a chart starts with: the most recent `brush_fraction` of the strip.
pub fn default_extent(config: &TimelineConfig) -> (f64, f64) {
    let width = config.inner_width();
    (width - width * config.brush_fraction, width)
}

/// Inclusive window of series indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    pub start: usize,
    pub end: usize,
}

impl IndexRange {
    pub fn contains(&self, idx: usize) -> bool {
        idx >= self.start && idx <= self.end
    }
}

/// Turn a pixel extent into the series indices it covers, clamped to the dataset.
pub fn resolve_extent(ctx: &RenderContext, extent: (f64, f64)) -> Result<IndexRange, TimelineError> {
    let (left, right) = (extent.0.min(extent.1), extent.0.max(extent.1));
    let lval = (left / ctx.context_bar_width).floor().max(0.0);
    let rval = (right / ctx.context_bar_width).floor();

    let len = ctx.len();
    if len == 0 || !lval.is_finite() || !rval.is_finite() || rval < 0.0 {
        return Err(TimelineError::EmptyBrushRange);
    }

    let start = lval as usize;
    let end = (rval as usize).min(len - 1);
    if start > end {
        return Err(TimelineError::EmptyBrushRange);
    }
    Ok(IndexRange { start, end })
}

/// Changed attributes of one focus bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarPatch {
    pub kind: SeriesKind,
    pub index: usize,
    pub x: f64,
    pub width: f64,
    pub height: f64,
}

/// Everything a brush change alters in the focus strip.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusPatch {
    pub range: IndexRange,
    pub focus_x: BandScale,
    pub bars: Vec<BarPatch>,
    pub ticks: Vec<Tick>,
}

/// Re-domain the focus x scale to `range` and recompute bar positions, widths and
/// heights. Bars outside the range stay in the drawing with zero height, parked at the
/// nearest edge.
pub fn focus_patch(ctx: &RenderContext, range: IndexRange) -> Result<FocusPatch, TimelineError> {
    let visible = ctx
        .builds
        .get(range.start..=range.end)
        .filter(|slice| !slice.is_empty())
        .ok_or(TimelineError::EmptyBrushRange)?;

    let focus_x = ctx.scales.focus_x.with_domain(visible.to_vec())?;
    let (lo, hi) = focus_x.range();

    let mut bars = Vec::with_capacity(ctx.len() * ctx.layers.len());
    for layer in &ctx.layers {
        for datum in &layer.values {
            let rect = range
                .contains(datum.x)
                .then(|| geometry::bar_rect(datum, &focus_x, &ctx.scales.focus_y))
                .flatten();

            let patch = match rect {
                Some(rect) => BarPatch {
                    kind: layer.kind,
                    index: datum.x,
                    x: rect.x,
                    width: rect.width,
                    height: rect.height,
                },
                None => BarPatch {
                    kind: layer.kind,
                    index: datum.x,
                    x: if datum.x < range.start { lo } else { hi },
                    width: focus_x.bandwidth(),
                    height: 0.0,
                },
            };
            bars.push(patch);
        }
    }

    let tick_builds = geometry::tick_values(visible, ctx.config.x_tick_target);
    let ticks = render::x_ticks(&focus_x, &tick_builds, true);

    Ok(FocusPatch {
        range,
        focus_x,
        bars,
        ticks,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragMode {
    /// Pointer went down inside the extent; the window slides keeping its width.
    Move { grab: f64 },
    /// Pointer went down outside; a new window is swept from `anchor`.
    Select { anchor: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushState {
    Idle,
    Dragging(DragMode),
}

/// Where the pointer went down and the extent at that moment.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Press {
    at: f64,
    previous: (f64, f64),
    moved: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrushController {
    state: BrushState,
    extent: (f64, f64),
    width: f64,
    visible: Option<IndexRange>,
    press: Option<Press>,
}

impl BrushController {
    pub fn new(config: &TimelineConfig) -> Self {
        Self {
            state: BrushState::Idle,
            extent: default_extent(config),
            width: config.inner_width(),
            visible: None,
            press: None,
        }
    }

    pub fn state(&self) -> BrushState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, BrushState::Dragging(_))
    }

    pub fn extent(&self) -> (f64, f64) {
        self.extent
    }

    /// Index window of the last applied brush change.
    pub fn visible_range(&self) -> Option<IndexRange> {
        self.visible
    }

    pub fn drag_start(&mut self, px: f64) {
        let px = self.clamp(px);
        self.press = Some(Press {
            at: px,
            previous: self.extent,
            moved: false,
        });
        let (left, right) = self.extent;
        let mode = if right > left && px >= left && px <= right {
            DragMode::Move { grab: px - left }
        } else {
            self.extent = (px, px);
            DragMode::Select { anchor: px }
        };
        self.state = BrushState::Dragging(mode);
    }

    /// Every move while dragging fires a brush change synchronously.
    pub fn drag_move(&mut self, ctx: &RenderContext, px: f64) -> Option<FocusPatch> {
        let BrushState::Dragging(mode) = self.state else {
            return None;
        };
        let px = self.clamp(px);
        if let Some(press) = self.press.as_mut() {
            press.moved = true;
        }

        self.extent = match mode {
            DragMode::Move { grab } => {
                let span = self.extent.1 - self.extent.0;
                let left = (px - grab).clamp(0.0, (self.width - span).max(0.0));
                (left, left + span)
            }
            DragMode::Select { anchor } => (anchor.min(px), anchor.max(px)),
        };
        self.brush_changed(ctx)
    }

    /// End the drag. A press that never moved is a tap: the extent goes back to what
    /// it was and the tapped pixel is returned.
    pub fn drag_release(&mut self) -> Option<f64> {
        self.state = BrushState::Idle;
        let press = self.press.take()?;
        if press.moved {
            return None;
        }
        self.extent = press.previous;
        Some(press.at)
    }

    /// Programmatic extent change; fires a brush change immediately.
    pub fn set_extent(&mut self, ctx: &RenderContext, extent: (f64, f64)) -> Option<FocusPatch> {
        let (a, b) = (self.clamp(extent.0), self.clamp(extent.1));
        self.extent = (a.min(b), a.max(b));
        self.brush_changed(ctx)
    }

    /// Resolve the current extent into a focus patch. An extent that covers no build
    /// leaves the previous focus view in place.
    pub fn brush_changed(&mut self, ctx: &RenderContext) -> Option<FocusPatch> {
        match resolve_extent(ctx, self.extent).and_then(|range| focus_patch(ctx, range)) {
            Ok(patch) => {
                debug!(
                    start = patch.range.start,
                    end = patch.range.end,
                    "brush changed"
                );
                self.visible = Some(patch.range);
                Some(patch)
            }
            Err(err) => {
                debug!(extent = ?self.extent, %err, "brush change ignored");
                None
            }
        }
    }

    fn clamp(&self, px: f64) -> f64 {
        if px.is_nan() {
            0.0
        } else {
            px.clamp(0.0, self.width)
        }
    }
}
