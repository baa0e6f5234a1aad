//! Static renderer: builds the drawing model for the focus and context strips and
//! serialises it to SVG.
//!
//! The drawing is a plain value ([`ChartScene`]) so that the Dioxus view, the exporter
//! and the tests all read the same geometry. A scene is produced once per dataset by
//! [`full_render`]; brushing and selection only patch attributes on it.

use std::fmt::Write as _;

use super::brush::{self, FocusPatch};
use super::config::TimelineConfig;
use super::data::{BuildNumber, SeriesKind, TimelineData};
use super::error::TimelineError;
use super::geometry::{self, BarRect, Layer};
use super::scale::{BandScale, LinearScale, ScaleSet};

/// Everything derived once from a dataset. Immutable; threaded by reference into
/// geometry, drawing and brush updates.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub config: TimelineConfig,
    /// Build numbers in passed-series order.
    pub builds: Vec<BuildNumber>,
    pub layers: [Layer; 2],
    pub scales: ScaleSet,
    pub y_max: u64,
    /// Pixel width used to turn brush pixels back into series indices.
    pub context_bar_width: f64,
}

impl RenderContext {
    pub fn new(data: &TimelineData, config: TimelineConfig) -> Result<Self, TimelineError> {
        config.validate()?;
        let series = data.series()?;
        let builds = series[0].builds();
        let y_max = series[0].max_count();
        let scales = ScaleSet::build(&builds, y_max, &config)?;
        let layers = geometry::layers(&series);
        let context_bar_width = (config.inner_width() / builds.len() as f64)
            .floor()
            .max(1.0);

        Ok(Self {
            config,
            builds,
            layers,
            scales,
            y_max,
            context_bar_width,
        })
    }

    pub fn len(&self) -> usize {
        self.builds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }

    pub fn fill(&self, kind: SeriesKind) -> &str {
        match kind {
            SeriesKind::Passed => &self.config.passed_color,
            SeriesKind::Failed => &self.config.failed_color,
        }
    }

    /// Opacity of a bar given the selected build. A selection that is not part of this
    /// dataset emphasises nothing, so every bar keeps full opacity.
    pub fn bar_opacity(&self, build: BuildNumber, selected: Option<BuildNumber>) -> f64 {
        match selected {
            Some(sel) if self.builds.contains(&sel) => {
                if sel == build {
                    self.config.emphasized_opacity
                } else {
                    self.config.deemphasized_opacity
                }
            }
            _ => self.config.emphasized_opacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripKind {
    Focus,
    Context,
}

impl StripKind {
    pub fn class(self) -> &'static str {
        match self {
            StripKind::Focus => "focus",
            StripKind::Context => "context",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarShape {
    pub index: usize,
    pub build: BuildNumber,
    pub rect: BarRect,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerShape {
    pub kind: SeriesKind,
    pub fill: String,
    pub bars: Vec<BarShape>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Offset along the axis.
    pub offset: f64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrient {
    Bottom,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisShape {
    pub orient: AxisOrient,
    /// Translation of the axis group inside its strip (y for bottom, x for left).
    pub shift: f64,
    /// Pixel span of the domain rule.
    pub extent: (f64, f64),
    pub ticks: Vec<Tick>,
    /// Gridline length across the strip, if any.
    pub grid: Option<f64>,
    pub padding: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StripScene {
    pub kind: StripKind,
    pub origin: (f64, f64),
    pub height: f64,
    pub layers: Vec<LayerShape>,
    pub x_axis: AxisShape,
    pub y_axis: Option<AxisShape>,
}

impl StripScene {
    pub fn bars(&self) -> impl Iterator<Item = &BarShape> {
        self.layers.iter().flat_map(|layer| layer.bars.iter())
    }

    pub fn bar(&self, kind: SeriesKind, index: usize) -> Option<&BarShape> {
        self.layers
            .iter()
            .find(|layer| layer.kind == kind)
            .and_then(|layer| layer.bars.iter().find(|bar| bar.index == index))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushShape {
    pub extent: (f64, f64),
    pub height: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartScene {
    pub width: f64,
    pub height: f64,
    pub focus: StripScene,
    pub context: StripScene,
    pub brush: BrushShape,
    pub transition_ms: u32,
    pub transition_delay_ms: u32,
}

/// Full drawing for a freshly loaded dataset, before the first brush event.
pub fn full_render(ctx: &RenderContext, selected: Option<BuildNumber>) -> ChartScene {
    let config = &ctx.config;
    let width = config.inner_width();

    let focus = StripScene {
        kind: StripKind::Focus,
        origin: (config.margin.left, config.margin.top),
        height: config.focus_height,
        layers: draw_layers(ctx, &ctx.scales.focus_x, &ctx.scales.focus_y, selected),
        x_axis: bottom_axis(
            &ctx.scales.focus_x,
            &geometry::tick_values(&ctx.builds, config.x_tick_target),
            config.focus_height,
            config.tick_padding,
            true,
        ),
        y_axis: Some(value_axis(&ctx.scales.focus_y, config.y_ticks, width, config.tick_padding)),
    };

    let context_height = config.context_height();
    let context = StripScene {
        kind: StripKind::Context,
        origin: (config.margin.left, config.context_top()),
        height: context_height,
        layers: draw_layers(ctx, &ctx.scales.context_x, &ctx.scales.context_y, selected),
        x_axis: bottom_axis(
            &ctx.scales.context_x,
            &ctx.builds,
            context_height,
            config.tick_padding,
            false,
        ),
        y_axis: None,
    };

    ChartScene {
        width: config.width,
        height: config.outer_height(),
        focus,
        context,
        brush: BrushShape {
            extent: brush::default_extent(config),
            height: context_height,
            width,
        },
        transition_ms: config.transition_ms,
        transition_delay_ms: config.transition_delay_ms,
    }
}

fn draw_layers(
    ctx: &RenderContext,
    x: &BandScale,
    y: &LinearScale,
    selected: Option<BuildNumber>,
) -> Vec<LayerShape> {
    ctx.layers
        .iter()
        .map(|layer| LayerShape {
            kind: layer.kind,
            fill: ctx.fill(layer.kind).to_string(),
            bars: layer
                .values
                .iter()
                .filter_map(|datum| {
                    geometry::bar_rect(datum, x, y).map(|rect| BarShape {
                        index: datum.x,
                        build: datum.build,
                        rect,
                        opacity: ctx.bar_opacity(datum.build, selected),
                    })
                })
                .collect(),
        })
        .collect()
}

/// Bottom axis over `values`. Unlabelled axes still carry their ticks so the
/// context strip shows a plain rule.
pub(crate) fn bottom_axis(
    x: &BandScale,
    values: &[BuildNumber],
    shift: f64,
    padding: f64,
    labelled: bool,
) -> AxisShape {
    AxisShape {
        orient: AxisOrient::Bottom,
        shift,
        extent: x.range(),
        ticks: x_ticks(x, values, labelled),
        grid: None,
        padding,
    }
}

pub(crate) fn x_ticks(x: &BandScale, values: &[BuildNumber], labelled: bool) -> Vec<Tick> {
    values
        .iter()
        .filter_map(|build| {
            x.center(*build).map(|offset| Tick {
                offset,
                label: if labelled {
                    build.to_string()
                } else {
                    String::new()
                },
            })
        })
        .collect()
}

fn value_axis(y: &LinearScale, count: usize, grid: f64, padding: f64) -> AxisShape {
    let (r0, r1) = y.range();
    AxisShape {
        orient: AxisOrient::Left,
        shift: 0.0,
        extent: (r1.min(r0), r1.max(r0)),
        ticks: y
            .ticks(count)
            .into_iter()
            .map(|value| Tick {
                offset: y.map(value),
                label: format_count(value),
            })
            .collect(),
        grid: Some(grid),
        padding,
    }
}

fn format_count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

impl ChartScene {
    /// Apply a brush update: move/resize focus bars and swap the focus x ticks.
    /// Nothing else in the scene is touched.
    pub fn apply_focus_patch(&mut self, patch: &FocusPatch) {
        for change in &patch.bars {
            if let Some(bar) = self
                .focus
                .layers
                .iter_mut()
                .find(|layer| layer.kind == change.kind)
                .and_then(|layer| layer.bars.iter_mut().find(|bar| bar.index == change.index))
            {
                bar.rect.x = change.x;
                bar.rect.width = change.width;
                bar.rect.height = change.height;
            }
        }
        self.focus.x_axis.ticks = patch.ticks.clone();
    }

    /// Recompute bar opacity in both strips for `selected`.
    pub fn apply_emphasis(&mut self, ctx: &RenderContext, selected: Option<BuildNumber>) {
        for strip in [&mut self.focus, &mut self.context] {
            for layer in strip.layers.iter_mut() {
                for bar in layer.bars.iter_mut() {
                    bar.opacity = ctx.bar_opacity(bar.build, selected);
                }
            }
        }
    }

    pub fn set_brush_extent(&mut self, extent: (f64, f64)) {
        self.brush.extent = extent;
    }

    pub fn bar_transition(&self) -> String {
        format!(
            "opacity {}ms ease {}ms",
            self.transition_ms, self.transition_delay_ms
        )
    }

    /// Standalone SVG document of the current drawing. Same scene, same bytes.
    pub fn to_svg_markup(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"timeline\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = self.width,
            h = self.height
        );
        out.push_str("<rect class=\"background\" width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>");
        self.write_strip(&mut out, &self.focus, false);
        self.write_strip(&mut out, &self.context, true);
        out.push_str("</svg>");
        out
    }

    fn write_strip(&self, out: &mut String, strip: &StripScene, with_brush: bool) {
        let _ = write!(
            out,
            "<g class=\"{}\" transform=\"translate({},{})\">",
            strip.kind.class(),
            strip.origin.0,
            strip.origin.1
        );

        if let Some(axis) = &strip.y_axis {
            write_axis(out, axis);
        }

        let layer_class = match strip.kind {
            StripKind::Focus => "layer",
            StripKind::Context => "layer2",
        };
        for layer in &strip.layers {
            let _ = write!(
                out,
                "<g class=\"{layer_class} {}\" fill=\"{}\">",
                layer.kind.name(),
                layer.fill
            );
            for bar in &layer.bars {
                let _ = write!(
                    out,
                    "<rect data-build=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" opacity=\"{}\"/>",
                    bar.build, bar.rect.x, bar.rect.y, bar.rect.width, bar.rect.height, bar.opacity
                );
            }
            out.push_str("</g>");
        }

        write_axis(out, &strip.x_axis);

        if with_brush {
            let (left, right) = self.brush.extent;
            let _ = write!(
                out,
                "<g class=\"x brush\"><rect class=\"extent\" x=\"{}\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"#000000\" fill-opacity=\"0.125\" stroke=\"#ffffff\"/></g>",
                left,
                (right - left).max(0.0),
                self.brush.height
            );
        }

        out.push_str("</g>");
    }
}

fn write_axis(out: &mut String, axis: &AxisShape) {
    match axis.orient {
        AxisOrient::Bottom => {
            let _ = write!(
                out,
                "<g class=\"x axis\" transform=\"translate(0,{})\">",
                axis.shift
            );
            for tick in &axis.ticks {
                let _ = write!(
                    out,
                    "<g class=\"tick\" transform=\"translate({},0)\">",
                    tick.offset
                );
                if !tick.label.is_empty() {
                    let _ = write!(
                        out,
                        "<text y=\"{}\" dy=\".71em\" text-anchor=\"middle\" font-size=\"10\" fill=\"#333333\">{}</text>",
                        axis.padding, tick.label
                    );
                }
                out.push_str("</g>");
            }
            let _ = write!(
                out,
                "<path class=\"domain\" d=\"M{},0H{}\" stroke=\"#999999\" fill=\"none\"/>",
                axis.extent.0, axis.extent.1
            );
        }
        AxisOrient::Left => {
            out.push_str("<g class=\"y axis grid\">");
            for tick in &axis.ticks {
                let _ = write!(
                    out,
                    "<g class=\"tick\" transform=\"translate(0,{})\">",
                    tick.offset
                );
                if let Some(len) = axis.grid {
                    let _ = write!(
                        out,
                        "<line x2=\"{len}\" y2=\"0\" stroke=\"#e5e5e5\"/>"
                    );
                }
                let _ = write!(
                    out,
                    "<text x=\"-{}\" dy=\".32em\" text-anchor=\"end\" font-size=\"10\" fill=\"#333333\">{}</text></g>",
                    axis.padding, tick.label
                );
            }
        }
    }
    out.push_str("</g>");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ctx() -> RenderContext {
        let data = TimelineData::new(vec![(1, 5), (2, 3), (3, 8)], vec![(1, 1), (2, 0), (3, 2)]);
        RenderContext::new(&data, TimelineConfig::default()).unwrap()
    }

    #[test]
    fn context_carries_derived_values() {
        let ctx = sample_ctx();
        assert_eq!(ctx.y_max, 8);
        assert_eq!(ctx.scales.focus_y.domain(), (0.0, 8.0));
        assert_eq!(ctx.context_bar_width, 266.0);
        assert_eq!(ctx.fill(SeriesKind::Failed), "#de0000");
    }

    #[test]
    fn misaligned_data_never_reaches_a_scale() {
        let data = TimelineData::new(vec![(1, 5), (2, 3)], vec![(1, 1)]);
        let err = RenderContext::new(&data, TimelineConfig::default()).unwrap_err();
        assert!(matches!(err, TimelineError::MisalignedSeries { .. }));
    }

    #[test]
    fn both_strips_get_both_layers() {
        let ctx = sample_ctx();
        let scene = full_render(&ctx, None);
        assert_eq!(scene.focus.layers.len(), 2);
        assert_eq!(scene.context.bars().count(), 6);

        let focus_bar = scene.focus.bar(SeriesKind::Passed, 2).unwrap();
        let context_bar = scene.context.bar(SeriesKind::Passed, 2).unwrap();
        assert_eq!(focus_bar.rect.height, 230.0);
        assert_eq!(context_bar.rect.height, 57.5);
        assert_eq!(focus_bar.rect.x, context_bar.rect.x);

        let failed = scene.focus.bar(SeriesKind::Failed, 2).unwrap();
        assert_eq!(failed.rect.y, 230.0);
        assert!(failed.rect.height > 0.0);
    }

    #[test]
    fn focus_has_value_grid_context_has_bare_rule() {
        let ctx = sample_ctx();
        let scene = full_render(&ctx, None);

        let y_axis = scene.focus.y_axis.as_ref().unwrap();
        assert_eq!(y_axis.grid, Some(800.0));
        let labels: Vec<&str> = y_axis.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0", "2", "4", "6", "8"]);

        assert!(scene.context.y_axis.is_none());
        assert_eq!(scene.context.x_axis.ticks.len(), 3);
        assert!(scene.context.x_axis.ticks.iter().all(|t| t.label.is_empty()));
    }

    #[test]
    fn selection_outside_dataset_dims_nothing() {
        let ctx = sample_ctx();
        let scene = full_render(&ctx, Some(42));
        assert!(scene.focus.bars().all(|bar| bar.opacity == 1.0));

        let scene = full_render(&ctx, Some(3));
        assert_eq!(scene.focus.bar(SeriesKind::Passed, 2).unwrap().opacity, 1.0);
        assert_eq!(scene.context.bar(SeriesKind::Failed, 0).unwrap().opacity, 0.5);
    }

    #[test]
    fn markup_is_deterministic() {
        let ctx = sample_ctx();
        let first = full_render(&ctx, Some(2)).to_svg_markup();
        let second = full_render(&ctx, Some(2)).to_svg_markup();
        assert_eq!(first, second);
        assert!(first.starts_with("<svg"));
        assert!(first.contains("class=\"x brush\""));
        assert!(first.contains("fill=\"#3bc93b\""));
    }
}
