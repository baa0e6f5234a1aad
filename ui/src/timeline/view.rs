use dioxus::prelude::*;
use tracing::debug;

#[cfg(target_arch = "wasm32")]
use crate::core::platform::BrowserQuery;
use crate::core::state::{BuildState, QueryParams};
use crate::export::TimelineExportPanel;
use crate::t;

use super::config::TimelineConfig;
use super::data::TimelineData;
use super::lifecycle::{TimelineChart, TimelineLifecycle};
use super::render::{AxisOrient, AxisShape, BarShape, LayerShape, StripKind, StripScene};

/// Signals an event handler needs to reach the chart and its collaborators.
#[derive(Clone, Copy)]
struct ChartHandles {
    lifecycle: Signal<TimelineLifecycle>,
    state: Signal<BuildState>,
    query: Signal<QueryParams>,
}

impl ChartHandles {
    fn with_chart<R>(mut self, f: impl FnOnce(&mut TimelineChart) -> R) -> Option<R> {
        let mut lifecycle = self.lifecycle.write();
        lifecycle.chart_mut().map(f)
    }

    fn select(self, index: usize) {
        let (mut state_sig, mut query_sig, mut lifecycle_sig) =
            (self.state, self.query, self.lifecycle);
        let mut state = state_sig.write();
        let mut query = query_sig.write();

        #[cfg(target_arch = "wasm32")]
        let mut writer = (&mut *query, BrowserQuery);
        #[cfg(not(target_arch = "wasm32"))]
        let mut writer = &mut *query;

        let mut lifecycle = lifecycle_sig.write();
        if let Some(chart) = lifecycle.chart_mut() {
            chart.select(index, &mut state, &mut writer);
        }
    }

    fn release(self) {
        if let Some(index) = self.with_chart(TimelineChart::drag_release).flatten() {
            self.select(index);
        }
    }
}

/// Focus + context build chart. Rebuilds once per distinct dataset; brushing and bar
/// clicks patch the drawing in place.
#[component]
pub fn BuildTimeline(
    data: ReadOnlySignal<Option<TimelineData>>,
    state: Signal<BuildState>,
    query: Signal<QueryParams>,
    #[props(default)] config: TimelineConfig,
) -> Element {
    let mut lifecycle = use_signal(move || TimelineLifecycle::new(config));
    let handles = ChartHandles {
        lifecycle,
        state,
        query,
    };

    // Memo equality is the dedupe: the effect only runs for a new dataset value.
    let dataset = use_memo(move || data());
    use_effect(move || {
        let current = dataset();
        let selected = state.peek().selected_build();
        let outcome = lifecycle.write().on_dataset(current.as_ref(), selected);
        debug!(?outcome, "timeline dataset notification");
    });

    let selected = use_memo(move || state.read().selected_build());
    use_effect(move || {
        let selected = selected();
        handles.with_chart(|chart| chart.emphasize(selected));
    });

    let (scene, visible) = {
        let lifecycle = lifecycle.read();
        let Some(chart) = lifecycle.chart() else {
            return rsx! {
                section { class: "timeline-card",
                    p { class: "timeline-card__placeholder", {t!("timeline-empty")} }
                }
            };
        };
        let builds = &chart.context().builds;
        let visible = chart
            .brush()
            .visible_range()
            .and_then(|range| Some((*builds.get(range.start)?, *builds.get(range.end)?)));
        (chart.scene().clone(), visible)
    };

    let transition = scene.bar_transition();
    let (context_left, context_top) = scene.context.origin;
    let (brush_left, brush_right) = scene.brush.extent;
    let brush_width = (brush_right - brush_left).max(0.0);
    let brush_height = scene.brush.height;
    let (svg_width, svg_height) = (scene.width, scene.height);
    let overlay_style = format!(
        "left: {context_left}px; top: {context_top}px; width: {}px; height: {brush_height}px;",
        scene.brush.width
    );
    let passed_fill = scene.focus.layers.first().map(|l| l.fill.clone()).unwrap_or_default();
    let failed_fill = scene.focus.layers.get(1).map(|l| l.fill.clone()).unwrap_or_default();

    rsx! {
        section { class: "timeline-card",
            div { class: "timeline-card__header",
                h2 { {t!("timeline-heading")} }
                ul { class: "timeline-legend",
                    li { span { class: "timeline-legend__swatch", style: "background: {passed_fill};" } {t!("timeline-legend-passed")} }
                    li { span { class: "timeline-legend__swatch", style: "background: {failed_fill};" } {t!("timeline-legend-failed")} }
                }
            }

            div { class: "timeline-card__canvas",
                svg {
                    class: "timeline",
                    width: "{svg_width}",
                    height: "{svg_height}",
                    view_box: "0 0 {svg_width} {svg_height}",
                    {strip_view(&scene.focus, &transition, handles)}
                    {strip_view(&scene.context, &transition, handles)}
                    g {
                        class: "x brush",
                        transform: "translate({context_left},{context_top})",
                        rect {
                            class: "extent",
                            x: "{brush_left}",
                            y: "0",
                            width: "{brush_width}",
                            height: "{brush_height}",
                            pointer_events: "none",
                        }
                    }
                }
                div {
                    class: "timeline-card__brush",
                    style: "{overlay_style}",
                    onmousedown: move |evt: MouseEvent| {
                        let x = evt.element_coordinates().x;
                        handles.with_chart(|chart| chart.drag_start(x));
                    },
                    onmousemove: move |evt: MouseEvent| {
                        let x = evt.element_coordinates().x;
                        handles.with_chart(|chart| {
                            if chart.brush().is_dragging() {
                                chart.drag_move(x);
                            }
                        });
                    },
                    onmouseup: move |_| handles.release(),
                    onmouseleave: move |_| {
                        handles.with_chart(|chart| {
                            if chart.brush().is_dragging() {
                                chart.drag_release();
                            }
                        });
                    },
                }
            }

            p { class: "timeline-card__hint",
                {t!("timeline-brush-hint")}
                if let Some((first, last)) = visible {
                    " "
                    strong { {t!("timeline-visible-range", first = first, last = last)} }
                }
            }

            TimelineExportPanel { scene: scene.clone() }
        }
    }
}

fn strip_view(strip: &StripScene, transition: &str, handles: ChartHandles) -> Element {
    let (left, top) = strip.origin;
    let clickable = strip.kind == StripKind::Focus;
    let layer_class = match strip.kind {
        StripKind::Focus => "layer",
        StripKind::Context => "layer2",
    };

    rsx! {
        g { class: strip.kind.class(), transform: "translate({left},{top})",
            if let Some(axis) = &strip.y_axis {
                {axis_view(axis)}
            }
            for layer in strip.layers.iter() {
                {layer_view(layer, layer_class, transition, clickable, handles)}
            }
            {axis_view(&strip.x_axis)}
        }
    }
}

fn layer_view(
    layer: &LayerShape,
    layer_class: &str,
    transition: &str,
    clickable: bool,
    handles: ChartHandles,
) -> Element {
    let series = layer.kind.name();
    rsx! {
        g { key: "{series}", class: "{layer_class} {series}", fill: "{layer.fill}",
            for bar in layer.bars.iter() {
                {bar_view(bar, transition, clickable, handles)}
            }
        }
    }
}

fn bar_view(bar: &BarShape, transition: &str, clickable: bool, handles: ChartHandles) -> Element {
    let index = bar.index;
    let rect = bar.rect;
    let class = if clickable { "bar bar--clickable" } else { "bar" };

    rsx! {
        rect {
            key: "{index}",
            class,
            "data-build": "{bar.build}",
            x: "{rect.x}",
            y: "{rect.y}",
            width: "{rect.width}",
            height: "{rect.height}",
            opacity: "{bar.opacity}",
            style: "transition: {transition};",
            onclick: move |_| {
                if clickable {
                    handles.select(index);
                }
            },
        }
    }
}

fn axis_view(axis: &AxisShape) -> Element {
    let padding = axis.padding;
    match axis.orient {
        AxisOrient::Bottom => {
            let (start, end) = axis.extent;
            rsx! {
                g { class: "x axis", transform: "translate(0,{axis.shift})",
                    for tick in axis.ticks.iter() {
                        g { class: "tick", transform: "translate({tick.offset},0)",
                            if !tick.label.is_empty() {
                                text { y: "{padding}", dy: ".71em", text_anchor: "middle", "{tick.label}" }
                            }
                        }
                    }
                    path { class: "domain", d: "M{start},0H{end}" }
                }
            }
        }
        AxisOrient::Left => {
            let grid = axis.grid;
            rsx! {
                g { class: "y axis grid",
                    for tick in axis.ticks.iter() {
                        g { class: "tick", transform: "translate(0,{tick.offset})",
                            if let Some(len) = grid {
                                line { x2: "{len}", y2: "0" }
                            }
                            text { x: "-{padding}", dy: ".32em", text_anchor: "end", "{tick.label}" }
                        }
                    }
                }
            }
        }
    }
}
