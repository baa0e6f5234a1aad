//! End-to-end flows through the public timeline API: rows in, scene and collaborator
//! state out.

use ui::core::source;
use ui::core::state::{BuildState, QueryParams, QueryWriter};
use ui::timeline::{
    DatasetOutcome, SeriesKind, TimelineChart, TimelineConfig, TimelineData, TimelineLifecycle,
};

fn hundred_builds() -> TimelineData {
    let passed = (1..=100).map(|b| (b, 50 + b % 7)).collect();
    let failed = (1..=100).map(|b| (b, b % 3)).collect();
    TimelineData::new(passed, failed)
}

#[test]
fn demo_rows_render_with_latest_build_selected() {
    let rows = source::demo_rows().expect("bundled demo parses");
    let state = BuildState::new(rows.version_builds.clone());
    let latest = state.selected_build();

    let mut lifecycle = TimelineLifecycle::new(TimelineConfig::default());
    assert_eq!(
        lifecycle.on_dataset(Some(&rows.data), latest),
        DatasetOutcome::Rebuilt
    );

    let chart = lifecycle.chart().unwrap();
    let scene = chart.scene();
    let emphasised: Vec<u64> = scene
        .context
        .bars()
        .filter(|bar| bar.opacity == 1.0)
        .map(|bar| bar.build)
        .collect();
    assert_eq!(emphasised, vec![latest.unwrap(); 2]);

    // Default brush covers the most recent quarter of the strip.
    let range = chart.brush().visible_range().unwrap();
    assert_eq!(range.end, rows.data.len() - 1);
    assert!(range.start > rows.data.len() / 2);
}

#[test]
fn brushing_everything_thins_labels_to_every_tenth_build() {
    let mut chart = TimelineChart::build(&hundred_builds(), TimelineConfig::default(), None).unwrap();
    assert!(chart.set_brush_extent((0.0, 800.0)));

    let labels: Vec<&str> = chart
        .scene()
        .focus
        .x_axis
        .ticks
        .iter()
        .map(|t| t.label.as_str())
        .collect();
    assert_eq!(labels.len(), 10);
    assert_eq!(labels[0], "1");
    assert_eq!(labels[1], "11");

    // Context ticks stay unlabelled, one per build.
    assert_eq!(chart.scene().context.x_axis.ticks.len(), 100);
}

#[test]
fn click_then_drag_keeps_selection_and_query() {
    let data = TimelineData::new(vec![(1, 5), (2, 3), (3, 8)], vec![(1, 1), (2, 0), (3, 2)]);
    let mut state = BuildState::new(vec![
        ui::core::state::BuildRecord::new("2.0.0-1"),
        ui::core::state::BuildRecord::new("2.0.0-2"),
        ui::core::state::BuildRecord::new("2.0.0-3"),
    ]);
    let mut query = QueryParams::default();
    query.set_param("excluded_platforms", Some("macos"));

    let mut chart = TimelineChart::build(&data, TimelineConfig::default(), state.selected_build()).unwrap();
    chart.select(1, &mut state, &mut query).unwrap();

    chart.drag_start(10.0);
    assert!(chart.drag_move(790.0));
    assert_eq!(chart.drag_release(), None);

    assert_eq!(query.to_query_string(), "build=2.0.0-2");
    let focus_two = chart.scene().focus.bar(SeriesKind::Passed, 1).unwrap();
    assert_eq!(focus_two.opacity, 1.0);
    assert!(focus_two.rect.height > 0.0);
    let focus_three = chart.scene().focus.bar(SeriesKind::Failed, 2).unwrap();
    assert_eq!(focus_three.opacity, 0.5);
}

#[test]
fn identical_datasets_draw_identically() {
    let first = TimelineChart::build(&hundred_builds(), TimelineConfig::default(), Some(40)).unwrap();
    let second = TimelineChart::build(&hundred_builds(), TimelineConfig::default(), Some(40)).unwrap();
    assert_eq!(first.scene(), second.scene());
    assert_eq!(first.scene().to_svg_markup(), second.scene().to_svg_markup());
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn identical_datasets_rasterise_identically() {
    let first = TimelineChart::build(&hundred_builds(), TimelineConfig::default(), None).unwrap();
    let second = TimelineChart::build(&hundred_builds(), TimelineConfig::default(), None).unwrap();

    let a = ui::export::rasterize_png(&first.scene().to_svg_markup()).unwrap();
    let b = ui::export::rasterize_png(&second.scene().to_svg_markup()).unwrap();
    assert_eq!(a, b);
}
