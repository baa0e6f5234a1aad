use dioxus::prelude::*;

use crate::core::state::{BuildState, QueryParams};
use crate::t;
use crate::timeline::{BuildTimeline, ReduceBuild, TimelineConfig, TimelineRows};

/// What a launcher hands the dashboard through context.
#[derive(Clone, Copy)]
pub struct DashboardSource {
    pub rows: Signal<Option<TimelineRows>>,
    pub config: Signal<TimelineConfig>,
}

#[component]
pub fn Dashboard() -> Element {
    let source = try_use_context::<DashboardSource>();
    let rows = source.map(|s| s.rows);
    let config = source.map(|s| s.config.read().clone()).unwrap_or_default();

    let builds_now = move || {
        rows.and_then(|rows| rows.read().as_ref().map(|r| r.version_builds.clone()))
            .unwrap_or_default()
    };

    let mut state = use_signal(|| BuildState::new(builds_now()));
    let query = use_signal(QueryParams::default);

    let data = use_memo(move || rows.and_then(|rows| rows.read().as_ref().map(|r| r.data.clone())));

    // New rows bring a new build list; the latest build becomes the selection.
    use_effect(move || {
        let builds = builds_now();
        if state.peek().version_builds != builds {
            state.set(BuildState::new(builds));
        }
    });

    let selected_row = use_memo(move || {
        let build = state.read().selected_build()?;
        let rows = rows?;
        let guard = rows.read();
        let row = guard.as_ref()?.row_for(build).cloned();
        row
    });

    rsx! {
        section { class: "page page-dashboard",
            h1 { {t!("app-title")} }
            p { class: "page-dashboard__subtitle", {t!("dashboard-subtitle")} }

            div { class: "page-dashboard__panels",
                BuildTimeline { data: data(), state, query, config }
                SelectionPanel { state, query, row: selected_row() }
            }
        }
    }
}

#[component]
fn SelectionPanel(
    state: Signal<BuildState>,
    query: Signal<QueryParams>,
    row: Option<ReduceBuild>,
) -> Element {
    let current = state.read().clone();
    let query_string = query.read().to_query_string();

    rsx! {
        aside { class: "selection-card",
            h2 { {t!("selection-heading")} }

            if let Some(record) = current.selected_build_object.as_ref() {
                if let Some(build) = record.build_number() {
                    p { class: "selection-card__build", {t!("selection-build", build = build)} }
                }
                p { class: "selection-card__meta", {t!("selection-version", version = record.version.clone())} }
                if let Some(row) = row {
                    p { class: "selection-card__meta",
                        {t!("selection-pass-rate", passed = format!("{:.1}", row.rel_passed), executed = format!("{:.1}", row.rel_executed))}
                    }
                }
            } else {
                p { class: "selection-card__placeholder", {t!("selection-none")} }
            }

            dl { class: "selection-card__query",
                dt { {t!("selection-query")} }
                dd {
                    if query_string.is_empty() {
                        {t!("selection-query-empty")}
                    } else {
                        code { "?{query_string}" }
                    }
                }
            }

            ul { class: "selection-card__flags",
                if current.refresh_sidebar {
                    li { class: "selection-card__flag", {t!("selection-refresh-sidebar")} }
                }
                if current.refresh_jobs {
                    li { class: "selection-card__flag", {t!("selection-refresh-jobs")} }
                }
            }
        }
    }
}
