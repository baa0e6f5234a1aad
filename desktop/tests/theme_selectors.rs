#![cfg(test)]
/*!
Theme selector lint for the desktop build.

The dashboard components emit these class names; if a refactor renames one in the theme
without touching the markup (or the other way round) the packaged app silently loses
styling. A substring check is enough as an early warning.

When a component's structural classes change, update REQUIRED_SELECTORS with it.
*/

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

const REQUIRED_SELECTORS: &[&str] = &[
    // Global / layout
    ":root",
    "body {",
    ".page {",
    ".page-dashboard__panels",
    ".visually-hidden",
    // Navbar
    ".navbar__inner",
    ".navbar__brand",
    ".navbar__locale",
    // Timeline card and drawing
    ".timeline-card",
    ".timeline-card__canvas",
    ".timeline-card__brush",
    ".timeline-card__placeholder",
    ".timeline-legend__swatch",
    ".bar--clickable",
    ".brush .extent",
    ".grid line",
    // Selection panel
    ".selection-card",
    ".selection-card__build",
    ".selection-card__flag",
    // Export panel
    ".export-card__actions",
    ".export-card__meta--success",
    ".export-card__meta--error",
    // Buttons
    ".button {",
    ".button--primary",
    ".button--ghost",
    "@media",
];

#[test]
fn theme_contains_required_selectors() {
    let missing: Vec<&str> = REQUIRED_SELECTORS
        .iter()
        .copied()
        .filter(|selector| !THEME_CSS.contains(selector))
        .collect();

    assert!(
        missing.is_empty(),
        "Theme is missing {} selector(s):\n  {}",
        missing.len(),
        missing.join("\n  ")
    );
}

#[test]
fn timeline_colours_are_not_overridden_by_theme() {
    // Bar fills come from the chart config; the theme must not force a fill on bars.
    assert!(!THEME_CSS.contains(".bar {"));
}
