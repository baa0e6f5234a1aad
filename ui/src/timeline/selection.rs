//! Selection sync: a bar click selects a build for the whole dashboard.

use tracing::info;

use crate::core::state::{
    BuildState, QueryWriter, QUERY_BUILD, QUERY_EXCLUDED_CATEGORIES, QUERY_EXCLUDED_PLATFORMS,
};

use super::data::BuildNumber;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub index: usize,
    pub version: String,
    /// Build number parsed from the version; drives emphasis.
    pub build: Option<BuildNumber>,
}

/// Select the build at `index` of `state.version_builds`.
///
/// Writes the version to the `build` query parameter, clears the stale platform and
/// category filters and raises both refresh flags. Returns `None` without touching
/// anything when the index has no matching build.
pub fn select_build(
    state: &mut BuildState,
    query: &mut dyn QueryWriter,
    index: usize,
) -> Option<SelectionChange> {
    let record = state.version_builds.get(index)?.clone();

    query.set_param(QUERY_BUILD, Some(&record.version));
    query.set_param(QUERY_EXCLUDED_PLATFORMS, None);
    query.set_param(QUERY_EXCLUDED_CATEGORIES, None);

    state.refresh_sidebar = true;
    state.refresh_jobs = true;

    let build = record.build_number();
    info!(index, version = %record.version, ?build, "build selected");

    let change = SelectionChange {
        index,
        version: record.version.clone(),
        build,
    };
    state.selected_build_object = Some(record);
    Some(change)
}
