//! Collaborators owned outside the timeline: the selected build, the refresh flags
//! raised for neighbouring panels, and the URL query mirror.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::timeline::BuildNumber;

pub const QUERY_BUILD: &str = "build";
pub const QUERY_EXCLUDED_PLATFORMS: &str = "excluded_platforms";
pub const QUERY_EXCLUDED_CATEGORIES: &str = "excluded_categories";

/// A build as the rest of the dashboard knows it. `Version` looks like `"4.0.0-1712"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuildRecord {
    pub version: String,
}

impl BuildRecord {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    /// Numeric suffix after the first `-`, if there is one.
    pub fn build_number(&self) -> Option<BuildNumber> {
        self.version.split('-').nth(1)?.trim().parse().ok()
    }
}

/// Shared dashboard state the timeline reads and writes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildState {
    pub selected_build_object: Option<BuildRecord>,
    /// Index-aligned with the timeline series.
    pub version_builds: Vec<BuildRecord>,
    pub refresh_sidebar: bool,
    pub refresh_jobs: bool,
}

impl BuildState {
    pub fn new(version_builds: Vec<BuildRecord>) -> Self {
        Self {
            selected_build_object: version_builds.last().cloned(),
            version_builds,
            refresh_sidebar: false,
            refresh_jobs: false,
        }
    }

    pub fn selected_build(&self) -> Option<BuildNumber> {
        self.selected_build_object
            .as_ref()
            .and_then(BuildRecord::build_number)
    }

    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected_build_object.as_ref()?;
        self.version_builds.iter().position(|b| b == selected)
    }
}

/// Write-only view of the page's query string.
pub trait QueryWriter {
    /// `None` removes the parameter.
    fn set_param(&mut self, key: &str, value: Option<&str>);
}

impl<W: QueryWriter + ?Sized> QueryWriter for &mut W {
    fn set_param(&mut self, key: &str, value: Option<&str>) {
        (**self).set_param(key, value);
    }
}

/// Fan a write out to two writers.
impl<A: QueryWriter, B: QueryWriter> QueryWriter for (A, B) {
    fn set_param(&mut self, key: &str, value: Option<&str>) {
        self.0.set_param(key, value);
        self.1.set_param(key, value);
    }
}

/// In-memory query parameters; what desktop builds show instead of an address bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<String, String>,
}

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl QueryWriter for QueryParams {
    fn set_param(&mut self, key: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.params.insert(key.to_string(), value.to_string());
            }
            None => {
                self.params.remove(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_number_is_the_version_suffix() {
        assert_eq!(BuildRecord::new("4.0.0-1712").build_number(), Some(1712));
        assert_eq!(BuildRecord::new("4.0.0").build_number(), None);
        assert_eq!(BuildRecord::new("4.0.0-rel").build_number(), None);
    }

    #[test]
    fn state_defaults_to_latest_build() {
        let state = BuildState::new(vec![BuildRecord::new("3.0.0-1"), BuildRecord::new("3.0.0-2")]);
        assert_eq!(state.selected_build(), Some(2));
        assert_eq!(state.selected_index(), Some(1));
        assert!(!state.refresh_jobs);
    }

    #[test]
    fn paired_writers_both_receive_updates() {
        let mut a = QueryParams::default();
        let mut b = QueryParams::default();
        {
            let mut both = (&mut a, &mut b);
            both.set_param(QUERY_BUILD, Some("3.0.0-2"));
            both.set_param(QUERY_EXCLUDED_PLATFORMS, Some("win"));
            both.set_param(QUERY_EXCLUDED_PLATFORMS, None);
        }
        assert_eq!(a, b);
        assert_eq!(a.to_query_string(), "build=3.0.0-2");
    }
}
