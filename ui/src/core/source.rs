//! Where the dashboard's rows and chart config come from.

use tracing::{info, warn};

use crate::timeline::{timeline_from_json, TimelineConfig, TimelineRows};

/// Bundled sample payload in the results service's row format.
pub const DEMO_TIMELINE_JSON: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/demo/timeline.json"
));

pub const TIMELINE_ENV: &str = "GREENBOARD_TIMELINE";
pub const CONFIG_ENV: &str = "GREENBOARD_CONFIG";

pub fn demo_rows() -> Option<TimelineRows> {
    match timeline_from_json(DEMO_TIMELINE_JSON) {
        Ok(rows) => Some(rows),
        Err(err) => {
            warn!(%err, "bundled demo timeline is unusable");
            None
        }
    }
}

/// Rows from the file named by `GREENBOARD_TIMELINE`, else the bundled demo.
#[cfg(not(target_arch = "wasm32"))]
pub fn rows_from_env() -> Option<TimelineRows> {
    let Some(path) = std::env::var_os(TIMELINE_ENV) else {
        return demo_rows();
    };

    let loaded = std::fs::read_to_string(&path)
        .map_err(|err| err.to_string())
        .and_then(|raw| timeline_from_json(&raw).map_err(|err| err.to_string()));
    match loaded {
        Ok(rows) => {
            info!(path = %path.to_string_lossy(), builds = rows.data.len(), "timeline loaded");
            Some(rows)
        }
        Err(err) => {
            warn!(path = %path.to_string_lossy(), %err, "falling back to demo timeline");
            demo_rows()
        }
    }
}

/// Config from the file named by `GREENBOARD_CONFIG`; defaults when unset or invalid.
#[cfg(not(target_arch = "wasm32"))]
pub fn config_from_env() -> TimelineConfig {
    let Some(path) = std::env::var_os(CONFIG_ENV) else {
        return TimelineConfig::default();
    };

    let loaded = std::fs::read_to_string(&path)
        .map_err(|err| err.to_string())
        .and_then(|raw| TimelineConfig::from_json(&raw).map_err(|err| err.to_string()));
    match loaded {
        Ok(config) => config,
        Err(err) => {
            warn!(path = %path.to_string_lossy(), %err, "using default timeline config");
            TimelineConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_payload_skips_placeholder_rows() {
        let rows = demo_rows().unwrap();
        assert_eq!(rows.data.len(), 60);
        assert_eq!(rows.version_builds.len(), 60);
        assert!(rows
            .version_builds
            .iter()
            .all(|b| !b.version.contains("XX") && b.build_number().is_some()));
    }
}
