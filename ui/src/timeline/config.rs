//! Layout and styling knobs for the build timeline.

use serde::{Deserialize, Serialize};

use super::error::TimelineError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 10.0,
            bottom: 60.0,
            left: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Outer SVG width.
    pub width: f64,
    /// Drawable height of the focus strip.
    pub focus_height: f64,
    /// Context strip height as a fraction of the focus height.
    pub context_ratio: f64,
    pub margin: Margin,
    /// Space kept below the context strip.
    pub context_gap_bottom: f64,
    pub band_padding: f64,
    pub y_ticks: usize,
    /// Roughly how many labelled ticks the focus x-axis should carry.
    pub x_tick_target: usize,
    pub tick_padding: f64,
    /// Share of the context width covered by the brush when a chart loads.
    pub brush_fraction: f64,
    pub passed_color: String,
    pub failed_color: String,
    pub emphasized_opacity: f64,
    pub deemphasized_opacity: f64,
    pub transition_ms: u32,
    pub transition_delay_ms: u32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            width: 860.0,
            focus_height: 230.0,
            context_ratio: 0.25,
            margin: Margin::default(),
            context_gap_bottom: 30.0,
            band_padding: 0.08,
            y_ticks: 3,
            x_tick_target: 10,
            tick_padding: 6.0,
            brush_fraction: 0.25,
            passed_color: "#3bc93b".to_string(),
            failed_color: "#de0000".to_string(),
            emphasized_opacity: 1.0,
            deemphasized_opacity: 0.5,
            transition_ms: 250,
            transition_delay_ms: 1,
        }
    }
}

impl TimelineConfig {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    pub fn from_json(raw: &str) -> Result<Self, TimelineError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|err| TimelineError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TimelineError> {
        let invalid = |msg: &str| Err(TimelineError::InvalidConfig(msg.to_string()));

        if !(self.inner_width() > 0.0) {
            return invalid("width must exceed left + right margins");
        }
        if !(self.focus_height > 0.0) {
            return invalid("focus_height must be positive");
        }
        if !(self.context_ratio > 0.0 && self.context_ratio <= 1.0) {
            return invalid("context_ratio must be in (0, 1]");
        }
        if !(0.0..1.0).contains(&self.band_padding) {
            return invalid("band_padding must be in [0, 1)");
        }
        if !(0.0..=1.0).contains(&self.brush_fraction) {
            return invalid("brush_fraction must be in [0, 1]");
        }
        if self.x_tick_target == 0 {
            return invalid("x_tick_target must be at least 1");
        }
        Ok(())
    }

    /// Drawable width shared by both strips.
    pub fn inner_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    pub fn context_height(&self) -> f64 {
        self.focus_height * self.context_ratio
    }

    /// Offset of the context strip's top edge inside the SVG.
    pub fn context_top(&self) -> f64 {
        self.margin.top + self.focus_height + self.margin.bottom
    }

    pub fn outer_height(&self) -> f64 {
        self.context_top() + self.context_height() + self.context_gap_bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_derive_quarter_height_context() {
        let config = TimelineConfig::default();
        assert_eq!(config.inner_width(), 800.0);
        assert_eq!(config.context_height(), 57.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let config = TimelineConfig::from_json(r#"{"width": 1060, "y_ticks": 5}"#).unwrap();
        assert_eq!(config.inner_width(), 1000.0);
        assert_eq!(config.y_ticks, 5);
        assert_eq!(config.passed_color, "#3bc93b");
    }

    #[test]
    fn rejects_nonsense_geometry() {
        let err = TimelineConfig::from_json(r#"{"width": 40}"#).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidConfig(_)));

        let err = TimelineConfig::from_json(r#"{"band_padding": 1.5}"#).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidConfig(_)));

        assert!(TimelineConfig::from_json("not json").is_err());
    }
}
