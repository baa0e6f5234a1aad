//! Scale builder: banded build-number axis and linear count axis for both strips.

use super::config::TimelineConfig;
use super::data::BuildNumber;
use super::error::TimelineError;

/// Ordinal scale that gives every build an equal, pixel-rounded band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<BuildNumber>,
    range: (f64, f64),
    padding: f64,
    start: f64,
    step: f64,
    band: f64,
}

impl BandScale {
    pub fn new(
        domain: Vec<BuildNumber>,
        range: (f64, f64),
        padding: f64,
    ) -> Result<Self, TimelineError> {
        if domain.is_empty() {
            return Err(TimelineError::EmptyDataset);
        }

        let (lo, hi) = range;
        let n = domain.len() as f64;
        let step = ((hi - lo) / (n - padding)).floor().max(0.0);
        let error = hi - lo - (n - padding) * step;
        let start = lo + (error / 2.0).round();
        let band = (step * (1.0 - padding)).round();

        Ok(Self {
            domain,
            range,
            padding,
            start,
            step,
            band,
        })
    }

    /// Same pixel range and padding, new domain.
    pub fn with_domain(&self, domain: Vec<BuildNumber>) -> Result<Self, TimelineError> {
        Self::new(domain, self.range, self.padding)
    }

    pub fn domain(&self) -> &[BuildNumber] {
        &self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn bandwidth(&self) -> f64 {
        self.band
    }

    /// Left edge of the build's band, `None` when the build is not in the domain.
    pub fn position(&self, build: BuildNumber) -> Option<f64> {
        self.domain
            .iter()
            .position(|candidate| *candidate == build)
            .map(|idx| self.start + self.step * idx as f64)
    }

    pub fn center(&self, build: BuildNumber) -> Option<f64> {
        self.position(build).map(|x| x + self.band / 2.0)
    }

    /// Domain index of the band containing `px`. Padding gaps hit nothing.
    pub fn index_at(&self, px: f64) -> Option<usize> {
        if self.step <= 0.0 || px < self.start {
            return None;
        }
        let index = ((px - self.start) / self.step).floor() as usize;
        let left = self.start + self.step * index as f64;
        (index < self.domain.len() && px < left + self.band).then_some(index)
    }
}

/// Continuous scale mapping a count domain onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        // A flat domain collapses onto the range start.
        let t = if span == 0.0 { 0.0 } else { (value - d0) / span };
        r0 + (r1 - r0) * t
    }

    /// Human-friendly tick values (multiples of 1, 2 or 5 times a power of ten).
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        let span = hi - lo;
        if count == 0 || span <= 0.0 || !span.is_finite() {
            return vec![lo];
        }

        let mut step = 10f64.powf((span / count as f64).log10().floor());
        let err = count as f64 / span * step;
        if err <= 0.15 {
            step *= 10.0;
        } else if err <= 0.35 {
            step *= 5.0;
        } else if err <= 0.75 {
            step *= 2.0;
        }

        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

/// The four mappings one dataset needs: focus/context x and y.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleSet {
    pub focus_x: BandScale,
    pub context_x: BandScale,
    pub focus_y: LinearScale,
    pub context_y: LinearScale,
}

impl ScaleSet {
    pub fn build(
        builds: &[BuildNumber],
        max_passed: u64,
        config: &TimelineConfig,
    ) -> Result<Self, TimelineError> {
        let width = config.inner_width();
        let focus_x = BandScale::new(builds.to_vec(), (0.0, width), config.band_padding)?;
        let context_x = focus_x.clone();

        let value_domain = (0.0, max_passed as f64);
        let focus_y = LinearScale::new(value_domain, (config.focus_height, 0.0));
        let context_y = LinearScale::new(value_domain, (config.context_height(), 0.0));

        Ok(Self {
            focus_x,
            context_x,
            focus_y,
            context_y,
        })
    }
}
