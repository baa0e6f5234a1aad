//! Geometry mapper: turns the two series into bar data and pixel rectangles.

use super::data::{BuildNumber, SeriesKind, TimelineSeries};
use super::scale::{BandScale, LinearScale};

/// One bar before scaling. `y` is signed: failed counts are stored negated so they
/// hang below the shared baseline while passed counts grow above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarDatum {
    pub x: usize,
    pub y: i64,
    pub y0: i64,
    pub build: BuildNumber,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub kind: SeriesKind,
    pub values: Vec<BarDatum>,
}

/// Pixel rectangle of a bar inside its strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

pub fn layer(series: &TimelineSeries) -> Layer {
    let sign = series.kind.sign();
    let values = series
        .entries
        .iter()
        .enumerate()
        .map(|(idx, (build, count))| BarDatum {
            x: idx,
            y: sign * i64::try_from(*count).unwrap_or(i64::MAX),
            y0: 0,
            build: *build,
        })
        .collect();

    Layer {
        kind: series.kind,
        values,
    }
}

/// Both layers, passed first.
pub fn layers(series: &[TimelineSeries; 2]) -> [Layer; 2] {
    [layer(&series[0]), layer(&series[1])]
}

/// Scale a datum into its strip. `None` when the build is outside the x domain.
pub fn bar_rect(datum: &BarDatum, x: &BandScale, y: &LinearScale) -> Option<BarRect> {
    let left = x.position(datum.build)?;
    let base = y.map(datum.y0 as f64);
    let tip = y.map((datum.y0 + datum.y) as f64);

    Some(BarRect {
        x: left,
        y: base.min(tip),
        width: x.bandwidth(),
        height: (base - tip).abs(),
    })
}

/// Labelled x-axis ticks for a slice of builds. Above `target` builds only every
/// `floor(len / target)`-th build keeps its label; the first one is always kept.
pub fn tick_values(builds: &[BuildNumber], target: usize) -> Vec<BuildNumber> {
    let stride = if builds.len() > target {
        (builds.len() / target.max(1)).max(1)
    } else {
        1
    };

    builds
        .iter()
        .enumerate()
        .filter(|(idx, _)| idx % stride == 0)
        .map(|(_, build)| *build)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::data::TimelineData;

    fn sample_layers() -> [Layer; 2] {
        let data = TimelineData::new(vec![(1, 5), (2, 3), (3, 8)], vec![(1, 1), (2, 0), (3, 2)]);
        layers(&data.series().unwrap())
    }

    #[test]
    fn failed_counts_are_negated_but_zero_stays_zero() {
        let [passed, failed] = sample_layers();
        assert_eq!(passed.values[2].y, 8);
        assert_eq!(failed.values[0].y, -1);
        assert_eq!(failed.values[1].y, 0);
        assert_eq!(failed.values[1].build, 2);
        assert!(failed.values.iter().all(|d| d.y0 == 0));
        assert_eq!(failed.values[2].x, 2);
    }

    #[test]
    fn passed_bars_grow_up_failed_bars_hang_down() {
        let [passed, failed] = sample_layers();
        let x = BandScale::new(vec![1, 2, 3], (0.0, 800.0), 0.08).unwrap();
        let y = LinearScale::new((0.0, 8.0), (200.0, 0.0));

        let up = bar_rect(&passed.values[0], &x, &y).unwrap();
        assert_eq!(up.y, 75.0);
        assert_eq!(up.height, 125.0);

        let down = bar_rect(&failed.values[2], &x, &y).unwrap();
        assert_eq!(down.y, 200.0);
        assert_eq!(down.height, 50.0);
        assert_eq!(down.width, x.bandwidth());
    }

    #[test]
    fn eleven_builds_keep_every_label() {
        let builds: Vec<u64> = (1..=11).collect();
        assert_eq!(tick_values(&builds, 10), builds);
    }

    #[test]
    fn hundred_builds_keep_every_tenth_label() {
        let builds: Vec<u64> = (1..=100).collect();
        let ticks = tick_values(&builds, 10);
        assert_eq!(ticks.len(), 10);
        assert_eq!(ticks[0], 1);
        assert_eq!(ticks[1], 11);
        assert_eq!(ticks[9], 91);
    }

    #[test]
    fn thinning_follows_the_visible_slice() {
        let builds: Vec<u64> = (1..=100).collect();
        let slice = &builds[70..95];
        let ticks = tick_values(slice, 10);
        assert_eq!(ticks, vec![71, 73, 75, 77, 79, 81, 83, 85, 87, 89, 91, 93, 95]);
    }
}
