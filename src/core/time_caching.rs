//! Time-caching modes.
//!
//! Controls whether the loader cooks an asset once, at every time the
//! engine chooses, or over an explicit range.

use std::fmt;

use tracing::warn;

use crate::util::{time_eq, TimeCode};

/// Upper bound on the number of cook times a range may expand to.
pub const MAX_RANGE_SAMPLES: usize = 100_000;

/// Time-caching mode tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimeCaching {
    /// Cook once at the sample time.
    #[default]
    None,
    /// Cook at every time the engine reports for the asset.
    Continuous,
    /// Cook at `start, start + interval, ...` up to `end`.
    Range,
}

impl TimeCaching {
    /// Mode string as written in metadata and cook arguments.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Continuous => "continuous",
            Self::Range => "range",
        }
    }

    /// Parse a mode string. Unknown strings yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "continuous" => Some(Self::Continuous),
            "range" => Some(Self::Range),
            _ => None,
        }
    }

    /// True for the modes that produce time-sampled attributes.
    pub fn is_animated(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for TimeCaching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit cook range for [`TimeCaching::Range`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeCacheRange {
    pub start: TimeCode,
    pub end: TimeCode,
    pub interval: TimeCode,
}

impl TimeCacheRange {
    pub fn new(start: TimeCode, end: TimeCode, interval: TimeCode) -> Self {
        Self { start, end, interval }
    }

    /// Cook times covered by this range, ascending.
    ///
    /// A non-positive interval, a non-finite end or an end before the
    /// start collapses the range to its start; a non-finite start cooks
    /// once at 0. The end is included when it falls on the grid, and at
    /// most [`MAX_RANGE_SAMPLES`] times are produced.
    pub fn times(&self) -> Vec<TimeCode> {
        if !self.start.is_finite() {
            warn!("Non-finite time cache start {}, cooking at 0", self.start);
            return vec![0.0];
        }
        if !(self.interval > 0.0) || !self.end.is_finite() || self.end < self.start {
            return vec![self.start];
        }

        let steps = ((self.end - self.start) / self.interval).floor();
        let max_steps = (MAX_RANGE_SAMPLES - 1) as f64;
        if steps > max_steps {
            warn!(
                "Time cache range {}..{} by {} exceeds {MAX_RANGE_SAMPLES} samples, truncating",
                self.start, self.end, self.interval
            );
        }
        let count = (steps.min(max_steps) as usize).saturating_add(1);
        let mut times: Vec<TimeCode> = (0..count)
            .map(|i| self.start + i as TimeCode * self.interval)
            .collect();

        // Floating-point drift can leave the end just past the last step.
        if count < MAX_RANGE_SAMPLES {
            let next = self.start + count as TimeCode * self.interval;
            if time_eq(next, self.end) {
                times.push(self.end);
            }
        }
        times
    }
}

impl Default for TimeCacheRange {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

/// Dependency token threaded from argument composition to change
/// detection.
///
/// Records the time-caching mode that composition selected. An empty
/// token (the default) makes every field change count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DependencyContext {
    time_caching: Option<TimeCaching>,
}

impl DependencyContext {
    pub fn new(time_caching: TimeCaching) -> Self {
        Self {
            time_caching: Some(time_caching),
        }
    }

    /// The recorded mode, if composition ran.
    pub fn time_caching(&self) -> Option<TimeCaching> {
        self.time_caching
    }

    pub fn is_empty(&self) -> bool {
        self.time_caching.is_none()
    }
}

impl From<TimeCaching> for DependencyContext {
    fn from(mode: TimeCaching) -> Self {
        Self::new(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_strings() {
        for mode in [TimeCaching::None, TimeCaching::Continuous, TimeCaching::Range] {
            assert_eq!(TimeCaching::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(TimeCaching::parse("Range"), None);
        assert_eq!(TimeCaching::default(), TimeCaching::None);
    }

    #[test]
    fn test_range_times() {
        let times = TimeCacheRange::new(1.0, 3.0, 0.5).times();
        assert_eq!(times, vec![1.0, 1.5, 2.0, 2.5, 3.0]);

        let times = TimeCacheRange::new(0.0, 1.0, 0.4).times();
        assert_eq!(times.len(), 3);
        assert!((times[2] - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_range_drift_includes_end() {
        let times = TimeCacheRange::new(0.0, 1.0, 0.1).times();
        assert_eq!(times.len(), 11);
        assert!((times[10] - 1.0).abs() < 1e-9);
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_degenerate_ranges() {
        assert_eq!(TimeCacheRange::new(5.0, 1.0, 1.0).times(), vec![5.0]);
        assert_eq!(TimeCacheRange::new(5.0, 10.0, 0.0).times(), vec![5.0]);
        assert_eq!(TimeCacheRange::new(5.0, 10.0, f64::NAN).times(), vec![5.0]);
        assert_eq!(
            TimeCacheRange::new(0.0, 1e12, 1.0).times().len(),
            MAX_RANGE_SAMPLES
        );
    }

    #[test]
    fn test_tiny_interval_is_capped() {
        let times = TimeCacheRange::new(0.0, 1.0, 1e-30).times();
        assert_eq!(times.len(), MAX_RANGE_SAMPLES);
        assert_eq!(times[0], 0.0);
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_non_finite_bounds() {
        assert_eq!(TimeCacheRange::new(0.0, f64::INFINITY, 1.0).times(), vec![0.0]);
        assert_eq!(TimeCacheRange::new(2.0, f64::NAN, 1.0).times(), vec![2.0]);
        assert_eq!(TimeCacheRange::new(f64::NAN, 10.0, 1.0).times(), vec![0.0]);
        assert_eq!(TimeCacheRange::new(f64::NEG_INFINITY, 10.0, 1.0).times(), vec![0.0]);
        assert_eq!(TimeCacheRange::new(1.0, 5.0, f64::INFINITY).times(), vec![1.0]);
    }
}
