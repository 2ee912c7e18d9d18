//! Time-sampled attribute values.
//!
//! Samples are kept strictly ascending by time. Lookups between samples
//! hold the earlier value; lookups before the first sample return the
//! first one.

use crate::util::{time_eq, TimeCode, Value};

/// Ordered `(time, value)` samples for one attribute.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeSamples {
    samples: Vec<(TimeCode, Value)>,
}

impl TimeSamples {
    /// Create an empty sample set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sample, replacing any sample already at `time`.
    pub fn insert(&mut self, time: TimeCode, value: Value) {
        match self.search(time) {
            Ok(idx) => self.samples[idx].1 = value,
            Err(idx) => self.samples.insert(idx, (time, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample times, ascending.
    pub fn times(&self) -> Vec<TimeCode> {
        self.samples.iter().map(|(t, _)| *t).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TimeCode, &Value)> {
        self.samples.iter().map(|(t, v)| (*t, v))
    }

    pub fn first_time(&self) -> Option<TimeCode> {
        self.samples.first().map(|(t, _)| *t)
    }

    pub fn last_time(&self) -> Option<TimeCode> {
        self.samples.last().map(|(t, _)| *t)
    }

    /// Value authored exactly at `time`.
    pub fn get(&self, time: TimeCode) -> Option<&Value> {
        self.search(time).ok().map(|idx| &self.samples[idx].1)
    }

    /// Find the floor index (largest index with time <= given time).
    pub fn floor_index(&self, time: TimeCode) -> Option<usize> {
        let mut lo = 0;
        let mut hi = self.samples.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let t = self.samples[mid].0;
            if t <= time || time_eq(t, time) {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        if lo > 0 {
            Some(lo - 1)
        } else {
            None
        }
    }

    /// Samples surrounding `time`.
    ///
    /// Returns the same time twice when `time` falls on a sample or
    /// outside the sampled range.
    pub fn bracketing(&self, time: TimeCode) -> Option<(TimeCode, TimeCode)> {
        let first = self.first_time()?;
        let last = self.last_time()?;
        if time <= first {
            return Some((first, first));
        }
        if time >= last {
            return Some((last, last));
        }

        let floor = self.floor_index(time)?;
        let floor_time = self.samples[floor].0;
        if time_eq(floor_time, time) {
            return Some((floor_time, floor_time));
        }
        Some((floor_time, self.samples[floor + 1].0))
    }

    /// Held value at `time`.
    pub fn value_at(&self, time: TimeCode) -> Option<&Value> {
        match self.floor_index(time) {
            Some(idx) => Some(&self.samples[idx].1),
            None => self.samples.first().map(|(_, v)| v),
        }
    }

    /// Index of the sample nearest to `time`.
    pub fn near_index(&self, time: TimeCode) -> Option<usize> {
        let floor = match self.floor_index(time) {
            Some(idx) => idx,
            None => return (!self.samples.is_empty()).then_some(0),
        };
        if floor + 1 >= self.samples.len() {
            return Some(floor);
        }
        let floor_time = self.samples[floor].0;
        let ceil_time = self.samples[floor + 1].0;
        if (time - floor_time).abs() <= (ceil_time - time).abs() {
            Some(floor)
        } else {
            Some(floor + 1)
        }
    }

    /// Value of the sample nearest to `time`.
    pub fn nearest(&self, time: TimeCode) -> Option<&Value> {
        self.near_index(time).map(|idx| &self.samples[idx].1)
    }

    fn search(&self, time: TimeCode) -> std::result::Result<usize, usize> {
        let idx = self.samples.partition_point(|(t, _)| *t < time && !time_eq(*t, time));
        if idx < self.samples.len() && time_eq(self.samples[idx].0, time) {
            Ok(idx)
        } else {
            Err(idx)
        }
    }
}

impl FromIterator<(TimeCode, Value)> for TimeSamples {
    fn from_iter<T: IntoIterator<Item = (TimeCode, Value)>>(iter: T) -> Self {
        let mut samples = Self::new();
        for (t, v) in iter {
            samples.insert(t, v);
        }
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> TimeSamples {
        [(2.0, 20.0), (0.0, 0.0), (1.0, 10.0), (3.0, 30.0)]
            .into_iter()
            .map(|(t, v)| (t, Value::Double(v)))
            .collect()
    }

    #[test]
    fn test_insert_keeps_order() {
        let samples = ramp();
        assert_eq!(samples.times(), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_insert_replaces_same_time() {
        let mut samples = ramp();
        samples.insert(1.0, Value::Double(-1.0));
        assert_eq!(samples.len(), 4);
        assert_eq!(samples.get(1.0), Some(&Value::Double(-1.0)));
    }

    #[test]
    fn test_floor_index() {
        let samples = ramp();
        assert_eq!(samples.floor_index(-0.5), None);
        assert_eq!(samples.floor_index(0.5), Some(0));
        assert_eq!(samples.floor_index(1.5), Some(1));
        assert_eq!(samples.floor_index(3.0), Some(3));
        assert_eq!(samples.floor_index(9.0), Some(3));
    }

    #[test]
    fn test_value_at_holds() {
        let samples = ramp();
        assert_eq!(samples.value_at(-5.0), Some(&Value::Double(0.0)));
        assert_eq!(samples.value_at(1.9), Some(&Value::Double(10.0)));
        assert_eq!(samples.value_at(100.0), Some(&Value::Double(30.0)));
        assert_eq!(TimeSamples::new().value_at(0.0), None);
    }

    #[test]
    fn test_bracketing() {
        let samples = ramp();
        assert_eq!(samples.bracketing(-1.0), Some((0.0, 0.0)));
        assert_eq!(samples.bracketing(1.25), Some((1.0, 2.0)));
        assert_eq!(samples.bracketing(2.0), Some((2.0, 2.0)));
        assert_eq!(samples.bracketing(7.0), Some((3.0, 3.0)));
        assert_eq!(TimeSamples::new().bracketing(0.0), None);
    }

    #[test]
    fn test_nearest() {
        let samples = ramp();
        assert_eq!(samples.nearest(1.4), Some(&Value::Double(10.0)));
        assert_eq!(samples.nearest(1.6), Some(&Value::Double(20.0)));
        assert_eq!(samples.nearest(-3.0), Some(&Value::Double(0.0)));
    }
}
