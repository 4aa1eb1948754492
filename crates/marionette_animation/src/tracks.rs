use marionette_core::{MarionetteError, Result};

use crate::values::Interpolatable;

/// One animated channel: strictly ascending timestamps with one value each.
///
/// Only [`KeyframeTrack::new`] creates tracks, so a track always has at least
/// one key.
#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub(crate) times: Vec<f32>,
    pub(crate) values: Vec<T>,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    /// Builds a track, rejecting empty, mismatched or unordered input.
    pub fn new(times: Vec<f32>, values: Vec<T>) -> Result<Self> {
        if times.is_empty() {
            return Err(MarionetteError::InvalidTrack("track has no keys".to_string()));
        }
        if times.len() != values.len() {
            return Err(MarionetteError::InvalidTrack(format!(
                "{} timestamps but {} values",
                times.len(),
                values.len()
            )));
        }
        if let Some(i) = times.windows(2).position(|w| w[0] >= w[1]) {
            return Err(MarionetteError::InvalidTrack(format!(
                "timestamps not strictly ascending at key {} ({} >= {})",
                i + 1,
                times[i],
                times[i + 1]
            )));
        }

        Ok(Self { times, values })
    }

    /// Builds a track from `(time, value)` pairs.
    pub fn from_keys(keys: impl IntoIterator<Item = (f32, T)>) -> Result<Self> {
        let (times, values): (Vec<f32>, Vec<T>) = keys.into_iter().unzip();
        Self::new(times, values)
    }

    #[inline]
    #[must_use]
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn start_time(&self) -> f32 {
        self.times[0]
    }

    #[inline]
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times[self.times.len() - 1]
    }

    /// Samples the track at `time`.
    ///
    /// No extrapolation: times before the first key return the first value,
    /// times past the last key return the last value.
    #[must_use]
    pub fn sample(&self, time: f32) -> T {
        // partition_point finds the first index where t > time, i.e. next_index
        let next_idx = self.times.partition_point(|&t| t <= time);
        self.sample_at_frame(next_idx, time)
    }

    fn sample_at_frame(&self, next_idx: usize, time: f32) -> T {
        let len = self.times.len();

        if next_idx == 0 {
            return self.values[0];
        }
        if next_idx >= len {
            return self.values[len - 1];
        }

        let prev_idx = next_idx - 1;
        let t0 = self.times[prev_idx];
        let t1 = self.times[next_idx];
        let dt = t1 - t0;

        if dt <= 0.0 {
            return self.values[next_idx];
        }

        let t = ((time - t0) / dt).clamp(0.0, 1.0);
        T::interpolate_linear(self.values[prev_idx], self.values[next_idx], t)
    }
}
