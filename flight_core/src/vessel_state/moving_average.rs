//! Fixed-length moving average.
//!
//! Explicit ring buffer: `[f64; N]` plus a write cursor. Every write replaces
//! the oldest sample and the read value is the mean over all `N` slots, so a
//! constant input is reached after at most `N` writes.
//!
//! [`AngleAverage`] does the same for angles in degrees.

use flight_common::consts::SMOOTHING_WINDOW;

use super::orbit::wrap_degrees;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingAverage<const N: usize = SMOOTHING_WINDOW> {
    samples: [f64; N],
    cursor: usize,
    mean: f64,
}

impl<const N: usize> Default for MovingAverage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MovingAverage<N> {
    /// All slots zero.
    pub const fn new() -> Self {
        Self {
            samples: [0.0; N],
            cursor: 0,
            mean: 0.0,
        }
    }

    /// Current smoothed value.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.mean
    }

    /// Most recent raw sample.
    #[inline]
    pub fn latest(&self) -> f64 {
        self.samples[(self.cursor + N - 1) % N]
    }

    /// Write one sample over the oldest slot.
    #[inline]
    pub fn push(&mut self, sample: f64) {
        self.samples[self.cursor] = sample;
        self.cursor = (self.cursor + 1) % N;
        self.mean = self.samples.iter().sum::<f64>() / N as f64;
    }

    /// Overwrite every slot; the value is exactly `sample` afterwards.
    #[inline]
    pub fn force(&mut self, sample: f64) {
        self.samples = [sample; N];
        self.cursor = 0;
        self.mean = sample;
    }

    /// Buffer length.
    #[inline]
    pub const fn window(&self) -> usize {
        N
    }

    fn shift(&mut self, offset: f64) {
        for sample in &mut self.samples {
            *sample += offset;
        }
        self.mean += offset;
    }
}

/// Moving average of an angle [deg] that stays continuous through the wrap
/// point.
///
/// Each sample is unwrapped to within 180° of the previous one before it
/// enters the buffer, and the buffer is shifted by whole turns to keep the
/// newest sample in `[lower, lower + 360)`. Readings fold into that range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleAverage<const N: usize = SMOOTHING_WINDOW> {
    inner: MovingAverage<N>,
    lower: f64,
}

impl<const N: usize> Default for AngleAverage<N> {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl<const N: usize> AngleAverage<N> {
    /// All slots at `lower`; readings fall in `[lower, lower + 360)`.
    pub const fn new(lower: f64) -> Self {
        Self {
            inner: MovingAverage {
                samples: [lower; N],
                cursor: 0,
                mean: lower,
            },
            lower,
        }
    }

    #[inline]
    fn fold(&self, deg: f64) -> f64 {
        self.lower + wrap_degrees(deg - self.lower)
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.fold(self.inner.value())
    }

    #[inline]
    pub fn latest(&self) -> f64 {
        self.fold(self.inner.latest())
    }

    pub fn push(&mut self, sample: f64) {
        let previous = self.inner.latest();
        let unwrapped = sample + 360.0 * ((previous - sample) / 360.0).round();
        self.inner.push(unwrapped);

        let turns = ((unwrapped - self.lower) / 360.0).floor();
        if turns != 0.0 {
            self.inner.shift(-360.0 * turns);
        }
    }

    #[inline]
    pub fn force(&mut self, sample: f64) {
        self.inner.force(self.fold(sample));
    }

    #[inline]
    pub const fn window(&self) -> usize {
        N
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let avg = MovingAverage::<4>::new();
        assert_eq!(avg.value(), 0.0);
        assert_eq!(avg.window(), 4);
    }

    #[test]
    fn constant_input_converges_within_window() {
        let mut avg = MovingAverage::<10>::new();
        let mut previous = avg.value();
        for _ in 0..10 {
            avg.push(9.81);
            assert!(avg.value() >= previous, "approach must be monotone");
            previous = avg.value();
        }
        assert!((avg.value() - 9.81).abs() < 1e-12);
    }

    #[test]
    fn partial_fill_is_proportional() {
        let mut avg = MovingAverage::<4>::new();
        avg.push(8.0);
        assert_eq!(avg.value(), 2.0);
        avg.push(8.0);
        assert_eq!(avg.value(), 4.0);
        assert_eq!(avg.latest(), 8.0);
    }

    #[test]
    fn force_is_exact() {
        let mut avg = MovingAverage::<10>::new();
        avg.push(1.0);
        avg.push(-3.0);
        avg.force(0.1);
        assert_eq!(avg.value(), 0.1);
        assert_eq!(avg.latest(), 0.1);
    }

    #[test]
    fn oldest_sample_is_replaced() {
        let mut avg = MovingAverage::<2>::new();
        avg.force(10.0);
        avg.push(20.0);
        assert_eq!(avg.value(), 15.0);
        avg.push(20.0);
        assert_eq!(avg.value(), 20.0);
    }

    #[test]
    fn heading_average_crosses_north() {
        let mut heading = AngleAverage::<4>::new(0.0);
        heading.force(358.0);
        heading.push(2.0);
        // Samples 358, 358, 358, 362.
        assert!((heading.value() - 359.0).abs() < 1e-9);
        assert!((heading.latest() - 2.0).abs() < 1e-9);
        heading.push(2.0);
        heading.push(2.0);
        assert!((heading.value() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn longitude_average_crosses_the_antimeridian() {
        let mut longitude = AngleAverage::<2>::new(-180.0);
        longitude.force(179.0);
        longitude.push(-179.0);
        let value = longitude.value();
        assert!((-180.0..180.0).contains(&value));
        assert!((value + 180.0).abs() < 1e-9);
        longitude.push(-179.0);
        assert!((longitude.value() + 179.0).abs() < 1e-9);
    }

    #[test]
    fn continuous_rotation_stays_in_range() {
        let mut heading = AngleAverage::<10>::new(0.0);
        heading.force(0.0);
        for step in 1..=1_000 {
            heading.push(f64::from(step * 7 % 360));
            let value = heading.value();
            assert!((0.0..360.0).contains(&value), "{value}");
        }
        assert!(heading.inner.latest().abs() < 360.0);
    }

    #[test]
    fn forced_nan_reads_nan() {
        let mut avg = MovingAverage::<3>::new();
        avg.force(f64::NAN);
        assert!(avg.value().is_nan());
        avg.force(5.0);
        assert_eq!(avg.value(), 5.0);
    }
}
