//! First-order low-pass on the three torque axes.
//!
//! ```text
//! alpha = 2π·f·dt / (1 + 2π·f·dt)
//! y[n]  = y[n-1] + alpha · (x[n] - y[n-1])
//! ```
//!
//! A cutoff of zero passes the input through.

use core::f64::consts::TAU;

use nalgebra::Vector3;

#[derive(Debug, Clone, Copy, Default)]
pub struct LowPass3 {
    prev: Vector3<f64>,
}

impl LowPass3 {
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn apply(&mut self, cutoff_hz: f64, input: Vector3<f64>, dt: f64) -> Vector3<f64> {
        if cutoff_hz <= 0.0 || dt <= 0.0 {
            self.prev = input;
            return input;
        }
        let omega = TAU * cutoff_hz * dt;
        let alpha = omega / (1.0 + omega);
        self.prev += (input - self.prev) * alpha;
        self.prev
    }
}
