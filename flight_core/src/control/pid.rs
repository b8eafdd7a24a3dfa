//! Single-axis PID with backward Euler integration, first-order derivative
//! filter (`tf`) and back-calculation anti-windup (`tt`).

use flight_common::prelude::AttitudeGains;

/// Accumulated state of one axis. Cleared whenever the attitude claim changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PidState {
    integral: f64,
    prev_error: f64,
    derivative_filtered: f64,
    /// Unsaturated output of the previous step, fed back for anti-windup.
    prev_raw_output: f64,
    /// False until the first step after a reset has seeded `prev_error`.
    primed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Derivative filter time constant [s]; 0 = raw derivative.
    pub tf: f64,
    /// Anti-windup tracking time constant [s]; 0 = disabled.
    pub tt: f64,
    /// Saturation the anti-windup tracks against.
    pub out_max: f64,
}

impl From<&AttitudeGains> for PidGains {
    fn from(g: &AttitudeGains) -> Self {
        Self {
            kp: g.kp,
            ki: g.ki,
            kd: g.kd,
            tf: g.tf,
            tt: g.tt,
            out_max: 1.0,
        }
    }
}

impl PidState {
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// One control step. Output is unsaturated; the caller clamps.
    pub fn step(&mut self, gains: &PidGains, error: f64, dt: f64) -> f64 {
        if dt <= 0.0 || !error.is_finite() {
            return 0.0;
        }

        if !self.primed {
            self.prev_error = error;
            self.primed = true;
        }

        let p = gains.kp * error;

        let i = if gains.ki == 0.0 {
            self.integral = 0.0;
            0.0
        } else {
            let tracking = if gains.tt > 0.0 && gains.out_max > 0.0 {
                let limited = self.prev_raw_output.clamp(-gains.out_max, gains.out_max);
                (limited - self.prev_raw_output) / gains.tt
            } else {
                0.0
            };
            self.integral += (gains.ki * error + tracking) * dt;
            self.integral
        };

        let d = if gains.kd == 0.0 {
            self.derivative_filtered = 0.0;
            0.0
        } else {
            let raw = (error - self.prev_error) / dt;
            if gains.tf > 0.0 {
                let alpha = dt / (gains.tf + dt);
                self.derivative_filtered += alpha * (raw - self.derivative_filtered);
                gains.kd * self.derivative_filtered
            } else {
                gains.kd * raw
            }
        };

        self.prev_error = error;
        self.prev_raw_output = p + i + d;
        self.prev_raw_output
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
