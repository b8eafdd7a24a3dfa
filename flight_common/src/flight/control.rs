//! The control-surface record exchanged with the host once per tick.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Actuator demands handed back to the host.
///
/// Throttle is normalized to `[0, 1]`; torque and RCS translation axes to
/// `[-1, 1]`. Axes are vessel-local: `x` right, `y` up, `z` forward. Torque
/// components are rotations about those axes (`pitch` about `x`, `yaw` about
/// `y`, `roll` about `z`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlOutput {
    pub main_throttle: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ControlOutput {
    /// Zero every axis.
    #[inline]
    pub fn neutralize(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn torque(&self) -> Vector3<f64> {
        Vector3::new(self.pitch, self.yaw, self.roll)
    }

    #[inline]
    pub fn set_torque(&mut self, torque: Vector3<f64>) {
        self.pitch = torque.x;
        self.yaw = torque.y;
        self.roll = torque.z;
    }

    #[inline]
    pub fn translation(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn set_translation(&mut self, translation: Vector3<f64>) {
        self.x = translation.x;
        self.y = translation.y;
        self.z = translation.z;
    }

    /// Clamp every axis into range. Non-finite values become zero.
    pub fn sanitize(&mut self) {
        self.main_throttle = clamp_finite(self.main_throttle, 0.0, 1.0);
        for axis in [
            &mut self.pitch,
            &mut self.yaw,
            &mut self.roll,
            &mut self.x,
            &mut self.y,
            &mut self.z,
        ] {
            *axis = clamp_finite(*axis, -1.0, 1.0);
        }
    }
}

#[inline]
fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        0.0
    }
}
