//! Attitude error and the per-axis torque controller.
//!
//! The error is a rotation vector in vessel-local axes (axis × angle, angle in
//! radians) that would carry the current orientation onto the target. Its
//! `x`, `y` and `z` components feed the pitch, yaw and roll PIDs.

use flight_common::prelude::{AttitudeGains, AttitudeSetpoint, AttitudeTarget};
use nalgebra::Vector3;

use super::filters::LowPass3;
use super::pid::{PidGains, PidState};
use crate::vessel_state::{VesselState, frame_rotation};

const ALIGNED_EPS: f64 = 1e-12;

/// Vessel-frame rotation vector toward `setpoint`, or `None` if the setpoint
/// cannot be resolved against this snapshot.
pub fn attitude_error(state: &VesselState, setpoint: &AttitudeSetpoint) -> Option<Vector3<f64>> {
    if !state.is_valid() || !setpoint.target.is_finite() {
        return None;
    }
    let frame = frame_rotation(state, setpoint.frame)?;
    let world_to_vessel = state.rotation_vessel.inverse();

    let error = match setpoint.target {
        AttitudeTarget::Direction(dir) => {
            let world = frame * dir;
            let norm = world.norm();
            if norm < ALIGNED_EPS {
                return None;
            }
            let local = world_to_vessel * (world / norm);
            let axis = Vector3::z().cross(&local);
            let sin = axis.norm();
            let cos = local.z;
            if sin < ALIGNED_EPS {
                if cos > 0.0 {
                    Vector3::zeros()
                } else {
                    // Pointing exactly away: any perpendicular axis works.
                    Vector3::x() * std::f64::consts::PI
                }
            } else {
                axis / sin * sin.atan2(cos)
            }
        }
        AttitudeTarget::Orientation(q) => (world_to_vessel * frame * q).scaled_axis(),
    };

    error.iter().all(|c| c.is_finite()).then_some(error)
}

/// Three PIDs plus an optional torque low-pass.
///
/// State is cleared whenever the claim generation changes so a new owner
/// never inherits another controller's integral.
#[derive(Debug, Clone, Default)]
pub struct AttitudeController {
    axes: [PidState; 3],
    lowpass: LowPass3,
    generation: u64,
}

impl AttitudeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        for axis in &mut self.axes {
            axis.reset();
        }
        self.lowpass.reset();
    }

    /// Normalized torque command in `[-1, 1]` per axis, or `None` for a
    /// degenerate setpoint (controller state is cleared in that case).
    pub fn update(
        &mut self,
        state: &VesselState,
        setpoint: &AttitudeSetpoint,
        generation: u64,
        gains: &AttitudeGains,
    ) -> Option<Vector3<f64>> {
        if generation != self.generation {
            self.reset();
            self.generation = generation;
        }

        let Some(error) = attitude_error(state, setpoint) else {
            self.reset();
            return None;
        };

        let pid = PidGains::from(gains);
        let dt = state.delta_time;
        let raw = Vector3::new(
            self.axes[0].step(&pid, error.x, dt),
            self.axes[1].step(&pid, error.y, dt),
            self.axes[2].step(&pid, error.z, dt),
        );
        let filtered = self.lowpass.apply(gains.lowpass_hz, raw, dt);
        Some(filtered.map(|c| c.clamp(-1.0, 1.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flight_common::prelude::{Direction, ReferenceFrame, VesselTelemetry};
    use nalgebra::UnitQuaternion;

    fn state_with_rotation(rotation: UnitQuaternion<f64>) -> VesselState {
        let telemetry = VesselTelemetry {
            rotation,
            ..VesselTelemetry::default()
        };
        let mut state = VesselState::new();
        state.update(&telemetry);
        state
    }

    #[test]
    fn aligned_target_has_zero_error() {
        let state = state_with_rotation(UnitQuaternion::identity());
        let sp = AttitudeSetpoint::new(ReferenceFrame::Inertial, Direction::Forward.into());
        assert_eq!(attitude_error(&state, &sp), Some(Vector3::zeros()));
    }

    #[test]
    fn quarter_turn_about_pitch_axis() {
        let state = state_with_rotation(UnitQuaternion::identity());
        // Target world +Y (vessel top): rotate about -X by 90°.
        let sp = AttitudeSetpoint::new(ReferenceFrame::Inertial, Direction::Up.into());
        let err = attitude_error(&state, &sp).unwrap();
        assert!((err - Vector3::new(-std::f64::consts::FRAC_PI_2, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn opposite_target_is_not_degenerate() {
        let state = state_with_rotation(UnitQuaternion::identity());
        let sp = AttitudeSetpoint::new(ReferenceFrame::Inertial, Direction::Back.into());
        let err = attitude_error(&state, &sp).unwrap();
        assert!((err.norm() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn orientation_target_gives_scaled_axis() {
        let state = state_with_rotation(UnitQuaternion::identity());
        let q = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.3);
        let sp = AttitudeSetpoint::new(ReferenceFrame::Inertial, AttitudeTarget::Orientation(q));
        let err = attitude_error(&state, &sp).unwrap();
        assert!((err - Vector3::new(0.0, 0.0, 0.3)).norm() < 1e-12);
    }

    #[test]
    fn nan_or_unresolvable_target_is_none() {
        let state = state_with_rotation(UnitQuaternion::identity());
        let nan = AttitudeSetpoint::new(
            ReferenceFrame::Inertial,
            AttitudeTarget::Direction(Vector3::new(f64::NAN, 0.0, 1.0)),
        );
        assert!(attitude_error(&state, &nan).is_none());

        // No target selected.
        let sp = AttitudeSetpoint::new(ReferenceFrame::Target, Direction::Forward.into());
        assert!(attitude_error(&state, &sp).is_none());

        // Snapshot never updated.
        let fresh = VesselState::new();
        let sp = AttitudeSetpoint::new(ReferenceFrame::Inertial, Direction::Up.into());
        assert!(attitude_error(&fresh, &sp).is_none());
    }

    #[test]
    fn controller_output_is_clamped_and_signed() {
        let state = state_with_rotation(UnitQuaternion::identity());
        let sp = AttitudeSetpoint::new(ReferenceFrame::Inertial, Direction::Up.into());
        let mut ctl = AttitudeController::new();
        let gains = AttitudeGains {
            kp: 10.0,
            ..AttitudeGains::default()
        };
        let torque = ctl.update(&state, &sp, 1, &gains).unwrap();
        assert_eq!(torque.x, -1.0);
        assert_eq!(torque.y, 0.0);
        assert_eq!(torque.z, 0.0);
    }

    #[test]
    fn degenerate_setpoint_yields_none() {
        let state = state_with_rotation(UnitQuaternion::identity());
        let sp = AttitudeSetpoint::new(ReferenceFrame::TargetOrientation, Direction::Up.into());
        let mut ctl = AttitudeController::new();
        assert!(ctl.update(&state, &sp, 1, &AttitudeGains::default()).is_none());
    }
}
