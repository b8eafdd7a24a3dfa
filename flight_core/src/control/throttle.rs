//! Speed hold through the main throttle, lateral kill through RCS.

use flight_common::prelude::{ThrottleGains, TranslationCommand, TranslationMode};
use nalgebra::Vector3;

use crate::vessel_state::{VesselState, direction};

/// Below this the engine cannot push along the hold axis.
const MIN_AXIS_ALIGNMENT: f64 = 1e-3;

/// Arbitrated throttle and RCS demand for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrottleCorrection {
    /// `[0, 1]`.
    pub throttle: f64,
    /// Vessel-local RCS demand when lateral kill is requested.
    pub translation: Option<Vector3<f64>>,
    /// Unclamped demand exceeded full throttle.
    pub saturated: bool,
}

/// Hold axis (world, unit) and current smoothed speed along it.
fn hold_axis(state: &VesselState, mode: TranslationMode) -> Option<(Vector3<f64>, f64)> {
    match mode {
        TranslationMode::Off => None,
        TranslationMode::KeepOrbital => Some((state.orbit_prograde, state.speed_orbital.value())),
        TranslationMode::KeepSurface => Some((
            direction(&state.velocity_surface),
            state.speed_surface.value(),
        )),
        TranslationMode::KeepVertical => Some((state.up, state.speed_vertical.value())),
    }
}

/// `None` for mode `Off`: the drive hooks own the throttle.
///
/// Within `tolerance` of the target speed the throttle is exactly zero.
/// Otherwise the demand is `kp · error / (max_accel · cos)`, where `cos` is
/// the alignment of the nose with the hold axis, clamped into `[0, 1]`.
/// A vessel without thrust or pointing across the axis gets zero throttle.
pub fn throttle_correction(
    state: &VesselState,
    command: &TranslationCommand,
    gains: &ThrottleGains,
) -> Option<ThrottleCorrection> {
    let (axis, speed) = hold_axis(state, command.mode)?;

    let error = command.target_speed - speed;
    let alignment = state.forward.dot(&axis);

    let (throttle, saturated) = if !error.is_finite()
        || !alignment.is_finite()
        || error.abs() <= gains.tolerance
        || state.max_thrust_accel <= 0.0
        || alignment.abs() < MIN_AXIS_ALIGNMENT
    {
        (0.0, false)
    } else {
        let demand = gains.kp * error / (state.max_thrust_accel * alignment);
        (demand.clamp(0.0, 1.0), demand > 1.0)
    };

    let translation = command.kill_lateral.then(|| lateral_kill(state, gains.lateral_gain));

    Some(ThrottleCorrection {
        throttle,
        translation,
        saturated,
    })
}

/// RCS demand opposing horizontal surface velocity, in vessel axes.
pub fn lateral_kill(state: &VesselState, gain: f64) -> Vector3<f64> {
    let v = state.velocity_surface;
    let horizontal = v - state.up * v.dot(&state.up);
    if !horizontal.iter().all(|c| c.is_finite()) {
        return Vector3::zeros();
    }
    let local = state.rotation_vessel.inverse() * (-horizontal * gain);
    local.map(|c| c.clamp(-1.0, 1.0))
}
