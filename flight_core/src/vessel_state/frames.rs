//! Reference-frame bases resolved against the current snapshot.
//!
//! Every basis maps frame-local `+Z` to its forward vector and keeps `+Y` as
//! close to its up vector as orthogonality allows. A basis that cannot be
//! built (zero or non-finite input, forward parallel to up, no target)
//! resolves to `None`.

use flight_common::prelude::ReferenceFrame;
use nalgebra::{UnitQuaternion, Vector3};

use super::VesselState;

const DEGENERATE_EPS: f64 = 1e-9;

/// Frame → world rotation for a forward/up pair.
pub fn basis(forward: &Vector3<f64>, up: &Vector3<f64>) -> Option<UnitQuaternion<f64>> {
    if !forward.iter().chain(up.iter()).all(|c| c.is_finite()) {
        return None;
    }
    let forward_norm = forward.norm();
    let up_norm = up.norm();
    if forward_norm < DEGENERATE_EPS || up_norm < DEGENERATE_EPS {
        return None;
    }
    if up.cross(forward).norm() < DEGENERATE_EPS * forward_norm * up_norm {
        return None;
    }
    Some(UnitQuaternion::face_towards(forward, up))
}

/// Frame → world rotation of `frame` for this snapshot.
pub fn frame_rotation(state: &VesselState, frame: ReferenceFrame) -> Option<UnitQuaternion<f64>> {
    match frame {
        ReferenceFrame::Inertial => Some(UnitQuaternion::identity()),
        ReferenceFrame::Orbit => basis(&state.velocity_orbital, &state.up),
        ReferenceFrame::OrbitHorizontal => {
            let v = state.velocity_orbital;
            let horizontal = v - state.up * v.dot(&state.up);
            basis(&horizontal, &state.up)
        }
        ReferenceFrame::SurfaceNorth => basis(&state.north, &state.up),
        ReferenceFrame::SurfaceVelocity => basis(&state.velocity_surface, &state.up),
        ReferenceFrame::Target => {
            let target = state.target.as_ref()?;
            basis(&(target.position - state.com), &state.up)
        }
        ReferenceFrame::RelativeVelocity => {
            let target = state.target.as_ref()?;
            basis(&(state.velocity_orbital - target.velocity), &state.up)
        }
        ReferenceFrame::TargetOrientation => state.target.as_ref()?.rotation,
    }
}
