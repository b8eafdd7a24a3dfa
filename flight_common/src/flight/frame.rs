//! Attitude reference frames and targets.
//!
//! A target is interpreted in the basis of its [`ReferenceFrame`]. Every
//! frame basis follows the same local convention as the vessel itself:
//! `+Z` forward, `+Y` up, `+X = Y × Z`. In the orbit frame this makes `+Z`
//! prograde, `+Y` radial-out and `+X` orbit-normal.

use std::fmt;
use std::str::FromStr;

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Coordinate basis an attitude target is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ReferenceFrame {
    /// World (body-centered inertial) axes.
    Inertial = 0,
    /// Forward = orbital velocity, up = radial-out.
    Orbit = 1,
    /// Forward = horizontal component of orbital velocity, up = local up.
    OrbitHorizontal = 2,
    /// Forward = north, up = local up.
    SurfaceNorth = 3,
    /// Forward = surface velocity, up = local up.
    SurfaceVelocity = 4,
    /// Forward = line of sight to the target, up = local up.
    Target = 5,
    /// Forward = velocity relative to the target, up = local up.
    RelativeVelocity = 6,
    /// The target's own orientation.
    TargetOrientation = 7,
}

impl ReferenceFrame {
    pub const ALL: [Self; 8] = [
        Self::Inertial,
        Self::Orbit,
        Self::OrbitHorizontal,
        Self::SurfaceNorth,
        Self::SurfaceVelocity,
        Self::Target,
        Self::RelativeVelocity,
        Self::TargetOrientation,
    ];

    /// Stable lowercase name, used in settings and console commands.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Inertial => "inertial",
            Self::Orbit => "orbit",
            Self::OrbitHorizontal => "orbit_horizontal",
            Self::SurfaceNorth => "surface_north",
            Self::SurfaceVelocity => "surface_velocity",
            Self::Target => "target",
            Self::RelativeVelocity => "relative_velocity",
            Self::TargetOrientation => "target_orientation",
        }
    }

    /// Frames that need a selected target to resolve.
    #[inline]
    pub const fn requires_target(self) -> bool {
        matches!(
            self,
            Self::Target | Self::RelativeVelocity | Self::TargetOrientation
        )
    }
}

impl fmt::Display for ReferenceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReferenceFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        match wanted.as_str() {
            "surface" => return Ok(Self::SurfaceNorth),
            "relative" => return Ok(Self::RelativeVelocity),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|frame| frame.name() == wanted)
            .ok_or_else(|| format!("unknown reference frame '{s}'"))
    }
}

/// Unit axis of a frame basis, with the orbital aliases operators use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `+Z`: prograde in the orbit frame.
    Forward,
    /// `-Z`: retrograde.
    Back,
    /// `+Y`: radial-out.
    Up,
    /// `-Y`: radial-in.
    Down,
    /// `+X`: orbit normal.
    Right,
    /// `-X`: anti-normal.
    Left,
}

impl Direction {
    pub const ALL: [Self; 6] = [
        Self::Forward,
        Self::Back,
        Self::Up,
        Self::Down,
        Self::Right,
        Self::Left,
    ];

    /// Orbital-frame name (`prograde`, `radial_out`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Forward => "prograde",
            Self::Back => "retrograde",
            Self::Up => "radial_out",
            Self::Down => "radial_in",
            Self::Right => "normal",
            Self::Left => "anti_normal",
        }
    }

    pub fn vector(self) -> Vector3<f64> {
        match self {
            Self::Forward => Vector3::z(),
            Self::Back => -Vector3::z(),
            Self::Up => Vector3::y(),
            Self::Down => -Vector3::y(),
            Self::Right => Vector3::x(),
            Self::Left => -Vector3::x(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" | "prograde" => Ok(Self::Forward),
            "back" | "retrograde" => Ok(Self::Back),
            "up" | "radial_out" | "radial+" => Ok(Self::Up),
            "down" | "radial_in" | "radial-" => Ok(Self::Down),
            "right" | "normal" | "normal+" => Ok(Self::Right),
            "left" | "anti_normal" | "normal-" => Ok(Self::Left),
            other => Err(format!("unknown direction '{other}'")),
        }
    }
}

/// What the attitude claimant wants, expressed in its reference frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttitudeTarget {
    /// Point the vessel's forward axis along this vector; roll is free.
    Direction(Vector3<f64>),
    /// Match this full orientation (vessel-local → frame).
    Orientation(UnitQuaternion<f64>),
}

impl AttitudeTarget {
    /// True if every component is finite. Non-finite targets resolve to no torque.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Direction(v) => v.iter().all(|c| c.is_finite()),
            Self::Orientation(q) => q.coords.iter().all(|c| c.is_finite()),
        }
    }

    /// Bitwise identity: a NaN component matches the same NaN, and `0.0`
    /// differs from `-0.0`.
    pub fn same_as(&self, other: &Self) -> bool {
        let bits_eq = |a: &[f64], b: &[f64]| {
            a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
        };
        match (self, other) {
            (Self::Direction(a), Self::Direction(b)) => bits_eq(a.as_slice(), b.as_slice()),
            (Self::Orientation(a), Self::Orientation(b)) => {
                bits_eq(a.coords.as_slice(), b.coords.as_slice())
            }
            _ => false,
        }
    }
}

impl From<Direction> for AttitudeTarget {
    fn from(direction: Direction) -> Self {
        Self::Direction(direction.vector())
    }
}

impl fmt::Display for AttitudeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direction(v) => write!(f, "dir({:.3}, {:.3}, {:.3})", v.x, v.y, v.z),
            Self::Orientation(q) => {
                let (roll, pitch, yaw) = q.euler_angles();
                write!(
                    f,
                    "rot({:.1}°, {:.1}°, {:.1}°)",
                    roll.to_degrees(),
                    pitch.to_degrees(),
                    yaw.to_degrees()
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_names_round_trip() {
        for frame in ReferenceFrame::ALL {
            assert_eq!(frame.name().parse::<ReferenceFrame>(), Ok(frame));
        }
        assert_eq!("SURFACE".parse::<ReferenceFrame>(), Ok(ReferenceFrame::SurfaceNorth));
        assert!("galactic".parse::<ReferenceFrame>().is_err());
    }

    #[test]
    fn only_target_frames_require_target() {
        assert!(ReferenceFrame::Target.requires_target());
        assert!(ReferenceFrame::TargetOrientation.requires_target());
        assert!(!ReferenceFrame::Orbit.requires_target());
        assert!(!ReferenceFrame::Inertial.requires_target());
    }

    #[test]
    fn orbital_aliases_map_to_axes() {
        assert_eq!("prograde".parse::<Direction>(), Ok(Direction::Forward));
        assert_eq!("normal".parse::<Direction>(), Ok(Direction::Right));
        assert_eq!("radial_in".parse::<Direction>(), Ok(Direction::Down));
        assert_eq!(Direction::Left.vector(), -Vector3::x());
        for direction in Direction::ALL {
            assert_eq!(direction.to_string().parse::<Direction>(), Ok(direction));
        }
    }

    #[test]
    fn nan_direction_is_not_finite() {
        let target = AttitudeTarget::Direction(Vector3::new(f64::NAN, 0.0, 1.0));
        assert!(!target.is_finite());
        assert!(AttitudeTarget::from(Direction::Up).is_finite());
    }

    #[test]
    fn same_as_matches_nan_bit_patterns() {
        let nan = AttitudeTarget::Direction(Vector3::new(f64::NAN, 0.0, 1.0));
        assert_ne!(nan, nan);
        assert!(nan.same_as(&nan));
        assert!(!nan.same_as(&AttitudeTarget::from(Direction::Forward)));

        let up = AttitudeTarget::from(Direction::Up);
        assert!(up.same_as(&AttitudeTarget::from(Direction::Up)));
        let level = AttitudeTarget::Orientation(UnitQuaternion::identity());
        assert!(level.same_as(&level));
        assert!(!level.same_as(&up));
    }
}
