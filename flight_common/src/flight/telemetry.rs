//! Raw per-tick telemetry handed over by the host simulation.
//!
//! All vectors are in the body-centered inertial frame of the dominant body;
//! the body spins about `+Z`.

use nalgebra::{UnitQuaternion, Vector3};

use crate::consts::DEFAULT_FIXED_DELTA_TIME;

/// Dominant celestial body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyTelemetry {
    /// Mean sea-level radius [m].
    pub radius: f64,
    /// Standard gravitational parameter μ [m³/s²].
    pub gravitational_parameter: f64,
    /// Sidereal rotation rate about `+Z` [rad/s].
    pub rotation_rate: f64,
    /// Current rotation angle of the prime meridian [rad].
    pub rotation_angle: f64,
}

impl Default for BodyTelemetry {
    /// A Kerbin-sized body.
    fn default() -> Self {
        Self {
            radius: 600_000.0,
            gravitational_parameter: 3.5316e12,
            rotation_rate: 2.0 * std::f64::consts::PI / 21_549.425,
            rotation_angle: 0.0,
        }
    }
}

/// Per-part aggregates the host already computes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PartTelemetry {
    /// Wet mass [t].
    pub mass: f64,
    /// Thrust available right now [kN]; zero for inactive engines.
    pub available_thrust: f64,
    /// Drag coefficient.
    pub drag: f64,
}

/// The currently selected target, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetTelemetry {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    /// Orientation for docking-port style targets.
    pub rotation: Option<UnitQuaternion<f64>>,
}

/// Everything the snapshot pipeline reads in one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselTelemetry {
    /// Universal time [s].
    pub universal_time: f64,
    /// Length of this physics step [s].
    pub fixed_delta_time: f64,
    pub body: BodyTelemetry,
    /// Center of mass relative to the body center [m].
    pub position: Vector3<f64>,
    /// Inertial (orbital) velocity [m/s].
    pub velocity: Vector3<f64>,
    /// Vessel-local → world rotation (`+Z` nose, `+Y` dorsal).
    pub rotation: UnitQuaternion<f64>,
    /// Terrain height under the vessel above sea level [m]; `None` when the
    /// ray-cast finds no surface.
    pub terrain_height: Option<f64>,
    /// Atmospheric density at the current altitude [kg/m³].
    pub atmospheric_density: f64,
    pub parts: Vec<PartTelemetry>,
    pub target: Option<TargetTelemetry>,
}

impl Default for VesselTelemetry {
    fn default() -> Self {
        let body = BodyTelemetry::default();
        let radius = body.radius;
        Self {
            universal_time: 0.0,
            fixed_delta_time: DEFAULT_FIXED_DELTA_TIME,
            body,
            position: Vector3::new(radius, 0.0, 0.0),
            velocity: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            terrain_height: Some(0.0),
            atmospheric_density: 0.0,
            parts: Vec::new(),
            target: None,
        }
    }
}

impl VesselTelemetry {
    /// Sum of part masses [t].
    pub fn total_mass(&self) -> f64 {
        self.parts.iter().map(|p| p.mass).sum()
    }

    /// Sum of available engine thrust [kN].
    pub fn total_thrust(&self) -> f64 {
        self.parts.iter().map(|p| p.available_thrust).sum()
    }

    /// Σ mass × drag coefficient [t].
    pub fn drag_mass_product(&self) -> f64 {
        self.parts.iter().map(|p| p.mass * p.drag).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_aggregates_sum() {
        let telemetry = VesselTelemetry {
            parts: vec![
                PartTelemetry {
                    mass: 2.0,
                    available_thrust: 200.0,
                    drag: 0.2,
                },
                PartTelemetry {
                    mass: 1.0,
                    available_thrust: 0.0,
                    drag: 0.3,
                },
            ],
            ..VesselTelemetry::default()
        };
        assert_eq!(telemetry.total_mass(), 3.0);
        assert_eq!(telemetry.total_thrust(), 200.0);
        assert!((telemetry.drag_mass_product() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn default_sits_on_the_surface() {
        let telemetry = VesselTelemetry::default();
        assert_eq!(telemetry.position.norm(), telemetry.body.radius);
        assert_eq!(telemetry.terrain_height, Some(0.0));
        assert!(telemetry.parts.is_empty());
    }
}
