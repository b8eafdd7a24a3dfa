//! Synthetic host: a point-mass vessel over a spinning spherical body.
//!
//! Stands in for the physics simulation when the core runs standalone
//! (the `flight_core` binary, integration tests, benchmarks). Thrust acts
//! along the nose, torque commands become body rates, RCS commands become
//! small body-frame accelerations. The ground is a flat sea-level sphere.

use flight_common::prelude::{BodyTelemetry, ControlOutput, PartTelemetry, VesselTelemetry};
use nalgebra::{UnitQuaternion, Vector3};

/// Terrain ray-cast range [m]; above this the host reports no surface.
pub const TERRAIN_RAY_RANGE: f64 = 10_000.0;

/// Body rate at full torque command [rad/s].
pub const MAX_BODY_RATE: f64 = 0.5;

/// RCS acceleration at full translation command [m/s²].
pub const RCS_ACCEL: f64 = 1.0;

const SEA_LEVEL_DENSITY: f64 = 1.225;
const SCALE_HEIGHT: f64 = 5_600.0;
const ATMOSPHERE_TOP: f64 = 70_000.0;

/// Ballistic integrator producing one [`VesselTelemetry`] per step.
#[derive(Debug, Clone)]
pub struct BallisticHost {
    telemetry: VesselTelemetry,
    landed: bool,
}

impl BallisticHost {
    /// Vessel resting on the equator at the prime meridian, nose up.
    pub fn on_pad(parts: Vec<PartTelemetry>) -> Self {
        let body = BodyTelemetry::default();
        let position = Vector3::new(body.radius, 0.0, 0.0);
        let rotation = UnitQuaternion::face_towards(&Vector3::x(), &Vector3::z());
        let velocity = surface_velocity(&body, &position);
        let mut host = Self {
            telemetry: VesselTelemetry {
                body,
                position,
                velocity,
                rotation,
                parts,
                ..VesselTelemetry::default()
            },
            landed: true,
        };
        host.refresh_environment();
        host
    }

    /// A small rocket: 2 t dry stage, 60 kN engine (TWR ≈ 3 at sea level).
    pub fn sample_rocket() -> Self {
        Self::on_pad(vec![
            PartTelemetry {
                mass: 1.5,
                available_thrust: 60.0,
                drag: 0.2,
            },
            PartTelemetry {
                mass: 0.5,
                available_thrust: 0.0,
                drag: 0.3,
            },
        ])
    }

    #[inline]
    pub fn telemetry(&self) -> &VesselTelemetry {
        &self.telemetry
    }

    #[inline]
    pub fn is_landed(&self) -> bool {
        self.landed
    }

    /// Altitude above sea level [m].
    pub fn altitude(&self) -> f64 {
        self.telemetry.position.norm() - self.telemetry.body.radius
    }

    /// Advance one fixed step using the core's output record.
    pub fn step(&mut self, output: &ControlOutput) {
        let t = &mut self.telemetry;
        let dt = t.fixed_delta_time;

        let rates = output.torque() * MAX_BODY_RATE * dt;
        t.rotation = t.rotation * UnitQuaternion::from_scaled_axis(rates);

        let mass = t.total_mass();
        let thrust_accel = if mass > 0.0 {
            output.main_throttle.clamp(0.0, 1.0) * t.total_thrust() / mass
        } else {
            0.0
        };
        let forward = t.rotation * Vector3::z();
        let rcs = t.rotation * output.translation() * RCS_ACCEL;

        let r = t.position.norm();
        let gravity = -t.position * (t.body.gravitational_parameter / (r * r * r));

        t.velocity += (gravity + forward * thrust_accel + rcs) * dt;
        t.position += t.velocity * dt;
        t.universal_time += dt;
        t.body.rotation_angle = (t.body.rotation_angle + t.body.rotation_rate * dt)
            .rem_euclid(std::f64::consts::TAU);

        self.clamp_to_ground();
        self.refresh_environment();
    }

    fn clamp_to_ground(&mut self) {
        let t = &mut self.telemetry;
        let r = t.position.norm();
        let up = t.position / r;
        let climbing = t.velocity.dot(&up) > 0.0;
        if r <= t.body.radius && !climbing {
            t.position = up * t.body.radius;
            t.velocity = surface_velocity(&t.body, &t.position);
            self.landed = true;
        } else if r > t.body.radius {
            self.landed = false;
        }
    }

    fn refresh_environment(&mut self) {
        let altitude = self.altitude();
        let t = &mut self.telemetry;
        t.terrain_height = (altitude <= TERRAIN_RAY_RANGE).then_some(0.0);
        t.atmospheric_density = if altitude < ATMOSPHERE_TOP {
            SEA_LEVEL_DENSITY * (-altitude.max(0.0) / SCALE_HEIGHT).exp()
        } else {
            0.0
        };
    }
}

/// Velocity of a point co-rotating with the body surface.
fn surface_velocity(body: &BodyTelemetry, position: &Vector3<f64>) -> Vector3<f64> {
    Vector3::z().cross(position) * body.rotation_rate
}
