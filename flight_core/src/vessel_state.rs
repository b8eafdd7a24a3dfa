//! Per-tick vessel state snapshot.
//!
//! [`VesselState::update`] turns one [`VesselTelemetry`] record into a
//! frame-coherent bundle: instantaneous frame vectors, smoothed scalars and
//! part aggregates. The core calls it once per tick before any hook runs;
//! modules only ever see `&VesselState`.
//!
//! # Smoothing
//!
//! Every scalar goes through a [`MovingAverage`]. The first update of a fresh
//! snapshot seeds each buffer with its first sample. A non-finite sample
//! (terrain ray-cast miss, radial trajectory, pole singularity) overwrites
//! the whole buffer so the reading is NaN rather than a blend, and the next
//! finite sample reseeds it.

pub mod frames;
pub mod moving_average;
pub mod orbit;

use flight_common::prelude::{BodyTelemetry, TargetTelemetry, VesselTelemetry};
use nalgebra::{UnitQuaternion, Vector3};

pub use frames::{basis, frame_rotation};
pub use moving_average::{AngleAverage, MovingAverage};
pub use orbit::{OrbitElements, orbit_elements};

use orbit::wrap_degrees;

/// Unit vector, or all-NaN for a zero-length input.
#[inline]
pub fn direction(v: &Vector3<f64>) -> Vector3<f64> {
    let norm = v.norm();
    if norm > 0.0 && norm.is_finite() {
        v / norm
    } else {
        Vector3::repeat(f64::NAN)
    }
}

#[inline]
fn sample(avg: &mut MovingAverage, value: f64, seed: bool) {
    if seed || !value.is_finite() || !avg.value().is_finite() {
        avg.force(value);
    } else {
        avg.push(value);
    }
}

#[inline]
fn sample_angle(avg: &mut AngleAverage, value: f64, seed: bool) {
    if seed || !value.is_finite() || !avg.value().is_finite() {
        avg.force(value);
    } else {
        avg.push(value);
    }
}

#[derive(Debug, Clone)]
pub struct VesselState {
    valid: bool,

    // ─── Time ───────────────────────────────────────────────────────
    pub time: f64,
    pub delta_time: f64,

    // ─── Frame vectors (world axes) ─────────────────────────────────
    /// Center of mass relative to the body center [m].
    pub com: Vector3<f64>,
    pub up: Vector3<f64>,
    pub north: Vector3<f64>,
    pub east: Vector3<f64>,
    /// Vessel nose (`+Z` local).
    pub forward: Vector3<f64>,
    /// Vessel dorsal (`+Y` local).
    pub top: Vector3<f64>,
    /// Vessel starboard (`+X` local).
    pub right: Vector3<f64>,
    pub velocity_orbital: Vector3<f64>,
    pub velocity_surface: Vector3<f64>,
    pub orbit_prograde: Vector3<f64>,
    pub orbit_normal: Vector3<f64>,
    pub orbit_radial: Vector3<f64>,

    // ─── Rotations ──────────────────────────────────────────────────
    /// Vessel-local → world.
    pub rotation_vessel: UnitQuaternion<f64>,
    /// Vessel orientation relative to the north/up surface basis.
    pub rotation_vessel_surface: Option<UnitQuaternion<f64>>,
    /// Vessel orientation relative to the prograde/radial orbit basis.
    pub rotation_vessel_orbit: Option<UnitQuaternion<f64>>,

    // ─── Smoothed scalars ───────────────────────────────────────────
    pub speed_orbital: MovingAverage,
    pub speed_surface: MovingAverage,
    /// Positive away from the body.
    pub speed_vertical: MovingAverage,
    pub speed_horizontal: MovingAverage,
    /// Compass heading [deg], `[0, 360)`.
    pub heading: AngleAverage,
    /// Nose elevation above the horizon [deg].
    pub pitch: MovingAverage,
    /// Bank angle [deg], positive right wing down.
    pub roll: MovingAverage,
    pub altitude_asl: MovingAverage,
    /// Height above terrain (sea level over water); NaN on ray-cast miss.
    pub altitude_true: MovingAverage,
    pub apoapsis: MovingAverage,
    pub periapsis: MovingAverage,
    pub period: MovingAverage,
    pub time_to_ap: MovingAverage,
    pub time_to_pe: MovingAverage,
    pub inclination: MovingAverage,
    pub eccentricity: MovingAverage,
    pub semi_major_axis: MovingAverage,
    pub lan: MovingAverage,
    pub arg_pe: MovingAverage,
    pub latitude: MovingAverage,
    /// Body-fixed longitude [deg], `[-180, 180)`.
    pub longitude: AngleAverage,

    // ─── Aggregates ─────────────────────────────────────────────────
    /// [t]
    pub mass: f64,
    /// [kN]
    pub thrust_available: f64,
    pub drag_mass: f64,
    /// [kg/m³]
    pub atmospheric_density: f64,
    /// Full-throttle acceleration [m/s²]; zero for a massless vessel.
    pub max_thrust_accel: f64,
    /// μ / r² [m/s²].
    pub local_gravity: f64,

    pub body: BodyTelemetry,
    pub target: Option<TargetTelemetry>,
}

impl Default for VesselState {
    fn default() -> Self {
        Self::new()
    }
}

impl VesselState {
    /// Empty snapshot; [`is_valid`](Self::is_valid) is false until the first update.
    pub fn new() -> Self {
        let nan = Vector3::repeat(f64::NAN);
        Self {
            valid: false,
            time: 0.0,
            delta_time: 0.0,
            com: Vector3::zeros(),
            up: nan,
            north: nan,
            east: nan,
            forward: Vector3::z(),
            top: Vector3::y(),
            right: Vector3::x(),
            velocity_orbital: Vector3::zeros(),
            velocity_surface: Vector3::zeros(),
            orbit_prograde: nan,
            orbit_normal: nan,
            orbit_radial: nan,
            rotation_vessel: UnitQuaternion::identity(),
            rotation_vessel_surface: None,
            rotation_vessel_orbit: None,
            speed_orbital: MovingAverage::new(),
            speed_surface: MovingAverage::new(),
            speed_vertical: MovingAverage::new(),
            speed_horizontal: MovingAverage::new(),
            heading: AngleAverage::new(0.0),
            pitch: MovingAverage::new(),
            roll: MovingAverage::new(),
            altitude_asl: MovingAverage::new(),
            altitude_true: MovingAverage::new(),
            apoapsis: MovingAverage::new(),
            periapsis: MovingAverage::new(),
            period: MovingAverage::new(),
            time_to_ap: MovingAverage::new(),
            time_to_pe: MovingAverage::new(),
            inclination: MovingAverage::new(),
            eccentricity: MovingAverage::new(),
            semi_major_axis: MovingAverage::new(),
            lan: MovingAverage::new(),
            arg_pe: MovingAverage::new(),
            latitude: MovingAverage::new(),
            longitude: AngleAverage::new(-180.0),
            mass: 0.0,
            thrust_available: 0.0,
            drag_mass: 0.0,
            atmospheric_density: 0.0,
            max_thrust_accel: 0.0,
            local_gravity: 0.0,
            body: BodyTelemetry::default(),
            target: None,
        }
    }

    /// False until the first [`update`](Self::update).
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Rebuild the snapshot from this tick's telemetry.
    pub fn update(&mut self, telemetry: &VesselTelemetry) {
        let seed = !self.valid;
        let body = &telemetry.body;

        self.time = telemetry.universal_time;
        self.delta_time = telemetry.fixed_delta_time;
        self.body = body.clone();
        self.target = telemetry.target;

        // Frame vectors
        self.com = telemetry.position;
        let radius = self.com.norm();
        self.up = direction(&self.com);
        let spin_axis = Vector3::z();
        self.north = direction(&(spin_axis - self.up * spin_axis.dot(&self.up)));
        self.east = self.north.cross(&self.up);

        self.rotation_vessel = telemetry.rotation;
        self.forward = telemetry.rotation * Vector3::z();
        self.top = telemetry.rotation * Vector3::y();
        self.right = telemetry.rotation * Vector3::x();

        self.velocity_orbital = telemetry.velocity;
        let surface_motion = (spin_axis * body.rotation_rate).cross(&self.com);
        self.velocity_surface = telemetry.velocity - surface_motion;

        let angular_momentum = self.com.cross(&self.velocity_orbital);
        self.orbit_prograde = direction(&self.velocity_orbital);
        self.orbit_normal = direction(&angular_momentum);
        self.orbit_radial = self.up;

        self.rotation_vessel_surface = basis(&self.north, &self.up).map(|s| s.inverse() * self.rotation_vessel);
        self.rotation_vessel_orbit =
            basis(&self.velocity_orbital, &self.up).map(|o| o.inverse() * self.rotation_vessel);

        // Speeds
        let vertical = self.velocity_surface.dot(&self.up);
        let horizontal = (self.velocity_surface - self.up * vertical).norm();
        sample(&mut self.speed_orbital, self.velocity_orbital.norm(), seed);
        sample(&mut self.speed_surface, self.velocity_surface.norm(), seed);
        sample(&mut self.speed_vertical, vertical, seed);
        sample(&mut self.speed_horizontal, horizontal, seed);

        // Attitude
        let heading = self.forward.dot(&self.east).atan2(self.forward.dot(&self.north));
        let pitch = self.forward.dot(&self.up).clamp(-1.0, 1.0).asin();
        let roll = (-self.right.dot(&self.up)).atan2(self.top.dot(&self.up));
        sample_angle(&mut self.heading, wrap_degrees(heading.to_degrees()), seed);
        sample(&mut self.pitch, pitch.to_degrees(), seed);
        sample(&mut self.roll, roll.to_degrees(), seed);

        // Altitude
        let altitude_asl = radius - body.radius;
        let altitude_true = telemetry
            .terrain_height
            .map_or(f64::NAN, |terrain| altitude_asl - terrain.max(0.0));
        sample(&mut self.altitude_asl, altitude_asl, seed);
        sample(&mut self.altitude_true, altitude_true, seed);

        // Position on the body
        let latitude = self.up.z.clamp(-1.0, 1.0).asin().to_degrees();
        let longitude = {
            let lon = self.up.y.atan2(self.up.x) - body.rotation_angle;
            wrap_degrees(lon.to_degrees() + 180.0) - 180.0
        };
        sample(&mut self.latitude, latitude, seed);
        sample_angle(&mut self.longitude, longitude, seed);

        // Orbit
        let el = orbit_elements(
            &self.com,
            &self.velocity_orbital,
            body.gravitational_parameter,
            body.radius,
        );
        sample(&mut self.apoapsis, el.apoapsis, seed);
        sample(&mut self.periapsis, el.periapsis, seed);
        sample(&mut self.period, el.period, seed);
        sample(&mut self.time_to_ap, el.time_to_ap, seed);
        sample(&mut self.time_to_pe, el.time_to_pe, seed);
        sample(&mut self.inclination, el.inclination, seed);
        sample(&mut self.eccentricity, el.eccentricity, seed);
        sample(&mut self.semi_major_axis, el.semi_major_axis, seed);
        sample(&mut self.lan, el.lan, seed);
        sample(&mut self.arg_pe, el.arg_pe, seed);

        // Aggregates
        self.mass = telemetry.total_mass();
        self.thrust_available = telemetry.total_thrust();
        self.drag_mass = telemetry.drag_mass_product();
        self.atmospheric_density = telemetry.atmospheric_density;
        self.max_thrust_accel = if self.mass > 0.0 {
            self.thrust_available / self.mass
        } else {
            0.0
        };
        self.local_gravity = if radius > 0.0 {
            body.gravitational_parameter / (radius * radius)
        } else {
            f64::NAN
        };

        self.valid = true;
    }
}
