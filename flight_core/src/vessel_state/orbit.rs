//! Keplerian elements from a single position/velocity pair.
//!
//! Angles are in degrees except the true anomaly. Altitudes are measured from
//! the body's sea-level radius. Open trajectories report an infinite period,
//! apoapsis and time to apoapsis; a radial trajectory (zero angular momentum)
//! yields NaN angles, which callers treat as a sentinel.

use std::f64::consts::{PI, TAU};

use nalgebra::Vector3;

const CIRCULAR_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitElements {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    /// [deg]
    pub inclination: f64,
    /// Longitude of the ascending node [deg], measured from world `+X`.
    pub lan: f64,
    /// Argument of periapsis [deg].
    pub arg_pe: f64,
    /// [rad], in `[0, 2π)`.
    pub true_anomaly: f64,
    /// Apoapsis altitude [m].
    pub apoapsis: f64,
    /// Periapsis altitude [m].
    pub periapsis: f64,
    /// [s]
    pub period: f64,
    /// [s]
    pub time_to_ap: f64,
    /// [s]; negative once past periapsis on an open trajectory.
    pub time_to_pe: f64,
}

/// Angle wrapped into `[0, 360)`.
#[inline]
pub(crate) fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

pub fn orbit_elements(
    position: &Vector3<f64>,
    velocity: &Vector3<f64>,
    mu: f64,
    body_radius: f64,
) -> OrbitElements {
    let r = position.norm();
    let h = position.cross(velocity);
    let h_norm = h.norm();
    let h_hat = h / h_norm;

    let e_vec = velocity.cross(&h) / mu - position / r;
    let eccentricity = e_vec.norm();

    let energy = velocity.norm_squared() / 2.0 - mu / r;
    let semi_major_axis = -mu / (2.0 * energy);

    let inclination = (h.z / h_norm).clamp(-1.0, 1.0).acos().to_degrees();

    // Ascending node; equatorial orbits measure from +X.
    let node = Vector3::z().cross(&h);
    let node_hat = if node.norm() > CIRCULAR_EPS * h_norm.max(1.0) {
        node.normalize()
    } else {
        Vector3::x()
    };
    let lan = wrap_degrees(node_hat.y.atan2(node_hat.x).to_degrees());

    // Periapsis direction; circular orbits measure from the node.
    let (pe_hat, arg_pe) = if eccentricity > CIRCULAR_EPS {
        let pe_hat = e_vec / eccentricity;
        let arg = h_hat.cross(&node_hat).dot(&pe_hat).atan2(node_hat.dot(&pe_hat));
        (pe_hat, wrap_degrees(arg.to_degrees()))
    } else {
        (node_hat, 0.0)
    };

    let q_hat = h_hat.cross(&pe_hat);
    let true_anomaly = position.dot(&q_hat).atan2(position.dot(&pe_hat)).rem_euclid(TAU);

    let closed = eccentricity < 1.0 && semi_major_axis > 0.0;
    let (apoapsis, period) = if closed {
        (
            semi_major_axis * (1.0 + eccentricity) - body_radius,
            TAU * (semi_major_axis.powi(3) / mu).sqrt(),
        )
    } else {
        (f64::INFINITY, f64::INFINITY)
    };
    let periapsis = semi_major_axis * (1.0 - eccentricity) - body_radius;

    let mean_motion = (mu / semi_major_axis.abs().powi(3)).sqrt();
    let (time_to_ap, time_to_pe) = if closed {
        let half = (true_anomaly / 2.0).tan();
        let ecc_anomaly = 2.0 * (((1.0 - eccentricity) / (1.0 + eccentricity)).sqrt() * half).atan();
        let mean_anomaly = (ecc_anomaly - eccentricity * ecc_anomaly.sin()).rem_euclid(TAU);
        (
            (PI - mean_anomaly).rem_euclid(TAU) / mean_motion,
            (TAU - mean_anomaly).rem_euclid(TAU) / mean_motion,
        )
    } else {
        // Hyperbolic anomaly; true anomaly folded into (-π, π].
        let nu = if true_anomaly > PI { true_anomaly - TAU } else { true_anomaly };
        let half = (nu / 2.0).tan();
        let hyp_anomaly =
            2.0 * (((eccentricity - 1.0) / (eccentricity + 1.0)).sqrt() * half).atanh();
        let mean_anomaly = eccentricity * hyp_anomaly.sinh() - hyp_anomaly;
        (f64::INFINITY, -mean_anomaly / mean_motion)
    };

    OrbitElements {
        semi_major_axis,
        eccentricity,
        inclination,
        lan,
        arg_pe,
        true_anomaly,
        apoapsis,
        periapsis,
        period,
        time_to_ap,
        time_to_pe,
    }
}
