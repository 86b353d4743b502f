use bevy::prelude::*;
use constants::choreography::{
    DEBRIS_SPIN_RATE, ORBIT_ANGULAR_SPEED, ORBIT_CENTRE_DEPTH, ORBIT_CENTRE_SPREAD, ORBIT_RADIUS,
};
use rand::Rng;
use std::f32::consts::{PI, TAU};

/// Closed-form circular orbit of one debris fragment.
///
/// `u` and `v` are unit length and orthogonal for the fragment's whole
/// decomposed lifetime; only `angle` changes after generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    /// Radians in [0, 2π).
    pub angle: f32,
    /// Signed, radians per second.
    pub angular_speed: f32,
    pub radius: f32,
    pub centre: Vec3,
    pub u: Vec3,
    pub v: Vec3,
    /// Self-rotation about local X, radians per second.
    pub spin_x: f32,
    /// Self-rotation about local Y, radians per second.
    pub spin_y: f32,
}

impl OrbitState {
    pub fn position(&self) -> Vec3 {
        self.position_at(self.angle)
    }

    pub fn position_at(&self, angle: f32) -> Vec3 {
        self.centre + self.u * angle.cos() * self.radius + self.v * angle.sin() * self.radius
    }

    pub fn advance(&mut self, dt: f32) {
        self.angle = (self.angle + self.angular_speed * dt).rem_euclid(TAU);
    }

    /// Normal of the orbital plane.
    pub fn normal(&self) -> Vec3 {
        self.u.cross(self.v)
    }
}

/// Orthonormal basis of an orbital plane from inclination and longitude of
/// the ascending node. `u` points along the line of nodes.
pub fn orbital_plane_basis(inclination: f32, node_longitude: f32) -> (Vec3, Vec3) {
    let (sin_node, cos_node) = node_longitude.sin_cos();
    let (sin_inc, cos_inc) = inclination.sin_cos();

    let u = Vec3::new(cos_node, sin_node, 0.0);
    let v = Vec3::new(-sin_node * cos_inc, cos_node * cos_inc, sin_inc);
    (u, v)
}

/// Draw a fresh orbit; called once per debris fragment per decomposition.
pub fn generate_orbit(rng: &mut impl Rng) -> OrbitState {
    let radius = rng.gen_range(ORBIT_RADIUS);
    let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let angular_speed = rng.gen_range(ORBIT_ANGULAR_SPEED) * direction;
    let angle = rng.gen_range(0.0..TAU);

    let inclination = rng.gen_range(0.0..PI);
    let node_longitude = rng.gen_range(0.0..TAU);
    let (u, v) = orbital_plane_basis(inclination, node_longitude);

    // Slightly behind the navigation plane.
    let centre = Vec3::new(
        rng.gen_range(-ORBIT_CENTRE_SPREAD..ORBIT_CENTRE_SPREAD),
        rng.gen_range(-ORBIT_CENTRE_SPREAD..ORBIT_CENTRE_SPREAD),
        -rng.gen_range(ORBIT_CENTRE_DEPTH),
    );

    OrbitState {
        angle,
        angular_speed,
        radius,
        centre,
        u,
        v,
        spin_x: rng.gen_range(-DEBRIS_SPIN_RATE..DEBRIS_SPIN_RATE),
        spin_y: rng.gen_range(-DEBRIS_SPIN_RATE..DEBRIS_SPIN_RATE),
    }
}
