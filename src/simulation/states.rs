//! Core state types for the solar-system simulation.
//!
//! Defines the 2D body/system structs:
//! - `Body`   — one celestial object (identity + physical state)
//! - `System` — the full set of bodies plus the current simulation time `t`
//!
//! `t` is signed seconds since the catalog epoch; it runs backward when the
//! user reverses time.

use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone)]
pub struct Body {
    pub name: String, // identity, unique within a session
    pub x: NVec2, // position (m)
    pub v: NVec2, // velocity (m/s)
    pub a: NVec2, // acceleration (m/s^2), recomputed every step, never persisted
    pub m: f64, // mass (kg), > 0
    pub display_radius: f64, // on-screen sprite size in pixels at zoom 1.0
    pub image: String, // opaque image reference for the UI collaborator
}

impl Body {
    /// Orbital speed `|v|`, shown as overlay text by the UI collaborator.
    pub fn orbital_speed(&self) -> f64 {
        self.v.norm()
    }

    /// Orbital acceleration magnitude `|a|`.
    pub fn orbital_acceleration(&self) -> f64 {
        self.a.norm()
    }
}

#[derive(Debug, Clone)]
pub struct System {
    pub bodies: Vec<Body>, // collection of bodies, stable iteration order
    pub t: f64, // seconds since epoch, signed
}

impl System {
    /// Total momentum `Σ m·v`. Conserved by the integrator up to
    /// floating-point drift; used by tests and diagnostics.
    pub fn total_momentum(&self) -> NVec2 {
        self.bodies
            .iter()
            .fold(NVec2::zeros(), |p, b| p + b.m * b.v)
    }
}
