//! Force / acceleration contributors for the n-body core
//!
//! Defines the acceleration trait and the direct pairwise Newtonian gravity
//! used for the solar-system catalog. The body count is under a dozen, so
//! the O(n²) sum is intentional — no tree approximation, no symmetry
//! exploitation.

use crate::simulation::states::{NVec2, System};

/// Gravitational constant (SI units).
pub const GRAV_CONST: f64 = 6.67430e-11;

/// Acceleration a point at relative offset `d` experiences from a point mass
/// `attractor_mass` located at the origin of `d` (i.e. `d` points from the
/// attractor toward the subject):
///
/// `a = -G * m * d / |d|^3`
///
/// Undefined when `|d| = 0`; callers guarantee distinct positions at all
/// times (no collision handling anywhere in the system).
pub fn acceleration_from(d: NVec2, attractor_mass: f64) -> NVec2 {
    let r = d.norm();
    -GRAV_CONST * attractor_mass * d / (r * r * r)
}

/// Collection of acceleration terms.
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per body
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Compute total accelerations at time `t` for all bodies in `sys`
    /// - `out[i]` will be set to the sum of contributions from all terms
    pub fn accumulate_accels(&self, t: f64, sys: &System, out: &mut [NVec2]) {
        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec2::zeros();
        }
        for term in &self.terms {
            term.acceleration(t, sys, out);
        }
    }
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for acceleration sources operating on [`System`]
/// Implementations add their contribution into `out[i]` for each body
pub trait Acceleration {
    fn acceleration(&self, t: f64, sys: &System, out: &mut [NVec2]);
}

/// Direct pairwise Newtonian gravity, no softening.
///
/// Every body sums the [`acceleration_from`] contribution of every *other*
/// body. Iteration order over bodies is the stable order of `sys.bodies`, so
/// results are deterministic and reproducible across runs.
pub struct NewtonianGravity;

impl Acceleration for NewtonianGravity {
    fn acceleration(&self, _t: f64, sys: &System, out: &mut [NVec2]) {
        let n = sys.bodies.len();
        if n == 0 {
            return;
        }

        for i in 0..n {
            let bi = &sys.bodies[i];
            for j in 0..n {
                if j == i {
                    // no self-interaction
                    continue;
                }
                let bj = &sys.bodies[j];
                // d points from attractor j toward subject i
                let d = bi.x - bj.x;
                out[i] += acceleration_from(d, bj.m);
            }
        }
    }
}
