//! Fixed-step time integrator for the solar-system state
//!
//! Semi-implicit (symplectic) Euler driven by an `AccelSet`. The step size is
//! externally supplied, may be arbitrarily large (fast-forward uses oversized
//! steps on purpose) and may be negative to run time backward.

use super::forces::AccelSet;
use super::states::{NVec2, System};

/// Advance the system by one step of size `dt` using semi-implicit Euler.
///
/// Two strictly separated passes:
/// 1. recompute every body's acceleration from a single consistent snapshot
///    of positions (velocities must not move mid-pass, or later bodies in
///    iteration order would see inconsistent forces),
/// 2. `v += a*dt` then `x += v*dt` for every body, and advance `sys.t`.
///
/// The computed accelerations are written back into each body so the UI
/// collaborator can read them as overlay values; they are derived state and
/// never trusted across a step boundary.
pub fn symplectic_euler(sys: &mut System, forces: &AccelSet, dt: f64) {
    let n = sys.bodies.len();
    if n == 0 {
        return;
    }

    let mut accels = vec![NVec2::zeros(); n];
    forces.accumulate_accels(sys.t, &*sys, &mut accels);

    for (b, a) in sys.bodies.iter_mut().zip(accels.iter()) {
        b.a = *a;
        b.v += *a * dt;
        b.x += b.v * dt;
    }

    sys.t += dt;
}
