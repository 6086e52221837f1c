use std::time::Instant;

use crate::simulation::forces::{AccelSet, Acceleration, NewtonianGravity};
use crate::simulation::integrator::symplectic_euler;
use crate::simulation::states::{Body, NVec2, System};

/// Build a deterministic synthetic system of `n` bodies (no rand needed).
fn synthetic_system(n: usize) -> System {
    let mut bodies = Vec::with_capacity(n);
    for i in 0..n {
        let i_f = i as f64;
        bodies.push(Body {
            name: format!("b{i}"),
            x: NVec2::new((i_f * 0.37).sin() * 1.0e12, (i_f * 0.13).cos() * 1.0e12),
            v: NVec2::zeros(),
            a: NVec2::zeros(),
            m: 1.0e24,
            display_radius: 5.0,
            image: String::new(),
        });
    }
    System { bodies, t: 0.0 }
}

/// Time one direct pairwise gravity evaluation for growing body counts.
/// The interactive catalog has 9 bodies; larger sizes show the O(n^2) curve.
pub fn bench_gravity() {
    let ns = [9, 32, 128, 512, 2048];

    for n in ns {
        let sys = synthetic_system(n);
        let gravity = NewtonianGravity;
        let mut out = vec![NVec2::zeros(); n];

        // Warm up
        gravity.acceleration(0.0, &sys, &mut out);

        let t0 = Instant::now();
        gravity.acceleration(0.0, &sys, &mut out);
        let dt_direct = t0.elapsed().as_secs_f64();

        println!("N = {n:5}, direct = {dt_direct:8.6} s");
    }
}

/// Time a batch of full symplectic-Euler steps over the synthetic system,
/// which is what the blocking fast-forward phase spends its time on.
pub fn bench_step() {
    let steps = 10_000;
    let ns = [9, 32, 128];

    for n in ns {
        let mut sys = synthetic_system(n);
        let forces = AccelSet::new().with(NewtonianGravity);

        let t0 = Instant::now();
        for _ in 0..steps {
            symplectic_euler(&mut sys, &forces, 1000.0);
        }
        let elapsed = t0.elapsed().as_secs_f64();

        println!(
            "N = {n:5}, {steps} steps = {elapsed:8.6} s ({:8.1} steps/s)",
            steps as f64 / elapsed
        );
    }
}
