use chrono::Duration;

use solsim::simulation::clock::{SimulationClock, FRAME_RATE_FLOOR};
use solsim::simulation::forces::{AccelSet, NewtonianGravity, GRAV_CONST};
use solsim::simulation::integrator::symplectic_euler;
use solsim::simulation::session::{SessionState, SimulationSession};
use solsim::simulation::states::{Body, NVec2, System};
use solsim::simulation::viewport::Viewport;
use solsim::{BodySnapshot, CatalogConfig, Storage, StorageError};

/// Build a star-plus-planet system: star at the origin, planet on the +x
/// axis with a tangential velocity.
pub fn star_planet_system(star_m: f64, r: f64, planet_m: f64, v_t: f64) -> System {
    let star = Body {
        name: "star".to_string(),
        x: NVec2::zeros(),
        v: NVec2::zeros(),
        a: NVec2::zeros(),
        m: star_m,
        display_radius: 15.0,
        image: String::new(),
    };
    let planet = Body {
        name: "planet".to_string(),
        x: NVec2::new(r, 0.0),
        v: NVec2::new(0.0, v_t),
        a: NVec2::zeros(),
        m: planet_m,
        display_radius: 6.0,
        image: String::new(),
    };
    System {
        bodies: vec![star, planet],
        t: 0.0,
    }
}

/// Build a gravity-only AccelSet
pub fn gravity_set() -> AccelSet {
    AccelSet::new().with(NewtonianGravity)
}

/// A session over the built-in catalog, running at its epoch.
pub fn running_session() -> SimulationSession {
    let mut session = SimulationSession::builtin();
    let epoch = session.epoch();
    session.start(epoch);
    session
}

// ==================================================================================
// Gravity tests
// ==================================================================================

#[test]
fn gravity_newton_third_law() {
    let sys = star_planet_system(2.0e30, 1.0e11, 6.0e24, 0.0);
    let forces = gravity_set();

    let mut acc = vec![NVec2::zeros(); 2];
    forces.accumulate_accels(sys.t, &sys, &mut acc);

    let net = acc[0] * sys.bodies[0].m + acc[1] * sys.bodies[1].m;
    let scale = (acc[1] * sys.bodies[1].m).norm();

    assert!(net.norm() < 1e-9 * scale, "Net force not zero: {:?}", net);
}

#[test]
fn gravity_points_toward_attractor() {
    let sys = star_planet_system(2.0e30, 1.0e11, 6.0e24, 0.0);
    let forces = gravity_set();

    let mut acc = vec![NVec2::zeros(); 2];
    forces.accumulate_accels(sys.t, &sys, &mut acc);

    // planet sits on +x, so its acceleration must point along -x
    assert!(acc[1].x < 0.0, "Acceleration not toward the star");
    assert!(acc[1].y.abs() < 1e-20);
}

#[test]
fn gravity_inverse_square_law() {
    let sys_r = star_planet_system(2.0e30, 1.0e11, 6.0e24, 0.0);
    let sys_2r = star_planet_system(2.0e30, 2.0e11, 6.0e24, 0.0);
    let forces = gravity_set();

    let mut acc_r = vec![NVec2::zeros(); 2];
    let mut acc_2r = vec![NVec2::zeros(); 2];
    forces.accumulate_accels(sys_r.t, &sys_r, &mut acc_r);
    forces.accumulate_accels(sys_2r.t, &sys_2r, &mut acc_2r);

    let ratio = acc_r[1].norm() / acc_2r[1].norm();
    assert!((ratio - 4.0).abs() < 1e-9, "Expected ~4x, got {}", ratio);
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn integrator_conserves_momentum() {
    let mut sys = CatalogConfig::builtin().build_system();
    let forces = gravity_set();

    let p0 = sys.total_momentum();
    let scale: f64 = sys.bodies.iter().map(|b| b.m * b.v.norm()).sum();

    for _ in 0..1000 {
        symplectic_euler(&mut sys, &forces, 3600.0);
    }

    let drift = (sys.total_momentum() - p0).norm();
    assert!(drift < 1e-9 * scale, "Momentum drift too large: {}", drift);
}

#[test]
fn integrator_is_deterministic() {
    let mut sys_a = CatalogConfig::builtin().build_system();
    let mut sys_b = CatalogConfig::builtin().build_system();
    let forces = gravity_set();

    // same dt sequence must give bit-identical trajectories
    let dts = [3600.0, -1200.0, 86_400.0, 500.0];
    for _ in 0..50 {
        for dt in dts {
            symplectic_euler(&mut sys_a, &forces, dt);
            symplectic_euler(&mut sys_b, &forces, dt);
        }
    }

    for (a, b) in sys_a.bodies.iter().zip(sys_b.bodies.iter()) {
        assert_eq!(a.x, b.x);
        assert_eq!(a.v, b.v);
    }
    assert_eq!(sys_a.t, sys_b.t);
}

#[test]
fn integrator_reverses_with_negative_dt() {
    let mut sys = CatalogConfig::builtin().build_system();
    let forces = gravity_set();

    for _ in 0..100 {
        symplectic_euler(&mut sys, &forces, 1000.0);
    }
    assert_eq!(sys.t, 100_000.0);

    for _ in 0..100 {
        symplectic_euler(&mut sys, &forces, -1000.0);
    }
    assert_eq!(sys.t, 0.0);

    // semi-implicit Euler is not exactly time-reversible, but 100 small
    // steps out and back must land close to the start
    let fresh = CatalogConfig::builtin().build_system();
    for (a, b) in sys.bodies.iter().zip(fresh.bodies.iter()) {
        let rel = (a.x - b.x).norm() / b.x.norm();
        assert!(rel < 1e-3, "{} drifted by {:.3e} relative", a.name, rel);
    }
}

#[test]
fn two_body_orbit_bounded_and_periodic() {
    let star_m = 1.0e30;
    let r0 = 1.0e11;
    let v0 = 3.0e4;
    let dt = 3600.0;

    let mut sys = star_planet_system(star_m, r0, 1.0, v0);
    let forces = gravity_set();

    // vis-viva: 1/a = 2/r - v^2/(G M), then Kepler's third law for the period
    let gm = GRAV_CONST * star_m;
    let a = 1.0 / (2.0 / r0 - v0 * v0 / gm);
    let period = 2.0 * std::f64::consts::PI * (a * a * a / gm).sqrt();
    let steps = (period / dt).round() as usize;

    let apoapsis = a * (1.0 + (1.0 - r0 / a).abs());
    let mut r_max: f64 = 0.0;
    for _ in 0..steps {
        symplectic_euler(&mut sys, &forces, dt);
        r_max = r_max.max(sys.bodies[1].x.norm());
    }

    assert!(
        r_max < 1.5 * apoapsis,
        "Orbit escaped: r_max = {:.3e}",
        r_max
    );

    // after one full period the planet must be back near its start angle
    let angle = sys.bodies[1].x.y.atan2(sys.bodies[1].x.x);
    assert!(
        angle.abs() < 0.15,
        "Did not return to start angle: {} rad",
        angle
    );
}

// ==================================================================================
// Clock tests
// ==================================================================================

#[test]
fn clock_decouples_rate_from_frame_rate() {
    let mut clock = SimulationClock::new();
    clock.set_rate(86_400.0);

    // above the floor, dt * frame_rate always recovers dt_per_s
    for fps in [30.0, 60.0, 144.0] {
        let dt = clock.advance(fps);
        assert_eq!(dt * fps, 86_400.0);
    }
}

#[test]
fn clock_floors_low_frame_rates() {
    let mut clock = SimulationClock::new();
    clock.set_rate(86_400.0);

    // below the floor the step is computed as if running at 30 fps
    assert_eq!(clock.advance(10.0), 86_400.0 / FRAME_RATE_FLOOR);
    assert_eq!(clock.advance(29.9), 86_400.0 / FRAME_RATE_FLOOR);

    // and the UI readout reflects the slower wall-clock progress
    assert!(clock.effective_dt_per_s(10.0) < 86_400.0);
    assert_eq!(clock.effective_dt_per_s(60.0), 86_400.0);
}

#[test]
fn clock_accepts_unbounded_signed_rates() {
    let mut clock = SimulationClock::new();

    clock.set_rate(-3.0e12);
    assert_eq!(clock.advance(60.0), -5.0e10);

    clock.set_rate(0.0);
    assert_eq!(clock.advance(60.0), 0.0);
}

#[test]
fn clock_ramp_grows_with_magnitude() {
    let mut clock = SimulationClock::new();
    clock.set_rate(86_400.0);

    clock.ramp(1.0, 1.0);
    let after_up = clock.dt_per_s();
    // one held second = 60 ticks of (1000 + rate/1000)
    assert!((after_up - (86_400.0 + 60.0 * (1000.0 + 86.4))).abs() < 1e-6);

    clock.ramp(-1.0, 1.0);
    assert!(clock.dt_per_s() < after_up);
}

// ==================================================================================
// Viewport tests
// ==================================================================================

fn probe_body(x: f64, y: f64) -> Body {
    Body {
        name: "probe".to_string(),
        x: NVec2::new(x, y),
        v: NVec2::zeros(),
        a: NVec2::zeros(),
        m: 1.0,
        display_radius: 10.0,
        image: String::new(),
    }
}

#[test]
fn viewport_projection_formula() {
    let vp = Viewport::new(800.0, 700.0);
    // one pixel is 4_182_695_000 m at zoom 1.0
    let b = probe_body(4_182_695_000.0, -4_182_695_000.0);

    let p = vp.project(&b);
    assert!((p.x - 401.0).abs() < 1e-9);
    // screen y grows downward, so negative sim y lands below center
    assert!((p.y - 351.0).abs() < 1e-9);
}

#[test]
fn viewport_zoom_clamps_exactly() {
    let mut vp = Viewport::new(800.0, 700.0);

    vp.adjust_zoom(1000.0);
    assert_eq!(vp.zoom(), 5.0);

    vp.adjust_zoom(-1000.0);
    assert_eq!(vp.zoom(), 0.3);
}

#[test]
fn viewport_resize_round_trip() {
    let mut vp = Viewport::new(800.0, 700.0);
    vp.adjust_zoom(0.5);
    vp.pan_by(12.0, -7.0);
    let b = probe_body(2.0e11, -3.0e11);

    let before = vp.project(&b);
    vp.on_resize(1920.0, 1080.0);
    vp.on_resize(800.0, 700.0);
    let after = vp.project(&b);

    assert_eq!(before, after);
}

#[test]
fn viewport_follow_centers_target() {
    let mut vp = Viewport::new(800.0, 700.0);
    let bodies = vec![probe_body(2.0e11, 1.0e11), probe_body(-4.0e11, 0.0)];

    vp.set_follow_target(Some(1));
    vp.update_follow(&bodies);

    let p = vp.project(&bodies[1]);
    assert!((p.x - 400.0).abs() < 1e-9);
    assert!((p.y - 350.0).abs() < 1e-9);
}

#[test]
fn viewport_manual_pan_ignored_while_following() {
    let mut vp = Viewport::new(800.0, 700.0);
    let bodies = vec![probe_body(1.0e11, 0.0)];
    vp.set_follow_target(Some(0));
    vp.update_follow(&bodies);
    let pan = vp.pan();

    vp.pan_by(50.0, 50.0);
    assert_eq!(vp.pan(), pan);
}

#[test]
fn viewport_pick_hits_first_body_in_order() {
    let mut vp = Viewport::new(800.0, 700.0);
    // both bodies project to the screen center, rects overlap fully
    let bodies = vec![probe_body(0.0, 0.0), probe_body(0.0, 0.0)];

    let hit = vp.pick_body_at(NVec2::new(400.0, 350.0), &bodies);
    assert_eq!(hit, Some(0));
    assert_eq!(vp.follow_target(), Some(0));
}

#[test]
fn viewport_pick_miss_clears_target() {
    let mut vp = Viewport::new(800.0, 700.0);
    let bodies = vec![probe_body(0.0, 0.0)];

    assert_eq!(vp.pick_body_at(NVec2::new(400.0, 350.0), &bodies), Some(0));
    assert_eq!(vp.pick_body_at(NVec2::new(10.0, 10.0), &bodies), None);
    assert_eq!(vp.follow_target(), None);
}

#[test]
fn viewport_tolerates_removed_follow_target() {
    let mut vp = Viewport::new(800.0, 700.0);
    vp.set_follow_target(Some(7));

    vp.update_follow(&[probe_body(0.0, 0.0)]);
    assert_eq!(vp.follow_target(), None);
}

// ==================================================================================
// Session tests
// ==================================================================================

#[test]
fn session_fast_forward_matches_live_stepping() {
    let mut ff = SimulationSession::builtin();
    let epoch = ff.epoch();
    ff.start(epoch);
    ff.fast_forward_to(epoch + Duration::days(10));

    // live path: dt_per_s of 60_000 at 60 fps gives the same 1000 s steps
    let mut live = running_session();
    live.set_rate(60_000.0);
    for _ in 0..864 {
        live.step(60.0);
    }

    assert_eq!(ff.simulation_time(), live.simulation_time());
    for (a, b) in ff.bodies().iter().zip(live.bodies().iter()) {
        let rel = (a.x - b.x).norm() / b.x.norm();
        assert!(rel < 1e-12, "{} diverged by {:.3e}", a.name, rel);
    }
}

#[test]
fn session_fast_forward_backward_terminates() {
    let mut session = SimulationSession::builtin();
    let target = session.epoch() - Duration::days(5);

    session.start(target);

    assert_eq!(session.state(), SessionState::Running);
    assert_eq!(session.current_date(), target);
    assert!(session.simulation_time() < 0.0);
}

#[test]
fn session_start_at_epoch_skips_catch_up() {
    let mut session = SimulationSession::builtin();
    let epoch = session.epoch();

    session.start(epoch);

    assert_eq!(session.state(), SessionState::Running);
    assert_eq!(session.simulation_time(), 0.0);
}

#[test]
fn session_pause_freezes_physics_not_camera() {
    let mut session = running_session();
    for _ in 0..10 {
        session.step(60.0);
    }

    // follow the Sun (index 0), then pause
    let sun_pos = session.viewport().project_unpanned(&session.bodies()[0]);
    assert!(session.set_follow_target(sun_pos).is_some());
    session.pause();
    assert_eq!(session.state(), SessionState::Paused);

    let frozen: Vec<NVec2> = session.bodies().iter().map(|b| b.x).collect();
    for _ in 0..5 {
        session.step(60.0);
    }

    for (b, x0) in session.bodies().iter().zip(frozen.iter()) {
        assert_eq!(b.x, *x0);
    }
    // camera still recentered on the target each frame
    let p = session.viewport().project(&session.bodies()[0]);
    assert!((p.x - 400.0).abs() < 1e-9);
    assert!((p.y - 350.0).abs() < 1e-9);

    session.resume();
    assert_eq!(session.state(), SessionState::Running);
}

#[test]
fn session_reset_reloads_catalog() {
    let mut session = running_session();
    session.set_rate(1.0e7);
    session.set_zoom_delta(2.0);
    for _ in 0..50 {
        session.step(60.0);
    }

    let epoch = session.epoch();
    session.reset(epoch);

    assert_eq!(session.state(), SessionState::Running);
    assert_eq!(session.simulation_time(), 0.0);
    assert_eq!(session.viewport().zoom(), 1.0);
    assert_eq!(session.viewport().follow_target(), None);

    let fresh = CatalogConfig::builtin().build_system();
    for (a, b) in session.bodies().iter().zip(fresh.bodies.iter()) {
        assert_eq!(a.x, b.x);
        assert_eq!(a.v, b.v);
    }
}

#[test]
fn session_snapshot_round_trip_is_exact() {
    let mut session = running_session();
    session.set_rate(2.5e5);
    session.set_zoom_delta(0.4);
    session.pan_by(33.0, -12.0);
    for _ in 0..200 {
        session.step(60.0);
    }

    let snapshot = session.snapshot();

    let mut restored = SimulationSession::builtin();
    restored.restore(Some(snapshot.clone())).unwrap();

    assert_eq!(restored.simulation_time(), session.simulation_time());
    assert_eq!(restored.clock().dt_per_s(), session.clock().dt_per_s());
    assert_eq!(restored.viewport().zoom(), session.viewport().zoom());
    assert_eq!(restored.viewport().pan(), session.viewport().pan());
    for (a, b) in restored.bodies().iter().zip(session.bodies().iter()) {
        assert_eq!(a.x, b.x);
        assert_eq!(a.v, b.v);
    }

    // and the snapshot of the restored session is byte-for-byte the same
    assert_eq!(restored.snapshot(), snapshot);
}

#[test]
fn session_restore_none_starts_fresh() {
    let mut session = SimulationSession::builtin();
    session.restore(None).unwrap();

    assert_eq!(session.state(), SessionState::Running);
    assert_eq!(session.simulation_time(), 0.0);

    let fresh = CatalogConfig::builtin().build_system();
    for (a, b) in session.bodies().iter().zip(fresh.bodies.iter()) {
        assert_eq!(a.x, b.x);
    }
}

#[test]
fn session_restore_rejects_unknown_body() {
    let mut session = SimulationSession::builtin();
    let mut snapshot = session.snapshot();
    snapshot.space_objects.push(BodySnapshot {
        name: "Pluto".to_string(),
        x: 0.0,
        y: 0.0,
        v_x: 0.0,
        v_y: 0.0,
    });

    let err = session.restore(Some(snapshot)).unwrap_err();
    assert!(matches!(err, StorageError::CorruptState(_)));

    // fallback policy: the session is left at valid catalog defaults
    let fresh = CatalogConfig::builtin().build_system();
    for (a, b) in session.bodies().iter().zip(fresh.bodies.iter()) {
        assert_eq!(a.x, b.x);
    }
}

#[test]
fn session_restore_rejects_non_finite_fields() {
    let mut session = SimulationSession::builtin();
    let mut snapshot = session.snapshot();
    snapshot.space_objects[0].v_x = f64::NAN;

    let err = session.restore(Some(snapshot)).unwrap_err();
    assert!(matches!(err, StorageError::CorruptState(_)));
}

#[test]
fn session_restore_clamps_out_of_range_zoom() {
    let mut session = SimulationSession::builtin();
    let mut snapshot = session.snapshot();
    snapshot.zoom = 80.0;

    // out-of-range zoom saturates, it is never an error
    session.restore(Some(snapshot)).unwrap();
    assert_eq!(session.viewport().zoom(), 5.0);
}

#[test]
fn session_snapshot_and_exit_terminates() {
    let mut session = running_session();
    let _ = session.snapshot_and_exit();

    assert_eq!(session.state(), SessionState::Terminated);

    // a terminated session ignores further ticks
    let t = session.simulation_time();
    session.step(60.0);
    assert_eq!(session.simulation_time(), t);
}

// ==================================================================================
// Storage tests
// ==================================================================================

#[test]
fn storage_file_round_trip() {
    let path = std::env::temp_dir().join(format!("solsim_test_{}.json", std::process::id()));
    let storage = Storage::new(&path);

    let snapshot = running_session().snapshot();
    storage.save(&snapshot).unwrap();
    assert_eq!(storage.load().unwrap(), Some(snapshot));

    storage.clear().unwrap();
    assert_eq!(storage.load().unwrap(), None);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn storage_missing_file_is_no_session() {
    let storage = Storage::new("/nonexistent-dir-for-sure/state.json");
    assert!(matches!(storage.load(), Ok(None)));
}
