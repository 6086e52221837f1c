//! Session lifecycle: fast-forward, live stepping, pause, reset, snapshot.
//!
//! `SimulationSession` owns the body collection and orchestrates the
//! integrator, viewport and clock across the session state machine. It is
//! single-threaded and frame-driven: the UI collaborator calls [`step`] once
//! per rendered frame and routes input through the thin control methods.
//!
//! [`step`]: SimulationSession::step

use chrono::{Duration, NaiveDate};
use tracing::info;

use crate::configuration::config::CatalogConfig;
use crate::persistence::storage::{BodySnapshot, Snapshot, StorageError};
use crate::simulation::clock::SimulationClock;
use crate::simulation::forces::{AccelSet, NewtonianGravity};
use crate::simulation::integrator::symplectic_euler;
use crate::simulation::states::{Body, NVec2, System};
use crate::simulation::viewport::{ScreenRect, Viewport};

/// Fixed step magnitude (seconds) for the blocking catch-up phase. With
/// day-granularity date comparison this always lands on the target day,
/// since the date is floored to whole days from the second accumulator.
pub const FAST_FORWARD_DT: f64 = 1000.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Initializing,
    FastForwarding,
    Running,
    Paused,
    Terminated,
}

pub struct SimulationSession {
    catalog: CatalogConfig,
    system: System,
    forces: AccelSet,
    clock: SimulationClock,
    viewport: Viewport,
    state: SessionState,
}

impl SimulationSession {
    pub fn new(catalog: CatalogConfig) -> Self {
        let system = catalog.build_system();
        let forces = AccelSet::new().with(NewtonianGravity);
        Self {
            catalog,
            system,
            forces,
            clock: SimulationClock::new(),
            viewport: Viewport::default(),
            state: SessionState::Initializing,
        }
    }

    /// Session over the built-in nine-body solar system.
    pub fn builtin() -> Self {
        Self::new(CatalogConfig::builtin())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn epoch(&self) -> NaiveDate {
        self.catalog.epoch
    }

    /// Signed seconds elapsed since the catalog epoch.
    pub fn simulation_time(&self) -> f64 {
        self.system.t
    }

    /// Absolute date of the simulation, at day granularity:
    /// `epoch + floor(t / 86400)` days. Flooring (not truncation) keeps the
    /// date consistent when time runs backward past the epoch.
    pub fn current_date(&self) -> NaiveDate {
        let days = (self.system.t / SECONDS_PER_DAY).floor() as i64;
        self.catalog.epoch + Duration::days(days)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.system.bodies
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Begin the session at `target_date`. When the target is not the epoch
    /// day, a blocking catch-up phase integrates there first.
    pub fn start(&mut self, target_date: NaiveDate) {
        if self.current_date() != target_date {
            self.catch_up_to(target_date);
        }
        self.state = SessionState::Running;
        info!(date = %self.current_date(), "session running");
    }

    /// Jump the simulation to an arbitrary date from its current position.
    /// Blocking: no rendering happens between the catch-up steps.
    pub fn fast_forward_to(&mut self, target_date: NaiveDate) {
        if self.current_date() != target_date {
            self.catch_up_to(target_date);
        }
        self.state = SessionState::Running;
    }

    fn catch_up_to(&mut self, target_date: NaiveDate) {
        self.state = SessionState::FastForwarding;
        let dt = if target_date > self.current_date() {
            FAST_FORWARD_DT
        } else {
            -FAST_FORWARD_DT
        };
        info!(date = %target_date, dt, "fast-forward started");

        let mut steps: u64 = 0;
        while self.current_date() != target_date {
            symplectic_euler(&mut self.system, &self.forces, dt);
            steps += 1;
        }
        info!(date = %target_date, steps, "fast-forward complete");
    }

    /// One cooperative tick, called once per rendered frame.
    ///
    /// While `Running`, derives this frame's `dt` from the measured frame
    /// rate and advances the physics. While `Paused`, physics stands still
    /// but follow/pan recomputation continues so the camera stays glued to
    /// its target. Any other state is a no-op.
    pub fn step(&mut self, measured_frame_rate: f64) {
        match self.state {
            SessionState::Running => {
                let dt = self.clock.advance(measured_frame_rate);
                symplectic_euler(&mut self.system, &self.forces, dt);
            }
            SessionState::Paused => {}
            _ => return,
        }
        self.viewport.update_follow(&self.system.bodies);
    }

    pub fn pause(&mut self) {
        if self.state == SessionState::Running {
            self.state = SessionState::Paused;
            info!("session paused");
        }
    }

    pub fn resume(&mut self) {
        if self.state == SessionState::Paused {
            self.state = SessionState::Running;
            info!("session resumed");
        }
    }

    /// Discard the current bodies, reload the catalog and restart at
    /// `new_epoch_date`. The caller owns clearing any persisted snapshot.
    pub fn reset(&mut self, new_epoch_date: NaiveDate) {
        self.system = self.catalog.build_system();
        self.clock = SimulationClock::new();
        self.viewport.reset();
        self.state = SessionState::Initializing;
        info!(date = %new_epoch_date, "session reset");
        self.start(new_epoch_date);
    }

    // ------------------------------------------------------------------
    // Camera / rate controls, routed from the UI collaborator
    // ------------------------------------------------------------------

    pub fn set_zoom_delta(&mut self, delta: f64) {
        self.viewport.adjust_zoom(delta);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.viewport.pan_by(dx, dy);
    }

    /// Hit-test a click against the bodies; the first hit becomes the follow
    /// target, a miss clears it.
    pub fn set_follow_target(&mut self, screen_point: NVec2) -> Option<usize> {
        self.viewport.pick_body_at(screen_point, &self.system.bodies)
    }

    pub fn clear_follow_target(&mut self) {
        self.viewport.set_follow_target(None);
    }

    /// Restore the home view (zoom 1.0, centered, nothing followed).
    pub fn reset_camera(&mut self) {
        self.viewport.reset();
    }

    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.viewport.on_resize(width, height);
        self.viewport.update_follow(&self.system.bodies);
    }

    pub fn set_rate(&mut self, dt_per_s: f64) {
        self.clock.set_rate(dt_per_s);
    }

    /// Ramp the time rate while a speed control is held; see
    /// [`SimulationClock::ramp`].
    pub fn ramp_rate(&mut self, direction: f64, real_dt: f64) {
        self.clock.ramp(direction, real_dt);
    }

    /// Projected screen rectangle of body `index`, for hit feedback and
    /// overlay rendering.
    pub fn screen_rect(&self, index: usize) -> Option<ScreenRect> {
        self.system
            .bodies
            .get(index)
            .map(|b| self.viewport.screen_rect(b))
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            space_objects: self
                .system
                .bodies
                .iter()
                .map(|b| BodySnapshot {
                    name: b.name.clone(),
                    x: b.x.x,
                    y: b.x.y,
                    v_x: b.v.x,
                    v_y: b.v.y,
                })
                .collect(),
            time: self.system.t,
            dt_per_s: self.clock.dt_per_s(),
            zoom: self.viewport.zoom(),
            camera_offset: [self.viewport.pan().x, self.viewport.pan().y],
        }
    }

    /// Serialize the session state and leave the state machine.
    pub fn snapshot_and_exit(&mut self) -> Snapshot {
        let snapshot = self.snapshot();
        self.state = SessionState::Terminated;
        info!("session terminated");
        snapshot
    }

    /// Resume from a snapshot, or start fresh from catalog defaults when
    /// `None`.
    ///
    /// The catalog is reloaded first, then the snapshot values are applied
    /// on top, so a corrupt snapshot leaves the session at valid catalog
    /// defaults — the caller logs the error and carries on.
    pub fn restore(&mut self, snapshot: Option<Snapshot>) -> Result<(), StorageError> {
        self.system = self.catalog.build_system();

        let Some(snap) = snapshot else {
            self.state = SessionState::Running;
            return Ok(());
        };

        validate_snapshot(&snap, &self.system.bodies)?;

        for so in &snap.space_objects {
            // validated above: every snapshot name matches a catalog body
            if let Some(b) = self.system.bodies.iter_mut().find(|b| b.name == so.name) {
                b.x = NVec2::new(so.x, so.y);
                b.v = NVec2::new(so.v_x, so.v_y);
            }
        }
        self.system.t = snap.time;
        self.clock.set_rate(snap.dt_per_s);
        self.viewport.set_zoom(snap.zoom);
        self.viewport
            .set_pan(NVec2::new(snap.camera_offset[0], snap.camera_offset[1]));

        self.state = SessionState::Running;
        info!(date = %self.current_date(), "session restored from snapshot");
        Ok(())
    }
}

fn validate_snapshot(snap: &Snapshot, bodies: &[Body]) -> Result<(), StorageError> {
    let finite = |v: f64, field: &str| {
        if v.is_finite() {
            Ok(())
        } else {
            Err(StorageError::CorruptState(format!(
                "non-finite value in field `{field}`"
            )))
        }
    };

    finite(snap.time, "time")?;
    finite(snap.dt_per_s, "dt_per_s")?;
    finite(snap.zoom, "zoom")?;
    finite(snap.camera_offset[0], "camera_offset[0]")?;
    finite(snap.camera_offset[1], "camera_offset[1]")?;

    for so in &snap.space_objects {
        if !bodies.iter().any(|b| b.name == so.name) {
            return Err(StorageError::CorruptState(format!(
                "unknown body `{}`",
                so.name
            )));
        }
        finite(so.x, "x")?;
        finite(so.y, "y")?;
        finite(so.v_x, "v_x")?;
        finite(so.v_y, "v_y")?;
    }
    Ok(())
}
