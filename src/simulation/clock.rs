//! Simulation clock: maps wall-clock frames to simulation time steps
//!
//! Decouples `dt_per_s` (user-controlled simulated-seconds-per-real-second)
//! from the measured frame rate, with a floor so low frame rates do not feed
//! oversized steps to the integrator.

/// Frame rates below this floor are clamped before computing the per-frame
/// step, bounding `|dt|` at low refresh rates.
pub const FRAME_RATE_FLOOR: f64 = 30.0;

/// Base increment of the rate ramp, simulated seconds per control-second.
const RATE_RAMP_STEP: f64 = 1000.0;
/// Proportional part of the ramp; makes the rate grow exponentially the
/// longer the control is held.
const RATE_RAMP_GROWTH: f64 = 0.001;
/// Reference cadence for the ramp. The continuous ramp integrates the
/// per-tick increment at this fixed rate, so one held second changes the
/// rate by the same amount regardless of display refresh rate.
const RATE_RAMP_HZ: f64 = 60.0;

#[derive(Debug, Clone)]
pub struct SimulationClock {
    dt_per_s: f64, // simulated seconds advanced per real second; sign = direction of time
    dt: f64, // simulated seconds advanced this rendered frame, derived
}

impl SimulationClock {
    /// Default rate: one simulated day per real second.
    pub fn new() -> Self {
        Self {
            dt_per_s: 86_400.0,
            dt: 0.0,
        }
    }

    /// Compute and record the step size for one rendered frame:
    /// `dt = dt_per_s / max(measured_frame_rate, FRAME_RATE_FLOOR)`.
    pub fn advance(&mut self, measured_frame_rate: f64) -> f64 {
        let effective_rate = measured_frame_rate.max(FRAME_RATE_FLOOR);
        self.dt = self.dt_per_s / effective_rate;
        self.dt
    }

    /// Step size computed by the last [`advance`](Self::advance) call.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn dt_per_s(&self) -> f64 {
        self.dt_per_s
    }

    /// Any signed value is accepted; unbounded rates are valid and
    /// intentional (fast-forwarding years in seconds).
    pub fn set_rate(&mut self, dt_per_s: f64) {
        self.dt_per_s = dt_per_s;
    }

    /// Ramp the rate continuously while a speed control is held.
    ///
    /// `direction` is +1.0 / -1.0 (values in between scale the ramp),
    /// `real_dt` is the wall-clock seconds the control was held since the
    /// last call. The increment grows with the current magnitude, so the
    /// rate accelerates the longer the control is held.
    pub fn ramp(&mut self, direction: f64, real_dt: f64) {
        let per_tick = RATE_RAMP_STEP + self.dt_per_s * RATE_RAMP_GROWTH;
        self.dt_per_s += direction * per_tick * RATE_RAMP_HZ * real_dt;
    }

    /// Simulated seconds actually advanced per real second once the frame
    /// rate floor is applied. Differs from `dt_per_s` only below the floor;
    /// the UI shows this value so the readout matches what the user sees.
    pub fn effective_dt_per_s(&self, measured_frame_rate: f64) -> f64 {
        if measured_frame_rate < FRAME_RATE_FLOOR {
            self.dt_per_s / FRAME_RATE_FLOOR * measured_frame_rate
        } else {
            self.dt_per_s
        }
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}
