pub mod simulation;
pub mod configuration;
pub mod persistence;
pub mod benchmark;

pub use simulation::states::{Body, System, NVec2};
pub use simulation::forces::{acceleration_from, AccelSet, Acceleration, NewtonianGravity, GRAV_CONST};
pub use simulation::integrator::symplectic_euler;
pub use simulation::clock::{SimulationClock, FRAME_RATE_FLOOR};
pub use simulation::viewport::{ScreenRect, Viewport, CONVERT, ZOOM_MAX, ZOOM_MIN};
pub use simulation::session::{SessionState, SimulationSession, FAST_FORWARD_DT};

pub use configuration::config::{BodyConfig, CatalogConfig};
pub use persistence::storage::{BodySnapshot, Snapshot, Storage, StorageError};

pub use benchmark::benchmark::{bench_gravity, bench_step};
