pub mod states;
pub mod forces;
pub mod integrator;
pub mod clock;
pub mod viewport;
pub mod session;
