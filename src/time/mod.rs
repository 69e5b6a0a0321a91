//! Time integration.

mod integrator;

pub use integrator::{conservative_update, step_size, Integrator, StepControl};
