//! Solver driver and run diagnostics.

mod diagnostics;
mod driver;

pub use diagnostics::{total_energy, total_mass, total_momentum, ProgressReporter};
pub use driver::{RunSummary, Solver, SolverConfig};
