//! # shocktube
//!
//! A multi-material 1D compressible-flow finite-volume solver.
//!
//! The crate provides the building blocks of a shock-tube simulation:
//! - Uniform cell-centered grid and conservative state buffers
//! - HLLC approximate Riemann fluxes with reflective-wall boundaries
//! - Explicit time integration (RK2 predictor-corrector, four-stage SSP)
//! - Three material-interface tracking strategies (sharp, ghost, mixed)
//! - Lagrangian interface tracers
//! - Time-synchronized full-state snapshots
//!
//! # Example
//!
//! ```
//! use shocktube::{GasSlab, Solver, SolverConfig};
//!
//! let config = SolverConfig {
//!     slabs: vec![GasSlab {
//!         gas_id: 0,
//!         gamma: 1.4,
//!         mol_weight: 28.97,
//!         pressure: 101_325.0,
//!         temperature: 300.0,
//!         length: 1.0,
//!     }],
//!     nx: 100,
//!     final_time: 1e-4,
//!     snapshot_interval: 5e-5,
//!     ..SolverConfig::default()
//! };
//!
//! let mut solver = Solver::new(config).unwrap();
//! let summary = solver.run().unwrap();
//! assert!(summary.n_steps > 0);
//! ```

pub mod error;
pub mod flux;
pub mod gas;
pub mod grid;
pub mod interface;
pub mod snapshot;
pub mod solver;
pub mod state;
pub mod time;
pub mod tracer;

// Re-export main types for convenience
pub use error::{ConfigError, NumericsError, SolverError};
pub use flux::hllc_fluxes;
#[cfg(feature = "parallel")]
pub use flux::hllc_fluxes_parallel;
pub use gas::{CellGas, GasRegion, GasSlab, RegionTable, UNIVERSAL_GAS_CONSTANT};
pub use grid::Grid1D;
pub use interface::{
    GhostTracker, InterfaceMethod, InterfaceTracker, MixedTracker, SharpTracker, TrackerContext,
};
pub use snapshot::{Snapshot, SnapshotStore, SNAPSHOT_TIME_TOL};
pub use solver::{
    total_energy, total_mass, total_momentum, ProgressReporter, RunSummary, Solver, SolverConfig,
};
pub use state::{EulerState, Field, Primitives, StateBuffers};
pub use time::{conservative_update, step_size, Integrator, StepControl};
pub use tracer::{Tracer, TracerSet};
