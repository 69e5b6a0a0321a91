//! Error types for solver configuration and runtime numerics.

use thiserror::Error;

/// Errors detected while validating a solver configuration.
///
/// All variants are reported by [`crate::solver::Solver::new`] before any
/// stepping begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The slab list is empty.
    #[error("no gas slabs configured")]
    EmptySlabs,

    /// A slab carries a non-physical parameter.
    #[error("slab {index}: {reason}")]
    InvalidSlab { index: usize, reason: String },

    /// Grid resolution is too small to form interior interfaces.
    #[error("grid resolution must be at least 2 cells, got {0}")]
    InvalidResolution(usize),

    /// CFL number outside the stable range of the chosen integrator.
    #[error("CFL must be in (0, {max}] for {integrator}, got {value}")]
    InvalidCfl {
        value: f64,
        max: f64,
        integrator: &'static str,
    },

    /// Final time must be positive.
    #[error("final time must be positive, got {0}")]
    InvalidFinalTime(f64),

    /// Snapshot interval must be positive.
    #[error("snapshot interval must be positive, got {0}")]
    InvalidSnapshotInterval(f64),

    /// Integrator name not recognized. Unknown names are rejected rather
    /// than substituted with a default.
    #[error("unknown integrator '{0}' (expected 'rk2' or 'ssp')")]
    UnknownIntegrator(String),

    /// Interface-method name not recognized.
    #[error("unknown interface method '{0}' (expected 'sharp', 'ghost' or 'mixed')")]
    UnknownInterfaceMethod(String),
}

impl ConfigError {
    /// Create a slab validation error.
    pub fn invalid_slab(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidSlab {
            index,
            reason: reason.into(),
        }
    }
}

/// Non-physical state detected during time stepping.
///
/// These are fatal: the step that produced them is abandoned and the error
/// is propagated to the caller with the offending cell index and the
/// simulated time at which it occurred.
#[derive(Debug, Error)]
pub enum NumericsError {
    /// Cell density dropped to zero or below.
    #[error("non-positive density {value:.6e} in cell {cell} at t = {time:.6e} s")]
    NegativeDensity { cell: usize, time: f64, value: f64 },

    /// Cell pressure dropped to zero or below.
    #[error("non-positive pressure {value:.6e} in cell {cell} at t = {time:.6e} s")]
    NegativePressure { cell: usize, time: f64, value: f64 },

    /// The HLLC star-state denominator vanished at an interface.
    ///
    /// `cell` is the cell on the left of the degenerate interface.
    #[error("degenerate HLLC star state at interface {interface} (cell {cell}) at t = {time:.6e} s")]
    DegenerateStarState {
        interface: usize,
        cell: usize,
        time: f64,
    },

    /// A conserved quantity became NaN or infinite.
    #[error("non-finite state in cell {cell} at t = {time:.6e} s")]
    NonFiniteState { cell: usize, time: f64 },
}

/// Top-level error type returned by the solver driver.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Numerics(#[from] NumericsError),

    /// The run loop hit its step limit before reaching the final time.
    #[error("step limit of {0} steps reached before final time")]
    StepLimit(usize),
}
