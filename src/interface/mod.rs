//! Multi-material interface tracking.
//!
//! Three strategies keep the per-cell gas properties in sync with the
//! moving material interfaces, selected once at construction:
//!
//! - [`InterfaceMethod::Sharp`]: each cell takes the properties of the
//!   region its center falls in, relative to the tracked interfaces.
//! - [`InterfaceMethod::Ghost`]: the same assignment, plus a mask of
//!   cells sitting close to an interface.
//! - [`InterfaceMethod::Mixed`]: a continuous per-material volume
//!   fraction field with its own advection scheme, blended properties.

mod ghost;
mod mixed;
mod sharp;

pub use ghost::GhostTracker;
pub use mixed::MixedTracker;
pub use sharp::SharpTracker;

use std::str::FromStr;

use crate::error::ConfigError;
use crate::gas::{CellGas, RegionTable};

/// Interface-tracking method names accepted by the configuration.
///
/// An unrecognized name fails parsing with
/// [`ConfigError::UnknownInterfaceMethod`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterfaceMethod {
    Sharp,
    Ghost,
    Mixed,
}

impl FromStr for InterfaceMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sharp" => Ok(InterfaceMethod::Sharp),
            "ghost" => Ok(InterfaceMethod::Ghost),
            "mixed" => Ok(InterfaceMethod::Mixed),
            _ => Err(ConfigError::UnknownInterfaceMethod(s.to_string())),
        }
    }
}

impl InterfaceMethod {
    pub fn name(&self) -> &'static str {
        match self {
            InterfaceMethod::Sharp => "sharp",
            InterfaceMethod::Ghost => "ghost",
            InterfaceMethod::Mixed => "mixed",
        }
    }
}

/// Per-step inputs shared by all trackers.
///
/// The sharp and ghost variants read the tracer positions; the mixed
/// variant reads the velocity field and step size for its fraction
/// advection.
#[derive(Clone, Copy, Debug)]
pub struct TrackerContext<'a> {
    pub regions: &'a RegionTable,
    pub centers: &'a [f64],
    pub tracer_positions: &'a [f64],
    pub velocity: &'a [f64],
    pub dx: f64,
    pub dt: f64,
}

/// The active interface tracker, fixed at solver construction.
#[derive(Clone, Debug)]
pub enum InterfaceTracker {
    Sharp(SharpTracker),
    Ghost(GhostTracker),
    Mixed(MixedTracker),
}

impl InterfaceTracker {
    pub fn new(method: InterfaceMethod, regions: &RegionTable, centers: &[f64]) -> Self {
        match method {
            InterfaceMethod::Sharp => InterfaceTracker::Sharp(SharpTracker),
            InterfaceMethod::Ghost => InterfaceTracker::Ghost(GhostTracker::new(centers.len())),
            InterfaceMethod::Mixed => {
                InterfaceTracker::Mixed(MixedTracker::new(regions, centers))
            }
        }
    }

    pub fn method(&self) -> InterfaceMethod {
        match self {
            InterfaceTracker::Sharp(_) => InterfaceMethod::Sharp,
            InterfaceTracker::Ghost(_) => InterfaceMethod::Ghost,
            InterfaceTracker::Mixed(_) => InterfaceMethod::Mixed,
        }
    }

    /// Refresh the per-cell gas properties after a completed step.
    pub fn refresh(&mut self, gas: &mut CellGas, ctx: &TrackerContext<'_>) {
        match self {
            InterfaceTracker::Sharp(tracker) => tracker.update(gas, ctx),
            InterfaceTracker::Ghost(tracker) => tracker.update(gas, ctx),
            InterfaceTracker::Mixed(tracker) => tracker.update(gas, ctx),
        }
    }

    /// Times the mixed method fell back to a uniform fraction
    /// distribution; zero for the other variants.
    pub fn normalization_fallbacks(&self) -> usize {
        match self {
            InterfaceTracker::Mixed(tracker) => tracker.normalization_fallbacks(),
            _ => 0,
        }
    }

    /// Ghost-variant mask of cells near a tracked interface.
    pub fn interface_cells(&self) -> Option<&[bool]> {
        match self {
            InterfaceTracker::Ghost(tracker) => Some(tracker.interface_cells()),
            _ => None,
        }
    }

    /// Mixed-variant volume fractions, row-major `nx * n_materials`.
    pub fn fractions(&self) -> Option<&[f64]> {
        match self {
            InterfaceTracker::Mixed(tracker) => Some(tracker.fractions()),
            _ => None,
        }
    }
}
