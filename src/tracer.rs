//! Lagrangian interface tracers.
//!
//! One massless marker per internal slab boundary, advected every step
//! with the velocity of whichever cell currently contains it. The
//! sharp and ghost trackers read the tracer positions to decide which
//! material each cell belongs to; all variants record the trajectories
//! as output.

use crate::gas::RegionTable;
use crate::grid::Grid1D;

/// A single interface marker with its sampled trajectory.
#[derive(Clone, Debug)]
pub struct Tracer {
    position: f64,
    trajectory: Vec<(f64, f64)>,
}

impl Tracer {
    fn new(position: f64) -> Self {
        Self {
            position,
            trajectory: vec![(0.0, position)],
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Ordered (time, position) samples, strictly increasing in time,
    /// never truncated.
    pub fn trajectory(&self) -> &[(f64, f64)] {
        &self.trajectory
    }
}

/// The fixed set of tracers, one per internal slab boundary.
///
/// A single-slab configuration has no internal boundaries and therefore
/// zero tracers.
#[derive(Clone, Debug)]
pub struct TracerSet {
    tracers: Vec<Tracer>,
}

impl TracerSet {
    pub fn from_regions(regions: &RegionTable) -> Self {
        Self {
            tracers: regions
                .internal_boundaries()
                .into_iter()
                .map(Tracer::new)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tracers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracers.is_empty()
    }

    pub fn tracers(&self) -> &[Tracer] {
        &self.tracers
    }

    /// Current positions, in slab order.
    pub fn positions(&self) -> Vec<f64> {
        self.tracers.iter().map(|t| t.position).collect()
    }

    /// Forward-Euler advection with nearest-cell velocity sampling.
    ///
    /// Each tracer moves by `dt` times the velocity of the cell
    /// containing it, is clamped to the domain, and appends the
    /// (new_time, position) sample.
    pub fn advect(&mut self, velocity: &[f64], grid: &Grid1D, dt: f64, new_time: f64) {
        for tracer in &mut self.tracers {
            let cell = grid.cell_containing(tracer.position);
            let moved = tracer.position + dt * velocity[cell];
            tracer.position = moved.clamp(0.0, grid.length);
            tracer.trajectory.push((new_time, tracer.position));
        }
    }
}
