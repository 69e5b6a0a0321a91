//! Time-synchronized full-state snapshots.
//!
//! The store is append-only and time-ordered: one capture at t = 0,
//! then one per elapsed snapshot interval. Each snapshot carries the
//! primitive fields and the per-cell gas properties active at capture
//! time, so the mixture composition at any sampled instant can be
//! reconstructed without recomputation.

use crate::gas::CellGas;
use crate::state::Primitives;

/// A sampling instant counts as reached when the simulated time is
/// within this tolerance of it.
pub const SNAPSHOT_TIME_TOL: f64 = 1e-10;

/// Immutable full-state capture at one physical instant.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub time: f64,
    pub density: Vec<f64>,
    pub velocity: Vec<f64>,
    pub pressure: Vec<f64>,
    pub temperature: Vec<f64>,
    pub gamma: Vec<f64>,
    pub mol_weight: Vec<f64>,
    pub gas_id: Vec<u32>,
}

impl Snapshot {
    fn capture(time: f64, prims: &Primitives, gas: &CellGas) -> Self {
        Self {
            time,
            density: prims.density.clone(),
            velocity: prims.velocity.clone(),
            pressure: prims.pressure.clone(),
            temperature: prims.temperature.clone(),
            gamma: gas.gamma.clone(),
            mol_weight: gas.mol_weight.clone(),
            gas_id: gas.gas_id.clone(),
        }
    }

    pub fn nx(&self) -> usize {
        self.density.len()
    }
}

/// Append-only snapshot store with a fixed-interval schedule.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    snapshots: Vec<Snapshot>,
    interval: f64,
    next_time: f64,
}

impl SnapshotStore {
    pub fn new(interval: f64) -> Self {
        debug_assert!(interval > 0.0);
        Self {
            snapshots: Vec::new(),
            interval,
            next_time: interval,
        }
    }

    /// The next scheduled sampling instant; the step-size policy aims
    /// substeps at it.
    pub fn next_time(&self) -> f64 {
        self.next_time
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Capture the initial state at t = 0. The schedule then starts one
    /// interval later.
    pub fn capture_initial(&mut self, prims: &Primitives, gas: &CellGas) {
        debug_assert!(self.snapshots.is_empty());
        self.snapshots.push(Snapshot::capture(0.0, prims, gas));
    }

    /// Capture if `time` has reached (within [`SNAPSHOT_TIME_TOL`]) or
    /// passed the next scheduled instant, then advance the schedule by
    /// one interval. Returns whether a snapshot was taken.
    pub fn maybe_capture(&mut self, time: f64, prims: &Primitives, gas: &CellGas) -> bool {
        if time + SNAPSHOT_TIME_TOL < self.next_time {
            return false;
        }
        self.snapshots.push(Snapshot::capture(time, prims, gas));
        self.next_time += self.interval;
        true
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }
}
