//! Solver driver: configuration, initialization, and the run loop.

use crate::error::{ConfigError, SolverError};
use crate::gas::{CellGas, GasSlab, RegionTable};
use crate::grid::Grid1D;
use crate::interface::{InterfaceMethod, InterfaceTracker, TrackerContext};
use crate::snapshot::SnapshotStore;
use crate::state::{EulerState, Primitives, StateBuffers};
use crate::time::{Integrator, StepControl};
use crate::tracer::TracerSet;

use super::diagnostics::ProgressReporter;

/// Residual below which the run loop considers the final time reached.
const TIME_RESIDUAL: f64 = 1e-12;

/// Full configuration of a solver run.
///
/// Every field is validated by [`Solver::new`] before any stepping
/// begins; integrator and interface-method names are rejected at parse
/// time ([`crate::time::Integrator`], [`crate::interface::InterfaceMethod`]
/// both implement `FromStr`).
#[derive(Clone, Debug)]
pub struct SolverConfig {
    /// Ordered gas slabs, left to right.
    pub slabs: Vec<GasSlab>,
    /// Grid resolution; 100-2000 cells is the intended range.
    pub nx: usize,
    /// CFL number, validated against the integrator's stable range.
    pub cfl: f64,
    /// End of the simulated interval in seconds.
    pub final_time: f64,
    /// Physical cadence of the snapshot schedule in seconds.
    pub snapshot_interval: f64,
    pub integrator: Integrator,
    pub interface_method: InterfaceMethod,
    /// Safety limit: the run fails rather than looping past this many
    /// steps.
    pub max_steps: usize,
    /// Print step statistics to stdout while running.
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            slabs: Vec::new(),
            nx: 500,
            cfl: 0.4,
            final_time: 0.01,
            snapshot_interval: 1e-4,
            integrator: Integrator::Rk2,
            interface_method: InterfaceMethod::Sharp,
            max_steps: 10_000_000,
            verbose: false,
        }
    }
}

impl SolverConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.nx < 2 {
            return Err(ConfigError::InvalidResolution(self.nx));
        }
        let max_cfl = self.integrator.max_cfl();
        if !(self.cfl > 0.0 && self.cfl <= max_cfl) {
            return Err(ConfigError::InvalidCfl {
                value: self.cfl,
                max: max_cfl,
                integrator: self.integrator.name(),
            });
        }
        if !(self.final_time > 0.0) {
            return Err(ConfigError::InvalidFinalTime(self.final_time));
        }
        if !(self.snapshot_interval > 0.0) {
            return Err(ConfigError::InvalidSnapshotInterval(self.snapshot_interval));
        }
        Ok(())
    }
}

/// Statistics of a completed run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Final simulated time reached.
    pub final_time: f64,
    /// Total number of steps taken.
    pub n_steps: usize,
    /// Smallest step size used.
    pub dt_min: f64,
    /// Largest step size used.
    pub dt_max: f64,
    /// Mixed-method uniform-distribution resets (zero for the other
    /// interface methods).
    pub normalization_fallbacks: usize,
}

/// The solver: owns the grid, state buffers, flux scratch, tracers,
/// interface tracker, and snapshot store.
pub struct Solver {
    config: SolverConfig,
    grid: Grid1D,
    regions: RegionTable,
    gas: CellGas,
    buffers: StateBuffers,
    prims: Primitives,
    fluxes: Vec<EulerState>,
    tracers: TracerSet,
    tracker: InterfaceTracker,
    store: SnapshotStore,
    time: f64,
    n_steps: usize,
    dt_min: f64,
    dt_max: f64,
}

impl Solver {
    /// Validate the configuration and build the initial state.
    ///
    /// Each cell takes the slab containing its center: density from the
    /// ideal-gas law, zero velocity, total energy `p / (gamma - 1)`. The
    /// t = 0 snapshot is captured here, so a run over `[0, final_time]`
    /// yields `final_time / snapshot_interval + 1` snapshots.
    pub fn new(config: SolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let regions = RegionTable::from_slabs(&config.slabs)?;

        let grid = Grid1D::uniform(regions.total_length(), config.nx);
        let gas = CellGas::from_regions(&regions, &grid.centers);

        let mut buffers = StateBuffers::zeros(config.nx);
        let mut prims = Primitives::zeros(config.nx);
        for (i, &x) in grid.centers.iter().enumerate() {
            let slab = &config.slabs[regions.region_containing(x)];
            let rho = slab.initial_density();
            buffers.current[i] = EulerState::new(rho, 0.0, slab.pressure / (slab.gamma - 1.0));
            prims.density[i] = rho;
            prims.velocity[i] = 0.0;
            prims.pressure[i] = slab.pressure;
            prims.temperature[i] = slab.temperature;
        }
        buffers.saved.copy_from(&buffers.current);

        let tracers = TracerSet::from_regions(&regions);
        let tracker = InterfaceTracker::new(config.interface_method, &regions, &grid.centers);

        let mut store = SnapshotStore::new(config.snapshot_interval);
        store.capture_initial(&prims, &gas);

        Ok(Self {
            fluxes: vec![EulerState::zero(); config.nx + 1],
            config,
            grid,
            regions,
            gas,
            buffers,
            prims,
            tracers,
            tracker,
            store,
            time: 0.0,
            n_steps: 0,
            dt_min: f64::INFINITY,
            dt_max: 0.0,
        })
    }

    /// Advance one step and return the step size used.
    ///
    /// Post-step, in order: time and step counter advance, primitives
    /// are recomputed, tracers advect, the interface tracker refreshes
    /// the per-cell gas properties, and a snapshot is captured if the
    /// schedule says so.
    pub fn step(&mut self) -> Result<f64, SolverError> {
        let control = StepControl {
            cfl: self.config.cfl,
            final_time: self.config.final_time,
            next_snapshot: self.store.next_time(),
        };
        let dt = self.config.integrator.step(
            &mut self.buffers,
            &self.gas,
            &mut self.fluxes,
            self.grid.dx,
            self.time,
            &control,
        )?;

        self.time += dt;
        self.n_steps += 1;
        self.dt_min = self.dt_min.min(dt);
        self.dt_max = self.dt_max.max(dt);

        self.prims
            .update(&self.buffers.current, &self.gas, self.time)?;
        self.tracers
            .advect(&self.prims.velocity, &self.grid, dt, self.time);

        let positions = self.tracers.positions();
        let ctx = TrackerContext {
            regions: &self.regions,
            centers: &self.grid.centers,
            tracer_positions: &positions,
            velocity: &self.prims.velocity,
            dx: self.grid.dx,
            dt,
        };
        self.tracker.refresh(&mut self.gas, &ctx);

        self.store.maybe_capture(self.time, &self.prims, &self.gas);

        Ok(dt)
    }

    /// Run to the configured final time.
    pub fn run(&mut self) -> Result<RunSummary, SolverError> {
        self.run_with_progress(|_| {})
    }

    /// Run to the final time, delivering progress fractions to
    /// `progress`.
    ///
    /// Fractions are monotonically non-decreasing, in [0, 1], delivered
    /// at most once per percent of simulated time, and terminate at
    /// exactly 1.0. The callback is a pure observer; it cannot alter the
    /// numerical state.
    pub fn run_with_progress<F>(&mut self, mut progress: F) -> Result<RunSummary, SolverError>
    where
        F: FnMut(f64),
    {
        let mut reporter = ProgressReporter::new(self.config.final_time);

        while self.time < self.config.final_time - TIME_RESIDUAL {
            if self.n_steps >= self.config.max_steps {
                return Err(SolverError::StepLimit(self.config.max_steps));
            }

            let dt = self.step()?;

            if self.config.verbose && self.n_steps % 200 == 0 {
                println!(
                    "  step {}: t = {:.6e} s, dt = {:.3e} s",
                    self.n_steps, self.time, dt
                );
            }
            if let Some(fraction) = reporter.maybe_report(self.time) {
                progress(fraction);
            }
        }

        if let Some(fraction) = reporter.finish() {
            progress(fraction);
        }
        if self.config.verbose {
            println!(
                "run complete: {} steps, t = {:.6e} s, dt in [{:.3e}, {:.3e}]",
                self.n_steps, self.time, self.dt_min, self.dt_max
            );
        }

        Ok(self.summary())
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            final_time: self.time,
            n_steps: self.n_steps,
            dt_min: self.dt_min,
            dt_max: self.dt_max,
            normalization_fallbacks: self.tracker.normalization_fallbacks(),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid1D {
        &self.grid
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Current conserved state.
    pub fn state(&self) -> &crate::state::Field {
        &self.buffers.current
    }

    /// Current primitive fields.
    pub fn primitives(&self) -> &Primitives {
        &self.prims
    }

    /// Current per-cell gas properties.
    pub fn gas(&self) -> &CellGas {
        &self.gas
    }

    pub fn snapshots(&self) -> &[crate::snapshot::Snapshot] {
        self.store.snapshots()
    }

    pub fn tracers(&self) -> &TracerSet {
        &self.tracers
    }

    pub fn tracker(&self) -> &InterfaceTracker {
        &self.tracker
    }
}
