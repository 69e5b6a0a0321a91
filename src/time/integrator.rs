//! Explicit time integration for the finite-volume update.
//!
//! Two integrators are provided as a closed enum, selected once at
//! construction: a two-stage predictor-corrector ([`Integrator::Rk2`])
//! and a four-stage strong-stability-preserving scheme in Shu-Osher form
//! ([`Integrator::Ssp`]). Both are built from the same two primitives:
//! the HLLC flux evaluation and the conservative update
//!
//! ```text
//! u_new[i] = u_old[i] - (dt/dx) * (F[i+1] - F[i])
//! ```
//!
//! and both fit in the three named state buffers (current, saved,
//! scratch) regardless of stage count. Within a stage, the source and
//! destination buffer are always distinct; a buffer is never read and
//! written in the same index pass.

use std::str::FromStr;

use crate::error::{ConfigError, NumericsError};
use crate::flux::hllc_fluxes;
use crate::gas::CellGas;
use crate::state::{EulerState, Field, StateBuffers};

/// If the next snapshot instant lies within this many candidate steps
/// ahead, the step is shrunk so an integer number of substeps lands
/// exactly on the instant.
const SNAPSHOT_LOOKAHEAD: f64 = 2.5;

/// Inputs to the shared step-size policy.
#[derive(Clone, Copy, Debug)]
pub struct StepControl {
    /// CFL number, validated against the integrator's stable range.
    pub cfl: f64,
    /// End of the simulated interval; dt never overshoots it.
    pub final_time: f64,
    /// Next scheduled snapshot instant.
    pub next_snapshot: f64,
}

/// Step size for the coming step.
///
/// Starts from the CFL bound `cfl * dx / max_wave_speed`, clamps to the
/// remaining time to `final_time`, and, when the next snapshot instant
/// lies within 2.5 candidate steps, shrinks to
/// `remaining / ceil(remaining / dt)` so an integer number of substeps
/// lands exactly on the instant instead of drifting past it through
/// floating-point accumulation.
pub fn step_size(dx: f64, max_wave_speed: f64, time: f64, control: &StepControl) -> f64 {
    debug_assert!(max_wave_speed > 0.0);

    let mut dt = control.cfl * dx / max_wave_speed;
    if time + dt > control.final_time {
        dt = control.final_time - time;
    }

    let remaining = control.next_snapshot - time;
    if remaining > 0.0 && remaining <= SNAPSHOT_LOOKAHEAD * dt {
        let substeps = (remaining / dt).ceil();
        dt = remaining / substeps;
    }

    dt
}

/// Conservative finite-volume update over the whole grid:
///
/// `dst[i] = src[i] - r * (fluxes[i+1] - fluxes[i])` with `r = dt/dx`.
///
/// Post-condition: every entry of `dst` is overwritten; `src` is left
/// untouched. The two buffers must be distinct, which the borrow checker
/// enforces at the call site.
pub fn conservative_update(src: &Field, fluxes: &[EulerState], r: f64, dst: &mut Field) {
    let nx = src.len();
    debug_assert_eq!(dst.len(), nx);
    debug_assert_eq!(fluxes.len(), nx + 1);

    for i in 0..nx {
        dst[i] = src[i] - (fluxes[i + 1] - fluxes[i]) * r;
    }
}

/// Closed set of time integrators.
///
/// An unrecognized name fails parsing with
/// [`ConfigError::UnknownIntegrator`]; no default is substituted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Integrator {
    /// Two-stage predictor-corrector: forward-Euler predictor, flux
    /// recomputed at the predicted state, final state the average of
    /// the original state and the corrected predictor.
    Rk2,
    /// Four-stage SSPRK(4,3) in Shu-Osher form, TVD-preserving at up to
    /// twice the forward-Euler stability limit.
    Ssp,
}

impl FromStr for Integrator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rk2" => Ok(Integrator::Rk2),
            "ssp" => Ok(Integrator::Ssp),
            _ => Err(ConfigError::UnknownIntegrator(s.to_string())),
        }
    }
}

impl Integrator {
    pub fn name(&self) -> &'static str {
        match self {
            Integrator::Rk2 => "rk2",
            Integrator::Ssp => "ssp",
        }
    }

    /// Formal order of accuracy.
    pub fn order(&self) -> usize {
        match self {
            Integrator::Rk2 => 2,
            Integrator::Ssp => 3,
        }
    }

    /// Number of flux evaluations per step.
    pub fn n_stages(&self) -> usize {
        match self {
            Integrator::Rk2 => 2,
            Integrator::Ssp => 4,
        }
    }

    /// CFL number recommended for production runs.
    pub fn recommended_cfl(&self) -> f64 {
        match self {
            Integrator::Rk2 => 0.4,
            Integrator::Ssp => 0.8,
        }
    }

    /// Upper end of the stable CFL range; configuration validation
    /// rejects values beyond it.
    pub fn max_cfl(&self) -> f64 {
        match self {
            Integrator::Rk2 => 1.0,
            Integrator::Ssp => 2.0,
        }
    }

    /// Advance `buffers.current` by one step and return the step size
    /// used.
    ///
    /// The step size is decided from the first-stage wave speeds via
    /// [`step_size`]. `fluxes` is transient scratch, fully rewritten by
    /// every stage. Gas properties are held fixed across the stages of a
    /// single step; the interface tracker refreshes them afterwards.
    pub fn step(
        &self,
        buffers: &mut StateBuffers,
        gas: &CellGas,
        fluxes: &mut [EulerState],
        dx: f64,
        time: f64,
        control: &StepControl,
    ) -> Result<f64, NumericsError> {
        match self {
            Integrator::Rk2 => rk2_step(buffers, gas, fluxes, dx, time, control),
            Integrator::Ssp => ssp_step(buffers, gas, fluxes, dx, time, control),
        }
    }
}

/// Two-stage predictor-corrector:
///
/// ```text
/// u1    = u + dt * L(u)
/// u_new = 1/2 * u + 1/2 * (u1 + dt * L(u1))
/// ```
fn rk2_step(
    buffers: &mut StateBuffers,
    gas: &CellGas,
    fluxes: &mut [EulerState],
    dx: f64,
    time: f64,
    control: &StepControl,
) -> Result<f64, NumericsError> {
    let nx = buffers.current.len();
    buffers.saved.copy_from(&buffers.current);

    // Predictor: forward Euler from the step's starting state.
    let max_speed = hllc_fluxes(&buffers.current, gas, time, fluxes)?;
    let dt = step_size(dx, max_speed, time, control);
    let r = dt / dx;
    conservative_update(&buffers.current, fluxes, r, &mut buffers.scratch);

    // Corrector: flux at the predicted state, then average with the
    // starting state.
    hllc_fluxes(&buffers.scratch, gas, time + dt, fluxes)?;
    conservative_update(&buffers.scratch, fluxes, r, &mut buffers.current);
    for i in 0..nx {
        buffers.current[i] = (buffers.saved[i] + buffers.current[i]) * 0.5;
    }

    Ok(dt)
}

/// Four-stage SSPRK(4,3), Shu-Osher form:
///
/// ```text
/// u1    = u + dt/2 * L(u)
/// u2    = u1 + dt/2 * L(u1)
/// u3    = 2/3 * u + 1/3 * (u2 + dt/2 * L(u2))
/// u_new = 1/2 * u3 + 1/2 * (u3 + dt * L(u3))
/// ```
///
/// The final stage is written as the half/half blend of `u3` with its
/// own full-step Euler update; the arithmetic is kept in this form.
fn ssp_step(
    buffers: &mut StateBuffers,
    gas: &CellGas,
    fluxes: &mut [EulerState],
    dx: f64,
    time: f64,
    control: &StepControl,
) -> Result<f64, NumericsError> {
    let nx = buffers.current.len();
    buffers.saved.copy_from(&buffers.current);

    // Stage 1: scratch = u + dt/2 * L(u)
    let max_speed = hllc_fluxes(&buffers.current, gas, time, fluxes)?;
    let dt = step_size(dx, max_speed, time, control);
    let half_r = 0.5 * dt / dx;
    conservative_update(&buffers.current, fluxes, half_r, &mut buffers.scratch);

    // Stage 2: current = u1 + dt/2 * L(u1)
    hllc_fluxes(&buffers.scratch, gas, time + 0.5 * dt, fluxes)?;
    conservative_update(&buffers.scratch, fluxes, half_r, &mut buffers.current);

    // Stage 3: scratch = 2/3 * u + 1/3 * (u2 + dt/2 * L(u2))
    hllc_fluxes(&buffers.current, gas, time + dt, fluxes)?;
    conservative_update(&buffers.current, fluxes, half_r, &mut buffers.scratch);
    for i in 0..nx {
        buffers.scratch[i] = buffers.saved[i] * (2.0 / 3.0) + buffers.scratch[i] * (1.0 / 3.0);
    }

    // Stage 4: current = 1/2 * u3 + 1/2 * (u3 + dt * L(u3))
    hllc_fluxes(&buffers.scratch, gas, time + 0.5 * dt, fluxes)?;
    conservative_update(&buffers.scratch, fluxes, dt / dx, &mut buffers.current);
    for i in 0..nx {
        buffers.current[i] = (buffers.scratch[i] + buffers.current[i]) * 0.5;
    }

    Ok(dt)
}
