//! Conservation totals and progress reporting.

use crate::state::Field;

/// Total mass in the domain, sum of rho * dx.
pub fn total_mass(state: &Field, dx: f64) -> f64 {
    state.iter().map(|u| u.rho).sum::<f64>() * dx
}

/// Total momentum in the domain. Not conserved between reflective
/// walls; tracked for diagnostics only.
pub fn total_momentum(state: &Field, dx: f64) -> f64 {
    state.iter().map(|u| u.m).sum::<f64>() * dx
}

/// Total energy in the domain, sum of E * dx.
pub fn total_energy(state: &Field, dx: f64) -> f64 {
    state.iter().map(|u| u.e).sum::<f64>() * dx
}

/// Progress fractions at bounded cadence.
///
/// Produces a monotonically non-decreasing sequence in [0, 1], at most
/// one value per percent of simulated time, and guarantees the sequence
/// terminates at exactly 1.0 via [`ProgressReporter::finish`].
#[derive(Clone, Debug)]
pub struct ProgressReporter {
    final_time: f64,
    step: f64,
    last: f64,
}

impl ProgressReporter {
    pub fn new(final_time: f64) -> Self {
        Self {
            final_time,
            step: 0.01,
            last: 0.0,
        }
    }

    /// The fraction to deliver for simulated time `time`, if the cadence
    /// threshold has been crossed.
    pub fn maybe_report(&mut self, time: f64) -> Option<f64> {
        let fraction = (time / self.final_time).min(1.0);
        if fraction >= 1.0 {
            return self.finish();
        }
        if fraction - self.last >= self.step {
            self.last = fraction;
            Some(fraction)
        } else {
            None
        }
    }

    /// The terminating 1.0, exactly once.
    pub fn finish(&mut self) -> Option<f64> {
        if self.last < 1.0 {
            self.last = 1.0;
            Some(1.0)
        } else {
            None
        }
    }
}
