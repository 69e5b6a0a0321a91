//! Ghost-fluid sharp tracking with interface-cell marking.

use crate::gas::CellGas;

use super::sharp::assign_regions;
use super::TrackerContext;

/// Half-width of the marked band around each tracer, in cell widths.
pub const INTERFACE_BAND: f64 = 1.5;

/// Sharp region assignment plus a mask of cells near an interface.
///
/// The mask is bookkeeping: no distinct flux treatment is applied to
/// marked cells. It is exposed read-only through
/// [`crate::interface::InterfaceTracker::interface_cells`] as an
/// extension point.
#[derive(Clone, Debug)]
pub struct GhostTracker {
    interface_cells: Vec<bool>,
}

impl GhostTracker {
    pub fn new(nx: usize) -> Self {
        Self {
            interface_cells: vec![false; nx],
        }
    }

    pub fn interface_cells(&self) -> &[bool] {
        &self.interface_cells
    }

    pub fn update(&mut self, gas: &mut CellGas, ctx: &TrackerContext<'_>) {
        assign_regions(gas, ctx.regions, ctx.centers, ctx.tracer_positions);

        let band = INTERFACE_BAND * ctx.dx;
        for (i, &x) in ctx.centers.iter().enumerate() {
            self.interface_cells[i] = ctx
                .tracer_positions
                .iter()
                .any(|&p| (x - p).abs() <= band);
        }
    }
}
