//! Sharp interface tracking: region lookup against tracer positions.

use crate::gas::{CellGas, RegionTable};

use super::TrackerContext;

/// Assign every cell the properties of the region its center falls in.
///
/// The region index is the number of tracer positions strictly below the
/// cell center, taken from a freshly sorted copy of the positions each
/// call, clamped to a valid index. The scan is O(nx * n_tracers), which
/// is fine at the handful of tracers this solver carries.
pub(crate) fn assign_regions(
    gas: &mut CellGas,
    regions: &RegionTable,
    centers: &[f64],
    tracer_positions: &[f64],
) {
    let mut sorted = tracer_positions.to_vec();
    sorted.sort_by(f64::total_cmp);

    let last = regions.len() - 1;
    for (i, &x) in centers.iter().enumerate() {
        let below = sorted.iter().take_while(|&&p| p < x).count();
        let region = &regions.regions()[below.min(last)];
        gas.gamma[i] = region.gamma;
        gas.mol_weight[i] = region.mol_weight;
        gas.gas_id[i] = region.gas_id;
    }
}

/// Stateless sharp tracker.
#[derive(Clone, Copy, Debug, Default)]
pub struct SharpTracker;

impl SharpTracker {
    pub fn update(&mut self, gas: &mut CellGas, ctx: &TrackerContext<'_>) {
        assign_regions(gas, ctx.regions, ctx.centers, ctx.tracer_positions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gas::GasSlab;

    fn two_region_setup() -> (RegionTable, Vec<f64>, CellGas) {
        let slabs = [
            GasSlab {
                gas_id: 0,
                gamma: 1.4,
                mol_weight: 28.97,
                pressure: 101_325.0,
                temperature: 300.0,
                length: 6.0,
            },
            GasSlab {
                gas_id: 1,
                gamma: 5.0 / 3.0,
                mol_weight: 4.0026,
                pressure: 400_000.0,
                temperature: 300.0,
                length: 3.0,
            },
        ];
        let regions = RegionTable::from_slabs(&slabs).unwrap();
        let centers: Vec<f64> = (0..9).map(|i| i as f64 + 0.5).collect();
        let gas = CellGas::from_regions(&regions, &centers);
        (regions, centers, gas)
    }

    #[test]
    fn test_assignment_follows_tracer() {
        let (regions, centers, mut gas) = two_region_setup();

        // Interface moved left from 6.0 to 4.2: cells beyond it flip to
        // the second region.
        assign_regions(&mut gas, &regions, &centers, &[4.2]);
        for i in 0..4 {
            assert_eq!(gas.gas_id[i], 0, "cell {i}");
        }
        for i in 4..9 {
            assert_eq!(gas.gas_id[i], 1, "cell {i}");
            assert!((gas.gamma[i] - 5.0 / 3.0).abs() < 1e-14);
        }
    }

    #[test]
    fn test_no_tracers_single_region() {
        let (regions, centers, mut gas) = two_region_setup();
        assign_regions(&mut gas, &regions, &centers, &[]);
        for i in 0..9 {
            assert_eq!(gas.gas_id[i], 0);
        }
    }

    #[test]
    fn test_region_index_clamped() {
        let (regions, centers, mut gas) = two_region_setup();
        // More tracers than internal boundaries: counts beyond the last
        // region index are clamped.
        assign_regions(&mut gas, &regions, &centers, &[1.0, 2.0, 3.0]);
        assert_eq!(gas.gas_id[0], 0);
        assert_eq!(gas.gas_id[3], 1);
        assert_eq!(gas.gas_id[8], 1);
    }

    #[test]
    fn test_unsorted_positions_are_sorted_fresh() {
        let (regions, centers, mut gas) = two_region_setup();
        assign_regions(&mut gas, &regions, &centers, &[7.5, 2.5]);
        // Both tracers below 8.5 -> clamped to region 1; one below 5.5.
        assert_eq!(gas.gas_id[2], 0);
        assert_eq!(gas.gas_id[5], 1);
        assert_eq!(gas.gas_id[8], 1);
    }
}
