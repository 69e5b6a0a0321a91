//! Gas slab configuration and per-cell gas properties.
//!
//! The solver consumes a validated, ordered list of [`GasSlab`]s. At
//! initialization the slabs are turned into an immutable [`RegionTable`]
//! of spatial extents, and every cell carries a mutable copy of its
//! current properties in [`CellGas`] that the active interface tracker
//! refreshes each step.

use crate::error::ConfigError;

/// Universal gas constant in J/(kmol K).
pub const UNIVERSAL_GAS_CONSTANT: f64 = 8314.51;

/// One contiguous slab of gas in the initial condition.
///
/// Pressures are in Pa, temperatures in K, lengths in m, molecular
/// weights in kg/kmol.
#[derive(Clone, Debug, PartialEq)]
pub struct GasSlab {
    /// Identifier of the gas species, carried through to snapshots.
    pub gas_id: u32,
    /// Ratio of specific heats, must exceed 1.
    pub gamma: f64,
    /// Molecular weight, must be positive.
    pub mol_weight: f64,
    /// Initial pressure, must be positive.
    pub pressure: f64,
    /// Initial temperature, must be positive.
    pub temperature: f64,
    /// Slab extent along the tube, must be positive.
    pub length: f64,
}

impl GasSlab {
    /// Initial density from the ideal-gas law.
    pub fn initial_density(&self) -> f64 {
        let r_specific = UNIVERSAL_GAS_CONSTANT / self.mol_weight;
        self.pressure / (r_specific * self.temperature)
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if !(self.gamma > 1.0) {
            return Err(ConfigError::invalid_slab(
                index,
                format!("gamma must exceed 1, got {}", self.gamma),
            ));
        }
        if !(self.mol_weight > 0.0) {
            return Err(ConfigError::invalid_slab(
                index,
                format!("molecular weight must be positive, got {}", self.mol_weight),
            ));
        }
        if !(self.pressure > 0.0) {
            return Err(ConfigError::invalid_slab(
                index,
                format!("pressure must be positive, got {}", self.pressure),
            ));
        }
        if !(self.temperature > 0.0) {
            return Err(ConfigError::invalid_slab(
                index,
                format!("temperature must be positive, got {}", self.temperature),
            ));
        }
        if !(self.length > 0.0) {
            return Err(ConfigError::invalid_slab(
                index,
                format!("length must be positive, got {}", self.length),
            ));
        }
        Ok(())
    }
}

/// Immutable properties of one gas region with its spatial extent.
#[derive(Clone, Debug)]
pub struct GasRegion {
    pub gamma: f64,
    pub mol_weight: f64,
    pub gas_id: u32,
    /// Left edge of the region.
    pub x_start: f64,
    /// Right edge of the region.
    pub x_end: f64,
}

/// Ordered table of gas regions built from the slab list.
///
/// Extents are the cumulative slab lengths, so the table is monotonic in
/// x and lookups reduce to a linear scan over a handful of regions.
#[derive(Clone, Debug)]
pub struct RegionTable {
    regions: Vec<GasRegion>,
    total_length: f64,
}

impl RegionTable {
    /// Build the table from a validated slab list.
    ///
    /// Returns `ConfigError` if the list is empty or any slab parameter
    /// is non-physical.
    pub fn from_slabs(slabs: &[GasSlab]) -> Result<Self, ConfigError> {
        if slabs.is_empty() {
            return Err(ConfigError::EmptySlabs);
        }

        let mut regions = Vec::with_capacity(slabs.len());
        let mut x = 0.0;
        for (i, slab) in slabs.iter().enumerate() {
            slab.validate(i)?;
            regions.push(GasRegion {
                gamma: slab.gamma,
                mol_weight: slab.mol_weight,
                gas_id: slab.gas_id,
                x_start: x,
                x_end: x + slab.length,
            });
            x += slab.length;
        }

        Ok(Self {
            regions,
            total_length: x,
        })
    }

    /// All regions, ordered left to right.
    pub fn regions(&self) -> &[GasRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Sum of all slab lengths.
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Index of the region containing `x`, by monotonic scan of the
    /// cumulative extents. Positions beyond the last extent map to the
    /// last region.
    pub fn region_containing(&self, x: f64) -> usize {
        for (i, region) in self.regions.iter().enumerate() {
            if x < region.x_end {
                return i;
            }
        }
        self.regions.len() - 1
    }

    /// Positions of the internal region boundaries (one per tracer).
    pub fn internal_boundaries(&self) -> Vec<f64> {
        self.regions[..self.regions.len() - 1]
            .iter()
            .map(|r| r.x_end)
            .collect()
    }
}

/// Per-cell gas properties, refreshed every step by the interface tracker.
#[derive(Clone, Debug)]
pub struct CellGas {
    pub gamma: Vec<f64>,
    pub mol_weight: Vec<f64>,
    pub gas_id: Vec<u32>,
}

impl CellGas {
    /// Assign each cell the properties of the region containing its center.
    pub fn from_regions(table: &RegionTable, centers: &[f64]) -> Self {
        let nx = centers.len();
        let mut gamma = Vec::with_capacity(nx);
        let mut mol_weight = Vec::with_capacity(nx);
        let mut gas_id = Vec::with_capacity(nx);

        for &x in centers {
            let region = &table.regions()[table.region_containing(x)];
            gamma.push(region.gamma);
            mol_weight.push(region.mol_weight);
            gas_id.push(region.gas_id);
        }

        Self {
            gamma,
            mol_weight,
            gas_id,
        }
    }

    pub fn len(&self) -> usize {
        self.gamma.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gamma.is_empty()
    }
}
