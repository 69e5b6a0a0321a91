//! Conservative state types and buffers for the 1D Euler equations.
//!
//! The conserved variables are (rho, rho*u, E) where:
//! - rho = density
//! - rho*u = momentum density
//! - E = total energy per unit volume

use std::ops::{Add, Index, IndexMut, Mul, Sub};

use crate::error::NumericsError;
use crate::gas::{CellGas, UNIVERSAL_GAS_CONSTANT};

/// Conserved Euler state: (rho, m, e).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EulerState {
    /// Density rho.
    pub rho: f64,
    /// Momentum density m = rho * u.
    pub m: f64,
    /// Total energy per unit volume E.
    pub e: f64,
}

impl EulerState {
    pub fn new(rho: f64, m: f64, e: f64) -> Self {
        Self { rho, m, e }
    }

    pub fn zero() -> Self {
        Self {
            rho: 0.0,
            m: 0.0,
            e: 0.0,
        }
    }

    /// Velocity u = m / rho.
    pub fn velocity(&self) -> f64 {
        self.m / self.rho
    }

    /// Pressure from the ideal-gas law: p = (gamma - 1)(E - rho u^2 / 2).
    pub fn pressure(&self, gamma: f64) -> f64 {
        let u = self.velocity();
        (gamma - 1.0) * (self.e - 0.5 * self.rho * u * u)
    }

    /// Sound speed a = sqrt(gamma p / rho).
    pub fn sound_speed(&self, gamma: f64) -> f64 {
        (gamma * self.pressure(gamma) / self.rho).sqrt()
    }

    /// Specific total enthalpy H = (E + p) / rho.
    pub fn enthalpy(&self, gamma: f64) -> f64 {
        (self.e + self.pressure(gamma)) / self.rho
    }

    /// Physical flux vector F(U) = (m, m u + p, u (E + p)).
    pub fn physical_flux(&self, gamma: f64) -> EulerState {
        let u = self.velocity();
        let p = self.pressure(gamma);
        EulerState {
            rho: self.m,
            m: self.m * u + p,
            e: u * (self.e + p),
        }
    }

    /// Mirror state across a solid wall: momentum negated, density and
    /// energy unchanged.
    pub fn reflected(&self) -> EulerState {
        EulerState {
            rho: self.rho,
            m: -self.m,
            e: self.e,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.rho.is_finite() && self.m.is_finite() && self.e.is_finite()
    }
}

impl Add for EulerState {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            rho: self.rho + other.rho,
            m: self.m + other.m,
            e: self.e + other.e,
        }
    }
}

impl Sub for EulerState {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            rho: self.rho - other.rho,
            m: self.m - other.m,
            e: self.e - other.e,
        }
    }
}

impl Mul<f64> for EulerState {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self {
            rho: self.rho * scalar,
            m: self.m * scalar,
            e: self.e * scalar,
        }
    }
}

impl Mul<EulerState> for f64 {
    type Output = EulerState;

    fn mul(self, state: EulerState) -> EulerState {
        state * self
    }
}

/// Dense per-cell array of conserved states.
#[derive(Clone, Debug)]
pub struct Field {
    data: Vec<EulerState>,
}

impl Field {
    /// Create a zero-initialized field of `nx` cells.
    pub fn zeros(nx: usize) -> Self {
        Self {
            data: vec![EulerState::zero(); nx],
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[EulerState] {
        &self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EulerState> {
        self.data.iter()
    }

    /// Overwrite this field with the contents of `other`.
    pub fn copy_from(&mut self, other: &Field) {
        debug_assert_eq!(self.len(), other.len());
        self.data.copy_from_slice(&other.data);
    }
}

impl Index<usize> for Field {
    type Output = EulerState;

    fn index(&self, i: usize) -> &EulerState {
        &self.data[i]
    }
}

impl IndexMut<usize> for Field {
    fn index_mut(&mut self, i: usize) -> &mut EulerState {
        &mut self.data[i]
    }
}

/// The three state buffers used by every integrator.
///
/// `current` holds the accepted solution; `saved` holds the step's
/// starting state; `scratch` holds stage intermediates. Integrator stages
/// read from one buffer and write a different one; within a stage no
/// buffer is both read and written.
#[derive(Clone, Debug)]
pub struct StateBuffers {
    pub current: Field,
    pub saved: Field,
    pub scratch: Field,
}

impl StateBuffers {
    pub fn zeros(nx: usize) -> Self {
        Self {
            current: Field::zeros(nx),
            saved: Field::zeros(nx),
            scratch: Field::zeros(nx),
        }
    }
}

/// Derived primitive fields, recomputed from `current` after every step.
#[derive(Clone, Debug)]
pub struct Primitives {
    pub density: Vec<f64>,
    pub velocity: Vec<f64>,
    pub pressure: Vec<f64>,
    pub temperature: Vec<f64>,
}

impl Primitives {
    pub fn zeros(nx: usize) -> Self {
        Self {
            density: vec![0.0; nx],
            velocity: vec![0.0; nx],
            pressure: vec![0.0; nx],
            temperature: vec![0.0; nx],
        }
    }

    pub fn len(&self) -> usize {
        self.density.len()
    }

    pub fn is_empty(&self) -> bool {
        self.density.is_empty()
    }

    /// Recompute all primitive fields from the conserved state.
    ///
    /// Non-positive density or pressure, or a non-finite conserved
    /// triple, is a fatal invariant violation reported with the cell
    /// index and simulated time.
    pub fn update(
        &mut self,
        state: &Field,
        gas: &CellGas,
        time: f64,
    ) -> Result<(), NumericsError> {
        for i in 0..state.len() {
            let u = state[i];
            if !u.is_finite() {
                return Err(NumericsError::NonFiniteState { cell: i, time });
            }
            if u.rho <= 0.0 {
                return Err(NumericsError::NegativeDensity {
                    cell: i,
                    time,
                    value: u.rho,
                });
            }

            let vel = u.velocity();
            let p = u.pressure(gas.gamma[i]);
            if p <= 0.0 {
                return Err(NumericsError::NegativePressure {
                    cell: i,
                    time,
                    value: p,
                });
            }

            let r_specific = UNIVERSAL_GAS_CONSTANT / gas.mol_weight[i];
            self.density[i] = u.rho;
            self.velocity[i] = vel;
            self.pressure[i] = p;
            self.temperature[i] = p / (u.rho * r_specific);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gas::{GasSlab, RegionTable};

    const TOL: f64 = 1e-12;

    #[test]
    fn test_state_primitives() {
        // rho = 2, u = 3, p = 5 with gamma = 1.4
        let gamma = 1.4;
        let e = 5.0 / (gamma - 1.0) + 0.5 * 2.0 * 9.0;
        let u = EulerState::new(2.0, 6.0, e);

        assert!((u.velocity() - 3.0).abs() < TOL);
        assert!((u.pressure(gamma) - 5.0).abs() < TOL);
        assert!((u.sound_speed(gamma) - (gamma * 5.0 / 2.0).sqrt()).abs() < TOL);
        assert!((u.enthalpy(gamma) - (e + 5.0) / 2.0).abs() < TOL);
    }

    #[test]
    fn test_physical_flux() {
        let gamma = 1.4;
        let e = 5.0 / (gamma - 1.0) + 0.5 * 2.0 * 9.0;
        let u = EulerState::new(2.0, 6.0, e);
        let f = u.physical_flux(gamma);

        assert!((f.rho - 6.0).abs() < TOL);
        assert!((f.m - (6.0 * 3.0 + 5.0)).abs() < TOL);
        assert!((f.e - 3.0 * (e + 5.0)).abs() < TOL);
    }

    #[test]
    fn test_reflected_state() {
        let u = EulerState::new(2.0, 6.0, 40.0);
        let ghost = u.reflected();
        assert!((ghost.rho - 2.0).abs() < TOL);
        assert!((ghost.m + 6.0).abs() < TOL);
        assert!((ghost.e - 40.0).abs() < TOL);
    }

    #[test]
    fn test_state_arithmetic() {
        let a = EulerState::new(1.0, 2.0, 3.0);
        let b = EulerState::new(4.0, 5.0, 6.0);

        let sum = a + b;
        assert!((sum.rho - 5.0).abs() < TOL);
        assert!((sum.m - 7.0).abs() < TOL);
        assert!((sum.e - 9.0).abs() < TOL);

        let diff = b - a;
        assert!((diff.rho - 3.0).abs() < TOL);

        let scaled = 2.0 * a;
        assert!((scaled.m - 4.0).abs() < TOL);
        assert_eq!(scaled, a * 2.0);
    }

    #[test]
    fn test_field_copy_from() {
        let mut a = Field::zeros(4);
        let mut b = Field::zeros(4);
        for i in 0..4 {
            b[i] = EulerState::new(i as f64, 1.0, 2.0);
        }
        a.copy_from(&b);
        for i in 0..4 {
            assert_eq!(a[i], b[i]);
        }
    }

    fn uniform_gas(nx: usize) -> CellGas {
        let slab = GasSlab {
            gas_id: 0,
            gamma: 1.4,
            mol_weight: 28.97,
            pressure: 101_325.0,
            temperature: 300.0,
            length: 1.0,
        };
        let table = RegionTable::from_slabs(&[slab]).unwrap();
        let centers: Vec<f64> = (0..nx).map(|i| (i as f64 + 0.5) / nx as f64).collect();
        CellGas::from_regions(&table, &centers)
    }

    #[test]
    fn test_primitives_update() {
        let gas = uniform_gas(3);
        let mut field = Field::zeros(3);
        let gamma = 1.4;
        for i in 0..3 {
            let rho = 1.2;
            let u = 10.0;
            let p = 101_325.0;
            field[i] = EulerState::new(rho, rho * u, p / (gamma - 1.0) + 0.5 * rho * u * u);
        }

        let mut prim = Primitives::zeros(3);
        prim.update(&field, &gas, 0.0).unwrap();

        for i in 0..3 {
            assert!((prim.density[i] - 1.2).abs() < TOL);
            assert!((prim.velocity[i] - 10.0).abs() < TOL);
            assert!((prim.pressure[i] - 101_325.0).abs() < 1e-8);
            let expected_t = 101_325.0 / (1.2 * UNIVERSAL_GAS_CONSTANT / 28.97);
            assert!((prim.temperature[i] - expected_t).abs() < 1e-8);
        }
    }

    #[test]
    fn test_primitives_negative_density_fatal() {
        let gas = uniform_gas(3);
        let mut field = Field::zeros(3);
        for i in 0..3 {
            field[i] = EulerState::new(1.0, 0.0, 10.0);
        }
        field[1].rho = -0.5;

        let mut prim = Primitives::zeros(3);
        let err = prim.update(&field, &gas, 2.5).unwrap_err();
        match err {
            NumericsError::NegativeDensity { cell, time, .. } => {
                assert_eq!(cell, 1);
                assert!((time - 2.5).abs() < TOL);
            }
            other => panic!("expected NegativeDensity, got {other:?}"),
        }
    }

    #[test]
    fn test_primitives_non_finite_fatal() {
        let gas = uniform_gas(2);
        let mut field = Field::zeros(2);
        field[0] = EulerState::new(1.0, 0.0, 10.0);
        field[1] = EulerState::new(1.0, f64::NAN, 10.0);

        let mut prim = Primitives::zeros(2);
        assert!(matches!(
            prim.update(&field, &gas, 0.0),
            Err(NumericsError::NonFiniteState { cell: 1, .. })
        ));
    }
}
