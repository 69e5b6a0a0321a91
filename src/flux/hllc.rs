//! HLLC (Harten-Lax-van Leer-Contact) approximate Riemann solver.
//!
//! The HLLC solver extends the two-wave HLL approximation with a middle
//! contact wave, which is what carries material interfaces in a
//! multi-gas tube. Wave speed bounds are the Davis estimates
//!
//! S_l = min(u_l - a_l, u_r - a_r),  S_r = max(u_l + a_l, u_r + a_r)
//!
//! and the contact speed S* follows from the momentum-flux balance
//! across the two outer waves. gamma may differ between the two sides of
//! an interface; the correct multi-material wave structure emerges from
//! the Riemann solution without any interface special-casing.
//!
//! Both domain boundaries are solid reflective walls, realized as
//! mirrored ghost states (momentum negated).
//!
//! Reference: Toro, "Riemann Solvers and Numerical Methods for Fluid
//! Dynamics", ch. 10.

use crate::error::NumericsError;
use crate::gas::CellGas;
use crate::state::{EulerState, Field};

/// Relative threshold below which a star-state denominator counts as
/// degenerate.
const DEGENERACY_TOL: f64 = 1e-12;

/// Primitive decomposition of one cell, computed once per flux pass.
#[derive(Clone, Copy, Debug)]
struct CellPrim {
    rho: f64,
    u: f64,
    p: f64,
    a: f64,
    h: f64,
    e: f64,
}

impl CellPrim {
    /// Mirror across a solid wall: velocity negated, thermodynamics
    /// unchanged.
    fn reflected(&self) -> CellPrim {
        CellPrim {
            u: -self.u,
            ..*self
        }
    }

    /// Physical flux F(U) = (rho u, rho u^2 + p, rho u H).
    fn physical_flux(&self) -> EulerState {
        let m = self.rho * self.u;
        EulerState {
            rho: m,
            m: m * self.u + self.p,
            e: m * self.h,
        }
    }

    fn conserved(&self) -> EulerState {
        EulerState {
            rho: self.rho,
            m: self.rho * self.u,
            e: self.e,
        }
    }
}

/// Decompose every cell into primitives, rejecting non-physical input.
fn cell_prims(state: &Field, gas: &CellGas, time: f64) -> Result<Vec<CellPrim>, NumericsError> {
    let mut prims = Vec::with_capacity(state.len());
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
        let gamma = gas.gamma[i];
        let vel = u.velocity();
        let p = u.pressure(gamma);
        if p <= 0.0 {
            return Err(NumericsError::NegativePressure {
                cell: i,
                time,
                value: p,
            });
        }
        prims.push(CellPrim {
            rho: u.rho,
            u: vel,
            p,
            a: (gamma * p / u.rho).sqrt(),
            h: (u.e + p) / u.rho,
            e: u.e,
        });
    }
    Ok(prims)
}

/// Star-state reconstruction on side K of the contact wave.
///
/// U*_K = rho_K (S_K - u_K)/(S_K - S*) [1, S*, e_K/rho_K + (S* - u_K)(S* + p_K/(rho_K (S_K - u_K)))]
fn star_state(side: &CellPrim, s_k: f64, s_star: f64) -> Option<EulerState> {
    let dk = s_k - s_star;
    if dk.abs() <= DEGENERACY_TOL * (s_k.abs() + s_star.abs()).max(1.0) {
        return None;
    }
    let su = s_k - side.u;
    let coef = side.rho * su / dk;
    let e_star = side.e / side.rho + (s_star - side.u) * (s_star + side.p / (side.rho * su));
    Some(EulerState {
        rho: coef,
        m: coef * s_star,
        e: coef * e_star,
    })
}

/// HLLC flux across one interface, plus the interface's fastest signal
/// speed max(|S_l|, |S_r|). Returns `None` on a degenerate star-state
/// division.
fn hllc_interface(left: &CellPrim, right: &CellPrim) -> Option<(EulerState, f64)> {
    let s_l = (left.u - left.a).min(right.u - right.a);
    let s_r = (left.u + left.a).max(right.u + right.a);

    let denom = left.rho * (s_l - left.u) - right.rho * (s_r - right.u);
    let scale = left.rho * left.a + right.rho * right.a;
    if denom.abs() <= DEGENERACY_TOL * scale {
        return None;
    }
    let s_star = (right.p - left.p + left.rho * left.u * (s_l - left.u)
        - right.rho * right.u * (s_r - right.u))
        / denom;

    let smax = s_l.abs().max(s_r.abs());

    // Four branches by the signs of S_l, S*, S_r.
    let flux = if s_l >= 0.0 {
        left.physical_flux()
    } else if s_star >= 0.0 {
        let u_star = star_state(left, s_l, s_star)?;
        left.physical_flux() + s_l * (u_star - left.conserved())
    } else if s_r > 0.0 {
        let u_star = star_state(right, s_r, s_star)?;
        right.physical_flux() + s_r * (u_star - right.conserved())
    } else {
        right.physical_flux()
    };

    Some((flux, smax))
}

/// Compute HLLC fluxes for all `nx + 1` interfaces of `state`.
///
/// Interior interfaces use the true neighboring cells; the two domain
/// boundaries use a reflected ghost of the adjacent cell (solid wall).
/// Every entry of `fluxes` is overwritten. Returns the global maximum
/// signal speed, the quantity that limits the stable step size.
pub fn hllc_fluxes(
    state: &Field,
    gas: &CellGas,
    time: f64,
    fluxes: &mut [EulerState],
) -> Result<f64, NumericsError> {
    let nx = state.len();
    debug_assert_eq!(fluxes.len(), nx + 1);

    let prims = cell_prims(state, gas, time)?;

    let mut max_speed: f64 = 0.0;
    for i in 0..=nx {
        let left = if i == 0 {
            prims[0].reflected()
        } else {
            prims[i - 1]
        };
        let right = if i == nx {
            prims[nx - 1].reflected()
        } else {
            prims[i]
        };

        let (flux, smax) =
            hllc_interface(&left, &right).ok_or(NumericsError::DegenerateStarState {
                interface: i,
                cell: i.saturating_sub(1),
                time,
            })?;
        fluxes[i] = flux;
        max_speed = max_speed.max(smax);
    }

    Ok(max_speed)
}

/// Parallel variant of [`hllc_fluxes`]: the per-interface loop is
/// embarrassingly parallel, with no cross-interface writes.
#[cfg(feature = "parallel")]
pub fn hllc_fluxes_parallel(
    state: &Field,
    gas: &CellGas,
    time: f64,
    fluxes: &mut [EulerState],
) -> Result<f64, NumericsError> {
    use rayon::prelude::*;

    let nx = state.len();
    debug_assert_eq!(fluxes.len(), nx + 1);

    let prims = cell_prims(state, gas, time)?;

    let results: Result<Vec<(EulerState, f64)>, NumericsError> = (0..=nx)
        .into_par_iter()
        .map(|i| {
            let left = if i == 0 {
                prims[0].reflected()
            } else {
                prims[i - 1]
            };
            let right = if i == nx {
                prims[nx - 1].reflected()
            } else {
                prims[i]
            };
            hllc_interface(&left, &right).ok_or(NumericsError::DegenerateStarState {
                interface: i,
                cell: i.saturating_sub(1),
                time,
            })
        })
        .collect();

    let mut max_speed: f64 = 0.0;
    for (i, (flux, smax)) in results?.into_iter().enumerate() {
        fluxes[i] = flux;
        max_speed = max_speed.max(smax);
    }

    Ok(max_speed)
}
