//! Numerical interface fluxes.

mod hllc;

pub use hllc::hllc_fluxes;
#[cfg(feature = "parallel")]
pub use hllc::hllc_fluxes_parallel;
