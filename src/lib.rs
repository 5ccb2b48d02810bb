//! Greenhouse-gas emission calculator.
//!
//! Re-exports the formula engine ([`ghgcalc_core`]) and the built-in catalog
//! ([`ghgcalc_formulas`]). With the `python` feature the registry and the
//! dispatcher are also exposed as a Python extension module.

pub use ghgcalc_core::*;
pub use ghgcalc_formulas::{catalog, FORMULA_REGISTRY};

#[cfg(feature = "python")]
pub mod python;
