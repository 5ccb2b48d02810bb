//! Greenhouse-gas emission formulas.
//!
//! [`FORMULA_REGISTRY`] holds the compiled-in catalog and is built on first use:
//!
//! ```
//! use ghgcalc_core::FormulaDispatcher;
//! use ghgcalc_formulas::FORMULA_REGISTRY;
//!
//! let mut dispatcher = FormulaDispatcher::new(&FORMULA_REGISTRY);
//! let result = dispatcher.evaluate("0.2", &["10", "CH4"]).unwrap();
//! assert_eq!(result.formatted, "280.0000");
//! ```

use std::sync::LazyLock;

use ghgcalc_core::registry::FormulaRegistry;
use tracing::debug;

pub mod catalog;

/// Process-wide registry of the built-in catalog.
pub static FORMULA_REGISTRY: LazyLock<FormulaRegistry> = LazyLock::new(|| {
    let registry = FormulaRegistry::new(catalog::formulas())
        .expect("built-in catalog has duplicate formula ids");
    debug!(formulas = registry.len(), "Built formula registry");
    registry
});
