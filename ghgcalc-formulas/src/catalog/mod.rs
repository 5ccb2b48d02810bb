//! The formula catalog, one module per category.

mod agriculture;
mod chemicals_metals;
mod flaring;
mod fugitive;
mod general;
mod land_use;
mod minerals;
mod stationary_combustion;
mod waste;

use ghgcalc_core::formula::FormulaSpec;

/// Every catalog formula, grouped by category in display order.
pub fn formulas() -> Vec<FormulaSpec> {
    [
        general::formulas(),
        stationary_combustion::formulas(),
        flaring::formulas(),
        fugitive::formulas(),
        minerals::formulas(),
        chemicals_metals::formulas(),
        waste::formulas(),
        agriculture::formulas(),
        land_use::formulas(),
    ]
    .into_iter()
    .flatten()
    .collect()
}
