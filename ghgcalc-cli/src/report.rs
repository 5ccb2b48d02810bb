//! Plain-text listings shared by the one-shot commands and the session.

use std::fmt;

use ghgcalc_core::formula::{FormulaSpec, InputKind};
use ghgcalc_core::lookup::FuelProperties;
use ghgcalc_core::registry::FormulaRegistry;

/// Categories with their slug and formula count.
pub struct CategoryListing<'a>(pub &'a FormulaRegistry);

impl fmt::Display for CategoryListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for category in self.0.list_categories() {
            let count = self.0.formulas_in(*category).count();
            writeln!(f, "{category} ({}, {count} formulas)", category.slug())?;
        }
        Ok(())
    }
}

pub struct FormulaListing<'a>(pub &'a [&'a FormulaSpec]);

impl fmt::Display for FormulaListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for spec in self.0 {
            writeln!(f, "{spec}")?;
        }
        Ok(())
    }
}

/// Everything the form layer needs to collect the inputs of one formula.
pub struct FormulaDetails<'a>(pub &'a FormulaSpec);

impl fmt::Display for FormulaDetails<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spec = self.0;
        writeln!(f, "{spec}")?;
        writeln!(f, "Category: {}", spec.category)?;
        if !spec.description.is_empty() {
            writeln!(f, "{}", spec.description)?;
        }
        writeln!(f, "  {}", spec.expression)?;
        writeln!(f, "Inputs:")?;
        for (i, input) in spec.inputs.iter().enumerate() {
            write!(f, "  {}. {}: {}", i + 1, input.symbol, input.label())?;
            match input.kind {
                InputKind::Scalar => {}
                InputKind::List => write!(f, " [list]")?,
                InputKind::Categorical(table) => {
                    let keys: Vec<_> = table.keys().collect();
                    write!(
                        f,
                        " [one of: {}; default {}]",
                        keys.join(" | "),
                        table.default_key()
                    )?;
                }
            }
            writeln!(f)?;
        }
        if spec.is_row_variadic() {
            writeln!(
                f,
                "Any number of rows may be entered, one field per input per row"
            )?;
        }
        writeln!(f, "Output: {}: {}", spec.output.symbol, spec.output_label())?;
        if !spec.related.is_empty() {
            let related: Vec<_> = spec.related.iter().map(ToString::to_string).collect();
            writeln!(f, "Inputs computed by: {}", related.join(", "))?;
        }
        Ok(())
    }
}

/// Reference properties of the known fuels.
pub struct FuelTable<'a>(pub &'a [FuelProperties]);

impl fmt::Display for FuelTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<26} {:<7} {:>7} {:>8} {:>7} {:>9} {:>5}",
            "Fuel", "State", "NCV", "EF/TJ", "k", "C/TJ", "OF"
        )?;
        for fuel in self.0 {
            writeln!(
                f,
                "{:<26} {:<7} {:>7.2} {:>8.1} {:>7.3} {:>9.2} {:>5.2}",
                fuel.name,
                format!("{:?}", fuel.state),
                fuel.ncv,
                fuel.ef_per_tj,
                fuel.coal_equivalent(),
                fuel.carbon_per_tj(),
                fuel.default_oxidation_factor()
            )?;
        }
        Ok(())
    }
}
