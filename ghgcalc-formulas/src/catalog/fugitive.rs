//! Fugitive emissions from coal mining and from oil and gas systems.

use ghgcalc_core::compute::{divide, sum_of_products, FloatValue};
use ghgcalc_core::formula::{Category, FormulaSpec};
use ghgcalc_core::lookup::{LookupTable, GWP_CH4};

/// Methane density at 20 °C and 101.325 kPa.
/// unit: kg/m3
const METHANE_DENSITY: FloatValue = 0.67;

/// CO2 formed per unit mass of CH4 burnt.
const CO2_PER_CH4: FloatValue = 44.0 / 16.0;

pub(crate) fn formulas() -> Vec<FormulaSpec> {
    let c = Category::Fugitive;
    vec![
        FormulaSpec::builder(c, "3.1", "CH4 from underground coal mining")
            .expression("E_CH4 = P * EF * 0.67 * 1e-3")
            .scalar("P", "Coal production", "t")
            .scalar("EF", "Specific methane release", "m3/t")
            .output("E_CH4", "CH4 emissions", "t CH4")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * METHANE_DENSITY * 1e-3)),
        FormulaSpec::builder(c, "3.2", "CH4 from post-mining activities")
            .describe("Methane released while coal is handled, stored and transported")
            .expression("E_CH4 = P * EF_post * 0.67 * 1e-3")
            .scalar("P", "Coal production", "t")
            .scalar("EF_post", "Post-mining methane release", "m3/t")
            .output("E_CH4", "CH4 emissions", "t CH4")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * METHANE_DENSITY * 1e-3)),
        FormulaSpec::builder(c, "3.3", "Net CH4 from coal mining")
            .expression("E_net = E_gross - R_used - R_flared")
            .scalar("E_gross", "Gross methane emissions", "t CH4")
            .scalar("R_used", "Methane recovered for energy use", "t CH4")
            .scalar("R_flared", "Methane recovered and flared", "t CH4")
            .output("E_net", "CH4 emissions", "t CH4")
            .related(&["3.1", "3.2"])
            .compute(|a| Ok(a.scalar(0)? - a.scalar(1)? - a.scalar(2)?)),
        FormulaSpec::builder(c, "3.4", "CO2 from flaring recovered methane")
            .expression("E_CO2 = M_CH4 * 44/16 * OF")
            .scalar("M_CH4", "Methane flared", "t CH4")
            .scalar("OF", "Combustion completeness", "")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| Ok(a.scalar(0)? * CO2_PER_CH4 * a.scalar(1)?)),
        FormulaSpec::builder(c, "3.5", "CH4 from venting")
            .expression("E_CH4 = V * W_CH4 * 1e-2 * rho_CH4")
            .scalar("V", "Vented gas volume", "thousand m3")
            .scalar("W_CH4", "Methane fraction", "% vol")
            .scalar("rho_CH4", "Methane density", "kg/m3")
            .output("E_CH4", "CH4 emissions", "t CH4")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * 1e-2 * a.scalar(2)?)),
        FormulaSpec::builder(c, "3.6", "Equipment leaks")
            .describe("Sum over component types: count, leak rate per component and operating hours")
            .expression("E = sum_i(N_i * EF_i * tau_i) * 1e-3")
            .list("N_i", "Number of components", "")
            .list("EF_i", "Leak rate per component", "kg/h")
            .list("tau_i", "Operating time", "h")
            .output("E", "Leaked gas", "t")
            .compute(|a| {
                let [count, ef, hours] = a.parallel([0, 1, 2])?;
                Ok(sum_of_products(&[count, ef, hours]) * 1e-3)
            }),
        FormulaSpec::builder(c, "3.7", "Pipeline leaks")
            .expression("E = L * EF")
            .scalar("L", "Pipeline length", "km")
            .scalar("EF", "Emission factor", "t/km")
            .output("E", "Leaked gas", "t")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)?)),
        FormulaSpec::builder(c, "3.8", "Gas released by a blowdown")
            .describe("Gas volume at standard conditions released when a section is depressurised")
            .expression("V = V_geom * P / 101.325 * 293.15 / (273.15 + t) * 1e-3")
            .scalar("V_geom", "Geometric volume of the section", "m3")
            .scalar("P", "Absolute pressure before the blowdown", "kPa")
            .scalar("t", "Gas temperature", "°C")
            .output("V", "Released volume", "thousand m3")
            .compute(|a| {
                let (volume, pressure, temperature) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                let ratio = divide(293.15, 273.15 + temperature, "absolute temperature")?;
                Ok(volume * pressure / 101.325 * ratio * 1e-3)
            }),
        FormulaSpec::builder(c, "3.9", "CH4 from oil production")
            .expression("E_CH4 = Q_oil * EF")
            .scalar("Q_oil", "Oil produced", "thousand t")
            .scalar("EF", "Emission factor", "t CH4/thousand t")
            .output("E_CH4", "CH4 emissions", "t CH4")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)?)),
        FormulaSpec::builder(c, "3.10", "Storage tank losses")
            .expression("E = Q * EF * 1e-3")
            .scalar("Q", "Throughput", "t")
            .scalar("EF", "Loss factor", "kg/t")
            .output("E", "Evaporated hydrocarbons", "t")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * 1e-3)),
        FormulaSpec::builder(c, "3.11", "CO2 in vented gas")
            .expression("E_CO2 = V * W_CO2 * 1e-2 * rho_CO2")
            .scalar("V", "Vented gas volume", "thousand m3")
            .scalar("W_CO2", "CO2 fraction", "% vol")
            .categorical("rho_CO2", "CO2 density", LookupTable::Co2Density)
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * 1e-2 * a.scalar(2)?)),
        FormulaSpec::builder(c, "3.12", "Total fugitive emissions")
            .expression("E_CO2e = E_CO2 + E_CH4 * 28")
            .scalar("E_CO2", "CO2 emissions", "t CO2")
            .scalar("E_CH4", "CH4 emissions", "t CH4")
            .output("E_CO2e", "Fugitive emissions", "t CO2-eq")
            .compute(|a| Ok(a.scalar(0)? + a.scalar(1)? * GWP_CH4)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ghgcalc_core::compute::{Arguments, Value};

    #[test]
    fn test_mining_methane() {
        let spec = formulas().into_iter().find(|f| f.id.as_str() == "3.1").unwrap();
        let args = Arguments::new(vec![Value::from(1000.0), Value::from(10.0)]);
        assert_relative_eq!(spec.evaluate(&args).unwrap(), 6.7, epsilon = 1e-12);
    }

    #[test]
    fn test_equipment_leaks() {
        let spec = formulas().into_iter().find(|f| f.id.as_str() == "3.6").unwrap();
        let args = Arguments::new(vec![
            Value::from(vec![10.0, 4.0]),
            Value::from(vec![0.5, 2.0]),
            Value::from(vec![100.0, 50.0]),
        ]);
        assert_relative_eq!(spec.evaluate(&args).unwrap(), 0.9, epsilon = 1e-12);
    }
}
