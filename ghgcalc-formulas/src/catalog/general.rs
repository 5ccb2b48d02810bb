//! General conversions shared by every sector.
//!
//! Mass balances, unit conversions between an element and its gas, and the
//! CO2-equivalent weighting with global warming potentials.

use ghgcalc_core::compute::{CH4_PER_C, CO2_PER_C, N2O_PER_N};
use ghgcalc_core::formula::{Category, FormulaSpec};
use ghgcalc_core::lookup::LookupTable;

pub(crate) fn formulas() -> Vec<FormulaSpec> {
    let c = Category::General;
    vec![
        FormulaSpec::builder(c, "0.1", "Resource consumption")
            .describe("Consumption of a fuel or raw material from the stock balance of the reporting period")
            .expression("M = M_in - M_out + S_0 - S_1")
            .scalar("M_in", "Received", "t")
            .scalar("M_out", "Shipped to third parties", "t")
            .scalar("S_0", "Stock at the start of the period", "t")
            .scalar("S_1", "Stock at the end of the period", "t")
            .output("M", "Resource consumption", "t")
            .compute(|a| {
                let (received, shipped) = (a.scalar(0)?, a.scalar(1)?);
                let (opening, closing) = (a.scalar(2)?, a.scalar(3)?);
                Ok(received - shipped + opening - closing)
            }),
        FormulaSpec::builder(c, "0.2", "CO2-equivalent emission")
            .describe("Emission of a greenhouse gas weighted by its 100-year global warming potential")
            .expression("E_CO2e = E_i * GWP_i")
            .scalar("E_i", "Emission of the gas", "t")
            .categorical("GWP_i", "Greenhouse gas", LookupTable::GlobalWarmingPotential)
            .output("E_CO2e", "Emission", "t CO2-eq")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)?)),
        FormulaSpec::builder(c, "0.3", "Carbon to CO2")
            .expression("E_CO2 = M_C * 44/12")
            .scalar("M_C", "Carbon mass", "t C")
            .output("E_CO2", "CO2 mass", "t CO2")
            .compute(|a| Ok(a.scalar(0)? * CO2_PER_C)),
        FormulaSpec::builder(c, "0.4", "N2O-N to N2O")
            .expression("E_N2O = M_N * 44/28")
            .scalar("M_N", "Nitrogen emitted as N2O", "t N2O-N")
            .output("E_N2O", "N2O mass", "t N2O")
            .compute(|a| Ok(a.scalar(0)? * N2O_PER_N)),
        FormulaSpec::builder(c, "0.5", "CH4-C to CH4")
            .expression("E_CH4 = M_C * 16/12")
            .scalar("M_C", "Carbon emitted as CH4", "t CH4-C")
            .output("E_CH4", "CH4 mass", "t CH4")
            .compute(|a| Ok(a.scalar(0)? * CH4_PER_C)),
        FormulaSpec::builder(c, "0.6", "CO2 to carbon")
            .expression("M_C = E_CO2 * 12/44")
            .scalar("E_CO2", "CO2 mass", "t CO2")
            .output("M_C", "Carbon mass", "t C")
            .compute(|a| Ok(a.scalar(0)? / CO2_PER_C)),
        FormulaSpec::builder(c, "0.7", "Carbon mass balance")
            .describe("CO2 from the carbon that enters a process and does not leave it in products or waste")
            .expression("E_CO2 = (C_in - C_prod - C_waste) * 44/12")
            .scalar("C_in", "Carbon in raw materials and fuels", "t C")
            .scalar("C_prod", "Carbon in products", "t C")
            .scalar("C_waste", "Carbon in waste and by-products", "t C")
            .output("E_CO2", "CO2 emission", "t CO2")
            .compute(|a| {
                let (input, product, waste) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                Ok((input - product - waste) * CO2_PER_C)
            }),
        FormulaSpec::builder(c, "0.8", "Activity times emission factor")
            .expression("E = AD * EF")
            .scalar("AD", "Activity data", "unit")
            .scalar("EF", "Emission factor", "t/unit")
            .output("E", "Emission", "t")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)?)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ghgcalc_core::compute::{Arguments, Value};

    fn find(id: &str) -> FormulaSpec {
        formulas().into_iter().find(|f| f.id.as_str() == id).unwrap()
    }

    #[test]
    fn test_carbon_round_trip_constants() {
        let to_co2 = find("0.3").evaluate(&Arguments::new(vec![Value::from(12.0)])).unwrap();
        assert_relative_eq!(to_co2, 44.0, epsilon = 1e-12);
        let to_c = find("0.6").evaluate(&Arguments::new(vec![Value::from(44.0)])).unwrap();
        assert_relative_eq!(to_c, 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mass_balance() {
        let args = Arguments::new(vec![Value::from(10.0), Value::from(4.0), Value::from(0.5)]);
        assert_relative_eq!(find("0.7").evaluate(&args).unwrap(), 5.5 * 44.0 / 12.0, epsilon = 1e-12);
    }
}
