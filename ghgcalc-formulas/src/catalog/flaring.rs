//! Flaring of associated and process gas.

use ghgcalc_core::compute::{divide, sum_of_products};
use ghgcalc_core::formula::{Category, FormulaSpec};
use ghgcalc_core::lookup::{LookupTable, GWP_CH4};

/// Standard reference temperature of gas volumes.
/// unit: K
const REFERENCE_TEMPERATURE: f64 = 293.15;
/// unit: kPa
const REFERENCE_PRESSURE: f64 = 101.325;

pub(crate) fn formulas() -> Vec<FormulaSpec> {
    let c = Category::Flaring;
    vec![
        FormulaSpec::builder(c, "2.1", "CO2 emissions from flaring")
            .expression("E_CO2 = V * EF_CO2")
            .scalar("V", "Volume of flared gas", "thousand m3")
            .scalar("EF_CO2", "CO2 emission factor", "t CO2/thousand m3")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .related(&["2.2", "2.6"])
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)?)),
        FormulaSpec::builder(c, "2.2", "CO2 emission factor of flared gas")
            .expression("EF_CO2 = sum_i(W_i * nC_i) * rho_CO2 * 1e-2 * OF")
            .list("W_i", "Volume fraction of component i", "%")
            .list("nC_i", "Carbon atoms in a molecule of component i", "")
            .categorical("rho_CO2", "CO2 density", LookupTable::Co2Density)
            .scalar("OF", "Combustion completeness of the flare", "")
            .output("EF_CO2", "CO2 emission factor", "t CO2/thousand m3")
            .compute(|a| {
                let [w, nc] = a.parallel([0, 1])?;
                let (density, of) = (a.scalar(2)?, a.scalar(3)?);
                Ok(sum_of_products(&[w, nc]) * density * 1e-2 * of)
            }),
        FormulaSpec::builder(c, "2.3", "CH4 emissions from incomplete flaring")
            .expression("E_CH4 = V * W_CH4 * 1e-2 * rho_CH4 * (1 - OF)")
            .scalar("V", "Volume of flared gas", "thousand m3")
            .scalar("W_CH4", "Methane fraction", "% vol")
            .scalar("rho_CH4", "Methane density", "kg/m3")
            .scalar("OF", "Combustion completeness of the flare", "")
            .output("E_CH4", "CH4 emissions", "t CH4")
            .compute(|a| {
                let (volume, fraction) = (a.scalar(0)?, a.scalar(1)?);
                let (density, of) = (a.scalar(2)?, a.scalar(3)?);
                Ok(volume * fraction * 1e-2 * density * (1.0 - of))
            }),
        FormulaSpec::builder(c, "2.4", "Flared gas volume from mass")
            .expression("V = M / rho")
            .scalar("M", "Mass of flared gas", "t")
            .scalar("rho", "Gas density", "kg/m3")
            .output("V", "Volume of flared gas", "thousand m3")
            .compute(|a| {
                let (mass, density) = (a.scalar(0)?, a.scalar(1)?);
                divide(mass, density, "gas density")
            }),
        FormulaSpec::builder(c, "2.5", "Density of a gas mixture")
            .expression("rho = sum_i(W_i * rho_i) / 100")
            .list("W_i", "Volume fraction of component i", "%")
            .list("rho_i", "Density of component i", "kg/m3")
            .output("rho", "Gas density", "kg/m3")
            .compute(|a| {
                let [w, rho] = a.parallel([0, 1])?;
                Ok(sum_of_products(&[w, rho]) / 100.0)
            }),
        FormulaSpec::builder(c, "2.6", "Gas volume at standard conditions")
            .describe("Reduces a metered volume to 20 °C and 101.325 kPa")
            .expression("V_st = V * (P / 101.325) * (293.15 / (273.15 + t))")
            .scalar("V", "Metered volume", "thousand m3")
            .scalar("P", "Absolute pressure", "kPa")
            .scalar("t", "Gas temperature", "°C")
            .output("V_st", "Volume at standard conditions", "thousand m3")
            .compute(|a| {
                let (volume, pressure, temperature) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                let ratio = divide(REFERENCE_TEMPERATURE, 273.15 + temperature, "absolute temperature")?;
                Ok(volume * pressure / REFERENCE_PRESSURE * ratio)
            }),
        FormulaSpec::builder(c, "2.7", "CO2 carried through the flare")
            .describe("CO2 already present in the flared gas, released without combustion")
            .expression("E_CO2 = V * W_CO2 * 1e-2 * rho_CO2")
            .scalar("V", "Volume of flared gas", "thousand m3")
            .scalar("W_CO2", "CO2 fraction", "% vol")
            .categorical("rho_CO2", "CO2 density", LookupTable::Co2Density)
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * 1e-2 * a.scalar(2)?)),
        FormulaSpec::builder(c, "2.8", "Total flaring emissions")
            .expression("E_CO2e = E_CO2 + E_CH4 * 28")
            .scalar("E_CO2", "CO2 emissions", "t CO2")
            .scalar("E_CH4", "CH4 emissions", "t CH4")
            .output("E_CO2e", "Flaring emissions", "t CO2-eq")
            .related(&["2.1", "2.3", "2.7"])
            .compute(|a| Ok(a.scalar(0)? + a.scalar(1)? * GWP_CH4)),
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
    fn test_standard_volume_is_identity_at_reference() {
        let args = Arguments::new(vec![Value::from(10.0), Value::from(101.325), Value::from(20.0)]);
        assert_relative_eq!(find("2.6").evaluate(&args).unwrap(), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_complete_combustion_leaves_no_methane() {
        let args = Arguments::new(vec![Value::from(100.0), Value::from(90.0), Value::from(0.668), Value::from(1.0)]);
        assert_relative_eq!(find("2.3").evaluate(&args).unwrap(), 0.0);
    }
}
