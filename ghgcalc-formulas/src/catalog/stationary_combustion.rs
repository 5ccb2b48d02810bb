//! Stationary fuel combustion.
//!
//! The total CO2 emission (1.1) sums `FC * EF * OF` over every fuel burnt. The
//! remaining formulas compute the per-fuel terms: consumption in energy units,
//! emission factors from fuel composition and oxidation factors.

use ghgcalc_core::compute::{divide, sum_of_products, FloatValue};
use ghgcalc_core::formula::{Category, FormulaSpec};
use ghgcalc_core::lookup::{LookupTable, CO2_PER_CARBON_FACTOR};

/// Molar mass of CO2.
/// unit: g/mol
const MOLAR_MASS_CO2: FloatValue = 44.011;

pub(crate) fn formulas() -> Vec<FormulaSpec> {
    let c = Category::StationaryCombustion;
    vec![
        FormulaSpec::builder(c, "1.1", "CO2 emissions from stationary fuel combustion")
            .describe("Sum over all fuels burnt at the installation. Enter one row per fuel or one list per field.")
            .expression("E_CO2 = sum_j(FC_j * EF_j * OF_j)")
            .list("FC_j", "Fuel consumption", "TJ")
            .list("EF_j", "Emission factor", "t CO2/TJ")
            .list("OF_j", "Oxidation factor", "")
            .variadic()
            .output("E_CO2", "CO2 emissions", "t CO2")
            .related(&["1.2a", "1.2b", "1.3", "1.4", "1.5", "1.8", "1.9"])
            .compute(|a| {
                let [fc, ef, of] = a.parallel([0, 1, 2])?;
                Ok(sum_of_products(&[fc, ef, of]))
            }),
        FormulaSpec::builder(c, "1.2a", "Fuel consumption in coal equivalent")
            .expression("FC = FC_nat * k")
            .scalar("FC_nat", "Fuel consumption in natural units", "t, thousand m3")
            .scalar("k", "Coal equivalent coefficient", "t c.e./unit")
            .output("FC", "Fuel consumption", "t c.e.")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)?)),
        FormulaSpec::builder(c, "1.2b", "Fuel consumption in energy units")
            .expression("FC = FC_nat * NCV * 1e-3")
            .scalar("FC_nat", "Fuel consumption in natural units", "t, thousand m3")
            .scalar("NCV", "Net calorific value", "GJ/unit")
            .output("FC", "Fuel consumption", "TJ")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * 1e-3)),
        FormulaSpec::builder(c, "1.3", "Emission factor of a gaseous fuel (volume fractions)")
            .describe("From the component composition of the gas in volume percent")
            .expression("EF = sum_i(W_i * nC_i) * rho_CO2 * 1e-2")
            .list("W_i", "Volume fraction of component i", "%")
            .list("nC_i", "Carbon atoms in a molecule of component i", "")
            .categorical("rho_CO2", "CO2 density", LookupTable::Co2Density)
            .output("EF", "Emission factor", "t CO2/thousand m3")
            .compute(|a| {
                let [w, nc] = a.parallel([0, 1])?;
                let density = a.scalar(2)?;
                Ok(sum_of_products(&[w, nc]) * density * 1e-2)
            }),
        FormulaSpec::builder(c, "1.4", "Emission factor of a gaseous fuel (mass fractions)")
            .describe("From the component composition of the gas in mass percent")
            .expression("EF = sum_i(W_i * nC_i * 44.011 / M_i) * rho_CO2 * 1e-2")
            .list("W_i", "Mass fraction of component i", "%")
            .list("nC_i", "Carbon atoms in a molecule of component i", "")
            .list("M_i", "Molar mass of component i", "g/mol")
            .categorical("rho_CO2", "CO2 density", LookupTable::Co2Density)
            .output("EF", "Emission factor", "t CO2/t")
            .compute(|a| {
                let [w, nc, m] = a.parallel([0, 1, 2])?;
                let density = a.scalar(3)?;
                let mut sum = 0.0;
                for ((w, nc), m) in w.iter().zip(nc).zip(m) {
                    sum += w * nc * divide(MOLAR_MASS_CO2, *m, "molar mass")?;
                }
                Ok(sum * density * 1e-2)
            }),
        FormulaSpec::builder(c, "1.5", "Emission factor of a solid or liquid fuel")
            .expression("EF = W_C * 3.664")
            .scalar("W_C", "Carbon content", "t C/t")
            .output("EF", "Emission factor", "t CO2/t")
            .related(&["1.6", "1.7", "1.10"])
            .compute(|a| Ok(a.scalar(0)? * CO2_PER_CARBON_FACTOR)),
        FormulaSpec::builder(c, "1.6", "Carbon content of coke")
            .expression("W_C = (100 - A - V - S) / 100")
            .scalar("A", "Ash content", "%")
            .scalar("V", "Volatile matter", "%")
            .scalar("S", "Sulfur content", "%")
            .output("W_C", "Carbon content", "t C/t")
            .compute(|a| {
                let (ash, volatiles, sulfur) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                Ok((100.0 - ash - volatiles - sulfur) / 100.0)
            }),
        FormulaSpec::builder(c, "1.7", "Carbon content from ultimate analysis")
            .describe("Converts the dry ash-free carbon content to the as-received basis")
            .expression("W_C = C_daf * (100 - W_r - A_r) / 1e4")
            .scalar("C_daf", "Carbon, dry ash-free basis", "%")
            .scalar("W_r", "Moisture, as received", "%")
            .scalar("A_r", "Ash, as received", "%")
            .output("W_C", "Carbon content", "t C/t")
            .compute(|a| {
                let (carbon, moisture, ash) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                Ok(carbon * (100.0 - moisture - ash) / 1e4)
            }),
        FormulaSpec::builder(c, "1.8", "Oxidation factor from heat loss")
            .describe("From the heat loss due to mechanical incompleteness of combustion")
            .expression("OF = (100 - q4) / 100")
            .scalar("q4", "Heat loss from unburnt carbon", "%")
            .output("OF", "Oxidation factor", "")
            .compute(|a| Ok((100.0 - a.scalar(0)?) / 100.0)),
        FormulaSpec::builder(c, "1.9", "Oxidation factor from carbon in ash")
            .expression("OF = 1 - C_ash / C_fuel")
            .scalar("C_ash", "Carbon in ash and slag", "t")
            .scalar("C_fuel", "Carbon in the fuel burnt", "t")
            .output("OF", "Oxidation factor", "")
            .compute(|a| {
                let (ash, fuel) = (a.scalar(0)?, a.scalar(1)?);
                Ok(1.0 - divide(ash, fuel, "carbon in the fuel")?)
            }),
        FormulaSpec::builder(c, "1.10", "Carbon content per unit of energy")
            .expression("C = W_C / NCV * 1000")
            .scalar("W_C", "Carbon content", "t C/t")
            .scalar("NCV", "Net calorific value", "GJ/t")
            .output("C", "Carbon content", "t C/TJ")
            .compute(|a| {
                let (carbon, ncv) = (a.scalar(0)?, a.scalar(1)?);
                Ok(divide(carbon, ncv, "net calorific value")? * 1000.0)
            }),
        FormulaSpec::builder(c, "1.11", "CH4 emissions from stationary combustion")
            .expression("E_CH4 = FC * EF_CH4 * 1e-3")
            .scalar("FC", "Fuel consumption", "TJ")
            .scalar("EF_CH4", "CH4 emission factor", "kg/TJ")
            .output("E_CH4", "CH4 emissions", "t CH4")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * 1e-3)),
        FormulaSpec::builder(c, "1.12", "N2O emissions from stationary combustion")
            .expression("E_N2O = FC * EF_N2O * 1e-3")
            .scalar("FC", "Fuel consumption", "TJ")
            .scalar("EF_N2O", "N2O emission factor", "kg/TJ")
            .output("E_N2O", "N2O emissions", "t N2O")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * 1e-3)),
        FormulaSpec::builder(c, "1.13", "Emission factor per unit of energy")
            .expression("EF_TJ = EF_t / NCV * 1000")
            .scalar("EF_t", "Emission factor per unit of mass", "t CO2/t")
            .scalar("NCV", "Net calorific value", "GJ/t")
            .output("EF_TJ", "Emission factor", "t CO2/TJ")
            .compute(|a| {
                let (ef, ncv) = (a.scalar(0)?, a.scalar(1)?);
                Ok(divide(ef, ncv, "net calorific value")? * 1000.0)
            }),
        FormulaSpec::builder(c, "1.14", "CO2 emissions from a single fuel")
            .expression("E_CO2 = FC * EF * OF")
            .scalar("FC", "Fuel consumption", "TJ")
            .scalar("EF", "Emission factor", "t CO2/TJ")
            .scalar("OF", "Oxidation factor", "")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .related(&["1.2b", "1.5", "1.8", "1.9"])
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * a.scalar(2)?)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ghgcalc_core::compute::{Arguments, ArithmeticError, Value};

    fn find(id: &str) -> FormulaSpec {
        formulas().into_iter().find(|f| f.id.as_str() == id).unwrap()
    }

    #[test]
    fn test_methane_emission_factor() {
        // Pure methane at 20 °C: one carbon atom, 100 % by volume.
        let args = Arguments::new(vec![Value::from(vec![100.0]), Value::from(vec![1.0]), Value::from(1.8393)]);
        assert_relative_eq!(find("1.3").evaluate(&args).unwrap(), 1.8393, epsilon = 1e-12);
    }

    #[test]
    fn test_mass_fraction_emission_factor_rejects_zero_molar_mass() {
        let args = Arguments::new(vec![
            Value::from(vec![50.0, 50.0]),
            Value::from(vec![1.0, 2.0]),
            Value::from(vec![16.04, 0.0]),
            Value::from(1.8393),
        ]);
        assert_eq!(
            find("1.4").evaluate(&args).unwrap_err(),
            ArithmeticError::DivisionByZero("molar mass")
        );
    }

    #[test]
    fn test_coke_carbon_content() {
        let args = Arguments::new(vec![Value::from(11.0), Value::from(1.0), Value::from(0.5)]);
        assert_relative_eq!(find("1.6").evaluate(&args).unwrap(), 0.875, epsilon = 1e-12);
    }

    #[test]
    fn test_fuel_sum_rejects_ragged_rows() {
        let args = Arguments::new(vec![
            Value::from(vec![1.0, 2.0]),
            Value::from(vec![1.0]),
            Value::from(vec![1.0, 1.0]),
        ]);
        assert!(matches!(
            find("1.1").evaluate(&args),
            Err(ArithmeticError::MismatchedLists(_))
        ));
    }
}
