//! Chemical and metallurgical industry.

use ghgcalc_core::compute::CO2_PER_C;
use ghgcalc_core::formula::{Category, FormulaSpec};
use ghgcalc_core::lookup::LookupTable;

pub(crate) fn formulas() -> Vec<FormulaSpec> {
    let c = Category::ChemicalsAndMetals;
    vec![
        FormulaSpec::builder(c, "5.1", "CO2 from ammonia production")
            .expression("E_CO2 = FR * CC * COF * 44/12 - R_urea")
            .scalar("FR", "Fuel requirement", "TJ")
            .scalar("CC", "Carbon content of the fuel", "t C/TJ")
            .scalar("COF", "Carbon oxidation factor", "")
            .scalar("R_urea", "CO2 recovered for urea production", "t CO2")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| {
                let (fuel, carbon, oxidation) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                let recovered = a.scalar(3)?;
                Ok(fuel * carbon * oxidation * CO2_PER_C - recovered)
            }),
        FormulaSpec::builder(c, "5.2", "N2O from nitric acid production")
            .expression("E_N2O = P * EF * (1 - DF * ASUF) * 1e-3")
            .scalar("P", "Nitric acid produced", "t")
            .scalar("EF", "Emission factor", "kg N2O/t")
            .scalar("DF", "Destruction factor of the abatement", "")
            .scalar("ASUF", "Abatement system utilisation", "")
            .output("E_N2O", "N2O emissions", "t N2O")
            .compute(|a| {
                let (production, ef) = (a.scalar(0)?, a.scalar(1)?);
                let (destruction, utilisation) = (a.scalar(2)?, a.scalar(3)?);
                Ok(production * ef * (1.0 - destruction * utilisation) * 1e-3)
            }),
        FormulaSpec::builder(c, "5.3", "N2O from adipic acid production")
            .expression("E_N2O = P * EF * (1 - DF * ASUF) * 1e-3")
            .scalar("P", "Adipic acid produced", "t")
            .scalar("EF", "Emission factor", "kg N2O/t")
            .scalar("DF", "Destruction factor of the abatement", "")
            .scalar("ASUF", "Abatement system utilisation", "")
            .output("E_N2O", "N2O emissions", "t N2O")
            .compute(|a| {
                let (production, ef) = (a.scalar(0)?, a.scalar(1)?);
                let (destruction, utilisation) = (a.scalar(2)?, a.scalar(3)?);
                Ok(production * ef * (1.0 - destruction * utilisation) * 1e-3)
            }),
        FormulaSpec::builder(c, "5.4", "N2O from caprolactam production")
            .expression("E_N2O = P * EF * 1e-3")
            .scalar("P", "Caprolactam produced", "t")
            .scalar("EF", "Emission factor", "kg N2O/t")
            .output("E_N2O", "N2O emissions", "t N2O")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * 1e-3)),
        FormulaSpec::builder(c, "5.5", "CO2 from carbide production")
            .expression("E_CO2 = M * EF")
            .scalar("M", "Carbide produced", "t")
            .scalar("EF", "Emission factor", "t CO2/t")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)?)),
        FormulaSpec::builder(c, "5.6", "CO2 from titanium dioxide production")
            .expression("E_CO2 = M * EF")
            .scalar("M", "Titanium dioxide produced", "t")
            .scalar("EF", "Emission factor", "t CO2/t")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)?)),
        FormulaSpec::builder(c, "5.7", "CO2 from petrochemical feedstock")
            .describe("Carbon balance between the feedstock consumed and the primary product")
            .expression("E_CO2 = (FA * FC - P * PC) * 44/12")
            .scalar("FA", "Feedstock consumed", "t")
            .scalar("FC", "Carbon content of the feedstock", "t C/t")
            .scalar("P", "Primary product", "t")
            .scalar("PC", "Carbon content of the product", "t C/t")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| {
                let (feedstock, feed_carbon) = (a.scalar(0)?, a.scalar(1)?);
                let (product, product_carbon) = (a.scalar(2)?, a.scalar(3)?);
                Ok((feedstock * feed_carbon - product * product_carbon) * CO2_PER_C)
            }),
        FormulaSpec::builder(c, "5.8", "CO2 from oxygen steelmaking")
            .expression("E_CO2 = (M_pig * C_pig - M_st * C_st) / 100 * 44/12")
            .scalar("M_pig", "Pig iron charged", "t")
            .scalar("C_pig", "Carbon in pig iron", "%")
            .scalar("M_st", "Steel produced", "t")
            .scalar("C_st", "Carbon in steel", "%")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| {
                let (pig, pig_carbon) = (a.scalar(0)?, a.scalar(1)?);
                let (steel, steel_carbon) = (a.scalar(2)?, a.scalar(3)?);
                Ok((pig * pig_carbon - steel * steel_carbon) / 100.0 * CO2_PER_C)
            }),
        FormulaSpec::builder(c, "5.9", "CO2 from electric arc furnace electrodes")
            .expression("E_CO2 = M_el * C_el * 44/12")
            .scalar("M_el", "Electrodes consumed", "t")
            .scalar("C_el", "Carbon content of the electrodes", "t C/t")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * CO2_PER_C)),
        FormulaSpec::builder(c, "5.10", "CO2 from ferroalloy production")
            .expression("E_CO2 = M * EF")
            .scalar("M", "Ferroalloy produced", "t")
            .scalar("EF", "Emission factor", "t CO2/t")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)?)),
        FormulaSpec::builder(c, "5.11", "CO2 from prebaked anode consumption")
            .expression("E_CO2 = MP * NAC * (100 - S_a - Ash_a) / 100 * 44/12")
            .scalar("MP", "Primary aluminium produced", "t")
            .scalar("NAC", "Net anode consumption", "t/t Al")
            .scalar("S_a", "Sulfur content of the anodes", "%")
            .scalar("Ash_a", "Ash content of the anodes", "%")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| {
                let (metal, anode) = (a.scalar(0)?, a.scalar(1)?);
                let (sulfur, ash) = (a.scalar(2)?, a.scalar(3)?);
                Ok(metal * anode * (100.0 - sulfur - ash) / 100.0 * CO2_PER_C)
            }),
        FormulaSpec::builder(c, "5.12", "CF4 from anode effects")
            .describe("Slope method")
            .expression("E_CF4 = S * AEM * MP * 1e-3")
            .scalar("S", "Slope coefficient", "(kg CF4/t Al)/(AE-min/cell-day)")
            .scalar("AEM", "Anode effect minutes per cell-day", "min")
            .scalar("MP", "Primary aluminium produced", "t")
            .output("E_CF4", "CF4 emissions", "t CF4")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * a.scalar(2)? * 1e-3)),
        FormulaSpec::builder(c, "5.13", "C2F6 from anode effects")
            .expression("E_C2F6 = E_CF4 * F")
            .scalar("E_CF4", "CF4 emissions", "t CF4")
            .scalar("F", "Weight fraction C2F6/CF4", "")
            .output("E_C2F6", "C2F6 emissions", "t C2F6")
            .related(&["5.12"])
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)?)),
        FormulaSpec::builder(c, "5.14", "Cover gas emissions")
            .describe("Fluorinated cover gas consumed in magnesium casting, assumed fully emitted")
            .expression("E_CO2e = C * GWP")
            .scalar("C", "Cover gas consumed", "t")
            .categorical("GWP", "Cover gas", LookupTable::GlobalWarmingPotential)
            .output("E_CO2e", "Emission", "t CO2-eq")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)?)),
        FormulaSpec::builder(c, "5.15", "HFC-23 from HCFC-22 production")
            .expression("E_HFC23 = P * EF * (1 - DF)")
            .scalar("P", "HCFC-22 produced", "t")
            .scalar("EF", "HFC-23 generation factor", "t/t")
            .scalar("DF", "Fraction destroyed", "")
            .output("E_HFC23", "HFC-23 emissions", "t CHF3")
            .compute(|a| {
                let (production, ef, destroyed) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                Ok(production * ef * (1.0 - destroyed))
            }),
        FormulaSpec::builder(c, "5.16", "CO2 from zinc production")
            .expression("E_CO2 = Zn * EF")
            .scalar("Zn", "Zinc produced", "t")
            .scalar("EF", "Emission factor", "t CO2/t")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)?)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ghgcalc_core::compute::{Arguments, Value};

    #[test]
    fn test_full_abatement_removes_nitric_acid_n2o() {
        let spec = formulas().into_iter().find(|f| f.id.as_str() == "5.2").unwrap();
        let args = Arguments::new(vec![Value::from(1000.0), Value::from(7.0), Value::from(1.0), Value::from(1.0)]);
        assert_relative_eq!(spec.evaluate(&args).unwrap(), 0.0);

        let args = Arguments::new(vec![Value::from(1000.0), Value::from(7.0), Value::from(0.9), Value::from(0.5)]);
        assert_relative_eq!(spec.evaluate(&args).unwrap(), 3.85, epsilon = 1e-12);
    }
}
