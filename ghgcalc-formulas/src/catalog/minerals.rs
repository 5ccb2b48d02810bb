//! Mineral industry: cement, lime, glass, ceramics and other carbonate use.

use ghgcalc_core::compute::{divide, sum_of_products, FloatValue, CO2_PER_C};
use ghgcalc_core::formula::{Category, FormulaSpec};
use ghgcalc_core::lookup::LookupTable;

/// CO2 released per unit mass of CaO formed from CaCO3.
const CO2_PER_CAO: FloatValue = 44.01 / 56.08;
/// CO2 released per unit mass of MgO formed from MgCO3.
const CO2_PER_MGO: FloatValue = 44.01 / 40.30;
/// unit: kg CO2/t Na2CO3
const SODA_ASH_FACTOR: FloatValue = 414.92;

pub(crate) fn formulas() -> Vec<FormulaSpec> {
    let c = Category::Minerals;
    vec![
        FormulaSpec::builder(c, "4.1", "CO2 from carbonate decomposition")
            .expression("E_CO2 = M * EF_carb * F / 1000")
            .scalar("M", "Mass of carbonate consumed", "t")
            .categorical("EF_carb", "Carbonate", LookupTable::CarbonateEmissionFactor)
            .scalar("F", "Calcination fraction", "")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| {
                let (mass, ef, fraction) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                Ok(mass * ef * fraction / 1000.0)
            }),
        FormulaSpec::builder(c, "4.2", "CO2 from clinker production")
            .expression("E_CO2 = M_cl * EF_cl")
            .scalar("M_cl", "Clinker produced", "t")
            .scalar("EF_cl", "Clinker emission factor", "t CO2/t")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .related(&["4.3", "4.13"])
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)?)),
        FormulaSpec::builder(c, "4.3", "Clinker emission factor")
            .describe("From the CaO and MgO content of clinker, excluding CaO from non-carbonate sources")
            .expression("EF_cl = (CaO - CaO_nc) / 100 * 44.01/56.08 + MgO / 100 * 44.01/40.30")
            .scalar("CaO", "CaO content of clinker", "%")
            .scalar("CaO_nc", "CaO from non-carbonate sources", "%")
            .scalar("MgO", "MgO content of clinker", "%")
            .output("EF_cl", "Clinker emission factor", "t CO2/t")
            .compute(|a| {
                let (cao, non_carbonate, mgo) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                Ok((cao - non_carbonate) / 100.0 * CO2_PER_CAO + mgo / 100.0 * CO2_PER_MGO)
            }),
        FormulaSpec::builder(c, "4.4", "Cement kiln dust correction factor")
            .expression("CF_ckd = 1 + M_ckd / M_cl * F_d")
            .scalar("M_ckd", "Cement kiln dust lost", "t")
            .scalar("M_cl", "Clinker produced", "t")
            .scalar("F_d", "Calcination fraction of the dust", "")
            .output("CF_ckd", "Correction factor", "")
            .compute(|a| {
                let (dust, clinker, fraction) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                Ok(1.0 + divide(dust, clinker, "clinker produced")? * fraction)
            }),
        FormulaSpec::builder(c, "4.5", "CO2 from lime production")
            .expression("E_CO2 = M_lime * EF_lime")
            .scalar("M_lime", "Lime produced", "t")
            .scalar("EF_lime", "Lime emission factor", "t CO2/t")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .related(&["4.6", "4.11"])
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)?)),
        FormulaSpec::builder(c, "4.6", "Lime output corrected for hydrated lime")
            .expression("M_lime = M * (1 - x * y)")
            .scalar("M", "Lime output", "t")
            .scalar("x", "Share of hydrated lime", "")
            .scalar("y", "Water content of hydrated lime", "")
            .output("M_lime", "Lime produced", "t")
            .compute(|a| {
                let (mass, share, water) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                Ok(mass * (1.0 - share * water))
            }),
        FormulaSpec::builder(c, "4.7", "CO2 from glass production")
            .expression("E_CO2 = M_g * EF * (1 - CR)")
            .scalar("M_g", "Glass produced", "t")
            .scalar("EF", "Emission factor", "t CO2/t")
            .scalar("CR", "Cullet ratio", "")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| {
                let (mass, ef, cullet) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                Ok(mass * ef * (1.0 - cullet))
            }),
        FormulaSpec::builder(c, "4.8", "CO2 from ceramics")
            .expression("E_CO2 = M_clay * W_carb / 100 * EF_carb / 1000")
            .scalar("M_clay", "Clay consumed", "t")
            .scalar("W_carb", "Carbonate content of the clay", "%")
            .categorical("EF_carb", "Carbonate", LookupTable::CarbonateEmissionFactor)
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| {
                let (clay, content, ef) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                Ok(clay * content / 100.0 * ef / 1000.0)
            }),
        FormulaSpec::builder(c, "4.9", "CO2 from soda ash use")
            .expression("E_CO2 = M * 414.92 / 1000")
            .scalar("M", "Soda ash consumed", "t")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| Ok(a.scalar(0)? * SODA_ASH_FACTOR / 1000.0)),
        FormulaSpec::builder(c, "4.10", "CO2 from several carbonates")
            .expression("E_CO2 = sum_i(M_i * EF_i * F_i) / 1000")
            .list("M_i", "Mass of carbonate i", "t")
            .list("EF_i", "Emission factor of carbonate i", "kg CO2/t")
            .list("F_i", "Calcination fraction", "")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .related(&["4.1"])
            .compute(|a| {
                let [mass, ef, fraction] = a.parallel([0, 1, 2])?;
                Ok(sum_of_products(&[mass, ef, fraction]) / 1000.0)
            }),
        FormulaSpec::builder(c, "4.11", "CO2 from CaO output")
            .expression("E_CO2 = M_CaO * 44.01/56.08")
            .scalar("M_CaO", "CaO produced", "t")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| Ok(a.scalar(0)? * CO2_PER_CAO)),
        FormulaSpec::builder(c, "4.12", "CO2 from MgO output")
            .expression("E_CO2 = M_MgO * 44.01/40.30")
            .scalar("M_MgO", "MgO produced", "t")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| Ok(a.scalar(0)? * CO2_PER_MGO)),
        FormulaSpec::builder(c, "4.13", "Clinker production from cement output")
            .expression("M_cl = M_cem * C_cl - Im + Ex")
            .scalar("M_cem", "Cement produced", "t")
            .scalar("C_cl", "Clinker fraction of cement", "")
            .scalar("Im", "Clinker imported", "t")
            .scalar("Ex", "Clinker exported", "t")
            .output("M_cl", "Clinker produced", "t")
            .compute(|a| {
                let (cement, fraction) = (a.scalar(0)?, a.scalar(1)?);
                let (imported, exported) = (a.scalar(2)?, a.scalar(3)?);
                Ok(cement * fraction - imported + exported)
            }),
        FormulaSpec::builder(c, "4.14", "CO2 from organic carbon in raw meal")
            .expression("E_CO2 = M_rm * TOC / 100 * 44/12")
            .scalar("M_rm", "Raw meal consumed", "t")
            .scalar("TOC", "Total organic carbon", "%")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? / 100.0 * CO2_PER_C)),
        FormulaSpec::builder(c, "4.15", "Total process CO2 from cement production")
            .expression("E_CO2 = E_cl * CF_ckd + E_toc")
            .scalar("E_cl", "CO2 from clinker", "t CO2")
            .scalar("CF_ckd", "Cement kiln dust correction factor", "")
            .scalar("E_toc", "CO2 from organic carbon", "t CO2")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .related(&["4.2", "4.4", "4.14"])
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? + a.scalar(2)?)),
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
    fn test_limestone_calcination() {
        let args = Arguments::new(vec![Value::from(1000.0), Value::from(439.71), Value::from(1.0)]);
        assert_relative_eq!(find("4.1").evaluate(&args).unwrap(), 439.71, epsilon = 1e-9);
    }

    #[test]
    fn test_kiln_dust_requires_clinker() {
        let args = Arguments::new(vec![Value::from(10.0), Value::from(0.0), Value::from(1.0)]);
        assert_eq!(
            find("4.4").evaluate(&args).unwrap_err(),
            ArithmeticError::DivisionByZero("clinker produced")
        );
    }

    #[test]
    fn test_clinker_factor_for_pure_cao() {
        let args = Arguments::new(vec![Value::from(100.0), Value::from(0.0), Value::from(0.0)]);
        assert_relative_eq!(find("4.3").evaluate(&args).unwrap(), CO2_PER_CAO, epsilon = 1e-12);
    }
}
