//! Livestock, manure management, managed soils, liming, urea and rice.
//!
//! Nitrogen flows are entered in kg N and converted to tonnes of N2O.

use ghgcalc_core::compute::{divide, FloatValue, CO2_PER_C, N2O_PER_N};
use ghgcalc_core::formula::{Category, FormulaSpec};
use ghgcalc_core::lookup::{GWP_CH4, GWP_N2O};

/// Energy content of methane.
/// unit: MJ/kg CH4
const METHANE_ENERGY: FloatValue = 55.65;
/// Carbon fraction of limestone.
const LIMESTONE_CARBON: FloatValue = 0.12;
/// Carbon fraction of dolomite.
const DOLOMITE_CARBON: FloatValue = 0.13;
/// Carbon fraction of urea.
const UREA_CARBON: FloatValue = 0.20;

pub(crate) fn formulas() -> Vec<FormulaSpec> {
    let c = Category::Agriculture;
    vec![
        FormulaSpec::builder(c, "7.1", "CH4 from enteric fermentation")
            .expression("E_CH4 = N * EF * 1e-3")
            .scalar("N", "Number of animals", "head")
            .scalar("EF", "Emission factor", "kg CH4/head/yr")
            .output("E_CH4", "CH4 emissions", "t CH4")
            .related(&["7.3"])
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * 1e-3)),
        FormulaSpec::builder(c, "7.2", "CH4 from manure management")
            .expression("E_CH4 = N * EF * 1e-3")
            .scalar("N", "Number of animals", "head")
            .scalar("EF", "Emission factor", "kg CH4/head/yr")
            .output("E_CH4", "CH4 emissions", "t CH4")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * 1e-3)),
        FormulaSpec::builder(c, "7.3", "Enteric fermentation emission factor")
            .expression("EF = GE * Ym / 100 * 365 / 55.65")
            .scalar("GE", "Gross energy intake", "MJ/head/day")
            .scalar("Ym", "Methane conversion factor", "%")
            .output("EF", "Emission factor", "kg CH4/head/yr")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? / 100.0 * 365.0 / METHANE_ENERGY)),
        FormulaSpec::builder(c, "7.4", "Annual nitrogen excretion")
            .expression("N_ex = N * N_rate * TAM / 1000 * 365")
            .scalar("N", "Number of animals", "head")
            .scalar("N_rate", "Nitrogen excretion rate", "kg N/(1000 kg mass)/day")
            .scalar("TAM", "Typical animal mass", "kg")
            .output("N_ex", "Nitrogen excreted", "kg N/yr")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * a.scalar(2)? / 1000.0 * 365.0)),
        FormulaSpec::builder(c, "7.5", "Direct N2O from manure management")
            .expression("E_N2O = N_ex * MS * EF3 * 44/28 * 1e-3")
            .scalar("N_ex", "Nitrogen excreted", "kg N")
            .scalar("MS", "Fraction managed in the system", "")
            .scalar("EF3", "Emission factor", "kg N2O-N/kg N")
            .output("E_N2O", "N2O emissions", "t N2O")
            .related(&["7.4"])
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * a.scalar(2)? * N2O_PER_N * 1e-3)),
        FormulaSpec::builder(c, "7.6", "Direct N2O from managed soils")
            .expression("E_N2O = (F_SN + F_ON + F_CR + F_SOM) * EF1 * 44/28 * 1e-3")
            .scalar("F_SN", "Synthetic fertiliser nitrogen", "kg N")
            .scalar("F_ON", "Organic nitrogen applied", "kg N")
            .scalar("F_CR", "Nitrogen in crop residues", "kg N")
            .scalar("F_SOM", "Nitrogen mineralised from soil organic matter", "kg N")
            .scalar("EF1", "Emission factor", "kg N2O-N/kg N")
            .output("E_N2O", "N2O emissions", "t N2O")
            .related(&["7.14", "7.16"])
            .compute(|a| {
                let nitrogen = a.scalar(0)? + a.scalar(1)? + a.scalar(2)? + a.scalar(3)?;
                Ok(nitrogen * a.scalar(4)? * N2O_PER_N * 1e-3)
            }),
        FormulaSpec::builder(c, "7.7", "Direct N2O from pasture, range and paddock")
            .expression("E_N2O = F_PRP * EF3_PRP * 44/28 * 1e-3")
            .scalar("F_PRP", "Nitrogen deposited by grazing animals", "kg N")
            .scalar("EF3_PRP", "Emission factor", "kg N2O-N/kg N")
            .output("E_N2O", "N2O emissions", "t N2O")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * N2O_PER_N * 1e-3)),
        FormulaSpec::builder(c, "7.8", "Indirect N2O from leaching and runoff")
            .expression("E_N2O = (F_SN + F_ON + F_PRP + F_CR + F_SOM) * Frac_LEACH * EF5 * 44/28 * 1e-3")
            .scalar("F_SN", "Synthetic fertiliser nitrogen", "kg N")
            .scalar("F_ON", "Organic nitrogen applied", "kg N")
            .scalar("F_PRP", "Nitrogen deposited by grazing animals", "kg N")
            .scalar("F_CR", "Nitrogen in crop residues", "kg N")
            .scalar("F_SOM", "Nitrogen mineralised from soil organic matter", "kg N")
            .scalar("Frac_LEACH", "Fraction of nitrogen lost by leaching", "")
            .scalar("EF5", "Emission factor", "kg N2O-N/kg N")
            .output("E_N2O", "N2O emissions", "t N2O")
            .compute(|a| {
                let nitrogen =
                    a.scalar(0)? + a.scalar(1)? + a.scalar(2)? + a.scalar(3)? + a.scalar(4)?;
                let (leached, ef) = (a.scalar(5)?, a.scalar(6)?);
                Ok(nitrogen * leached * ef * N2O_PER_N * 1e-3)
            }),
        FormulaSpec::builder(c, "7.9", "Indirect N2O from volatilisation")
            .expression("E_N2O = (F_SN * Frac_GASF + (F_ON + F_PRP) * Frac_GASM) * EF4 * 44/28 * 1e-3")
            .scalar("F_SN", "Synthetic fertiliser nitrogen", "kg N")
            .scalar("Frac_GASF", "Fraction volatilised from synthetic fertiliser", "")
            .scalar("F_ON", "Organic nitrogen applied", "kg N")
            .scalar("F_PRP", "Nitrogen deposited by grazing animals", "kg N")
            .scalar("Frac_GASM", "Fraction volatilised from organic nitrogen", "")
            .scalar("EF4", "Emission factor", "kg N2O-N/kg N")
            .output("E_N2O", "N2O emissions", "t N2O")
            .compute(|a| {
                let (synthetic, synthetic_frac) = (a.scalar(0)?, a.scalar(1)?);
                let (organic, grazing, organic_frac) = (a.scalar(2)?, a.scalar(3)?, a.scalar(4)?);
                let volatilised = synthetic * synthetic_frac + (organic + grazing) * organic_frac;
                Ok(volatilised * a.scalar(5)? * N2O_PER_N * 1e-3)
            }),
        FormulaSpec::builder(c, "7.10", "CO2 from liming")
            .expression("E_CO2 = (M_lime * 0.12 + M_dol * 0.13) * 44/12")
            .scalar("M_lime", "Limestone applied", "t")
            .scalar("M_dol", "Dolomite applied", "t")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| {
                let (limestone, dolomite) = (a.scalar(0)?, a.scalar(1)?);
                Ok((limestone * LIMESTONE_CARBON + dolomite * DOLOMITE_CARBON) * CO2_PER_C)
            }),
        FormulaSpec::builder(c, "7.11", "CO2 from urea fertilisation")
            .expression("E_CO2 = M * 0.20 * 44/12")
            .scalar("M", "Urea applied", "t")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| Ok(a.scalar(0)? * UREA_CARBON * CO2_PER_C)),
        FormulaSpec::builder(c, "7.12", "CH4 from rice cultivation")
            .expression("E_CH4 = EF * t * A * 1e-3")
            .scalar("EF", "Daily emission factor", "kg CH4/ha/day")
            .scalar("t", "Cultivation period", "day")
            .scalar("A", "Harvested area", "ha")
            .output("E_CH4", "CH4 emissions", "t CH4")
            .related(&["7.13"])
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * a.scalar(2)? * 1e-3)),
        FormulaSpec::builder(c, "7.13", "Adjusted daily emission factor for rice")
            .expression("EF = EF_c * SF_w * SF_p * SF_o")
            .scalar("EF_c", "Baseline emission factor", "kg CH4/ha/day")
            .scalar("SF_w", "Water regime during cultivation", "")
            .scalar("SF_p", "Water regime before cultivation", "")
            .scalar("SF_o", "Organic amendments", "")
            .output("EF", "Daily emission factor", "kg CH4/ha/day")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * a.scalar(2)? * a.scalar(3)?)),
        FormulaSpec::builder(c, "7.14", "Nitrogen in crop residues")
            .expression("F_CR = Crop * (R_AG * N_AG * (1 - Frac_remove) + R_BG * N_BG) * 1000")
            .scalar("Crop", "Harvested dry matter", "t")
            .scalar("R_AG", "Above-ground residue ratio", "")
            .scalar("N_AG", "Nitrogen content of above-ground residues", "kg N/kg")
            .scalar("Frac_remove", "Fraction of residues removed", "")
            .scalar("R_BG", "Below-ground residue ratio", "")
            .scalar("N_BG", "Nitrogen content of below-ground residues", "kg N/kg")
            .output("F_CR", "Nitrogen in crop residues", "kg N")
            .compute(|a| {
                let crop = a.scalar(0)?;
                let (above_ratio, above_n, removed) = (a.scalar(1)?, a.scalar(2)?, a.scalar(3)?);
                let (below_ratio, below_n) = (a.scalar(4)?, a.scalar(5)?);
                Ok(crop * (above_ratio * above_n * (1.0 - removed) + below_ratio * below_n) * 1000.0)
            }),
        FormulaSpec::builder(c, "7.15", "Emissions from burning crop residues")
            .expression("E = A * M_B * C_f * G_ef * 1e-3")
            .scalar("A", "Area burnt", "ha")
            .scalar("M_B", "Residue available for burning", "t/ha")
            .scalar("C_f", "Combustion factor", "")
            .scalar("G_ef", "Emission factor", "g/kg")
            .output("E", "Emissions", "t")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * a.scalar(2)? * a.scalar(3)? * 1e-3)),
        FormulaSpec::builder(c, "7.16", "Nitrogen mineralised from soil organic matter")
            .expression("F_SOM = dC / R * 1000")
            .scalar("dC", "Soil carbon lost", "t C")
            .scalar("R", "C:N ratio of soil organic matter", "")
            .output("F_SOM", "Nitrogen mineralised", "kg N")
            .compute(|a| {
                let (carbon, ratio) = (a.scalar(0)?, a.scalar(1)?);
                Ok(divide(carbon, ratio, "C:N ratio")? * 1000.0)
            }),
        FormulaSpec::builder(c, "7.17", "Total agricultural emissions")
            .expression("E_CO2e = E_CO2 + E_CH4 * 28 + E_N2O * 265")
            .scalar("E_CO2", "CO2 emissions", "t CO2")
            .scalar("E_CH4", "CH4 emissions", "t CH4")
            .scalar("E_N2O", "N2O emissions", "t N2O")
            .output("E_CO2e", "Agricultural emissions", "t CO2-eq")
            .compute(|a| {
                let (co2, ch4, n2o) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                Ok(co2 + ch4 * GWP_CH4 + n2o * GWP_N2O)
            }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ghgcalc_core::compute::{Arguments, Value};

    fn scalars(values: &[FloatValue]) -> Arguments {
        Arguments::new(values.iter().copied().map(Value::from).collect())
    }

    fn find(id: &str) -> FormulaSpec {
        formulas().into_iter().find(|f| f.id.as_str() == id).unwrap()
    }

    #[test]
    fn test_leaching_uses_all_nitrogen_sources() {
        let args = scalars(&[100.0, 200.0, 300.0, 400.0, 0.0, 0.3, 0.011]);
        assert_relative_eq!(
            find("7.8").evaluate(&args).unwrap(),
            1000.0 * 0.3 * 0.011 * 44.0 / 28.0 * 1e-3,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_urea_and_liming() {
        assert_relative_eq!(
            find("7.11").evaluate(&scalars(&[1.0])).unwrap(),
            0.2 * 44.0 / 12.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            find("7.10").evaluate(&scalars(&[100.0, 0.0])).unwrap(),
            12.0 * 44.0 / 12.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_totals_with_gwp() {
        assert_relative_eq!(
            find("7.17").evaluate(&scalars(&[1.0, 1.0, 1.0])).unwrap(),
            294.0
        );
    }
}
