//! Waste: solid waste disposal (first order decay), biological treatment,
//! incineration, open burning and wastewater.

use std::f64::consts::LN_2;

use ghgcalc_core::compute::{divide, sum_of_products, CH4_PER_C, CO2_PER_C, N2O_PER_N};
use ghgcalc_core::formula::{Category, FormulaSpec};

pub(crate) fn formulas() -> Vec<FormulaSpec> {
    let c = Category::Waste;
    vec![
        FormulaSpec::builder(c, "6.1", "Decay rate constant")
            .describe("First order decay constant from the half-life of the degradable carbon")
            .expression("k = ln(2) / t_1/2")
            .scalar("t_1/2", "Half-life", "yr")
            .output("k", "Decay rate constant", "1/yr")
            .compute(|a| divide(LN_2, a.scalar(0)?, "half-life")),
        FormulaSpec::builder(c, "6.2", "Decomposable degradable organic carbon deposited")
            .expression("DDOCm = W * DOC * DOC_f * MCF")
            .scalar("W", "Waste deposited", "t")
            .scalar("DOC", "Degradable organic carbon", "t C/t")
            .scalar("DOC_f", "Fraction of DOC that decomposes", "")
            .scalar("MCF", "Methane correction factor", "")
            .output("DDOCm", "Decomposable DOC deposited", "t C")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * a.scalar(2)? * a.scalar(3)?)),
        FormulaSpec::builder(c, "6.3", "DDOCm decomposed during the year")
            .expression("DDOCm_dec = DDOCm_a * (1 - exp(-k))")
            .scalar("DDOCm_a", "DDOCm accumulated at the end of the previous year", "t C")
            .scalar("k", "Decay rate constant", "1/yr")
            .output("DDOCm_dec", "DDOCm decomposed", "t C")
            .related(&["6.1", "6.4"])
            .compute(|a| {
                let (accumulated, k) = (a.scalar(0)?, a.scalar(1)?);
                Ok(accumulated * (1.0 - (-k).exp()))
            }),
        FormulaSpec::builder(c, "6.4", "DDOCm accumulated at the end of the year")
            .expression("DDOCm_a = DDOCm_d + DDOCm_a,prev * exp(-k)")
            .scalar("DDOCm_d", "DDOCm deposited during the year", "t C")
            .scalar("DDOCm_a,prev", "DDOCm accumulated at the end of the previous year", "t C")
            .scalar("k", "Decay rate constant", "1/yr")
            .output("DDOCm_a", "DDOCm accumulated", "t C")
            .related(&["6.1", "6.2"])
            .compute(|a| {
                let (deposited, previous, k) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                Ok(deposited + previous * (-k).exp())
            }),
        FormulaSpec::builder(c, "6.5", "CH4 generated from decomposed carbon")
            .expression("CH4_gen = DDOCm_dec * F * 16/12")
            .scalar("DDOCm_dec", "DDOCm decomposed", "t C")
            .scalar("F", "Methane fraction of landfill gas", "")
            .output("CH4_gen", "CH4 generated", "t CH4")
            .related(&["6.3"])
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * CH4_PER_C)),
        FormulaSpec::builder(c, "6.6", "CH4 emitted from a landfill")
            .expression("E_CH4 = (CH4_gen - R) * (1 - OX)")
            .scalar("CH4_gen", "CH4 generated", "t CH4")
            .scalar("R", "CH4 recovered", "t CH4")
            .scalar("OX", "Oxidation factor of the cover", "")
            .output("E_CH4", "CH4 emissions", "t CH4")
            .related(&["6.5"])
            .compute(|a| {
                let (generated, recovered, oxidised) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                Ok((generated - recovered) * (1.0 - oxidised))
            }),
        FormulaSpec::builder(c, "6.7", "CH4 from composting")
            .expression("E_CH4 = M * EF * 1e-3 - R")
            .scalar("M", "Waste treated", "t")
            .scalar("EF", "Emission factor", "g CH4/kg")
            .scalar("R", "CH4 recovered", "t CH4")
            .output("E_CH4", "CH4 emissions", "t CH4")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * 1e-3 - a.scalar(2)?)),
        FormulaSpec::builder(c, "6.8", "N2O from composting")
            .expression("E_N2O = M * EF * 1e-3")
            .scalar("M", "Waste treated", "t")
            .scalar("EF", "Emission factor", "g N2O/kg")
            .output("E_N2O", "N2O emissions", "t N2O")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * 1e-3)),
        FormulaSpec::builder(c, "6.9", "CO2 from waste incineration")
            .describe("Sum over waste types")
            .expression("E_CO2 = sum_i(SW_i * dm_i * CF_i * FCF_i * OF_i) * 44/12")
            .list("SW_i", "Waste incinerated", "t")
            .list("dm_i", "Dry matter content", "")
            .list("CF_i", "Carbon fraction of dry matter", "")
            .list("FCF_i", "Fossil carbon fraction", "")
            .list("OF_i", "Oxidation factor", "")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| {
                let [waste, dry, carbon, fossil, oxidation] = a.parallel([0, 1, 2, 3, 4])?;
                Ok(sum_of_products(&[waste, dry, carbon, fossil, oxidation]) * CO2_PER_C)
            }),
        FormulaSpec::builder(c, "6.10", "N2O from waste incineration")
            .expression("E_N2O = IW * EF * 1e-6")
            .scalar("IW", "Waste incinerated", "t")
            .scalar("EF", "Emission factor", "g N2O/t")
            .output("E_N2O", "N2O emissions", "t N2O")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * 1e-6)),
        FormulaSpec::builder(c, "6.11", "Waste burnt in the open")
            .expression("MSW_B = P * P_frac * MSW_P * B_frac * 365 * 1e-3")
            .scalar("P", "Population", "capita")
            .scalar("P_frac", "Fraction of the population burning waste", "")
            .scalar("MSW_P", "Waste generated per capita", "kg/day")
            .scalar("B_frac", "Fraction of the waste burnt", "")
            .output("MSW_B", "Waste burnt", "t/yr")
            .compute(|a| {
                let (population, burning) = (a.scalar(0)?, a.scalar(1)?);
                let (per_capita, burnt) = (a.scalar(2)?, a.scalar(3)?);
                Ok(population * burning * per_capita * burnt * 365.0 * 1e-3)
            }),
        FormulaSpec::builder(c, "6.12", "Organics in domestic wastewater")
            .expression("TOW = P * BOD * I * 365 * 1e-3")
            .scalar("P", "Population", "capita")
            .scalar("BOD", "Per capita BOD", "g/day")
            .scalar("I", "Correction for industrial discharge", "")
            .output("TOW", "Total organics in wastewater", "kg BOD/yr")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * a.scalar(2)? * 365.0 * 1e-3)),
        FormulaSpec::builder(c, "6.13", "Wastewater CH4 emission factor")
            .expression("EF = B0 * MCF")
            .scalar("B0", "Maximum CH4 producing capacity", "kg CH4/kg BOD")
            .scalar("MCF", "Methane correction factor", "")
            .output("EF", "Emission factor", "kg CH4/kg BOD")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)?)),
        FormulaSpec::builder(c, "6.14", "CH4 from wastewater treatment")
            .expression("E_CH4 = ((TOW - S) * EF - R) * 1e-3")
            .scalar("TOW", "Total organics in wastewater", "kg BOD")
            .scalar("S", "Organics removed as sludge", "kg BOD")
            .scalar("EF", "Emission factor", "kg CH4/kg BOD")
            .scalar("R", "CH4 recovered", "kg CH4")
            .output("E_CH4", "CH4 emissions", "t CH4")
            .related(&["6.12", "6.13"])
            .compute(|a| {
                let (organics, sludge) = (a.scalar(0)?, a.scalar(1)?);
                let (ef, recovered) = (a.scalar(2)?, a.scalar(3)?);
                Ok(((organics - sludge) * ef - recovered) * 1e-3)
            }),
        FormulaSpec::builder(c, "6.15", "N2O from wastewater effluent")
            .expression("E_N2O = N_eff * EF * 44/28 * 1e-3")
            .scalar("N_eff", "Nitrogen in effluent", "kg N")
            .scalar("EF", "Emission factor", "kg N2O-N/kg N")
            .output("E_N2O", "N2O emissions", "t N2O")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * N2O_PER_N * 1e-3)),
        FormulaSpec::builder(c, "6.16", "Half-life from the decay rate constant")
            .expression("t_1/2 = ln(2) / k")
            .scalar("k", "Decay rate constant", "1/yr")
            .output("t_1/2", "Half-life", "yr")
            .compute(|a| divide(LN_2, a.scalar(0)?, "decay rate constant")),
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
    fn test_decay_constant_and_half_life_are_inverse() {
        let k = find("6.1").evaluate(&Arguments::new(vec![Value::from(10.0)])).unwrap();
        assert_relative_eq!(k, LN_2 / 10.0);
        let half_life = find("6.16").evaluate(&Arguments::new(vec![Value::from(k)])).unwrap();
        assert_relative_eq!(half_life, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_half_life_is_an_error() {
        let err = find("6.1")
            .evaluate(&Arguments::new(vec![Value::from(0.0)]))
            .unwrap_err();
        assert_eq!(err, ArithmeticError::DivisionByZero("half-life"));
    }

    #[test]
    fn test_first_order_decay_conserves_carbon() {
        // What leaves the accumulated pool is exactly what decomposed.
        let (previous, k): (f64, f64) = (100.0, 0.1);
        let decomposed = find("6.3")
            .evaluate(&Arguments::new(vec![Value::from(previous), Value::from(k)]))
            .unwrap();
        let accumulated = find("6.4")
            .evaluate(&Arguments::new(vec![Value::from(0.0), Value::from(previous), Value::from(k)]))
            .unwrap();
        assert_relative_eq!(accumulated + decomposed, previous, epsilon = 1e-9);
    }
}
