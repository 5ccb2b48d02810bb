//! Land use, land-use change and forestry.
//!
//! Stock changes are in tonnes of carbon; a positive change is a removal from
//! the atmosphere.

use std::f64::consts::LN_2;

use ghgcalc_core::compute::{divide, CO2_PER_C, N2O_PER_N};
use ghgcalc_core::formula::{Category, FormulaSpec};

pub(crate) fn formulas() -> Vec<FormulaSpec> {
    let c = Category::LandUse;
    vec![
        FormulaSpec::builder(c, "8.1", "Change in biomass carbon stock")
            .describe("Stock difference method")
            .expression("dC = (C_t2 - C_t1) * A")
            .scalar("C_t2", "Carbon stock after", "t C/ha")
            .scalar("C_t1", "Carbon stock before", "t C/ha")
            .scalar("A", "Area", "ha")
            .output("dC", "Carbon stock change", "t C")
            .compute(|a| {
                let (after, before, area) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                Ok((after - before) * area)
            }),
        FormulaSpec::builder(c, "8.2", "Change in biomass carbon stock (gain-loss)")
            .expression("dC = dC_G - dC_L")
            .scalar("dC_G", "Carbon gain", "t C")
            .scalar("dC_L", "Carbon loss", "t C")
            .output("dC", "Carbon stock change", "t C")
            .related(&["8.3", "8.5", "8.6"])
            .compute(|a| Ok(a.scalar(0)? - a.scalar(1)?)),
        FormulaSpec::builder(c, "8.3", "Carbon gain from biomass growth")
            .expression("dC_G = A * G_total * CF")
            .scalar("A", "Area", "ha")
            .scalar("G_total", "Total biomass growth", "t d.m./ha/yr")
            .scalar("CF", "Carbon fraction of dry matter", "t C/t d.m.")
            .output("dC_G", "Carbon gain", "t C")
            .related(&["8.4"])
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * a.scalar(2)?)),
        FormulaSpec::builder(c, "8.4", "Total biomass growth including roots")
            .expression("G_total = G_W * (1 + R)")
            .scalar("G_W", "Above-ground biomass growth", "t d.m./ha/yr")
            .scalar("R", "Root-to-shoot ratio", "")
            .output("G_total", "Total biomass growth", "t d.m./ha/yr")
            .compute(|a| Ok(a.scalar(0)? * (1.0 + a.scalar(1)?))),
        FormulaSpec::builder(c, "8.5", "Carbon loss from wood removals")
            .expression("L = H * BCEF * (1 + R) * CF")
            .scalar("H", "Wood removed", "m3")
            .scalar("BCEF", "Biomass conversion and expansion factor", "t d.m./m3")
            .scalar("R", "Root-to-shoot ratio", "")
            .scalar("CF", "Carbon fraction of dry matter", "t C/t d.m.")
            .output("L", "Carbon loss", "t C")
            .compute(|a| {
                let (removed, bcef) = (a.scalar(0)?, a.scalar(1)?);
                let (roots, carbon) = (a.scalar(2)?, a.scalar(3)?);
                Ok(removed * bcef * (1.0 + roots) * carbon)
            }),
        FormulaSpec::builder(c, "8.6", "Carbon loss from disturbances")
            .expression("L = A * B_W * (1 + R) * CF * fd")
            .scalar("A", "Area affected", "ha")
            .scalar("B_W", "Above-ground biomass", "t d.m./ha")
            .scalar("R", "Root-to-shoot ratio", "")
            .scalar("CF", "Carbon fraction of dry matter", "t C/t d.m.")
            .scalar("fd", "Fraction of biomass lost", "")
            .output("L", "Carbon loss", "t C")
            .compute(|a| {
                let (area, biomass, roots) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                let (carbon, lost) = (a.scalar(3)?, a.scalar(4)?);
                Ok(area * biomass * (1.0 + roots) * carbon * lost)
            }),
        FormulaSpec::builder(c, "8.7", "Emissions from fire")
            .expression("E = A * M_B * C_f * G_ef * 1e-3")
            .scalar("A", "Area burnt", "ha")
            .scalar("M_B", "Mass of fuel available", "t d.m./ha")
            .scalar("C_f", "Combustion factor", "")
            .scalar("G_ef", "Emission factor", "g/kg d.m.")
            .output("E", "Emissions", "t")
            .compute(|a| {
                let (area, mass) = (a.scalar(0)?, a.scalar(1)?);
                let (combustion, ef) = (a.scalar(2)?, a.scalar(3)?);
                Ok(area * mass * combustion * ef * 1e-3)
            }),
        FormulaSpec::builder(c, "8.8", "CO2 from drained organic soils")
            .expression("E_CO2 = A * EF * 44/12")
            .scalar("A", "Drained area", "ha")
            .scalar("EF", "Emission factor", "t C/ha/yr")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * CO2_PER_C)),
        FormulaSpec::builder(c, "8.9", "N2O from drained organic soils")
            .expression("E_N2O = A * EF * 44/28")
            .scalar("A", "Drained area", "ha")
            .scalar("EF", "Emission factor", "t N2O-N/ha/yr")
            .output("E_N2O", "N2O emissions", "t N2O")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * N2O_PER_N)),
        FormulaSpec::builder(c, "8.10", "CH4 from drained organic soils")
            .describe("Separate factors for the drained land and for the ditches")
            .expression("E_CH4 = A * (1 - Frac_ditch) * EF_land + A * Frac_ditch * EF_ditch")
            .scalar("A", "Drained area", "ha")
            .scalar("Frac_ditch", "Fraction of the area covered by ditches", "")
            .scalar("EF_land", "Emission factor of the drained land", "t CH4/ha/yr")
            .scalar("EF_ditch", "Emission factor of the ditches", "t CH4/ha/yr")
            .output("E_CH4", "CH4 emissions", "t CH4")
            .compute(|a| {
                let (area, ditch) = (a.scalar(0)?, a.scalar(1)?);
                let (land_ef, ditch_ef) = (a.scalar(2)?, a.scalar(3)?);
                Ok(area * (1.0 - ditch) * land_ef + area * ditch * ditch_ef)
            }),
        FormulaSpec::builder(c, "8.11", "Soil organic carbon stock")
            .expression("SOC = SOC_ref * F_LU * F_MG * F_I * A")
            .scalar("SOC_ref", "Reference carbon stock", "t C/ha")
            .scalar("F_LU", "Land use factor", "")
            .scalar("F_MG", "Management factor", "")
            .scalar("F_I", "Input factor", "")
            .scalar("A", "Area", "ha")
            .output("SOC", "Soil organic carbon", "t C")
            .compute(|a| {
                let (reference, land_use) = (a.scalar(0)?, a.scalar(1)?);
                let (management, input, area) = (a.scalar(2)?, a.scalar(3)?, a.scalar(4)?);
                Ok(reference * land_use * management * input * area)
            }),
        FormulaSpec::builder(c, "8.12", "Annual change in soil organic carbon")
            .expression("dC = (SOC_0 - SOC_0-T) / D")
            .scalar("SOC_0", "Carbon stock in the inventory year", "t C")
            .scalar("SOC_0-T", "Carbon stock T years earlier", "t C")
            .scalar("D", "Transition period", "yr")
            .output("dC", "Carbon stock change", "t C/yr")
            .related(&["8.11"])
            .compute(|a| {
                let (current, earlier, period) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                divide(current - earlier, period, "transition period")
            }),
        FormulaSpec::builder(c, "8.13", "Change in dead organic matter")
            .expression("dC = A * (DOM_t2 - DOM_t1) / (t2 - t1)")
            .scalar("A", "Area", "ha")
            .scalar("DOM_t2", "Dead organic matter stock at t2", "t C/ha")
            .scalar("DOM_t1", "Dead organic matter stock at t1", "t C/ha")
            .scalar("t2", "Second inventory year", "yr")
            .scalar("t1", "First inventory year", "yr")
            .output("dC", "Carbon stock change", "t C/yr")
            .compute(|a| {
                let (area, later, earlier) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                let (t2, t1) = (a.scalar(3)?, a.scalar(4)?);
                Ok(area * divide(later - earlier, t2 - t1, "inventory interval")?)
            }),
        FormulaSpec::builder(c, "8.14", "CO2 emission from a carbon stock change")
            .expression("E_CO2 = -dC * 44/12")
            .scalar("dC", "Carbon stock change", "t C")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| Ok(-a.scalar(0)? * CO2_PER_C)),
        FormulaSpec::builder(c, "8.15", "Carbon change from land conversion")
            .expression("dC = (B_after - B_before) * dA * CF")
            .scalar("B_after", "Biomass after conversion", "t d.m./ha")
            .scalar("B_before", "Biomass before conversion", "t d.m./ha")
            .scalar("dA", "Area converted", "ha")
            .scalar("CF", "Carbon fraction of dry matter", "t C/t d.m.")
            .output("dC", "Carbon stock change", "t C")
            .compute(|a| {
                let (after, before) = (a.scalar(0)?, a.scalar(1)?);
                let (area, carbon) = (a.scalar(2)?, a.scalar(3)?);
                Ok((after - before) * area * carbon)
            }),
        FormulaSpec::builder(c, "8.16", "Carbon in harvested wood products")
            .describe("First order decay of the product pool over one year")
            .expression("C_i+1 = exp(-k) * C_i + (1 - exp(-k)) / k * Inflow, k = ln(2) / HL")
            .scalar("C_i", "Carbon in the pool at the start of the year", "t C")
            .scalar("Inflow", "Carbon entering the pool", "t C/yr")
            .scalar("HL", "Half-life of the product", "yr")
            .output("C_i+1", "Carbon in the pool", "t C")
            .compute(|a| {
                let (stock, inflow, half_life) = (a.scalar(0)?, a.scalar(1)?, a.scalar(2)?);
                let k = divide(LN_2, half_life, "half-life")?;
                let retained = (-k).exp();
                Ok(retained * stock + divide(1.0 - retained, k, "decay rate constant")? * inflow)
            }),
        FormulaSpec::builder(c, "8.17", "CO2 from extracted peat")
            .expression("E_CO2 = W * C_frac * 44/12")
            .scalar("W", "Air-dry peat extracted", "t")
            .scalar("C_frac", "Carbon fraction of air-dry peat", "t C/t")
            .output("E_CO2", "CO2 emissions", "t CO2")
            .compute(|a| Ok(a.scalar(0)? * a.scalar(1)? * CO2_PER_C)),
        FormulaSpec::builder(c, "8.18", "Total carbon stock change")
            .describe("Sum of the changes of every pool and land category")
            .expression("dC = sum_i(dC_i)")
            .list("dC_i", "Carbon stock change", "t C")
            .variadic()
            .output("dC", "Carbon stock change", "t C")
            .related(&["8.1", "8.2", "8.12", "8.13", "8.15"])
            .compute(|a| Ok(a.list(0)?.iter().sum())),
    ]
}
