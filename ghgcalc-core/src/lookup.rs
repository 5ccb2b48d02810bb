//! Constant lookup tables used to resolve categorical inputs.
//!
//! # Tables
//!
//! - Global warming potentials (100-year horizon) per gas
//! - CO2 emission factors per carbonate, in kg CO2 per tonne of carbonate
//! - CO2 density at reference conditions, in kg/m3
//! - Fuel properties (state, net calorific value, CO2 emission factor)
//!
//! A categorical key that is not in its table resolves to the table's default
//! entry (the most common substance) instead of failing. The fallback is logged.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::compute::FloatValue;

/// Net calorific value of one tonne of coal equivalent.
/// unit: TJ/t c.e.
pub const TJ_PER_TCE: FloatValue = 0.029_31;

/// CO2 per unit of carbon, as used by the solid/liquid fuel emission factor.
pub const CO2_PER_CARBON_FACTOR: FloatValue = 3.664;

/// Global warming potential of methane.
pub const GWP_CH4: FloatValue = 28.0;
/// Global warming potential of nitrous oxide.
pub const GWP_N2O: FloatValue = 265.0;

/// One row of a categorical lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LookupEntry {
    pub key: &'static str,
    pub value: FloatValue,
}

const fn entry(key: &'static str, value: FloatValue) -> LookupEntry {
    LookupEntry { key, value }
}

static GWP_FACTORS: &[LookupEntry] = &[
    entry("CO2", 1.0),
    entry("CH4", GWP_CH4),
    entry("N2O", GWP_N2O),
    entry("CHF3", 11_600.0),
    entry("CF4", 6_630.0),
    entry("C2F6", 11_100.0),
    entry("SF6", 23_500.0),
    entry("NF3", 16_100.0),
    entry("HFC-32", 677.0),
    entry("HFC-125", 3_170.0),
    entry("HFC-134a", 1_300.0),
    entry("HFC-143a", 4_800.0),
];

static CARBONATE_FACTORS: &[LookupEntry] = &[
    entry("CaCO3", 439.71),
    entry("MgCO3", 521.97),
    entry("CaMg(CO3)2", 477.32),
    entry("FeCO3", 379.87),
    entry("Ca(Fe,Mg,Mn)(CO3)2", 444.47),
    entry("MnCO3", 382.86),
    entry("Na2CO3", 414.92),
    entry("BaCO3", 223.02),
    entry("Li2CO3", 595.52),
    entry("K2CO3", 318.43),
    entry("SrCO3", 298.10),
];

static CO2_DENSITY: &[LookupEntry] = &[
    entry("0 °C, 101.325 kPa", 1.9768),
    entry("15 °C, 101.325 kPa", 1.8738),
    entry("20 °C, 101.325 kPa", 1.8393),
];

/// The categorical tables a form field can draw its choices from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookupTable {
    /// Global warming potential per gas, dimensionless.
    GlobalWarmingPotential,
    /// CO2 emission factor per carbonate, kg CO2/t.
    CarbonateEmissionFactor,
    /// CO2 density at reference conditions, kg/m3.
    Co2Density,
}

impl LookupTable {
    /// Rows of the table in declaration order.
    pub fn entries(self) -> &'static [LookupEntry] {
        match self {
            LookupTable::GlobalWarmingPotential => GWP_FACTORS,
            LookupTable::CarbonateEmissionFactor => CARBONATE_FACTORS,
            LookupTable::Co2Density => CO2_DENSITY,
        }
    }

    /// Key used when a selection is not found.
    ///
    /// CO2 for gases, calcium carbonate (limestone) for carbonates and 20 °C
    /// standard conditions for density.
    pub fn default_key(self) -> &'static str {
        match self {
            LookupTable::GlobalWarmingPotential => "CO2",
            LookupTable::CarbonateEmissionFactor => "CaCO3",
            LookupTable::Co2Density => "20 °C, 101.325 kPa",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            LookupTable::GlobalWarmingPotential => "dimensionless",
            LookupTable::CarbonateEmissionFactor => "kg CO2/t",
            LookupTable::Co2Density => "kg/m3",
        }
    }

    pub fn keys(self) -> impl Iterator<Item = &'static str> {
        self.entries().iter().map(|e| e.key)
    }

    /// Exact lookup without fallback.
    pub fn get(self, key: &str) -> Option<FloatValue> {
        let key = key.trim();
        self.entries().iter().find(|e| e.key == key).map(|e| e.value)
    }

    /// Value of the default entry.
    pub fn default_value(self) -> FloatValue {
        self.get(self.default_key())
            .unwrap_or_else(|| unreachable!("default key is part of its table"))
    }

    /// Lookup that falls back to the default entry on a miss.
    pub fn resolve(self, key: &str) -> FloatValue {
        match self.get(key) {
            Some(value) => value,
            None => {
                let default = self.default_key();
                warn!(
                    table = %self,
                    key = %key,
                    default = %default,
                    "Unknown categorical key; falling back to default"
                );
                self.default_value()
            }
        }
    }
}

impl fmt::Display for LookupTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupTable::GlobalWarmingPotential => write!(f, "GWP"),
            LookupTable::CarbonateEmissionFactor => write!(f, "carbonate EF"),
            LookupTable::Co2Density => write!(f, "CO2 density"),
        }
    }
}

/// Physical state of a fuel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelState {
    Solid,
    Liquid,
    Gas,
}

/// Reference properties for a fuel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FuelProperties {
    pub name: &'static str,
    pub state: FuelState,
    /// Net calorific value
    /// unit: TJ per thousand t (solid, liquid) or TJ per million m3 (gas)
    pub ncv: FloatValue,
    /// CO2 emission factor per unit of energy
    /// unit: t CO2/TJ
    pub ef_per_tj: FloatValue,
}

impl FuelProperties {
    /// Coal-equivalent coefficient, `NCV / 29.31`.
    pub fn coal_equivalent(&self) -> FloatValue {
        self.ncv / (TJ_PER_TCE * 1000.0)
    }

    /// Emission factor per tonne of coal equivalent, t CO2/t c.e.
    pub fn ef_per_tce(&self) -> FloatValue {
        self.ef_per_tj * TJ_PER_TCE
    }

    /// Carbon content per unit of energy, t C/TJ.
    pub fn carbon_per_tj(&self) -> FloatValue {
        self.ef_per_tj / CO2_PER_CARBON_FACTOR
    }

    /// Carbon content per tonne of coal equivalent, t C/t c.e.
    pub fn carbon_per_tce(&self) -> FloatValue {
        self.ef_per_tce() / CO2_PER_CARBON_FACTOR
    }

    /// Oxidation factor to use when no measured value is available.
    pub fn default_oxidation_factor(&self) -> FloatValue {
        match self.state {
            FuelState::Gas | FuelState::Liquid => 1.0,
            FuelState::Solid => 0.98,
        }
    }
}

const fn fuel(
    name: &'static str,
    state: FuelState,
    ncv: FloatValue,
    ef_per_tj: FloatValue,
) -> FuelProperties {
    FuelProperties {
        name,
        state,
        ncv,
        ef_per_tj,
    }
}

/// Fuel reference table.
pub static FUELS: &[FuelProperties] = &[
    fuel("Bituminous coal", FuelState::Solid, 25.8, 94.6),
    fuel("Anthracite", FuelState::Solid, 26.7, 98.3),
    fuel("Lignite", FuelState::Solid, 11.9, 101.0),
    fuel("Coke", FuelState::Solid, 28.2, 107.0),
    fuel("Peat", FuelState::Solid, 9.76, 106.0),
    fuel("Crude oil", FuelState::Liquid, 42.3, 73.3),
    fuel("Residual fuel oil", FuelState::Liquid, 40.4, 77.4),
    fuel("Diesel oil", FuelState::Liquid, 43.0, 74.1),
    fuel("Motor gasoline", FuelState::Liquid, 44.3, 69.3),
    fuel("Liquefied petroleum gas", FuelState::Liquid, 47.3, 63.1),
    fuel("Natural gas", FuelState::Gas, 33.8, 55.4),
    fuel("Associated petroleum gas", FuelState::Gas, 40.6, 57.6),
    fuel("Coke oven gas", FuelState::Gas, 16.6, 44.4),
];

/// Fuel properties by exact name.
pub fn find_fuel(name: &str) -> Option<&'static FuelProperties> {
    let name = name.trim();
    FUELS.iter().find(|f| f.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gwp_lookup() {
        assert_eq!(LookupTable::GlobalWarmingPotential.get("CH4"), Some(28.0));
        assert_eq!(LookupTable::GlobalWarmingPotential.get(" N2O "), Some(265.0));
        assert_eq!(LookupTable::GlobalWarmingPotential.get("XYZ"), None);
    }

    #[test]
    fn test_fallback_to_default() {
        assert_eq!(LookupTable::GlobalWarmingPotential.resolve("XYZ"), 1.0);
        assert_eq!(
            LookupTable::CarbonateEmissionFactor.resolve("unobtainium carbonate"),
            439.71
        );
        assert_eq!(LookupTable::Co2Density.resolve(""), 1.8393);
    }

    #[test]
    fn test_default_keys_are_in_tables() {
        for table in [
            LookupTable::GlobalWarmingPotential,
            LookupTable::CarbonateEmissionFactor,
            LookupTable::Co2Density,
        ] {
            assert!(table.keys().any(|k| k == table.default_key()));
        }
    }

    #[test]
    fn test_keys_unique() {
        for table in [
            LookupTable::GlobalWarmingPotential,
            LookupTable::CarbonateEmissionFactor,
            LookupTable::Co2Density,
        ] {
            let mut keys: Vec<_> = table.keys().collect();
            let n = keys.len();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), n, "duplicate key in {table}");
        }
    }

    #[test]
    fn test_fuel_derived_values() {
        let gas = find_fuel("Natural gas").unwrap();
        assert_eq!(gas.default_oxidation_factor(), 1.0);
        assert_relative_eq!(gas.coal_equivalent(), 33.8 / 29.31, epsilon = 1e-12);
        assert_relative_eq!(gas.ef_per_tce(), 55.4 * 0.02931, epsilon = 1e-12);
        assert_relative_eq!(gas.carbon_per_tj(), 55.4 / 3.664, epsilon = 1e-12);

        let coal = find_fuel("Bituminous coal").unwrap();
        assert_eq!(coal.default_oxidation_factor(), 0.98);
        assert!(find_fuel("Plutonium").is_none());
    }
}
