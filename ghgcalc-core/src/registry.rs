//! Immutable formula catalog with lookup by category and identifier.
//!
//! The registry is built once from a list of [`FormulaSpec`]s and never
//! mutated afterwards. It owns no state beyond the catalog itself, so it can be
//! shared by reference (typically through a `static` `LazyLock`).

use std::collections::HashMap;

use crate::compute::FloatValue;
use crate::errors::{GhgError, GhgResult};
use crate::formula::{Category, FormulaSpec};
use crate::lookup::{find_fuel, FuelProperties, LookupTable, FUELS};

/// Registry of formula specifications.
#[derive(Debug)]
pub struct FormulaRegistry {
    /// Formulas in declaration order.
    formulas: Vec<FormulaSpec>,
    /// Map from formula id to position in `formulas`.
    index: HashMap<&'static str, usize>,
}

impl FormulaRegistry {
    /// Creates a registry, rejecting duplicate identifiers.
    pub fn new(formulas: Vec<FormulaSpec>) -> GhgResult<Self> {
        let mut index = HashMap::with_capacity(formulas.len());
        for (i, spec) in formulas.iter().enumerate() {
            if index.insert(spec.id.as_str(), i).is_some() {
                return Err(GhgError::DuplicateFormula(spec.id.as_str().to_string()));
            }
        }
        Ok(Self { formulas, index })
    }

    /// Categories in declaration order.
    pub fn list_categories(&self) -> &'static [Category] {
        &Category::ALL
    }

    /// Formulas of a category, in declaration order.
    ///
    /// `category` is resolved with [`Category::from_str`](std::str::FromStr), so
    /// slugs, names and section numbers are all accepted.
    pub fn list_formulas(&self, category: &str) -> GhgResult<Vec<&FormulaSpec>> {
        let category: Category = category.parse()?;
        Ok(self.formulas_in(category).collect())
    }

    /// Formulas of an already resolved category.
    pub fn formulas_in(&self, category: Category) -> impl Iterator<Item = &FormulaSpec> {
        self.formulas.iter().filter(move |f| f.category == category)
    }

    /// Formula by identifier.
    ///
    /// The identifier may be written with or without the surrounding
    /// parentheses used for display, e.g. `"1.9"` or `"(1.9)"`.
    pub fn get(&self, formula_id: &str) -> GhgResult<&FormulaSpec> {
        let key = normalize_id(formula_id);
        self.index
            .get(key)
            .map(|i| &self.formulas[*i])
            .ok_or_else(|| GhgError::UnknownFormula(formula_id.trim().to_string()))
    }

    pub fn contains(&self, formula_id: &str) -> bool {
        self.index.contains_key(normalize_id(formula_id))
    }

    /// Every formula in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FormulaSpec> {
        self.formulas.iter()
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    /// Global warming potential of a gas, CO2 (1.0) when unknown.
    pub fn resolve_gas_factor(&self, name: &str) -> FloatValue {
        LookupTable::GlobalWarmingPotential.resolve(name)
    }

    /// Emission factor of a carbonate in kg CO2/t, CaCO3 when unknown.
    pub fn resolve_carbonate_factor(&self, name: &str) -> FloatValue {
        LookupTable::CarbonateEmissionFactor.resolve(name)
    }

    /// Resolve a categorical selection through its table.
    pub fn resolve(&self, table: LookupTable, key: &str) -> FloatValue {
        table.resolve(key)
    }

    /// Reference properties of a fuel, if known.
    pub fn fuel(&self, name: &str) -> Option<&'static FuelProperties> {
        find_fuel(name)
    }

    pub fn fuels(&self) -> &'static [FuelProperties] {
        FUELS
    }
}

fn normalize_id(formula_id: &str) -> &str {
    let id = formula_id.trim();
    id.strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(id)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(category: Category, id: &'static str) -> FormulaSpec {
        FormulaSpec::builder(category, id, "Sum")
            .scalar("a", "a", "")
            .scalar("b", "b", "")
            .compute(|args| Ok(args.scalar(0)? + args.scalar(1)?))
    }

    fn registry() -> FormulaRegistry {
        FormulaRegistry::new(vec![
            sum(Category::General, "0.1"),
            sum(Category::Waste, "6.1"),
            sum(Category::General, "0.2"),
        ])
        .unwrap()
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = FormulaRegistry::new(vec![
            sum(Category::General, "1.9"),
            sum(Category::Waste, "1.9"),
        ]);
        assert!(matches!(result, Err(GhgError::DuplicateFormula(id)) if id == "1.9"));
    }

    #[test]
    fn test_get() {
        let registry = registry();
        assert_eq!(registry.get("6.1").unwrap().category, Category::Waste);
        assert_eq!(registry.get("(6.1)").unwrap().id.as_str(), "6.1");
        assert_eq!(registry.get(" 0.2 ").unwrap().id.as_str(), "0.2");
        assert!(matches!(
            registry.get("6"),
            Err(GhgError::UnknownFormula(id)) if id == "6"
        ));
        assert!(registry.contains("0.1"));
        assert!(!registry.contains("0.3"));
    }

    #[test]
    fn test_list_formulas_keeps_declaration_order() {
        let registry = registry();
        let ids: Vec<_> = registry
            .list_formulas("general")
            .unwrap()
            .iter()
            .map(|f| f.id.as_str())
            .collect();
        assert_eq!(ids, vec!["0.1", "0.2"]);
        assert!(registry.list_formulas("flaring").unwrap().is_empty());
        assert!(matches!(
            registry.list_formulas("nonsense"),
            Err(GhgError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_categories() {
        let registry = registry();
        assert_eq!(registry.list_categories().len(), 9);
        assert_eq!(registry.list_categories()[0], Category::General);
    }

    #[test]
    fn test_factor_resolution() {
        let registry = registry();
        assert_eq!(registry.resolve_gas_factor("SF6"), 23_500.0);
        assert_eq!(registry.resolve_gas_factor("unknown"), 1.0);
        assert_eq!(registry.resolve_carbonate_factor("MgCO3"), 521.97);
        assert_eq!(registry.resolve_carbonate_factor("chalk?"), 439.71);
        assert!(registry.fuel("Coke").is_some());
        assert!(!registry.fuels().is_empty());
    }
}
