use approx::assert_relative_eq;
use std::collections::HashSet;

use ghgcalc_core::compute::{Arguments, Value};
use ghgcalc_core::errors::GhgError;
use ghgcalc_core::formula::{Category, InputKind};
use ghgcalc_core::lookup::LookupTable;
use ghgcalc_core::registry::FormulaRegistry;
use ghgcalc_core::FormulaDispatcher;
use ghgcalc_formulas::{catalog, FORMULA_REGISTRY};

fn dispatcher() -> FormulaDispatcher<'static> {
    FormulaDispatcher::new(&FORMULA_REGISTRY)
}

#[test]
fn every_formula_reads_exactly_its_declared_inputs() {
    for spec in FORMULA_REGISTRY.iter() {
        let values = spec
            .inputs
            .iter()
            .enumerate()
            .map(|(i, input)| {
                let v = 2.0 + i as f64 * 0.5;
                match input.kind {
                    InputKind::List => Value::List(vec![v]),
                    _ => Value::Scalar(v),
                }
            })
            .collect();
        let args = Arguments::new(values);
        let result = spec.evaluate(&args);
        assert!(result.is_ok(), "{} failed on sample inputs: {:?}", spec.id, result);
        assert!(
            args.unused().is_empty(),
            "{} ignores inputs {:?}",
            spec.id,
            args.unused()
        );
    }
}

#[test]
fn every_formula_is_fully_described() {
    for spec in FORMULA_REGISTRY.iter() {
        assert!(!spec.title.is_empty(), "{}", spec.id);
        assert!(!spec.expression.is_empty(), "{} has no expression", spec.id);
        assert!(!spec.output.symbol.is_empty(), "{} has no output symbol", spec.id);
        assert!(spec.arity() > 0, "{}", spec.id);
    }
}

#[test]
fn ids_are_unique() {
    let formulas = catalog::formulas();
    let ids: HashSet<_> = formulas.iter().map(|f| f.id).collect();
    assert_eq!(ids.len(), formulas.len());
    assert!(FormulaRegistry::new(formulas).is_ok());
}

#[test]
fn every_category_has_formulas() {
    let dispatcher = dispatcher();
    assert_eq!(dispatcher.list_categories(), &Category::ALL);
    for category in Category::ALL {
        let formulas = dispatcher.list_formulas(category.slug()).unwrap();
        assert!(!formulas.is_empty(), "{category} is empty");
        assert!(formulas.iter().all(|f| f.category == category));
    }
    assert!(matches!(
        dispatcher.list_formulas("Space travel"),
        Err(GhgError::UnknownCategory(_))
    ));
}

#[test]
fn resource_consumption() {
    let mut dispatcher = dispatcher();
    let result = dispatcher.evaluate("0.1", &["100", "40", "10", "5"]).unwrap();
    assert_eq!(result.value, 65.0);
    assert_eq!(result.formatted, "65.0000");
}

#[test]
fn co2_equivalent_of_methane() {
    let mut dispatcher = dispatcher();
    let result = dispatcher.evaluate("(0.2)", &["10", "CH4"]).unwrap();
    assert_eq!(result.value, 280.0);
    assert_eq!(result.output_label, "Emission, t CO2-eq");
}

#[test]
fn decay_constant_of_zero_half_life_fails() {
    let mut dispatcher = dispatcher();
    let err = dispatcher.evaluate("6.1", &["0"]).unwrap_err();
    assert!(matches!(err, GhgError::Computation { .. }), "{err:?}");
    assert!(dispatcher.history().is_empty());

    let k = dispatcher.evaluate("6.1", &["10"]).unwrap();
    assert_relative_eq!(k.value, std::f64::consts::LN_2 / 10.0);
}

#[test]
fn ash_carbon_oxidation_factor_without_fuel_carbon_fails() {
    let mut dispatcher = dispatcher();
    let err = dispatcher.evaluate("1.9", &["5", "0"]).unwrap_err();
    assert!(matches!(err, GhgError::Computation { .. }), "{err:?}");
    assert_relative_eq!(
        dispatcher.evaluate("1.9", &["5", "100"]).unwrap().value,
        0.95,
        epsilon = 1e-12
    );
}

#[test]
fn aggregate_carbon_change() {
    let mut dispatcher = dispatcher();
    assert_eq!(dispatcher.evaluate("8.18", &["1", "2", "3"]).unwrap().value, 6.0);
    assert_eq!(dispatcher.evaluate("8.18", &["1 2 3"]).unwrap().value, 6.0);
}

#[test]
fn stationary_combustion_over_fuel_rows() {
    let mut dispatcher = dispatcher();
    let rows = ["100", "56.1", "1", "50", "94.6", "0,98"];
    let result = dispatcher.evaluate("1.1", &rows).unwrap();
    assert_relative_eq!(result.value, 100.0 * 56.1 + 50.0 * 94.6 * 0.98, epsilon = 1e-9);
}

#[test]
fn single_fuel_row_accepts_a_decimal_comma() {
    let mut dispatcher = dispatcher();
    let row = dispatcher.evaluate("1.1", &["10", "1,5", "1"]).unwrap().value;
    assert_eq!(row, 15.0);
    let rows = dispatcher
        .evaluate("1.1", &["10", "1,5", "1", "5", "2", "1"])
        .unwrap()
        .value;
    assert_eq!(rows, 25.0);
    assert_eq!(dispatcher.evaluate("8.18", &["1,5"]).unwrap().value, 1.5);
}

#[test]
fn only_fuel_sum_and_aggregate_take_rows() {
    let variadic: Vec<_> = FORMULA_REGISTRY
        .iter()
        .filter(|spec| spec.is_row_variadic())
        .map(|spec| spec.id.as_str())
        .collect();
    assert_eq!(variadic, vec!["1.1", "8.18"]);

    let mut dispatcher = dispatcher();
    let err = dispatcher
        .evaluate("4.10", &["1", "400", "1", "2", "500", "1"])
        .unwrap_err();
    assert!(matches!(
        err,
        GhgError::InputCountMismatch {
            expected: 3,
            actual: 6,
            ..
        }
    ));
    assert!(dispatcher.history().is_empty());
}

#[test]
fn family_semantics() {
    let mut dispatcher = dispatcher();
    let mut check = |id: &str, raw: &[&str], expected: f64| {
        let value = dispatcher.evaluate(id, raw).unwrap().value;
        assert_relative_eq!(value, expected, epsilon = 1e-9);
    };
    check("8.1", &["120", "100", "2"], 40.0);
    check("8.7", &["10", "20", "0.5", "1500"], 150.0);
    check("8.8", &["12", "1"], 44.0);
    check("8.9", &["28", "1"], 44.0);
    check("8.10", &["10", "0.5", "1", "3"], 20.0);
    check("4.1", &["1000", "MgCO3", "0.5"], 260.985);
    check("1.3", &["90; 10", "1; 2", "20 °C, 101.325 kPa"], 110.0 * 1.8393 * 1e-2);
    check("1.4", &["100", "1", "44.011", "0 °C, 101.325 kPa"], 1.9768);
    check("1.5", &["0.5"], 1.832);
    check("1.6", &["10", "1", "1"], 0.88);
    check("1.8", &["2"], 0.98);
}

#[test]
fn non_numeric_fields_are_rejected_without_touching_history() {
    let mut dispatcher = dispatcher();
    dispatcher.evaluate("0.1", &["1", "1", "1", "1"]).unwrap();
    let before = dispatcher.history().len();

    for spec in FORMULA_REGISTRY.iter() {
        for (position, input) in spec.inputs.iter().enumerate() {
            if matches!(input.kind, InputKind::Categorical(_)) {
                continue;
            }
            let raw: Vec<&str> = (0..spec.arity())
                .map(|i| if i == position { "abc" } else { "1" })
                .collect();
            match dispatcher.evaluate(spec.id.as_str(), &raw) {
                Err(GhgError::InvalidNumber { field, value }) => {
                    assert_eq!(field, input.label());
                    assert_eq!(value, "abc");
                }
                other => panic!("{} input {position}: {other:?}", spec.id),
            }
        }
    }
    assert_eq!(dispatcher.history().len(), before);
}

#[test]
fn decimal_comma_is_accepted() {
    let mut dispatcher = dispatcher();
    let comma = dispatcher.evaluate("0.3", &["1,5"]).unwrap().value;
    let point = dispatcher.evaluate("0.3", &["1.5"]).unwrap().value;
    assert_eq!(comma, point);
}

#[test]
fn unknown_carbonate_falls_back_to_calcite() {
    let mut dispatcher = dispatcher();
    let unknown = dispatcher.evaluate("4.1", &["1000", "Unobtainium", "1"]).unwrap();
    let calcite = dispatcher.evaluate("4.1", &["1000", "CaCO3", "1"]).unwrap();
    assert_eq!(unknown.value, calcite.value);
    assert_relative_eq!(
        unknown.value,
        LookupTable::CarbonateEmissionFactor.default_value(),
        epsilon = 1e-9
    );
}

#[test]
fn unknown_formula_is_a_selection_error() {
    let mut dispatcher = dispatcher();
    let err = dispatcher.evaluate("9.99", &["1"]).unwrap_err();
    assert!(err.is_selection_error());
}

#[test]
fn export_writes_history_in_order() {
    let mut dispatcher = dispatcher();
    dispatcher.evaluate("0.1", &["100", "40", "10", "5"]).unwrap();
    dispatcher.evaluate("0.2", &["10", "CH4"]).unwrap();
    dispatcher.evaluate("6.1", &["0"]).unwrap_err();
    dispatcher.evaluate("8.18", &["1", "2", "3"]).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");
    dispatcher.export_csv(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "Calculation #,Value (t CO2-eq)\n1,65\n2,280\n3,6\n"
    );
}

#[test]
fn expressions_share_the_history() {
    let mut dispatcher = dispatcher();
    dispatcher.evaluate("0.2", &["10", "CH4"]).unwrap();
    let result = dispatcher
        .evaluate_expression("E_CO2 + E_CH4 * 28", "E_CO2 = 100; E_CH4 = 0,5")
        .unwrap();
    assert_eq!(result.value, 114.0);
    assert_eq!(dispatcher.history().values(), &[280.0, 114.0]);
}

#[test]
fn formula_metadata_serializes_without_compute() {
    let spec = FORMULA_REGISTRY.get("1.1").unwrap();
    let json = serde_json::to_value(spec).unwrap();
    assert_eq!(json["id"], "1.1");
    assert_eq!(json["inputs"].as_array().unwrap().len(), 3);
    assert_eq!(json["related"][0], "1.2a");
    assert!(json.get("compute").is_none());
}
