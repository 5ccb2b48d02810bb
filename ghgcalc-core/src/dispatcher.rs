//! Turns a formula selection and raw form fields into a recorded result.
//!
//! # Evaluation steps
//!
//! 1. Look up the formula (`UnknownFormula`)
//! 2. Check the number of fields against the declared inputs (`InputCountMismatch`).
//!    Formulas whose inputs are all lists also accept their values row by row.
//! 3. Parse each field according to its [`InputKind`] (`InvalidNumber`)
//! 4. Resolve categorical fields through the lookup tables
//! 5. Run the computation (`ComputationError`)
//! 6. Append the value to the [`ResultHistory`] and notify observers
//!
//! The history is only touched in step 6, so any failure leaves it unchanged.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::compute::{self, Arguments, FloatValue, Value};
use crate::errors::{GhgError, GhgResult};
use crate::expression::Expression;
use crate::formula::{Category, FormulaSpec, InputKind, InputSpec};
use crate::history::{HistoryObserver, ResultHistory};
use crate::lookup::LookupTable;
use crate::parse::{parse_bindings, parse_list, parse_scalar};
use crate::registry::FormulaRegistry;
use crate::settings::{Settings, DEFAULT_PRECISION};

/// Output label used for free-text expressions.
pub const EXPRESSION_OUTPUT_LABEL: &str = "Custom expression, t CO2-eq";

/// A successful calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Formula id such as `(1.1)`, or the expression text
    pub source: String,
    pub value: FloatValue,
    /// `value` rounded to the dispatcher's precision
    pub formatted: String,
    pub output_label: String,
    /// 1-based position of the value in the result history
    pub index: usize,
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.output_label, self.formatted)
    }
}

/// Owns the session history and evaluates formulas from a shared registry.
pub struct FormulaDispatcher<'r> {
    registry: &'r FormulaRegistry,
    history: ResultHistory,
    observers: Vec<Box<dyn HistoryObserver>>,
    precision: usize,
}

impl<'r> FormulaDispatcher<'r> {
    pub fn new(registry: &'r FormulaRegistry) -> Self {
        Self {
            registry,
            history: ResultHistory::new(),
            observers: Vec::new(),
            precision: DEFAULT_PRECISION,
        }
    }

    pub fn with_settings(registry: &'r FormulaRegistry, settings: &Settings) -> Self {
        Self::new(registry).with_precision(settings.precision)
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn registry(&self) -> &'r FormulaRegistry {
        self.registry
    }

    pub fn history(&self) -> &ResultHistory {
        &self.history
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Register a consumer that is handed the full history after every success.
    pub fn add_observer(&mut self, observer: Box<dyn HistoryObserver>) {
        self.observers.push(observer);
    }

    pub fn list_categories(&self) -> &'static [Category] {
        self.registry.list_categories()
    }

    pub fn list_formulas(&self, category: &str) -> GhgResult<Vec<&'r FormulaSpec>> {
        self.registry.list_formulas(category)
    }

    /// Inputs the form layer has to collect for a formula.
    pub fn input_specs(&self, formula_id: &str) -> GhgResult<&'r [InputSpec]> {
        Ok(&self.registry.get(formula_id)?.inputs)
    }

    /// Parse and resolve raw fields without computing anything.
    pub fn bind<S: AsRef<str>>(
        &self,
        formula_id: &str,
        raw_inputs: &[S],
    ) -> GhgResult<(&'r FormulaSpec, Arguments)> {
        let spec = self.registry.get(formula_id)?;
        let arity = spec.arity();

        let values: Vec<Value> = if raw_inputs.len() == arity {
            spec.inputs
                .iter()
                .zip(raw_inputs)
                .map(|(input, raw)| self.resolve_field(input, raw.as_ref()))
                .collect::<GhgResult<_>>()?
        } else if spec.is_row_variadic() && !raw_inputs.is_empty() && raw_inputs.len() % arity == 0
        {
            let mut lists = vec![Vec::with_capacity(raw_inputs.len() / arity); arity];
            for (i, raw) in raw_inputs.iter().enumerate() {
                let column = i % arity;
                let label = spec.inputs[column].label();
                lists[column].push(parse_scalar(&label, raw.as_ref())?);
            }
            lists.into_iter().map(Value::List).collect()
        } else {
            return Err(GhgError::InputCountMismatch {
                formula: spec.id.as_str().to_string(),
                expected: arity,
                actual: raw_inputs.len(),
            });
        };

        let lengths: Vec<usize> = values
            .iter()
            .filter_map(|v| match v {
                Value::List(list) => Some(list.len()),
                Value::Scalar(_) => None,
            })
            .collect();
        if lengths.windows(2).any(|w| w[0] != w[1]) {
            return Err(GhgError::MismatchedListLengths {
                formula: spec.id.as_str().to_string(),
                lengths,
            });
        }

        Ok((spec, Arguments::new(values)))
    }

    fn resolve_field(&self, input: &InputSpec, raw: &str) -> GhgResult<Value> {
        let value = match input.kind {
            InputKind::Scalar => Value::Scalar(parse_scalar(&input.label(), raw)?),
            InputKind::List => Value::List(parse_list(&input.label(), raw)?),
            InputKind::Categorical(LookupTable::GlobalWarmingPotential) => {
                Value::Scalar(self.registry.resolve_gas_factor(raw))
            }
            InputKind::Categorical(LookupTable::CarbonateEmissionFactor) => {
                Value::Scalar(self.registry.resolve_carbonate_factor(raw))
            }
            InputKind::Categorical(table) => Value::Scalar(self.registry.resolve(table, raw)),
        };
        Ok(value)
    }

    /// Evaluate a catalog formula and record the result.
    pub fn evaluate<S: AsRef<str>>(
        &mut self,
        formula_id: &str,
        raw_inputs: &[S],
    ) -> GhgResult<Evaluation> {
        let (spec, args) = self.bind(formula_id, raw_inputs)?;
        let value = spec
            .evaluate(&args)
            .and_then(compute::finite)
            .map_err(|cause| GhgError::Computation {
                formula: spec.id.as_str().to_string(),
                cause,
            })?;
        debug!(formula = %spec.id, value, "Evaluated formula");
        Ok(self.record(spec.id.to_string(), value, spec.output_label()))
    }

    /// Evaluate a free-text expression with `name = value` bindings and record the result.
    pub fn evaluate_expression(&mut self, expression: &str, bindings: &str) -> GhgResult<Evaluation> {
        let parsed = Expression::parse(expression)?;
        let bindings: HashMap<String, FloatValue> = parse_bindings(bindings)?.into_iter().collect();
        let value = parsed.evaluate(&bindings)?;
        debug!(expression = %parsed, value, "Evaluated expression");
        Ok(self.record(
            parsed.source().to_string(),
            value,
            EXPRESSION_OUTPUT_LABEL.to_string(),
        ))
    }

    /// Write the whole history to a CSV file.
    pub fn export_csv(&self, path: impl AsRef<Path>) -> GhgResult<()> {
        self.history.export_csv(path)
    }

    fn record(&mut self, source: String, value: FloatValue, output_label: String) -> Evaluation {
        self.history.push(value);
        let values = self.history.values();
        for observer in &mut self.observers {
            observer.history_changed(values);
        }
        Evaluation {
            source,
            value,
            formatted: format!("{:.*}", self.precision, value),
            output_label,
            index: self.history.len(),
        }
    }
}

impl fmt::Debug for FormulaDispatcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaDispatcher")
            .field("formulas", &self.registry.len())
            .field("history", &self.history)
            .field("observers", &self.observers.len())
            .field("precision", &self.precision)
            .finish()
    }
}
