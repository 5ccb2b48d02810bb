//! Python bindings for the formula registry and the dispatcher.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use ghgcalc_core::errors::GhgError;
use ghgcalc_core::formula::InputKind;
use ghgcalc_core::{Evaluation, FormulaDispatcher, FormulaSpec};
use ghgcalc_formulas::FORMULA_REGISTRY;

fn to_py_err(e: GhgError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Python view of a formula's metadata
#[pyclass]
#[pyo3(name = "Formula")]
#[derive(Debug, Clone)]
pub struct PyFormula(&'static FormulaSpec);

#[pymethods]
impl PyFormula {
    #[getter]
    fn id(&self) -> &'static str {
        self.0.id.as_str()
    }

    #[getter]
    fn title(&self) -> &'static str {
        self.0.title
    }

    #[getter]
    fn category(&self) -> &'static str {
        self.0.category.slug()
    }

    #[getter]
    fn expression(&self) -> &'static str {
        self.0.expression
    }

    /// Input labels in the order `Dispatcher.evaluate` expects them
    #[getter]
    fn inputs(&self) -> Vec<String> {
        self.0.inputs.iter().map(|i| i.label()).collect()
    }

    /// Allowed keys of each categorical input, empty for numeric inputs
    #[getter]
    fn choices(&self) -> Vec<Vec<&'static str>> {
        self.0
            .inputs
            .iter()
            .map(|i| match i.kind {
                InputKind::Categorical(table) => table.keys().collect(),
                _ => Vec::new(),
            })
            .collect()
    }

    #[getter]
    fn output_label(&self) -> String {
        self.0.output_label()
    }

    #[getter]
    fn related(&self) -> Vec<&'static str> {
        self.0.related.iter().map(|id| id.as_str()).collect()
    }

    fn __repr__(&self) -> String {
        format!("<Formula {}>", self.0)
    }
}

/// Result of a successful calculation
#[pyclass]
#[pyo3(name = "Evaluation")]
#[derive(Debug, Clone)]
pub struct PyEvaluation(Evaluation);

#[pymethods]
impl PyEvaluation {
    #[getter]
    fn value(&self) -> f64 {
        self.0.value
    }

    #[getter]
    fn formatted(&self) -> String {
        self.0.formatted.clone()
    }

    #[getter]
    fn output_label(&self) -> String {
        self.0.output_label.clone()
    }

    #[getter]
    fn index(&self) -> usize {
        self.0.index
    }

    fn __str__(&self) -> String {
        self.0.to_string()
    }
}

/// Evaluates formulas and keeps the session history
#[pyclass]
#[pyo3(name = "Dispatcher")]
pub struct PyDispatcher(FormulaDispatcher<'static>);

#[pymethods]
impl PyDispatcher {
    #[new]
    #[pyo3(signature = (precision=ghgcalc_core::settings::DEFAULT_PRECISION))]
    fn new(precision: usize) -> Self {
        Self(FormulaDispatcher::new(&FORMULA_REGISTRY).with_precision(precision))
    }

    fn evaluate(&mut self, formula_id: &str, inputs: Vec<String>) -> PyResult<PyEvaluation> {
        self.0
            .evaluate(formula_id, inputs.as_slice())
            .map(PyEvaluation)
            .map_err(to_py_err)
    }

    #[pyo3(signature = (expression, bindings=""))]
    fn evaluate_expression(&mut self, expression: &str, bindings: &str) -> PyResult<PyEvaluation> {
        self.0
            .evaluate_expression(expression, bindings)
            .map(PyEvaluation)
            .map_err(to_py_err)
    }

    #[getter]
    fn history(&self) -> Vec<f64> {
        self.0.history().values().to_vec()
    }

    fn export_csv(&self, path: &str) -> PyResult<()> {
        self.0.export_csv(path).map_err(to_py_err)
    }
}

/// `(slug, display name)` of every category
#[pyfunction]
fn categories() -> Vec<(&'static str, String)> {
    FORMULA_REGISTRY
        .list_categories()
        .iter()
        .map(|c| (c.slug(), c.to_string()))
        .collect()
}

#[pyfunction]
fn formulas(category: &str) -> PyResult<Vec<PyFormula>> {
    let formulas = FORMULA_REGISTRY.list_formulas(category).map_err(to_py_err)?;
    Ok(formulas.into_iter().map(PyFormula).collect())
}

#[pyfunction]
fn formula(formula_id: &str) -> PyResult<PyFormula> {
    FORMULA_REGISTRY
        .get(formula_id)
        .map(PyFormula)
        .map_err(to_py_err)
}

#[pymodule]
#[pyo3(name = "_lib")]
fn ghgcalc(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_class::<PyFormula>()?;
    m.add_class::<PyEvaluation>()?;
    m.add_class::<PyDispatcher>()?;
    m.add_function(wrap_pyfunction!(categories, m)?)?;
    m.add_function(wrap_pyfunction!(formulas, m)?)?;
    m.add_function(wrap_pyfunction!(formula, m)?)?;
    Ok(())
}
