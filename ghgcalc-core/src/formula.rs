//! Formula metadata: categories, identifiers and input specifications.
//!
//! A [`FormulaSpec`] couples the human-readable description of a formula with
//! the ordered list of inputs it needs and the pure function computing it.
//! Identifiers are stable codes (`"1.9"`, `"6.1"`) that are independent of any
//! display text, so two formulas can never be confused by a shared substring.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::compute::{Arguments, ArithmeticError, ComputeFn, FloatValue};
use crate::errors::GhgError;
use crate::lookup::LookupTable;

/// Fixed set of formula groups, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    General,
    StationaryCombustion,
    Flaring,
    Fugitive,
    Minerals,
    ChemicalsAndMetals,
    Waste,
    Agriculture,
    LandUse,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 9] = [
        Category::General,
        Category::StationaryCombustion,
        Category::Flaring,
        Category::Fugitive,
        Category::Minerals,
        Category::ChemicalsAndMetals,
        Category::Waste,
        Category::Agriculture,
        Category::LandUse,
    ];

    /// Section number, also the prefix of every formula id in the category.
    pub fn number(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::General => "General conversions",
            Category::StationaryCombustion => "Stationary fuel combustion",
            Category::Flaring => "Flaring",
            Category::Fugitive => "Fugitive emissions",
            Category::Minerals => "Mineral industry",
            Category::ChemicalsAndMetals => "Chemical and metallurgical industry",
            Category::Waste => "Waste",
            Category::Agriculture => "Agriculture and agricultural soils",
            Category::LandUse => "Land use and forestry",
        }
    }

    /// Short machine-friendly name used on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::StationaryCombustion => "stationary-combustion",
            Category::Flaring => "flaring",
            Category::Fugitive => "fugitive",
            Category::Minerals => "minerals",
            Category::ChemicalsAndMetals => "chemicals-metals",
            Category::Waste => "waste",
            Category::Agriculture => "agriculture",
            Category::LandUse => "land-use",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.name())
    }
}

impl FromStr for Category {
    type Err = GhgError;

    /// Accepts the slug, the display name (case-insensitive), the section
    /// number or the full `"N. Name"` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| {
                c.slug().eq_ignore_ascii_case(needle)
                    || c.name().eq_ignore_ascii_case(needle)
                    || c.number().to_string() == needle
                    || c.to_string().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| GhgError::UnknownCategory(needle.to_string()))
    }
}

/// Stable, globally unique formula identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FormulaId(&'static str);

impl FormulaId {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FormulaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0)
    }
}

/// How a raw form field is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InputKind {
    /// A single number.
    Scalar,
    /// A variable-length list of numbers.
    List,
    /// A key into one of the constant lookup tables.
    Categorical(LookupTable),
}

/// One formula parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputSpec {
    /// Symbol used in the formula text (e.g. `FC_j`)
    pub symbol: &'static str,
    /// What the value means
    pub name: &'static str,
    pub unit: &'static str,
    pub kind: InputKind,
}

impl InputSpec {
    pub const fn scalar(symbol: &'static str, name: &'static str, unit: &'static str) -> Self {
        Self {
            symbol,
            name,
            unit,
            kind: InputKind::Scalar,
        }
    }

    pub const fn list(symbol: &'static str, name: &'static str, unit: &'static str) -> Self {
        Self {
            symbol,
            name,
            unit,
            kind: InputKind::List,
        }
    }

    pub const fn categorical(
        symbol: &'static str,
        name: &'static str,
        table: LookupTable,
    ) -> Self {
        Self {
            symbol,
            name,
            unit: "",
            kind: InputKind::Categorical(table),
        }
    }

    /// Display name plus unit.
    pub fn label(&self) -> String {
        match self.kind {
            InputKind::Categorical(table) => format!("{} ({})", self.name, table),
            _ if self.unit.is_empty() => self.name.to_string(),
            _ => format!("{}, {}", self.name, self.unit),
        }
    }
}

/// Description of the computed quantity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSpec {
    pub symbol: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
}

/// One entry of the formula catalog.
#[derive(Clone, Serialize)]
pub struct FormulaSpec {
    pub id: FormulaId,
    pub category: Category,
    pub title: &'static str,
    pub description: &'static str,
    /// The formula written out with the input symbols
    pub expression: &'static str,
    pub inputs: Vec<InputSpec>,
    pub output: OutputSpec,
    /// Formulas that compute one of this formula's inputs
    pub related: Vec<FormulaId>,
    /// Accepts any whole number of rows instead of exactly one field per input
    pub variadic: bool,
    #[serde(skip)]
    pub compute: ComputeFn,
}

impl FormulaSpec {
    /// Start describing a formula.
    pub fn builder(category: Category, id: &'static str, title: &'static str) -> FormulaBuilder {
        FormulaBuilder {
            id: FormulaId::new(id),
            category,
            title,
            description: "",
            expression: "",
            inputs: Vec::new(),
            output: OutputSpec {
                symbol: "",
                name: title,
                unit: "",
            },
            related: Vec::new(),
            variadic: false,
        }
    }

    /// Description of the computed quantity and its unit.
    pub fn output_label(&self) -> String {
        if self.output.unit.is_empty() {
            self.output.name.to_string()
        } else {
            format!("{}, {}", self.output.name, self.output.unit)
        }
    }

    pub fn arity(&self) -> usize {
        self.inputs.len()
    }

    /// Whether the form layer may submit the values row by row (one field per
    /// list per row). Only formulas marked [`FormulaBuilder::variadic`] whose
    /// inputs are all lists qualify.
    pub fn is_row_variadic(&self) -> bool {
        self.variadic
            && !self.inputs.is_empty()
            && self.inputs.iter().all(|i| i.kind == InputKind::List)
    }

    /// Run the computation on already resolved arguments.
    pub fn evaluate(&self, args: &Arguments) -> Result<FloatValue, ArithmeticError> {
        (self.compute)(args)
    }
}

impl fmt::Debug for FormulaSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaSpec")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("title", &self.title)
            .field("inputs", &self.inputs)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for FormulaSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.id, self.title)
    }
}

/// Builder returned by [`FormulaSpec::builder`]; finished by [`FormulaBuilder::compute`].
#[must_use]
pub struct FormulaBuilder {
    id: FormulaId,
    category: Category,
    title: &'static str,
    description: &'static str,
    expression: &'static str,
    inputs: Vec<InputSpec>,
    output: OutputSpec,
    related: Vec<FormulaId>,
    variadic: bool,
}

impl FormulaBuilder {
    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn expression(mut self, expression: &'static str) -> Self {
        self.expression = expression;
        self
    }

    pub fn input(mut self, input: InputSpec) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn scalar(self, symbol: &'static str, name: &'static str, unit: &'static str) -> Self {
        self.input(InputSpec::scalar(symbol, name, unit))
    }

    pub fn list(self, symbol: &'static str, name: &'static str, unit: &'static str) -> Self {
        self.input(InputSpec::list(symbol, name, unit))
    }

    pub fn categorical(self, symbol: &'static str, name: &'static str, table: LookupTable) -> Self {
        self.input(InputSpec::categorical(symbol, name, table))
    }

    pub fn output(mut self, symbol: &'static str, name: &'static str, unit: &'static str) -> Self {
        self.output = OutputSpec { symbol, name, unit };
        self
    }

    pub fn related(mut self, ids: &[&'static str]) -> Self {
        self.related = ids.iter().copied().map(FormulaId::new).collect();
        self
    }

    /// Let the list inputs be entered as a variable number of rows.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn compute(self, compute: ComputeFn) -> FormulaSpec {
        FormulaSpec {
            id: self.id,
            category: self.category,
            title: self.title,
            description: self.description,
            expression: self.expression,
            inputs: self.inputs,
            output: self.output,
            related: self.related,
            variadic: self.variadic,
            compute,
        }
    }
}
