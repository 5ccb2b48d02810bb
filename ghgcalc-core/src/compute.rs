//! Arguments and arithmetic helpers for formula computations.
//!
//! Every catalog formula is a closed-form expression over positional
//! [`Arguments`]. The helpers in this module turn the partial operations
//! (division, logarithms, square roots) into [`ArithmeticError`]s instead of
//! letting `inf` or `NaN` leak out as a result.

use serde::Serialize;
use std::cell::Cell;
use thiserror::Error;

/// Floating point type used for every input and result.
pub type FloatValue = f64;

/// Ratio of the molar masses of CO2 and C.
pub const CO2_PER_C: FloatValue = 44.0 / 12.0;
/// Ratio of the molar masses of N2O and N2.
pub const N2O_PER_N: FloatValue = 44.0 / 28.0;
/// Ratio of the molar masses of CH4 and C.
pub const CH4_PER_C: FloatValue = 16.0 / 12.0;

/// Signature shared by all catalog computations.
pub type ComputeFn = fn(&Arguments) -> Result<FloatValue, ArithmeticError>;

/// Failure inside a formula computation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArithmeticError {
    #[error("division by zero: {0} is 0")]
    DivisionByZero(&'static str),
    #[error("logarithm of non-positive value {0}")]
    NonPositiveLogarithm(FloatValue),
    #[error("square root of negative value {0}")]
    NegativeSquareRoot(FloatValue),
    #[error("result is not a finite number")]
    NonFinite,
    #[error("argument {0} is missing")]
    MissingArgument(usize),
    #[error("argument {index} should be a {expected}")]
    WrongKind {
        index: usize,
        expected: &'static str,
    },
    #[error("parallel lists have different lengths {0:?}")]
    MismatchedLists(Vec<usize>),
}

/// A resolved input value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(FloatValue),
    List(Vec<FloatValue>),
}

impl From<FloatValue> for Value {
    fn from(value: FloatValue) -> Self {
        Value::Scalar(value)
    }
}

impl From<Vec<FloatValue>> for Value {
    fn from(value: Vec<FloatValue>) -> Self {
        Value::List(value)
    }
}

/// Ordered, type-resolved arguments passed to a [`ComputeFn`].
///
/// Access is tracked so the catalog tests can check that every declared input
/// is actually consumed by its computation.
#[derive(Debug)]
pub struct Arguments {
    values: Vec<Value>,
    used: Cell<u64>,
}

impl Arguments {
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values,
            used: Cell::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn get(&self, index: usize) -> Result<&Value, ArithmeticError> {
        let value = self
            .values
            .get(index)
            .ok_or(ArithmeticError::MissingArgument(index))?;
        if index < 64 {
            self.used.set(self.used.get() | (1 << index));
        }
        Ok(value)
    }

    /// Scalar argument at `index`.
    pub fn scalar(&self, index: usize) -> Result<FloatValue, ArithmeticError> {
        match self.get(index)? {
            Value::Scalar(v) => Ok(*v),
            Value::List(_) => Err(ArithmeticError::WrongKind {
                index,
                expected: "number",
            }),
        }
    }

    /// List argument at `index`. A scalar is viewed as a one-element list.
    pub fn list(&self, index: usize) -> Result<&[FloatValue], ArithmeticError> {
        match self.get(index)? {
            Value::Scalar(v) => Ok(std::slice::from_ref(v)),
            Value::List(values) => Ok(values),
        }
    }

    /// Several list arguments that must have the same length.
    pub fn parallel<const N: usize>(
        &self,
        indices: [usize; N],
    ) -> Result<[&[FloatValue]; N], ArithmeticError> {
        let empty: &[FloatValue] = &[];
        let mut lists = [empty; N];
        for (slot, index) in lists.iter_mut().zip(indices) {
            *slot = self.list(index)?;
        }
        let lengths: Vec<usize> = lists.iter().map(|l| l.len()).collect();
        if lengths.windows(2).any(|w| w[0] != w[1]) {
            return Err(ArithmeticError::MismatchedLists(lengths));
        }
        Ok(lists)
    }

    /// Positions that were never read by the computation.
    pub fn unused(&self) -> Vec<usize> {
        let used = self.used.get();
        (0..self.values.len())
            .filter(|i| *i >= 64 || used & (1 << i) == 0)
            .collect()
    }
}

/// `numerator / denominator`, failing when the denominator is zero.
pub fn divide(
    numerator: FloatValue,
    denominator: FloatValue,
    what: &'static str,
) -> Result<FloatValue, ArithmeticError> {
    if denominator == 0.0 {
        return Err(ArithmeticError::DivisionByZero(what));
    }
    Ok(numerator / denominator)
}

/// Natural logarithm, defined for positive values only.
pub fn ln(value: FloatValue) -> Result<FloatValue, ArithmeticError> {
    if value <= 0.0 {
        return Err(ArithmeticError::NonPositiveLogarithm(value));
    }
    Ok(value.ln())
}

/// Square root, defined for non-negative values only.
pub fn sqrt(value: FloatValue) -> Result<FloatValue, ArithmeticError> {
    if value < 0.0 {
        return Err(ArithmeticError::NegativeSquareRoot(value));
    }
    Ok(value.sqrt())
}

/// Sum of element-wise products of equally long slices.
pub fn sum_of_products(lists: &[&[FloatValue]]) -> FloatValue {
    let Some(first) = lists.first() else {
        return 0.0;
    };
    (0..first.len())
        .map(|i| lists.iter().map(|l| l[i]).product::<FloatValue>())
        .sum()
}

/// Rejects `inf` and `NaN` results.
pub fn finite(value: FloatValue) -> Result<FloatValue, ArithmeticError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ArithmeticError::NonFinite)
    }
}
