//! Free-text algebraic expressions ("custom formula").
//!
//! # Grammar
//!
//! ```text
//! expr    = term (('+' | '-') term)*
//! term    = unary (('*' | '/') unary)*
//! unary   = ('-' | '+') unary | power
//! power   = primary (('^' | '**') unary)?
//! primary = number | name | name '(' expr ')' | '(' expr ')'
//! ```
//!
//! Functions: `ln`, `log` (natural), `log10`, `exp`, `sqrt`, `abs`.
//! Constants `pi` and `e` are available unless a binding shadows them.
//! Nesting (parentheses, function calls, unary signs and powers) is limited to
//! [`MAX_DEPTH`] levels.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;

use crate::compute::{self, ArithmeticError, FloatValue};

/// Deepest nesting accepted by the parser.
pub const MAX_DEPTH: usize = 128;

/// Error type for expression parsing and evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("empty expression")]
    Empty,
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("expression is nested more than {0} levels deep")]
    TooDeep(usize),
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Ln,
    Log10,
    Exp,
    Sqrt,
    Abs,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "ln" | "log" => Some(Function::Ln),
            "log10" => Some(Function::Log10),
            "exp" => Some(Function::Exp),
            "sqrt" => Some(Function::Sqrt),
            "abs" => Some(Function::Abs),
            _ => None,
        }
    }

    fn apply(self, x: FloatValue) -> Result<FloatValue, ArithmeticError> {
        match self {
            Function::Ln => compute::ln(x),
            Function::Log10 => Ok(compute::ln(x)? / std::f64::consts::LN_10),
            Function::Exp => Ok(x.exp()),
            Function::Sqrt => compute::sqrt(x),
            Function::Abs => Ok(x.abs()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    fn apply(self, a: FloatValue, b: FloatValue) -> Result<FloatValue, ArithmeticError> {
        Ok(match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => compute::divide(a, b, "divisor")?,
            BinaryOp::Pow => a.powf(b),
        })
    }
}

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(FloatValue),
    Variable(String),
    Neg(Box<Expr>),
    /// Left-associative run of operators of one precedence level, e.g. `a - b + c`.
    Chain(Box<Expr>, Vec<(BinaryOp, Expr)>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(Function, Box<Expr>),
}

impl Expr {
    fn eval(&self, bindings: &HashMap<String, FloatValue>) -> Result<FloatValue, ExpressionError> {
        let value = match self {
            Expr::Number(v) => *v,
            Expr::Variable(name) => match bindings.get(name) {
                Some(v) => *v,
                None => match name.as_str() {
                    "pi" => std::f64::consts::PI,
                    "e" => std::f64::consts::E,
                    _ => return Err(ExpressionError::UnknownVariable(name.clone())),
                },
            },
            Expr::Neg(inner) => -inner.eval(bindings)?,
            Expr::Chain(first, rest) => {
                let mut acc = first.eval(bindings)?;
                for (op, operand) in rest {
                    acc = compute::finite(op.apply(acc, operand.eval(bindings)?)?)?;
                }
                acc
            }
            Expr::Binary(op, lhs, rhs) => op.apply(lhs.eval(bindings)?, rhs.eval(bindings)?)?,
            Expr::Call(function, arg) => function.apply(arg.eval(bindings)?)?,
        };
        Ok(compute::finite(value)?)
    }

    fn collect_variables(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Number(_) => {}
            Expr::Variable(name) => {
                out.insert(name.clone());
            }
            Expr::Neg(inner) | Expr::Call(_, inner) => inner.collect_variables(out),
            Expr::Chain(first, rest) => {
                first.collect_variables(out);
                for (_, operand) in rest {
                    operand.collect_variables(out);
                }
            }
            Expr::Binary(_, lhs, rhs) => {
                lhs.collect_variables(out);
                rhs.collect_variables(out);
            }
        }
    }
}

/// A parsed expression together with its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: Expr,
}

impl Expression {
    pub fn parse(input: &str) -> Result<Self, ExpressionError> {
        let source = input.trim();
        if source.is_empty() {
            return Err(ExpressionError::Empty);
        }
        let mut parser = ExpressionParser::new(source);
        let root = parser.parse_expr()?;
        parser.skip_whitespace();
        if let Some(c) = parser.peek() {
            return Err(ExpressionError::UnexpectedChar(c, parser.pos));
        }
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Expr {
        &self.root
    }

    /// Names referenced by the expression, constants included.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.root.collect_variables(&mut out);
        out
    }

    pub fn evaluate(&self, bindings: &HashMap<String, FloatValue>) -> Result<FloatValue, ExpressionError> {
        self.root.eval(bindings)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

struct ExpressionParser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

fn chain(first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Expr {
    if rest.is_empty() {
        first
    } else {
        Expr::Chain(Box::new(first), rest)
    }
}

impl<'a> ExpressionParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, ExpressionError> {
        let first = self.parse_term()?;
        let mut rest = Vec::new();
        loop {
            self.skip_whitespace();
            let op = match self.peek() {
                Some('+') => BinaryOp::Add,
                Some('-') => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            rest.push((op, self.parse_term()?));
        }
        Ok(chain(first, rest))
    }

    fn parse_term(&mut self) -> Result<Expr, ExpressionError> {
        let first = self.parse_unary()?;
        let mut rest = Vec::new();
        loop {
            self.skip_whitespace();
            let op = match self.peek() {
                Some('*') if !self.rest().starts_with("**") => BinaryOp::Mul,
                Some('/') => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            rest.push((op, self.parse_unary()?));
        }
        Ok(chain(first, rest))
    }

    /// Every recursive path of the grammar passes through here, so this is
    /// where nesting is bounded.
    fn parse_unary(&mut self) -> Result<Expr, ExpressionError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExpressionError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let result = self.parse_signed();
        self.depth -= 1;
        result
    }

    fn parse_signed(&mut self) -> Result<Expr, ExpressionError> {
        self.skip_whitespace();
        match self.peek() {
            Some('-') => {
                self.advance();
                Ok(Expr::Neg(Box::new(self.parse_unary()?)))
            }
            Some('+') => {
                self.advance();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, ExpressionError> {
        let base = self.parse_primary()?;
        self.skip_whitespace();
        if self.rest().starts_with("**") {
            self.pos += 2;
        } else if self.peek() == Some('^') {
            self.advance();
        } else {
            return Ok(base);
        }
        let exponent = self.parse_unary()?;
        Ok(Expr::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)))
    }

    fn parse_primary(&mut self) -> Result<Expr, ExpressionError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(ExpressionError::UnexpectedEnd),
            Some('(') => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(')')?;
                Ok(inner)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(),
            Some(c) if c.is_alphabetic() || c == '_' => {
                let name = self.parse_name();
                self.skip_whitespace();
                if self.peek() == Some('(') {
                    let function = Function::from_name(&name)
                        .ok_or_else(|| ExpressionError::UnknownFunction(name.clone()))?;
                    self.advance();
                    let arg = self.parse_expr()?;
                    self.expect(')')?;
                    Ok(Expr::Call(function, Box::new(arg)))
                } else {
                    Ok(Expr::Variable(name))
                }
            }
            Some(c) => Err(ExpressionError::UnexpectedChar(c, self.pos)),
        }
    }

    fn parse_number(&mut self) -> Result<Expr, ExpressionError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                self.advance();
            } else {
                break;
            }
        }
        // Scientific notation: 1e-3, 2.5E6
        if matches!(self.peek(), Some('e' | 'E')) {
            let mark = self.pos;
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            if matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.advance();
                }
            } else {
                self.pos = mark;
            }
        }
        let text = &self.input[start..self.pos];
        text.parse()
            .map(Expr::Number)
            .map_err(|_| ExpressionError::InvalidNumber(text.to_string()))
    }

    fn parse_name(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn expect(&mut self, expected: char) -> Result<(), ExpressionError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(c) => Err(ExpressionError::UnexpectedChar(c, self.pos)),
            None => Err(ExpressionError::UnexpectedEnd),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn eval(expr: &str, bindings: &[(&str, FloatValue)]) -> Result<FloatValue, ExpressionError> {
        let bindings = bindings
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();
        Expression::parse(expr)?.evaluate(&bindings)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("1 + 2 * 3", &[]).unwrap(), 7.0);
        assert_eq!(eval("(1 + 2) * 3", &[]).unwrap(), 9.0);
        assert_eq!(eval("10 - 4 - 3", &[]).unwrap(), 3.0);
        assert_eq!(eval("8 / 4 / 2", &[]).unwrap(), 1.0);
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(eval("2 ^ 3 ^ 2", &[]).unwrap(), 512.0);
        assert_eq!(eval("2 ** 3", &[]).unwrap(), 8.0);
        assert_eq!(eval("-2 ^ 2", &[]).unwrap(), -4.0);
        assert_eq!(eval("2 ^ -1", &[]).unwrap(), 0.5);
    }

    #[test]
    fn test_variables_and_constants() {
        assert_eq!(eval("E * GWP", &[("E", 10.0), ("GWP", 28.0)]).unwrap(), 280.0);
        assert_relative_eq!(eval("2 * pi", &[]).unwrap(), 2.0 * std::f64::consts::PI);
        assert_eq!(eval("e", &[("e", 3.0)]).unwrap(), 3.0);
        assert_eq!(
            eval("x + 1", &[]),
            Err(ExpressionError::UnknownVariable("x".to_string()))
        );
    }

    #[test]
    fn test_functions() {
        assert_relative_eq!(eval("ln(2) / 10", &[]).unwrap(), 2f64.ln() / 10.0);
        assert_relative_eq!(eval("log10(1000)", &[]).unwrap(), 3.0, epsilon = 1e-12);
        assert_eq!(eval("sqrt(16) + abs(-1)", &[]).unwrap(), 5.0);
        assert_eq!(
            eval("foo(1)", &[]),
            Err(ExpressionError::UnknownFunction("foo".to_string()))
        );
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(eval("1e3 * 2", &[]).unwrap(), 2000.0);
        assert_eq!(eval("2.5E-1", &[]).unwrap(), 0.25);
    }

    #[test]
    fn test_arithmetic_errors() {
        assert_eq!(
            eval("1 / (a - a)", &[("a", 2.0)]),
            Err(ExpressionError::Arithmetic(ArithmeticError::DivisionByZero(
                "divisor"
            )))
        );
        assert!(matches!(
            eval("ln(0)", &[]),
            Err(ExpressionError::Arithmetic(
                ArithmeticError::NonPositiveLogarithm(_)
            ))
        ));
        assert_eq!(
            eval("(-8) ^ 0.5", &[]),
            Err(ExpressionError::Arithmetic(ArithmeticError::NonFinite))
        );
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(Expression::parse("   "), Err(ExpressionError::Empty));
        assert_eq!(Expression::parse("1 +"), Err(ExpressionError::UnexpectedEnd));
        assert_eq!(
            Expression::parse("(1 + 2"),
            Err(ExpressionError::UnexpectedEnd)
        );
        assert_eq!(
            Expression::parse("1 + 2)"),
            Err(ExpressionError::UnexpectedChar(')', 5))
        );
        assert_eq!(
            Expression::parse("1 $ 2"),
            Err(ExpressionError::UnexpectedChar('$', 2))
        );
        assert!(matches!(
            Expression::parse("1.2.3"),
            Err(ExpressionError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let nested = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(
            Expression::parse(&nested),
            Err(ExpressionError::TooDeep(MAX_DEPTH))
        );
        let signs = format!("{}1", "-".repeat(10_000));
        assert_eq!(
            Expression::parse(&signs),
            Err(ExpressionError::TooDeep(MAX_DEPTH))
        );
        let powers = format!("2{}", "^1".repeat(10_000));
        assert_eq!(
            Expression::parse(&powers),
            Err(ExpressionError::TooDeep(MAX_DEPTH))
        );

        let shallow = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(eval(&shallow, &[]).unwrap(), 1.0);
    }

    #[test]
    fn test_long_operator_runs() {
        let sum = vec!["1"; 100_000].join(" + ");
        assert_eq!(eval(&sum, &[]).unwrap(), 100_000.0);
        assert_eq!(eval("2 - 3 + 4 * 5 / 10", &[]).unwrap(), 1.0);
        let expr = Expression::parse("a - b - c").unwrap();
        assert!(matches!(expr.root(), Expr::Chain(_, rest) if rest.len() == 2));
    }

    #[test]
    fn test_variables_listing() {
        let expr = Expression::parse("a * b + ln(c) - a").unwrap();
        let names: Vec<_> = expr.variables().into_iter().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
