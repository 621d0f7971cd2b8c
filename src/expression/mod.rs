//! The expression module defines the seam to the calculator sub-language
//! used by station formulas: Chance rates, Condition predicates, priority
//! and cost formulas, and expression-based times.  Stations only hold
//! expression text; an `ExpressionEngine` checks and evaluates it.  The
//! default engine, `Calculator`, supports arithmetic, comparisons, boolean
//! connectives and a small set of numeric functions.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

pub mod ast;
pub mod evaluator;
pub mod parser;

pub use ast::{Expression, Function, Value};

/// A syntax error, positioned at the character where parsing failed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} at position {position}")]
pub struct ParseError {
    pub position: usize,
    pub message: String,
}

impl ParseError {
    pub fn new<M: Into<String>>(position: usize, message: M) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Errors that can occur while evaluating a well-formed expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("Variable '{0}' is not defined in the environment")]
    UnknownVariable(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("The result is not a finite number")]
    NotFinite,

    #[error("A function was called without arguments")]
    MissingArgument,

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Named numeric variables an expression can reference.
pub trait Environment {
    fn variable(&self, name: &str) -> Option<f64>;
}

impl Environment for HashMap<String, f64> {
    fn variable(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl Environment for BTreeMap<String, f64> {
    fn variable(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

/// An environment without variables, for constant folding.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyEnvironment;

impl Environment for EmptyEnvironment {
    fn variable(&self, _name: &str) -> Option<f64> {
        None
    }
}

/// The calculator sub-language as seen by station configuration.
pub trait ExpressionEngine {
    /// Parse-checks an expression without evaluating it.
    fn check(&self, expression: &str) -> Result<(), ParseError>;

    fn evaluate(
        &self,
        expression: &str,
        environment: &dyn Environment,
    ) -> Result<Value, EvaluationError>;

    /// The value of an expression that references no variables, or `None`
    /// when it depends on the environment or fails to evaluate.
    fn constant_value(&self, expression: &str) -> Option<f64> {
        self.evaluate(expression, &EmptyEnvironment)
            .ok()
            .map(Value::as_number)
    }

    fn evaluate_number(
        &self,
        expression: &str,
        environment: &dyn Environment,
    ) -> Result<f64, EvaluationError> {
        self.evaluate(expression, environment).map(Value::as_number)
    }

    fn evaluate_condition(
        &self,
        expression: &str,
        environment: &dyn Environment,
    ) -> Result<bool, EvaluationError> {
        self.evaluate(expression, environment).map(Value::as_bool)
    }
}

/// The default expression engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Calculator;

impl ExpressionEngine for Calculator {
    fn check(&self, expression: &str) -> Result<(), ParseError> {
        parser::parse(expression).map(|_| ())
    }

    fn evaluate(
        &self,
        expression: &str,
        environment: &dyn Environment,
    ) -> Result<Value, EvaluationError> {
        let tree = parser::parse(expression)?;
        evaluator::evaluate(&tree, environment)
    }

    fn constant_value(&self, expression: &str) -> Option<f64> {
        let tree = parser::parse(expression).ok()?;
        if !tree.is_constant() {
            return None;
        }
        evaluator::evaluate(&tree, &EmptyEnvironment)
            .ok()
            .map(Value::as_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculator_checks_and_evaluates() {
        let calculator = Calculator;
        assert!(calculator.check("w*2 + 1").is_ok());
        assert_eq!(calculator.check("w*").unwrap_err().position, 2);
        let mut environment = HashMap::new();
        environment.insert("w".to_string(), 4.0);
        assert_eq!(
            calculator.evaluate_number("w*2 + 1", &environment).unwrap(),
            9.0
        );
        assert!(calculator.evaluate_condition("w >= 4", &environment).unwrap());
    }

    #[test]
    fn constant_values_exclude_variables() {
        let calculator = Calculator;
        assert_eq!(calculator.constant_value("2*3"), Some(6.0));
        assert_eq!(calculator.constant_value("0"), Some(0.0));
        assert_eq!(calculator.constant_value("x"), None);
        assert_eq!(calculator.constant_value("1/"), None);
    }
}
