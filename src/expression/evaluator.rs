use super::ast::{Expression, Function, Value};
use super::{Environment, EvaluationError};

/// Walks a syntax tree against a variable environment.
pub fn evaluate(
    expression: &Expression,
    environment: &dyn Environment,
) -> Result<Value, EvaluationError> {
    let number = |e: &Expression| evaluate(e, environment).map(Value::as_number);
    let boolean = |e: &Expression| evaluate(e, environment).map(Value::as_bool);
    let value = match expression {
        Expression::Literal(value) => *value,
        Expression::Variable(name) => Value::Number(
            environment
                .variable(name)
                .ok_or_else(|| EvaluationError::UnknownVariable(name.clone()))?,
        ),
        Expression::Sum(a, b) => Value::Number(number(a)? + number(b)?),
        Expression::Subtract(a, b) => Value::Number(number(a)? - number(b)?),
        Expression::Multiply(a, b) => Value::Number(number(a)? * number(b)?),
        Expression::Divide(a, b) => {
            let divisor = number(b)?;
            if divisor == 0.0 {
                return Err(EvaluationError::DivisionByZero);
            }
            Value::Number(number(a)? / divisor)
        }
        Expression::Modulo(a, b) => {
            let divisor = number(b)?;
            if divisor == 0.0 {
                return Err(EvaluationError::DivisionByZero);
            }
            Value::Number(number(a)? % divisor)
        }
        Expression::Power(a, b) => Value::Number(number(a)?.powf(number(b)?)),
        Expression::Negate(a) => Value::Number(-number(a)?),
        Expression::Not(a) => Value::Bool(!boolean(a)?),
        // Short-circuit, so `x > 0 && y / x > 1` never divides by zero
        Expression::And(a, b) => Value::Bool(boolean(a)? && boolean(b)?),
        Expression::Or(a, b) => Value::Bool(boolean(a)? || boolean(b)?),
        Expression::Equal(a, b) => Value::Bool(number(a)? == number(b)?),
        Expression::NotEqual(a, b) => Value::Bool(number(a)? != number(b)?),
        Expression::GreaterThan(a, b) => Value::Bool(number(a)? > number(b)?),
        Expression::GreaterThanOrEqual(a, b) => Value::Bool(number(a)? >= number(b)?),
        Expression::SmallerThan(a, b) => Value::Bool(number(a)? < number(b)?),
        Expression::SmallerThanOrEqual(a, b) => Value::Bool(number(a)? <= number(b)?),
        Expression::Call {
            function,
            arguments,
        } => {
            let values = arguments
                .iter()
                .map(|argument| number(argument))
                .collect::<Result<Vec<f64>, EvaluationError>>()?;
            Value::Number(call(*function, &values)?)
        }
    };
    match value {
        Value::Number(n) if !n.is_finite() => Err(EvaluationError::NotFinite),
        _ => Ok(value),
    }
}

fn call(function: Function, values: &[f64]) -> Result<f64, EvaluationError> {
    let first = *values.first().ok_or(EvaluationError::MissingArgument)?;
    Ok(match function {
        Function::Min => values.iter().copied().fold(first, f64::min),
        Function::Max => values.iter().copied().fold(first, f64::max),
        Function::Abs => first.abs(),
        Function::Sqrt => first.sqrt(),
        Function::Exp => first.exp(),
        Function::Ln => first.ln(),
        Function::Floor => first.floor(),
        Function::Ceil => first.ceil(),
        Function::Round => first.round(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::super::parser::parse;
    use super::*;

    fn run(source: &str, variables: &[(&str, f64)]) -> Result<Value, EvaluationError> {
        let environment: HashMap<String, f64> = variables
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();
        evaluate(&parse(source).unwrap(), &environment)
    }

    #[test]
    fn arithmetic_matches_expectation() {
        assert_eq!(run("1 + 2 * 3", &[]).unwrap(), Value::Number(7.0));
        assert_eq!(run("-2^2", &[]).unwrap(), Value::Number(-4.0));
        assert_eq!(run("2^3^2", &[]).unwrap(), Value::Number(512.0));
        assert_eq!(run("7 % 4", &[]).unwrap(), Value::Number(3.0));
        assert_eq!(run("max(1, x, 3)", &[("x", 5.0)]).unwrap(), Value::Number(5.0));
        assert_eq!(run("round(2.5) + floor(1.9)", &[]).unwrap(), Value::Number(4.0));
    }

    #[test]
    fn comparisons_produce_booleans() {
        assert_eq!(run("x > 10", &[("x", 3.0)]).unwrap(), Value::Bool(false));
        assert_eq!(run("x > 2 && x < 4", &[("x", 3.0)]).unwrap(), Value::Bool(true));
        assert_eq!(run("!(x == 3) || false", &[("x", 3.0)]).unwrap(), Value::Bool(false));
    }

    #[test]
    fn failures_are_reported() {
        assert_eq!(
            run("y + 1", &[]).unwrap_err(),
            EvaluationError::UnknownVariable("y".to_string())
        );
        assert_eq!(run("1 / 0", &[]).unwrap_err(), EvaluationError::DivisionByZero);
        assert_eq!(run("sqrt(-1)", &[]).unwrap_err(), EvaluationError::NotFinite);
    }

    #[test]
    fn and_short_circuits() {
        assert_eq!(
            run("x > 0 && 1 / x > 1", &[("x", 0.0)]).unwrap(),
            Value::Bool(false)
        );
    }
}
