//! STRING semantics.

use crate::builtin::{invalid_operands, unsupported_operator};
use crate::domain::DomainType;
use crate::error::EvaluationResult;
use crate::expression::{ComparisonOperator, DomainOperator};
use crate::spi::{ArithmeticInterpreter, ComparisonInterpreter};
use crate::value::Value;

/// Lexicographic comparison of strings and `+` as concatenation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringOperatorHandler;

/// Text form used by concatenation: strings without quotes, everything else
/// in its display form.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl ComparisonInterpreter for StringOperatorHandler {
    fn interpret(
        &self,
        _left_type: &DomainType,
        _right_type: &DomainType,
        left: &Value,
        right: &Value,
        operator: ComparisonOperator,
    ) -> EvaluationResult<Option<bool>> {
        match (left, right) {
            (Value::String(l), Value::String(r)) => Ok(Some(operator.test(l.cmp(r)))),
            _ => Err(invalid_operands(operator, left, right)),
        }
    }
}

impl ArithmeticInterpreter for StringOperatorHandler {
    fn interpret(
        &self,
        target_type: &DomainType,
        _left_type: &DomainType,
        _right_type: &DomainType,
        left: &Value,
        right: &Value,
        operator: DomainOperator,
    ) -> EvaluationResult<Value> {
        match operator {
            DomainOperator::Plus => Ok(Value::String(text(left) + &text(right))),
            _ => Err(unsupported_operator(operator, target_type)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvaluationError;

    #[test]
    fn test_string_comparison() {
        let string = DomainType::basic("STRING");
        let compare = |l: &str, r: &str, op| {
            ComparisonInterpreter::interpret(
                &StringOperatorHandler,
                &string,
                &string,
                &Value::from(l),
                &Value::from(r),
                op,
            )
            .unwrap()
        };
        assert_eq!(compare("abc", "abc", ComparisonOperator::Equal), Some(true));
        assert_eq!(compare("abc", "def", ComparisonOperator::Lower), Some(true));
        assert_eq!(
            compare("abc", "abd", ComparisonOperator::GreaterOrEqual),
            Some(false)
        );

        assert!(matches!(
            ComparisonInterpreter::interpret(
                &StringOperatorHandler,
                &string,
                &string,
                &Value::from("1"),
                &Value::Integer(1),
                ComparisonOperator::Equal,
            ),
            Err(EvaluationError::InvalidOperands { .. })
        ));
    }

    #[test]
    fn test_concatenation() {
        let string = DomainType::basic("STRING");
        let concat = |l: Value, r: Value, op| {
            ArithmeticInterpreter::interpret(
                &StringOperatorHandler,
                &string,
                &string,
                &string,
                &l,
                &r,
                op,
            )
        };
        assert_eq!(
            concat(Value::from("Hello"), Value::from(" World"), DomainOperator::Plus).unwrap(),
            Value::from("Hello World")
        );
        assert_eq!(
            concat(Value::from("v"), Value::Integer(2), DomainOperator::Plus).unwrap(),
            Value::from("v2")
        );
        assert!(matches!(
            concat(Value::from("a"), Value::from("b"), DomainOperator::Minus),
            Err(EvaluationError::UnsupportedOperator { .. })
        ));
    }
}
