//! BOOLEAN semantics.

use crate::builtin::{invalid_operands, unsupported_operator};
use crate::domain::DomainType;
use crate::error::EvaluationResult;
use crate::expression::ComparisonOperator;
use crate::spi::ComparisonInterpreter;
use crate::value::Value;

/// Equality between booleans. Ordering comparisons are not defined.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanOperatorHandler;

impl ComparisonInterpreter for BooleanOperatorHandler {
    fn interpret(
        &self,
        left_type: &DomainType,
        _right_type: &DomainType,
        left: &Value,
        right: &Value,
        operator: ComparisonOperator,
    ) -> EvaluationResult<Option<bool>> {
        let (l, r) = match (left, right) {
            (Value::Boolean(l), Value::Boolean(r)) => (*l, *r),
            _ => return Err(invalid_operands(operator, left, right)),
        };
        match operator {
            ComparisonOperator::Equal => Ok(Some(l == r)),
            ComparisonOperator::NotEqual => Ok(Some(l != r)),
            _ => Err(unsupported_operator(operator, left_type)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvaluationError;

    #[test]
    fn test_boolean_equality() {
        let boolean = DomainType::basic("BOOLEAN");
        let compare = |l: bool, r: bool, op| {
            BooleanOperatorHandler.interpret(
                &boolean,
                &boolean,
                &Value::Boolean(l),
                &Value::Boolean(r),
                op,
            )
        };
        assert_eq!(compare(true, true, ComparisonOperator::Equal), Ok(Some(true)));
        assert_eq!(
            compare(true, false, ComparisonOperator::NotEqual),
            Ok(Some(true))
        );
        assert_eq!(
            compare(true, false, ComparisonOperator::Greater),
            Err(EvaluationError::UnsupportedOperator {
                operator: ">".to_string(),
                type_name: "BOOLEAN".to_string()
            })
        );
    }
}
