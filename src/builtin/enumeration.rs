//! Enumeration semantics.

use crate::builtin::invalid_operands;
use crate::domain::DomainType;
use crate::error::EvaluationResult;
use crate::expression::ComparisonOperator;
use crate::spi::ComparisonInterpreter;
use crate::value::Value;

/// Compares enumeration constants held as strings.
///
/// Constants order by their declaration position in the left operand's type.
/// A string that is not a constant of that type can only be tested for
/// (in)equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumOperatorHandler;

fn position(domain_type: &DomainType, constant: &str) -> Option<usize> {
    domain_type
        .enum_values()
        .iter()
        .position(|value| value == constant)
}

impl ComparisonInterpreter for EnumOperatorHandler {
    fn interpret(
        &self,
        left_type: &DomainType,
        _right_type: &DomainType,
        left: &Value,
        right: &Value,
        operator: ComparisonOperator,
    ) -> EvaluationResult<Option<bool>> {
        let (Value::String(l), Value::String(r)) = (left, right) else {
            return Err(invalid_operands(operator, left, right));
        };
        match (position(left_type, l), position(left_type, r)) {
            (Some(l), Some(r)) => Ok(Some(operator.test(l.cmp(&r)))),
            _ => match operator {
                ComparisonOperator::Equal => Ok(Some(l == r)),
                ComparisonOperator::NotEqual => Ok(Some(l != r)),
                _ => Err(invalid_operands(operator, left, right)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvaluationError;

    fn compare(
        left: &str,
        right: &str,
        operator: ComparisonOperator,
    ) -> EvaluationResult<Option<bool>> {
        let color = DomainType::enumeration("Color", ["RED", "GREEN", "BLUE"]);
        EnumOperatorHandler.interpret(
            &color,
            &color,
            &Value::from(left),
            &Value::from(right),
            operator,
        )
    }

    #[test]
    fn test_enum_comparison() {
        assert_eq!(compare("RED", "RED", ComparisonOperator::Equal), Ok(Some(true)));
        assert_eq!(compare("RED", "GREEN", ComparisonOperator::NotEqual), Ok(Some(true)));
        // Declaration order, not alphabetical order
        assert_eq!(compare("RED", "BLUE", ComparisonOperator::Lower), Ok(Some(true)));
        assert_eq!(compare("GREEN", "RED", ComparisonOperator::Greater), Ok(Some(true)));

        assert_eq!(compare("RED", "PINK", ComparisonOperator::Equal), Ok(Some(false)));
        assert!(matches!(
            compare("RED", "PINK", ComparisonOperator::Lower),
            Err(EvaluationError::InvalidOperands { .. })
        ));
    }
}
