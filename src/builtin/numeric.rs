//! INTEGER and NUMERIC semantics.

use crate::builtin::{invalid_operands, unsupported_operator, NUMERIC};
use crate::domain::DomainType;
use crate::error::{EvaluationError, EvaluationResult};
use crate::expression::{ComparisonOperator, DomainOperator};
use crate::spi::{ArithmeticInterpreter, ComparisonInterpreter};
use crate::value::Value;

/// Comparison and arithmetic for `Value::Integer` and `Value::Numeric`.
///
/// Two integers stay integral unless the target type is NUMERIC; any other
/// combination is computed in floating point.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericOperatorHandler;

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Numeric(n) => Some(*n),
        _ => None,
    }
}

fn overflow(operator: DomainOperator, left: &Value, right: &Value) -> EvaluationError {
    EvaluationError::Other(format!(
        "integer overflow evaluating {} {} {}",
        left, operator, right
    ))
}

impl NumericOperatorHandler {
    fn integer_arithmetic(
        &self,
        target_type: &DomainType,
        left: i64,
        right: i64,
        operator: DomainOperator,
    ) -> EvaluationResult<Value> {
        let (l, r) = (Value::Integer(left), Value::Integer(right));
        let result = match operator {
            DomainOperator::Plus => left.checked_add(right),
            DomainOperator::Minus => left.checked_sub(right),
            DomainOperator::Multiplication => left.checked_mul(right),
            DomainOperator::Division | DomainOperator::Modulo if right == 0 => {
                return Err(EvaluationError::DivisionByZero)
            }
            DomainOperator::Division => left.checked_div(right),
            DomainOperator::Modulo => left.checked_rem(right),
            DomainOperator::UnaryMinus => left.checked_neg(),
            DomainOperator::UnaryPlus => Some(left),
            DomainOperator::Not => return Err(unsupported_operator(operator, target_type)),
        };
        result
            .map(Value::Integer)
            .ok_or_else(|| overflow(operator, &l, &r))
    }

    fn numeric_arithmetic(
        &self,
        target_type: &DomainType,
        left: f64,
        right: f64,
        operator: DomainOperator,
    ) -> EvaluationResult<Value> {
        let result = match operator {
            DomainOperator::Plus => left + right,
            DomainOperator::Minus => left - right,
            DomainOperator::Multiplication => left * right,
            DomainOperator::Division | DomainOperator::Modulo if right == 0.0 => {
                return Err(EvaluationError::DivisionByZero)
            }
            DomainOperator::Division => left / right,
            DomainOperator::Modulo => left % right,
            DomainOperator::UnaryMinus => -left,
            DomainOperator::UnaryPlus => left,
            DomainOperator::Not => return Err(unsupported_operator(operator, target_type)),
        };
        Ok(Value::Numeric(result))
    }
}

impl ComparisonInterpreter for NumericOperatorHandler {
    fn interpret(
        &self,
        _left_type: &DomainType,
        _right_type: &DomainType,
        left: &Value,
        right: &Value,
        operator: ComparisonOperator,
    ) -> EvaluationResult<Option<bool>> {
        let ordering = match (left, right) {
            (Value::Integer(l), Value::Integer(r)) => Some(l.cmp(r)),
            _ => match (as_f64(left), as_f64(right)) {
                (Some(l), Some(r)) => l.partial_cmp(&r),
                _ => return Err(invalid_operands(operator, left, right)),
            },
        };
        // NaN is unordered; the comparison has no value
        Ok(ordering.map(|ordering| operator.test(ordering)))
    }
}

impl ArithmeticInterpreter for NumericOperatorHandler {
    fn interpret(
        &self,
        target_type: &DomainType,
        _left_type: &DomainType,
        _right_type: &DomainType,
        left: &Value,
        right: &Value,
        operator: DomainOperator,
    ) -> EvaluationResult<Value> {
        match (left, right) {
            (Value::Integer(l), Value::Integer(r)) if target_type.name() != NUMERIC => {
                self.integer_arithmetic(target_type, *l, *r, operator)
            }
            _ => match (as_f64(left), as_f64(right)) {
                (Some(l), Some(r)) => self.numeric_arithmetic(target_type, l, r, operator),
                _ => Err(invalid_operands(operator, left, right)),
            },
        }
    }
}
