//! TIME and INTERVAL semantics.

use crate::builtin::{invalid_operands, unsupported_operator};
use crate::domain::DomainType;
use crate::error::{EvaluationError, EvaluationResult};
use crate::expression::{ComparisonOperator, DomainOperator};
use crate::spi::{ArithmeticInterpreter, ComparisonInterpreter};
use crate::value::interval::seconds_of_day;
use crate::value::Value;

fn overflow(operator: DomainOperator, left: &Value, right: &Value) -> EvaluationError {
    EvaluationError::Other(format!(
        "interval overflow evaluating {} {} {}",
        left, operator, right
    ))
}

/// Handles times of day and the intervals that shift them.
///
/// Supported arithmetic:
/// - `INTERVAL + INTERVAL`, `INTERVAL - INTERVAL`, `-INTERVAL`
/// - `TIME + INTERVAL`, `TIME - INTERVAL`, `INTERVAL + TIME`
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeOperatorHandler;

impl ComparisonInterpreter for TimeOperatorHandler {
    fn interpret(
        &self,
        _left_type: &DomainType,
        _right_type: &DomainType,
        left: &Value,
        right: &Value,
        operator: ComparisonOperator,
    ) -> EvaluationResult<Option<bool>> {
        let ordering = match (left, right) {
            (Value::Time(l), Value::Time(r)) => seconds_of_day(l).cmp(&seconds_of_day(r)),
            (Value::Interval(l), Value::Interval(r)) => l.sort_key().cmp(&r.sort_key()),
            _ => return Err(invalid_operands(operator, left, right)),
        };
        Ok(Some(operator.test(ordering)))
    }
}

impl ArithmeticInterpreter for TimeOperatorHandler {
    fn interpret(
        &self,
        target_type: &DomainType,
        _left_type: &DomainType,
        _right_type: &DomainType,
        left: &Value,
        right: &Value,
        operator: DomainOperator,
    ) -> EvaluationResult<Value> {
        match (left, right, operator) {
            (Value::Interval(l), Value::Interval(r), DomainOperator::Plus) => l
                .checked_add(r)
                .map(Value::Interval)
                .ok_or_else(|| overflow(operator, left, right)),
            (Value::Interval(l), Value::Interval(r), DomainOperator::Minus) => l
                .checked_sub(r)
                .map(Value::Interval)
                .ok_or_else(|| overflow(operator, left, right)),
            (Value::Interval(l), _, DomainOperator::UnaryMinus) => l
                .checked_neg()
                .map(Value::Interval)
                .ok_or_else(|| overflow(operator, left, right)),
            (Value::Time(time), Value::Interval(interval), DomainOperator::Plus)
            | (Value::Interval(interval), Value::Time(time), DomainOperator::Plus) => {
                Ok(Value::Time(interval.add_to_time(*time)))
            }
            (Value::Time(time), Value::Interval(interval), DomainOperator::Minus) => {
                Ok(Value::Time(interval.subtract_from_time(*time)))
            }
            (Value::Time(_) | Value::Interval(_), Value::Time(_) | Value::Interval(_), _) => {
                Err(unsupported_operator(operator, target_type))
            }
            _ => Err(invalid_operands(operator, left, right)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TemporalInterval;
    use chrono::NaiveTime;

    fn time(h: u32, m: u32, s: u32) -> Value {
        Value::Time(NaiveTime::from_hms_opt(h, m, s).unwrap())
    }

    fn apply(left: Value, right: Value, operator: DomainOperator) -> EvaluationResult<Value> {
        let time_type = DomainType::basic("TIME");
        ArithmeticInterpreter::interpret(
            &TimeOperatorHandler,
            &time_type,
            &time_type,
            &time_type,
            &left,
            &right,
            operator,
        )
    }

    #[test]
    fn test_time_comparison() {
        let time_type = DomainType::basic("TIME");
        let result = ComparisonInterpreter::interpret(
            &TimeOperatorHandler,
            &time_type,
            &time_type,
            &time(10, 0, 0),
            &time(9, 59, 59),
            ComparisonOperator::Greater,
        );
        assert_eq!(result, Ok(Some(true)));

        let result = ComparisonInterpreter::interpret(
            &TimeOperatorHandler,
            &time_type,
            &time_type,
            &time(10, 0, 0),
            &Value::from("10:00:00"),
            ComparisonOperator::Equal,
        );
        assert!(matches!(result, Err(EvaluationError::InvalidOperands { .. })));
    }

    #[test]
    fn test_time_arithmetic() {
        let hour = Value::Interval(TemporalInterval::clock(1, 0, 0));
        assert_eq!(
            apply(time(10, 15, 0), hour.clone(), DomainOperator::Plus).unwrap(),
            time(11, 15, 0)
        );
        assert_eq!(
            apply(hour.clone(), time(10, 15, 0), DomainOperator::Plus).unwrap(),
            time(11, 15, 0)
        );
        assert_eq!(
            apply(time(0, 30, 0), hour.clone(), DomainOperator::Minus).unwrap(),
            time(23, 30, 0)
        );
        assert_eq!(
            apply(hour.clone(), hour.clone(), DomainOperator::Plus).unwrap(),
            Value::Interval(TemporalInterval::clock(2, 0, 0))
        );
        assert_eq!(
            apply(hour.clone(), hour.clone(), DomainOperator::UnaryMinus).unwrap(),
            Value::Interval(TemporalInterval::clock(-1, 0, 0))
        );
        assert!(matches!(
            apply(hour, time(1, 0, 0), DomainOperator::Minus),
            Err(EvaluationError::UnsupportedOperator { .. })
        ));
    }

    #[test]
    fn test_interval_overflow_is_an_error() {
        let longest = Value::Interval(TemporalInterval::clock(i32::MAX, 0, 0));
        let hour = Value::Interval(TemporalInterval::clock(1, 0, 0));
        assert!(matches!(
            apply(longest, hour, DomainOperator::Plus),
            Err(EvaluationError::Other(message)) if message.contains("overflow")
        ));

        let shortest = Value::Interval(TemporalInterval::clock(i32::MIN, 0, 0));
        assert!(matches!(
            apply(shortest.clone(), shortest, DomainOperator::UnaryMinus),
            Err(EvaluationError::Other(_))
        ));
    }
}
