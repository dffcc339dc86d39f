//! Builtin functions: LENGTH, LOCATE and RANDOM.

use crate::domain::{DomainBuilder, DomainFunction, DomainType, FunctionArgument};
use crate::error::{DomainResult, EvaluationError, EvaluationResult};
use crate::expression::{Context, ExpressionInterpreter};
use crate::spi::{ArgumentValues, FunctionInvoker};
use crate::value::Value;
use rand::Rng;
use std::sync::Arc;

fn invalid_argument(function: &DomainFunction, position: usize, value: &Value) -> EvaluationError {
    EvaluationError::InvalidArgument {
        function: function.name().to_string(),
        argument: function
            .argument(position)
            .map(|argument| argument.name().to_string())
            .unwrap_or_else(|| position.to_string()),
        reason: format!("unexpected {}", value.kind_name()),
    }
}

/// `LENGTH(string)`: number of characters
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthFunction;

impl LengthFunction {
    pub fn add_function(
        builder: &mut DomainBuilder,
        string: &Arc<DomainType>,
        integer: &Arc<DomainType>,
    ) -> DomainResult<Arc<DomainFunction>> {
        builder.add_function(
            DomainFunction::new("LENGTH")
                .with_argument(FunctionArgument::new("string", string.clone()))
                .with_result_type(integer.clone())
                .with_invoker(Arc::new(LengthFunction)),
        )
    }
}

impl FunctionInvoker for LengthFunction {
    fn invoke(
        &self,
        _interpreter: &ExpressionInterpreter,
        _context: &Context,
        function: &DomainFunction,
        arguments: &ArgumentValues,
    ) -> EvaluationResult<Value> {
        match arguments.get(0) {
            None | Some(Value::Null) => Ok(Value::Null),
            Some(Value::String(s)) => Ok(Value::Integer(s.chars().count() as i64)),
            Some(other) => Err(invalid_argument(function, 0, other)),
        }
    }
}

/// `LOCATE(substring, string[, start])`: zero-based character index of the
/// first occurrence at or after `start`, or -1.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocateFunction;

impl LocateFunction {
    pub fn add_function(
        builder: &mut DomainBuilder,
        string: &Arc<DomainType>,
        integer: &Arc<DomainType>,
    ) -> DomainResult<Arc<DomainFunction>> {
        builder.add_function(
            DomainFunction::new("LOCATE")
                .with_argument(FunctionArgument::new("substring", string.clone()))
                .with_argument(FunctionArgument::new("string", string.clone()))
                .with_argument(FunctionArgument::new("start", integer.clone()))
                .with_min_arguments(2)
                .with_result_type(integer.clone())
                .with_invoker(Arc::new(LocateFunction)),
        )
    }

    fn locate(needle: &str, haystack: &str, start: usize) -> i64 {
        let offset = haystack
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(haystack.len()))
            .nth(start);
        let Some(offset) = offset else {
            return -1;
        };
        match haystack[offset..].find(needle) {
            Some(found) => haystack[..offset + found].chars().count() as i64,
            None => -1,
        }
    }
}

impl FunctionInvoker for LocateFunction {
    fn invoke(
        &self,
        _interpreter: &ExpressionInterpreter,
        _context: &Context,
        function: &DomainFunction,
        arguments: &ArgumentValues,
    ) -> EvaluationResult<Value> {
        let needle = match arguments.get(0) {
            None | Some(Value::Null) => return Ok(Value::Null),
            Some(Value::String(s)) => s,
            Some(other) => return Err(invalid_argument(function, 0, other)),
        };
        let haystack = match arguments.get(1) {
            None | Some(Value::Null) => return Ok(Value::Null),
            Some(Value::String(s)) => s,
            Some(other) => return Err(invalid_argument(function, 1, other)),
        };
        // An omitted start defaults to 0; an explicit NULL has no value
        let start = match arguments.get(2) {
            None => 0,
            Some(Value::Null) => return Ok(Value::Null),
            Some(Value::Integer(i)) => (*i).max(0) as usize,
            Some(other) => return Err(invalid_argument(function, 2, other)),
        };
        Ok(Value::Integer(Self::locate(needle, haystack, start)))
    }
}

/// `RANDOM()`: uniformly distributed NUMERIC in `[0, 1)`
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomFunction;

impl RandomFunction {
    pub fn add_function(
        builder: &mut DomainBuilder,
        numeric: &Arc<DomainType>,
    ) -> DomainResult<Arc<DomainFunction>> {
        builder.add_function(
            DomainFunction::new("RANDOM")
                .with_result_type(numeric.clone())
                .with_invoker(Arc::new(RandomFunction)),
        )
    }
}

impl FunctionInvoker for RandomFunction {
    fn invoke(
        &self,
        _interpreter: &ExpressionInterpreter,
        _context: &Context,
        _function: &DomainFunction,
        _arguments: &ArgumentValues,
    ) -> EvaluationResult<Value> {
        Ok(Value::Numeric(rand::thread_rng().gen::<f64>()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::standard_domain;

    fn invoke(name: &str, values: Vec<Value>) -> EvaluationResult<Value> {
        let model = standard_domain().unwrap().build();
        let function = model.require_function(name).unwrap();
        let mut arguments = ArgumentValues::new();
        for (argument, value) in function.arguments().iter().zip(values) {
            arguments.insert(argument.clone(), value);
        }
        let interpreter = ExpressionInterpreter::default();
        function.invoker().unwrap().invoke(
            &interpreter,
            &Context::default(),
            &function,
            &arguments,
        )
    }

    #[test]
    fn test_length() {
        assert_eq!(
            invoke("LENGTH", vec![Value::from("héllo")]).unwrap(),
            Value::Integer(5)
        );
        assert_eq!(invoke("LENGTH", vec![Value::Null]).unwrap(), Value::Null);
        assert!(matches!(
            invoke("LENGTH", vec![Value::Integer(1)]),
            Err(EvaluationError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_locate() {
        assert_eq!(
            invoke("LOCATE", vec![Value::from("lo"), Value::from("hello")]).unwrap(),
            Value::Integer(3)
        );
        assert_eq!(
            invoke(
                "LOCATE",
                vec![Value::from("l"), Value::from("hello"), Value::Integer(3)]
            )
            .unwrap(),
            Value::Integer(3)
        );
        assert_eq!(
            invoke("LOCATE", vec![Value::from("x"), Value::from("hello")]).unwrap(),
            Value::Integer(-1)
        );
        assert_eq!(
            invoke(
                "LOCATE",
                vec![Value::from("o"), Value::from("hello"), Value::Integer(10)]
            )
            .unwrap(),
            Value::Integer(-1)
        );
        assert_eq!(
            invoke(
                "LOCATE",
                vec![Value::from("o"), Value::from("hello"), Value::Null]
            )
            .unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_random() {
        match invoke("RANDOM", vec![]).unwrap() {
            Value::Numeric(n) => assert!((0.0..1.0).contains(&n)),
            other => panic!("unexpected {:?}", other),
        }
    }
}
