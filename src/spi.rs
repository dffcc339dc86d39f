//! Capability contracts consumed by the interpreter.
//!
//! Types, attributes and functions carry optional slots holding these
//! capabilities. The interpreter never falls back to a default when a slot it
//! needs is empty; see [`crate::error::EvaluationError`].

use crate::domain::{DomainFunction, DomainType, EntityAttribute, FunctionArgument};
use crate::error::EvaluationResult;
use crate::expression::{ComparisonOperator, Context, DomainOperator, ExpressionInterpreter};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Reads one attribute from a host value.
pub trait AttributeAccessor: fmt::Debug + Send + Sync {
    fn access(&self, host: &Value, attribute: &EntityAttribute) -> EvaluationResult<Value>;
}

/// Converts values between the model representation seen by callers and the
/// internal representation the capabilities compute with.
pub trait TypeAdapter: fmt::Debug + Send + Sync {
    fn to_internal(
        &self,
        context: &Context,
        value: Value,
        domain_type: &DomainType,
    ) -> EvaluationResult<Value>;

    fn to_model(
        &self,
        context: &Context,
        value: Value,
        domain_type: &DomainType,
    ) -> EvaluationResult<Value>;
}

/// Comparison semantics of a type, looked up on the left operand's type.
///
/// Returning `Ok(None)` means the comparison itself has no value.
pub trait ComparisonInterpreter: fmt::Debug + Send + Sync {
    fn interpret(
        &self,
        left_type: &DomainType,
        right_type: &DomainType,
        left: &Value,
        right: &Value,
        operator: ComparisonOperator,
    ) -> EvaluationResult<Option<bool>>;
}

/// Arithmetic semantics of a type, looked up on the result (target) type.
pub trait ArithmeticInterpreter: fmt::Debug + Send + Sync {
    fn interpret(
        &self,
        target_type: &DomainType,
        left_type: &DomainType,
        right_type: &DomainType,
        left: &Value,
        right: &Value,
        operator: DomainOperator,
    ) -> EvaluationResult<Value>;
}

/// Computes the result of a function invocation.
///
/// The interpreter is handed in so that an invoker can evaluate further
/// expressions; nested evaluations share no state with the calling one.
pub trait FunctionInvoker: fmt::Debug + Send + Sync {
    fn invoke(
        &self,
        interpreter: &ExpressionInterpreter,
        context: &Context,
        function: &DomainFunction,
        arguments: &ArgumentValues,
    ) -> EvaluationResult<Value>;
}

/// Argument values of one invocation, in argument declaration order.
///
/// Arguments that were not bound by the invocation are absent, which is
/// different from being bound to `Value::Null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentValues {
    entries: Vec<(Arc<FunctionArgument>, Value)>,
}

impl ArgumentValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, argument: Arc<FunctionArgument>, value: Value) {
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.position() == argument.position())
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((argument, value)),
        }
    }

    /// Value bound to the argument at `position`
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(argument, _)| argument.position() == position)
            .map(|(_, value)| value)
    }

    /// Value bound to the argument called `name`
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(argument, _)| argument.name() == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FunctionArgument, &Value)> {
        self.entries
            .iter()
            .map(|(argument, value)| (argument.as_ref(), value))
    }
}
