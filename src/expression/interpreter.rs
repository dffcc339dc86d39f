//! Tree-walking interpreter.
//!
//! Evaluation follows SQL three-valued logic: `Value::Null` is the "no value"
//! outcome and propagates through every node except those with explicit NULL
//! semantics (IS NULL, IS EMPTY, AND/OR and the BETWEEN/IN short circuits).
//!
//! A visited node may hand a [`TypeAdapter`] to its parent together with its
//! value. The adapter lives only in the return value of that one visit, so
//! nested and failing evaluations cannot leave adapter state behind.

use crate::domain::{DomainModel, DomainType};
use crate::error::{EvaluationError, EvaluationResult};
use crate::expression::expr::{Expression, FunctionInvocation, LiteralValue, Path};
use crate::expression::operator::{ComparisonOperator, DomainOperator};
use crate::expression::Context;
use crate::spi::{ArgumentValues, TypeAdapter};
use crate::value::Value;
use log::{debug, trace};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

/// The value of one visited node plus the adapter pending for its parent.
struct Evaluated {
    value: Value,
    adapter: Option<Arc<dyn TypeAdapter>>,
}

impl Evaluated {
    fn plain(value: Value) -> Self {
        Self {
            value,
            adapter: None,
        }
    }

    fn truth(result: Option<bool>) -> Self {
        Self::plain(result.map(Value::Boolean).unwrap_or(Value::Null))
    }
}

/// Evaluates expression trees built against a [`DomainModel`].
///
/// The interpreter holds no per-evaluation state and can be shared between
/// threads; capabilities may call back into it while an evaluation is running.
#[derive(Debug, Default)]
pub struct ExpressionInterpreter {
    domain_model: Arc<DomainModel>,
}

impl ExpressionInterpreter {
    pub fn new(domain_model: Arc<DomainModel>) -> Self {
        Self { domain_model }
    }

    pub fn domain_model(&self) -> &Arc<DomainModel> {
        &self.domain_model
    }

    /// Create a context binding each alias to a declared type and host object
    pub fn create_context(
        &self,
        root_types: HashMap<String, Arc<DomainType>>,
        root_objects: HashMap<String, Value>,
    ) -> Context {
        Context::new(root_types, root_objects)
    }

    /// Evaluate an expression and convert the result to its model
    /// representation if the outermost node produced an adapter.
    pub fn evaluate(&self, expression: &Expression, context: &Context) -> EvaluationResult<Value> {
        debug!(
            "evaluating {} expression of type {}",
            expression.kind_name(),
            expression.domain_type()
        );
        let Evaluated { value, adapter } = self.visit(expression, context)?;
        match adapter {
            Some(adapter) => adapter.to_model(context, value, expression.domain_type()),
            None => Ok(value),
        }
    }

    /// Evaluate and convert the result into `T`.
    pub fn evaluate_as<T>(&self, expression: &Expression, context: &Context) -> EvaluationResult<T>
    where
        T: TryFrom<Value, Error = EvaluationError>,
    {
        T::try_from(self.evaluate(expression, context)?)
    }

    /// Evaluate a predicate to a strict boolean.
    ///
    /// Only TRUE passes; FALSE and "no value" both yield `false`, as in a SQL
    /// WHERE clause.
    pub fn evaluate_predicate(
        &self,
        expression: &Expression,
        context: &Context,
    ) -> EvaluationResult<bool> {
        Ok(matches!(
            self.evaluate(expression, context)?,
            Value::Boolean(true)
        ))
    }

    fn visit(&self, expression: &Expression, context: &Context) -> EvaluationResult<Evaluated> {
        match expression {
            Expression::Literal(literal) => match &literal.value {
                LiteralValue::Scalar(value) => Ok(Evaluated::plain(value.clone())),
                LiteralValue::Collection(items) => {
                    let values = items
                        .iter()
                        .map(|item| self.value_of(item, context))
                        .collect::<EvaluationResult<Vec<_>>>()?;
                    Ok(Evaluated::plain(Value::Collection(values)))
                }
            },

            Expression::Path(path) => self.visit_path(path, context),

            Expression::ArithmeticFactor {
                domain_type,
                expression,
                invert_signum,
            } => {
                let value = self.value_of(expression, context)?;
                if value.is_null() || !invert_signum {
                    return Ok(Evaluated::plain(value));
                }
                self.arithmetic(
                    domain_type,
                    domain_type,
                    domain_type,
                    &value,
                    &value,
                    DomainOperator::UnaryMinus,
                )
                .map(Evaluated::plain)
            }

            Expression::ChainingArithmetic {
                domain_type,
                operator,
                left,
                right,
            } => {
                let left_value = self.value_of(left, context)?;
                if left_value.is_null() {
                    return Ok(Evaluated::plain(Value::Null));
                }
                let right_value = self.value_of(right, context)?;
                if right_value.is_null() {
                    return Ok(Evaluated::plain(Value::Null));
                }
                self.arithmetic(
                    domain_type,
                    left.domain_type(),
                    right.domain_type(),
                    &left_value,
                    &right_value,
                    operator.domain_operator(),
                )
                .map(Evaluated::plain)
            }

            Expression::FunctionInvocation(invocation) => {
                self.visit_function_invocation(invocation, context)
            }

            Expression::Comparison {
                operator,
                left,
                right,
                negated,
                ..
            } => {
                let left_value = self.value_of(left, context)?;
                if left_value.is_null() {
                    return Ok(Evaluated::plain(Value::Null));
                }
                let right_value = self.value_of(right, context)?;
                if right_value.is_null() {
                    return Ok(Evaluated::plain(Value::Null));
                }
                let result = self.compare(
                    left.domain_type(),
                    right.domain_type(),
                    &left_value,
                    &right_value,
                    *operator,
                )?;
                Ok(Evaluated::truth(result.map(|b| b != *negated)))
            }

            Expression::Between {
                left,
                lower,
                upper,
                negated,
                ..
            } => self
                .visit_between(left, lower, upper, *negated, context)
                .map(Evaluated::truth),

            Expression::In {
                left,
                items,
                negated,
                ..
            } => self
                .visit_in(left, items, *negated, context)
                .map(Evaluated::truth),

            Expression::IsNull { left, negated, .. } => {
                let value = self.value_of(left, context)?;
                Ok(Evaluated::plain(Value::Boolean(value.is_null() != *negated)))
            }

            Expression::IsEmpty { left, negated, .. } => match self.value_of(left, context)? {
                Value::Null => Ok(Evaluated::plain(Value::Null)),
                Value::Collection(items) => {
                    Ok(Evaluated::plain(Value::Boolean(items.is_empty() != *negated)))
                }
                other => Err(EvaluationError::NotACollection {
                    actual: other.kind_name(),
                }),
            },

            Expression::Compound {
                conjunction,
                predicates,
                negated,
                ..
            } => self
                .visit_compound(*conjunction, predicates, *negated, context)
                .map(Evaluated::truth),

            Expression::ExpressionPredicate {
                expression,
                negated,
                ..
            } => {
                let result = self.value_of(expression, context)?.as_truth()?;
                Ok(Evaluated::truth(result.map(|b| b != *negated)))
            }
        }
    }

    /// Visit a child whose adapter, if any, is not consumed by the parent.
    fn value_of(&self, expression: &Expression, context: &Context) -> EvaluationResult<Value> {
        self.visit(expression, context).map(|evaluated| evaluated.value)
    }

    fn visit_path(&self, path: &Path, context: &Context) -> EvaluationResult<Evaluated> {
        if path.attributes.is_empty() {
            return Ok(Evaluated::plain(context.root(&path.alias)));
        }

        let mut current = match context.root_ref(&path.alias) {
            Some(root) => Cow::Borrowed(root),
            None => return Ok(Evaluated::plain(Value::Null)),
        };
        for attribute in &path.attributes {
            if current.is_null() {
                trace!("path {} stops before {}: no value", path.alias, attribute);
                return Ok(Evaluated::plain(Value::Null));
            }
            let accessor =
                attribute
                    .accessor()
                    .ok_or_else(|| EvaluationError::MissingAttributeAccessor {
                        attribute: attribute.to_string(),
                    })?;
            let mut next = accessor.access(&current, attribute)?;
            if let Some(adapter) = attribute.adapter() {
                next = adapter.to_internal(context, next, attribute.domain_type())?;
            }
            trace!("path {} accessed {}", path.alias, attribute);
            current = Cow::Owned(next);
        }

        Ok(Evaluated {
            value: current.into_owned(),
            adapter: path
                .attributes
                .last()
                .and_then(|attribute| attribute.adapter().cloned()),
        })
    }

    fn visit_function_invocation(
        &self,
        invocation: &FunctionInvocation,
        context: &Context,
    ) -> EvaluationResult<Evaluated> {
        let function = &invocation.function;
        let invoker =
            function
                .invoker()
                .ok_or_else(|| EvaluationError::MissingFunctionInvoker {
                    function: function.name().to_string(),
                })?;

        let mut arguments = ArgumentValues::with_capacity(invocation.arguments.len());
        for (argument, expression) in &invocation.arguments {
            let Evaluated { mut value, adapter } = self.visit(expression, context)?;
            if let Some(adapter) = adapter {
                value = adapter.to_internal(context, value, argument.domain_type())?;
            }
            if let Some(adapter) = argument.adapter() {
                value = adapter.to_model(context, value, argument.domain_type())?;
            }
            arguments.insert(argument.clone(), value);
        }

        trace!(
            "invoking {} with {} arguments",
            function.name(),
            arguments.len()
        );
        let value = invoker.invoke(self, context, function, &arguments)?;
        Ok(Evaluated {
            value,
            adapter: function.result_adapter().cloned(),
        })
    }

    /// `left BETWEEN lower AND upper` as `left >= lower AND left <= upper`,
    /// with the negation flag folded into a single decisive outcome: each
    /// bound comparison that equals `negated` decides the result as
    /// `negated`, and if neither does the result is `!negated`.
    ///
    /// The upper bound is only evaluated when the lower bound comparison did
    /// not decide, so a decided lower comparison wins even when the upper
    /// bound has no value. With negation this means `5 NOT BETWEEN 1 AND 10`
    /// is TRUE, as the lower comparison holds.
    fn visit_between(
        &self,
        left: &Expression,
        lower: &Expression,
        upper: &Expression,
        negated: bool,
        context: &Context,
    ) -> EvaluationResult<Option<bool>> {
        let left_value = self.value_of(left, context)?;
        if left_value.is_null() {
            return Ok(None);
        }
        let lower_value = self.value_of(lower, context)?;
        if lower_value.is_null() {
            return Ok(None);
        }
        match self.compare(
            left.domain_type(),
            lower.domain_type(),
            &left_value,
            &lower_value,
            ComparisonOperator::GreaterOrEqual,
        )? {
            None => return Ok(None),
            Some(result) if result == negated => return Ok(Some(negated)),
            Some(_) => {}
        }

        let upper_value = self.value_of(upper, context)?;
        if upper_value.is_null() {
            return Ok(None);
        }
        match self.compare(
            left.domain_type(),
            upper.domain_type(),
            &left_value,
            &upper_value,
            ComparisonOperator::LowerOrEqual,
        )? {
            None => Ok(None),
            Some(result) if result == negated => Ok(Some(negated)),
            Some(_) => Ok(Some(!negated)),
        }
    }

    /// Items are compared in order and the first comparison that differs
    /// from the negation flag decides the result.
    ///
    /// For NOT IN this returns FALSE on the first non-matching item, not
    /// after scanning for a match. That is the established behaviour and is
    /// kept as is.
    fn visit_in(
        &self,
        left: &Expression,
        items: &[Expression],
        negated: bool,
        context: &Context,
    ) -> EvaluationResult<Option<bool>> {
        let left_value = self.value_of(left, context)?;
        if left_value.is_null() {
            return Ok(None);
        }
        for item in items {
            let item_value = self.value_of(item, context)?;
            if item_value.is_null() {
                return Ok(None);
            }
            match self.compare(
                left.domain_type(),
                item.domain_type(),
                &left_value,
                &item_value,
                ComparisonOperator::Equal,
            )? {
                None => return Ok(None),
                Some(equal) if equal != negated => return Ok(Some(equal)),
                Some(_) => {}
            }
        }
        Ok(Some(negated))
    }

    fn visit_compound(
        &self,
        conjunction: bool,
        predicates: &[Expression],
        negated: bool,
        context: &Context,
    ) -> EvaluationResult<Option<bool>> {
        // An empty AND is TRUE, an empty OR is FALSE; the loops below fall
        // through to exactly those results.
        for predicate in predicates {
            match self.value_of(predicate, context)?.as_truth()? {
                None => return Ok(None),
                Some(result) if result != conjunction => return Ok(Some(result != negated)),
                Some(_) => {}
            }
        }
        Ok(Some(conjunction != negated))
    }

    fn compare(
        &self,
        left_type: &DomainType,
        right_type: &DomainType,
        left: &Value,
        right: &Value,
        operator: ComparisonOperator,
    ) -> EvaluationResult<Option<bool>> {
        let interpreter =
            left_type
                .comparison()
                .ok_or_else(|| EvaluationError::MissingComparisonInterpreter {
                    type_name: left_type.name().to_string(),
                })?;
        interpreter.interpret(left_type, right_type, left, right, operator)
    }

    fn arithmetic(
        &self,
        target_type: &DomainType,
        left_type: &DomainType,
        right_type: &DomainType,
        left: &Value,
        right: &Value,
        operator: DomainOperator,
    ) -> EvaluationResult<Value> {
        let interpreter =
            target_type
                .arithmetic()
                .ok_or_else(|| EvaluationError::MissingArithmeticInterpreter {
                    type_name: target_type.name().to_string(),
                })?;
        interpreter.interpret(target_type, left_type, right_type, left, right, operator)
    }
}
