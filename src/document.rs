//! JSON expression documents.
//!
//! An [`ExpressionDocument`] is the serialized form of an expression tree.
//! Documents name types, attributes and functions; [`ExpressionDocument::resolve`]
//! looks them up in a [`DomainModel`] and produces an [`Expression`].
//!
//! ```json
//! {
//!   "kind": "comparison",
//!   "operator": ">",
//!   "left": { "kind": "path", "alias": "p", "attributes": ["age"] },
//!   "right": { "kind": "literal", "value": 18 }
//! }
//! ```

use crate::builtin::{BOOLEAN, INTEGER, INTERVAL, NUMERIC, STRING, TIME};
use crate::domain::{DomainModel, DomainType, DomainTypeKind};
use crate::error::{DomainError, ResolveError, ResolveResult};
use crate::expression::{
    ArithmeticOperator, ComparisonOperator, Context, Expression, FunctionInvocation, Path,
};
use crate::value::{TemporalInterval, Value, TIME_FORMAT};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path as FilePath;
use std::sync::Arc;

/// Function arguments, either by position or by argument name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentsDocument {
    Positional(Vec<ExpressionDocument>),
    Named(BTreeMap<String, ExpressionDocument>),
}

impl Default for ArgumentsDocument {
    fn default() -> Self {
        ArgumentsDocument::Positional(Vec::new())
    }
}

/// Serialized expression tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpressionDocument {
    /// Constant. The type is inferred from the JSON value unless given; a
    /// JSON array becomes a collection literal.
    Literal {
        value: serde_json::Value,
        #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
        type_name: Option<String>,
    },

    /// Collection literal whose elements are expressions
    Collection {
        items: Vec<ExpressionDocument>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        element_type: Option<String>,
    },

    Path {
        alias: String,
        #[serde(default)]
        attributes: Vec<String>,
    },

    /// Unary minus
    Negative { expression: Box<ExpressionDocument> },

    Arithmetic {
        operator: String,
        left: Box<ExpressionDocument>,
        right: Box<ExpressionDocument>,
        #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
        result_type: Option<String>,
    },

    Function {
        name: String,
        #[serde(default)]
        arguments: ArgumentsDocument,
    },

    Comparison {
        operator: String,
        left: Box<ExpressionDocument>,
        right: Box<ExpressionDocument>,
        #[serde(default)]
        negated: bool,
    },

    Between {
        left: Box<ExpressionDocument>,
        lower: Box<ExpressionDocument>,
        upper: Box<ExpressionDocument>,
        #[serde(default)]
        negated: bool,
    },

    In {
        left: Box<ExpressionDocument>,
        items: Vec<ExpressionDocument>,
        #[serde(default)]
        negated: bool,
    },

    IsNull {
        operand: Box<ExpressionDocument>,
        #[serde(default)]
        negated: bool,
    },

    IsEmpty {
        operand: Box<ExpressionDocument>,
        #[serde(default)]
        negated: bool,
    },

    And {
        predicates: Vec<ExpressionDocument>,
        #[serde(default)]
        negated: bool,
    },

    Or {
        predicates: Vec<ExpressionDocument>,
        #[serde(default)]
        negated: bool,
    },

    /// A boolean-valued expression used as a predicate
    Predicate {
        expression: Box<ExpressionDocument>,
        #[serde(default)]
        negated: bool,
    },

    /// Logical NOT of any predicate
    Not { expression: Box<ExpressionDocument> },
}

impl ExpressionDocument {
    pub fn from_json(json: &str) -> ResolveResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<FilePath>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from_json(&content)?)
    }

    /// Resolve this document into an expression tree.
    ///
    /// Path aliases are typed by the root bindings of `context`.
    pub fn resolve(&self, model: &DomainModel, context: &Context) -> ResolveResult<Expression> {
        Resolver { model, context }.resolve(self)
    }
}

struct Resolver<'a> {
    model: &'a DomainModel,
    context: &'a Context,
}

impl Resolver<'_> {
    fn resolve(&self, document: &ExpressionDocument) -> ResolveResult<Expression> {
        match document {
            ExpressionDocument::Literal { value, type_name } => {
                self.literal(value, type_name.as_deref())
            }

            ExpressionDocument::Collection {
                items,
                element_type,
            } => {
                let items = self.resolve_all(items)?;
                let element = match element_type {
                    Some(name) => self.model.require_type(name)?,
                    None => match items.first() {
                        Some(item) => item.domain_type().clone(),
                        None => return Err(ResolveError::UntypedLiteral("()".to_string())),
                    },
                };
                let collection = self.collection_type(&element)?;
                Ok(Expression::collection(&collection, items))
            }

            ExpressionDocument::Path { alias, attributes } => {
                let root_type = self
                    .context
                    .root_type(alias)
                    .ok_or_else(|| ResolveError::UnknownAlias(alias.clone()))?;
                if attributes.is_empty() {
                    return Ok(Expression::path(Path::root(alias.clone(), root_type)));
                }
                Ok(Expression::path(Path::resolve(
                    alias.clone(),
                    root_type,
                    attributes,
                )?))
            }

            ExpressionDocument::Negative { expression } => {
                Ok(Expression::negative(self.resolve(expression)?))
            }

            ExpressionDocument::Arithmetic {
                operator,
                left,
                right,
                result_type,
            } => {
                let operator = ArithmeticOperator::from_symbol(operator)
                    .ok_or_else(|| ResolveError::UnknownOperator(operator.clone()))?;
                let left = self.resolve(left)?;
                let right = self.resolve(right)?;
                let result_type = match result_type {
                    Some(name) => self.model.require_type(name)?,
                    None => self.arithmetic_type(left.domain_type(), right.domain_type())?,
                };
                Ok(Expression::arithmetic(&result_type, operator, left, right))
            }

            ExpressionDocument::Function { name, arguments } => {
                let function = self.model.require_function(name)?;
                let invocation = match arguments {
                    ArgumentsDocument::Positional(arguments) => {
                        FunctionInvocation::positional(function, self.resolve_all(arguments)?)?
                    }
                    ArgumentsDocument::Named(arguments) => {
                        let arguments = arguments
                            .iter()
                            .map(|(name, document)| Ok((name.as_str(), self.resolve(document)?)))
                            .collect::<ResolveResult<Vec<_>>>()?;
                        FunctionInvocation::named(function, arguments)?
                    }
                };
                Ok(Expression::function(invocation))
            }

            ExpressionDocument::Comparison {
                operator,
                left,
                right,
                negated,
            } => {
                let operator = ComparisonOperator::from_symbol(operator)
                    .ok_or_else(|| ResolveError::UnknownOperator(operator.clone()))?;
                let comparison = Expression::comparison(
                    &self.boolean()?,
                    operator,
                    self.resolve(left)?,
                    self.resolve(right)?,
                );
                Ok(negate_if(comparison, *negated))
            }

            ExpressionDocument::Between {
                left,
                lower,
                upper,
                negated,
            } => {
                let between = Expression::between(
                    &self.boolean()?,
                    self.resolve(left)?,
                    self.resolve(lower)?,
                    self.resolve(upper)?,
                );
                Ok(negate_if(between, *negated))
            }

            ExpressionDocument::In {
                left,
                items,
                negated,
            } => {
                let in_list = Expression::in_list(
                    &self.boolean()?,
                    self.resolve(left)?,
                    self.resolve_all(items)?,
                );
                Ok(negate_if(in_list, *negated))
            }

            ExpressionDocument::IsNull { operand, negated } => Ok(negate_if(
                Expression::is_null(&self.boolean()?, self.resolve(operand)?),
                *negated,
            )),

            ExpressionDocument::IsEmpty { operand, negated } => Ok(negate_if(
                Expression::is_empty(&self.boolean()?, self.resolve(operand)?),
                *negated,
            )),

            ExpressionDocument::And {
                predicates,
                negated,
            } => Ok(negate_if(
                Expression::and(&self.boolean()?, self.resolve_all(predicates)?),
                *negated,
            )),

            ExpressionDocument::Or {
                predicates,
                negated,
            } => Ok(negate_if(
                Expression::or(&self.boolean()?, self.resolve_all(predicates)?),
                *negated,
            )),

            ExpressionDocument::Predicate {
                expression,
                negated,
            } => Ok(negate_if(
                Expression::predicate(&self.boolean()?, self.resolve(expression)?),
                *negated,
            )),

            ExpressionDocument::Not { expression } => {
                let expression = self.resolve(expression)?;
                if expression.is_predicate() {
                    Ok(expression.negate())
                } else {
                    Ok(Expression::predicate(&self.boolean()?, expression).negate())
                }
            }
        }
    }

    fn resolve_all(&self, documents: &[ExpressionDocument]) -> ResolveResult<Vec<Expression>> {
        documents.iter().map(|document| self.resolve(document)).collect()
    }

    fn boolean(&self) -> ResolveResult<Arc<DomainType>> {
        Ok(self.model.require_type(BOOLEAN)?)
    }

    fn collection_type(&self, element: &DomainType) -> ResolveResult<Arc<DomainType>> {
        self.model
            .collection_type(element)
            .cloned()
            .ok_or_else(|| {
                DomainError::UnknownType(format!("Collection<{}>", element.name())).into()
            })
    }

    /// Result type of arithmetic without an explicit type: equal operand
    /// types are kept, INTEGER with NUMERIC widens to NUMERIC, TIME shifted by
    /// an INTERVAL stays TIME and anything added to a STRING is a STRING.
    fn arithmetic_type(
        &self,
        left: &Arc<DomainType>,
        right: &Arc<DomainType>,
    ) -> ResolveResult<Arc<DomainType>> {
        let name = match (left.name(), right.name()) {
            (l, r) if l == r => return Ok(left.clone()),
            (INTEGER, NUMERIC) | (NUMERIC, INTEGER) => NUMERIC,
            (TIME, INTERVAL) | (INTERVAL, TIME) => TIME,
            (STRING, _) | (_, STRING) => STRING,
            _ => return Ok(left.clone()),
        };
        Ok(self.model.require_type(name)?)
    }

    fn literal(
        &self,
        json: &serde_json::Value,
        type_name: Option<&str>,
    ) -> ResolveResult<Expression> {
        if let serde_json::Value::Array(items) = json {
            return self.collection_literal(items, type_name);
        }

        let domain_type = match type_name {
            Some(name) => self.model.require_type(name)?,
            None => self.model.require_type(infer_type_name(json)?)?,
        };
        let value = literal_value(json, &domain_type)?;
        Ok(Expression::literal(&domain_type, value))
    }

    /// `type` names the element type of an array literal
    fn collection_literal(
        &self,
        items: &[serde_json::Value],
        element_type: Option<&str>,
    ) -> ResolveResult<Expression> {
        let element = match element_type {
            Some(name) => self.model.require_type(name)?,
            None => {
                let first = items
                    .iter()
                    .find(|item| !item.is_null())
                    .ok_or_else(|| ResolveError::UntypedLiteral(json_text(items)))?;
                self.model.require_type(infer_type_name(first)?)?
            }
        };
        let items = items
            .iter()
            .map(|item| Ok(Expression::literal(&element, literal_value(item, &element)?)))
            .collect::<ResolveResult<Vec<_>>>()?;
        let collection = self.collection_type(&element)?;
        Ok(Expression::collection(&collection, items))
    }
}

fn negate_if(expression: Expression, negated: bool) -> Expression {
    if negated {
        expression.negate()
    } else {
        expression
    }
}

fn json_text(items: &[serde_json::Value]) -> String {
    serde_json::Value::Array(items.to_vec()).to_string()
}

fn infer_type_name(json: &serde_json::Value) -> ResolveResult<&'static str> {
    match json {
        serde_json::Value::Bool(_) => Ok(BOOLEAN),
        serde_json::Value::Number(n) if n.is_i64() => Ok(INTEGER),
        serde_json::Value::Number(_) => Ok(NUMERIC),
        serde_json::Value::String(_) => Ok(STRING),
        other => Err(ResolveError::UntypedLiteral(other.to_string())),
    }
}

/// Convert a JSON literal into the value representation of `domain_type`
pub(crate) fn literal_value(
    json: &serde_json::Value,
    domain_type: &DomainType,
) -> ResolveResult<Value> {
    let invalid = |reason: &str| ResolveError::InvalidLiteral {
        value: json.to_string(),
        type_name: domain_type.name().to_string(),
        reason: reason.to_string(),
    };

    if json.is_null() {
        return Ok(Value::Null);
    }
    match (domain_type.name(), json) {
        (INTEGER, serde_json::Value::Number(n)) => n
            .as_i64()
            .map(Value::Integer)
            .ok_or_else(|| invalid("not an integer")),
        (NUMERIC, serde_json::Value::Number(n)) => n
            .as_f64()
            .map(Value::Numeric)
            .ok_or_else(|| invalid("not a number")),
        (STRING, serde_json::Value::String(s)) => Ok(Value::String(s.clone())),
        (BOOLEAN, serde_json::Value::Bool(b)) => Ok(Value::Boolean(*b)),
        (TIME, serde_json::Value::String(s)) => NaiveTime::parse_from_str(s, TIME_FORMAT)
            .map(Value::Time)
            .map_err(|e| invalid(&e.to_string())),
        (INTERVAL, serde_json::Value::Object(_)) => {
            serde_json::from_value::<TemporalInterval>(json.clone())
                .map(Value::Interval)
                .map_err(|e| invalid(&e.to_string()))
        }
        (INTEGER | NUMERIC | STRING | BOOLEAN | TIME | INTERVAL, _) => {
            Err(invalid("unexpected JSON type"))
        }
        _ if domain_type.kind() == DomainTypeKind::Enum => match json {
            serde_json::Value::String(s) if domain_type.enum_values().contains(s) => {
                Ok(Value::String(s.clone()))
            }
            _ => Err(invalid("not a constant of the enumeration")),
        },
        _ => Ok(Value::from(json.clone())),
    }
}
