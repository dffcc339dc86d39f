//! Expression tree definitions.

use crate::domain::{DomainFunction, DomainType, EntityAttribute, FunctionArgument};
use crate::error::{DomainError, DomainResult};
use crate::expression::operator::{ArithmeticOperator, ComparisonOperator};
use crate::value::Value;
use std::sync::Arc;

/// Payload of a literal
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A scalar constant
    Scalar(Value),
    /// A collection literal such as `(1, 2, 3)`; elements are expressions
    Collection(Vec<Expression>),
}

/// Literal value in an expression
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub domain_type: Arc<DomainType>,
    pub value: LiteralValue,
}

impl Literal {
    pub fn new(domain_type: Arc<DomainType>, value: impl Into<Value>) -> Self {
        Self {
            domain_type,
            value: LiteralValue::Scalar(value.into()),
        }
    }

    pub fn collection(domain_type: Arc<DomainType>, items: Vec<Expression>) -> Self {
        Self {
            domain_type,
            value: LiteralValue::Collection(items),
        }
    }
}

/// Attribute path rooted at an alias, e.g. `person.address.city`
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub domain_type: Arc<DomainType>,
    pub alias: String,
    pub attributes: Vec<Arc<EntityAttribute>>,
}

impl Path {
    /// A bare alias without attribute steps
    pub fn root(alias: impl Into<String>, root_type: Arc<DomainType>) -> Self {
        Self {
            domain_type: root_type,
            alias: alias.into(),
            attributes: Vec::new(),
        }
    }

    /// Resolve attribute names step by step, starting at `root_type`.
    /// The path's type is the type of its last attribute.
    pub fn resolve<S: AsRef<str>>(
        alias: impl Into<String>,
        root_type: Arc<DomainType>,
        attribute_names: &[S],
    ) -> DomainResult<Self> {
        let mut current = root_type;
        let mut attributes = Vec::with_capacity(attribute_names.len());
        for name in attribute_names {
            let name = name.as_ref();
            let attribute = current
                .attribute(name)
                .cloned()
                .ok_or_else(|| DomainError::UnknownAttribute {
                    type_name: current.name().to_string(),
                    attribute: name.to_string(),
                })?;
            current = attribute.domain_type().clone();
            attributes.push(attribute);
        }
        Ok(Self {
            domain_type: current,
            alias: alias.into(),
            attributes,
        })
    }
}

/// Invocation of a domain function with arguments bound by declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionInvocation {
    pub domain_type: Arc<DomainType>,
    pub function: Arc<DomainFunction>,
    pub arguments: Vec<(Arc<FunctionArgument>, Expression)>,
}

impl FunctionInvocation {
    /// Bind `arguments` to the function's arguments by position.
    pub fn positional(
        function: Arc<DomainFunction>,
        arguments: Vec<Expression>,
    ) -> DomainResult<Self> {
        check_arity(&function, arguments.len())?;
        let bound = function
            .arguments()
            .iter()
            .cloned()
            .zip(arguments)
            .collect();
        Self::with_bound_arguments(function, bound)
    }

    /// Bind arguments by name; the result keeps declaration order.
    pub fn named<S: AsRef<str>>(
        function: Arc<DomainFunction>,
        arguments: Vec<(S, Expression)>,
    ) -> DomainResult<Self> {
        check_arity(&function, arguments.len())?;
        let mut bound: Vec<(Arc<FunctionArgument>, Expression)> =
            Vec::with_capacity(arguments.len());
        for (name, expression) in arguments {
            let argument = function
                .argument_by_name(name.as_ref())
                .cloned()
                .ok_or_else(|| DomainError::UnknownArgument {
                    function: function.name().to_string(),
                    argument: name.as_ref().to_string(),
                })?;
            if bound
                .iter()
                .any(|(bound_argument, _)| bound_argument.position() == argument.position())
            {
                return Err(DomainError::DuplicateArgument {
                    function: function.name().to_string(),
                    argument: argument.name().to_string(),
                });
            }
            bound.push((argument, expression));
        }
        bound.sort_by_key(|(argument, _)| argument.position());
        Self::with_bound_arguments(function, bound)
    }

    fn with_bound_arguments(
        function: Arc<DomainFunction>,
        arguments: Vec<(Arc<FunctionArgument>, Expression)>,
    ) -> DomainResult<Self> {
        let domain_type = function
            .result_type()
            .cloned()
            .ok_or_else(|| DomainError::MissingResultType(function.name().to_string()))?;
        Ok(Self {
            domain_type,
            function,
            arguments,
        })
    }
}

fn check_arity(function: &DomainFunction, actual: usize) -> DomainResult<()> {
    if actual < function.min_arguments() || actual > function.max_arguments() {
        return Err(DomainError::ArgumentCount {
            function: function.name().to_string(),
            expected: function.arity(),
            actual,
        });
    }
    Ok(())
}

/// Expression tree node.
///
/// Every node carries its declared type. Predicate nodes carry the boolean
/// type of the domain and a negation flag.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),

    Path(Path),

    /// Unary sign applied to an arithmetic expression
    ArithmeticFactor {
        domain_type: Arc<DomainType>,
        expression: Box<Expression>,
        invert_signum: bool,
    },

    /// Binary arithmetic
    ChainingArithmetic {
        domain_type: Arc<DomainType>,
        operator: ArithmeticOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    FunctionInvocation(FunctionInvocation),

    Comparison {
        domain_type: Arc<DomainType>,
        operator: ComparisonOperator,
        left: Box<Expression>,
        right: Box<Expression>,
        negated: bool,
    },

    Between {
        domain_type: Arc<DomainType>,
        left: Box<Expression>,
        lower: Box<Expression>,
        upper: Box<Expression>,
        negated: bool,
    },

    In {
        domain_type: Arc<DomainType>,
        left: Box<Expression>,
        items: Vec<Expression>,
        negated: bool,
    },

    IsNull {
        domain_type: Arc<DomainType>,
        left: Box<Expression>,
        negated: bool,
    },

    IsEmpty {
        domain_type: Arc<DomainType>,
        left: Box<Expression>,
        negated: bool,
    },

    /// AND (`conjunction`) or OR over child predicates
    Compound {
        domain_type: Arc<DomainType>,
        conjunction: bool,
        predicates: Vec<Expression>,
        negated: bool,
    },

    /// A boolean-valued expression used as a predicate
    ExpressionPredicate {
        domain_type: Arc<DomainType>,
        expression: Box<Expression>,
        negated: bool,
    },
}

impl Expression {
    /// Create a scalar literal
    pub fn literal(domain_type: &Arc<DomainType>, value: impl Into<Value>) -> Self {
        Expression::Literal(Literal::new(domain_type.clone(), value))
    }

    /// Create a collection literal
    pub fn collection(domain_type: &Arc<DomainType>, items: Vec<Expression>) -> Self {
        Expression::Literal(Literal::collection(domain_type.clone(), items))
    }

    pub fn path(path: Path) -> Self {
        Expression::Path(path)
    }

    /// Create a unary minus over `expression`
    pub fn negative(expression: Expression) -> Self {
        Expression::ArithmeticFactor {
            domain_type: expression.domain_type().clone(),
            expression: Box::new(expression),
            invert_signum: true,
        }
    }

    /// Create a unary plus over `expression`
    pub fn positive(expression: Expression) -> Self {
        Expression::ArithmeticFactor {
            domain_type: expression.domain_type().clone(),
            expression: Box::new(expression),
            invert_signum: false,
        }
    }

    /// Create a binary arithmetic expression with an explicit result type
    pub fn arithmetic(
        domain_type: &Arc<DomainType>,
        operator: ArithmeticOperator,
        left: Expression,
        right: Expression,
    ) -> Self {
        Expression::ChainingArithmetic {
            domain_type: domain_type.clone(),
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn function(invocation: FunctionInvocation) -> Self {
        Expression::FunctionInvocation(invocation)
    }

    pub fn comparison(
        boolean: &Arc<DomainType>,
        operator: ComparisonOperator,
        left: Expression,
        right: Expression,
    ) -> Self {
        Expression::Comparison {
            domain_type: boolean.clone(),
            operator,
            left: Box::new(left),
            right: Box::new(right),
            negated: false,
        }
    }

    pub fn between(
        boolean: &Arc<DomainType>,
        left: Expression,
        lower: Expression,
        upper: Expression,
    ) -> Self {
        Expression::Between {
            domain_type: boolean.clone(),
            left: Box::new(left),
            lower: Box::new(lower),
            upper: Box::new(upper),
            negated: false,
        }
    }

    pub fn in_list(boolean: &Arc<DomainType>, left: Expression, items: Vec<Expression>) -> Self {
        Expression::In {
            domain_type: boolean.clone(),
            left: Box::new(left),
            items,
            negated: false,
        }
    }

    pub fn is_null(boolean: &Arc<DomainType>, left: Expression) -> Self {
        Expression::IsNull {
            domain_type: boolean.clone(),
            left: Box::new(left),
            negated: false,
        }
    }

    pub fn is_empty(boolean: &Arc<DomainType>, left: Expression) -> Self {
        Expression::IsEmpty {
            domain_type: boolean.clone(),
            left: Box::new(left),
            negated: false,
        }
    }

    /// Create a conjunction; an empty list is TRUE
    pub fn and(boolean: &Arc<DomainType>, predicates: Vec<Expression>) -> Self {
        Expression::Compound {
            domain_type: boolean.clone(),
            conjunction: true,
            predicates,
            negated: false,
        }
    }

    /// Create a disjunction; an empty list is FALSE
    pub fn or(boolean: &Arc<DomainType>, predicates: Vec<Expression>) -> Self {
        Expression::Compound {
            domain_type: boolean.clone(),
            conjunction: false,
            predicates,
            negated: false,
        }
    }

    /// Wrap a boolean-valued expression as a predicate
    pub fn predicate(boolean: &Arc<DomainType>, expression: Expression) -> Self {
        Expression::ExpressionPredicate {
            domain_type: boolean.clone(),
            expression: Box::new(expression),
            negated: false,
        }
    }

    /// Logical NOT of a predicate.
    ///
    /// Predicates flip their negation flag; any other expression is wrapped
    /// in a negated expression predicate, which requires a boolean result.
    pub fn negate(self) -> Self {
        match self {
            Expression::Comparison {
                domain_type,
                operator,
                left,
                right,
                negated,
            } => Expression::Comparison {
                domain_type,
                operator,
                left,
                right,
                negated: !negated,
            },
            Expression::Between {
                domain_type,
                left,
                lower,
                upper,
                negated,
            } => Expression::Between {
                domain_type,
                left,
                lower,
                upper,
                negated: !negated,
            },
            Expression::In {
                domain_type,
                left,
                items,
                negated,
            } => Expression::In {
                domain_type,
                left,
                items,
                negated: !negated,
            },
            Expression::IsNull {
                domain_type,
                left,
                negated,
            } => Expression::IsNull {
                domain_type,
                left,
                negated: !negated,
            },
            Expression::IsEmpty {
                domain_type,
                left,
                negated,
            } => Expression::IsEmpty {
                domain_type,
                left,
                negated: !negated,
            },
            Expression::Compound {
                domain_type,
                conjunction,
                predicates,
                negated,
            } => Expression::Compound {
                domain_type,
                conjunction,
                predicates,
                negated: !negated,
            },
            Expression::ExpressionPredicate {
                domain_type,
                expression,
                negated,
            } => Expression::ExpressionPredicate {
                domain_type,
                expression,
                negated: !negated,
            },
            other => {
                let domain_type = other.domain_type().clone();
                Expression::ExpressionPredicate {
                    domain_type,
                    expression: Box::new(other),
                    negated: true,
                }
            }
        }
    }

    /// The declared result type of this node
    pub fn domain_type(&self) -> &Arc<DomainType> {
        match self {
            Expression::Literal(literal) => &literal.domain_type,
            Expression::Path(path) => &path.domain_type,
            Expression::FunctionInvocation(invocation) => &invocation.domain_type,
            Expression::ArithmeticFactor { domain_type, .. }
            | Expression::ChainingArithmetic { domain_type, .. }
            | Expression::Comparison { domain_type, .. }
            | Expression::Between { domain_type, .. }
            | Expression::In { domain_type, .. }
            | Expression::IsNull { domain_type, .. }
            | Expression::IsEmpty { domain_type, .. }
            | Expression::Compound { domain_type, .. }
            | Expression::ExpressionPredicate { domain_type, .. } => domain_type,
        }
    }

    /// Whether this node is one of the predicate kinds
    pub fn is_predicate(&self) -> bool {
        matches!(
            self,
            Expression::Comparison { .. }
                | Expression::Between { .. }
                | Expression::In { .. }
                | Expression::IsNull { .. }
                | Expression::IsEmpty { .. }
                | Expression::Compound { .. }
                | Expression::ExpressionPredicate { .. }
        )
    }

    /// Short name of the node kind, used in log output
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Literal(_) => "literal",
            Expression::Path(_) => "path",
            Expression::ArithmeticFactor { .. } => "arithmetic factor",
            Expression::ChainingArithmetic { .. } => "arithmetic",
            Expression::FunctionInvocation(_) => "function invocation",
            Expression::Comparison { .. } => "comparison",
            Expression::Between { .. } => "between",
            Expression::In { .. } => "in",
            Expression::IsNull { .. } => "is null",
            Expression::IsEmpty { .. } => "is empty",
            Expression::Compound { .. } => "compound",
            Expression::ExpressionPredicate { .. } => "expression predicate",
        }
    }

    /// Check if this expression is a constant (contains no paths or function calls)
    pub fn is_constant(&self) -> bool {
        match self {
            Expression::Literal(literal) => match &literal.value {
                LiteralValue::Scalar(_) => true,
                LiteralValue::Collection(items) => items.iter().all(Expression::is_constant),
            },
            Expression::Path(_) | Expression::FunctionInvocation(_) => false,
            Expression::ArithmeticFactor { expression, .. }
            | Expression::ExpressionPredicate { expression, .. } => expression.is_constant(),
            Expression::ChainingArithmetic { left, right, .. }
            | Expression::Comparison { left, right, .. } => {
                left.is_constant() && right.is_constant()
            }
            Expression::Between {
                left, lower, upper, ..
            } => left.is_constant() && lower.is_constant() && upper.is_constant(),
            Expression::In { left, items, .. } => {
                left.is_constant() && items.iter().all(Expression::is_constant)
            }
            Expression::IsNull { left, .. } | Expression::IsEmpty { left, .. } => {
                left.is_constant()
            }
            Expression::Compound { predicates, .. } => {
                predicates.iter().all(Expression::is_constant)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityAttribute;

    fn types() -> (Arc<DomainType>, Arc<DomainType>) {
        (
            Arc::new(DomainType::basic("INTEGER")),
            Arc::new(DomainType::basic("BOOLEAN")),
        )
    }

    #[test]
    fn test_negate_flips_predicates() {
        let (integer, boolean) = types();
        let expr = Expression::comparison(
            &boolean,
            ComparisonOperator::Equal,
            Expression::literal(&integer, 1i64),
            Expression::literal(&integer, 1i64),
        );
        match expr.clone().negate() {
            Expression::Comparison { negated, .. } => assert!(negated),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(expr.clone().negate().negate(), expr);
    }

    #[test]
    fn test_negate_wraps_non_predicates() {
        let (_, boolean) = types();
        let expr = Expression::literal(&boolean, true).negate();
        match expr {
            Expression::ExpressionPredicate {
                negated,
                expression,
                ..
            } => {
                assert!(negated);
                assert!(matches!(*expression, Expression::Literal(_)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_path_resolution() {
        let (integer, _) = types();
        let address = Arc::new(DomainType::entity(
            "Address",
            vec![EntityAttribute::new("zip", integer.clone())],
        ));
        let person = Arc::new(DomainType::entity(
            "Person",
            vec![EntityAttribute::new("address", address)],
        ));

        let path = Path::resolve("p", person.clone(), &["address", "zip"]).unwrap();
        assert_eq!(path.attributes.len(), 2);
        assert_eq!(path.domain_type.name(), "INTEGER");

        let err = Path::resolve("p", person, &["age"]).unwrap_err();
        assert_eq!(
            err,
            DomainError::UnknownAttribute {
                type_name: "Person".to_string(),
                attribute: "age".to_string()
            }
        );
    }

    #[test]
    fn test_function_arity() {
        let (integer, _) = types();
        let function = Arc::new(
            DomainFunction::new("ABS")
                .with_argument(FunctionArgument::new("value", integer.clone()))
                .with_result_type(integer.clone()),
        );

        assert!(FunctionInvocation::positional(
            function.clone(),
            vec![Expression::literal(&integer, 1i64)]
        )
        .is_ok());
        assert!(matches!(
            FunctionInvocation::positional(function.clone(), vec![]),
            Err(DomainError::ArgumentCount { actual: 0, .. })
        ));
        assert!(matches!(
            FunctionInvocation::named(function, vec![("x", Expression::literal(&integer, 1i64))]),
            Err(DomainError::UnknownArgument { .. })
        ));
    }

    #[test]
    fn test_named_arguments_given_twice() {
        let (integer, _) = types();
        let function = Arc::new(
            DomainFunction::new("CLAMP")
                .with_argument(FunctionArgument::new("value", integer.clone()))
                .with_argument(FunctionArgument::new("limit", integer.clone()))
                .with_result_type(integer.clone()),
        );

        let invocation = FunctionInvocation::named(
            function.clone(),
            vec![
                ("limit", Expression::literal(&integer, 10i64)),
                ("value", Expression::literal(&integer, 1i64)),
            ],
        )
        .unwrap();
        assert_eq!(invocation.arguments[0].0.name(), "value");

        assert_eq!(
            FunctionInvocation::named(
                function,
                vec![
                    ("value", Expression::literal(&integer, 1i64)),
                    ("value", Expression::literal(&integer, 2i64)),
                ],
            )
            .unwrap_err(),
            DomainError::DuplicateArgument {
                function: "CLAMP".to_string(),
                argument: "value".to_string(),
            }
        );
    }

    #[test]
    fn test_is_constant() {
        let (integer, boolean) = types();
        let person = Arc::new(DomainType::entity("Person", vec![]));
        let constant = Expression::in_list(
            &boolean,
            Expression::literal(&integer, 1i64),
            vec![Expression::literal(&integer, 2i64)],
        );
        assert!(constant.is_constant());

        let with_path = Expression::is_null(&boolean, Expression::path(Path::root("p", person)));
        assert!(!with_path.is_constant());
    }
}
