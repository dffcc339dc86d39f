//! Error types for domain construction, document resolution and evaluation.

use thiserror::Error;

/// Errors that abort an evaluation.
///
/// The `Missing*` variants are configuration errors: the domain model lacks a
/// capability that the expression tree actually needs. The rest are value
/// errors raised by capability implementations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("No attribute accessor available for attribute: {attribute}")]
    MissingAttributeAccessor { attribute: String },

    #[error("No comparison operator interpreter available for type: {type_name}")]
    MissingComparisonInterpreter { type_name: String },

    #[error("No domain operator interpreter available for type: {type_name}")]
    MissingArithmeticInterpreter { type_name: String },

    #[error("No function invoker available for function: {function}")]
    MissingFunctionInvoker { function: String },

    #[error("Illegal arguments [{left}, {right}] for operator {operator}")]
    InvalidOperands {
        operator: String,
        left: String,
        right: String,
    },

    #[error("Can't handle the operator {operator} for type {type_name}")]
    UnsupportedOperator { operator: String, type_name: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Expected a collection but got {actual}")]
    NotACollection { actual: &'static str },

    #[error("Expected a boolean but got {actual}")]
    NotABoolean { actual: &'static str },

    #[error("Invalid argument '{argument}' for function {function}: {reason}")]
    InvalidArgument {
        function: String,
        argument: String,
        reason: String,
    },

    #[error("Cannot convert {actual} to {expected}")]
    Conversion {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Attribute '{attribute}' cannot be read from {actual}")]
    InvalidHost {
        attribute: String,
        actual: &'static str,
    },

    #[error("Evaluation error: {0}")]
    Other(String),
}

/// Result type for evaluation.
pub type EvaluationResult<T> = Result<T, EvaluationError>;

/// Errors raised while building a domain model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Type '{0}' is already defined")]
    DuplicateType(String),

    #[error("Function '{0}' is already defined")]
    DuplicateFunction(String),

    #[error("Unknown type '{0}'")]
    UnknownType(String),

    #[error("Unknown function '{0}'")]
    UnknownFunction(String),

    #[error("Type '{type_name}' has no attribute '{attribute}'")]
    UnknownAttribute { type_name: String, attribute: String },

    #[error("Function {function} expects {expected} arguments, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    #[error("Function {0} declares no result type")]
    MissingResultType(String),

    #[error("Function {function} has no argument '{argument}'")]
    UnknownArgument { function: String, argument: String },

    #[error("Argument '{argument}' of function {function} is given more than once")]
    DuplicateArgument { function: String, argument: String },
}

/// Result type for domain construction.
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors raised while turning an expression document into a tree.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Unknown alias '{0}'")]
    UnknownAlias(String),

    #[error("Unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("Cannot infer a type for literal {0}")]
    UntypedLiteral(String),

    #[error("Invalid literal {value} for type {type_name}: {reason}")]
    InvalidLiteral {
        value: String,
        type_name: String,
        reason: String,
    },

    #[error("Invalid expression document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for document resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EvaluationError::MissingAttributeAccessor {
            attribute: "Person.name".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No attribute accessor available for attribute: Person.name"
        );

        let err = EvaluationError::MissingComparisonInterpreter {
            type_name: "STRING".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No comparison operator interpreter available for type: STRING"
        );

        let err = EvaluationError::InvalidOperands {
            operator: "+".to_string(),
            left: "1".to_string(),
            right: "'a'".to_string(),
        };
        assert_eq!(err.to_string(), "Illegal arguments [1, 'a'] for operator +");

        let err = DomainError::ArgumentCount {
            function: "LENGTH".to_string(),
            expected: "1".to_string(),
            actual: 2,
        };
        assert_eq!(err.to_string(), "Function LENGTH expects 1 arguments, got 2");

        let err = ResolveError::from(DomainError::UnknownType("Foo".to_string()));
        assert_eq!(err.to_string(), "Unknown type 'Foo'");
    }
}
