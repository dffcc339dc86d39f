//! Builtin types, operator handlers, accessors and functions.
//!
//! [`standard_domain`] returns a builder preloaded with the basic types and
//! functions; callers add their entity types on top of it.

pub mod accessor;
pub mod boolean;
pub mod enumeration;
pub mod functions;
pub mod numeric;
pub mod string;
pub mod time;

pub use accessor::FieldAccessor;
pub use boolean::BooleanOperatorHandler;
pub use enumeration::EnumOperatorHandler;
pub use functions::{LengthFunction, LocateFunction, RandomFunction};
pub use numeric::NumericOperatorHandler;
pub use string::StringOperatorHandler;
pub use time::TimeOperatorHandler;

use crate::domain::{DomainBuilder, DomainType};
use crate::error::{DomainResult, EvaluationError};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

pub const INTEGER: &str = "INTEGER";
pub const NUMERIC: &str = "NUMERIC";
pub const STRING: &str = "STRING";
pub const BOOLEAN: &str = "BOOLEAN";
pub const TIME: &str = "TIME";
pub const INTERVAL: &str = "INTERVAL";

/// Create a builder holding the basic types, their collection types and the
/// LENGTH, LOCATE and RANDOM functions.
pub fn standard_domain() -> DomainResult<DomainBuilder> {
    let mut builder = DomainBuilder::new();

    let numeric_handler = Arc::new(NumericOperatorHandler);
    let string_handler = Arc::new(StringOperatorHandler);
    let time_handler = Arc::new(TimeOperatorHandler);

    let integer = builder.add_type(
        DomainType::basic(INTEGER)
            .with_comparison(numeric_handler.clone())
            .with_arithmetic(numeric_handler.clone()),
    )?;
    let numeric = builder.add_type(
        DomainType::basic(NUMERIC)
            .with_comparison(numeric_handler.clone())
            .with_arithmetic(numeric_handler),
    )?;
    let string = builder.add_type(
        DomainType::basic(STRING)
            .with_comparison(string_handler.clone())
            .with_arithmetic(string_handler),
    )?;
    let boolean = builder
        .add_type(DomainType::basic(BOOLEAN).with_comparison(Arc::new(BooleanOperatorHandler)))?;
    let time = builder.add_type(
        DomainType::basic(TIME)
            .with_comparison(time_handler.clone())
            .with_arithmetic(time_handler.clone()),
    )?;
    let interval = builder.add_type(
        DomainType::basic(INTERVAL)
            .with_comparison(time_handler.clone())
            .with_arithmetic(time_handler),
    )?;

    for basic in [&integer, &numeric, &string, &boolean, &time, &interval] {
        builder.collection_of(basic);
    }

    LengthFunction::add_function(&mut builder, &string, &integer)?;
    LocateFunction::add_function(&mut builder, &string, &integer)?;
    RandomFunction::add_function(&mut builder, &numeric)?;

    Ok(builder)
}

/// Error for operand values a handler cannot work with
pub(crate) fn invalid_operands(
    operator: impl fmt::Display,
    left: &Value,
    right: &Value,
) -> EvaluationError {
    EvaluationError::InvalidOperands {
        operator: operator.to_string(),
        left: left.to_string(),
        right: right.to_string(),
    }
}

/// Error for an operator a handler does not implement
pub(crate) fn unsupported_operator(
    operator: impl fmt::Display,
    domain_type: &DomainType,
) -> EvaluationError {
    EvaluationError::UnsupportedOperator {
        operator: operator.to_string(),
        type_name: domain_type.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainTypeKind;

    #[test]
    fn test_standard_domain_contents() {
        let model = standard_domain().unwrap().build();

        for name in [INTEGER, NUMERIC, STRING, BOOLEAN, TIME, INTERVAL] {
            let domain_type = model.domain_type(name).unwrap();
            assert_eq!(domain_type.kind(), DomainTypeKind::Basic);
            assert!(domain_type.comparison().is_some(), "{} comparison", name);
            assert!(model.collection_type(domain_type).is_some());
        }
        assert!(model.domain_type(BOOLEAN).unwrap().arithmetic().is_none());

        let locate = model.function("locate").unwrap();
        assert_eq!(locate.min_arguments(), 2);
        assert_eq!(locate.max_arguments(), 3);
        assert_eq!(locate.result_type().unwrap().name(), INTEGER);
        assert!(model.function("LENGTH").unwrap().invoker().is_some());
        assert_eq!(
            model.function("RANDOM").unwrap().result_type().unwrap().name(),
            NUMERIC
        );
    }
}
