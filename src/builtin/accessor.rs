//! Attribute access for object values.

use crate::domain::EntityAttribute;
use crate::error::{EvaluationError, EvaluationResult};
use crate::spi::AttributeAccessor;
use crate::value::Value;

/// Reads the field named like the attribute from a `Value::Object`.
/// A missing field has no value.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldAccessor;

impl AttributeAccessor for FieldAccessor {
    fn access(&self, host: &Value, attribute: &EntityAttribute) -> EvaluationResult<Value> {
        match host {
            Value::Object(fields) => Ok(fields.get(attribute.name()).cloned().unwrap_or_default()),
            other => Err(EvaluationError::InvalidHost {
                attribute: attribute.to_string(),
                actual: other.kind_name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainType;
    use std::sync::Arc;

    #[test]
    fn test_field_access() {
        let string = Arc::new(DomainType::basic("STRING"));
        let name = EntityAttribute::new("name", string.clone());
        let email = EntityAttribute::new("email", string);
        let host = Value::object([("name", Value::from("Alice"))]);

        assert_eq!(
            FieldAccessor.access(&host, &name).unwrap(),
            Value::from("Alice")
        );
        assert_eq!(FieldAccessor.access(&host, &email).unwrap(), Value::Null);
        assert!(matches!(
            FieldAccessor.access(&Value::Integer(1), &name),
            Err(EvaluationError::InvalidHost {
                actual: "INTEGER",
                ..
            })
        ));
    }
}
