//! File-based interpreter configuration.
//!
//! A configuration declares entity and enumeration types on top of the
//! builtin ones and binds root aliases to host objects:
//!
//! ```json
//! {
//!   "entities": {
//!     "Address": { "city": "STRING" },
//!     "Person": { "name": "STRING", "address": "Address", "tags": "Collection<STRING>" }
//!   },
//!   "roots": {
//!     "p": { "type": "Person", "value": { "name": "Alice", "tags": [] } }
//!   }
//! }
//! ```
//!
//! Entity attributes are read with [`FieldAccessor`]. Entities may reference
//! each other in any declaration order but not in cycles.

use crate::builtin::{standard_domain, EnumOperatorHandler, FieldAccessor};
use crate::document::literal_value;
use crate::domain::{DomainBuilder, DomainModel, DomainType, DomainTypeKind, EntityAttribute};
use crate::error::{DomainError, DomainResult, ResolveError, ResolveResult};
use crate::expression::Context;
use crate::value::Value;
use anyhow::Context as _;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

/// A root alias with its declared type and host object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootBinding {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Entity name -> attribute name -> type name
    pub entities: BTreeMap<String, BTreeMap<String, String>>,
    /// Enumeration name -> constants
    pub enums: BTreeMap<String, Vec<String>>,
    pub roots: BTreeMap<String, RootBinding>,
}

impl InterpreterConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Build the standard domain extended with the configured types
    pub fn build_domain(&self) -> DomainResult<DomainModel> {
        let mut builder = standard_domain()?;
        let enum_handler = Arc::new(EnumOperatorHandler);
        for (name, values) in &self.enums {
            let enumeration = builder.add_type(
                DomainType::enumeration(name.clone(), values.iter().cloned())
                    .with_comparison(enum_handler.clone()),
            )?;
            builder.collection_of(&enumeration);
        }

        let mut pending: Vec<_> = self.entities.iter().collect();
        while !pending.is_empty() {
            let before = pending.len();
            let mut blocked = Vec::new();
            for (name, attributes) in pending {
                if attributes
                    .values()
                    .all(|type_name| resolve_type(&mut builder, type_name).is_ok())
                {
                    add_entity(&mut builder, name, attributes)?;
                } else {
                    blocked.push((name, attributes));
                }
            }
            if blocked.len() == before {
                // Nothing could be added: report the first unknown type
                let missing = blocked
                    .iter()
                    .flat_map(|(_, attributes)| attributes.values())
                    .find_map(|type_name| resolve_type(&mut builder, type_name).err())
                    .unwrap_or_else(|| DomainError::UnknownType(String::new()));
                return Err(missing);
            }
            pending = blocked;
        }

        Ok(builder.build())
    }

    /// Create a context binding every configured root.
    ///
    /// Host objects are converted along the declared types, so that a TIME
    /// attribute given as `"10:30:00"` holds a time value.
    pub fn create_context(&self, model: &DomainModel) -> ResolveResult<Context> {
        let mut root_types = HashMap::new();
        let mut root_objects = HashMap::new();
        for (alias, binding) in &self.roots {
            let domain_type = model.require_type(&binding.type_name)?;
            let value = host_value(&binding.value, &domain_type)?;
            debug!("binding root {} to {}", alias, domain_type);
            root_types.insert(alias.clone(), domain_type);
            root_objects.insert(alias.clone(), value);
        }
        Ok(Context::new(root_types, root_objects))
    }
}

/// Look up a type name, registering `Collection<X>` types on demand
fn resolve_type(builder: &mut DomainBuilder, type_name: &str) -> DomainResult<Arc<DomainType>> {
    match type_name
        .strip_prefix("Collection<")
        .and_then(|rest| rest.strip_suffix('>'))
    {
        Some(element) => {
            let element = resolve_type(builder, element)?;
            Ok(builder.collection_of(&element))
        }
        None => builder.get_type(type_name),
    }
}

fn add_entity(
    builder: &mut DomainBuilder,
    name: &str,
    attributes: &BTreeMap<String, String>,
) -> DomainResult<Arc<DomainType>> {
    let accessor = Arc::new(FieldAccessor);
    let attributes = attributes
        .iter()
        .map(|(attribute, type_name)| {
            let domain_type = resolve_type(builder, type_name)?;
            Ok(EntityAttribute::new(attribute.clone(), domain_type).with_accessor(accessor.clone()))
        })
        .collect::<DomainResult<Vec<_>>>()?;
    builder.add_type(DomainType::entity(name, attributes))
}

fn host_value(json: &serde_json::Value, domain_type: &DomainType) -> ResolveResult<Value> {
    match (domain_type.kind(), json) {
        (DomainTypeKind::Entity, serde_json::Value::Object(fields)) => {
            let mut object = BTreeMap::new();
            for (name, field) in fields {
                let value = match domain_type.attribute(name) {
                    Some(attribute) => host_value(field, attribute.domain_type())?,
                    None => Value::from(field.clone()),
                };
                object.insert(name.clone(), value);
            }
            Ok(Value::Object(object))
        }
        (DomainTypeKind::Collection, serde_json::Value::Array(items)) => {
            let element = domain_type.element_type().ok_or_else(|| {
                ResolveError::Domain(DomainError::UnknownType(domain_type.name().to_string()))
            })?;
            items
                .iter()
                .map(|item| host_value(item, element))
                .collect::<ResolveResult<Vec<_>>>()
                .map(Value::Collection)
        }
        _ => literal_value(json, domain_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ExpressionDocument;
    use crate::expression::ExpressionInterpreter;
    use chrono::NaiveTime;
    use serde_json::json;

    fn config() -> InterpreterConfig {
        serde_json::from_value(json!({
            "entities": {
                "Person": {
                    "name": "STRING",
                    "address": "Address",
                    "tags": "Collection<STRING>",
                    "color": "Color"
                },
                "Address": { "city": "STRING", "opens": "TIME" }
            },
            "enums": { "Color": ["RED", "GREEN"] },
            "roots": {
                "p": {
                    "type": "Person",
                    "value": {
                        "name": "Alice",
                        "address": { "city": "Berlin", "opens": "09:00:00" },
                        "tags": ["admin"],
                        "color": "RED"
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_build_domain_in_dependency_order() {
        let model = config().build_domain().unwrap();
        let person = model.domain_type("Person").unwrap();
        assert_eq!(person.kind(), DomainTypeKind::Entity);
        assert_eq!(
            person.attribute("address").unwrap().domain_type().name(),
            "Address"
        );
        assert!(person
            .attribute("tags")
            .unwrap()
            .domain_type()
            .is_collection());
        assert!(person.attribute("name").unwrap().accessor().is_some());
    }

    #[test]
    fn test_unknown_and_cyclic_types() {
        let unknown: InterpreterConfig = serde_json::from_value(json!({
            "entities": { "Person": { "pet": "Animal" } }
        }))
        .unwrap();
        assert_eq!(
            unknown.build_domain().unwrap_err(),
            DomainError::UnknownType("Animal".to_string())
        );

        let cyclic: InterpreterConfig = serde_json::from_value(json!({
            "entities": { "A": { "b": "B" }, "B": { "a": "A" } }
        }))
        .unwrap();
        assert!(matches!(
            cyclic.build_domain(),
            Err(DomainError::UnknownType(_))
        ));
    }

    #[test]
    fn test_create_context_converts_host_values() {
        let config = config();
        let model = config.build_domain().unwrap();
        let context = config.create_context(&model).unwrap();

        assert_eq!(context.root_type("p").unwrap().name(), "Person");
        let Value::Object(person) = context.root("p") else {
            panic!("expected an object");
        };
        let Some(Value::Object(address)) = person.get("address") else {
            panic!("expected an address");
        };
        assert_eq!(
            address.get("opens"),
            Some(&Value::Time(NaiveTime::from_hms_opt(9, 0, 0).unwrap()))
        );
        assert_eq!(
            person.get("tags"),
            Some(&Value::Collection(vec![Value::from("admin")]))
        );
    }

    #[test]
    fn test_compare_enum_attribute() {
        let config = config();
        let model = Arc::new(config.build_domain().unwrap());
        let context = config.create_context(&model).unwrap();
        let interpreter = ExpressionInterpreter::new(model.clone());
        let evaluate = |document: serde_json::Value| {
            let expression = ExpressionDocument::from_json(&document.to_string())
                .unwrap()
                .resolve(&model, &context)
                .unwrap();
            interpreter.evaluate(&expression, &context).unwrap()
        };
        let color = json!({"kind": "path", "alias": "p", "attributes": ["color"]});

        assert_eq!(
            evaluate(json!({
                "kind": "comparison",
                "operator": "=",
                "left": color,
                "right": {"kind": "literal", "value": "RED"}
            })),
            Value::Boolean(true)
        );
        assert_eq!(
            evaluate(json!({
                "kind": "comparison",
                "operator": "<",
                "left": color,
                "right": {"kind": "literal", "value": "GREEN", "type": "Color"}
            })),
            Value::Boolean(true)
        );
        assert_eq!(
            evaluate(json!({
                "kind": "in",
                "left": color,
                "items": [
                    {"kind": "literal", "value": "GREEN"},
                    {"kind": "literal", "value": "RED"}
                ]
            })),
            Value::Boolean(true)
        );
    }

    #[test]
    fn test_invalid_host_value() {
        let mut config = config();
        config.roots.insert(
            "q".to_string(),
            RootBinding {
                type_name: "Address".to_string(),
                value: json!({ "opens": "nine" }),
            },
        );
        let model = config.build_domain().unwrap();
        assert!(matches!(
            config.create_context(&model),
            Err(ResolveError::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn test_evaluate_against_config() {
        let config = config();
        let model = Arc::new(config.build_domain().unwrap());
        let context = config.create_context(&model).unwrap();
        let interpreter = ExpressionInterpreter::new(model.clone());

        let document = ExpressionDocument::from_json(
            r#"{
                "kind": "comparison",
                "operator": "<",
                "left": {"kind": "path", "alias": "p", "attributes": ["address", "opens"]},
                "right": {"kind": "literal", "value": "10:00:00", "type": "TIME"}
            }"#,
        )
        .unwrap();
        let expression = document.resolve(&model, &context).unwrap();
        assert!(interpreter.evaluate_predicate(&expression, &context).unwrap());
    }
}
