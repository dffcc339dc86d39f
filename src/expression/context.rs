//! Evaluation context: root alias bindings and a property bag.

use crate::domain::DomainType;
use crate::value::Value;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Bindings and scratch state for one logical evaluation session.
///
/// The alias maps are fixed at construction. The property bag can be written
/// through a shared reference so that capabilities receiving `&Context` can
/// use it; it is scoped to this context instance and has no predefined keys.
#[derive(Debug, Default)]
pub struct Context {
    root_types: HashMap<String, Arc<DomainType>>,
    root_objects: HashMap<String, Value>,
    properties: RwLock<HashMap<String, Value>>,
}

impl Context {
    pub fn new(
        root_types: HashMap<String, Arc<DomainType>>,
        root_objects: HashMap<String, Value>,
    ) -> Self {
        Self {
            root_types,
            root_objects,
            properties: RwLock::new(HashMap::new()),
        }
    }

    /// Bind an alias to a declared type and host object
    pub fn with_root(
        mut self,
        alias: impl Into<String>,
        domain_type: Arc<DomainType>,
        object: impl Into<Value>,
    ) -> Self {
        let alias = alias.into();
        self.root_types.insert(alias.clone(), domain_type);
        self.root_objects.insert(alias, object.into());
        self
    }

    /// Host object bound to `alias`; `Value::Null` when nothing is bound
    pub fn root(&self, alias: &str) -> Value {
        self.root_objects.get(alias).cloned().unwrap_or(Value::Null)
    }

    /// Borrowing variant of [`Context::root`]
    pub fn root_ref(&self, alias: &str) -> Option<&Value> {
        self.root_objects.get(alias)
    }

    pub fn root_type(&self, alias: &str) -> Option<Arc<DomainType>> {
        self.root_types.get(alias).cloned()
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.root_types.keys().map(String::as_str)
    }

    pub fn property(&self, key: &str) -> Option<Value> {
        self.properties.read().get(key).cloned()
    }

    /// Store a property, returning the previous value
    pub fn set_property(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.properties.write().insert(key.into(), value.into())
    }

    pub fn remove_property(&self, key: &str) -> Option<Value> {
        self.properties.write().remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roots() {
        let person = Arc::new(DomainType::entity("Person", vec![]));
        let context = Context::default().with_root(
            "p",
            person.clone(),
            Value::object([("name", Value::from("Alice"))]),
        );

        assert_eq!(context.root_type("p").unwrap().name(), "Person");
        assert!(matches!(context.root("p"), Value::Object(_)));
        assert_eq!(context.root("q"), Value::Null);
        assert!(context.root_type("q").is_none());

        // A bound alias may still hold no object
        let context = Context::default().with_root("p", person, Value::Null);
        assert_eq!(context.root("p"), Value::Null);
        assert!(context.root_type("p").is_some());
    }

    #[test]
    fn test_properties() {
        let context = Context::default();
        assert_eq!(context.property("locale"), None);
        assert_eq!(context.set_property("locale", "de"), None);
        assert_eq!(context.property("locale"), Some(Value::from("de")));
        assert_eq!(
            context.set_property("locale", "en"),
            Some(Value::from("de"))
        );
        assert_eq!(context.remove_property("locale"), Some(Value::from("en")));
        assert_eq!(context.property("locale"), None);
    }
}
