//! Declared types and entity attributes.

use crate::spi::{ArithmeticInterpreter, AttributeAccessor, ComparisonInterpreter, TypeAdapter};
use std::fmt;
use std::sync::Arc;

/// Classification of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainTypeKind {
    Basic,
    Entity,
    Enum,
    Collection,
}

/// Capability slots of a type.
#[derive(Debug, Clone, Default)]
pub struct TypeCapabilities {
    pub comparison: Option<Arc<dyn ComparisonInterpreter>>,
    pub arithmetic: Option<Arc<dyn ArithmeticInterpreter>>,
}

/// A type declared by the domain model.
///
/// Types are shared through `Arc` by every node, attribute and argument that
/// uses them.
#[derive(Debug)]
pub struct DomainType {
    name: String,
    kind: DomainTypeKind,
    element_type: Option<Arc<DomainType>>,
    attributes: Vec<Arc<EntityAttribute>>,
    enum_values: Vec<String>,
    capabilities: TypeCapabilities,
}

impl DomainType {
    fn with_kind(name: impl Into<String>, kind: DomainTypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            element_type: None,
            attributes: Vec::new(),
            enum_values: Vec::new(),
            capabilities: TypeCapabilities::default(),
        }
    }

    /// Create a scalar type
    pub fn basic(name: impl Into<String>) -> Self {
        Self::with_kind(name, DomainTypeKind::Basic)
    }

    /// Create an entity type with the given attributes, in path order
    pub fn entity(name: impl Into<String>, attributes: Vec<EntityAttribute>) -> Self {
        let mut entity = Self::with_kind(name, DomainTypeKind::Entity);
        entity.attributes = attributes
            .into_iter()
            .map(|mut attribute| {
                attribute.owner = entity.name.clone();
                Arc::new(attribute)
            })
            .collect();
        entity
    }

    /// Create an enumeration type with the given constant names
    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut enumeration = Self::with_kind(name, DomainTypeKind::Enum);
        enumeration.enum_values = values.into_iter().map(Into::into).collect();
        enumeration
    }

    /// Create a collection type named `Collection<element>`
    pub fn collection(element_type: Arc<DomainType>) -> Self {
        let mut collection = Self::with_kind(
            collection_type_name(element_type.name()),
            DomainTypeKind::Collection,
        );
        collection.element_type = Some(element_type);
        collection
    }

    pub fn with_comparison(mut self, interpreter: Arc<dyn ComparisonInterpreter>) -> Self {
        self.capabilities.comparison = Some(interpreter);
        self
    }

    pub fn with_arithmetic(mut self, interpreter: Arc<dyn ArithmeticInterpreter>) -> Self {
        self.capabilities.arithmetic = Some(interpreter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DomainTypeKind {
        self.kind
    }

    pub fn is_collection(&self) -> bool {
        self.kind == DomainTypeKind::Collection
    }

    pub fn element_type(&self) -> Option<&Arc<DomainType>> {
        self.element_type.as_ref()
    }

    pub fn attributes(&self) -> &[Arc<EntityAttribute>] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Arc<EntityAttribute>> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    pub fn enum_values(&self) -> &[String] {
        &self.enum_values
    }

    pub fn capabilities(&self) -> &TypeCapabilities {
        &self.capabilities
    }

    pub fn comparison(&self) -> Option<&Arc<dyn ComparisonInterpreter>> {
        self.capabilities.comparison.as_ref()
    }

    pub fn arithmetic(&self) -> Option<&Arc<dyn ArithmeticInterpreter>> {
        self.capabilities.arithmetic.as_ref()
    }
}

/// Types are identified by name and kind within one domain model.
impl PartialEq for DomainType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.kind == other.kind
    }
}

impl fmt::Display for DomainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub(crate) fn collection_type_name(element: &str) -> String {
    format!("Collection<{}>", element)
}

/// One step of a path: a named attribute of an entity type.
#[derive(Debug)]
pub struct EntityAttribute {
    owner: String,
    name: String,
    domain_type: Arc<DomainType>,
    accessor: Option<Arc<dyn AttributeAccessor>>,
    adapter: Option<Arc<dyn TypeAdapter>>,
}

impl EntityAttribute {
    pub fn new(name: impl Into<String>, domain_type: Arc<DomainType>) -> Self {
        Self {
            owner: String::new(),
            name: name.into(),
            domain_type,
            accessor: None,
            adapter: None,
        }
    }

    pub fn with_accessor(mut self, accessor: Arc<dyn AttributeAccessor>) -> Self {
        self.accessor = Some(accessor);
        self
    }

    pub fn with_adapter(mut self, adapter: Arc<dyn TypeAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the entity type declaring this attribute
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn domain_type(&self) -> &Arc<DomainType> {
        &self.domain_type
    }

    pub fn accessor(&self) -> Option<&Arc<dyn AttributeAccessor>> {
        self.accessor.as_ref()
    }

    pub fn adapter(&self) -> Option<&Arc<dyn TypeAdapter>> {
        self.adapter.as_ref()
    }
}

impl PartialEq for EntityAttribute {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.name == other.name
    }
}

impl fmt::Display for EntityAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.owner.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.owner, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_attributes_know_their_owner() {
        let string = Arc::new(DomainType::basic("STRING"));
        let person = DomainType::entity(
            "Person",
            vec![
                EntityAttribute::new("name", string.clone()),
                EntityAttribute::new("email", string),
            ],
        );

        assert_eq!(person.kind(), DomainTypeKind::Entity);
        assert_eq!(person.attributes().len(), 2);
        let name = person.attribute("name").unwrap();
        assert_eq!(name.owner(), "Person");
        assert_eq!(name.to_string(), "Person.name");
        assert!(person.attribute("age").is_none());
    }

    #[test]
    fn test_collection_type() {
        let integer = Arc::new(DomainType::basic("INTEGER"));
        let collection = DomainType::collection(integer);
        assert!(collection.is_collection());
        assert_eq!(collection.name(), "Collection<INTEGER>");
        assert_eq!(collection.element_type().unwrap().name(), "INTEGER");
    }
}
