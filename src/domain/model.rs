//! The domain model registry and its builder.

use crate::domain::domain_type::collection_type_name;
use crate::domain::{DomainFunction, DomainType};
use crate::error::{DomainError, DomainResult};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable registry of the types and functions expressions may reference.
#[derive(Debug, Default)]
pub struct DomainModel {
    types: HashMap<String, Arc<DomainType>>,
    functions: HashMap<String, Arc<DomainFunction>>,
}

impl DomainModel {
    pub fn domain_type(&self, name: &str) -> Option<&Arc<DomainType>> {
        self.types.get(name)
    }

    /// Look up a type, failing with [`DomainError::UnknownType`]
    pub fn require_type(&self, name: &str) -> DomainResult<Arc<DomainType>> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| DomainError::UnknownType(name.to_string()))
    }

    /// Collection type registered for `element`, if any
    pub fn collection_type(&self, element: &DomainType) -> Option<&Arc<DomainType>> {
        self.types.get(&collection_type_name(element.name()))
    }

    /// Functions are looked up case-insensitively, as in SQL.
    pub fn function(&self, name: &str) -> Option<&Arc<DomainFunction>> {
        self.functions.get(&name.to_uppercase())
    }

    pub fn require_function(&self, name: &str) -> DomainResult<Arc<DomainFunction>> {
        self.function(name)
            .cloned()
            .ok_or_else(|| DomainError::UnknownFunction(name.to_string()))
    }

    pub fn types(&self) -> impl Iterator<Item = &Arc<DomainType>> {
        self.types.values()
    }

    pub fn functions(&self) -> impl Iterator<Item = &Arc<DomainFunction>> {
        self.functions.values()
    }
}

/// Collects types and functions and produces a [`DomainModel`].
///
/// Types must be added before the entities, collections and functions that
/// reference them.
#[derive(Debug, Default)]
pub struct DomainBuilder {
    model: DomainModel,
}

impl DomainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type and return the shared handle used to reference it
    pub fn add_type(&mut self, domain_type: DomainType) -> DomainResult<Arc<DomainType>> {
        let name = domain_type.name().to_string();
        if self.model.types.contains_key(&name) {
            return Err(DomainError::DuplicateType(name));
        }
        debug!("registering type {} ({:?})", name, domain_type.kind());
        let domain_type = Arc::new(domain_type);
        self.model.types.insert(name, domain_type.clone());
        Ok(domain_type)
    }

    /// Return the collection type for `element`, registering it on first use
    pub fn collection_of(&mut self, element: &Arc<DomainType>) -> Arc<DomainType> {
        let name = collection_type_name(element.name());
        self.model
            .types
            .entry(name)
            .or_insert_with(|| Arc::new(DomainType::collection(element.clone())))
            .clone()
    }

    pub fn add_function(&mut self, function: DomainFunction) -> DomainResult<Arc<DomainFunction>> {
        let key = function.name().to_uppercase();
        if self.model.functions.contains_key(&key) {
            return Err(DomainError::DuplicateFunction(function.name().to_string()));
        }
        debug!(
            "registering function {} with {} arguments",
            function.name(),
            function.arity()
        );
        let function = Arc::new(function);
        self.model.functions.insert(key, function.clone());
        Ok(function)
    }

    pub fn get_type(&self, name: &str) -> DomainResult<Arc<DomainType>> {
        self.model.require_type(name)
    }

    pub fn get_function(&self, name: &str) -> DomainResult<Arc<DomainFunction>> {
        self.model.require_function(name)
    }

    pub fn build(self) -> DomainModel {
        self.model
    }
}
