//! Functions and their arguments.

use crate::domain::DomainType;
use crate::spi::{FunctionInvoker, TypeAdapter};
use std::fmt;
use std::sync::Arc;

/// A positional, named argument of a [`DomainFunction`].
#[derive(Debug)]
pub struct FunctionArgument {
    name: String,
    position: usize,
    domain_type: Arc<DomainType>,
    adapter: Option<Arc<dyn TypeAdapter>>,
}

impl FunctionArgument {
    pub fn new(name: impl Into<String>, domain_type: Arc<DomainType>) -> Self {
        Self {
            name: name.into(),
            position: 0,
            domain_type,
            adapter: None,
        }
    }

    pub fn with_adapter(mut self, adapter: Arc<dyn TypeAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn domain_type(&self) -> &Arc<DomainType> {
        &self.domain_type
    }

    pub fn adapter(&self) -> Option<&Arc<dyn TypeAdapter>> {
        self.adapter.as_ref()
    }
}

impl PartialEq for FunctionArgument {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.name == other.name
    }
}

/// A function declared by the domain model.
#[derive(Debug)]
pub struct DomainFunction {
    name: String,
    arguments: Vec<Arc<FunctionArgument>>,
    min_arguments: Option<usize>,
    result_type: Option<Arc<DomainType>>,
    invoker: Option<Arc<dyn FunctionInvoker>>,
    result_adapter: Option<Arc<dyn TypeAdapter>>,
}

impl DomainFunction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            min_arguments: None,
            result_type: None,
            invoker: None,
            result_adapter: None,
        }
    }

    /// Append an argument; its position is its index in declaration order.
    pub fn with_argument(mut self, mut argument: FunctionArgument) -> Self {
        argument.position = self.arguments.len();
        self.arguments.push(Arc::new(argument));
        self
    }

    /// Allow trailing arguments to be omitted down to `count`.
    pub fn with_min_arguments(mut self, count: usize) -> Self {
        self.min_arguments = Some(count);
        self
    }

    pub fn with_result_type(mut self, result_type: Arc<DomainType>) -> Self {
        self.result_type = Some(result_type);
        self
    }

    pub fn with_invoker(mut self, invoker: Arc<dyn FunctionInvoker>) -> Self {
        self.invoker = Some(invoker);
        self
    }

    pub fn with_result_adapter(mut self, adapter: Arc<dyn TypeAdapter>) -> Self {
        self.result_adapter = Some(adapter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[Arc<FunctionArgument>] {
        &self.arguments
    }

    pub fn argument(&self, position: usize) -> Option<&Arc<FunctionArgument>> {
        self.arguments.get(position)
    }

    pub fn argument_by_name(&self, name: &str) -> Option<&Arc<FunctionArgument>> {
        self.arguments.iter().find(|a| a.name() == name)
    }

    pub fn min_arguments(&self) -> usize {
        self.min_arguments.unwrap_or(self.arguments.len())
    }

    pub fn max_arguments(&self) -> usize {
        self.arguments.len()
    }

    pub fn result_type(&self) -> Option<&Arc<DomainType>> {
        self.result_type.as_ref()
    }

    pub fn invoker(&self) -> Option<&Arc<dyn FunctionInvoker>> {
        self.invoker.as_ref()
    }

    pub fn result_adapter(&self) -> Option<&Arc<dyn TypeAdapter>> {
        self.result_adapter.as_ref()
    }

    /// Human readable argument count bounds, e.g. `"2..3"`
    pub(crate) fn arity(&self) -> String {
        if self.min_arguments() == self.max_arguments() {
            self.max_arguments().to_string()
        } else {
            format!("{}..{}", self.min_arguments(), self.max_arguments())
        }
    }
}

impl PartialEq for DomainFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Display for DomainFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
