//! Domain model: declared types, entity attributes, functions and the
//! capability slots attached to each of them.
//!
//! The interpreter only reads from the model. Capabilities are resolved when
//! the model is built, so a tree node holds direct references to everything it
//! needs at evaluation time.

pub mod domain_type;
pub mod function;
pub mod model;

pub use domain_type::{DomainType, DomainTypeKind, EntityAttribute, TypeCapabilities};
pub use function::{DomainFunction, FunctionArgument};
pub use model::{DomainBuilder, DomainModel};
