//! Typed SQL-style expression interpreter.
//!
//! Expression trees are built against a [`domain::DomainModel`] whose types,
//! attributes and functions carry pluggable capabilities (comparison and
//! arithmetic semantics, attribute accessors, function invokers and value
//! adapters). [`expression::ExpressionInterpreter`] walks the trees with SQL
//! three-valued logic.

pub mod builtin;
pub mod config;
pub mod document;
pub mod domain;
pub mod error;
pub mod expression;
pub mod spi;
pub mod value;
