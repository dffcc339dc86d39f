//! Expression trees and their evaluation.
//!
//! This module provides:
//! - The expression tree (`Expression` and its node payloads)
//! - Comparison and arithmetic operators
//! - The evaluation `Context`
//! - The tree-walking `ExpressionInterpreter`

pub mod context;
pub mod expr;
pub mod interpreter;
pub mod operator;

pub use context::Context;
pub use expr::{Expression, FunctionInvocation, Literal, LiteralValue, Path};
pub use interpreter::ExpressionInterpreter;
pub use operator::{ArithmeticOperator, ComparisonOperator, DomainOperator};
