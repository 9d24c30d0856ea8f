//! Filter-expression mini-language.
//!
//! This module provides:
//! - The operator registry (symbols, arity classes, semantics)
//! - A lexer that turns a filter string into typed tokens
//! - An evaluator that folds tokens into a boolean per record

pub mod error;
pub mod eval;
pub mod lexer;
pub mod operator;
pub mod token;

pub use error::{ExpressionError, ExpressionResult};
pub use eval::FilterEvaluator;
pub use lexer::Lexer;
pub use operator::{Arity, Operator, OperatorRegistry};
pub use token::Token;
