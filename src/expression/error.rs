//! Filter-expression error types.

use thiserror::Error;

/// Errors that can occur while evaluating a filter expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Unknown operator: {symbol}")]
    UnknownOperator { symbol: String },

    #[error("Malformed filter expression {filter:?}: {reason}")]
    MalformedExpression { filter: String, reason: String },

    #[error("Operator {operator:?} not supported for operands: left={left}, right={right}")]
    UnsupportedOperands {
        operator: String,
        left: &'static str,
        right: &'static str,
    },
}

/// Result type for filter-expression operations.
pub type ExpressionResult<T> = Result<T, ExpressionError>;
