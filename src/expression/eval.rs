//! Filter-expression evaluation.
//!
//! Folds the token stream of one filter string into a boolean decision for
//! one record: at most one operator and two operands, first-seen-fills-first,
//! dispatched by the operator's arity class.

use crate::expression::error::{ExpressionError, ExpressionResult};
use crate::expression::lexer::Lexer;
use crate::expression::operator::{Arity, OperatorRegistry};
use crate::expression::token::Token;
use crate::record::{Record, Value};
use std::collections::BTreeSet;

/// Evaluator for filter expressions against single records.
///
/// Holds no per-record state; one evaluator serves a whole query.
pub struct FilterEvaluator<'a> {
    registry: &'a OperatorRegistry,
    field_universe: &'a BTreeSet<String>,
}

impl<'a> FilterEvaluator<'a> {
    pub fn new(registry: &'a OperatorRegistry, field_universe: &'a BTreeSet<String>) -> Self {
        Self {
            registry,
            field_universe,
        }
    }

    /// Evaluate a filter string against one record
    pub fn evaluate(&self, filter: &str, record: &Record) -> ExpressionResult<bool> {
        let mut operator: Option<String> = None;
        let mut operand1: Option<Value> = None;
        let mut operand2: Option<Value> = None;

        let mut lexer = Lexer::new(filter, self.registry, self.field_universe);
        while let Some(token) = lexer.next_token() {
            let value = match token {
                Token::Skip => continue,
                Token::Operator(symbol) => {
                    if operator.is_some() {
                        return Err(self.malformed(filter, "more than one operator"));
                    }
                    operator = Some(symbol);
                    continue;
                }
                // Absent fields resolve to Null before slot assignment, so a
                // missing field still occupies an operand slot.
                Token::Field(name) => record.get(&name),
                Token::Int(raw) => self.parse_int(filter, &raw)?,
                Token::Float(raw) => self.parse_float(filter, &raw)?,
                Token::Bool(raw) => Value::Bool(matches!(raw.as_str(), "True" | "true")),
            };

            if operand1.is_none() {
                operand1 = Some(value);
            } else if operand2.is_none() {
                operand2 = Some(value);
            } else {
                return Err(self.malformed(filter, "more than two operands"));
            }
        }

        let symbol = match operator {
            // No operator: the filter is a bare truthiness test, and an
            // empty or whitespace-only filter passes every record.
            None => {
                return Ok(operand1.map_or(true, |v| v.is_truthy()));
            }
            Some(symbol) => symbol,
        };

        let op = self.registry.resolve(&symbol)?;
        let result = match op.arity() {
            Arity::Unary => {
                if operand2.is_some() {
                    return Err(self.malformed(filter, "unary operator given two operands"));
                }
                let operand = operand1
                    .ok_or_else(|| self.malformed(filter, "unary operator missing its operand"))?;
                op.apply_unary(&operand)?
            }
            Arity::Binary => {
                let (left, right) = self.both(filter, operand1, operand2)?;
                op.apply_binary(&left, &right)?
            }
            Arity::ReversedBinary => {
                let (left, right) = self.both(filter, operand1, operand2)?;
                op.apply_binary(&right, &left)?
            }
        };

        Ok(result.is_truthy())
    }

    fn both(
        &self,
        filter: &str,
        operand1: Option<Value>,
        operand2: Option<Value>,
    ) -> ExpressionResult<(Value, Value)> {
        match (operand1, operand2) {
            (Some(left), Some(right)) => Ok((left, right)),
            _ => Err(self.malformed(filter, "binary operator requires two operands")),
        }
    }

    fn parse_int(&self, filter: &str, raw: &str) -> ExpressionResult<Value> {
        // The grammar allows a trailing dot: "5." is the integer 5
        let digits = raw.strip_suffix('.').unwrap_or(raw);
        digits
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| self.malformed(filter, &format!("integer literal out of range: {}", raw)))
    }

    fn parse_float(&self, filter: &str, raw: &str) -> ExpressionResult<Value> {
        raw.parse::<f64>()
            .map(Value::Float)
            .map_err(|_| self.malformed(filter, &format!("bad float literal: {}", raw)))
    }

    fn malformed(&self, filter: &str, reason: &str) -> ExpressionError {
        ExpressionError::MalformedExpression {
            filter: filter.to_string(),
            reason: reason.to_string(),
        }
    }
}
