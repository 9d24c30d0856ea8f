//! Operator registry for filter expressions.

use crate::expression::error::{ExpressionError, ExpressionResult};
use crate::record::Value;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Arity class of an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// One operand
    Unary,
    /// Two operands, applied in the order they appear
    Binary,
    /// Two operands, applied with arguments swapped (containment test)
    ReversedBinary,
}

type UnaryFn = fn(&Value) -> ExpressionResult<Value>;
type BinaryFn = fn(&Value, &Value) -> ExpressionResult<Value>;

#[derive(Clone, Copy)]
enum OpFn {
    Unary(UnaryFn),
    Binary(BinaryFn),
}

/// A registered operator: symbol, arity class and semantic function
#[derive(Clone)]
pub struct Operator {
    symbol: String,
    arity: Arity,
    apply: OpFn,
}

impl Operator {
    pub fn unary(symbol: impl Into<String>, apply: UnaryFn) -> Self {
        Self {
            symbol: symbol.into(),
            arity: Arity::Unary,
            apply: OpFn::Unary(apply),
        }
    }

    pub fn binary(symbol: impl Into<String>, apply: BinaryFn) -> Self {
        Self {
            symbol: symbol.into(),
            arity: Arity::Binary,
            apply: OpFn::Binary(apply),
        }
    }

    pub fn reversed_binary(symbol: impl Into<String>, apply: BinaryFn) -> Self {
        Self {
            symbol: symbol.into(),
            arity: Arity::ReversedBinary,
            apply: OpFn::Binary(apply),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Apply to a single operand (Unary operators only)
    pub fn apply_unary(&self, operand: &Value) -> ExpressionResult<Value> {
        match self.apply {
            OpFn::Unary(f) => f(operand),
            OpFn::Binary(_) => unreachable!("constructors tie Unary arity to unary functions"),
        }
    }

    /// Apply to two operands; ReversedBinary swapping is the caller's concern
    pub fn apply_binary(&self, left: &Value, right: &Value) -> ExpressionResult<Value> {
        match self.apply {
            OpFn::Binary(f) => f(left, right),
            OpFn::Unary(_) => unreachable!("constructors tie Binary arity to binary functions"),
        }
    }
}

impl std::fmt::Debug for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operator")
            .field("symbol", &self.symbol)
            .field("arity", &self.arity)
            .finish()
    }
}

/// The table of supported operator symbols.
///
/// Built once and injected into the lexer and the evaluator. The lexer derives
/// its operator alternatives from `symbols_longest_first`, so the symbol set
/// lives in exactly one place.
#[derive(Debug, Clone)]
pub struct OperatorRegistry {
    ops: HashMap<String, Operator>,
}

impl OperatorRegistry {
    /// An empty registry; useful for building custom operator sets
    pub fn empty() -> Self {
        Self {
            ops: HashMap::new(),
        }
    }

    /// The standard operator set
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(Operator::unary("not", op_not));
        registry.register(Operator::reversed_binary("in", op_contains));
        registry.register(Operator::binary("is", op_is));
        registry.register(Operator::binary("is not", op_is_not));
        registry.register(Operator::binary("&", op_and));
        registry.register(Operator::binary("^", op_xor));
        registry.register(Operator::binary("|", op_or));
        registry.register(Operator::binary("<", op_lt));
        registry.register(Operator::binary("<=", op_le));
        registry.register(Operator::binary("==", op_eq));
        registry.register(Operator::binary("!=", op_ne));
        registry.register(Operator::binary(">=", op_ge));
        registry.register(Operator::binary(">", op_gt));
        registry
    }

    /// Register an operator, replacing any existing entry for its symbol
    pub fn register(&mut self, op: Operator) {
        self.ops.insert(op.symbol.clone(), op);
    }

    /// Look up an operator by symbol
    pub fn resolve(&self, symbol: &str) -> ExpressionResult<&Operator> {
        self.ops
            .get(symbol)
            .ok_or_else(|| ExpressionError::UnknownOperator {
                symbol: symbol.to_string(),
            })
    }

    /// Symbols ordered so overlapping prefixes match correctly.
    ///
    /// Longest symbols come first (`is not` before `is`, `<=` before `<`);
    /// equal lengths tie-break alphabetically to keep the order stable.
    pub fn symbols_longest_first(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.ops.keys().map(String::as_str).collect();
        symbols.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        symbols
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn op_not(v: &Value) -> ExpressionResult<Value> {
    Ok(Value::Bool(!v.is_truthy()))
}

/// Containment: list membership, substring, or object key lookup.
///
/// The first argument is the container; the evaluator passes the operands
/// swapped so that `a in b` tests membership of `a` within `b`.
fn op_contains(haystack: &Value, needle: &Value) -> ExpressionResult<Value> {
    match (haystack, needle) {
        (Value::List(items), _) => Ok(Value::Bool(items.iter().any(|v| v.loose_eq(needle)))),
        (Value::Str(s), Value::Str(sub)) => Ok(Value::Bool(s.contains(sub.as_str()))),
        (Value::Object(map), Value::Str(key)) => Ok(Value::Bool(map.contains_key(key))),
        _ => Err(unsupported("in", needle, haystack)),
    }
}

fn op_is(left: &Value, right: &Value) -> ExpressionResult<Value> {
    // Strict identity: same variant, equal value, no numeric coercion
    Ok(Value::Bool(left == right))
}

fn op_is_not(left: &Value, right: &Value) -> ExpressionResult<Value> {
    Ok(Value::Bool(left != right))
}

fn op_and(left: &Value, right: &Value) -> ExpressionResult<Value> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a & b)),
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a & b)),
        _ => Err(unsupported("&", left, right)),
    }
}

fn op_xor(left: &Value, right: &Value) -> ExpressionResult<Value> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a ^ b)),
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a ^ b)),
        _ => Err(unsupported("^", left, right)),
    }
}

fn op_or(left: &Value, right: &Value) -> ExpressionResult<Value> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a | b)),
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a | b)),
        _ => Err(unsupported("|", left, right)),
    }
}

fn op_eq(left: &Value, right: &Value) -> ExpressionResult<Value> {
    Ok(Value::Bool(left.loose_eq(right)))
}

fn op_ne(left: &Value, right: &Value) -> ExpressionResult<Value> {
    Ok(Value::Bool(!left.loose_eq(right)))
}

fn op_lt(left: &Value, right: &Value) -> ExpressionResult<Value> {
    ordering("<", left, right).map(|ord| Value::Bool(ord == Ordering::Less))
}

fn op_le(left: &Value, right: &Value) -> ExpressionResult<Value> {
    ordering("<=", left, right).map(|ord| Value::Bool(ord != Ordering::Greater))
}

fn op_ge(left: &Value, right: &Value) -> ExpressionResult<Value> {
    ordering(">=", left, right).map(|ord| Value::Bool(ord != Ordering::Less))
}

fn op_gt(left: &Value, right: &Value) -> ExpressionResult<Value> {
    ordering(">", left, right).map(|ord| Value::Bool(ord == Ordering::Greater))
}

fn ordering(symbol: &str, left: &Value, right: &Value) -> ExpressionResult<Ordering> {
    left.compare(right)
        .ok_or_else(|| unsupported(symbol, left, right))
}

fn unsupported(symbol: &str, left: &Value, right: &Value) -> ExpressionError {
    ExpressionError::UnsupportedOperands {
        operator: symbol.to_string(),
        left: left.type_name(),
        right: right.type_name(),
    }
}
