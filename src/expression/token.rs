//! Tokens produced by the filter-expression lexer.

/// A typed token from a filter string.
///
/// Literal variants carry the raw matched text; parsing into values happens
/// in the evaluator, against the same grammar that produced the match.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// An operator symbol known to the registry
    Operator(String),
    /// A field name from the record collection's field universe
    Field(String),
    /// Integer literal, e.g. `42`, `-7`, `5.` (trailing dot allowed)
    Int(String),
    /// Float literal, e.g. `1.75`, `.5`, `-0.1`
    Float(String),
    /// Boolean literal: `True`, `true`, `False` or `false`
    Bool(String),
    /// A whitespace run
    Skip,
}
