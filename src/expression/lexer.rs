//! Filter-expression lexer.
//!
//! Scans a filter string left to right, single pass, trying alternatives in a
//! fixed priority order at each position: operator symbols (longest first),
//! whitespace, float literal, int literal, bool literal, then field names
//! known to the queried collection. A position matching none of these is
//! dropped without emitting a token (lenient mode).

use crate::expression::operator::OperatorRegistry;
use crate::expression::token::Token;
use std::collections::BTreeSet;

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    /// Operator symbols, longest first, derived from the registry
    symbols: Vec<&'a str>,
    /// Known field names, longest first, so overlapping names match deterministically
    fields: Vec<&'a str>,
}

impl<'a> Lexer<'a> {
    pub fn new(
        input: &'a str,
        registry: &'a OperatorRegistry,
        field_universe: &'a BTreeSet<String>,
    ) -> Self {
        let mut fields: Vec<&str> = field_universe.iter().map(String::as_str).collect();
        fields.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Lexer {
            input,
            position: 0,
            symbols: registry.symbols_longest_first(),
            fields,
        }
    }

    /// Get the next token from the input, or None at end of input
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            let rest = &self.input[self.position..];
            let first = rest.chars().next()?;

            if let Some(symbol) = self.symbols.iter().find(|s| rest.starts_with(**s)) {
                self.position += symbol.len();
                return Some(Token::Operator(symbol.to_string()));
            }

            if first.is_whitespace() {
                self.position += whitespace_len(rest);
                return Some(Token::Skip);
            }

            if let Some(len) = float_len(rest) {
                self.position += len;
                return Some(Token::Float(rest[..len].to_string()));
            }

            if let Some(len) = int_len(rest) {
                self.position += len;
                return Some(Token::Int(rest[..len].to_string()));
            }

            if let Some(len) = bool_len(rest) {
                self.position += len;
                return Some(Token::Bool(rest[..len].to_string()));
            }

            if let Some(field) = self.fields.iter().find(|f| rest.starts_with(**f)) {
                self.position += field.len();
                return Some(Token::Field(field.to_string()));
            }

            // Unmatched character: drop it and keep scanning
            self.position += first.len_utf8();
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }
}

fn whitespace_len(rest: &str) -> usize {
    rest.char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(rest.len(), |(i, _)| i)
}

/// Float literal: optional `-`, at most one leading digit, `.`, one or more digits
fn float_len(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut i = 0;
    if bytes.first() == Some(&b'-') {
        i += 1;
    }
    if bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    if bytes.get(i) != Some(&b'.') {
        return None;
    }
    i += 1;
    let fraction_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    (i > fraction_start).then_some(i)
}

/// Int literal: optional `-`, one or more digits, optional trailing `.`
fn int_len(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut i = 0;
    if bytes.first() == Some(&b'-') {
        i += 1;
    }
    let digits_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    if i == digits_start {
        return None;
    }
    if bytes.get(i) == Some(&b'.') {
        i += 1;
    }
    Some(i)
}

/// Bool literal: `True`/`true`/`False`/`false`
fn bool_len(rest: &str) -> Option<usize> {
    ["True", "true", "False", "false"]
        .iter()
        .find(|lit| rest.starts_with(**lit))
        .map(|lit| lit.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe(fields: &[&str]) -> BTreeSet<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    fn lex(input: &str, fields: &[&str]) -> Vec<Token> {
        let registry = OperatorRegistry::standard();
        let universe = universe(fields);
        Lexer::new(input, &registry, &universe).tokenize()
    }

    fn op(s: &str) -> Token {
        Token::Operator(s.to_string())
    }

    fn field(s: &str) -> Token {
        Token::Field(s.to_string())
    }

    #[test]
    fn test_basic_filter() {
        assert_eq!(
            lex("height > 1.75", &["height", "id"]),
            vec![
                field("height"),
                Token::Skip,
                op(">"),
                Token::Skip,
                Token::Float("1.75".to_string()),
            ]
        );
    }

    #[test]
    fn test_longest_operator_wins() {
        assert_eq!(
            lex("a is not b", &["a", "b"]),
            vec![
                field("a"),
                Token::Skip,
                op("is not"),
                Token::Skip,
                field("b"),
            ]
        );
        assert_eq!(
            lex("a <= b", &["a", "b"]),
            vec![field("a"), Token::Skip, op("<="), Token::Skip, field("b")]
        );
        assert_eq!(
            lex("a >= b", &["a", "b"]),
            vec![field("a"), Token::Skip, op(">="), Token::Skip, field("b")]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(lex("42", &[]), vec![Token::Int("42".to_string())]);
        assert_eq!(lex("-7", &[]), vec![Token::Int("-7".to_string())]);
        assert_eq!(lex("5.", &[]), vec![Token::Int("5.".to_string())]);
        assert_eq!(lex(".5", &[]), vec![Token::Float(".5".to_string())]);
        assert_eq!(lex("-.5", &[]), vec![Token::Float("-.5".to_string())]);
        assert_eq!(lex("1.75", &[]), vec![Token::Float("1.75".to_string())]);
    }

    #[test]
    fn test_bools() {
        assert_eq!(lex("True", &[]), vec![Token::Bool("True".to_string())]);
        assert_eq!(lex("false", &[]), vec![Token::Bool("false".to_string())]);
    }

    #[test]
    fn test_field_recognition_depends_on_universe() {
        assert_eq!(lex("retired", &["retired"]), vec![field("retired")]);
        // Unknown identifiers are dropped character by character
        assert_eq!(lex("retired", &[]), vec![]);
    }

    #[test]
    fn test_longest_field_wins() {
        assert_eq!(lex("heights", &["height", "heights"]), vec![field("heights")]);
    }

    #[test]
    fn test_unmatched_characters_dropped() {
        assert_eq!(
            lex("a @# b", &["a", "b"]),
            vec![field("a"), Token::Skip, Token::Skip, field("b")]
        );
    }

    #[test]
    fn test_whitespace_only() {
        assert_eq!(lex("   \t ", &["a"]), vec![Token::Skip]);
        assert_eq!(lex("", &["a"]), vec![]);
    }

    #[test]
    fn test_operator_beats_field_prefix() {
        // Operators take priority even inside what looks like an identifier
        assert_eq!(
            lex("invoice", &["voice"]),
            vec![op("in"), field("voice")]
        );
    }
}
