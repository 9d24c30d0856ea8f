//! SQL-like query builder over a record store.
//!
//! `store.select(fields).where_(filter)...execute()` filters records and
//! projects the requested fields, substituting Null for absent ones.

use crate::expression::{FilterEvaluator, OperatorRegistry};
use crate::record::{Record, RecordStore, Value};
use anyhow::Result;

/// Boxed predicate applied to a single field value
pub type PredicateFn = Box<dyn Fn(&Value) -> bool>;

/// One filter specification for a `where` step
pub enum Filter {
    /// A textual filter expression, e.g. `"height > 1.75"`
    Expr(String),
    /// A structured predicate on one field
    Predicate { field: String, predicate: PredicateFn },
}

impl Filter {
    pub fn expr(filter: impl Into<String>) -> Self {
        Filter::Expr(filter.into())
    }

    pub fn predicate(field: impl Into<String>, predicate: impl Fn(&Value) -> bool + 'static) -> Self {
        Filter::Predicate {
            field: field.into(),
            predicate: Box::new(predicate),
        }
    }
}

impl From<&str> for Filter {
    fn from(s: &str) -> Self {
        Filter::Expr(s.to_string())
    }
}

impl From<String> for Filter {
    fn from(s: String) -> Self {
        Filter::Expr(s)
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Filter::Expr(e) => f.debug_tuple("Expr").field(e).finish(),
            Filter::Predicate { field, .. } => {
                f.debug_struct("Predicate").field("field", field).finish()
            }
        }
    }
}

/// A select/where chain over a record store.
///
/// Filters combine with logical AND in the order given. The terminal
/// `execute` produces one projected record per surviving source record.
#[derive(Debug)]
pub struct Query<'a> {
    store: &'a RecordStore,
    fields: Vec<String>,
    filters: Vec<Filter>,
}

impl<'a> Query<'a> {
    pub(crate) fn new(store: &'a RecordStore, fields: Vec<String>) -> Self {
        Self {
            store,
            fields,
            filters: Vec::new(),
        }
    }

    /// Add a filter step; chainable
    pub fn where_(mut self, filter: impl Into<Filter>) -> Self {
        self.filters.push(filter.into());
        self
    }

    /// Run the query with the standard operator set
    pub fn execute(&self) -> Result<Vec<Record>> {
        self.execute_with(&OperatorRegistry::standard())
    }

    /// Run the query with an injected operator registry
    pub fn execute_with(&self, registry: &OperatorRegistry) -> Result<Vec<Record>> {
        let evaluator = FilterEvaluator::new(registry, self.store.field_universe());
        let mut survivors: Vec<&Record> = self.store.records().iter().collect();

        for filter in &self.filters {
            match filter {
                Filter::Expr(expr) => {
                    let mut kept = Vec::with_capacity(survivors.len());
                    for record in survivors {
                        if evaluator.evaluate(expr, record)? {
                            kept.push(record);
                        }
                    }
                    survivors = kept;
                }
                Filter::Predicate { field, predicate } => {
                    // A record survives only if the field is present, its
                    // value is truthy, and the predicate accepts it. Falsy
                    // values are excluded before the predicate ever runs.
                    survivors.retain(|record| match record.get_present(field) {
                        Some(value) if value.is_truthy() => predicate(value),
                        _ => false,
                    });
                }
            }
        }

        Ok(survivors.into_iter().map(|r| self.project(r)).collect())
    }

    /// Build the output record: requested fields only, absent fields as Null
    fn project(&self, record: &Record) -> Record {
        self.fields
            .iter()
            .map(|field| (field.clone(), record.get(field)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store(records: Vec<serde_json::Value>) -> RecordStore {
        RecordStore::from_records(
            records
                .into_iter()
                .map(|j| Record::from_json(j).unwrap())
                .collect::<Vec<_>>(),
        )
    }

    fn expected(records: Vec<serde_json::Value>) -> Vec<Record> {
        records
            .into_iter()
            .map(|j| Record::from_json(j).unwrap())
            .collect()
    }

    fn players() -> RecordStore {
        store(vec![
            json!({"id": 1, "name": "Leo", "height": 1.9, "retired": true}),
            json!({"id": 2, "name": "Szymon", "height": 1.72, "retired": false}),
            json!({"id": 3, "name": "Giorgi", "height": 1.77, "retired": false}),
        ])
    }

    #[test]
    fn test_select_where_truthy_field() {
        let result = players()
            .select(["id", "name"])
            .where_("retired")
            .execute()
            .unwrap();
        assert_eq!(result, expected(vec![json!({"id": 1, "name": "Leo"})]));
    }

    #[test]
    fn test_select_where_comparison() {
        let result = players()
            .select(["id"])
            .where_("height > 1.75")
            .execute()
            .unwrap();
        assert_eq!(result, expected(vec![json!({"id": 1}), json!({"id": 3})]));
    }

    #[test]
    fn test_no_filters_projects_everything() {
        let result = players().select(["id"]).execute().unwrap();
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_structured_predicate() {
        let result = players()
            .select(["name", "height"])
            .where_(Filter::predicate("id", |v| {
                matches!(v, Value::Int(i) if i % 2 == 0)
            }))
            .execute()
            .unwrap();
        assert_eq!(
            result,
            expected(vec![json!({"name": "Szymon", "height": 1.72})])
        );
    }

    #[test]
    fn test_predicate_guard_excludes_falsy_even_if_accepted() {
        // The guard couples "present and truthy" with "predicate accepts":
        // a predicate that accepts zero still never sees a zero value.
        let store = store(vec![json!({"a": 0}), json!({"a": 1})]);
        let result = store
            .select(["a"])
            .where_(Filter::predicate("a", |v| {
                matches!(v, Value::Int(0)) || matches!(v, Value::Int(1))
            }))
            .execute()
            .unwrap();
        assert_eq!(result, expected(vec![json!({"a": 1})]));
    }

    #[test]
    fn test_predicate_on_absent_field_excludes() {
        let store = store(vec![json!({"b": 1})]);
        let result = store
            .select(["b"])
            .where_(Filter::predicate("a", |_| true))
            .execute()
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_filters_combine_with_and() {
        let result = players()
            .select(["name"])
            .where_("height > 1.75")
            .where_("not retired")
            .execute()
            .unwrap();
        assert_eq!(result, expected(vec![json!({"name": "Giorgi"})]));
    }

    #[test]
    fn test_missing_fields_project_as_null() {
        let store = store(vec![json!({"a": 1, "b": 2}), json!({"b": 22, "c": 3})]);
        let result = store.select(["a", "c"]).where_("b != 7").execute().unwrap();
        assert_eq!(
            result,
            expected(vec![
                json!({"a": 1, "c": null}),
                json!({"a": null, "c": 3}),
            ])
        );
    }

    #[test]
    fn test_chained_query_over_previous_result() {
        let store1 = store(vec![json!({"a": 1, "b": 2}), json!({"b": 22, "c": 3})]);
        let first = store1.select(["a", "c"]).where_("b != 7").execute().unwrap();

        let store2 = RecordStore::from_records(first);
        let result = store2
            .select(["c", "d"])
            .where_(Filter::predicate("a", |v| v.is_truthy()))
            .execute()
            .unwrap();
        // Only {a:1, c:null} has a truthy "a"; its "c" and "d" are both Null
        assert_eq!(result, expected(vec![json!({"c": null, "d": null})]));
    }

    #[test]
    fn test_malformed_filter_surfaces_error() {
        let result = players().select(["id"]).where_("height > 1.75 > id").execute();
        assert!(result.is_err());
    }

    #[test]
    fn test_execute_with_custom_registry() {
        let mut registry = OperatorRegistry::standard();
        registry.register(crate::expression::Operator::binary("~", |l, r| {
            Ok(Value::Bool(l.type_name() == r.type_name()))
        }));
        let result = players()
            .select(["id"])
            .where_("height ~ height")
            .execute_with(&registry)
            .unwrap();
        assert_eq!(result.len(), 3);
    }
}
