use crate::query::Query;
use crate::record::Record;
use std::collections::BTreeSet;

/// An in-memory collection of records plus the union of their field names.
///
/// The field universe is what lets the filter lexer recognize bare
/// identifiers as field references. It grows monotonically as records are
/// added and always equals the union of keys of the held records.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    fields: BTreeSet<String>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut store = Self::new();
        store.add_many(records);
        store
    }

    /// Append one record and union its keys into the field universe
    pub fn add_one(&mut self, record: Record) {
        self.fields
            .extend(record.fields().map(|f| f.to_string()));
        self.records.push(record);
    }

    /// Append a batch of records
    pub fn add_many(&mut self, records: impl IntoIterator<Item = Record>) {
        for record in records {
            self.add_one(record);
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The union of field names across all held records
    pub fn field_universe(&self) -> &BTreeSet<String> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Start a query, projecting the given fields
    pub fn select<I, S>(&self, fields: I) -> Query<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Query::new(self, fields.into_iter().map(Into::into).collect())
    }
}
