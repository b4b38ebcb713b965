//! In-process record store.
//!
//! Mirrors the MongoDB adapter's observable behavior over a fixed set of
//! records held in insertion order. Used by tests.

use crate::db::store::{RecordPage, RecordStore, StoreError};
use crate::models::Record;
use crate::query::{ListQuery, SortDirection, SymbolFilter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Sortable view of a record field.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FieldValue<'a> {
    Missing,
    Int(i64),
    Float(f64),
    Text(&'a str),
    Time(DateTime<Utc>),
}

impl FieldValue<'_> {
    fn rank(&self) -> u8 {
        // BSON comparison order: null < numbers < strings < dates
        match self {
            Self::Missing => 0,
            Self::Int(_) | Self::Float(_) => 1,
            Self::Text(_) => 2,
            Self::Time(_) => 3,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).total_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.total_cmp(&(*b as f64)),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Time(a), Self::Time(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn field_value<'a>(record: &'a Record, field: &str) -> FieldValue<'a> {
    match field {
        "id" | "_id" => FieldValue::Text(&record.id),
        "Symbol" => FieldValue::Text(&record.symbol),
        "Year" => FieldValue::Int(i64::from(record.year)),
        "Quarter" => FieldValue::Text(&record.quarter),
        "Datetime" => FieldValue::Time(record.datetime),
        "Url" => FieldValue::Text(&record.url),
        "EPS" => FieldValue::Float(record.eps),
        "ClosePrice" => record
            .close_price
            .map_or(FieldValue::Missing, FieldValue::Float),
        "PredictPrice" => record
            .predict_price
            .map_or(FieldValue::Missing, FieldValue::Float),
        _ => FieldValue::Missing,
    }
}

fn matches(record: &Record, filter: &SymbolFilter) -> bool {
    match filter {
        SymbolFilter::None => true,
        SymbolFilter::Exact(term) => record.symbol == *term,
        SymbolFilter::FullText(term) => {
            let words: Vec<String> = record
                .symbol
                .split_whitespace()
                .map(str::to_lowercase)
                .collect();
            term.split_whitespace()
                .map(str::to_lowercase)
                .any(|t| words.contains(&t))
        }
        SymbolFilter::SubstringCi(term) => record
            .symbol
            .to_lowercase()
            .contains(&term.to_lowercase()),
    }
}

/// In-memory record store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<Record>,
}

impl MemoryStore {
    /// Creates a store over `records`, kept in the given order.
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self, query: &ListQuery) -> Result<RecordPage, StoreError> {
        let mut matched: Vec<&Record> = self
            .records
            .iter()
            .filter(|r| matches(r, &query.filter))
            .collect();
        let total = matched.len() as u64;

        // stable: ties keep insertion order
        matched.sort_by(|a, b| {
            let ordering =
                field_value(a, &query.sort.field).compare(&field_value(b, &query.sort.field));
            match query.sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        let skip = usize::try_from(query.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        let records = matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect();

        Ok(RecordPage { records, total })
    }

    async fn distinct_symbols(&self, filter: &SymbolFilter) -> Result<Vec<String>, StoreError> {
        let mut seen = HashSet::new();
        Ok(self
            .records
            .iter()
            .filter(|r| matches(r, filter))
            .filter(|r| seen.insert(r.symbol.as_str()))
            .map(|r| r.symbol.clone())
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
