//! Collection queries: field filters, a single ordering, and a limit.

use std::cmp::Ordering;

use super::store::Document;
use super::value::{lookup, FieldValue, Fields};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, FieldValue),
    Gte(String, FieldValue),
    Lte(String, FieldValue),
    /// The field is an array containing the value.
    ArrayContains(String, FieldValue),
}

impl Filter {
    fn matches(&self, fields: &Fields) -> bool {
        match self {
            Filter::Eq(path, expected) => {
                lookup(fields, path).and_then(|v| v.compare(expected)) == Some(Ordering::Equal)
            }
            Filter::Gte(path, bound) => matches!(
                lookup(fields, path).and_then(|v| v.compare(bound)),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Filter::Lte(path, bound) => matches!(
                lookup(fields, path).and_then(|v| v.compare(bound)),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Filter::ArrayContains(path, needle) => match lookup(fields, path) {
                Some(FieldValue::Array(items)) => items
                    .iter()
                    .any(|item| item.compare(needle) == Some(Ordering::Equal)),
                _ => false,
            },
        }
    }
}

/// A query over one collection.
///
/// Documents missing the ordering field sort last; ties break on document id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    filters: Vec<Filter>,
    order_by: Option<(String, Direction)>,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, path: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.filters.push(Filter::Eq(path.into(), value.into()));
        self
    }

    pub fn where_gte(mut self, path: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.filters.push(Filter::Gte(path.into(), value.into()));
        self
    }

    pub fn where_lte(mut self, path: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.filters.push(Filter::Lte(path.into(), value.into()));
        self
    }

    pub fn array_contains(mut self, path: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.filters.push(Filter::ArrayContains(path.into(), value.into()));
        self
    }

    pub fn order_by(mut self, path: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((path.into(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn matches(&self, fields: &Fields) -> bool {
        self.filters.iter().all(|f| f.matches(fields))
    }

    /// Filter, order and truncate `documents`.
    pub fn apply(&self, documents: impl IntoIterator<Item = Document>) -> Vec<Document> {
        let mut selected: Vec<Document> = documents
            .into_iter()
            .filter(|doc| self.matches(&doc.fields))
            .collect();

        match &self.order_by {
            Some((path, direction)) => selected.sort_by(|a, b| {
                let ordering = match (lookup(&a.fields, path), lookup(&b.fields, path)) {
                    (Some(x), Some(y)) => {
                        let o = x.compare(y).unwrap_or(Ordering::Equal);
                        match direction {
                            Direction::Ascending => o,
                            Direction::Descending => o.reverse(),
                        }
                    }
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                ordering.then_with(|| a.id.cmp(&b.id))
            }),
            None => selected.sort_by(|a, b| a.id.cmp(&b.id)),
        }

        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }
}
