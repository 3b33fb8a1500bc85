//! Query builder.
//!
//! A [`Query`] is an immutable description of a read against one collection:
//! conjunctive filters, at most one ordering field, an optional limit and an
//! optional resume-after cursor. Building is pure; execution goes through a
//! [`DocumentStore`](crate::traits::DocumentStore).
//!
//! Evaluation order is filters, then ordering, then the cursor boundary,
//! then the limit.

mod cursor;
mod filter;
mod order;

use std::cmp::Ordering;

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

pub use cursor::PageCursor;
pub use filter::{Filter, FilterOp};
pub use order::{Direction, OrderBy};

use crate::document::Document;
use crate::error::{Error, InvalidInputError};
use crate::types::{CollectionName, DocumentId};
use crate::value::{FieldValue, Fields};
use crate::Result;

/// A query against a single collection.
///
/// # Example
///
/// ```
/// use artion_core::{CollectionName, Direction, Filter, Query};
///
/// let query = Query::new(CollectionName::new("exhibitions").unwrap())
///     .filter(Filter::eq("category", "sculpture"))
///     .order_by("viewCount", Direction::Descending)
///     .limit(10);
///
/// assert_eq!(query.filters().len(), 1);
/// assert_eq!(query.limit_value(), Some(10));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    collection: CollectionName,
    filters: Vec<Filter>,
    order: Option<OrderBy>,
    limit: Option<u32>,
    start_after: Option<PageCursor>,
}

/// The part of a query a cursor is bound to.
#[derive(Serialize)]
struct QueryShape<'a> {
    collection: &'a CollectionName,
    filters: &'a [Filter],
    order: Option<&'a OrderBy>,
}

impl Query {
    /// An unfiltered, naturally ordered query over `collection`.
    pub fn new(collection: CollectionName) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order: None,
            limit: None,
            start_after: None,
        }
    }

    /// Add a filter. All filters must match.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add several filters.
    pub fn filters_from(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    /// Shorthand for an equality filter.
    pub fn where_eq(self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.filter(Filter::eq(field, value))
    }

    /// Order by a single field, replacing any previous ordering.
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order = Some(OrderBy::new(field, direction));
        self
    }

    /// Set or clear the ordering.
    pub fn with_order(mut self, order: Option<OrderBy>) -> Self {
        self.order = order;
        self
    }

    /// Return at most `limit` documents.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resume strictly after the cursor's document.
    pub fn start_after(mut self, cursor: PageCursor) -> Self {
        self.start_after = Some(cursor);
        self
    }

    pub fn collection(&self) -> &CollectionName {
        &self.collection
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn order(&self) -> Option<&OrderBy> {
        self.order.as_ref()
    }

    pub fn limit_value(&self) -> Option<u32> {
        self.limit
    }

    pub fn cursor(&self) -> Option<&PageCursor> {
        self.start_after.as_ref()
    }

    /// Fingerprint of collection, filters and ordering.
    ///
    /// XXH3 over the shape's JSON form, so persisted cursor tokens stay
    /// valid across builds and toolchains.
    pub fn shape_fingerprint(&self) -> u64 {
        let shape = QueryShape {
            collection: &self.collection,
            filters: &self.filters,
            order: self.order.as_ref(),
        };
        // Serialization of these types cannot fail; fall back to Debug just in case.
        let encoded =
            serde_json::to_string(&shape).unwrap_or_else(|_| format!("{:?}", self.filters));
        xxh3_64(encoded.as_bytes())
    }

    /// Reject a cursor that was produced by a differently shaped query.
    pub fn check_cursor(&self) -> Result<()> {
        match &self.start_after {
            Some(cursor) if !cursor.fits(self) => {
                Err(Error::InvalidInput(InvalidInputError::CursorMismatch))
            }
            _ => Ok(()),
        }
    }

    /// Evaluate the query over an in-memory set of documents.
    ///
    /// Used by local stores. Documents lacking the ordering field are
    /// excluded from ordered results; ties are broken by document id in the
    /// same direction as the ordering.
    pub fn evaluate(&self, docs: impl IntoIterator<Item = Document>) -> Vec<Document> {
        let mut matched: Vec<Document> = docs
            .into_iter()
            .filter(|doc| self.filters.iter().all(|f| f.matches(&doc.fields)))
            .filter(|doc| match &self.order {
                Some(order) => doc.fields.contains_key(&order.field),
                None => true,
            })
            .collect();

        matched.sort_by(|a, b| {
            self.position_cmp(self.order_key(&a.fields), &a.id, self.order_key(&b.fields), &b.id)
        });

        if let Some(cursor) = &self.start_after {
            matched.retain(|doc| {
                self.position_cmp(
                    self.order_key(&doc.fields),
                    &doc.id,
                    cursor.order_value(),
                    cursor.document_id(),
                ) == Ordering::Greater
            });
        }

        if let Some(limit) = self.limit {
            matched.truncate(limit as usize);
        }

        matched
    }

    fn order_key<'a>(&self, fields: &'a Fields) -> Option<&'a FieldValue> {
        self.order.as_ref().and_then(|order| fields.get(&order.field))
    }

    /// Compare two result positions in query order.
    fn position_cmp(
        &self,
        a_value: Option<&FieldValue>,
        a_id: &DocumentId,
        b_value: Option<&FieldValue>,
        b_id: &DocumentId,
    ) -> Ordering {
        let ascending = match (a_value, b_value) {
            (Some(a), Some(b)) => a.total_cmp(b).then_with(|| a_id.cmp(b_id)),
            _ => a_id.cmp(b_id),
        };

        match self.order.as_ref().map(|o| o.direction) {
            Some(Direction::Descending) => ascending.reverse(),
            _ => ascending,
        }
    }
}
