//! Pagination cursor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::{Error, InvalidInputError};
use crate::types::DocumentId;
use crate::value::FieldValue;

use super::Query;

/// An opaque resume point: "strictly after this document".
///
/// A cursor remembers the shape of the query that produced it and is only
/// accepted by a query of the same shape (collection, filters, ordering).
/// Limits may differ between pages.
///
/// The string form (`Display` / `FromStr`) is stable for a given build and
/// can be handed to callers who need to persist it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageCursor {
    #[serde(rename = "a")]
    after: DocumentId,
    #[serde(rename = "v", default, skip_serializing_if = "Option::is_none")]
    order_value: Option<FieldValue>,
    #[serde(rename = "s")]
    shape: u64,
}

impl PageCursor {
    /// A cursor pointing at `doc`, as returned by `query`.
    pub fn after_document(query: &Query, doc: &Document) -> Self {
        let order_value = query
            .order()
            .and_then(|order| doc.get(&order.field))
            .cloned();

        Self {
            after: doc.id.clone(),
            order_value,
            shape: query.shape_fingerprint(),
        }
    }

    /// The id of the last document of the previous page.
    pub fn document_id(&self) -> &DocumentId {
        &self.after
    }

    /// The ordering field's value at that document, if the query was ordered.
    pub fn order_value(&self) -> Option<&FieldValue> {
        self.order_value.as_ref()
    }

    /// Returns true if this cursor may be used with `query`.
    pub fn fits(&self, query: &Query) -> bool {
        self.shape == query.shape_fingerprint()
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&token)
    }
}

impl FromStr for PageCursor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map_err(|e| {
            InvalidInputError::Cursor {
                reason: e.to_string(),
            }
            .into()
        })
    }
}
