//! Raw documents as returned by a store.

use serde::{Deserialize, Serialize};

use crate::codec::FieldReader;
use crate::types::DocumentId;
use crate::value::{FieldValue, Fields};

/// A schema-less document: an opaque id plus its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The backend-assigned id.
    pub id: DocumentId,

    /// The document's fields.
    ///
    /// No schema is enforced here; interpretation is left to the codec.
    pub fields: Fields,
}

impl Document {
    /// Create a document from its id and fields.
    pub fn new(id: DocumentId, fields: Fields) -> Self {
        Self { id, fields }
    }

    /// Get a top-level field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// A typed reader over the document's top-level fields.
    pub fn reader(&self) -> FieldReader<'_> {
        FieldReader::new(&self.fields)
    }
}
