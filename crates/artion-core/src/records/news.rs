//! News records.

use serde::Serialize;

use crate::codec::{DecodeError, FromDocument};
use crate::document::Document;
use crate::types::DocumentId;

/// A news article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct News {
    pub id: DocumentId,
    pub title: String,
    /// Publication date as stored; the collection does not use a fixed format.
    pub date: String,
    pub author: String,
    pub image: Option<String>,
    pub description: String,
}

impl FromDocument for News {
    fn from_document(doc: &Document) -> Result<Self, DecodeError> {
        let reader = doc.reader();
        let image = reader.require_str("image")?;

        Ok(Self {
            id: doc.id.clone(),
            title: reader.require_str("title")?.to_string(),
            date: reader.require_str("date")?.to_string(),
            author: reader.require_str("author")?.to_string(),
            image: (!image.is_empty()).then(|| image.to_string()),
            description: reader.require_str("description")?.to_string(),
        })
    }
}
