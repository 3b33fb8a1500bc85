//! Document store trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::document::Document;
use crate::query::Query;
use crate::types::{CollectionName, DocumentId};
use crate::value::Fields;
use crate::Result;

/// The transport boundary to a remote (or local) document backend.
///
/// Every operation may fail with a transport or backend error; none of them
/// retry. Implementations are expected to be cheap to share across tasks.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a new document and return its backend-assigned id.
    async fn insert(&self, collection: &CollectionName, fields: &Fields) -> Result<DocumentId>;

    /// Fetch a document. A missing document is `Ok(None)`, not an error.
    async fn get(&self, collection: &CollectionName, id: &DocumentId) -> Result<Option<Document>>;

    /// Run a query, returning at most `query.limit_value()` documents.
    ///
    /// The query's cursor, if any, has already been checked against its shape.
    async fn query(&self, query: &Query) -> Result<Vec<Document>>;

    /// Overwrite the given top-level fields, leaving all others untouched.
    ///
    /// Fails with a not-found backend error if the document does not exist.
    async fn update(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
        fields: &Fields,
    ) -> Result<()>;

    /// Delete a document.
    async fn delete(&self, collection: &CollectionName, id: &DocumentId) -> Result<()>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn insert(&self, collection: &CollectionName, fields: &Fields) -> Result<DocumentId> {
        (**self).insert(collection, fields).await
    }

    async fn get(&self, collection: &CollectionName, id: &DocumentId) -> Result<Option<Document>> {
        (**self).get(collection, id).await
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>> {
        (**self).query(query).await
    }

    async fn update(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
        fields: &Fields,
    ) -> Result<()> {
        (**self).update(collection, id, fields).await
    }

    async fn delete(&self, collection: &CollectionName, id: &DocumentId) -> Result<()> {
        (**self).delete(collection, id).await
    }
}
