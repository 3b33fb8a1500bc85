//! Firestore-backed document store.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, instrument};

use artion_core::error::{BackendError, InvalidInputError};
use artion_core::{
    CollectionName, Document, DocumentId, DocumentStore, Fields, Query, Result, StoreUrl,
};

use crate::client::HttpClient;
use crate::query::{RunQueryRequest, RunQueryResponseItem, field_path};
use crate::value::{DocumentBody, WireDocument};

/// A [`DocumentStore`] speaking the Firestore REST v1 API.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use artion_core::StoreUrl;
/// use artion_firestore::FirestoreStore;
///
/// let url = StoreUrl::new(
///     "https://firestore.googleapis.com/v1/projects/artion/databases/(default)/documents",
/// )?;
/// let store = FirestoreStore::builder(url)
///     .with_token("ya29.token")
///     .with_timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok::<(), artion_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    base: StoreUrl,
    client: HttpClient,
}

/// Builder for [`FirestoreStore`].
#[derive(Debug, Clone)]
pub struct FirestoreStoreBuilder {
    base: StoreUrl,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl FirestoreStoreBuilder {
    /// Attach a bearer token to every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Fail requests that take longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<FirestoreStore> {
        if !self.base.is_network() {
            return Err(InvalidInputError::StoreUrl {
                value: self.base.to_string(),
                reason: "a Firestore store needs an http(s) URL".to_string(),
            }
            .into());
        }

        let client = HttpClient::new(self.token.as_deref(), self.timeout)?;
        Ok(FirestoreStore {
            base: self.base,
            client,
        })
    }
}

impl FirestoreStore {
    /// A store without credentials or timeout.
    pub fn new(base: StoreUrl) -> Result<Self> {
        Self::builder(base).build()
    }

    pub fn builder(base: StoreUrl) -> FirestoreStoreBuilder {
        FirestoreStoreBuilder {
            base,
            token: None,
            timeout: None,
        }
    }

    /// Returns the `.../documents` base URL.
    pub fn url(&self) -> &StoreUrl {
        &self.base
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    #[instrument(skip(self, fields), fields(store = %self.base))]
    async fn insert(&self, collection: &CollectionName, fields: &Fields) -> Result<DocumentId> {
        let url = self.base.collection_url(collection);
        let request = self
            .client
            .request(Method::POST, &url)
            .json(&DocumentBody::new(fields));

        let created: WireDocument = self.client.send_json(request).await?;
        let id = created.id()?;
        debug!(%id, "Created document");
        Ok(id)
    }

    #[instrument(skip(self), fields(store = %self.base))]
    async fn get(&self, collection: &CollectionName, id: &DocumentId) -> Result<Option<Document>> {
        let url = self.base.document_url(collection, id);
        let request = self.client.request(Method::GET, &url);

        match self.client.send_json_optional::<WireDocument>(request).await? {
            Some(doc) => Ok(Some(doc.into_document()?)),
            None => {
                debug!("Document not found");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, query), fields(store = %self.base, collection = %query.collection()))]
    async fn query(&self, query: &Query) -> Result<Vec<Document>> {
        let body = RunQueryRequest::new(&self.base, query);
        let request = self
            .client
            .request(Method::POST, &self.base.run_query_url())
            .json(&body);

        let items: Vec<RunQueryResponseItem> = self.client.send_json(request).await?;
        let docs = items
            .into_iter()
            .filter_map(|item| item.document)
            .map(WireDocument::into_document)
            .collect::<Result<Vec<_>>>()?;

        debug!(count = docs.len(), "runQuery returned");
        Ok(docs)
    }

    #[instrument(skip(self, fields), fields(store = %self.base))]
    async fn update(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
        fields: &Fields,
    ) -> Result<()> {
        // An empty mask would overwrite the whole document.
        if fields.is_empty() {
            return match self.get(collection, id).await? {
                Some(_) => Ok(()),
                None => Err(BackendError::not_found(format!("no document {}/{}", collection, id)).into()),
            };
        }

        let url = self.base.document_url(collection, id);
        let mut params: Vec<(&str, String)> = fields
            .keys()
            .map(|name| ("updateMask.fieldPaths", field_path(name)))
            .collect();
        params.push(("currentDocument.exists", "true".to_string()));

        let request = self
            .client
            .request(Method::PATCH, &url)
            .query(&params)
            .json(&DocumentBody::new(fields));

        self.client.send_no_content(request).await?;
        debug!(fields = fields.len(), "Updated document");
        Ok(())
    }

    #[instrument(skip(self), fields(store = %self.base))]
    async fn delete(&self, collection: &CollectionName, id: &DocumentId) -> Result<()> {
        let url = self.base.document_url(collection, id);
        let request = self.client.request(Method::DELETE, &url);
        self.client.send_no_content(request).await?;
        debug!("Deleted document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_urls_rejected() {
        let url = StoreUrl::new("file:///tmp/artion").unwrap();
        assert!(FirestoreStore::new(url).is_err());
    }

    #[test]
    fn builder_keeps_base() {
        let url = StoreUrl::new("https://firestore.googleapis.com/v1/projects/p/databases/d/documents")
            .unwrap();
        let store = FirestoreStore::builder(url.clone())
            .with_token("t")
            .build()
            .unwrap();
        assert_eq!(store.url(), &url);
    }
}
