//! In-memory document store.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tracing::trace;

use crate::document::Document;
use crate::error::BackendError;
use crate::query::Query;
use crate::traits::DocumentStore;
use crate::types::{CollectionName, DocumentId};
use crate::value::Fields;
use crate::Result;

type Collections = HashMap<CollectionName, BTreeMap<DocumentId, Fields>>;

/// A [`DocumentStore`] that keeps everything in process memory.
///
/// Queries run through [`Query::evaluate`], so results follow the same
/// filtering, ordering and cursor rules as the other local stores. Nothing
/// is persisted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document under a caller-chosen id.
    pub fn put(&self, collection: &CollectionName, id: DocumentId, fields: Fields) {
        self.write()
            .entry(collection.clone())
            .or_default()
            .insert(id, fields);
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &CollectionName) -> usize {
        self.read().get(collection).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self, collection: &CollectionName) -> bool {
        self.len(collection) == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Collections> {
        self.collections.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Collections> {
        self.collections.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &CollectionName, fields: &Fields) -> Result<DocumentId> {
        let id = DocumentId::generate();
        self.put(collection, id.clone(), fields.clone());
        trace!(%collection, %id, "Inserted document");
        Ok(id)
    }

    async fn get(&self, collection: &CollectionName, id: &DocumentId) -> Result<Option<Document>> {
        Ok(self
            .read()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id.clone(), fields.clone())))
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>> {
        let docs: Vec<Document> = match self.read().get(query.collection()) {
            Some(docs) => docs
                .iter()
                .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                .collect(),
            None => Vec::new(),
        };
        Ok(query.evaluate(docs))
    }

    async fn update(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
        fields: &Fields,
    ) -> Result<()> {
        let mut collections = self.write();
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| BackendError::not_found(format!("no document {}/{}", collection, id)))?;
        existing.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    async fn delete(&self, collection: &CollectionName, id: &DocumentId) -> Result<()> {
        if let Some(docs) = self.write().get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}
