//! CLI store wrapper.

use async_trait::async_trait;

use artion_core::{CollectionName, Document, DocumentId, DocumentStore, Fields, Query, Result};
use artion_file::FileStore;
use artion_firestore::FirestoreStore;

/// Either backend, chosen by the store URL scheme.
#[derive(Debug)]
pub enum CliStore {
    File(FileStore),
    Firestore(FirestoreStore),
}

#[async_trait]
impl DocumentStore for CliStore {
    async fn insert(&self, collection: &CollectionName, fields: &Fields) -> Result<DocumentId> {
        match self {
            CliStore::File(store) => store.insert(collection, fields).await,
            CliStore::Firestore(store) => store.insert(collection, fields).await,
        }
    }

    async fn get(&self, collection: &CollectionName, id: &DocumentId) -> Result<Option<Document>> {
        match self {
            CliStore::File(store) => store.get(collection, id).await,
            CliStore::Firestore(store) => store.get(collection, id).await,
        }
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>> {
        match self {
            CliStore::File(store) => store.query(query).await,
            CliStore::Firestore(store) => store.query(query).await,
        }
    }

    async fn update(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
        fields: &Fields,
    ) -> Result<()> {
        match self {
            CliStore::File(store) => store.update(collection, id, fields).await,
            CliStore::Firestore(store) => store.update(collection, id, fields).await,
        }
    }

    async fn delete(&self, collection: &CollectionName, id: &DocumentId) -> Result<()> {
        match self {
            CliStore::File(store) => store.delete(collection, id).await,
            CliStore::Firestore(store) => store.delete(collection, id).await,
        }
    }
}
