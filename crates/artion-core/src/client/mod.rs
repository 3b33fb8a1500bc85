//! Collection client.
//!
//! A [`Database`] is an explicitly constructed handle around a shared
//! [`DocumentStore`]; it hands out [`Collection`]s bound to one collection
//! name. Collections hold no mutable state and can be cloned freely and used
//! from many tasks at once.

mod options;
mod paging;
mod sampling;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

pub use options::ClientOptions;
pub use paging::{Page, PageRequest};

use crate::codec::{self, FromDocument};
use crate::document::Document;
use crate::error::{Error, InvalidInputError};
use crate::query::{Direction, Filter, Query};
use crate::traits::DocumentStore;
use crate::types::{CollectionName, DocumentId};
use crate::value::Fields;
use crate::Result;

/// Entry point: a document store plus client options.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use artion_core::{Database, MemoryStore};
///
/// let db = Database::new(Arc::new(MemoryStore::new()));
/// let exhibitions = db.collection("exhibitions").unwrap();
/// assert_eq!(exhibitions.name().as_str(), "exhibitions");
/// ```
pub struct Database<S: ?Sized> {
    store: Arc<S>,
    options: ClientOptions,
}

impl<S: DocumentStore + ?Sized> Database<S> {
    /// Wrap a store with default options.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            options: ClientOptions::default(),
        }
    }

    /// Replace the client options.
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// A client for the named collection.
    pub fn collection(&self, name: &str) -> Result<Collection<S>> {
        Ok(self.collection_named(CollectionName::new(name)?))
    }

    /// A client for an already validated collection name.
    pub fn collection_named(&self, name: CollectionName) -> Collection<S> {
        Collection {
            store: Arc::clone(&self.store),
            name,
            options: self.options,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }
}

impl<S: ?Sized> Clone for Database<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            options: self.options,
        }
    }
}

impl<S: ?Sized> fmt::Debug for Database<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// A client bound to one collection.
pub struct Collection<S: ?Sized> {
    store: Arc<S>,
    name: CollectionName,
    options: ClientOptions,
}

impl<S: DocumentStore + ?Sized> Collection<S> {
    /// Returns the bound collection name.
    pub fn name(&self) -> &CollectionName {
        &self.name
    }

    /// An empty query targeting this collection.
    pub fn query(&self) -> Query {
        Query::new(self.name.clone())
    }

    /// Create a document. Fields are stored as given, without a schema check.
    #[instrument(skip(self, fields), fields(collection = %self.name))]
    pub async fn create(&self, fields: &Fields) -> Result<DocumentId> {
        let id = self.store.insert(&self.name, fields).await?;
        debug!(%id, "Created document");
        Ok(id)
    }

    /// Read a document. A missing document is `Ok(None)`.
    #[instrument(skip(self), fields(collection = %self.name))]
    pub async fn read(&self, id: &DocumentId) -> Result<Option<Document>> {
        debug!("Reading document");
        self.store.get(&self.name, id).await
    }

    /// Read and decode a document; a document that does not decode reads as absent.
    pub async fn read_as<R: FromDocument>(&self, id: &DocumentId) -> Result<Option<R>> {
        Ok(self.read(id).await?.as_ref().and_then(codec::decode_one))
    }

    /// Partially update a document: only the given fields change.
    #[instrument(skip(self, fields), fields(collection = %self.name))]
    pub async fn update(&self, id: &DocumentId, fields: &Fields) -> Result<()> {
        debug!(fields = fields.len(), "Updating document");
        self.store.update(&self.name, id, fields).await
    }

    /// Delete a document.
    #[instrument(skip(self), fields(collection = %self.name))]
    pub async fn delete(&self, id: &DocumentId) -> Result<()> {
        debug!("Deleting document");
        self.store.delete(&self.name, id).await
    }

    /// Execute a query built against this collection.
    #[instrument(skip(self, query), fields(collection = %self.name))]
    pub async fn execute(&self, query: &Query) -> Result<Vec<Document>> {
        if query.collection() != &self.name {
            return Err(Error::InvalidInput(InvalidInputError::CollectionMismatch {
                query: query.collection().to_string(),
                collection: self.name.to_string(),
            }));
        }
        query.check_cursor()?;

        let docs = self.store.query(query).await?;
        debug!(count = docs.len(), "Query executed");
        Ok(docs)
    }

    /// The top `limit` records by `order_field`, optionally filtered.
    ///
    /// Documents that do not decode as `R` are dropped. Ties on the order
    /// field come back in whatever order the backend chooses.
    #[instrument(skip(self, filters), fields(collection = %self.name))]
    pub async fn ranked<R: FromDocument>(
        &self,
        filters: &[Filter],
        order_field: &str,
        direction: Direction,
        limit: u32,
    ) -> Result<Vec<R>> {
        let query = self
            .query()
            .filters_from(filters.iter().cloned())
            .order_by(order_field, direction)
            .limit(limit);

        let docs = self.execute(&query).await?;
        Ok(codec::decode_all(&docs))
    }

    /// A resolver that looks ids up in this collection.
    pub fn resolver(&self) -> crate::resolver::ReferenceResolver<S> {
        crate::resolver::ReferenceResolver::new(self.clone())
    }
}

impl<S: ?Sized> Clone for Collection<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            name: self.name.clone(),
            options: self.options,
        }
    }
}

impl<S: ?Sized> fmt::Debug for Collection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
