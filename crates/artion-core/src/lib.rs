//! artion-core - Typed client for a remote, paginated document store.
//!
//! Documents are schema-less field maps grouped into collections. This crate
//! provides the query builder, the pagination cursor, the record codec that
//! turns documents into typed records, and the collection client that runs
//! ranked fetches, approximate samples, paged reads and reference
//! resolution on top of any [`DocumentStore`].
//!
//! ```
//! use std::sync::Arc;
//! use artion_core::{Database, Direction, Document, MemoryStore};
//!
//! # async fn run() -> artion_core::Result<()> {
//! let db = Database::new(Arc::new(MemoryStore::new()));
//! let exhibitions = db.collection("exhibitions")?;
//!
//! let top: Vec<Document> = exhibitions
//!     .ranked(&[], "viewCount", Direction::Descending, 10)
//!     .await?;
//! assert!(top.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod client;
pub mod codec;
pub mod document;
pub mod error;
pub mod memory;
pub mod query;
pub mod records;
pub mod resolver;
pub mod traits;
pub mod types;
pub mod value;

pub use catalog::{Catalog, ExhibitionFilter};
pub use client::{ClientOptions, Collection, Database, Page, PageRequest};
pub use codec::{DecodeError, FieldReader, FromDocument};
pub use document::Document;
pub use error::Error;
pub use memory::MemoryStore;
pub use query::{Direction, Filter, FilterOp, OrderBy, PageCursor, Query};
pub use records::{Exhibition, News, UserProfile};
pub use resolver::ReferenceResolver;
pub use traits::DocumentStore;
pub use types::{CollectionName, DocumentId, StoreUrl};
pub use value::{FieldValue, Fields, GeoPoint};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
