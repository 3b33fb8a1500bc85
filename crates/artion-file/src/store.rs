//! Filesystem storage.
//!
//! Layout under the root directory:
//!
//! ```text
//! collections/
//!   <collection>.lock
//!   <collection>/
//!     <id>.json
//! ```

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use artion_core::error::{BackendError, InvalidInputError};
use artion_core::{
    CollectionName, Document, DocumentId, DocumentStore, Error, Fields, Query, Result, StoreUrl,
};

/// Unreadable stored JSON is a storage fault, not bad caller input.
fn map_json(err: serde_json::Error) -> Error {
    Error::wire(format!("stored document: {}", err))
}

/// A document as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredDocument {
    /// RFC 3339 creation time.
    created_at: String,
    /// RFC 3339 time of the last update.
    updated_at: String,
    fields: Fields,
}

/// Holds the per-collection lock until dropped.
struct CollectionLock(File);

impl Drop for CollectionLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.0);
    }
}

/// A [`DocumentStore`] backed by JSON files on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a new file store at the given root directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Open the store a `file://` URL points at.
    pub fn from_url(url: &StoreUrl) -> Result<Self> {
        url.to_file_path().map(Self::new).ok_or_else(|| {
            InvalidInputError::StoreUrl {
                value: url.to_string(),
                reason: "a file store needs a file:// URL".to_string(),
            }
            .into()
        })
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collections_dir(&self) -> PathBuf {
        self.root.join("collections")
    }

    fn collection_dir(&self, collection: &CollectionName) -> PathBuf {
        self.collections_dir().join(collection.as_str())
    }

    fn document_path(&self, collection: &CollectionName, id: &DocumentId) -> PathBuf {
        self.collection_dir(collection)
            .join(format!("{}.json", id.as_str()))
    }

    /// Take the exclusive lock for a collection, creating directories as needed.
    fn lock(&self, collection: &CollectionName) -> Result<CollectionLock> {
        let dir = self.collection_dir(collection);
        fs::create_dir_all(&dir)?;

        let lock_path = self
            .collections_dir()
            .join(format!("{}.lock", collection.as_str()));
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)?;
        file.lock_exclusive()?;
        Ok(CollectionLock(file))
    }

    fn read_stored(path: &Path) -> Result<Option<StoredDocument>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map(Some).map_err(map_json)
    }

    /// Write via a temp file and rename so readers never see partial content.
    fn write_stored(path: &Path, doc: &StoredDocument) -> Result<()> {
        let content = serde_json::to_string_pretty(doc).map_err(map_json)?;
        let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Every parseable document in a collection.
    fn load_collection(&self, collection: &CollectionName) -> Result<Vec<Document>> {
        let dir = self.collection_dir(collection);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut docs = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }

            let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| DocumentId::new(s).ok())
            else {
                continue;
            };

            match Self::read_stored(&path) {
                Ok(Some(stored)) => docs.push(Document::new(id, stored.fields)),
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable document"),
            }
        }

        Ok(docs)
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    #[instrument(skip(self, fields))]
    async fn insert(&self, collection: &CollectionName, fields: &Fields) -> Result<DocumentId> {
        let _lock = self.lock(collection)?;

        let mut id = DocumentId::generate();
        while self.document_path(collection, &id).exists() {
            id = DocumentId::generate();
        }

        let now = Utc::now().to_rfc3339();
        let stored = StoredDocument {
            created_at: now.clone(),
            updated_at: now,
            fields: fields.clone(),
        };
        Self::write_stored(&self.document_path(collection, &id), &stored)?;

        debug!(%id, "Created document");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn get(&self, collection: &CollectionName, id: &DocumentId) -> Result<Option<Document>> {
        let path = self.document_path(collection, id);
        Ok(Self::read_stored(&path)?.map(|stored| Document::new(id.clone(), stored.fields)))
    }

    #[instrument(skip(self, query), fields(collection = %query.collection()))]
    async fn query(&self, query: &Query) -> Result<Vec<Document>> {
        let docs = self.load_collection(query.collection())?;
        let total = docs.len();
        let results = query.evaluate(docs);
        debug!(scanned = total, returned = results.len(), "Evaluated query");
        Ok(results)
    }

    #[instrument(skip(self, fields))]
    async fn update(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
        fields: &Fields,
    ) -> Result<()> {
        let _lock = self.lock(collection)?;
        let path = self.document_path(collection, id);

        let Some(mut stored) = Self::read_stored(&path)? else {
            return Err(BackendError::not_found(format!("no document {}/{}", collection, id)).into());
        };

        stored
            .fields
            .extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        stored.updated_at = Utc::now().to_rfc3339();
        Self::write_stored(&path, &stored)?;

        debug!(fields = fields.len(), "Updated document");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: &CollectionName, id: &DocumentId) -> Result<()> {
        let _lock = self.lock(collection)?;
        let path = self.document_path(collection, id);

        if path.exists() {
            fs::remove_file(&path)?;
            debug!("Deleted document");
        }

        Ok(())
    }
}
