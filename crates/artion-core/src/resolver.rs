//! Reference resolution.
//!
//! Documents refer to each other by id lists (a user's collected news, for
//! example). A [`ReferenceResolver`] reads every referenced id from a target
//! collection concurrently and joins the results once all reads finished.

use futures_util::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, instrument, warn};

use crate::client::Collection;
use crate::codec::FromDocument;
use crate::traits::DocumentStore;
use crate::types::DocumentId;
use crate::Result;

/// Resolves id lists against one target collection.
pub struct ReferenceResolver<S: ?Sized> {
    target: Collection<S>,
}

impl<S: DocumentStore + ?Sized> ReferenceResolver<S> {
    pub fn new(target: Collection<S>) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &Collection<S> {
        &self.target
    }

    /// Read and decode every id, in arrival order.
    ///
    /// All reads are in flight at once. A read that fails is logged and
    /// omitted, as is a missing or undecodable document; the call itself
    /// never fails. Duplicate ids are read and returned once per occurrence.
    #[instrument(skip(self, ids), fields(collection = %self.target.name(), ids = ids.len()))]
    pub async fn resolve<R: FromDocument>(&self, ids: &[DocumentId]) -> Vec<R> {
        if ids.is_empty() {
            return Vec::new();
        }

        let mut reads: FuturesUnordered<_> = ids
            .iter()
            .map(|id| async move { (id, self.target.read(id).await) })
            .collect();

        let mut records = Vec::with_capacity(ids.len());
        while let Some((id, outcome)) = reads.next().await {
            match outcome {
                Ok(Some(doc)) => match R::from_document(&doc) {
                    Ok(record) => records.push(record),
                    Err(e) => debug!(%id, error = %e, "Dropping undecodable reference"),
                },
                Ok(None) => debug!(%id, "Referenced document not found"),
                Err(e) => warn!(%id, error = %e, "Failed to read referenced document"),
            }
        }

        debug!(resolved = records.len(), "Resolved references");
        records
    }

    /// Resolve the ids stored in a string-array field of another document.
    ///
    /// Fails only when reading the parent fails. A missing parent, a missing
    /// or ill-typed field and malformed ids all degrade to fewer results.
    #[instrument(skip(self, parent), fields(parent_collection = %parent.name()))]
    pub async fn resolve_field<R: FromDocument>(
        &self,
        parent: &Collection<S>,
        parent_id: &DocumentId,
        field: &str,
    ) -> Result<Vec<R>> {
        let Some(parent_doc) = parent.read(parent_id).await? else {
            warn!("Parent document not found");
            return Ok(Vec::new());
        };

        let raw_ids = match parent_doc.reader().require_str_array(field) {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "Parent has no usable id list");
                return Ok(Vec::new());
            }
        };

        let ids: Vec<DocumentId> = raw_ids
            .into_iter()
            .filter_map(|raw| match DocumentId::new(raw) {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed reference");
                    None
                }
            })
            .collect();

        Ok(self.resolve(&ids).await)
    }
}

impl<S: ?Sized> Clone for ReferenceResolver<S> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
        }
    }
}

impl<S: ?Sized> std::fmt::Debug for ReferenceResolver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceResolver")
            .field("target", &self.target)
            .finish()
    }
}
