//! Approximate random sampling.
//!
//! The backend has no random-selection operator and reading a whole
//! collection to sample it is too expensive, so the client oversamples a
//! window in backend order and shuffles it locally. The result looks
//! diverse but is not a uniform draw over the collection.

use rand::seq::SliceRandom;
use tracing::{debug, instrument, warn};

use super::Collection;
use crate::codec::{self, FromDocument};
use crate::traits::DocumentStore;
use crate::Result;

impl<S: DocumentStore + ?Sized> Collection<S> {
    /// Up to `count` records picked pseudo-randomly from an oversampled window.
    ///
    /// A cheap trial read (limit 1) decides the window: on success it is
    /// `min(count × 2, 50)`, on failure it widens to `min(count × 3, max)`.
    /// Fewer than `count` records is not an error.
    #[instrument(skip(self), fields(collection = %self.name))]
    pub async fn sample<R: FromDocument>(&self, count: u32) -> Result<Vec<R>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let window = self.sample_window(count).await;
        debug!(window, "Fetching sample window");

        let mut docs = self.store.query(&self.query().limit(window)).await?;
        docs.shuffle(&mut rand::rng());

        Ok(docs
            .iter()
            .filter_map(codec::decode_one)
            .take(count as usize)
            .collect())
    }

    async fn sample_window(&self, count: u32) -> u32 {
        match self.store.query(&self.query().limit(1)).await {
            Ok(_) => self.options.narrow_window(count),
            Err(e) => {
                warn!(error = %e, "Sampling trial read failed, widening fetch");
                self.options.wide_window(count)
            }
        }
    }
}
