//! Store selection for the CLI.

pub mod config;
mod types;

pub use types::CliStore;

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use artion_core::{Database, StoreUrl};
use artion_file::FileStore;
use artion_firestore::FirestoreStore;

use crate::cli::StoreOpts;

/// Environment variable naming the store URL.
pub const STORE_ENV: &str = "ARTION_STORE";

/// Environment variable holding a Firestore bearer token.
pub const TOKEN_ENV: &str = "ARTION_TOKEN";

/// Resolve the store URL: `--store`, then `$ARTION_STORE`, then the saved config.
pub fn resolve_url(opts: &StoreOpts) -> Result<StoreUrl> {
    let raw = match &opts.store {
        Some(store) => store.clone(),
        None => match env::var(STORE_ENV) {
            Ok(store) if !store.is_empty() => store,
            _ => config::load()?
                .map(|c| c.store)
                .context("No store configured. Pass --store, set ARTION_STORE or run 'artion config set-store <url>'.")?,
        },
    };

    StoreUrl::new(&raw).context("Invalid store URL")
}

/// Open the configured store.
pub fn open(opts: &StoreOpts) -> Result<Database<CliStore>> {
    let url = resolve_url(opts)?;
    debug!(store = %url, "Opening store");

    let store = if url.is_local() {
        CliStore::File(FileStore::from_url(&url).context("Failed to open file store")?)
    } else {
        let token = opts
            .token
            .clone()
            .or_else(|| env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()));
        let mut builder = FirestoreStore::builder(url);
        if let Some(token) = token {
            builder = builder.with_token(token);
        }
        CliStore::Firestore(builder.build().context("Failed to create Firestore client")?)
    };

    Ok(Database::new(Arc::new(store)))
}
