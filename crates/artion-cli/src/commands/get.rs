//! Get command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::StoreOpts;
use crate::{output, store};

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Collection name
    pub collection: String,

    /// Document id
    pub id: String,
}

pub async fn run(args: GetArgs, opts: &StoreOpts) -> Result<()> {
    let db = store::open(opts)?;
    let collection = db.collection(&args.collection).context("Invalid collection")?;
    let id = super::parse_id(&args.id)?;

    let doc = collection
        .read(&id)
        .await
        .context("Failed to read document")?
        .with_context(|| format!("Document '{}' not found in '{}'", id, collection.name()))?;

    output::json_pretty(&doc)
}
