//! Create command implementation.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use crate::cli::StoreOpts;
use crate::{output, store};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Collection name
    pub collection: String,

    /// Document fields as a JSON object ("-" reads stdin)
    pub data: String,
}

pub async fn run(args: CreateArgs, opts: &StoreOpts) -> Result<()> {
    let fields = super::parse_fields(&args.data)?;
    let db = store::open(opts)?;
    let collection = db.collection(&args.collection).context("Invalid collection")?;

    let id = collection
        .create(&fields)
        .await
        .context("Failed to create document")?;

    output::json(&json!({ "id": id }))
}
