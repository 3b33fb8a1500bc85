//! Update command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::StoreOpts;
use crate::{output, store};

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Collection name
    pub collection: String,

    /// Document id
    pub id: String,

    /// Fields to overwrite, as a JSON object ("-" reads stdin)
    pub data: String,
}

pub async fn run(args: UpdateArgs, opts: &StoreOpts) -> Result<()> {
    let fields = super::parse_fields(&args.data)?;
    let db = store::open(opts)?;
    let collection = db.collection(&args.collection).context("Invalid collection")?;
    let id = super::parse_id(&args.id)?;

    collection
        .update(&id, &fields)
        .await
        .context("Failed to update document")?;

    output::success(&format!("Updated {} field(s) of {}", fields.len(), id));
    Ok(())
}
