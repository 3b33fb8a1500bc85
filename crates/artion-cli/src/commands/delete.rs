//! Delete command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::StoreOpts;
use crate::{output, store};

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Collection name
    pub collection: String,

    /// Document id
    pub id: String,
}

pub async fn run(args: DeleteArgs, opts: &StoreOpts) -> Result<()> {
    let db = store::open(opts)?;
    let collection = db.collection(&args.collection).context("Invalid collection")?;
    let id = super::parse_id(&args.id)?;

    collection
        .delete(&id)
        .await
        .context("Failed to delete document")?;

    output::success(&format!("Deleted {}", id));
    Ok(())
}
