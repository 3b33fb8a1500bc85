//! Sample command implementation.

use anyhow::{Context, Result};
use clap::Args;

use artion_core::Document;

use crate::cli::StoreOpts;
use crate::{output, store};

#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Collection name
    pub collection: String,

    /// Number of documents to pick
    #[arg(short = 'n', long, default_value_t = 5)]
    pub count: u32,

    /// Pretty-print each document
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: SampleArgs, opts: &StoreOpts) -> Result<()> {
    let db = store::open(opts)?;
    let collection = db.collection(&args.collection).context("Invalid collection")?;

    let docs: Vec<Document> = collection
        .sample(args.count)
        .await
        .context("Failed to sample documents")?;

    output::records(&docs, args.pretty)
}
