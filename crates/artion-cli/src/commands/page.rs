//! Page command implementation.

use anyhow::{Context, Result};
use clap::Args;

use artion_core::{Document, PageCursor, PageRequest};

use super::query::ShapeArgs;
use crate::cli::StoreOpts;
use crate::{output, store};

#[derive(Args, Debug)]
pub struct PageArgs {
    /// Collection name
    pub collection: String,

    #[command(flatten)]
    pub shape: ShapeArgs,

    /// Documents per page
    #[arg(long, default_value_t = 10)]
    pub page_size: u32,

    /// Resume after this cursor (printed by a previous page)
    #[arg(long, conflicts_with = "all")]
    pub cursor: Option<String>,

    /// Fetch every page instead of one
    #[arg(long)]
    pub all: bool,

    /// Pretty-print each document
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: PageArgs, opts: &StoreOpts) -> Result<()> {
    let cursor = args
        .cursor
        .as_deref()
        .map(str::parse::<PageCursor>)
        .transpose()
        .context("Invalid cursor")?;

    let mut request = PageRequest::new(args.page_size).after(cursor);
    request.filters = args.shape.filters()?;
    request.order = args.shape.order();

    let db = store::open(opts)?;
    let collection = db.collection(&args.collection).context("Invalid collection")?;

    if args.all {
        let docs: Vec<Document> = collection
            .paged_all(&request)
            .await
            .context("Failed to fetch pages")?;
        return output::records(&docs, args.pretty);
    }

    let page = collection
        .paged::<Document>(&request)
        .await
        .context("Failed to fetch page")?;

    output::records(&page.records, args.pretty)?;

    // The cursor goes to stderr so stdout stays one document per line.
    match request.next(&page).and_then(|next| next.cursor) {
        Some(next) => eprintln!("next-cursor: {}", next),
        None => output::note("Last page."),
    }
    Ok(())
}
