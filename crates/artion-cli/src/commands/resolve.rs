//! Resolve command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use artion_core::{Document, DocumentId};

use crate::cli::StoreOpts;
use crate::{output, store};

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Collection the ids point into
    pub collection: String,

    /// Document ids to fetch
    #[arg(conflicts_with = "parent")]
    pub ids: Vec<String>,

    /// Collection of the document holding the ids
    #[arg(long, requires_all = ["parent_id", "field"])]
    pub parent: Option<String>,

    /// Id of the document holding the ids
    #[arg(long, requires = "parent")]
    pub parent_id: Option<String>,

    /// String-array field holding the ids
    #[arg(long, requires = "parent")]
    pub field: Option<String>,

    /// Pretty-print each document
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: ResolveArgs, opts: &StoreOpts) -> Result<()> {
    let db = store::open(opts)?;
    let target = db.collection(&args.collection).context("Invalid collection")?;
    let resolver = target.resolver();

    let docs: Vec<Document> = match (&args.parent, &args.parent_id, &args.field) {
        (Some(parent), Some(parent_id), Some(field)) => {
            let parent = db.collection(parent).context("Invalid parent collection")?;
            let parent_id = super::parse_id(parent_id)?;
            resolver
                .resolve_field(&parent, &parent_id, field)
                .await
                .context("Failed to read parent document")?
        }
        _ => {
            if args.ids.is_empty() {
                bail!("Pass document ids or --parent, --parent-id and --field");
            }
            let ids = args
                .ids
                .iter()
                .map(|raw| super::parse_id(raw))
                .collect::<Result<Vec<DocumentId>>>()?;
            resolver.resolve(&ids).await
        }
    };

    output::records(&docs, args.pretty)
}
