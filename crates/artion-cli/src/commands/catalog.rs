//! Catalog subcommand implementations.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};

use artion_core::catalog::DEFAULT_MIN_RATING;
use artion_core::{Catalog, ExhibitionFilter, PageCursor};

use crate::cli::StoreOpts;
use crate::{output, store};

#[derive(Args, Debug)]
pub struct CatalogCommand {
    /// Pretty-print each record
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub view: CatalogView,
}

#[derive(Subcommand, Debug)]
pub enum CatalogView {
    /// Most viewed exhibitions
    Popular {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// Exhibitions with the highest hit rate
    Hot {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// Highly rated exhibitions, best first
    TopRated {
        #[arg(long, default_value_t = DEFAULT_MIN_RATING)]
        min_rating: f64,

        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// Exhibitions by start date, earliest first
    Upcoming {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// A random pick of exhibitions
    Featured {
        #[arg(short = 'n', long, default_value_t = 5)]
        count: u32,
    },

    /// A random pick of news
    News {
        #[arg(short = 'n', long, default_value_t = 5)]
        count: u32,
    },

    /// Page through exhibitions matching equality filters
    Browse(BrowseArgs),

    /// News collected by a user
    CollectedNews { user_id: String },

    /// Exhibitions collected by a user
    CollectedExhibitions { user_id: String },

    /// A user's search history
    SearchHistory { user_id: String },
}

#[derive(Args, Debug)]
pub struct BrowseArgs {
    #[arg(long)]
    pub hobby: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// Exact start date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    #[arg(long, default_value_t = 10)]
    pub page_size: u32,

    /// Resume after this cursor
    #[arg(long)]
    pub cursor: Option<String>,
}

pub async fn handle(cmd: CatalogCommand, opts: &StoreOpts) -> Result<()> {
    let db = store::open(opts)?;
    let catalog = Catalog::new(&db)?;
    let pretty = cmd.pretty;

    match cmd.view {
        CatalogView::Popular { limit } => {
            let items = catalog.popular(limit).await.context("Query failed")?;
            output::records(&items, pretty)
        }
        CatalogView::Hot { limit } => {
            let items = catalog.hot(limit).await.context("Query failed")?;
            output::records(&items, pretty)
        }
        CatalogView::TopRated { min_rating, limit } => {
            let items = catalog
                .top_rated(min_rating, limit)
                .await
                .context("Query failed")?;
            output::records(&items, pretty)
        }
        CatalogView::Upcoming { limit } => {
            let items = catalog.upcoming(limit).await.context("Query failed")?;
            output::records(&items, pretty)
        }
        CatalogView::Featured { count } => {
            let items = catalog.featured(count).await.context("Sampling failed")?;
            output::records(&items, pretty)
        }
        CatalogView::News { count } => {
            let items = catalog
                .news_highlights(count)
                .await
                .context("Sampling failed")?;
            output::records(&items, pretty)
        }
        CatalogView::Browse(args) => browse(&catalog, args, pretty).await,
        CatalogView::CollectedNews { user_id } => {
            let user_id = super::parse_id(&user_id)?;
            let items = catalog
                .collected_news(&user_id)
                .await
                .context("Failed to read user")?;
            output::records(&items, pretty)
        }
        CatalogView::CollectedExhibitions { user_id } => {
            let user_id = super::parse_id(&user_id)?;
            let items = catalog
                .collected_exhibitions(&user_id)
                .await
                .context("Failed to read user")?;
            output::records(&items, pretty)
        }
        CatalogView::SearchHistory { user_id } => {
            let user_id = super::parse_id(&user_id)?;
            let terms = catalog
                .search_history(&user_id)
                .await
                .context("Failed to read user")?;
            for term in &terms {
                println!("{}", term);
            }
            Ok(())
        }
    }
}

async fn browse<S>(catalog: &Catalog<S>, args: BrowseArgs, pretty: bool) -> Result<()>
where
    S: artion_core::DocumentStore + ?Sized,
{
    let cursor = args
        .cursor
        .as_deref()
        .map(str::parse::<PageCursor>)
        .transpose()
        .context("Invalid cursor")?;

    let filter = ExhibitionFilter {
        hobby: args.hobby,
        category: args.category,
        start_date: args.start_date,
    };

    let page = catalog
        .browse(&filter, args.page_size, cursor)
        .await
        .context("Failed to fetch page")?;

    output::records(&page.records, pretty)?;

    match (&page.next_cursor, page.is_last()) {
        (Some(next), false) => eprintln!("next-cursor: {}", next),
        _ => output::note("Last page."),
    }
    Ok(())
}
