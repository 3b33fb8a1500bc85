//! Subcommand implementations.

mod catalog;
mod config;
mod create;
mod delete;
mod get;
mod page;
mod query;
mod resolve;
mod sample;
mod update;

use std::io::Read;

use anyhow::{Context, Result};
use clap::Subcommand;

use artion_core::value::fields_from_json;
use artion_core::{DocumentId, Fields};

use crate::cli::StoreOpts;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a single document
    Get(get::GetArgs),

    /// Create a document from a JSON object
    Create(create::CreateArgs),

    /// Overwrite some fields of a document
    Update(update::UpdateArgs),

    /// Delete a document
    Delete(delete::DeleteArgs),

    /// Run a filtered, ordered query
    Query(query::QueryArgs),

    /// Pick documents pseudo-randomly
    Sample(sample::SampleArgs),

    /// Walk a collection one page at a time
    Page(page::PageArgs),

    /// Fetch documents by id, or by the ids stored in another document
    Resolve(resolve::ResolveArgs),

    /// Exhibition, news and user views
    Catalog(catalog::CatalogCommand),

    /// Manage the saved store configuration
    Config(config::ConfigCommand),
}

pub async fn handle(cmd: Command, store: &StoreOpts) -> Result<()> {
    match cmd {
        Command::Get(args) => get::run(args, store).await,
        Command::Create(args) => create::run(args, store).await,
        Command::Update(args) => update::run(args, store).await,
        Command::Delete(args) => delete::run(args, store).await,
        Command::Query(args) => query::run(args, store).await,
        Command::Sample(args) => sample::run(args, store).await,
        Command::Page(args) => page::run(args, store).await,
        Command::Resolve(args) => resolve::run(args, store).await,
        Command::Catalog(cmd) => catalog::handle(cmd, store).await,
        Command::Config(cmd) => config::handle(cmd, store),
    }
}

/// Parse a document id argument.
fn parse_id(raw: &str) -> Result<DocumentId> {
    DocumentId::new(raw).with_context(|| format!("Invalid document id '{}'", raw))
}

/// Parse document fields from a JSON argument, or stdin when it is `-`.
fn parse_fields(data: &str) -> Result<Fields> {
    let json = if data == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        data.to_string()
    };

    let value: serde_json::Value = serde_json::from_str(&json).context("Invalid JSON")?;
    fields_from_json(value).context("Document must be a JSON object")
}
