//! CLI argument definitions.

use clap::{Args, Parser};

use crate::commands::Command;

/// Explore and seed an artion document store.
#[derive(Parser, Debug)]
#[command(name = "artion")]
#[command(author, version = env!("ARTION_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub store: StoreOpts,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the documents live.
#[derive(Args, Debug, Clone, Default)]
pub struct StoreOpts {
    /// Store URL: a Firestore `.../documents` base or file:///path
    /// (defaults to $ARTION_STORE, then the saved config)
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Bearer token for Firestore (defaults to $ARTION_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,
}
