//! Config subcommand implementations.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use artion_core::StoreUrl;

use crate::cli::StoreOpts;
use crate::output;
use crate::store::{self, config};

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Show the store that commands would use
    Show,

    /// Save a default store URL
    SetStore {
        /// Firestore `.../documents` base URL or file:///path
        url: String,
    },

    /// Forget the saved configuration
    Clear,
}

pub fn handle(cmd: ConfigCommand, opts: &StoreOpts) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Show => {
            let url = store::resolve_url(opts)?;
            output::field("Store", url.as_str());
            output::field("Backend", if url.is_local() { "file" } else { "firestore" });
            output::field("Config", &config::config_path()?.display().to_string());
            Ok(())
        }
        ConfigSubcommand::SetStore { url } => {
            let url = StoreUrl::new(&url).context("Invalid store URL")?;
            config::save(&config::StoredConfig {
                store: url.to_string(),
            })?;
            output::success(&format!("Default store set to {}", url));
            Ok(())
        }
        ConfigSubcommand::Clear => {
            if config::clear()? {
                output::success("Configuration cleared");
            } else {
                output::note("No saved configuration.");
            }
            Ok(())
        }
    }
}
