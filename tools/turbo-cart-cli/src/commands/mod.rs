//! CLI command implementations.

pub mod cart;
pub mod config;

use clap::{Args, Subcommand};

/// A command failed and its notices have already been shown.
#[derive(Debug, thiserror::Error)]
#[error("cart operation failed")]
pub struct Reported;

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product id.
    pub product_id: u64,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Product id.
    pub product_id: u64,
}

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Product id.
    pub product_id: u64,

    /// New amount. Zero or less leaves the cart unchanged.
    #[arg(allow_negative_numbers = true)]
    pub amount: i64,
}

/// Arguments for the clear command.
#[derive(Args)]
pub struct ClearArgs {
    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
