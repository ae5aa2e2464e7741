//! Cart CLI - Command line shopping cart for TurboCommerce storefronts.
//!
//! Commands:
//! - `cart show` - Print the cart
//! - `cart add` - Add one unit of a product
//! - `cart remove` - Remove a product
//! - `cart update` - Set a product's amount
//! - `cart clear` - Empty the cart
//! - `cart config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use turbo_observability::{LogConfig, LogLevel};

use commands::{AddArgs, ClearArgs, ConfigArgs, RemoveArgs, Reported, UpdateArgs};

/// Cart CLI - Manage a storefront shopping cart
#[derive(Parser)]
#[command(name = "cart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Logging settings: `--log-level` wins, then `-v` (debug), then the
    /// config file.
    fn log_config(&self, configured: &LogConfig) -> LogConfig {
        let level = match self.log_level {
            Some(level) => level,
            None if self.verbose => LogLevel::Debug,
            None => configured.level,
        };
        LogConfig {
            level,
            format: configured.format,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cart
    Show,

    /// Add one unit of a product
    Add(AddArgs),

    /// Remove a product from the cart
    Remove(RemoveArgs),

    /// Set a product's amount
    Update(UpdateArgs),

    /// Empty the cart
    Clear(ClearArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    if let Err(e) = turbo_observability::init(&cli.log_config(&ctx.config.logging)) {
        ctx.output.warn(&e.to_string());
    }

    // Execute command
    let result = match cli.command {
        Commands::Show => commands::cart::show(&ctx).await,
        Commands::Add(args) => commands::cart::add(args, &ctx).await,
        Commands::Remove(args) => commands::cart::remove(args, &ctx).await,
        Commands::Update(args) => commands::cart::update(args, &ctx).await,
        Commands::Clear(args) => commands::cart::clear(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        if e.downcast_ref::<Reported>().is_none() {
            ctx.output.error(&format!("{:#}", e));
        }
        std::process::exit(1);
    }

    Ok(())
}
