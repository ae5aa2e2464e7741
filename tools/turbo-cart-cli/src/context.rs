//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use turbo_cache::Cache;
use turbo_cart::{CartStore, HttpStorefront, NotificationSink};

use crate::config::{CartConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CartConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            let path = resolve(&cwd, path);
            (CartConfig::load(&path)?, Some(path))
        } else {
            match find_config(&cwd, &output) {
                Some((path, config)) => (config, Some(path)),
                None => (CartConfig::default(), None),
            }
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory holding the cart snapshot.
    pub fn storage_dir(&self) -> PathBuf {
        resolve(&self.cwd, &self.config.storage.dir)
    }

    /// Open the snapshot store.
    pub fn open_cache(&self) -> Result<Cache> {
        let dir = self.storage_dir();
        Cache::open_dir(dir.clone())
            .with_context(|| format!("Failed to open cart storage: {}", dir.display()))
    }

    /// Open the cart store against the configured storefront API.
    pub fn open_store(&self, notifier: Arc<dyn NotificationSink>) -> Result<CartStore> {
        let api = Arc::new(HttpStorefront::new(self.config.fetch_client()));
        tracing::debug!(base_url = %self.config.api.base_url, "using storefront API");
        Ok(CartStore::open(
            self.open_cache()?,
            api.clone(),
            api,
            notifier,
            self.config.store_options(),
        ))
    }
}

/// Find config file in directory tree.
fn find_config(start: &Path, output: &Output) -> Option<(PathBuf, CartConfig)> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                match CartConfig::load(&config_path) {
                    Ok(config) => return Some((config_path, config)),
                    Err(e) => output.warn(&format!("Skipping config: {:#}", e)),
                }
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Resolve a path relative to `base`.
fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
