//! CLI configuration.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use turbo_cart::{StoreOptions, CART_STORAGE_KEY};
use turbo_data::{FetchClient, RetryPolicy};
use turbo_observability::LogConfig;

/// Config file names searched for, in order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["cart.toml", ".cart.toml", "cart.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Storefront API.
    #[serde(default)]
    pub api: ApiConfig,

    /// Where the cart snapshot is kept.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Cart behavior.
    #[serde(default)]
    pub cart: CartSection,

    /// Log output.
    #[serde(default)]
    pub logging: LogConfig,
}

impl CartConfig {
    /// Load config from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Options for the cart store.
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            storage_key: self.storage.key.clone(),
            report_missing_products: self.cart.report_missing_products,
        }
    }

    /// HTTP client for the storefront API.
    pub fn fetch_client(&self) -> FetchClient {
        FetchClient::new()
            .with_base_url(self.api.base_url.clone())
            .with_timeout(Duration::from_millis(self.api.timeout_ms))
            .with_retry(RetryPolicy::new(self.api.max_retries))
    }
}

/// Storefront API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL serving `/stock/{id}` and `/products/{id}`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries for transient failures (5xx, timeouts, connection errors).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_max_retries() -> u32 {
    1
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

/// Snapshot storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the snapshot, relative to the working directory
    /// unless absolute.
    #[serde(default = "default_storage_dir")]
    pub dir: String,

    /// Snapshot key.
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_dir() -> String {
    ".cart".to_string()
}

fn default_storage_key() -> String {
    CART_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            key: default_storage_key(),
        }
    }
}

/// Cart behavior settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSection {
    /// Show "error adding product" when the catalog doesn't know a product.
    #[serde(default)]
    pub report_missing_products: bool,
}

/// Generate a default cart.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Cart configuration

[api]
base_url = "{base_url}"
timeout_ms = {timeout_ms}
max_retries = {max_retries}

[storage]
dir = "{dir}"
key = "{key}"

[cart]
report_missing_products = false

[logging]
level = "info"
format = "human"
"#,
        base_url = default_base_url(),
        timeout_ms = default_timeout_ms(),
        max_retries = default_max_retries(),
        dir = default_storage_dir(),
        key = default_storage_key(),
    )
}
