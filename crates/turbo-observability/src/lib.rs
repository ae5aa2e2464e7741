//! Logging setup for TurboCommerce tools and services.
//!
//! Library crates emit events with the `tracing` macros; binaries call
//! [`init`] once at startup to install a subscriber.
//!
//! ```rust,ignore
//! use turbo_observability::{LogConfig, LogFormat, LogLevel};
//!
//! turbo_observability::init(&LogConfig {
//!     level: LogLevel::Debug,
//!     format: LogFormat::Human,
//! })?;
//! ```

mod logging;

pub use logging::*;
