//! Configuration loading and environment overrides.
//!
//! Config file: `pagecheck.toml`, searched in `./` then `~/.config/pagecheck/`.
//! Environment variables (`PORT`, `CHROME`, ...) override file values.

pub mod loader;
pub mod schema;

pub use {
    loader::{apply_env_overrides, discover_and_load, load_config},
    schema::{AuditConfig, BrowserConfig, PagecheckConfig, ServerConfig},
};
