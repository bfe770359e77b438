//! Configuration schema.

use serde::{Deserialize, Serialize};

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PagecheckConfig {
    pub server: ServerConfig,
    pub browser: BrowserConfig,
    pub audit: AuditConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "0.0.0.0".
    pub bind: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Headless browser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Path to Chrome/Chromium binary (auto-detected if not set).
    pub chrome_path: Option<String>,
    /// Whether to run in headless mode.
    pub headless: bool,
    /// Per-command CDP timeout in milliseconds (navigation included).
    pub navigation_timeout_ms: u64,
    /// Additional Chrome arguments.
    pub chrome_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: true,
            navigation_timeout_ms: 30_000,
            chrome_args: Vec::new(),
        }
    }
}

/// Audit orchestration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Maximum concurrent audits. Each audit owns one browser process, so
    /// this caps browser processes too. Requests beyond the cap get 503.
    pub max_concurrent: usize,
    /// Deadline for one audit's navigate + analyze span, in milliseconds.
    pub timeout_ms: u64,
    /// Local axe-core script path. Takes precedence over `script_url`.
    pub script_path: Option<String>,
    /// URL the axe-core script is fetched from when no local path is set.
    pub script_url: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            timeout_ms: 60_000,
            script_path: None,
            script_url: "https://cdn.jsdelivr.net/npm/axe-core@4.10.3/axe.min.js".to_string(),
        }
    }
}
