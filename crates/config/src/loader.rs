//! Config discovery, parsing, and environment overrides.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::schema::PagecheckConfig;

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["pagecheck.toml"];

/// Load config from the given path.
pub fn load_config(path: &Path) -> anyhow::Result<PagecheckConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    toml::from_str(&raw).map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./pagecheck.toml` (project-local)
/// 2. `~/.config/pagecheck/pagecheck.toml` (user-global)
///
/// Returns `PagecheckConfig::default()` if no config file is found.
pub fn discover_and_load() -> PagecheckConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    PagecheckConfig::default()
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    // Project-local
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    // User-global: ~/.config/pagecheck/
    if let Some(dirs) = directories::ProjectDirs::from("", "", "pagecheck") {
        let config_dir = dirs.config_dir();
        for name in CONFIG_FILENAMES {
            let p = config_dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

/// Apply environment variable overrides on top of a loaded config.
///
/// `PORT` and `CHROME` are the variables the service's usual container
/// deployments set (listen port, externally supplied browser binary).
pub fn apply_env_overrides(config: &mut PagecheckConfig) {
    override_from(config, |name| std::env::var(name).ok());
}

fn override_from(config: &mut PagecheckConfig, get: impl Fn(&str) -> Option<String>) {
    if let Some(port) = get("PORT") {
        match port.parse() {
            Ok(p) => config.server.port = p,
            Err(_) => warn!(value = port, "ignoring unparsable PORT"),
        }
    }
    if let Some(bind) = get("PAGECHECK_BIND") {
        config.server.bind = bind;
    }
    if let Some(path) = get("CHROME") {
        config.browser.chrome_path = Some(path);
    }
    if let Some(max) = get("PAGECHECK_MAX_CONCURRENT") {
        match max.parse() {
            Ok(m) => config.audit.max_concurrent = m,
            Err(_) => warn!(value = max, "ignoring unparsable PAGECHECK_MAX_CONCURRENT"),
        }
    }
    if let Some(path) = get("PAGECHECK_AXE_SCRIPT") {
        config.audit.script_path = Some(path);
    }
}
