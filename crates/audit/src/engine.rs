//! axe-core provisioning and in-page invocation.

use std::sync::Arc;

use tracing::info;

use {pagecheck_browser::{BrowserError, BrowserSession}, pagecheck_config::AuditConfig};

use crate::types::RawResults;

/// Runs the rule engine against the loaded document. `axe.run` resolves with
/// `{ passes, violations, incomplete, inapplicable }`.
const RUN_EXPRESSION: &str = "axe.run(document)";

/// Confirms the injected script actually initialized before running it.
const PROBE_EXPRESSION: &str = "typeof window.axe === 'object'";

/// The axe-core source, loaded once at startup and injected into every
/// audited page.
#[derive(Clone)]
pub struct AxeEngine {
    source: Arc<String>,
}

impl AxeEngine {
    /// Load the rule-engine script from the configured local path, or fetch
    /// it from the configured URL.
    pub async fn load(config: &AuditConfig) -> anyhow::Result<Self> {
        let source = match &config.script_path {
            Some(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| anyhow::anyhow!("failed to read axe script {path}: {e}"))?,
            None => fetch_script(&config.script_url).await?,
        };

        if source.trim().is_empty() {
            anyhow::bail!("axe-core script is empty");
        }

        info!(bytes = source.len(), "loaded axe-core script");
        Ok(Self::from_source(source))
    }

    /// Build an engine from an already-obtained script source.
    pub fn from_source(source: String) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Inject axe-core into the page and run it, returning the four raw
    /// result categories.
    pub async fn run(&self, session: &BrowserSession) -> Result<RawResults, BrowserError> {
        // Inject for side effects only; the probe below checks readiness.
        session.execute(&self.source).await?;

        let probe = session.evaluate(PROBE_EXPRESSION).await?;
        if probe != serde_json::Value::Bool(true) {
            return Err(BrowserError::JsEvalFailed(
                "axe-core did not initialize in the page".to_string(),
            ));
        }

        let value = session.evaluate(RUN_EXPRESSION).await?;
        serde_json::from_value(value)
            .map_err(|e| BrowserError::JsEvalFailed(format!("unexpected axe results shape: {e}")))
    }
}

async fn fetch_script(url: &str) -> anyhow::Result<String> {
    info!(url, "fetching axe-core script");
    let response = reqwest::get(url)
        .await
        .map_err(|e| anyhow::anyhow!("failed to fetch axe script from {url}: {e}"))?
        .error_for_status()
        .map_err(|e| anyhow::anyhow!("axe script fetch returned an error status: {e}"))?;
    Ok(response.text().await?)
}
