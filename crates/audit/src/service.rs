//! Audit orchestration: one browser session per request, bounded and
//! deadlined.

use std::time::Duration;

use {async_trait::async_trait, tracing::info};

use {
    pagecheck_browser::{BrowserSession, SessionLimiter},
    pagecheck_config::{AuditConfig, BrowserConfig},
};

use crate::{
    engine::AxeEngine,
    format,
    types::{AuditReport, RawResults},
};

/// Errors surfaced by the audit pipeline, tagged by stage so the HTTP
/// boundary can map them to distinct statuses.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("audit capacity reached")]
    Busy,

    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("accessibility analysis failed: {0}")]
    Analysis(String),

    #[error("audit timed out after {0} ms")]
    Timeout(u64),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Interface the HTTP surface depends on. Lets tests stand in a stub
/// auditor that needs no Chromium.
#[async_trait]
pub trait AuditService: Send + Sync {
    async fn run_audit(&self, url: &str) -> Result<AuditReport, AuditError>;
}

/// Production auditor: launches an isolated headless browser per request.
pub struct LiveAuditService {
    browser: BrowserConfig,
    limiter: SessionLimiter,
    engine: AxeEngine,
    deadline_ms: u64,
}

impl LiveAuditService {
    pub fn new(browser: BrowserConfig, audit: &AuditConfig, engine: AxeEngine) -> Self {
        Self {
            browser,
            limiter: SessionLimiter::new(audit.max_concurrent),
            engine,
            deadline_ms: audit.timeout_ms,
        }
    }

    async fn audit_page(
        &self,
        session: &BrowserSession,
        url: &str,
    ) -> Result<AuditReport, AuditError> {
        session
            .navigate(url)
            .await
            .map_err(|e| AuditError::Navigation(e.to_string()))?;

        let raw = self
            .engine
            .run(session)
            .await
            .map_err(|e| AuditError::Analysis(e.to_string()))?;

        Ok(build_report(&raw, url))
    }
}

#[async_trait]
impl AuditService for LiveAuditService {
    async fn run_audit(&self, url: &str) -> Result<AuditReport, AuditError> {
        validate_url(url)?;

        let permit = self.limiter.try_acquire().map_err(|_| AuditError::Busy)?;

        let session = BrowserSession::launch(&self.browser)
            .await
            .map_err(|e| AuditError::Launch(e.to_string()))?;

        info!(session_id = session.id(), url, "starting accessibility audit");

        // The session is closed on every path out of here, timeout included.
        let outcome = tokio::time::timeout(
            Duration::from_millis(self.deadline_ms),
            self.audit_page(&session, url),
        )
        .await;

        session.close().await;
        drop(permit);

        match outcome {
            Ok(result) => {
                if result.is_ok() {
                    info!(url, "accessibility audit finished");
                }
                result
            },
            Err(_) => Err(AuditError::Timeout(self.deadline_ms)),
        }
    }
}

/// Assemble the final report from raw categorized results.
fn build_report(raw: &RawResults, url: &str) -> AuditReport {
    AuditReport {
        url: url.to_string(),
        passes: format::format_findings(&raw.passes, url),
        violations: format::format_findings(&raw.violations, url),
        incomplete: format::format_findings(&raw.incomplete, url),
        inapplicable: format::format_findings(&raw.inapplicable, url),
        tests_run: format::summarize_tests(raw),
    }
}

/// Reject anything that is not an absolute http(s) URL before a browser is
/// ever launched.
pub fn validate_url(url: &str) -> Result<(), AuditError> {
    if url.trim().is_empty() {
        return Err(AuditError::InvalidUrl("URL cannot be empty".to_string()));
    }

    let parsed =
        url::Url::parse(url).map_err(|e| AuditError::InvalidUrl(format!("'{url}': {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(AuditError::InvalidUrl(format!(
            "unsupported scheme '{scheme}', only http/https allowed"
        ))),
    }
}
