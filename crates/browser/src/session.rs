//! One isolated browser process per audit.

use std::time::Duration;

use {
    chromiumoxide::{
        Browser, BrowserConfig as CdpBrowserConfig, Page,
        cdp::js_protocol::runtime::EvaluateParams,
    },
    futures::StreamExt,
    tokio::task::JoinHandle,
    tracing::{debug, info},
};

use pagecheck_config::BrowserConfig;

use crate::{detect, error::BrowserError};

/// A dedicated browser process with a single page.
///
/// Launched at the start of one audit, closed before its result is surfaced.
/// Dropping the session kills the child process, so a handle leaked on an
/// unexpected path cannot outlive its request.
pub struct BrowserSession {
    id: String,
    browser: Browser,
    page: Page,
    event_task: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch a fresh browser process and open a blank page.
    pub async fn launch(config: &BrowserConfig) -> Result<Self, BrowserError> {
        let detection = detect::detect_browser(config.chrome_path.as_deref());
        let Some(chrome) = detection.path else {
            return Err(BrowserError::BrowserNotAvailable(detection.install_hint));
        };

        let mut builder = CdpBrowserConfig::builder();

        // chromiumoxide runs headless by default; with_head() shows the window
        if !config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .chrome_executable(&chrome)
            .request_timeout(Duration::from_millis(config.navigation_timeout_ms));

        for arg in &config.chrome_args {
            builder = builder.arg(arg);
        }

        // Flags for constrained/containerized environments
        builder = builder
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox");

        let cdp_config = builder.build().map_err(|e| {
            BrowserError::LaunchFailed(format!("failed to build browser config: {e}"))
        })?;

        let (mut browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        let id = generate_session_id();

        // Drive browser events until the connection closes
        let sid = id.clone();
        let event_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!(session_id = sid, ?event, "browser event");
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                let _ = browser.wait().await;
                event_task.abort();
                return Err(BrowserError::LaunchFailed(format!(
                    "failed to open page: {e}"
                )));
            },
        };

        info!(session_id = id, chrome = %chrome.display(), "launched browser session");

        Ok(Self {
            id,
            browser,
            page,
            event_task,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Navigate the session's page and wait for the load to settle.
    ///
    /// A page that never settles is bounded by the CDP request timeout here
    /// and by the caller's overall audit deadline.
    pub async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed(e.to_string()))?;

        // Best effort: a page that never settles is bounded by the CDP
        // request timeout and the caller's audit deadline.
        if let Err(e) = self.page.wait_for_navigation().await {
            debug!(session_id = self.id, error = %e, "wait for navigation returned an error");
        }

        let current = self.page.url().await.ok().flatten().unwrap_or_default();
        debug!(session_id = self.id, url = current, "navigated to URL");
        Ok(())
    }

    /// Evaluate a JavaScript expression in the page, awaiting any returned
    /// promise, and return the resolved value.
    pub async fn evaluate(&self, expression: &str) -> Result<serde_json::Value, BrowserError> {
        let params = eval_params(expression, true).map_err(BrowserError::JsEvalFailed)?;

        let value: serde_json::Value = self
            .page
            .evaluate(params)
            .await
            .map_err(|e| BrowserError::JsEvalFailed(e.to_string()))?
            .into_value()
            .map_err(|e| BrowserError::JsEvalFailed(format!("{e:?}")))?;

        Ok(value)
    }

    /// Run a script for its side effects, discarding the completion value.
    ///
    /// Used for injecting libraries whose last-statement value need not be
    /// serializable (a minified bundle's completion value is an
    /// implementation detail of the bundle).
    pub async fn execute(&self, script: &str) -> Result<(), BrowserError> {
        let params = eval_params(script, false).map_err(BrowserError::JsEvalFailed)?;

        self.page
            .evaluate(params)
            .await
            .map_err(|e| BrowserError::JsEvalFailed(e.to_string()))?;

        Ok(())
    }

    /// Shut the browser process down gracefully. Errors are swallowed; the
    /// process is killed on drop anyway.
    pub async fn close(mut self) {
        let _ = self.browser.close().await;
        let _ = self.browser.wait().await;
        self.event_task.abort();
        info!(session_id = self.id, "closed browser session");
    }
}

/// Build CDP evaluate params. With `capture_value` the call awaits any
/// returned promise and serializes the result; without it the completion
/// value stays in the page.
fn eval_params(expression: &str, capture_value: bool) -> Result<EvaluateParams, String> {
    let mut builder = EvaluateParams::builder().expression(expression);
    if capture_value {
        builder = builder.await_promise(true).return_by_value(true);
    }
    builder.build()
}

/// Generate a random session ID.
fn generate_session_id() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    let id: u64 = rng.random();
    format!("audit-{:016x}", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_unique() {
        let id1 = generate_session_id();
        let id2 = generate_session_id();
        assert_ne!(id1, id2);
        assert!(id1.starts_with("audit-"));
    }

    #[test]
    fn capturing_eval_params_await_promises_and_serialize() {
        let params = eval_params("axe.run(document)", true).unwrap();
        assert_eq!(params.await_promise, Some(true));
        assert_eq!(params.return_by_value, Some(true));
    }

    #[test]
    fn side_effect_eval_params_leave_the_completion_value_in_the_page() {
        let params = eval_params("window.axe = {};", false).unwrap();
        assert_eq!(params.await_promise, None);
        assert_eq!(params.return_by_value, None);
    }
}
