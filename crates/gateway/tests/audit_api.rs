//! Integration tests for the HTTP surface, using stub auditors so no
//! Chromium is needed.

use std::{net::SocketAddr, sync::Arc};

use async_trait::async_trait;

use tokio::net::TcpListener;

use {
    pagecheck_audit::{
        AuditError, AuditReport, AuditService, FormattedFinding, FormattedNode, TestSummary,
    },
    pagecheck_gateway::{server::build_app, state::AppState},
};

/// Auditor stub for a page with zero violations and one passing rule.
struct CleanPageAudit;

#[async_trait]
impl AuditService for CleanPageAudit {
    async fn run_audit(&self, url: &str) -> Result<AuditReport, AuditError> {
        let pass = FormattedFinding {
            id: "document-title".to_string(),
            impact: "N/A".to_string(),
            description: "Ensure each HTML document contains a non-empty <title> element"
                .to_string(),
            help: "Documents must have <title> element to aid in navigation".to_string(),
            help_url: "https://dequeuniversity.com/rules/axe/4.10/document-title".to_string(),
            tags: vec!["wcag2a".to_string()],
            page_url: url.to_string(),
            nodes: vec![FormattedNode {
                html: "<html lang=\"en\">".to_string(),
                message: "Document has a non-empty <title> element".to_string(),
                target: vec!["html".to_string()],
            }],
        };

        Ok(AuditReport {
            url: url.to_string(),
            passes: vec![pass.clone()],
            violations: Vec::new(),
            incomplete: Vec::new(),
            inapplicable: Vec::new(),
            tests_run: vec![TestSummary {
                id: pass.id.clone(),
                title: pass.help.clone(),
                description: pass.description.clone(),
                tags: pass.tags.clone(),
            }],
        })
    }
}

/// Auditor stub that always fails with a fixed error kind.
struct FailingAudit(fn() -> AuditError);

#[async_trait]
impl AuditService for FailingAudit {
    async fn run_audit(&self, _url: &str) -> Result<AuditReport, AuditError> {
        Err((self.0)())
    }
}

/// Bind a throwaway port and serve the app from a background task.
async fn start_server(audit: Arc<dyn AuditService>) -> SocketAddr {
    let app = build_app(AppState::new(audit));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn health_reports_up_with_monotonic_uptime() {
    let addr = start_server(Arc::new(CleanPageAudit)).await;
    let client = reqwest::Client::new();

    let first: serde_json::Value = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["status"], "UP");
    assert!(first["timestamp"].is_string());

    let second: serde_json::Value = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let up1 = first["uptime"].as_f64().unwrap();
    let up2 = second["uptime"].as_f64().unwrap();
    assert!(up2 >= up1, "uptime went backwards: {up1} -> {up2}");
}

#[tokio::test]
async fn audit_without_url_is_rejected_before_any_browser_work() {
    let addr = start_server(Arc::new(FailingAudit(|| {
        AuditError::Launch("should never be reached".into())
    })))
    .await;
    let client = reqwest::Client::new();

    for body in ["{}", r#"{"url": ""}"#, r#"{"url": "   "}"#] {
        let resp = client
            .post(format!("http://{addr}/audit"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 400, "body: {body}");
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["error"], "URL is required");
    }
}

#[tokio::test]
async fn audit_returns_normalized_report() {
    let addr = start_server(Arc::new(CleanPageAudit)).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/audit"))
        .json(&serde_json::json!({ "url": "https://example.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let report: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(report["url"], "https://example.com");
    assert_eq!(report["violations"].as_array().unwrap().len(), 0);
    assert!(!report["passes"].as_array().unwrap().is_empty());
    assert_eq!(report["passes"][0]["pageUrl"], "https://example.com");
    assert_eq!(report["testsRun"][0]["id"], "document-title");
}

#[tokio::test]
async fn legacy_api_audit_path_still_works() {
    let addr = start_server(Arc::new(CleanPageAudit)).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/api/audit"))
        .json(&serde_json::json!({ "url": "https://example.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn pipeline_failures_surface_as_generic_500() {
    let addr = start_server(Arc::new(FailingAudit(|| {
        AuditError::Navigation("net::ERR_NAME_NOT_RESOLVED".into())
    })))
    .await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/audit"))
        .json(&serde_json::json!({ "url": "http://not-a-real-host" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "Failed to run accessibility audit");
}

#[tokio::test]
async fn invalid_url_maps_to_400() {
    let addr = start_server(Arc::new(FailingAudit(|| {
        AuditError::InvalidUrl("unsupported scheme".into())
    })))
    .await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/audit"))
        .json(&serde_json::json!({ "url": "ftp://example.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn overload_and_timeout_have_their_own_statuses() {
    let busy = start_server(Arc::new(FailingAudit(|| AuditError::Busy))).await;
    let timed_out =
        start_server(Arc::new(FailingAudit(|| AuditError::Timeout(60_000)))).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{busy}/audit"))
        .json(&serde_json::json!({ "url": "https://example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);

    let resp = client
        .post(format!("http://{timed_out}/audit"))
        .json(&serde_json::json!({ "url": "https://example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 504);
}
