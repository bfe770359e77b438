//! Router construction and request handlers.

use std::net::SocketAddr;

use {
    axum::{
        Json, Router,
        extract::State,
        http::StatusCode,
        response::IntoResponse,
        routing::{get, post},
    },
    chrono::{SecondsFormat, Utc},
    serde::Deserialize,
    tower_http::cors::{Any, CorsLayer},
    tracing::{error, info},
};

use pagecheck_audit::AuditError;

use crate::state::AppState;

// ── Router ───────────────────────────────────────────────────────────────────

/// Build the service router (shared between production startup and tests).
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/audit", post(audit_handler))
        // Legacy path kept for existing clients.
        .route("/api/audit", post(audit_handler))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server.
pub async fn start_server(bind: &str, port: u16, state: AppState) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    let app = build_app(state);

    info!(%addr, "audit service listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "UP",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "uptime": state.started.elapsed().as_secs_f64(),
    }))
}

#[derive(Debug, Deserialize)]
struct AuditParams {
    #[serde(default)]
    url: Option<String>,
}

async fn audit_handler(
    State(state): State<AppState>,
    Json(params): Json<AuditParams>,
) -> impl IntoResponse {
    let Some(url) = params.url.filter(|u| !u.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "URL is required" })),
        )
            .into_response();
    };

    match state.audit.run_audit(&url).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            error!(url, error = %err, "accessibility audit failed");
            let (status, message) = error_response(&err);
            (status, Json(serde_json::json!({ "error": message }))).into_response()
        },
    }
}

/// Map pipeline errors to client-facing statuses. Detail stays in the server
/// logs; clients get a stable generic message per kind.
fn error_response(err: &AuditError) -> (StatusCode, &'static str) {
    match err {
        AuditError::InvalidUrl(_) => (StatusCode::BAD_REQUEST, "URL must be a valid http(s) URL"),
        AuditError::Busy => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Too many audits in progress, try again later",
        ),
        AuditError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "Audit timed out"),
        AuditError::Launch(_)
        | AuditError::Navigation(_)
        | AuditError::Analysis(_)
        | AuditError::Other(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to run accessibility audit",
        ),
    }
}
