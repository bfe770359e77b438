use std::sync::Arc;

use {
    clap::Parser,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    pagecheck_audit::{AxeEngine, LiveAuditService},
    pagecheck_config::{apply_env_overrides, discover_and_load, load_config},
    pagecheck_gateway::{server::start_server, state::AppState},
};

#[derive(Parser)]
#[command(name = "pagecheck", about = "Accessibility audit service for web pages")]
struct Cli {
    /// Path to a config file (defaults to discovery in ./ and the user
    /// config dir).
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Address to bind to (overrides config value).
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides config value).
    #[arg(long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_telemetry(&cli);

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => discover_and_load(),
    };
    apply_env_overrides(&mut config);
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let engine = AxeEngine::load(&config.audit).await?;
    let audit = LiveAuditService::new(config.browser.clone(), &config.audit, engine);
    let state = AppState::new(Arc::new(audit));

    info!(
        max_concurrent = config.audit.max_concurrent,
        timeout_ms = config.audit.timeout_ms,
        "audit service configured"
    );

    start_server(&config.server.bind, config.server.port, state).await
}

/// Initialise tracing from `RUST_LOG` or the `--log-level` flag.
fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}
