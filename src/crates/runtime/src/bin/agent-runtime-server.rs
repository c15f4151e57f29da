//! Agent runtime server binary
//!
//! Standalone server exposing the multi-tenant agent run scheduler,
//! streaming engine, and persistence boundary over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;

use agent_runtime::api::routes::{create_router, AppState};
use agent_runtime::auth::JwtVerifier;
use agent_runtime::cron_scheduler::CronEngine;
use agent_runtime::db::DatabaseConnection;
use agent_runtime::graphs;
use agent_runtime::registry::{GraphFactory, GraphRegistry, DEFAULT_GRAPH_ID};
use agent_runtime::scheduler::RunScheduler;
use agent_runtime::settings::{LogFormat, RuntimeConfig};

/// Command-line overrides for `RuntimeConfig` (§1.1 ambient stack). Every
/// flag falls back to the matching environment variable when omitted.
#[derive(Parser, Debug)]
#[command(name = "agent-runtime-server")]
struct Cli {
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long, env = "BIND_ADDR")]
    bind: Option<String>,

    #[arg(long, env = "LOG_FORMAT")]
    log_format: Option<String>,
}

/// Register the two graphs every deployment starts with (§4.3): the
/// default ReAct-style agent under [`DEFAULT_GRAPH_ID`], and the
/// two-phase research graph under `"research"`. Both are registered
/// lazily — their `ChatModel` backend (and, for `react`, the teacher's
/// `create_react_agent` builder) isn't resolved until first use.
fn register_default_graphs(registry: &GraphRegistry) {
    registry.register(DEFAULT_GRAPH_ID, GraphFactory::lazy("agent_runtime::graphs::react", "resolver", graphs::react::resolver));
    registry.register("research", GraphFactory::lazy("agent_runtime::graphs::research", "resolver", graphs::research::resolver));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = RuntimeConfig::from_env()?;
    if let Some(database_url) = cli.database_url {
        config.database_url = database_url;
    }
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    if let Some(log_format) = cli.log_format {
        config.log_format = log_format.parse().map_err(|e: String| e)?;
    }

    match config.log_format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt()
                .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
                .init();
        }
    }

    tracing::info!(bind = %config.bind_addr, "starting agent runtime server");

    let db = DatabaseConnection::with_max_connections(&config.database_url, config.max_connections).await?;
    db.run_migrations().await?;
    db.health_check().await?;
    db.enable_rls_on_checkpoint_tables().await?;

    let registry = GraphRegistry::new();
    register_default_graphs(&registry);

    let pool = Arc::new(db.pool().clone());
    let scheduler = Arc::new(RunScheduler::new(pool.clone(), registry.clone()));
    let cron = CronEngine::new(pool.clone(), scheduler.clone());
    let cron = Arc::new(cron);
    let _cron_handle = cron.clone().spawn();

    let jwt = JwtVerifier::new(&config.jwt_secret);
    let config = Arc::new(config);

    let state = AppState {
        db,
        registry,
        scheduler,
        cron,
        config: config.clone(),
        jwt,
    };

    let app = create_router(state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("agent runtime server shut down gracefully");
    Ok(())
}

/// Wait for Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL-C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received CTRL-C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
