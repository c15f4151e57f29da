//! API route definitions
//!
//! Defines all API routes and their associated handler functions.

use axum::extract::FromRef;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::api::handlers;
use crate::auth::JwtVerifier;
use crate::cron_scheduler::CronEngine;
use crate::db::DatabaseConnection;
use crate::protocol::{a2a, mcp};
use crate::registry::GraphRegistry;
use crate::scheduler::RunScheduler;
use crate::settings::RuntimeConfig;

/// Shared application state, injected into every handler via axum's
/// `State` extractor — replaces the source's module-level singletons
/// (`_storage`, `_scheduler`, `_handler`).
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub registry: GraphRegistry,
    pub scheduler: Arc<RunScheduler>,
    pub cron: Arc<CronEngine>,
    pub config: Arc<RuntimeConfig>,
    pub jwt: JwtVerifier,
}

impl FromRef<AppState> for JwtVerifier {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

/// Build the complete API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
        // Stateful run surface
        .route(
            "/threads/:thread_id/runs",
            post(handlers::runs::create_run),
        )
        .route(
            "/threads/:thread_id/runs/stream",
            post(handlers::runs::stream_run),
        )
        .route(
            "/threads/:thread_id/runs/wait",
            post(handlers::runs::wait_run),
        )
        .route(
            "/threads/:thread_id/runs/:run_id/stream",
            get(handlers::runs::join_stream),
        )
        .route(
            "/threads/:thread_id/runs/:run_id/cancel",
            post(handlers::runs::cancel_run),
        )
        .route(
            "/threads/:thread_id/runs/:run_id",
            get(handlers::runs::get_run).delete(handlers::runs::delete_run),
        )
        // Stateless run surface
        .route("/runs", post(handlers::runs::create_stateless_run))
        .route("/runs/stream", post(handlers::runs::stream_stateless_run))
        .route("/runs/wait", post(handlers::runs::wait_stateless_run))
        .route("/runs/crons", post(handlers::crons::create_cron))
        .route("/runs/crons/:cron_id", delete(handlers::crons::delete_cron))
        // Threads
        .route("/threads", post(handlers::threads::create_thread))
        .route(
            "/threads/:thread_id",
            get(handlers::threads::get_thread)
                .patch(handlers::threads::patch_thread)
                .delete(handlers::threads::delete_thread),
        )
        .route("/threads/:thread_id/state", get(handlers::threads::get_state))
        .route(
            "/threads/:thread_id/history",
            get(handlers::threads::get_history).post(handlers::threads::get_history),
        )
        // Assistants
        .route(
            "/assistants",
            post(handlers::assistants::create_assistant),
        )
        .route(
            "/assistants/:assistant_id",
            get(handlers::assistants::get_assistant)
                .patch(handlers::assistants::update_assistant)
                .delete(handlers::assistants::delete_assistant),
        )
        .route(
            "/assistants/search",
            post(handlers::assistants::search_assistants),
        )
        // Cross-thread memory store
        .route(
            "/store/items",
            put(handlers::store::put_item)
                .get(handlers::store::get_item)
                .delete(handlers::store::delete_item),
        )
        .route("/store/items/search", post(handlers::store::search_items))
        .route("/store/namespaces", get(handlers::store::list_namespaces))
        // Protocol adapters (C9)
        .route("/mcp", post(mcp::handle))
        .route("/a2a/message/send", post(a2a::send))
        .route("/a2a/message/stream", post(a2a::stream))
        .with_state(state)
}
