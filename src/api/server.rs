//! HTTP server wiring: router construction, listener setup, shutdown.

use axum::routing::{get, post};
use axum::{Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{energy, projects, tasks, teams, users};
use crate::config::Config;
use crate::db::Database;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Database>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the router with all routes.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        // Users
        .route("/api/users", post(users::register))
        .route("/api/users/me", get(users::me).delete(users::delete_me))
        .route("/api/stats", get(users::stats))
        // Projects
        .route(
            "/api/projects",
            post(projects::create).get(projects::list),
        )
        .route(
            "/api/projects/{project_id}",
            get(projects::get_one)
                .put(projects::update)
                .delete(projects::delete_one),
        )
        // Tasks
        .route("/api/tasks", post(tasks::create).get(tasks::list))
        .route("/api/tasks/suggestions", get(tasks::suggestions))
        .route(
            "/api/tasks/{task_id}",
            get(tasks::get_one)
                .put(tasks::update)
                .delete(tasks::delete_one),
        )
        .route("/api/tasks/{task_id}/complete", post(tasks::complete))
        .route(
            "/api/tasks/{task_id}/dependencies",
            get(tasks::list_dependencies),
        )
        .route(
            "/api/tasks/{task_id}/dependencies/{dep_id}",
            post(tasks::add_dependency).delete(tasks::remove_dependency),
        )
        // Energy
        .route("/api/energy", post(energy::create).get(energy::list))
        .route("/api/energy/pattern", get(energy::pattern))
        .route("/api/energy/{log_id}", get(energy::get_one))
        .route("/api/energy/insights", get(energy::insights))
        // Teams
        .route("/api/teams", post(teams::create).get(teams::list))
        .route(
            "/api/teams/{team_id}",
            get(teams::get_one).delete(teams::delete_one),
        )
        .route("/api/teams/{team_id}/members", get(teams::list_members))
        .route(
            "/api/teams/{team_id}/members/{member_id}",
            post(teams::add_member).delete(teams::remove_member),
        )
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listener and serve until ctrl-c.
pub async fn serve(db: Arc<Database>, config: &Config) -> anyhow::Result<()> {
    let state = AppState::new(db);
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    info!("API server listening on http://{}", bound_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("API server shutting down");
        })
        .await?;

    Ok(())
}
