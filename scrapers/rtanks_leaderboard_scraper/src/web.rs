use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::oneshot;
use tracing::info;

use crate::{config::ScraperConfig, pagination::page, scheduler::SnapshotStore, types::Category};

pub const HEALTH_MESSAGE: &str = "RTanks leaderboard bot is alive!";

#[derive(Clone)]
pub struct AppState {
    pub snapshots: SnapshotStore,
    pub config: Arc<ScraperConfig>,
}

pub async fn health_handler() -> &'static str {
    HEALTH_MESSAGE
}

#[axum::debug_handler]
pub async fn snapshot_handler(State(state): State<AppState>) -> Response {
    match state.snapshots.latest() {
        Some(snapshot) => Json(snapshot).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "No leaderboard scraped yet").into_response(),
    }
}

#[axum::debug_handler]
pub async fn page_handler(
    State(state): State<AppState>,
    Path((category, page_number)): Path<(String, usize)>,
) -> Response {
    let Ok(category) = category.parse::<Category>() else {
        return (StatusCode::NOT_FOUND, format!("Unknown category: {}", category)).into_response();
    };
    let Some(snapshot) = state.snapshots.latest() else {
        return (StatusCode::SERVICE_UNAVAILABLE, "No leaderboard scraped yet").into_response();
    };

    let per_page = state.config.publish.players_per_page;
    match page(snapshot.records(category), category, page_number, per_page) {
        Some(p) => Json(p).into_response(),
        None => (StatusCode::NOT_FOUND, format!("No page {} for {}", page_number, category)).into_response(),
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/leaderboards", get(snapshot_handler))
        .route("/leaderboards/{category}/{page}", get(page_handler))
        .with_state(state)
}

/// Serves on all interfaces until `shutdown` fires.
pub async fn serve(state: AppState, shutdown: oneshot::Receiver<()>) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.publish.port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Health endpoint available at http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = shutdown.await;
        })
        .await
        .context("Web server failed")
}
