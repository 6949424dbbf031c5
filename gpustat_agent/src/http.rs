//! HTTP handlers. Collection shells out and blocks, so every cycle runs on the blocking pool.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gpustat::{collect_batch, collect_inventory, collect_reading, load_settings, Host};
use serde::Deserialize;
use tracing::{debug, error};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MultiQuery {
    #[serde(default)]
    pub gpus: String,
}

async fn blocking<T, F>(what: &'static str, f: F) -> Response
where
    F: FnOnce() -> T + Send + 'static,
    T: serde::Serialize + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            error!("{what} collection task failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn gpustatus(State(state): State<AppState>) -> Response {
    debug!("GET /gpustatus");
    blocking("gpustatus", move || {
        let settings = load_settings(state.config.as_deref().map(|p| p.as_path()));
        collect_reading(&settings, &Host::system())
    })
    .await
}

pub async fn gpustatus_multi(
    State(state): State<AppState>,
    Query(q): Query<MultiQuery>,
) -> Response {
    debug!("GET /gpustatus/multi");
    blocking("gpustatus/multi", move || {
        let settings = load_settings(state.config.as_deref().map(|p| p.as_path()));
        collect_batch(&q.gpus, &settings, &Host::system())
    })
    .await
}

pub async fn inventory() -> Response {
    debug!("GET /inventory");
    blocking("inventory", || collect_inventory(&Host::system())).await
}
