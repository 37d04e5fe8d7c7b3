//! Operational HTTP endpoints.
//!
//! - `/healthz` : liveness
//! - `/metrics` : Prometheus text format

use axum::{extract::State, http::StatusCode, response::{IntoResponse, Response}};

use crate::app_state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Renders whatever the samplers last wrote; never triggers a sample.
pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.render_metrics();

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
