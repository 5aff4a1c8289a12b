use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;

use super::{model::DashboardStats, service};
use crate::{ApiState, error::ApiError};

pub fn routes() -> Router<ApiState> {
    Router::new().route("/stats", get(get_stats))
}

async fn get_stats(State(state): State<ApiState>) -> Result<Json<DashboardStats>, ApiError> {
    let stats = service::dashboard_stats(&state.pool, Utc::now()).await?;
    Ok(Json(stats))
}
