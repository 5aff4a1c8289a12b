use aq_db::{
    models::{FilterCounts, TagCount},
    repositories::{selection, tags},
};
use axum::{Json, Router, extract::State, routing::get};
use axum_extra::extract::{Query, QueryRejection};
use chrono::Utc;
use serde::Deserialize;

use crate::{ApiState, error::ApiError, validation::normalize_tags};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/filter-counts", get(get_filter_counts))
        .route("/tags", get(get_tags))
}

/// `?tags=S3&tags=EC2`
#[derive(Debug, Default, Deserialize)]
struct TagFilterQuery {
    #[serde(default)]
    tags: Vec<String>,
}

/// Number of questions each filter mode would match under the tag filter
async fn get_filter_counts(
    State(state): State<ApiState>,
    query: Result<Query<TagFilterQuery>, QueryRejection>,
) -> Result<Json<FilterCounts>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::InvalidInput(e.to_string()))?;
    let tags = normalize_tags(Some(query.tags))?;

    let counts = selection::filter_counts(&state.pool, tags.as_deref(), Utc::now()).await?;
    Ok(Json(counts))
}

async fn get_tags(State(state): State<ApiState>) -> Result<Json<Vec<TagCount>>, ApiError> {
    let tags = tags::tag_counts(&state.pool).await?;
    Ok(Json(tags))
}
