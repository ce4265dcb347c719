use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::catalog::SearchHit,
    state::AppState,
};

/// The query parameters for `/api/search`.
#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// The query parameters for `/api/movie`.
#[derive(Deserialize)]
pub struct DetailQuery {
    pub id: Option<String>,
}

/// The wire envelope for search results, matching the catalog's own shape.
#[derive(Serialize)]
struct SearchResults {
    #[serde(rename = "Search")]
    search: Vec<SearchHit>,
}

/// Proxies a free-text catalog search. Bypasses the access gate.
#[axum::debug_handler]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response> {
    let q = query
        .q
        .ok_or_else(|| AppError::Validation("Query is required".to_string()))?;

    let hits = state.catalog.search(&q).await?;

    let body = sonic_rs::to_string(&SearchResults { search: hits })
        .map_err(|e| AppError::Internal(format!("Serialization failed: {}", e)))?;

    Ok((StatusCode::OK, body).into_response())
}

/// Proxies a catalog detail lookup by identifier. Bypasses the access gate.
#[axum::debug_handler]
pub async fn movie(
    State(state): State<AppState>,
    Query(query): Query<DetailQuery>,
) -> Result<Response> {
    let id = query
        .id
        .ok_or_else(|| AppError::Validation("Id is required".to_string()))?;

    let details = state.catalog.details(&id).await?;

    let body = sonic_rs::to_string(&details)
        .map_err(|e| AppError::Internal(format!("Serialization failed: {}", e)))?;

    Ok((StatusCode::OK, body).into_response())
}
