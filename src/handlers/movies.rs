use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    error::Result,
    models::{catalog::MovieDetails, session::Identity},
    services::watchlist,
    state::AppState,
};

/// Lists the caller's watchlist, most recent first.
#[axum::debug_handler]
pub async fn list_movies(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response> {
    let movies = watchlist::list(&state, identity.id).await?;

    let body = sonic_rs::to_string(&movies)
        .map_err(|e| crate::error::AppError::Internal(format!("Serialization failed: {}", e)))?;

    Ok((StatusCode::OK, body).into_response())
}

/// Adds a catalog record to the caller's watchlist.
#[axum::debug_handler]
pub async fn add_movie(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(details): Json<MovieDetails>,
) -> Result<Response> {
    let movie = watchlist::add(&state, identity.id, details).await?;

    let body = sonic_rs::to_string(&movie)
        .map_err(|e| crate::error::AppError::Internal(format!("Serialization failed: {}", e)))?;

    Ok((StatusCode::CREATED, body).into_response())
}

/// Flips the watched flag on one of the caller's entries.
#[axum::debug_handler]
pub async fn toggle_watched(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(movie_id): Path<Uuid>,
) -> Result<Response> {
    let movie = watchlist::toggle_watched(&state, identity.id, movie_id).await?;

    let body = sonic_rs::to_string(&movie)
        .map_err(|e| crate::error::AppError::Internal(format!("Serialization failed: {}", e)))?;

    Ok((StatusCode::OK, body).into_response())
}

/// Removes one of the caller's entries. Succeeds whether or not the row
/// existed.
#[axum::debug_handler]
pub async fn delete_movie(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(movie_id): Path<Uuid>,
) -> Result<Response> {
    watchlist::remove(&state, identity.id, movie_id).await?;
    Ok((StatusCode::OK, r#"{"message":"Movie removed from watchlist"}"#).into_response())
}
