use redis::AsyncCommands;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{catalog::MovieDetails, movie::Movie},
    repositories::movie as movie_repo,
    state::AppState,
};

/// How long a cached watchlist rendering stays fresh. Mutations invalidate
/// it immediately; the TTL only bounds staleness across instances.
const LIST_CACHE_TTL_SECS: u64 = 60;

fn cache_key(user_id: Uuid) -> String {
    format!("watchlist:{}", user_id)
}

/// Drops the cached list for a user. Cache trouble is never allowed to
/// fail the mutation that triggered it.
pub async fn invalidate_cache(state: &AppState, user_id: Uuid) {
    if let Some(redis) = &state.redis {
        let mut redis = redis.clone();
        if let Err(e) = redis.del::<_, ()>(cache_key(user_id)).await {
            tracing::warn!("Failed to invalidate watchlist cache: {}", e);
        }
    }
}

/// Lists a user's watchlist, most recent first, through the cache.
pub async fn list(state: &AppState, user_id: Uuid) -> Result<Vec<Movie>> {
    if let Some(redis) = &state.redis {
        let mut redis = redis.clone();
        match redis.get::<_, Option<String>>(cache_key(user_id)).await {
            Ok(Some(cached_json)) => {
                if let Ok(movies) = sonic_rs::from_str::<Vec<Movie>>(&cached_json) {
                    tracing::debug!("Watchlist cache hit for user: {}", user_id);
                    return Ok(movies);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Watchlist cache read failed: {}", e),
        }
    }

    let movies = movie_repo::list_for_user(&state.db, user_id).await?;

    if let Some(redis) = &state.redis
        && let Ok(json) = sonic_rs::to_string(&movies)
    {
        let mut redis = redis.clone();
        if let Err(e) = redis
            .set_ex::<_, _, ()>(cache_key(user_id), json, LIST_CACHE_TTL_SECS)
            .await
        {
            tracing::warn!("Watchlist cache write failed: {}", e);
        }
    }

    Ok(movies)
}

/// Adds a catalog record to a user's watchlist.
///
/// The snapshot is captured as-is with `watched = false`. Duplicate
/// `imdb_id` entries are not rejected here: the presentation layer checks
/// before calling, and two racing adds for the same title both land.
pub async fn add(state: &AppState, user_id: Uuid, details: MovieDetails) -> Result<Movie> {
    let movie = movie_repo::insert(&state.db, user_id, &details).await?;
    invalidate_cache(state, user_id).await;

    tracing::info!("Added '{}' to watchlist of user: {}", movie.title, user_id);
    Ok(movie)
}

/// Flips the watched flag on one of the user's entries.
///
/// A row that is missing or owned by someone else fails identically, so
/// existence never leaks across owners.
pub async fn toggle_watched(state: &AppState, user_id: Uuid, movie_id: Uuid) -> Result<Movie> {
    let movie = movie_repo::toggle_watched(&state.db, movie_id, user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    invalidate_cache(state, user_id).await;
    Ok(movie)
}

/// Removes one of the user's entries.
///
/// Deleting a missing or foreign id is a silent no-op, which makes the
/// operation idempotent.
pub async fn remove(state: &AppState, user_id: Uuid, movie_id: Uuid) -> Result<()> {
    let removed = movie_repo::delete(&state.db, movie_id, user_id).await?;
    if removed == 0 {
        tracing::debug!("Delete was a no-op for movie: {}", movie_id);
    }

    invalidate_cache(state, user_id).await;
    Ok(())
}
