use sqlx::PgPool;
use uuid::Uuid;
use crate::error::Result;
use crate::models::{catalog::MovieDetails, movie::Movie};

// Every statement below filters by the owning user_id. A row that exists
// under a different owner behaves exactly like a row that does not exist.

const LIST_SQL: &str = r#"
    SELECT id, user_id, imdb_id, title, director, imdb_rating, poster,
           year, plot, actors, watched, created_at
    FROM movies
    WHERE user_id = $1
    ORDER BY created_at DESC
"#;

const INSERT_SQL: &str = r#"
    INSERT INTO movies (
        user_id, imdb_id, title, director, imdb_rating,
        poster, year, plot, actors, watched
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, false)
    RETURNING id, user_id, imdb_id, title, director, imdb_rating, poster,
              year, plot, actors, watched, created_at
"#;

const TOGGLE_SQL: &str = r#"
    UPDATE movies
    SET watched = NOT watched
    WHERE id = $1 AND user_id = $2
    RETURNING id, user_id, imdb_id, title, director, imdb_rating, poster,
              year, plot, actors, watched, created_at
"#;

const DELETE_SQL: &str = r#"
    DELETE FROM movies
    WHERE id = $1 AND user_id = $2
"#;

/// Lists the watchlist entries owned by a user, most recent first.
///
/// # Arguments
///
/// * `pool` - The database connection pool.
/// * `user_id` - The ID of the owning user.
///
/// # Returns
///
/// A `Result` containing a `Vec<Movie>`.
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Movie>> {
    let movies = sqlx::query_as::<_, Movie>(LIST_SQL)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(movies)
}

/// Inserts a new watchlist entry for a user from a catalog record.
///
/// The snapshot fields are captured as-is and `watched` starts false.
/// Duplicate `imdb_id` values are not rejected here; the presentation
/// layer checks before calling.
pub async fn insert(pool: &PgPool, user_id: Uuid, details: &MovieDetails) -> Result<Movie> {
    let movie = sqlx::query_as::<_, Movie>(INSERT_SQL)
        .bind(user_id)
        .bind(&details.imdb_id)
        .bind(&details.title)
        .bind(&details.director)
        .bind(&details.imdb_rating)
        .bind(&details.poster)
        .bind(&details.year)
        .bind(&details.plot)
        .bind(&details.actors)
        .fetch_one(pool)
        .await?;

    Ok(movie)
}

/// Flips the watched flag on an entry owned by the user.
///
/// # Returns
///
/// `Ok(None)` when no row matches, whether because the id does not exist
/// or because it belongs to someone else.
pub async fn toggle_watched(
    pool: &PgPool,
    movie_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Movie>> {
    let movie = sqlx::query_as::<_, Movie>(TOGGLE_SQL)
        .bind(movie_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(movie)
}

/// Deletes an entry owned by the user.
///
/// # Returns
///
/// The number of rows removed. Zero is a valid outcome: deleting a
/// missing or foreign id is a no-op.
pub async fn delete(pool: &PgPool, movie_id: Uuid, user_id: Uuid) -> Result<u64> {
    let result = sqlx::query(DELETE_SQL)
        .bind(movie_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ownership scoping is structural: no statement in this module may
    // touch a row without a user_id filter.

    #[test]
    fn every_statement_filters_by_owner() {
        for sql in [LIST_SQL, INSERT_SQL, TOGGLE_SQL, DELETE_SQL] {
            assert!(sql.contains("user_id"), "statement missing owner scope: {sql}");
        }
        assert!(TOGGLE_SQL.contains("id = $1 AND user_id = $2"));
        assert!(DELETE_SQL.contains("id = $1 AND user_id = $2"));
    }

    #[test]
    fn list_orders_most_recent_first() {
        assert!(LIST_SQL.contains("ORDER BY created_at DESC"));
    }

    #[test]
    fn insert_starts_unwatched() {
        assert!(INSERT_SQL.contains("false"));
    }
}
