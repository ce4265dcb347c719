use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One saved title on a user's watchlist.
///
/// The descriptive columns are a snapshot taken from the catalog at
/// add-time and are never re-synced; only `watched` is mutable, and only
/// by the owner.
#[derive(FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    /// The unique identifier for the entry.
    pub id: Uuid,
    /// The ID of the user who owns the entry.
    pub user_id: Uuid,
    /// The catalog's identifier for the title (e.g. "tt0133093").
    pub imdb_id: String,
    /// The title.
    pub title: String,
    /// The director, if the catalog knew one.
    pub director: Option<String>,
    /// The IMDb rating, if the catalog knew one.
    pub imdb_rating: Option<String>,
    /// The poster URL, if the catalog knew one.
    pub poster: Option<String>,
    /// The release year, if the catalog knew one.
    pub year: Option<String>,
    /// The plot summary, if the catalog knew one.
    pub plot: Option<String>,
    /// The main cast, if the catalog knew one.
    pub actors: Option<String>,
    /// Whether the owner has watched the title.
    pub watched: bool,
    /// The timestamp when the entry was created. Drives default ordering,
    /// most recent first.
    pub created_at: DateTime<Utc>,
}
