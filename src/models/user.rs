use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// Represents a user account.
#[derive(FromRow, Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's display name.
    pub name: Option<String>,
    /// The user's email address.
    pub email: String,
    /// The user's hashed password.
    pub password: String,
    /// When the user confirmed their email address, if they have.
    pub confirmed_at: Option<DateTime<Utc>>,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether the account has completed email confirmation.
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_at.is_some()
    }
}
