use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The session record stored in Redis under `session:{id}`.
///
/// Carries access+refresh semantics: `access_expires_at` is the short
/// window renewed transparently on resolve, `refresh_expires_at` is the
/// hard ceiling after which the record is discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// The ID of the user this session belongs to.
    pub user_id: Uuid,
    /// The user's email address.
    pub email: String,
    /// The user's display name.
    pub name: Option<String>,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// When the current access window runs out.
    pub access_expires_at: DateTime<Utc>,
    /// When the session can no longer be refreshed.
    pub refresh_expires_at: DateTime<Utc>,
}

/// The resolved caller identity, attached to requests that carry a valid
/// session. Every protected operation takes its owner scope from here.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's email address.
    pub email: String,
    /// The user's display name.
    pub name: Option<String>,
}

impl From<&SessionRecord> for Identity {
    fn from(record: &SessionRecord) -> Self {
        Self {
            id: record.user_id,
            email: record.email.clone(),
            name: record.name.clone(),
        }
    }
}
