use chrono::{DateTime, Duration, Utc};
use redis::{AsyncCommands, aio::ConnectionManager};
use tower_cookies::{Cookie, Cookies, Key, cookie::time};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{
        session::{Identity, SessionRecord},
        user::User,
    },
};

/// The name of the signed session cookie.
pub const SESSION_COOKIE: &str = "session_id";

/// How long a sign-up confirmation token stays redeemable.
const CONFIRMATION_TTL_SECS: u64 = 86400;

/// Where a session record stands relative to its two expiry windows.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionState {
    /// The access window is still open.
    Active,
    /// The access window ran out but the refresh window has not; the
    /// session is renewed transparently.
    NeedsRefresh,
    /// The refresh window ran out; the record is discarded.
    Expired,
}

/// Classifies a session record against the current time.
pub fn classify(record: &SessionRecord, now: DateTime<Utc>) -> SessionState {
    if now > record.refresh_expires_at {
        SessionState::Expired
    } else if now > record.access_expires_at {
        SessionState::NeedsRefresh
    } else {
        SessionState::Active
    }
}

/// Creates the session cookie with the attributes every session write uses.
fn session_cookie(session_id: Uuid, max_age_secs: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, session_id.to_string());

    let is_production =
        std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()) == "production";

    cookie.set_http_only(true);
    if is_production {
        cookie.set_secure(true);
    }
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(time::Duration::seconds(max_age_secs));
    cookie.set_path("/");

    cookie
}

/// The session store: signed cookie on the caller's side, JSON record with
/// a TTL in Redis on ours. Constructed per request from `AppState`; absent
/// backend configuration means there is no store to construct, which is
/// the degraded mode the access gate handles.
pub struct SessionStore {
    redis: ConnectionManager,
    key: Key,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl SessionStore {
    pub fn new(
        redis: ConnectionManager,
        key: Key,
        access_minutes: i64,
        refresh_days: i64,
    ) -> Self {
        Self {
            redis,
            key,
            access_ttl: Duration::minutes(access_minutes),
            refresh_ttl: Duration::days(refresh_days),
        }
    }

    fn record_key(session_id: Uuid) -> String {
        format!("session:{}", session_id)
    }

    /// Creates a session for a user and adds the signed cookie.
    ///
    /// # Returns
    ///
    /// The new session ID, so the caller can verify the write landed.
    pub async fn create(&mut self, user: &User, cookies: &Cookies) -> Result<Uuid> {
        let session_id = Uuid::new_v4();
        let now = Utc::now();

        let record = SessionRecord {
            user_id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: now,
            access_expires_at: now + self.access_ttl,
            refresh_expires_at: now + self.refresh_ttl,
        };

        let record_json = sonic_rs::to_string(&record)
            .map_err(|e| AppError::Internal(format!("Session serialization failed: {}", e)))?;

        let _: () = self
            .redis
            .set_ex(
                Self::record_key(session_id),
                &record_json,
                self.refresh_ttl.num_seconds() as u64,
            )
            .await?;

        cookies
            .signed(&self.key)
            .add(session_cookie(session_id, self.refresh_ttl.num_seconds()));

        tracing::info!("Session created for user: {}", user.id);
        Ok(session_id)
    }

    /// Reads a session record back without touching its expiry.
    pub async fn peek(&mut self, session_id: Uuid) -> Result<Option<SessionRecord>> {
        let record_json: Option<String> = self.redis.get(Self::record_key(session_id)).await?;
        match record_json {
            Some(json) => {
                let record: SessionRecord = sonic_rs::from_str(&json)
                    .map_err(|e| AppError::Internal(format!("Invalid session record: {}", e)))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Resolves the caller's cookies to an `Identity`, or `None`.
    ///
    /// An expired access window inside a live refresh window renews the
    /// record and re-issues the signed cookie; the caller's middleware
    /// carries that rewrite onto whatever response it ends up returning.
    pub async fn resolve(&mut self, cookies: &Cookies) -> Result<Option<Identity>> {
        let Some(session_id) = cookies
            .signed(&self.key)
            .get(SESSION_COOKIE)
            .and_then(|c| Uuid::parse_str(c.value()).ok())
        else {
            return Ok(None);
        };

        let Some(mut record) = self.peek(session_id).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        match classify(&record, now) {
            SessionState::Expired => {
                let _: () = self.redis.del(Self::record_key(session_id)).await.unwrap_or(());
                cookies.signed(&self.key).remove(session_cookie(session_id, 0));
                tracing::debug!("Session expired for user: {}", record.user_id);
                Ok(None)
            }
            SessionState::NeedsRefresh => {
                record.access_expires_at =
                    (now + self.access_ttl).min(record.refresh_expires_at);

                let record_json = sonic_rs::to_string(&record).map_err(|e| {
                    AppError::Internal(format!("Session serialization failed: {}", e))
                })?;
                let remaining = (record.refresh_expires_at - now).num_seconds().max(1);

                let _: () = self
                    .redis
                    .set_ex(Self::record_key(session_id), &record_json, remaining as u64)
                    .await?;

                cookies
                    .signed(&self.key)
                    .add(session_cookie(session_id, remaining));

                tracing::debug!("Session refreshed for user: {}", record.user_id);
                Ok(Some(Identity::from(&record)))
            }
            SessionState::Active => Ok(Some(Identity::from(&record))),
        }
    }

    /// Destroys the caller's session, if any, and removes the cookie.
    pub async fn destroy(&mut self, cookies: &Cookies) -> Result<()> {
        if let Some(session_id) = cookies
            .signed(&self.key)
            .get(SESSION_COOKIE)
            .and_then(|c| Uuid::parse_str(c.value()).ok())
        {
            let _: () = self.redis.del(Self::record_key(session_id)).await.unwrap_or(());
            cookies.signed(&self.key).remove(session_cookie(session_id, 0));
            tracing::info!("Session destroyed: {}", session_id);
        }

        Ok(())
    }

    /// Stores a sign-up confirmation token for a user.
    pub async fn store_confirmation(&mut self, user_id: Uuid) -> Result<Uuid> {
        let token = Uuid::new_v4();
        let _: () = self
            .redis
            .set_ex(
                format!("confirm:{}", token),
                user_id.to_string(),
                CONFIRMATION_TTL_SECS,
            )
            .await?;

        Ok(token)
    }

    /// Redeems a confirmation token, consuming it.
    pub async fn take_confirmation(&mut self, token: Uuid) -> Result<Option<Uuid>> {
        let user_id: Option<String> = redis::cmd("GETDEL")
            .arg(format!("confirm:{}", token))
            .query_async(&mut self.redis)
            .await?;

        Ok(user_id.and_then(|s| Uuid::parse_str(&s).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(access_offset_mins: i64, refresh_offset_mins: i64) -> SessionRecord {
        let now = Utc::now();
        SessionRecord {
            user_id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            name: Some("User".to_string()),
            created_at: now - Duration::hours(1),
            access_expires_at: now + Duration::minutes(access_offset_mins),
            refresh_expires_at: now + Duration::minutes(refresh_offset_mins),
        }
    }

    #[test]
    fn live_access_window_is_active() {
        let r = record(30, 600);
        assert_eq!(classify(&r, Utc::now()), SessionState::Active);
    }

    #[test]
    fn stale_access_inside_refresh_window_needs_refresh() {
        let r = record(-5, 600);
        assert_eq!(classify(&r, Utc::now()), SessionState::NeedsRefresh);
    }

    #[test]
    fn past_refresh_window_is_expired() {
        let r = record(-600, -5);
        assert_eq!(classify(&r, Utc::now()), SessionState::Expired);
    }

    #[test]
    fn session_cookie_is_scoped_and_http_only() {
        let cookie = session_cookie(Uuid::new_v4(), 3600);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(
            cookie.same_site(),
            Some(tower_cookies::cookie::SameSite::Lax)
        );
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));
    }
}
