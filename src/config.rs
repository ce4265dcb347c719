use std::env;
use anyhow::{Context, Result};
use tower_cookies::Key;

/// Connection details for the session backend: the Redis endpoint plus the
/// cookie signing key. When this is absent the service runs in a degraded
/// mode where no session can resolve and the access gate sends every page
/// request to the login screen instead of failing.
#[derive(Clone)]
pub struct SessionBackend {
    /// The URL of the Redis server holding session records.
    pub redis_url: String,
    /// The key used to sign the session cookie.
    pub cookie_key: Key,
}

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// Session backend configuration, if present.
    pub session: Option<SessionBackend>,
    /// How long a session stays valid before it needs a refresh, in minutes.
    pub session_access_minutes: i64,
    /// How long a session can keep refreshing itself, in days.
    pub session_refresh_days: i64,
    /// OMDb API key. A missing key surfaces as a config error at call time.
    pub omdb_api_key: Option<String>,
    /// OMDb API base URL.
    pub omdb_api_url: String,
    /// The URL embedded in sign-up confirmation mails.
    pub confirm_redirect_url: String,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// Only `DATABASE_URL` is required. The session backend and the catalog
    /// key are optional so that a missing deployment secret degrades
    /// behavior instead of preventing startup.
    pub fn from_env() -> Result<Self> {
        let session = match (env::var("REDIS_URL"), env::var("SESSION_SIGNING_KEY")) {
            (Ok(redis_url), Ok(key_hex)) => {
                let key_bytes = hex::decode(&key_hex)
                    .context("SESSION_SIGNING_KEY must be valid hexadecimal")?;

                if key_bytes.len() != 32 {
                    anyhow::bail!(
                        "SESSION_SIGNING_KEY must be exactly 32 bytes (64 hex characters, generate with: openssl rand -hex 32)"
                    );
                }

                Some(SessionBackend {
                    redis_url,
                    cookie_key: Key::derive_from(&key_bytes),
                })
            }
            _ => None,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            session,
            session_access_minutes: env::var("SESSION_ACCESS_MINUTES")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .context("Invalid SESSION_ACCESS_MINUTES")?,
            session_refresh_days: env::var("SESSION_REFRESH_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .context("Invalid SESSION_REFRESH_DAYS")?,
            omdb_api_key: env::var("OMDB_API_KEY").ok(),
            omdb_api_url: env::var("OMDB_API_URL")
                .unwrap_or_else(|_| "https://www.omdbapi.com".to_string()),
            confirm_redirect_url: env::var("CONFIRM_REDIRECT_URL")
                .unwrap_or_else(|_| "http://localhost:3000/auth/confirm".to_string()),
        })
    }
}
