use redis::aio::ConnectionManager;
use sqlx::PgPool;
use tower_cookies::Key;

use crate::{
    config::Config,
    error::Result,
    services::{catalog::CatalogClient, session::SessionStore},
};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool.
    pub db: PgPool,
    /// The Redis connection manager, when the session backend is configured.
    pub redis: Option<ConnectionManager>,
    /// The session cookie signing key, when configured.
    cookie_key: Option<Key>,
    /// The external catalog client.
    pub catalog: CatalogClient,
    /// The application's configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// An absent session backend is a degraded mode, not a failure: the
    /// state comes up without Redis and the gate redirects everything to
    /// the login page.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url).await?;
        tracing::info!("PostgreSQL pool initialized");

        let (redis, cookie_key) = match &config.session {
            Some(backend) => {
                let client = redis::Client::open(backend.redis_url.as_str())?;
                let manager = ConnectionManager::new(client).await?;
                tracing::info!("Session backend connected");
                (Some(manager), Some(backend.cookie_key.clone()))
            }
            None => {
                tracing::warn!(
                    "Session backend not configured; page requests will redirect to login"
                );
                (None, None)
            }
        };

        let catalog =
            CatalogClient::new(config.omdb_api_key.clone(), config.omdb_api_url.clone());
        if config.omdb_api_key.is_none() {
            tracing::warn!("OMDB_API_KEY not set; catalog lookups will fail with a config error");
        }

        Ok(AppState {
            db,
            redis,
            cookie_key,
            catalog,
            config: config.clone(),
        })
    }

    /// Builds a `SessionStore` when the session backend is configured.
    pub fn session_store(&self) -> Option<SessionStore> {
        match (&self.redis, &self.cookie_key) {
            (Some(redis), Some(key)) => Some(SessionStore::new(
                redis.clone(),
                key.clone(),
                self.config.session_access_minutes,
                self.config.session_refresh_days,
            )),
            _ => None,
        }
    }
}
