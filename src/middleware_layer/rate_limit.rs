use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::{error::AppError, state::AppState};

/// Extracts the real IP address from the request extensions.
fn extract_real_ip(req: &Request<Body>) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// A fixed-window counter in Redis. Returns the remaining window in
/// seconds when the caller is over the limit. Skips silently when no
/// Redis backend is configured.
async fn over_limit(
    state: &AppState,
    key: &str,
    max_attempts: i32,
    window_secs: i64,
) -> Option<i64> {
    let redis = state.redis.as_ref()?;
    let mut redis = redis.clone();

    let count: Option<i32> = redis::cmd("GET")
        .arg(key)
        .query_async(&mut redis)
        .await
        .unwrap_or(None);

    if let Some(attempts) = count
        && attempts >= max_attempts
    {
        let ttl: Option<i64> = redis::cmd("TTL")
            .arg(key)
            .query_async(&mut redis)
            .await
            .unwrap_or(None);
        return Some(ttl.unwrap_or(window_secs));
    }

    let _: () = redis::cmd("INCR")
        .arg(key)
        .query_async(&mut redis)
        .await
        .unwrap_or(());

    let _: () = redis::cmd("EXPIRE")
        .arg(key)
        .arg(window_secs)
        .query_async(&mut redis)
        .await
        .unwrap_or(());

    None
}

/// A middleware that rate limits user registration.
pub async fn rate_limit_register(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = extract_real_ip(&req);
    let key = format!("rate_limit:register:{}", ip);

    if let Some(remaining) = over_limit(&state, &key, 5, 3600).await {
        return AppError::RateLimitExceeded(format!(
            "Registration limit exceeded. Try again in {} minutes",
            (remaining / 60).max(1)
        ))
        .into_response();
    }

    next.run(req).await
}

/// A middleware that rate limits login attempts.
pub async fn rate_limit_login(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = extract_real_ip(&req);
    let key = format!("rate_limit:login:{}", ip);

    if let Some(remaining) = over_limit(&state, &key, 10, 900).await {
        return AppError::RateLimitExceeded(format!(
            "Too many login attempts. Try again in {} minutes",
            (remaining / 60).max(1)
        ))
        .into_response();
    }

    next.run(req).await
}
