use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::{
    error::{AppError, Result},
    state::AppState,
};

/// A middleware that requires a resolvable identity.
///
/// Guards the JSON operation surface: without a valid session the request
/// fails with 401 "Not authenticated" before any handler or data access
/// runs. The resolved `Identity` is attached as an extension so handlers
/// receive the caller scope as an explicit value.
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let not_authenticated = || AppError::Authentication("Not authenticated".to_string());

    let mut store = state.session_store().ok_or_else(|| {
        tracing::warn!("Auth check with no session backend configured");
        not_authenticated()
    })?;

    let identity = match store.resolve(&cookies).await {
        Ok(Some(identity)) => identity,
        Ok(None) => return Err(not_authenticated()),
        Err(e) => {
            tracing::warn!("Session resolution failed: {}", e);
            return Err(not_authenticated());
        }
    };

    tracing::debug!("User authenticated: {}", identity.id);
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
