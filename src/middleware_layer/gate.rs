use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;

use crate::state::AppState;

/// The login page unauthenticated callers are sent to.
pub const LOGIN_PATH: &str = "/auth/login";
/// Where authenticated callers land when they hit an auth page.
pub const HOME_PATH: &str = "/";

/// What the gate does with a page request.
#[derive(Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// Continue to the requested page.
    Allow,
    /// Redirect to the login page.
    ToLogin,
    /// Redirect to the home page.
    ToHome,
}

/// Decides how a page request is routed.
///
/// `/api` and `/assets` paths bypass the gate unconditionally. Without a
/// configured session backend nobody can be authenticated, so auth pages
/// stay reachable and everything else goes to login. Otherwise the usual
/// two rules apply: anonymous callers cannot leave the auth section, and
/// authenticated callers cannot re-enter it.
pub fn decide(path: &str, backend_configured: bool, authenticated: bool) -> GateDecision {
    if path.starts_with("/api") || path.starts_with("/assets") {
        return GateDecision::Allow;
    }

    let on_auth_page = path.starts_with("/auth");

    if !backend_configured {
        return if on_auth_page {
            GateDecision::Allow
        } else {
            GateDecision::ToLogin
        };
    }

    match (authenticated, on_auth_page) {
        (false, false) => GateDecision::ToLogin,
        (true, true) => GateDecision::ToHome,
        _ => GateDecision::Allow,
    }
}

/// The access gate, run ahead of every page request.
///
/// Resolving the session may refresh it; the cookie layer sits outside
/// this middleware, so a rewritten session cookie lands on the redirect
/// and the pass-through response alike. Nothing in here escalates to a
/// 5xx: backend trouble resolves to "not authenticated" and a redirect.
pub async fn session_gate(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if path.starts_with("/api") || path.starts_with("/assets") {
        return next.run(request).await;
    }

    let (backend_configured, authenticated) = match state.session_store() {
        None => (false, false),
        Some(mut store) => match store.resolve(&cookies).await {
            Ok(identity) => {
                let authenticated = identity.is_some();
                if let Some(identity) = identity {
                    request.extensions_mut().insert(identity);
                }
                (true, authenticated)
            }
            Err(e) => {
                tracing::warn!("Gate could not resolve session: {}", e);
                (true, false)
            }
        },
    };

    match decide(&path, backend_configured, authenticated) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::ToLogin => {
            tracing::debug!(path = %path, "Gate redirecting to login");
            Redirect::to(LOGIN_PATH).into_response()
        }
        GateDecision::ToHome => {
            tracing::debug!(path = %path, "Gate redirecting authenticated user home");
            Redirect::to(HOME_PATH).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_page_request_goes_to_login() {
        assert_eq!(decide("/dashboard", true, false), GateDecision::ToLogin);
        assert_eq!(decide("/", true, false), GateDecision::ToLogin);
    }

    #[test]
    fn anonymous_auth_pages_are_allowed() {
        assert_eq!(decide("/auth/login", true, false), GateDecision::Allow);
        assert_eq!(decide("/auth/sign-up", true, false), GateDecision::Allow);
    }

    #[test]
    fn authenticated_caller_is_bounced_off_auth_pages() {
        assert_eq!(decide("/auth/login", true, true), GateDecision::ToHome);
        assert_eq!(decide("/auth/sign-up", true, true), GateDecision::ToHome);
    }

    #[test]
    fn authenticated_page_request_is_allowed() {
        assert_eq!(decide("/", true, true), GateDecision::Allow);
        assert_eq!(decide("/dashboard", true, true), GateDecision::Allow);
    }

    #[test]
    fn api_and_assets_bypass_regardless_of_session() {
        for authenticated in [false, true] {
            assert_eq!(
                decide("/api/search", true, authenticated),
                GateDecision::Allow
            );
            assert_eq!(
                decide("/assets/app.css", true, authenticated),
                GateDecision::Allow
            );
        }
        assert_eq!(decide("/api/search", false, false), GateDecision::Allow);
    }

    #[test]
    fn missing_backend_fails_safe_toward_login() {
        assert_eq!(decide("/", false, false), GateDecision::ToLogin);
        assert_eq!(decide("/dashboard", false, false), GateDecision::ToLogin);
        assert_eq!(decide("/auth/login", false, false), GateDecision::Allow);
    }
}
