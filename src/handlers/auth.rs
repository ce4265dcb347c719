use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    middleware_layer::gate::LOGIN_PATH,
    repositories::user as user_repo,
    services::{auth as auth_service, session::SessionStore, watchlist},
    state::AppState,
    validation::auth::*,
};

/// The request payload for sign-up.
#[derive(Deserialize, Debug)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "repeatPassword")]
    pub repeat_password: String,
}

/// The request payload for sign-in.
#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The query parameters of the email-confirmation callback.
#[derive(Deserialize)]
pub struct ConfirmQuery {
    pub token: Uuid,
}

/// The response payload for authentication-related requests.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
}

fn session_store(state: &AppState) -> Result<SessionStore> {
    state
        .session_store()
        .ok_or_else(|| AppError::Config("Session backend not configured".to_string()))
}

/// Handles sign-up.
///
/// Registration never establishes a session: the account stays unconfirmed
/// until the emailed confirmation link is followed, and the caller is
/// expected to land on the "check your email" page.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!("Register attempt for: {}", payload.email);

    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name cannot be empty".to_string()));
    }
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;
    validate_password_match(&payload.password, &payload.repeat_password)?;

    let mut store = session_store(&state)?;

    let user = auth_service::create_user(
        &state.db,
        Some(payload.name.trim().to_string()),
        payload.email.clone(),
        payload.password,
    )
    .await?;

    let token = store.store_confirmation(user.id).await?;

    // Mail delivery is an external concern; the confirmation link is
    // logged so operators can follow it in development.
    tracing::info!(
        user_id = %user.id,
        "Confirmation link issued: {}?token={}",
        state.config.confirm_redirect_url,
        token
    );

    let response = AuthResponse {
        success: true,
        message: "Registration successful. Check your email to confirm your account.".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Handles sign-in.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    tracing::info!("Login attempt for: {}", payload.email);
    validate_email(&payload.email)?;

    let mut store = session_store(&state)?;

    let user = auth_service::authenticate_user(&state.db, &payload.email, &payload.password).await?;

    let session_id = store.create(&user, &cookies).await?;

    // Read the record back: a write that did not land, or landed for the
    // wrong identity, must not count as a session.
    let established = store
        .peek(session_id)
        .await?
        .is_some_and(|record| record.user_id == user.id);
    if !established {
        return Err(AppError::Session("Failed to establish session".to_string()));
    }

    watchlist::invalidate_cache(&state, user.id).await;

    tracing::info!("User logged in: {}", user.id);

    let response = AuthResponse {
        success: true,
        message: "Login successful".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles sign-out. Clears the session if one exists and redirects to the
/// login page unconditionally.
#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Response {
    if let Some(mut store) = state.session_store() {
        match store.resolve(&cookies).await {
            Ok(Some(identity)) => {
                watchlist::invalidate_cache(&state, identity.id).await;
                tracing::info!("User logged out: {}", identity.id);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Logout could not resolve session: {}", e),
        }

        if let Err(e) = store.destroy(&cookies).await {
            tracing::warn!("Logout could not destroy session: {}", e);
        }
    }

    Redirect::to(LOGIN_PATH).into_response()
}

/// Handles the email-confirmation callback.
#[axum::debug_handler]
pub async fn confirm(
    State(state): State<AppState>,
    Query(query): Query<ConfirmQuery>,
) -> Result<Response> {
    let mut store = session_store(&state)?;

    match store.take_confirmation(query.token).await? {
        Some(user_id) => {
            user_repo::confirm_user(&state.db, user_id).await?;
            tracing::info!("Email confirmed for user: {}", user_id);
            Ok(Redirect::to(LOGIN_PATH).into_response())
        }
        None => {
            tracing::debug!("Unknown or expired confirmation token");
            Ok(Redirect::to("/auth/error").into_response())
        }
    }
}
