use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};

use http::{Method, header};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod state;
mod db;

mod models {
    pub mod catalog;
    pub mod movie;
    pub mod session;
    pub mod user;
}

mod repositories {
    pub mod movie;
    pub mod user;
}

mod services {
    pub mod auth;
    pub mod catalog;
    pub mod session;
    pub mod watchlist;
}

mod handlers {
    pub mod auth;
    pub mod catalog;
    pub mod movies;
}

mod middleware_layer {
    pub mod auth;
    pub mod gate;
    pub mod rate_limit;
}

mod validation {
    pub mod auth;
}

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let state = AppState::new(&config).await?;

    sqlx::migrate!().run(&state.db).await?;
    tracing::info!("Migrations applied");

    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse().unwrap(),
            "http://127.0.0.1:3000".parse().unwrap(),
        ])
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400));

    let protected_governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(50)
            .burst_size(100)
            .use_headers()
            .finish()
            .unwrap(),
    );

    let register_routes = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::rate_limit::rate_limit_register,
        ))
        .with_state(state.clone());

    let login_routes = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::rate_limit::rate_limit_login,
        ))
        .with_state(state.clone());

    let session_routes = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/confirm", get(handlers::auth::confirm))
        .with_state(state.clone());

    // The catalog proxy sits under /api and bypasses the access gate.
    let catalog_routes = Router::new()
        .route("/api/search", get(handlers::catalog::search))
        .route("/api/movie", get(handlers::catalog::movie))
        .with_state(state.clone());

    let movie_routes = Router::new()
        .route("/movies", get(handlers::movies::list_movies))
        .route("/movies", post(handlers::movies::add_movie))
        .route(
            "/movies/{movie_id}/watched",
            post(handlers::movies::toggle_watched),
        )
        .route("/movies/{movie_id}", delete(handlers::movies::delete_movie))
        .layer(tower_governor::GovernorLayer::new(
            protected_governor_conf.clone(),
        ))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state.clone());

    // Every page request runs through the access gate before the static
    // shell is served.
    let page_routes = Router::new()
        .fallback_service(ServeDir::new("public"))
        .layer(from_fn_with_state(
            state.clone(),
            middleware_layer::gate::session_gate,
        ));

    let app = Router::new()
        .merge(register_routes)
        .merge(login_routes)
        .merge(session_routes)
        .merge(catalog_routes)
        .merge(movie_routes)
        .merge(page_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
