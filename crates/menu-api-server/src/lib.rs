pub mod config;
pub mod database;
pub mod handlers;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod utils;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

pub use state::AppState;

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check));

    let api_routes = Router::new()
        .route("/api/franchise", get(handlers::franchise::franchise_handler))
        .route("/api/menu", get(handlers::menu::menu_handler))
        .route("/api/menu/nav", get(handlers::menu::nav_handler))
        .route("/api/sessions", post(handlers::sessions::create_session_handler))
        .route(
            "/api/sessions/{id}/portions/{item_id}",
            put(handlers::sessions::select_portion_handler),
        )
        .route(
            "/api/sessions/{id}/nav/toggle",
            post(handlers::sessions::toggle_nav_handler),
        )
        .route("/api/sessions/{id}/nav/jump", post(handlers::sessions::jump_handler));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
