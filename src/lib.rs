pub mod access;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::extract::State;
use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use auth::UserRegistry;
use services::CardService;

/// Shared application state: the card service and the credential registry.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CardService>,
    pub users: Arc<UserRegistry>,
}

pub fn app(state: AppState) -> Router {
    use handlers::cards;

    // Every card route requires Basic authentication
    let card_routes = Router::new()
        .route("/cards", get(cards::card_list).post(cards::card_create))
        .route(
            "/cards/:id",
            get(cards::card_get)
                .put(cards::card_update)
                .delete(cards::card_delete),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::basic_auth_middleware,
        ));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(card_routes)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Cardledger API",
        "version": version,
        "description": "Ownership-scoped cash card ledger API built with Rust (Axum)",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "cards": "/cards[/:id] (Basic auth required)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.service.store().health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "store_error": e.to_string()
            })),
        ),
    }
}
