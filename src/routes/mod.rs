pub mod ordenes_trabajo;
pub mod usuarios;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::openapi::openapi_json;
use crate::state::AppState;

pub fn create_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/ordenesTrabajo", ordenes_trabajo::routes(state))
        .nest("/usuarios", usuarios::routes())
}

/// Full application under the `/api` base path, ready to serve.
pub fn create_app(state: AppState) -> Router {
    let api = create_router(&state)
        .route("/", get(|| async { "Órdenes de Trabajo API" }))
        .route("/health", get(health_check))
        .route("/docs/openapi.json", get(openapi_json));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
