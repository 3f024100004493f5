use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Json, Router,
};
use common::types::Health;
use service::assets::AssetService;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod assets;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub assets: Arc<AssetService>,
}

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the application router. Asset routes are mounted under the
/// collection key, e.g. `/assets_master` and `/assets_master/:id`.
pub fn build_router(state: AppState, cors: CorsLayer, body_limit: usize) -> Router {
    let collection = format!("/{}", state.assets.collection_key());
    let item = format!("{collection}/:id");

    Router::new()
        .route("/health", get(health))
        .route(&collection, get(assets::list_assets).post(assets::create_asset))
        .route(&item, axum::routing::put(assets::update_asset).delete(assets::delete_asset))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
