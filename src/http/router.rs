use axum::{routing::get, Router};
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use crate::mcp::{http_service, NewsMcpServer};
use crate::state::AppState;

use super::handlers;

pub fn create_router(state: AppState) -> Router {
    let index = ServeFile::new(state.config.static_dir().join("index.html"));
    let mcp = http_service(NewsMcpServer::new(state.clone()));

    Router::new()
        .route("/", get(handlers::info))
        .route("/test/{source}", get(handlers::test_source))
        .route_service("/index.html", index)
        .nest_service("/mcp", mcp)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
