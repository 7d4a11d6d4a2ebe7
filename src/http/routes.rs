//! HTTP routes: health check, the multiplayer socket and static assets.

use std::{path::Path, sync::Arc};

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::color::Rgb;
use crate::room::manager::RoomManager;
use crate::ws::connection::ws_handler;

/// Where clients open the multiplayer socket, relative to the base path.
pub const SOCKET_PATH: &str = "/multiplayer";

#[derive(Clone, Default)]
pub struct AppState {
    pub rooms: Arc<RoomManager>,
    /// Color every palette has to stand out against, if the frontend draws
    /// one.
    pub background: Option<Rgb>,
}

pub async fn healthz() -> &'static str {
    "ok"
}

/// Build the application router mounted under `base_path` (already
/// normalized, see [`crate::config::normalize_base_path`]).
pub fn app(state: AppState, base_path: &str, static_dir: impl AsRef<Path>) -> Router {
    let assets = ServiceBuilder::new()
        .layer(CompressionLayer::new())
        .service(ServeDir::new(static_dir));

    let routes = Router::new()
        .route("/healthz", get(healthz))
        .route(SOCKET_PATH, get(ws_handler))
        .fallback_service(assets)
        .with_state(state);

    let app = if base_path == "/" {
        routes
    } else {
        Router::new().nest(base_path, routes)
    };
    app.layer(TraceLayer::new_for_http())
}
