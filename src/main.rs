use std::net::SocketAddr;
use std::sync::Arc;

use colorguess::http::routes::{self, AppState};
use colorguess::room::manager::RoomManager;
use colorguess::{config, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init(config::json_logs());

    let state = AppState {
        rooms: Arc::new(RoomManager::with_code_style(config::room_code_style()?)),
        background: config::background()?,
    };

    let base_path = config::base_path();
    let app = routes::app(state, &base_path, config::static_dir());

    let addr: SocketAddr = config::server_addr();
    tracing::info!(%addr, base_path = %base_path, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
