use std::net::SocketAddr;

use fitness_panel::{router, ApiClient, AppState, Config, SessionStore};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::load();
    if let Some(parent) = config.session_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let sessions = SessionStore::open(config.session_path.clone()).await;
    let api = ApiClient::new(&config)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config, api, sessions);

    let app = router(state);

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
