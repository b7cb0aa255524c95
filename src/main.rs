use bettor_core::api::{self, AppState};
use bettor_core::bookmaker::Bookmaker;
use bettor_core::config::Config;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    bettor_core::logging::init_tracing(&config.log_filter);

    let bookmaker = Bookmaker::open(&config.snapshot_path)?;
    let bind_addr = config.bind_addr.clone();
    let state = AppState { bookmaker: Arc::new(bookmaker), config: Arc::new(config) };

    let app = api::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "bettord listening");
    axum::serve(listener, app).await?;
    Ok(())
}
