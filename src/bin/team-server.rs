use bracket_sim::server::router;
use bracket_sim::store::{JsonFileStore, MemoryStore, SharedStore, shared};
use log::info;
use std::env;
use tokio::net::TcpListener;

const DEFAULT_BIND: &str = "127.0.0.1:8788";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let addr = env::var("TEAM_SERVER_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let store: SharedStore = match env::var("TEAM_SERVER_FILE") {
        Ok(path) if !path.trim().is_empty() => {
            info!("persisting team records to {path}");
            shared(JsonFileStore::new(path.trim()))
        }
        _ => {
            info!("keeping team records in memory");
            shared(MemoryStore::new())
        }
    };

    let listener = TcpListener::bind(&addr).await?;
    info!("team server listening on {addr}");
    axum::serve(listener, router(store)).await?;

    Ok(())
}
