//! Library remote - publishes the music library component for the dashboard

use musicdash::constants::DEFAULT_REMOTE_ADDR;
use musicdash::remote::server::run_server;
use musicdash::remote::RemoteManifest;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr = std::env::var("MUSICDASH_REMOTE_ADDR").unwrap_or_else(|_| DEFAULT_REMOTE_ADDR.to_string());
    run_server(RemoteManifest::library(), &addr).await
}
