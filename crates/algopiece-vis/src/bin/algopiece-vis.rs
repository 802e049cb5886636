//! AlgoPiece control surface server
//!
//! Usage: `algopiece-vis [port] [seed]`

use std::env;

use algopiece_engine::EngineConfig;
use algopiece_vis::VisServer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "algopiece=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().collect();

    let port: u16 = args.get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000);

    let seed: Option<u64> = args.get(2).and_then(|s| s.parse().ok());

    let mut config = EngineConfig::default();
    if let Some(seed) = seed {
        tracing::info!(seed, "using fixed seed");
        config = config.with_seed(seed);
    }

    let server = VisServer::new(config);
    server.serve(port).await?;

    Ok(())
}
