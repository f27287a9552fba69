use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use coldchain_router::{AppState, create_router, engine::RouteSynthesizer, network::HighwayNetwork};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(author, version, about = "Highway route synthesizer for the cold-chain dashboard")]
struct Args {
    /// Address the HTTP server listens on
    #[arg(long, env = "ROUTER_BIND", default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// JSON file with the city and corridor tables (bundled table when omitted)
    #[arg(long, env = "NETWORK_JSON")]
    network: Option<PathBuf>,

    /// Delay awaited before each route computation, in milliseconds
    #[arg(long, env = "ROUTER_LATENCY_MS", default_value_t = 1200)]
    latency_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coldchain_router=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let network = match &args.network {
        Some(path) => {
            let network = HighwayNetwork::from_file(path)?;
            tracing::info!("loaded highway network from {}", path.display());
            network
        }
        None => {
            tracing::info!("using bundled highway network");
            HighwayNetwork::builtin()?
        }
    };
    tracing::info!(
        "{} cities, {} corridors",
        network.cities().len(),
        network.corridor_count()
    );

    let state = AppState {
        synthesizer: Arc::new(RouteSynthesizer::new(Arc::new(network))),
        simulated_latency: Duration::from_millis(args.latency_ms),
    };
    let app = create_router(state);

    tracing::info!("starting router on http://{}", args.bind);
    tracing::info!("  POST /api/route - synthesize a route between two points");
    tracing::info!("  GET /api/cities - list known cities");

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
