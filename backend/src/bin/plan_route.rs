use std::{error::Error, path::PathBuf, sync::Arc};

use chrono::{DateTime, Utc};
use clap::Parser;
use coldchain_router::{
    engine::RouteSynthesizer,
    gpx_export::route_gpx_bytes,
    models::GeoPoint,
    network::HighwayNetwork,
    noise::{RandomNoise, RoadNoise},
    route_response,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Synthesize one route and print it as JSON"
)]
struct Args {
    /// Origin city name (e.g. Mumbai)
    #[arg(long, conflicts_with_all = ["origin_lat", "origin_lng"])]
    from: Option<String>,
    #[arg(long, requires = "origin_lng", allow_hyphen_values = true)]
    origin_lat: Option<f64>,
    #[arg(long, requires = "origin_lat", allow_hyphen_values = true)]
    origin_lng: Option<f64>,

    /// Destination city name (e.g. Pune)
    #[arg(long, conflicts_with_all = ["dest_lat", "dest_lng"])]
    to: Option<String>,
    #[arg(long, requires = "dest_lng", allow_hyphen_values = true)]
    dest_lat: Option<f64>,
    #[arg(long, requires = "dest_lat", allow_hyphen_values = true)]
    dest_lng: Option<f64>,

    /// RFC 3339 departure time, used to compute the arrival time
    #[arg(long)]
    departure: Option<DateTime<Utc>>,

    /// Seed for reproducible jitter and traffic slack
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with the city and corridor tables (bundled table when omitted)
    #[arg(long, env = "NETWORK_JSON")]
    network: Option<PathBuf>,

    /// Also write the route as a GPX file
    #[arg(long)]
    gpx: Option<PathBuf>,
}

fn endpoint(
    network: &HighwayNetwork,
    label: &str,
    name: Option<&str>,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<GeoPoint, Box<dyn Error>> {
    match (name, lat, lng) {
        (Some(name), _, _) => network
            .city(name)
            .map(|city| city.location)
            .ok_or_else(|| format!("unknown {label} city {name:?}").into()),
        (None, Some(lat), Some(lng)) => Ok(GeoPoint::new(lat, lng)),
        _ => Err(format!("{label}: pass a city name or both coordinates").into()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let network = match &args.network {
        Some(path) => HighwayNetwork::from_file(path)?,
        None => HighwayNetwork::builtin()?,
    };
    let origin = endpoint(
        &network,
        "origin",
        args.from.as_deref(),
        args.origin_lat,
        args.origin_lng,
    )?;
    let destination = endpoint(
        &network,
        "destination",
        args.to.as_deref(),
        args.dest_lat,
        args.dest_lng,
    )?;

    let mut noise: Box<dyn RoadNoise> = match args.seed {
        Some(seed) => Box::new(RandomNoise::seeded(seed)),
        None => Box::new(RandomNoise::thread()),
    };

    let synthesizer = RouteSynthesizer::new(Arc::new(network));
    let route = synthesizer.compute_route(origin, destination, noise.as_mut())?;
    tracing::info!(
        "{} -> {} via {:?} corridor: {:.1} km, {} min",
        route.origin_city,
        route.destination_city,
        route.corridor_source,
        route.distance_km,
        route.duration_minutes
    );

    if let Some(path) = &args.gpx {
        std::fs::write(path, route_gpx_bytes(&route)?)?;
        tracing::info!("GPX written to {:?}", path);
    }

    let response = route_response(route, args.departure)?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
