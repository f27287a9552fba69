pub mod engine;
pub mod error;
pub mod gpx_export;
pub mod instructions;
pub mod models;
pub mod network;
pub mod noise;
pub mod routing;

use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use tower_http::cors::{Any, CorsLayer};

use crate::engine::RouteSynthesizer;
use crate::error::RouteError;
use crate::gpx_export::encode_route_as_gpx;
use crate::models::{ApiError, CityInfo, RoutePath, RouteRequest, RouteResponse};
use crate::noise::RandomNoise;

#[derive(Clone)]
pub struct AppState {
    pub synthesizer: Arc<RouteSynthesizer>,
    /// Awaited before every route computation to mimic a remote routing API.
    pub simulated_latency: Duration,
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/route", post(route_handler))
        .route("/api/cities", get(cities_handler))
        .layer(cors)
        .with_state(state)
}

/// Wire form of a computed route: distance rounded to whole kilometres, GPX
/// attached and arrival derived from the optional departure time.
pub fn route_response(
    route: RoutePath,
    departure: Option<DateTime<Utc>>,
) -> Result<RouteResponse, RouteError> {
    let gpx_base64 = encode_route_as_gpx(&route)?;
    let arrival = departure
        .map(|departure| departure + chrono::Duration::minutes(i64::from(route.duration_minutes)));

    Ok(RouteResponse {
        coordinates: route.coordinates,
        distance: route.distance_km.round(),
        duration: route.duration_minutes,
        instructions: route.instructions,
        origin_city: route.origin_city,
        destination_city: route.destination_city,
        corridor_source: route.corridor_source,
        gpx_base64,
        arrival,
    })
}

async fn route_handler(
    State(state): State<AppState>,
    Json(req): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, (StatusCode, Json<ApiError>)> {
    tracing::info!("Route request: {:?} -> {:?}", req.origin, req.destination);

    if !state.simulated_latency.is_zero() {
        tokio::time::sleep(state.simulated_latency).await;
    }

    let route = state
        .synthesizer
        .compute_route(req.origin, req.destination, &mut RandomNoise::thread())
        .map_err(api_error)?;

    tracing::info!(
        "Route {} -> {}: {} waypoints, {:.1} km, {} min",
        route.origin_city,
        route.destination_city,
        route.coordinates.len(),
        route.distance_km,
        route.duration_minutes
    );

    let response = route_response(route, req.departure).map_err(api_error)?;
    Ok(Json(response))
}

async fn cities_handler(State(state): State<AppState>) -> Json<Vec<CityInfo>> {
    Json(state.synthesizer.network().city_infos())
}

fn api_error(err: RouteError) -> (StatusCode, Json<ApiError>) {
    let status = match err {
        RouteError::InvalidCoordinate { .. } => StatusCode::BAD_REQUEST,
        RouteError::Gpx(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("route request failed: {err}");
    } else {
        tracing::warn!("route request rejected: {err}");
    }

    (
        status,
        Json(ApiError {
            message: err.to_string(),
        }),
    )
}
