use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use geo_types::Point;
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};

use crate::error::RouteError;
use crate::models::{GeoPoint, RoutePath};

const CREATOR: &str = "coldchain-router";

/// Serializes the route as a single-track GPX 1.1 document, base64-encoded.
pub fn encode_route_as_gpx(route: &RoutePath) -> Result<String, RouteError> {
    Ok(BASE64.encode(route_gpx_bytes(route)?))
}

pub fn route_gpx_bytes(route: &RoutePath) -> Result<Vec<u8>, RouteError> {
    let mut gpx = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some(CREATOR.into()),
        ..Default::default()
    };
    let mut track = Track {
        name: Some(format!(
            "{} to {}",
            route.origin_city, route.destination_city
        )),
        ..Default::default()
    };

    let mut segment = TrackSegment::new();
    segment.points.extend(route.coordinates.iter().map(to_waypoint));
    track.segments.push(segment);
    gpx.tracks.push(track);

    let mut buffer = Vec::new();
    gpx::write(&gpx, &mut buffer)?;
    Ok(buffer)
}

fn to_waypoint(point: &GeoPoint) -> Waypoint {
    Waypoint::new(Point::new(point.lng, point.lat))
}
