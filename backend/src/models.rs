pub use shared::{ApiError, CityInfo, CorridorSource, GeoPoint, RouteRequest, RouteResponse};

/// Result of one routing request. Built fresh per call and never mutated
/// afterwards.
#[derive(Debug, Clone)]
pub struct RoutePath {
    /// Dense, smoothed waypoints. First and last are the requested endpoints.
    pub coordinates: Vec<GeoPoint>,
    pub distance_km: f64,
    pub duration_minutes: u32,
    pub instructions: Vec<String>,
    pub origin_city: String,
    pub destination_city: String,
    pub corridor_source: CorridorSource,
    /// Coarse corridor the dense path was expanded from.
    pub control_points: Vec<GeoPoint>,
}

impl RoutePath {
    pub fn origin(&self) -> Option<GeoPoint> {
        self.coordinates.first().copied()
    }

    pub fn destination(&self) -> Option<GeoPoint> {
        self.coordinates.last().copied()
    }
}
