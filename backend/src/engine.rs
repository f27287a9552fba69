use std::{f64::consts::PI, iter, sync::Arc};

use crate::{
    error::RouteError,
    instructions::highway_instructions,
    models::{CorridorSource, GeoPoint, RoutePath},
    network::{HighwayNetwork, NamedCity},
    noise::RoadNoise,
    routing::{detour_km, haversine_km, midpoint, path_distance_km},
};

pub const MIN_POINTS_PER_SEGMENT: usize = 8;
pub const KM_PER_INTERPOLATED_POINT: f64 = 20.0;
const CURVE_DEGREES_PER_KM: f64 = 0.002;
const SECONDARY_CURVE_FACTOR: f64 = 0.3;
const MIDPOINT_RADIUS_FACTOR: f64 = 0.3;
const MAX_DETOUR_RATIO: f64 = 1.2;
const MAX_INTERMEDIATE_CITIES: usize = 2;
/// About 40 km/h once stops are included.
const MINUTES_PER_KM: f64 = 1.5;
const MINUTES_PER_JUNCTION: f64 = 15.0;

/// Synthesizes highway-like routes between two points over a fixed
/// [`HighwayNetwork`].
///
/// # Algorithm
///
/// 1. Resolve the nearest known city for each endpoint.
/// 2. Pick the coarse corridor: the predefined corridor for the city pair,
///    the reverse corridor traversed back to front, or a synthesized chain
///    through at most two cities lying on the way.
/// 3. Densify every corridor segment with curved, jittered interpolation.
/// 4. Smooth interior points with a 0.25/0.5/0.25 moving average.
/// 5. Sum haversine distances along the result and derive the duration.
///
/// The synthesizer holds no mutable state, so one instance can serve any
/// number of concurrent requests. All randomness comes from the
/// [`RoadNoise`] passed to [`RouteSynthesizer::compute_route`].
#[derive(Clone)]
pub struct RouteSynthesizer {
    network: Arc<HighwayNetwork>,
}

impl RouteSynthesizer {
    pub fn new(network: Arc<HighwayNetwork>) -> Self {
        Self { network }
    }

    pub fn network(&self) -> &HighwayNetwork {
        &self.network
    }

    /// City closest to `point` by great-circle distance. Ties go to the city
    /// listed first.
    pub fn nearest_city(&self, point: GeoPoint) -> &NamedCity {
        // HighwayNetwork refuses to build without at least one city.
        let cities = self.network.cities();
        let mut best = &cities[0];
        let mut best_km = haversine_km(point, best.location);

        for city in &cities[1..] {
            let km = haversine_km(point, city.location);
            if km < best_km {
                best = city;
                best_km = km;
            }
        }

        best
    }

    pub fn compute_route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        noise: &mut dyn RoadNoise,
    ) -> Result<RoutePath, RouteError> {
        ensure_valid(origin)?;
        ensure_valid(destination)?;

        let origin_city = self.nearest_city(origin);
        let destination_city = self.nearest_city(destination);
        let (control_points, corridor_source) =
            self.plan_corridor(origin, destination, origin_city, destination_city);

        tracing::debug!(
            "resolved {:?} -> {} and {:?} -> {}, {:?} corridor with {} control points",
            origin,
            origin_city.name,
            destination,
            destination_city.name,
            corridor_source,
            control_points.len()
        );

        let coordinates = smooth_path(&densify(&control_points, noise));
        let distance_km = path_distance_km(&coordinates);
        let duration_minutes = estimate_duration_minutes(distance_km, coordinates.len(), noise);
        let instructions =
            highway_instructions(&origin_city.name, &destination_city.name, distance_km);

        Ok(RoutePath {
            coordinates,
            distance_km,
            duration_minutes,
            instructions,
            origin_city: origin_city.name.clone(),
            destination_city: destination_city.name.clone(),
            corridor_source,
            control_points,
        })
    }

    /// Coarse control points from `origin` to `destination`.
    ///
    /// The exact key is tried before the reverse key, so a pair stored in both
    /// directions always uses the one matching the request.
    fn plan_corridor(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        origin_city: &NamedCity,
        destination_city: &NamedCity,
    ) -> (Vec<GeoPoint>, CorridorSource) {
        if let Some(corridor) = self.network.corridor(&origin_city.name, &destination_city.name) {
            let points = chain(origin, corridor.points.iter().copied(), destination);
            return (points, CorridorSource::Predefined);
        }

        if let Some(corridor) = self.network.corridor(&destination_city.name, &origin_city.name) {
            let points = chain(origin, corridor.points.iter().rev().copied(), destination);
            return (points, CorridorSource::Reversed);
        }

        let via = self
            .intermediate_cities(origin, destination)
            .into_iter()
            .map(|city| city.location);
        (chain(origin, via, destination), CorridorSource::Synthesized)
    }

    /// Up to two cities lying on the way from `origin` to `destination`.
    ///
    /// A city qualifies when it sits within 30% of the direct distance from the
    /// great-circle midpoint and going through it costs at most 1.2 times the
    /// direct distance. The cheapest detours win (table order breaks ties) and
    /// the winners are returned in the order they are met from `origin`.
    pub fn intermediate_cities(&self, origin: GeoPoint, destination: GeoPoint) -> Vec<&NamedCity> {
        let direct_km = haversine_km(origin, destination);
        let mid = midpoint(origin, destination);

        let mut candidates: Vec<(f64, &NamedCity)> = self
            .network
            .cities()
            .iter()
            .filter(|city| haversine_km(mid, city.location) < direct_km * MIDPOINT_RADIUS_FACTOR)
            .map(|city| (detour_km(origin, city.location, destination), city))
            .filter(|(detour, _)| direct_km + detour <= direct_km * MAX_DETOUR_RATIO)
            .collect();

        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
        candidates.truncate(MAX_INTERMEDIATE_CITIES);
        candidates.sort_by(|a, b| {
            haversine_km(origin, a.1.location).total_cmp(&haversine_km(origin, b.1.location))
        });

        candidates.into_iter().map(|(_, city)| city).collect()
    }
}

/// Always yields at least two points, the first being `origin` and the last
/// `destination`. Consecutive duplicates are collapsed.
fn chain(
    origin: GeoPoint,
    via: impl IntoIterator<Item = GeoPoint>,
    destination: GeoPoint,
) -> Vec<GeoPoint> {
    let mut points = vec![origin];
    for point in via.into_iter().chain(iter::once(destination)) {
        if points.last() != Some(&point) {
            points.push(point);
        }
    }
    if points.len() == 1 {
        points.push(destination);
    }
    points
}

fn ensure_valid(point: GeoPoint) -> Result<(), RouteError> {
    if point.is_valid() {
        Ok(())
    } else {
        Err(RouteError::InvalidCoordinate {
            lat: point.lat,
            lng: point.lng,
        })
    }
}

/// Number of steps a segment of `segment_km` is split into.
pub fn points_per_segment(segment_km: f64) -> usize {
    ((segment_km / KM_PER_INTERPOLATED_POINT).floor() as usize).max(MIN_POINTS_PER_SEGMENT)
}

/// Expands control points into a dense road-like path.
///
/// Control points are emitted exactly; only the interpolated points between
/// them receive the curvature offsets and jitter. Zero-length segments add no
/// interpolated points.
pub fn densify(control_points: &[GeoPoint], noise: &mut dyn RoadNoise) -> Vec<GeoPoint> {
    let Some(&last) = control_points.last() else {
        return Vec::new();
    };

    let mut points = Vec::new();
    for pair in control_points.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        points.push(start);

        let segment_km = haversine_km(start, end);
        if segment_km == 0.0 {
            continue;
        }

        let steps = points_per_segment(segment_km);
        let curve = CURVE_DEGREES_PER_KM * segment_km;
        for step in 1..steps {
            let ratio = step as f64 / steps as f64;
            let mut point = start.interpolate(end, ratio);
            point.lat += (ratio * PI).sin() * curve + noise.jitter();
            point.lng += (ratio * 2.0 * PI).sin() * curve * SECONDARY_CURVE_FACTOR + noise.jitter();
            points.push(point);
        }
    }
    points.push(last);

    points
}

/// 0.25/0.5/0.25 moving average over interior points, computed from the
/// unsmoothed neighbours. The first and last points are kept as is.
pub fn smooth_path(points: &[GeoPoint]) -> Vec<GeoPoint> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut smoothed = Vec::with_capacity(points.len());
    smoothed.push(points[0]);
    smoothed.extend(points.windows(3).map(|w| GeoPoint {
        lat: w[0].lat * 0.25 + w[1].lat * 0.5 + w[2].lat * 0.25,
        lng: w[0].lng * 0.25 + w[1].lng * 0.5 + w[2].lng * 0.25,
    }));
    smoothed.push(points[points.len() - 1]);

    smoothed
}

/// Driving time in whole minutes: 1.5 min/km, 15 min per interior waypoint
/// and the traffic slack drawn from `noise`.
pub fn estimate_duration_minutes(
    distance_km: f64,
    waypoint_count: usize,
    noise: &mut dyn RoadNoise,
) -> u32 {
    let junctions = waypoint_count.saturating_sub(2) as f64;
    let minutes =
        distance_km * MINUTES_PER_KM + junctions * MINUTES_PER_JUNCTION + noise.traffic_slack();
    minutes.round().max(0.0) as u32
}
