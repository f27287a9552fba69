use crate::models::GeoPoint;

pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Great-circle distance between two points (haversine formula).
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlng = (dlng / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Sum of great-circle distances between consecutive points.
pub fn path_distance_km(path: &[GeoPoint]) -> f64 {
    path.windows(2).map(|w| haversine_km(w[0], w[1])).sum()
}

/// Point halfway along the great circle from `a` to `b`.
pub fn midpoint(a: GeoPoint, b: GeoPoint) -> GeoPoint {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let lng1 = a.lng.to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let bx = lat2.cos() * dlng.cos();
    let by = lat2.cos() * dlng.sin();

    let lat = (lat1.sin() + lat2.sin()).atan2(((lat1.cos() + bx).powi(2) + by * by).sqrt());
    let lng = lng1 + by.atan2(lat1.cos() + bx);

    GeoPoint {
        lat: lat.to_degrees(),
        lng: normalize_lng(lng.to_degrees()),
    }
}

fn normalize_lng(lng: f64) -> f64 {
    (lng + 540.0).rem_euclid(360.0) - 180.0
}

/// Extra distance paid by travelling `from -> via -> to` instead of `from -> to`.
pub fn detour_km(from: GeoPoint, via: GeoPoint, to: GeoPoint) -> f64 {
    haversine_km(from, via) + haversine_km(via, to) - haversine_km(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let point = GeoPoint::new(19.0760, 72.8777);
        assert_eq!(haversine_km(point, point), 0.0);
    }

    #[test]
    fn test_haversine_symmetry() {
        let a = GeoPoint::new(19.0760, 72.8777);
        let b = GeoPoint::new(18.5204, 73.8567);
        assert_eq!(haversine_km(a, b), haversine_km(b, a));
    }

    #[test]
    fn test_haversine_mumbai_pune() {
        let mumbai = GeoPoint::new(19.0760, 72.8777);
        let pune = GeoPoint::new(18.5204, 73.8567);
        let d = haversine_km(mumbai, pune);
        assert!((d - 120.2).abs() < 0.5, "got {d}");
    }

    #[test]
    fn test_path_distance_empty() {
        assert_eq!(path_distance_km(&[]), 0.0);
    }

    #[test]
    fn test_path_distance_single_point() {
        let path = vec![GeoPoint::new(45.0, 5.0)];
        assert_eq!(path_distance_km(&path), 0.0);
    }

    #[test]
    fn test_midpoint_is_equidistant() {
        let mumbai = GeoPoint::new(19.0760, 72.8777);
        let kolkata = GeoPoint::new(22.5726, 88.3639);
        let mid = midpoint(mumbai, kolkata);
        let to_a = haversine_km(mumbai, mid);
        let to_b = haversine_km(mid, kolkata);
        assert!((to_a - to_b).abs() < 1e-6);
        assert!((to_a + to_b - haversine_km(mumbai, kolkata)).abs() < 1e-6);
    }

    #[test]
    fn test_midpoint_across_antimeridian() {
        let mid = midpoint(GeoPoint::new(0.0, 179.0), GeoPoint::new(0.0, -179.0));
        assert!(mid.lat.abs() < 1e-9);
        assert!((mid.lng.abs() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_detour_of_point_on_the_way_is_small() {
        let a = GeoPoint::new(10.0, 70.0);
        let b = GeoPoint::new(20.0, 70.0);
        let on_meridian = GeoPoint::new(15.0, 70.0);
        let off = GeoPoint::new(15.0, 74.0);
        assert!(detour_km(a, on_meridian, b).abs() < 1e-6);
        assert!(detour_km(a, off, b) > 50.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn valid_point() -> impl Strategy<Value = GeoPoint> {
            (-90.0..=90.0, -180.0..=180.0).prop_map(|(lat, lng)| GeoPoint { lat, lng })
        }

        proptest! {
            #[test]
            fn prop_haversine_non_negative(a in valid_point(), b in valid_point()) {
                prop_assert!(haversine_km(a, b) >= 0.0);
            }

            #[test]
            fn prop_haversine_symmetric(a in valid_point(), b in valid_point()) {
                let dist_ab = haversine_km(a, b);
                let dist_ba = haversine_km(b, a);
                prop_assert!((dist_ab - dist_ba).abs() < 1e-9);
            }

            #[test]
            fn prop_haversine_bounded_by_half_circumference(a in valid_point(), b in valid_point()) {
                let max_distance = std::f64::consts::PI * EARTH_RADIUS_KM;
                prop_assert!(haversine_km(a, b) <= max_distance + 0.1);
            }

            #[test]
            fn prop_haversine_triangle_inequality(
                a in valid_point(),
                b in valid_point(),
                c in valid_point()
            ) {
                let dist_ac = haversine_km(a, c);
                prop_assert!(dist_ac <= haversine_km(a, b) + haversine_km(b, c) + 1e-6);
            }

            #[test]
            fn prop_path_distance_at_least_direct(
                points in prop::collection::vec(valid_point(), 2..10)
            ) {
                let direct = haversine_km(points[0], *points.last().unwrap());
                prop_assert!(path_distance_km(&points) + 1e-6 >= direct);
            }

            #[test]
            fn prop_path_distance_additive(
                path1 in prop::collection::vec(valid_point(), 2..5),
                path2 in prop::collection::vec(valid_point(), 2..5)
            ) {
                let mut combined = path1.clone();
                combined.extend_from_slice(&path2);

                let connection = haversine_km(*path1.last().unwrap(), path2[0]);
                let expected = path_distance_km(&path1) + connection + path_distance_km(&path2);

                prop_assert!((path_distance_km(&combined) - expected).abs() < 1e-6);
            }
        }
    }
}
