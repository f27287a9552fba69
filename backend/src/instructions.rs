/// Share of the total distance announced as the highway cruise leg.
const HIGHWAY_SHARE: f64 = 0.7;

/// Nine-step driving directions between two resolved cities. The wording is
/// illustrative and does not follow the actual geometry.
pub fn highway_instructions(origin_city: &str, destination_city: &str, distance_km: f64) -> Vec<String> {
    let highway_km = (distance_km * HIGHWAY_SHARE).round() as u64;

    vec![
        format!("Start from {origin_city} city center"),
        "Head toward highway entrance".to_string(),
        "Merge onto national highway".to_string(),
        format!("Continue on highway for {highway_km} km"),
        "Pass through major junction".to_string(),
        format!("Take exit toward {destination_city}"),
        "Continue on arterial road".to_string(),
        "Follow signs to city center".to_string(),
        format!("Arrive at {destination_city} destination"),
    ]
}
