use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::{self, Read},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::models::{CityInfo, GeoPoint};

const BUILTIN_NETWORK: &str = include_str!("../data/highway_network.json");

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("failed to read network file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid network definition: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("network has no cities")]
    EmptyNetwork,
    #[error("city {0:?} is defined more than once")]
    DuplicateCity(String),
    #[error("{owner} has an invalid coordinate ({lat}, {lng})")]
    InvalidCoordinate { owner: String, lat: f64, lng: f64 },
    #[error("corridor {from:?} -> {to:?} references unknown city {city:?}")]
    UnknownCity {
        from: String,
        to: String,
        city: String,
    },
    #[error("corridor {from:?} -> {to:?} needs at least two points")]
    ShortCorridor { from: String, to: String },
    #[error("corridor {from:?} -> {to:?} is defined more than once")]
    DuplicateCorridor { from: String, to: String },
}

/// On-disk representation of the reference tables.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetworkFile {
    pub cities: Vec<CityRecord>,
    #[serde(default)]
    pub corridors: Vec<CorridorRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CityRecord {
    pub name: String,
    pub location: GeoPoint,
    #[serde(default)]
    pub highways: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CorridorRecord {
    pub from: String,
    pub to: String,
    pub points: Vec<GeoPoint>,
}

#[derive(Clone, Debug)]
pub struct NamedCity {
    pub name: String,
    pub location: GeoPoint,
    /// Advisory only, never used for routing.
    pub highways: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct HighwayCorridor {
    pub from: String,
    pub to: String,
    pub points: Vec<GeoPoint>,
}

/// Read-only city and corridor tables. Always holds at least one city.
#[derive(Clone, Debug)]
pub struct HighwayNetwork {
    cities: Vec<NamedCity>,
    corridors: HashMap<(String, String), HighwayCorridor>,
}

impl HighwayNetwork {
    /// The bundled table of ten Indian cities and four highway corridors.
    pub fn builtin() -> Result<Self, NetworkError> {
        Self::from_reader(BUILTIN_NETWORK.as_bytes())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, NetworkError> {
        let network_file: NetworkFile = serde_json::from_reader(reader)?;
        Self::from_network_file(network_file)
    }

    pub fn from_network_file(network_file: NetworkFile) -> Result<Self, NetworkError> {
        if network_file.cities.is_empty() {
            return Err(NetworkError::EmptyNetwork);
        }

        let mut names = HashSet::new();
        let mut cities = Vec::with_capacity(network_file.cities.len());
        for city in network_file.cities {
            if !names.insert(city.name.clone()) {
                return Err(NetworkError::DuplicateCity(city.name));
            }
            check_point(&city.name, city.location)?;
            cities.push(NamedCity {
                name: city.name,
                location: city.location,
                highways: city.highways,
            });
        }

        let mut corridors = HashMap::with_capacity(network_file.corridors.len());
        for corridor in network_file.corridors {
            for city in [&corridor.from, &corridor.to] {
                if !names.contains(city) {
                    return Err(NetworkError::UnknownCity {
                        from: corridor.from.clone(),
                        to: corridor.to.clone(),
                        city: city.clone(),
                    });
                }
            }
            if corridor.points.len() < 2 {
                return Err(NetworkError::ShortCorridor {
                    from: corridor.from,
                    to: corridor.to,
                });
            }
            let owner = format!("corridor {} -> {}", corridor.from, corridor.to);
            for point in &corridor.points {
                check_point(&owner, *point)?;
            }

            let key = (corridor.from.clone(), corridor.to.clone());
            if corridors.contains_key(&key) {
                return Err(NetworkError::DuplicateCorridor {
                    from: corridor.from,
                    to: corridor.to,
                });
            }
            if corridors.contains_key(&(corridor.to.clone(), corridor.from.clone())) {
                tracing::warn!(
                    "corridor {} -> {} ignored: the opposite direction is already defined",
                    corridor.from,
                    corridor.to
                );
                continue;
            }

            corridors.insert(
                key,
                HighwayCorridor {
                    from: corridor.from,
                    to: corridor.to,
                    points: corridor.points,
                },
            );
        }

        tracing::debug!(
            "highway network loaded: {} cities, {} corridors",
            cities.len(),
            corridors.len()
        );

        Ok(Self { cities, corridors })
    }

    /// Cities in table order.
    pub fn cities(&self) -> &[NamedCity] {
        &self.cities
    }

    pub fn city(&self, name: &str) -> Option<&NamedCity> {
        self.cities.iter().find(|city| city.name == name)
    }

    /// Corridor stored under the exact ordered key `(from, to)`.
    pub fn corridor(&self, from: &str, to: &str) -> Option<&HighwayCorridor> {
        self.corridors.get(&(from.to_string(), to.to_string()))
    }

    pub fn corridor_count(&self) -> usize {
        self.corridors.len()
    }

    pub fn city_infos(&self) -> Vec<CityInfo> {
        self.cities
            .iter()
            .map(|city| CityInfo {
                name: city.name.clone(),
                location: city.location,
                highways: city.highways.clone(),
            })
            .collect()
    }
}

fn check_point(owner: &str, point: GeoPoint) -> Result<(), NetworkError> {
    if point.is_valid() {
        Ok(())
    } else {
        Err(NetworkError::InvalidCoordinate {
            owner: owner.to_string(),
            lat: point.lat,
            lng: point.lng,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn city(name: &str, lat: f64, lng: f64) -> CityRecord {
        CityRecord {
            name: name.into(),
            location: GeoPoint::new(lat, lng),
            highways: Vec::new(),
        }
    }

    fn corridor(from: &str, to: &str, points: &[(f64, f64)]) -> CorridorRecord {
        CorridorRecord {
            from: from.into(),
            to: to.into(),
            points: points.iter().map(|&(lat, lng)| GeoPoint::new(lat, lng)).collect(),
        }
    }

    #[test]
    fn builtin_network_loads() {
        let network = HighwayNetwork::builtin().expect("builtin network");
        assert_eq!(network.cities().len(), 10);
        assert_eq!(network.corridor_count(), 4);
        assert_eq!(network.cities()[0].name, "Mumbai");
        assert_eq!(network.city("Nashik").unwrap().highways, vec!["NH3", "NH50"]);
    }

    #[test]
    fn corridor_lookup_is_directional() {
        let network = HighwayNetwork::builtin().unwrap();
        let corridor = network.corridor("Mumbai", "Pune").expect("stored direction");
        assert_eq!(corridor.points.len(), 5);
        assert!(network.corridor("Pune", "Mumbai").is_none());
    }

    #[test]
    fn rejects_empty_city_table() {
        let file = NetworkFile {
            cities: Vec::new(),
            corridors: Vec::new(),
        };
        assert!(matches!(
            HighwayNetwork::from_network_file(file),
            Err(NetworkError::EmptyNetwork)
        ));
    }

    #[test]
    fn rejects_duplicate_city() {
        let file = NetworkFile {
            cities: vec![city("A", 1.0, 1.0), city("A", 2.0, 2.0)],
            corridors: Vec::new(),
        };
        assert!(matches!(
            HighwayNetwork::from_network_file(file),
            Err(NetworkError::DuplicateCity(name)) if name == "A"
        ));
    }

    #[test]
    fn rejects_out_of_range_city() {
        let file = NetworkFile {
            cities: vec![city("A", 91.0, 1.0)],
            corridors: Vec::new(),
        };
        assert!(matches!(
            HighwayNetwork::from_network_file(file),
            Err(NetworkError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_corridor_point() {
        let file = NetworkFile {
            cities: vec![city("A", 1.0, 1.0), city("B", 2.0, 2.0)],
            corridors: vec![corridor("A", "B", &[(1.0, 1.0), (f64::NAN, 1.5), (2.0, 2.0)])],
        };
        assert!(matches!(
            HighwayNetwork::from_network_file(file),
            Err(NetworkError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn rejects_corridor_to_unknown_city() {
        let file = NetworkFile {
            cities: vec![city("A", 1.0, 1.0)],
            corridors: vec![corridor("A", "Z", &[(1.0, 1.0), (2.0, 2.0)])],
        };
        assert!(matches!(
            HighwayNetwork::from_network_file(file),
            Err(NetworkError::UnknownCity { city, .. }) if city == "Z"
        ));
    }

    #[test]
    fn rejects_single_point_corridor() {
        let file = NetworkFile {
            cities: vec![city("A", 1.0, 1.0), city("B", 2.0, 2.0)],
            corridors: vec![corridor("A", "B", &[(1.0, 1.0)])],
        };
        assert!(matches!(
            HighwayNetwork::from_network_file(file),
            Err(NetworkError::ShortCorridor { .. })
        ));
    }

    #[test]
    fn first_defined_direction_wins() {
        let file = NetworkFile {
            cities: vec![city("A", 1.0, 1.0), city("B", 2.0, 2.0)],
            corridors: vec![
                corridor("B", "A", &[(2.0, 2.0), (1.5, 1.7), (1.0, 1.0)]),
                corridor("A", "B", &[(1.0, 1.0), (2.0, 2.0)]),
            ],
        };
        let network = HighwayNetwork::from_network_file(file).unwrap();
        assert_eq!(network.corridor_count(), 1);
        assert!(network.corridor("B", "A").is_some());
        assert!(network.corridor("A", "B").is_none());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"cities": [{{"name": "Solo", "location": {{"lat": 10.0, "lng": 20.0}}}}]}}"#
        )
        .unwrap();

        let network = HighwayNetwork::from_file(file.path()).expect("network from file");
        assert_eq!(network.cities().len(), 1);
        assert_eq!(network.corridor_count(), 0);
        assert!(network.city("Solo").unwrap().highways.is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = HighwayNetwork::from_file(dir.path().join("missing.json"));
        assert!(matches!(result, Err(NetworkError::Io(_))));
    }
}
