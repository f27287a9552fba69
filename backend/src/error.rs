use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid coordinate ({lat}, {lng}): expected finite latitude in [-90, 90] and longitude in [-180, 180]")]
    InvalidCoordinate { lat: f64, lng: f64 },
    #[error("failed to build GPX document: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
}
