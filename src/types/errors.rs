use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapDataError {
    #[error("failed to parse geojson: {0}")]
    Json(#[from] geojson::Error),
    #[error("map data is not a FeatureCollection")]
    NotACollection,
    #[error("malformed geometry in feature {feature}: {detail}")]
    MalformedGeometry { feature: String, detail: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("ring has fewer than 3 points")]
    DegenerateRing,
    #[error("profile tessellation failed: {0}")]
    Tessellation(String),
}
