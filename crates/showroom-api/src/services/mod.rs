pub mod geo;
pub mod pipeline;

pub use geo::{create_geo_locator, GeoLocator, HttpGeoLocator, NoopGeoLocator};
pub use pipeline::MediaPipeline;
