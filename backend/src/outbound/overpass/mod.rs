//! Overpass outbound adapter implementing the `GeoFeatureSource` port.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_OVERPASS_ENDPOINT, OverpassHttpSource};
