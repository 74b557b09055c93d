//! Explore module: live geo-query pipeline for pet-friendly places.
//!
//! Leaf to root: query building ([`build_spot_query`]), record normalisation
//! ([`normalize_elements`]), viewport reconciliation ([`FocusController`]),
//! debounced fetching with stale-response suppression ([`FetchOrchestrator`]
//! driven by [`ExploreSession`]), and presentation filtering
//! ([`filter_spots`]).

mod cities;
mod focus;
mod normalizer;
mod orchestrator;
mod presentation;
mod query;
mod search;
mod session;
mod spot;
mod viewport;

pub use cities::{City, RegionCode, UnknownRegion, collect_cities};
pub use focus::{CITY_FOCUS_RADIUS_METERS, FocusController, GEOLOCATION_FOCUS_RADIUS_METERS};
pub use normalizer::{ElementKind, RawElement, RawFeature, normalize_element, normalize_elements};
pub use orchestrator::{DEFAULT_DEBOUNCE, FetchOrchestrator, Generation, Resolution};
pub use presentation::filter_spots;
pub use query::{
    OverpassQuery, QUERY_TIMEOUT_SECONDS, QueryBuildError, build_city_query, build_spot_query,
};
pub use search::SpotSearchService;
pub use session::{
    CommandSlot, DEFAULT_NOTICE_TTL, ExploreCommand, ExploreHandle, ExploreSession,
    ExploreSessionConfig, ExploreUpdate, GEOLOCATION_DENIED_MESSAGE,
    GEOLOCATION_UNSUPPORTED_MESSAGE, GeolocationOutcome, Notice, SessionEnded, SpotView,
};
pub use spot::{Amenity, CategorySet, Coordinates, Spot, SpotCategory, UnknownCategory};
pub use viewport::{
    EARTH_RADIUS_KM, METERS_PER_DEGREE, Viewport, ViewportError, bbox_around, distance_km,
    format_distance,
};
