//! Outbound adapters implementing domain ports for external providers.
//!
//! - **overpass**: map-feature queries against an Overpass interpreter
//! - **petfinder**: adoption listings behind OAuth client credentials
//!
//! Adapters translate between transport payloads and domain types. They
//! contain no business logic.

pub mod overpass;
pub mod petfinder;
