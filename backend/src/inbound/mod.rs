//! Inbound adapters translating external requests into domain calls.
//!
//! REST endpoints live under [`http`]; the explore session bridge lives
//! under [`ws`].

pub mod http;
pub mod ws;
