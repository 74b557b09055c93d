//! Domain primitives, services, and ports.
//!
//! Purpose: keep the explore pipeline and the adoption proxy independent of
//! HTTP, WebSocket, and provider specifics. Adapters in `inbound` and
//! `outbound` depend on this module, never the reverse.
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failure payload.
//! - [`TraceId`]: per-request correlation identifier.
//! - [`explore`]: geo-query pipeline and live explore sessions.
//! - [`adoption`]: adoption-listing proxy and token cache.
//! - [`ports`]: driving and driven port traits.

pub mod adoption;
pub mod error;
pub mod explore;
pub mod ports;
pub mod trace_id;

pub use self::error::{EmptyErrorMessage, Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use pawscout::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("no such region"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
