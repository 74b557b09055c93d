//! Query-string validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use serde_json::json;

use crate::domain::Error;

/// Validation error codes reported in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidNumber,
    InvalidValue,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidNumber => "invalid_number",
            Self::InvalidValue => "invalid_value",
        }
    }
}

pub(crate) fn field_error(field: &str, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

/// Require a non-blank parameter.
pub(crate) fn require<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, Error> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            field_error(
                field,
                ValidationCode::MissingField,
                format!("{field} is required"),
            )
        })
}

/// Parse a required numeric parameter.
pub(crate) fn parse_number<T: FromStr>(field: &str, value: Option<&str>) -> Result<T, Error> {
    let raw = require(field, value)?;
    raw.parse().map_err(|_| {
        field_error(
            field,
            ValidationCode::InvalidNumber,
            format!("{field} must be a number"),
        )
    })
}

/// Parse an optional numeric parameter; blank counts as absent.
pub(crate) fn parse_optional_number<T: FromStr>(
    field: &str,
    value: Option<&str>,
) -> Result<Option<T>, Error> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(raw) => parse_number(field, Some(raw)).map(Some),
    }
}
