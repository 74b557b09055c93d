//! Bounding boxes and distance helpers.

use serde::{Deserialize, Serialize};

use super::Coordinates;

/// Metres per degree of latitude used by [`bbox_around`].
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Mean Earth radius used for haversine distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Validation failures for [`Viewport`] construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewportError {
    #[error("viewport bounds must be finite numbers")]
    NonFinite,
    #[error("latitude {value} is outside -90..=90")]
    LatitudeOutOfRange { value: f64 },
    #[error("longitude {value} is outside -180..=180")]
    LongitudeOutOfRange { value: f64 },
    #[error("viewport must have a non-zero extent")]
    Degenerate,
    #[error("focus radius must be a positive finite number of metres")]
    InvalidRadius,
}

/// Normalised south/west/north/east bounding box.
///
/// ## Invariants
/// - `south < north` and `west < east`.
/// - All bounds are finite and inside WGS84 ranges.
///
/// # Examples
/// ```
/// use pawscout::domain::explore::Viewport;
///
/// let viewport = Viewport::new(40.8, -73.9, 40.7, -74.0).expect("valid bounds");
/// assert_eq!(viewport.south(), 40.7);
/// assert_eq!(viewport.west(), -74.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl Viewport {
    /// Build a viewport, swapping inverted corners.
    ///
    /// # Errors
    ///
    /// Rejects non-finite values, out-of-range coordinates, and zero-extent
    /// boxes.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self, ViewportError> {
        if ![south, west, north, east].iter().all(|v| v.is_finite()) {
            return Err(ViewportError::NonFinite);
        }
        for value in [south, north] {
            if !(-90.0..=90.0).contains(&value) {
                return Err(ViewportError::LatitudeOutOfRange { value });
            }
        }
        for value in [west, east] {
            if !(-180.0..=180.0).contains(&value) {
                return Err(ViewportError::LongitudeOutOfRange { value });
            }
        }
        let (south, north) = (south.min(north), south.max(north));
        let (west, east) = (west.min(east), west.max(east));
        if south == north || west == east {
            return Err(ViewportError::Degenerate);
        }
        Ok(Self {
            south,
            west,
            north,
            east,
        })
    }

    /// Southern latitude.
    #[must_use]
    pub const fn south(&self) -> f64 {
        self.south
    }

    /// Western longitude.
    #[must_use]
    pub const fn west(&self) -> f64 {
        self.west
    }

    /// Northern latitude.
    #[must_use]
    pub const fn north(&self) -> f64 {
        self.north
    }

    /// Eastern longitude.
    #[must_use]
    pub const fn east(&self) -> f64 {
        self.east
    }

    /// Overpass bounding-box filter, `(south,west,north,east)`.
    #[must_use]
    pub fn bbox_clause(&self) -> String {
        format!("({},{},{},{})", self.south, self.west, self.north, self.east)
    }
}

impl<'de> Deserialize<'de> for Viewport {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            south: f64,
            west: f64,
            north: f64,
            east: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.south, raw.west, raw.north, raw.east).map_err(serde::de::Error::custom)
    }
}

/// Square-ish box of `radius_m` metres around `center`.
///
/// Longitude spread widens with latitude; bounds are clamped to WGS84 ranges.
///
/// # Errors
///
/// Returns [`ViewportError::InvalidRadius`] for non-positive radii and the
/// usual [`Viewport::new`] errors for invalid centres.
pub fn bbox_around(center: Coordinates, radius_m: f64) -> Result<Viewport, ViewportError> {
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(ViewportError::InvalidRadius);
    }
    if !center.lat.is_finite() || !center.lng.is_finite() {
        return Err(ViewportError::NonFinite);
    }
    let dlat = radius_m / METERS_PER_DEGREE;
    let dlng = radius_m / (METERS_PER_DEGREE * center.lat.to_radians().cos());
    let clamp_lat = |v: f64| v.clamp(-90.0, 90.0);
    let clamp_lng = |v: f64| v.clamp(-180.0, 180.0);
    Viewport::new(
        clamp_lat(center.lat - dlat),
        clamp_lng(center.lng - dlng),
        clamp_lat(center.lat + dlat),
        clamp_lng(center.lng + dlng),
    )
}

/// Great-circle distance in kilometres.
#[must_use]
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Distance label: whole metres below one kilometre, else one decimal km.
///
/// # Examples
/// ```
/// use pawscout::domain::explore::format_distance;
///
/// assert_eq!(format_distance(0.4321), "432 m");
/// assert_eq!(format_distance(2.345), "2.3 km");
/// ```
#[must_use]
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", (km * 1000.0).round())
    } else {
        format!("{km:.1} km")
    }
}
