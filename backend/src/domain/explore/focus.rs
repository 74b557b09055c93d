//! Reconciles the three viewport input channels.
//!
//! Only map-reported moves change the authoritative viewport. Geolocation
//! fixes and city picks produce focus requests that the client applies to its
//! map, which then reports the resulting move back through channel one.

use super::{Coordinates, Viewport, ViewportError, bbox_around};

/// Radius of the box shown around a geolocation fix.
pub const GEOLOCATION_FOCUS_RADIUS_METERS: f64 = 2_500.0;

/// Radius of the box shown around a selected city.
pub const CITY_FOCUS_RADIUS_METERS: f64 = 10_000.0;

/// Viewport state for one explore session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FocusController {
    viewport: Option<Viewport>,
    focus: Option<Viewport>,
    user_location: Option<Coordinates>,
}

impl FocusController {
    /// Controller with no viewport and no known location.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a map-reported viewport. Returns `true` when it differs from
    /// the current authoritative viewport.
    pub fn viewport_changed(&mut self, viewport: Viewport) -> bool {
        if self.viewport == Some(viewport) {
            return false;
        }
        self.viewport = Some(viewport);
        true
    }

    /// Record a geolocation fix and request focus around it.
    ///
    /// # Errors
    ///
    /// Propagates [`ViewportError`] for coordinates that cannot anchor a box.
    pub fn geolocation_fixed(&mut self, fix: Coordinates) -> Result<Viewport, ViewportError> {
        let focus = bbox_around(fix, GEOLOCATION_FOCUS_RADIUS_METERS)?;
        self.user_location = Some(fix);
        self.focus = Some(focus);
        Ok(focus)
    }

    /// Request focus around a selected city.
    ///
    /// # Errors
    ///
    /// Propagates [`ViewportError`] for coordinates that cannot anchor a box.
    pub fn city_selected(&mut self, city: Coordinates) -> Result<Viewport, ViewportError> {
        let focus = bbox_around(city, CITY_FOCUS_RADIUS_METERS)?;
        self.focus = Some(focus);
        Ok(focus)
    }

    /// Hand the pending focus request to the caller, clearing it.
    pub fn take_focus_request(&mut self) -> Option<Viewport> {
        self.focus.take()
    }

    /// Last viewport reported by the map.
    #[must_use]
    pub const fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Last good geolocation fix.
    #[must_use]
    pub const fn user_location(&self) -> Option<Coordinates> {
        self.user_location
    }
}
