//! Geographic points and great-circle distance.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VerstError};

/// The reference point all documents are ranked against by default:
/// Washington, DC. Fixed for the process lifetime unless overridden on the
/// command line.
pub const WASHINGTON_DC: GeoPoint = GeoPoint {
    lat: 38.012,
    lon: -77.037,
};

/// A geographical point with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in degrees (-180 to 180)
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new geographical point.
    ///
    /// Out-of-range values are a caller error and are never clamped.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(VerstError::geo(format!(
                "invalid latitude: {lat} (must be between -90 and 90)"
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(VerstError::geo(format!(
                "invalid longitude: {lon} (must be between -180 and 180)"
            )));
        }

        Ok(GeoPoint { lat, lon })
    }

    /// Parse a point from comma-separated `"lat,lon"` numeric text, the
    /// format of the stored coordinate attribute.
    ///
    /// Wrong arity or non-numeric text is an error; a malformed value must
    /// never fall back to a default coordinate.
    pub fn parse(text: &str) -> Result<Self> {
        let fields: Vec<&str> = text.split(',').collect();
        if fields.len() != 2 {
            return Err(VerstError::geo(format!(
                "expected 'lat,lon', got {} field(s) in '{text}'",
                fields.len()
            )));
        }

        let lat: f64 = fields[0]
            .trim()
            .parse()
            .map_err(|_| VerstError::geo(format!("non-numeric latitude '{}'", fields[0].trim())))?;
        let lon: f64 = fields[1].trim().parse().map_err(|_| {
            VerstError::geo(format!("non-numeric longitude '{}'", fields[1].trim()))
        })?;

        GeoPoint::new(lat, lon)
    }

    /// Calculate the Haversine distance to another point in kilometers.
    ///
    /// Symmetric, zero for coincident points, and monotonic with true
    /// geographic separation.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lon = (other.lon - self.lon).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}
