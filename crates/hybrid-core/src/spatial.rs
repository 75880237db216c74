//! Spatial math for delivery distances and path interpolation.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MI: f64 = 3_958.8;

/// A WGS-84 position in decimal degrees. No datum correction is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "lng", alias = "longitude")]
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Linear interpolation in degree space. `frac` of 0 is `self`, 1 is `other`.
    pub fn lerp(&self, other: &Coordinate, frac: f64) -> Coordinate {
        Coordinate {
            lat: self.lat + (other.lat - self.lat) * frac,
            lon: self.lon + (other.lon - self.lon) * frac,
        }
    }

    /// Degree-space midpoint of two coordinates.
    pub fn midpoint(&self, other: &Coordinate) -> Coordinate {
        self.lerp(other, 0.5)
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// Unit a great-circle distance is expressed in.
///
/// The unit is chosen at the call site; the same pair of coordinates yields
/// different numbers under different units and they must not be mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Miles,
    Kilometers,
}

impl DistanceUnit {
    pub const fn earth_radius(self) -> f64 {
        match self {
            DistanceUnit::Miles => EARTH_RADIUS_MI,
            DistanceUnit::Kilometers => EARTH_RADIUS_KM,
        }
    }

    pub const fn abbreviation(self) -> &'static str {
        match self {
            DistanceUnit::Miles => "mi",
            DistanceUnit::Kilometers => "km",
        }
    }
}

/// Calculate the great-circle distance between two points using the Haversine formula.
///
/// # Arguments
/// * `a`, `b` - Endpoints in decimal degrees
/// * `unit` - Unit of the returned distance
///
/// # Returns
/// Non-negative distance in `unit`; zero when `a == b`.
pub fn distance(a: Coordinate, b: Coordinate, unit: DistanceUnit) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * unit.earth_radius() * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Sum of consecutive great-circle legs along `points`.
pub fn path_length(points: &[Coordinate], unit: DistanceUnit) -> f64 {
    points
        .windows(2)
        .map(|leg| distance(leg[0], leg[1], unit))
        .sum()
}

/// Length of a closed tour `origin -> stops... -> origin`.
///
/// Returns 0 when there are no stops.
pub fn round_trip_length(origin: Coordinate, stops: &[Coordinate], unit: DistanceUnit) -> f64 {
    let Some(last) = stops.last() else {
        return 0.0;
    };
    let mut total = 0.0;
    let mut prev = origin;
    for stop in stops {
        total += distance(prev, *stop, unit);
        prev = *stop;
    }
    total + distance(*last, origin, unit)
}
