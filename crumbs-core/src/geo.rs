use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6_371.008_8;

/// A WGS84 position. Serialized as `[lng, lat]` to match GeoJSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// True when both components are finite and inside the WGS84 ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lng.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lng)
            && (-90.0..=90.0).contains(&self.lat)
    }

    /// Haversine distance in kilometres.
    #[must_use]
    pub fn distance_km(&self, other: Self) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

impl From<[f64; 2]> for LngLat {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(value: LngLat) -> Self {
        [value.lng, value.lat]
    }
}

impl fmt::Display for LngLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lng, self.lat)
    }
}

/// Axis-aligned box used to frame markers and routes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLatBounds {
    pub south_west: LngLat,
    pub north_east: LngLat,
}

impl LngLatBounds {
    #[must_use]
    pub const fn from_point(point: LngLat) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    /// Grow the box so it contains `point`.
    #[must_use]
    pub fn extend(self, point: LngLat) -> Self {
        Self {
            south_west: LngLat::new(
                self.south_west.lng.min(point.lng),
                self.south_west.lat.min(point.lat),
            ),
            north_east: LngLat::new(
                self.north_east.lng.max(point.lng),
                self.north_east.lat.max(point.lat),
            ),
        }
    }

    /// Smallest box covering every point, or `None` for an empty input.
    pub fn covering(points: impl IntoIterator<Item = LngLat>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_point(first), Self::extend))
    }

    #[must_use]
    pub fn contains(&self, point: LngLat) -> bool {
        (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
            && (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
    }

    #[must_use]
    pub fn center(&self) -> LngLat {
        LngLat::new(
            f64::midpoint(self.south_west.lng, self.north_east.lng),
            f64::midpoint(self.south_west.lat, self.north_east.lat),
        )
    }
}
