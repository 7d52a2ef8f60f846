//! Request and response codec for the hosted walking-directions API.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::geo::{LngLat, LngLatBounds};

pub const DIRECTIONS_ENDPOINT: &str = "https://api.mapbox.com/directions/v5/mapbox";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelProfile {
    #[default]
    Walking,
    Cycling,
    Driving,
}

impl TravelProfile {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Cycling => "cycling",
            Self::Driving => "driving",
        }
    }
}

/// Build the GET URL for a route between two points.
#[must_use]
pub fn directions_url(profile: TravelProfile, from: LngLat, to: LngLat, token: &str) -> String {
    format!(
        "{DIRECTIONS_ENDPOINT}/{}/{from};{to}?steps=true&geometries=geojson&access_token={token}",
        profile.as_str()
    )
}

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("directions request failed: {0}")]
    Request(String),
    #[error("directions service returned HTTP {0}")]
    Status(u16),
    #[error("no route found ({code}{})", message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    NoRoute {
        code: String,
        message: Option<String>,
    },
    #[error("directions response is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<RouteEntry>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct RouteEntry {
    geometry: RouteGeometry,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Deserialize)]
struct RouteGeometry {
    coordinates: Vec<LngLat>,
}

/// First route of a directions response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePath {
    pub coordinates: Vec<LngLat>,
    pub distance_m: f64,
    pub duration_s: f64,
}

impl RoutePath {
    #[must_use]
    pub fn bounds(&self) -> Option<LngLatBounds> {
        LngLatBounds::covering(self.coordinates.iter().copied())
    }

    /// GeoJSON `Feature` carrying the path as a `LineString`.
    #[must_use]
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "LineString",
                "coordinates": self.coordinates,
            }
        })
    }
}

/// Parse a directions response body.
///
/// # Errors
///
/// Returns [`DirectionsError::NoRoute`] when the service found nothing and
/// [`DirectionsError::Json`] for bodies that are not a directions response.
pub fn parse_directions(body: &str) -> Result<RoutePath, DirectionsError> {
    let response: DirectionsResponse = serde_json::from_str(body)?;
    let Some(route) = response.routes.into_iter().next() else {
        return Err(DirectionsError::NoRoute {
            code: response.code.unwrap_or_else(|| "NoRoute".to_string()),
            message: response.message,
        });
    };
    Ok(RoutePath {
        coordinates: route.geometry.coordinates,
        distance_m: route.distance,
        duration_s: route.duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_walking_url() {
        let url = directions_url(
            TravelProfile::Walking,
            LngLat::new(-0.48, 51.32),
            LngLat::new(-0.49, 51.33),
            "pk.test",
        );
        assert_eq!(
            url,
            "https://api.mapbox.com/directions/v5/mapbox/walking/-0.48,51.32;-0.49,51.33?steps=true&geometries=geojson&access_token=pk.test"
        );
    }

    #[test]
    fn parses_first_route() {
        let body = r#"{
            "code": "Ok",
            "routes": [
                {
                    "distance": 182.4,
                    "duration": 131.0,
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[-0.4817, 51.3233], [-0.4822, 51.3238], [-0.4827, 51.3243]]
                    }
                },
                {
                    "geometry": { "type": "LineString", "coordinates": [] }
                }
            ]
        }"#;
        let path = parse_directions(body).unwrap();
        assert_eq!(path.coordinates.len(), 3);
        assert_eq!(path.coordinates[2], LngLat::new(-0.4827, 51.3243));
        assert!((path.distance_m - 182.4).abs() < f64::EPSILON);

        let bounds = path.bounds().unwrap();
        assert_eq!(bounds.south_west, LngLat::new(-0.4827, 51.3233));

        let geojson = path.to_geojson();
        assert_eq!(geojson["geometry"]["type"], "LineString");
        assert_eq!(geojson["geometry"]["coordinates"][0][0], -0.4817);
    }

    #[test]
    fn empty_routes_are_no_route() {
        let err = parse_directions(r#"{"code":"NoRoute","message":"No route found","routes":[]}"#)
            .unwrap_err();
        assert!(matches!(err, DirectionsError::NoRoute { ref code, .. } if code == "NoRoute"));
        assert_eq!(err.to_string(), "no route found (NoRoute: No route found)");
    }

    #[test]
    fn garbage_is_json_error() {
        assert!(matches!(
            parse_directions("<html>"),
            Err(DirectionsError::Json(_))
        ));
    }
}
