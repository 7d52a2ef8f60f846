use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use crate::geo::LngLat;

/// Identifier of a challenge, unique within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeId(String);

impl ChallengeId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChallengeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// How a challenge is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeKind {
    /// Completed by taking a picture with the capture surface.
    Photo,
    /// Completed by walking to the coordinates.
    Location,
}

impl ChallengeKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Location => "location",
        }
    }
}

/// A point-of-interest task the user can undertake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub coordinates: LngLat,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ChallengeKind,
    pub points: u32,
    /// Precomputed distance from the user in kilometres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl Challenge {
    #[must_use]
    pub fn new(
        id: impl Into<ChallengeId>,
        coordinates: LngLat,
        title: impl Into<String>,
        description: impl Into<String>,
        kind: ChallengeKind,
        points: u32,
    ) -> Self {
        Self {
            id: id.into(),
            coordinates,
            title: title.into(),
            description: description.into(),
            kind,
            points,
            distance: None,
        }
    }

    #[must_use]
    pub const fn with_distance(mut self, km: f64) -> Self {
        self.distance = Some(km);
        self
    }

    #[must_use]
    pub const fn is_photo(&self) -> bool {
        matches!(self.kind, ChallengeKind::Photo)
    }

    #[must_use]
    pub const fn is_location(&self) -> bool {
        matches!(self.kind, ChallengeKind::Location)
    }

    /// Live distance from `position` when known, otherwise the precomputed one.
    #[must_use]
    pub fn distance_from(&self, position: Option<LngLat>) -> Option<f64> {
        position
            .map(|p| p.distance_km(self.coordinates))
            .or(self.distance)
    }
}

impl From<String> for ChallengeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Errors raised while loading or validating challenge data.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate challenge id '{0}'")]
    DuplicateId(ChallengeId),
    #[error("challenge '{0}' must award at least one point")]
    ZeroPoints(ChallengeId),
    #[error("challenge '{id}' has out-of-range coordinates ({coordinates})")]
    InvalidCoordinates { id: ChallengeId, coordinates: LngLat },
    #[error("challenge data is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct CatalogFile {
    challenges: Vec<Challenge>,
}

/// Validated, ordered collection of challenges.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChallengeCatalog {
    challenges: Vec<Challenge>,
}

impl ChallengeCatalog {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            challenges: Vec::new(),
        }
    }

    /// Build a catalog, enforcing unique ids, positive points and valid coordinates.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in list order.
    pub fn new(challenges: Vec<Challenge>) -> Result<Self, CatalogError> {
        let mut seen = BTreeSet::new();
        for challenge in &challenges {
            if !seen.insert(&challenge.id) {
                return Err(CatalogError::DuplicateId(challenge.id.clone()));
            }
            if challenge.points == 0 {
                return Err(CatalogError::ZeroPoints(challenge.id.clone()));
            }
            if !challenge.coordinates.is_valid() {
                return Err(CatalogError::InvalidCoordinates {
                    id: challenge.id.clone(),
                    coordinates: challenge.coordinates,
                });
            }
        }
        Ok(Self { challenges })
    }

    /// Parse `{"challenges": [...]}` and validate the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the data fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.challenges)
    }

    #[must_use]
    pub fn get(&self, id: &ChallengeId) -> Option<&Challenge> {
        self.challenges.iter().find(|c| &c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Challenge> {
        self.challenges.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Challenge] {
        &self.challenges
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.challenges
            .iter()
            .fold(0_u32, |acc, c| acc.saturating_add(c.points))
    }

    /// Challenges ordered by distance from `from`. Entries without any known
    /// distance keep their catalog order after the ones that have one.
    #[must_use]
    pub fn sorted_by_distance(&self, from: Option<LngLat>) -> Vec<&Challenge> {
        let mut sorted: Vec<&Challenge> = self.challenges.iter().collect();
        sorted.sort_by(|a, b| match (a.distance_from(from), b.distance_from(from)) {
            (Some(da), Some(db)) => da.total_cmp(&db),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        sorted
    }
}

impl<'a> IntoIterator for &'a ChallengeCatalog {
    type Item = &'a Challenge;
    type IntoIter = std::slice::Iter<'a, Challenge>;

    fn into_iter(self) -> Self::IntoIter {
        self.challenges.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statue() -> Challenge {
        Challenge::new(
            "1",
            LngLat::new(-0.481_747_846_041_145, 51.323_337_965_023_2),
            "Royal Statue",
            "Take a photo with the famous statue in the Royal Gardens",
            ChallengeKind::Photo,
            100,
        )
        .with_distance(0.5)
    }

    fn fountain() -> Challenge {
        Challenge::new(
            "2",
            LngLat::new(-0.482_747_846_041_145, 51.324_337_965_023_2),
            "Historic Fountain",
            "Find the hidden message near the fountain",
            ChallengeKind::Location,
            150,
        )
        .with_distance(1.2)
    }

    #[test]
    fn parses_challenge_json_with_type_field() {
        let json = r#"{
            "challenges": [
                {
                    "id": "2",
                    "coordinates": [-0.482747846041145, 51.3243379650232],
                    "title": "Historic Fountain",
                    "description": "Find the hidden message near the fountain",
                    "type": "location",
                    "points": 150,
                    "distance": 1.2
                }
            ]
        }"#;

        let catalog = ChallengeCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        let fountain = catalog.get(&ChallengeId::from("2")).unwrap();
        assert_eq!(fountain.kind, ChallengeKind::Location);
        assert_eq!(fountain.points, 150);
        assert_eq!(fountain.distance, Some(1.2));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = ChallengeCatalog::new(vec![statue(), fountain(), statue()]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id.as_str() == "1"));
    }

    #[test]
    fn rejects_zero_points_and_bad_coordinates() {
        let mut broke = fountain();
        broke.points = 0;
        assert!(matches!(
            ChallengeCatalog::new(vec![broke]),
            Err(CatalogError::ZeroPoints(_))
        ));

        let mut lost = fountain();
        lost.coordinates = LngLat::new(0.0, 123.0);
        assert!(matches!(
            ChallengeCatalog::new(vec![lost]),
            Err(CatalogError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = ChallengeCatalog::from_json(r#"{"challenges": [{"id": 1}]}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }

    #[test]
    fn sorting_prefers_live_position_over_precomputed_distance() {
        let catalog = ChallengeCatalog::new(vec![fountain(), statue()]).unwrap();
        let precomputed: Vec<_> = catalog
            .sorted_by_distance(None)
            .iter()
            .map(|c| c.title.as_str())
            .collect();
        assert_eq!(precomputed, ["Royal Statue", "Historic Fountain"]);

        let at_fountain = fountain().coordinates;
        let live: Vec<_> = catalog
            .sorted_by_distance(Some(at_fountain))
            .iter()
            .map(|c| c.title.as_str())
            .collect();
        assert_eq!(live, ["Historic Fountain", "Royal Statue"]);
    }

    #[test]
    fn total_points_sums_catalog() {
        let catalog = ChallengeCatalog::new(vec![statue(), fountain()]).unwrap();
        assert_eq!(catalog.total_points(), 250);
        assert_eq!(ChallengeCatalog::empty().total_points(), 0);
    }
}
