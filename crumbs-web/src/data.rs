//! Challenge data bundled into the wasm binary.

use crumbs_core::{CatalogError, ChallengeCatalog, ChallengeSource};

const CHALLENGES_JSON: &str = include_str!("../static/assets/data/challenges.json");

/// Challenges shipped with the app.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticChallenges;

impl ChallengeSource for StaticChallenges {
    type Error = CatalogError;

    fn load_challenges(&self) -> Result<ChallengeCatalog, Self::Error> {
        ChallengeCatalog::from_json(CHALLENGES_JSON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crumbs_core::ChallengeKind;

    #[test]
    fn bundled_data_parses() {
        let catalog = StaticChallenges.load_challenges().unwrap();
        assert_eq!(catalog.len(), 2);
        let kinds: Vec<_> = catalog.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ChallengeKind::Photo, ChallengeKind::Location]);
        assert_eq!(catalog.total_points(), 250);
    }
}
