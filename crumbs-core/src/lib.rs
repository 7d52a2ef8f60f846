//! Crumbs core
//!
//! Platform-agnostic logic for the Crumbs location challenge app: the
//! challenge catalog, the session controller that coordinates selection,
//! activation and routing, and the seams (map, capture, preferences) that a
//! front end implements. Nothing here touches the browser.

pub mod capture;
pub mod challenge;
pub mod directions;
pub mod geo;
pub mod map;
pub mod prefs;
pub mod session;

pub use capture::{CaptureError, CaptureFlow, CaptureState, CaptureSurface, Snapshot};
pub use challenge::{CatalogError, Challenge, ChallengeCatalog, ChallengeId, ChallengeKind};
pub use directions::{
    DirectionsError, RoutePath, TravelProfile, directions_url, parse_directions,
};
pub use geo::{LngLat, LngLatBounds};
pub use map::{
    MapAdapter, MapCall, PositionHandler, PositionWatch, RecordingMap, RouteRequest, RouteTicket,
    SelectHandler,
};
pub use prefs::{
    DEFAULT_MAP_STYLE, MAP_STYLE_KEY, MAP_STYLES, MapStyle, MemoryPreferences, PreferenceChange,
    PreferenceChannel, PreferenceError, PreferenceStore, StylePreferences, Subscription,
};
pub use session::{
    ARRIVAL_RADIUS_KM, ChallengeSession, Completion, Rejection, SessionPhase, Transition,
    TransitionResult,
};

use std::convert::Infallible;

/// Where the challenge list comes from.
/// Platform-specific implementations should provide this
pub trait ChallengeSource {
    type Error: std::error::Error + 'static;

    /// Load the challenges offered in a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the challenge data cannot be loaded or validated.
    fn load_challenges(&self) -> Result<ChallengeCatalog, Self::Error>;
}

impl ChallengeSource for ChallengeCatalog {
    type Error = Infallible;

    fn load_challenges(&self) -> Result<ChallengeCatalog, Self::Error> {
        Ok(self.clone())
    }
}

/// Entry point binding a challenge source to the user's stored preferences.
pub struct CrumbsEngine<L, S>
where
    L: ChallengeSource,
    S: PreferenceStore,
{
    source: L,
    preferences: StylePreferences<S>,
}

impl<L, S> CrumbsEngine<L, S>
where
    L: ChallengeSource,
    S: PreferenceStore,
{
    /// Create an engine with its own preference channel.
    pub fn new(source: L, store: S) -> Self {
        Self {
            source,
            preferences: StylePreferences::new(store),
        }
    }

    /// Create an engine publishing style changes on an existing channel.
    pub const fn with_channel(source: L, store: S, channel: PreferenceChannel) -> Self {
        Self {
            source,
            preferences: StylePreferences::with_channel(store, channel),
        }
    }

    /// Start a fresh session drawing on `map`.
    ///
    /// # Errors
    ///
    /// Returns an error if the challenge data cannot be loaded.
    pub fn create_session<M: MapAdapter>(&self, map: M) -> Result<ChallengeSession<M>, L::Error> {
        let catalog = self.source.load_challenges()?;
        log::info!("starting session with {} challenge(s)", catalog.len());
        Ok(ChallengeSession::new(catalog, map))
    }

    /// Style to initialise the map with.
    #[must_use]
    pub fn map_style(&self) -> &'static MapStyle {
        self.preferences.current()
    }

    /// Persist a new style and notify subscribers.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown ids or storage failures.
    pub fn select_map_style(
        &self,
        id: &str,
    ) -> Result<&'static MapStyle, PreferenceError<S::Error>> {
        self.preferences.select(id)
    }

    #[must_use]
    pub const fn preferences(&self) -> &StylePreferences<S> {
        &self.preferences
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, thiserror::Error)]
    #[error("offline")]
    struct Offline;

    struct FailingSource;

    impl ChallengeSource for FailingSource {
        type Error = Offline;

        fn load_challenges(&self) -> Result<ChallengeCatalog, Self::Error> {
            Err(Offline)
        }
    }

    fn fixture_catalog() -> ChallengeCatalog {
        ChallengeCatalog::new(vec![Challenge::new(
            "2",
            LngLat::new(-0.4827, 51.3243),
            "Historic Fountain",
            "Find the hidden message near the fountain",
            ChallengeKind::Location,
            150,
        )])
        .unwrap()
    }

    #[test]
    fn engine_creates_sessions_from_source() {
        let engine = CrumbsEngine::new(fixture_catalog(), MemoryPreferences::new());
        let session = engine.create_session(RecordingMap::new()).unwrap();
        assert_eq!(session.catalog().len(), 1);
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn engine_surfaces_source_errors() {
        let engine = CrumbsEngine::new(FailingSource, MemoryPreferences::new());
        let err = engine.create_session(RecordingMap::new()).unwrap_err();
        assert_eq!(err.to_string(), "offline");
    }

    #[test]
    fn style_changes_reach_a_subscribed_map() {
        let channel = PreferenceChannel::new();
        let engine = CrumbsEngine::with_channel(
            fixture_catalog(),
            MemoryPreferences::new(),
            channel.clone(),
        );
        assert_eq!(engine.map_style().id, DEFAULT_MAP_STYLE);

        let map = Rc::new(RefCell::new(RecordingMap::new()));
        let _sub = {
            let map = Rc::clone(&map);
            channel.subscribe(move |change| {
                let PreferenceChange::MapStyle(style) = change;
                map.borrow_mut().set_style(style);
            })
        };

        engine.select_map_style("light").unwrap();
        assert_eq!(engine.map_style().id, "light");
        assert_eq!(map.borrow().calls(), vec![MapCall::SetStyle("light")]);
    }
}
