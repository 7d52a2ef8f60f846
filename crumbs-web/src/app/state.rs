use std::rc::Rc;

use crumbs_core::{
    Challenge, ChallengeCatalog, ChallengeId, ChallengeSession, CrumbsEngine, LngLat, MapStyle,
    PreferenceChannel, Transition, TransitionResult,
};
use yew::prelude::*;

use crate::components::nearby_panel::NearbyEntry;
use crate::data::StaticChallenges;
use crate::map_handle::MapHandle;
use crate::storage::BrowserPreferences;

pub type WebEngine = CrumbsEngine<StaticChallenges, BrowserPreferences>;

/// User intents forwarded to the session controller.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    Select(ChallengeId),
    Confirm,
    Cancel,
    Dismiss,
    ToggleNearby,
    Position(LngLat),
}

/// Session controller plus the outcome of the last user action.
#[derive(Debug, Clone)]
pub struct SessionStore {
    session: ChallengeSession<MapHandle>,
    last: Option<TransitionResult>,
}

impl SessionStore {
    /// Start a session from the engine's challenge source. A broken source is
    /// logged and yields an empty session so the map still renders.
    pub fn start(engine: &WebEngine, map: MapHandle) -> Self {
        let session = engine.create_session(map.clone()).unwrap_or_else(|err| {
            log::error!("bundled challenge data is invalid: {err}");
            ChallengeSession::new(ChallengeCatalog::empty(), map)
        });
        Self {
            session,
            last: None,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &ChallengeSession<MapHandle> {
        &self.session
    }

    #[must_use]
    pub const fn last(&self) -> Option<&TransitionResult> {
        self.last.as_ref()
    }

    /// Banner text for the last accepted transition worth announcing. An
    /// arrival notice lasts until the next action or position fix.
    #[must_use]
    pub fn notice(&self) -> Option<String> {
        match self.last.as_ref()? {
            Ok(Transition::Arrived(done)) => Some(format!(
                "{} complete! +{} pts",
                done.challenge.title, done.points
            )),
            _ => None,
        }
    }

    /// Nearby challenges with their live distance, closest first.
    #[must_use]
    pub fn nearby_entries(&self) -> Vec<NearbyEntry> {
        let position = self.session.position();
        self.session
            .nearby()
            .into_iter()
            .map(|challenge| NearbyEntry {
                distance_km: challenge.distance_from(position),
                challenge: challenge.clone(),
            })
            .collect()
    }

    pub fn apply(&mut self, action: SessionAction) {
        let result = match action {
            SessionAction::Select(id) => self.session.select_by_id(&id),
            SessionAction::Confirm => self.session.confirm_start(),
            SessionAction::Cancel => self.session.cancel_active(),
            SessionAction::Dismiss => self.session.dismiss_selected(),
            SessionAction::ToggleNearby => Ok(self.session.toggle_nearby_panel()),
            SessionAction::Position(fix) => {
                self.session.update_position(fix);
                if self.session.active().is_some()
                    && let Ok(arrived) = self.session.arrive()
                {
                    self.last = Some(Ok(arrived));
                } else if matches!(self.last, Some(Ok(Transition::Arrived(_)))) {
                    self.last = None;
                }
                return;
            }
        };
        self.last = Some(result);
    }
}

impl Reducible for SessionStore {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = Rc::unwrap_or_clone(self);
        next.apply(action);
        Rc::new(next)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Rc<WebEngine>,
    pub map: MapHandle,
    pub session: UseReducerHandle<SessionStore>,
    pub map_style: UseStateHandle<&'static MapStyle>,
    /// Photo challenge handed to the camera screen.
    pub capture_target: UseStateHandle<Option<Challenge>>,
}

#[hook]
pub fn use_app_state() -> AppState {
    let engine = use_memo((), |()| WebEngine::new(StaticChallenges, BrowserPreferences));
    let map = (*use_memo((), |()| MapHandle::new())).clone();
    let session = {
        let engine = Rc::clone(&engine);
        let map = map.clone();
        use_reducer(move || SessionStore::start(&engine, map))
    };
    let map_style = {
        let engine = Rc::clone(&engine);
        use_state(move || engine.map_style())
    };
    AppState {
        engine,
        map,
        session,
        map_style,
        capture_target: use_state(|| None::<Challenge>),
    }
}

impl AppState {
    #[must_use]
    pub fn channel(&self) -> PreferenceChannel {
        self.engine.preferences().channel().clone()
    }

    /// Persist and broadcast a new map style.
    pub fn select_map_style(&self, id: &str) {
        match self.engine.select_map_style(id) {
            Ok(style) => self.map_style.set(style),
            Err(err) => log::error!("could not change map style: {err}"),
        }
    }
}
