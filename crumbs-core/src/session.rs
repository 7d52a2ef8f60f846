//! Challenge session controller.
//!
//! Owns which challenge is selected or active and tells the map adapter when a
//! route must be drawn or removed. All transitions are synchronous; the only
//! asynchronous work (fetching directions) happens behind
//! [`MapAdapter::show_route`] and is fenced with [`RouteTicket`]s.

use log::debug;
use thiserror::Error;

use crate::challenge::{Challenge, ChallengeCatalog, ChallengeId, ChallengeKind};
use crate::geo::LngLat;
use crate::map::{MapAdapter, RouteGenerations, RouteRequest, RouteTicket};

/// Distance from the destination at which a location challenge counts as reached.
pub const ARRIVAL_RADIUS_KM: f64 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Selected,
    Active,
}

/// A location challenge reached by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub challenge: Challenge,
    pub points: u32,
}

/// Accepted state change.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Selected(Challenge),
    Dismissed,
    /// A photo challenge was started; the caller should open the capture surface.
    CaptureRequested(Challenge),
    /// A location challenge became active. `route` is `None` while the user's
    /// position is still unknown; the first fix will request it.
    Activated {
        challenge: Challenge,
        route: Option<RouteTicket>,
    },
    Cancelled(Challenge),
    Arrived(Completion),
    NearbyPanelToggled(bool),
}

/// Why a transition was refused. Refusals never change selection or activation
/// and never reach the map adapter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("another challenge is active")]
    ActiveChallengeLocked,
    #[error("no challenge is selected")]
    NothingSelected,
    #[error("no challenge is active")]
    NoActiveChallenge,
    #[error("unknown challenge '{0}'")]
    UnknownChallenge(ChallengeId),
    #[error("user position is unknown")]
    PositionUnknown,
    #[error("destination is still {remaining_km:.3} km away")]
    NotArrived { remaining_km: f64 },
}

pub type TransitionResult = Result<Transition, Rejection>;

/// Per-view session state: selection, activation and the nearby panel.
#[derive(Debug, Clone)]
pub struct ChallengeSession<M> {
    catalog: ChallengeCatalog,
    map: M,
    selected: Option<Challenge>,
    active: Option<Challenge>,
    show_nearby_panel: bool,
    position: Option<LngLat>,
    routes: RouteGenerations,
    completions: Vec<Completion>,
}

impl<M: MapAdapter> ChallengeSession<M> {
    pub fn new(catalog: ChallengeCatalog, map: M) -> Self {
        Self {
            catalog,
            map,
            selected: None,
            active: None,
            show_nearby_panel: false,
            position: None,
            routes: RouteGenerations::default(),
            completions: Vec::new(),
        }
    }

    /// Mark `challenge` as selected, replacing any previous selection.
    ///
    /// # Errors
    ///
    /// [`Rejection::ActiveChallengeLocked`] while a challenge is active.
    pub fn select_challenge(&mut self, challenge: Challenge) -> TransitionResult {
        if self.active.is_some() {
            return reject(Rejection::ActiveChallengeLocked);
        }
        debug!("selected challenge {} ({})", challenge.id, challenge.title);
        self.selected = Some(challenge.clone());
        Ok(Transition::Selected(challenge))
    }

    /// Select a challenge from the session catalog by id.
    ///
    /// # Errors
    ///
    /// [`Rejection::UnknownChallenge`] for ids outside the catalog, otherwise as
    /// [`Self::select_challenge`].
    pub fn select_by_id(&mut self, id: &ChallengeId) -> TransitionResult {
        if self.active.is_some() {
            return reject(Rejection::ActiveChallengeLocked);
        }
        let Some(challenge) = self.catalog.get(id).cloned() else {
            return reject(Rejection::UnknownChallenge(id.clone()));
        };
        self.select_challenge(challenge)
    }

    /// Start the selected challenge. Photo challenges clear the selection and
    /// hand off to capture; location challenges become active and request a route.
    ///
    /// # Errors
    ///
    /// [`Rejection::ActiveChallengeLocked`] while a challenge is active,
    /// [`Rejection::NothingSelected`] when nothing is selected.
    pub fn confirm_start(&mut self) -> TransitionResult {
        if self.active.is_some() {
            return reject(Rejection::ActiveChallengeLocked);
        }
        let Some(challenge) = self.selected.take() else {
            return reject(Rejection::NothingSelected);
        };

        match challenge.kind {
            ChallengeKind::Photo => {
                debug!("handing challenge {} to capture", challenge.id);
                Ok(Transition::CaptureRequested(challenge))
            }
            ChallengeKind::Location => {
                self.show_nearby_panel = false;
                let route = self.request_route(challenge.coordinates);
                debug!(
                    "activated challenge {} (route requested: {})",
                    challenge.id,
                    route.is_some()
                );
                self.active = Some(challenge.clone());
                Ok(Transition::Activated { challenge, route })
            }
        }
    }

    /// Abandon the active challenge and remove its route. The nearby panel is
    /// opened even when nothing was active.
    ///
    /// # Errors
    ///
    /// [`Rejection::NoActiveChallenge`] when nothing is active; no route
    /// removal is issued in that case.
    pub fn cancel_active(&mut self) -> TransitionResult {
        self.show_nearby_panel = true;
        let Some(challenge) = self.active.take() else {
            return reject(Rejection::NoActiveChallenge);
        };
        self.drop_route();
        debug!("cancelled challenge {}", challenge.id);
        Ok(Transition::Cancelled(challenge))
    }

    /// Clear the selection without side effects.
    ///
    /// # Errors
    ///
    /// [`Rejection::NothingSelected`] when nothing is selected.
    pub fn dismiss_selected(&mut self) -> TransitionResult {
        if self.selected.take().is_none() {
            return reject(Rejection::NothingSelected);
        }
        debug!("dismissed selection");
        Ok(Transition::Dismissed)
    }

    /// Flip the nearby panel. Always permitted.
    pub fn toggle_nearby_panel(&mut self) -> Transition {
        self.show_nearby_panel = !self.show_nearby_panel;
        Transition::NearbyPanelToggled(self.show_nearby_panel)
    }

    /// Record a geolocation fix. While a challenge is active the route is
    /// re-requested from the new position, superseding any in-flight request.
    pub fn update_position(&mut self, position: LngLat) -> Option<RouteTicket> {
        if !position.is_valid() {
            log::warn!("ignoring invalid position {position}");
            return None;
        }
        self.position = Some(position);
        let destination = self.active.as_ref()?.coordinates;
        self.request_route(destination)
    }

    /// Complete the active location challenge once the user is within
    /// [`ARRIVAL_RADIUS_KM`] of it.
    ///
    /// # Errors
    ///
    /// [`Rejection::NoActiveChallenge`], [`Rejection::PositionUnknown`] or
    /// [`Rejection::NotArrived`] with the remaining distance.
    pub fn arrive(&mut self) -> TransitionResult {
        let Some(active) = self.active.as_ref() else {
            return reject(Rejection::NoActiveChallenge);
        };
        let Some(position) = self.position else {
            return reject(Rejection::PositionUnknown);
        };
        let remaining_km = position.distance_km(active.coordinates);
        if remaining_km > ARRIVAL_RADIUS_KM {
            return reject(Rejection::NotArrived { remaining_km });
        }

        let Some(challenge) = self.active.take() else {
            return reject(Rejection::NoActiveChallenge);
        };
        self.drop_route();
        self.show_nearby_panel = true;
        let completion = Completion {
            points: challenge.points,
            challenge,
        };
        debug!(
            "arrived at {} for {} points",
            completion.challenge.id, completion.points
        );
        self.completions.push(completion.clone());
        Ok(Transition::Arrived(completion))
    }

    fn request_route(&mut self, to: LngLat) -> Option<RouteTicket> {
        let from = self.position?;
        let ticket = self.routes.issue();
        self.map.show_route(RouteRequest {
            from,
            to,
            ticket: ticket.clone(),
        });
        Some(ticket)
    }

    fn drop_route(&mut self) {
        self.routes.invalidate();
        self.map.clear_route();
    }
}

impl<M> ChallengeSession<M> {
    #[must_use]
    pub const fn selected(&self) -> Option<&Challenge> {
        self.selected.as_ref()
    }

    #[must_use]
    pub const fn active(&self) -> Option<&Challenge> {
        self.active.as_ref()
    }

    #[must_use]
    pub const fn show_nearby_panel(&self) -> bool {
        self.show_nearby_panel
    }

    #[must_use]
    pub const fn position(&self) -> Option<LngLat> {
        self.position
    }

    #[must_use]
    pub const fn catalog(&self) -> &ChallengeCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        if self.active.is_some() {
            SessionPhase::Active
        } else if self.selected.is_some() {
            SessionPhase::Selected
        } else {
            SessionPhase::Idle
        }
    }

    /// Challenges closest first, by live position when known.
    #[must_use]
    pub fn nearby(&self) -> Vec<&Challenge> {
        self.catalog.sorted_by_distance(self.position)
    }

    /// Geolocation is needed while navigating, or until a first fix arrived.
    #[must_use]
    pub const fn needs_position_tracking(&self) -> bool {
        self.active.is_some() || self.position.is_none()
    }

    #[must_use]
    pub fn completions(&self) -> &[Completion] {
        &self.completions
    }

    /// Points earned from completed challenges in this session.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.completions
            .iter()
            .fold(0_u32, |acc, c| acc.saturating_add(c.points))
    }

    #[must_use]
    pub const fn map(&self) -> &M {
        &self.map
    }

    pub const fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    #[must_use]
    pub fn into_map(self) -> M {
        self.map
    }
}

fn reject(rejection: Rejection) -> TransitionResult {
    debug!("transition rejected: {rejection}");
    Err(rejection)
}
