//! Seam between the session controller and whatever draws the map.
//!
//! The controller only ever calls [`MapAdapter::show_route`] and
//! [`MapAdapter::clear_route`]; the view layer drives the rest of the trait.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::challenge::{Challenge, ChallengeId};
use crate::geo::{LngLat, LngLatBounds};
use crate::prefs::MapStyle;

/// Invoked with the id of the marker the user tapped.
pub type SelectHandler = Rc<dyn Fn(ChallengeId)>;

/// Invoked for every geolocation fix while a watch is alive.
pub type PositionHandler = Box<dyn FnMut(LngLat)>;

/// Marks one route request. A ticket stops being current as soon as a newer
/// request is issued or the route is cleared, so late directions responses can
/// be dropped instead of drawn.
#[derive(Clone)]
pub struct RouteTicket {
    generation: u64,
    latest: Rc<Cell<u64>>,
}

impl RouteTicket {
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_current(&self) -> bool {
        self.latest.get() == self.generation
    }
}

impl PartialEq for RouteTicket {
    fn eq(&self, other: &Self) -> bool {
        self.generation == other.generation && Rc::ptr_eq(&self.latest, &other.latest)
    }
}

impl fmt::Debug for RouteTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTicket")
            .field("generation", &self.generation)
            .field("current", &self.is_current())
            .finish()
    }
}

/// Issues route tickets for one session.
#[derive(Debug, Clone, Default)]
pub(crate) struct RouteGenerations {
    latest: Rc<Cell<u64>>,
}

impl RouteGenerations {
    pub(crate) fn issue(&self) -> RouteTicket {
        let generation = self.latest.get().wrapping_add(1);
        self.latest.set(generation);
        RouteTicket {
            generation,
            latest: Rc::clone(&self.latest),
        }
    }

    pub(crate) fn invalidate(&self) {
        self.latest.set(self.latest.get().wrapping_add(1));
    }
}

/// Walking route wanted between the user and a destination.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub from: LngLat,
    pub to: LngLat,
    pub ticket: RouteTicket,
}

impl RouteRequest {
    /// Box framing both endpoints.
    #[must_use]
    pub fn bounds(&self) -> LngLatBounds {
        LngLatBounds::from_point(self.from).extend(self.to)
    }
}

/// Keeps a geolocation subscription alive; dropping it unsubscribes.
pub struct PositionWatch {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl PositionWatch {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A watch with nothing to unsubscribe, for adapters without geolocation.
    #[must_use]
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for PositionWatch {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for PositionWatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionWatch")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Rendering backend for challenges, the user marker and the route overlay.
pub trait MapAdapter {
    /// Replace every challenge marker. Stale markers are removed first.
    fn render_markers(&mut self, challenges: &[Challenge], on_select: SelectHandler);

    /// Start following the user's position. Dropping the watch stops updates;
    /// the last drawn position stays on the map.
    fn track_user_position(&mut self, on_update: PositionHandler) -> PositionWatch;

    /// Fetch and draw a route. Implementations must check
    /// [`RouteTicket::is_current`] before drawing an asynchronous result.
    fn show_route(&mut self, request: RouteRequest);

    /// Remove any displayed route. Harmless when none is shown.
    fn clear_route(&mut self);

    fn set_style(&mut self, style: &MapStyle);
}

/// Call observed by [`RecordingMap`].
#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
    RenderMarkers(Vec<ChallengeId>),
    TrackUserPosition,
    ShowRoute(RouteRequest),
    ClearRoute,
    SetStyle(&'static str),
}

/// In-memory adapter that records calls and lets tests play the user's role
/// (tapping markers, moving around). Clones share the same recording.
#[derive(Clone, Default)]
pub struct RecordingMap {
    calls: Rc<RefCell<Vec<MapCall>>>,
    on_select: Rc<RefCell<Option<SelectHandler>>>,
    watchers: Rc<RefCell<BTreeMap<u64, PositionHandler>>>,
    next_watch: Rc<Cell<u64>>,
    user_position: Rc<Cell<Option<LngLat>>>,
}

impl RecordingMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> Vec<MapCall> {
        self.calls.borrow().clone()
    }

    #[must_use]
    pub fn route_requests(&self) -> Vec<RouteRequest> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                MapCall::ShowRoute(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn clear_route_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, MapCall::ClearRoute))
            .count()
    }

    pub fn reset(&self) {
        self.calls.borrow_mut().clear();
    }

    #[must_use]
    pub fn active_watches(&self) -> usize {
        self.watchers.borrow().len()
    }

    /// Where the user marker is drawn, if a fix was ever delivered.
    #[must_use]
    pub fn user_position(&self) -> Option<LngLat> {
        self.user_position.get()
    }

    /// Simulate a marker tap. Returns false when no markers were rendered.
    pub fn tap_marker(&self, id: &ChallengeId) -> bool {
        let handler = self.on_select.borrow().clone();
        handler.is_some_and(|on_select| {
            on_select(id.clone());
            true
        })
    }

    /// Deliver a position fix to every live watch, returning how many saw it.
    pub fn emit_position(&self, position: LngLat) -> usize {
        let ids: Vec<u64> = self.watchers.borrow().keys().copied().collect();
        let mut delivered = 0;
        for id in ids {
            // Take the handler out while it runs so it may touch this map again.
            let handler = self.watchers.borrow_mut().remove(&id);
            if let Some(mut handler) = handler {
                handler(position);
                delivered += 1;
                self.watchers.borrow_mut().insert(id, handler);
            }
        }
        delivered
    }

    fn record(&self, call: MapCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl MapAdapter for RecordingMap {
    fn render_markers(&mut self, challenges: &[Challenge], on_select: SelectHandler) {
        self.record(MapCall::RenderMarkers(
            challenges.iter().map(|c| c.id.clone()).collect(),
        ));
        *self.on_select.borrow_mut() = Some(on_select);
    }

    fn track_user_position(&mut self, mut on_update: PositionHandler) -> PositionWatch {
        self.record(MapCall::TrackUserPosition);
        let id = self.next_watch.get();
        self.next_watch.set(id + 1);
        let shown = Rc::clone(&self.user_position);
        self.watchers.borrow_mut().insert(
            id,
            Box::new(move |fix| {
                shown.set(Some(fix));
                on_update(fix);
            }),
        );
        let watchers = Rc::downgrade(&self.watchers);
        PositionWatch::new(move || {
            if let Some(watchers) = watchers.upgrade() {
                watchers.borrow_mut().remove(&id);
            }
        })
    }

    fn show_route(&mut self, request: RouteRequest) {
        self.record(MapCall::ShowRoute(request));
    }

    fn clear_route(&mut self) {
        self.record(MapCall::ClearRoute);
    }

    fn set_style(&mut self, style: &MapStyle) {
        self.record(MapCall::SetStyle(style.id));
    }
}

impl fmt::Debug for RecordingMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingMap")
            .field("calls", &self.calls.borrow().len())
            .field("watches", &self.active_watches())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::ChallengeKind;

    #[test]
    fn newer_ticket_supersedes_older_one() {
        let generations = RouteGenerations::default();
        let first = generations.issue();
        assert!(first.is_current());
        let second = generations.issue();
        assert!(!first.is_current());
        assert!(second.is_current());
        generations.invalidate();
        assert!(!second.is_current());
        assert!(second.generation() > first.generation());
    }

    #[test]
    fn dropping_watch_unsubscribes() {
        let mut map = RecordingMap::new();
        let seen = Rc::new(Cell::new(0));
        let watch = {
            let seen = Rc::clone(&seen);
            map.track_user_position(Box::new(move |_| seen.set(seen.get() + 1)))
        };
        assert!(watch.is_active());
        assert_eq!(map.emit_position(LngLat::new(0.0, 0.0)), 1);
        drop(watch);
        assert_eq!(map.active_watches(), 0);
        assert_eq!(map.emit_position(LngLat::new(0.0, 0.0)), 0);
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn user_marker_outlives_the_watch() {
        let mut map = RecordingMap::new();
        assert_eq!(map.user_position(), None);
        let watch = map.track_user_position(Box::new(|_| {}));
        let fix = LngLat::new(-0.4809, 51.3229);
        map.emit_position(fix);
        drop(watch);
        assert_eq!(map.active_watches(), 0);
        assert_eq!(map.user_position(), Some(fix));
    }

    #[test]
    fn explicit_cancel_runs_once() {
        let hits = Rc::new(Cell::new(0));
        let watch = {
            let hits = Rc::clone(&hits);
            PositionWatch::new(move || hits.set(hits.get() + 1))
        };
        watch.cancel();
        assert_eq!(hits.get(), 1);
        assert!(!PositionWatch::detached().is_active());
    }

    #[test]
    fn marker_taps_reach_the_select_handler() {
        let mut map = RecordingMap::new();
        assert!(!map.tap_marker(&ChallengeId::from("2")));

        let tapped = Rc::new(RefCell::new(None));
        let challenge = Challenge::new(
            "2",
            LngLat::new(1.0, 2.0),
            "Historic Fountain",
            "",
            ChallengeKind::Location,
            150,
        );
        let on_select: SelectHandler = {
            let tapped = Rc::clone(&tapped);
            Rc::new(move |id| *tapped.borrow_mut() = Some(id))
        };
        map.render_markers(std::slice::from_ref(&challenge), on_select);

        assert!(map.tap_marker(&challenge.id));
        assert_eq!(tapped.borrow().as_ref(), Some(&challenge.id));
        assert_eq!(
            map.calls(),
            vec![MapCall::RenderMarkers(vec![challenge.id.clone()])]
        );
    }
}
