//! Shared slot for whichever map is currently mounted.
//!
//! The session lives for the whole app while the map view mounts and unmounts
//! with the route, so the session talks to a [`MapHandle`] and the view
//! attaches its adapter on mount. Calls made while nothing is attached are
//! dropped; the view re-renders markers and restarts tracking when it mounts.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crumbs_core::{
    Challenge, MapAdapter, MapStyle, PositionHandler, PositionWatch, RouteRequest, SelectHandler,
};

#[derive(Clone, Default)]
pub struct MapHandle {
    inner: Rc<RefCell<Option<Box<dyn MapAdapter>>>>,
}

impl MapHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `adapter`, replacing (and dropping) any previous one.
    pub fn attach(&self, adapter: impl MapAdapter + 'static) {
        self.inner.borrow_mut().replace(Box::new(adapter));
    }

    /// Drop the mounted adapter. Returns whether one was attached.
    pub fn detach(&self) -> bool {
        let previous = self.inner.borrow_mut().take();
        previous.is_some()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.inner.borrow().is_some()
    }

    fn with_adapter(&self, what: &str, f: impl FnOnce(&mut dyn MapAdapter)) {
        match self.inner.borrow_mut().as_mut() {
            Some(adapter) => f(adapter.as_mut()),
            None => log::debug!("no map mounted; skipped {what}"),
        }
    }
}

impl MapAdapter for MapHandle {
    fn render_markers(&mut self, challenges: &[Challenge], on_select: SelectHandler) {
        self.with_adapter("markers", |map| map.render_markers(challenges, on_select));
    }

    fn track_user_position(&mut self, on_update: PositionHandler) -> PositionWatch {
        let mut watch = None;
        self.with_adapter("position tracking", |map| {
            watch = Some(map.track_user_position(on_update));
        });
        watch.unwrap_or_else(PositionWatch::detached)
    }

    fn show_route(&mut self, request: RouteRequest) {
        self.with_adapter("route", |map| map.show_route(request));
    }

    fn clear_route(&mut self) {
        self.with_adapter("route removal", |map| map.clear_route());
    }

    fn set_style(&mut self, style: &MapStyle) {
        self.with_adapter("style change", |map| map.set_style(style));
    }
}

impl PartialEq for MapHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for MapHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}
