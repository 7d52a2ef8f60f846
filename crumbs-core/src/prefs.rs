//! Map-style preference and the in-process change channel.
//!
//! The settings view writes the chosen style through [`StylePreferences`],
//! which persists it and notifies every [`PreferenceChannel`] subscriber (the
//! map view) within the same process.

use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::rc::{Rc, Weak};
use thiserror::Error;

/// Storage key holding the selected style id.
pub const MAP_STYLE_KEY: &str = "crumbs.map_style";

/// Style used when nothing (or something unknown) is stored.
pub const DEFAULT_MAP_STYLE: &str = "dark";

/// A selectable basemap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapStyle {
    pub id: &'static str,
    pub name: &'static str,
    pub url: &'static str,
    /// CSS class painting the preview swatch in the settings grid.
    pub preview: &'static str,
}

pub const MAP_STYLES: [MapStyle; 5] = [
    MapStyle {
        id: "dark",
        name: "Dark",
        url: "mapbox://styles/mapbox/dark-v11",
        preview: "bg-gray-900",
    },
    MapStyle {
        id: "light",
        name: "Light",
        url: "mapbox://styles/mapbox/light-v11",
        preview: "bg-gray-100",
    },
    MapStyle {
        id: "streets",
        name: "Streets",
        url: "mapbox://styles/mapbox/streets-v12",
        preview: "bg-blue-200",
    },
    MapStyle {
        id: "outdoors",
        name: "Outdoors",
        url: "mapbox://styles/mapbox/outdoors-v12",
        preview: "bg-green-200",
    },
    MapStyle {
        id: "satellite",
        name: "Satellite",
        url: "mapbox://styles/mapbox/satellite-streets-v12",
        preview: "bg-emerald-900",
    },
];

impl MapStyle {
    #[must_use]
    pub fn find(id: &str) -> Option<&'static Self> {
        MAP_STYLES.iter().find(|style| style.id == id)
    }

    #[must_use]
    pub fn default_style() -> &'static Self {
        &MAP_STYLES[0]
    }

    /// Resolve a stored id, falling back to the default for missing or unknown ids.
    #[must_use]
    pub fn resolve(id: Option<&str>) -> &'static Self {
        id.and_then(Self::find).unwrap_or_else(Self::default_style)
    }
}

/// Key-value persistence for user preferences.
pub trait PreferenceStore {
    type Error: std::error::Error + 'static;

    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects the write.
    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// Process-local store, used by tests and non-browser hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    type Error = Infallible;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum PreferenceError<E: std::error::Error + 'static> {
    #[error("unknown map style '{0}'")]
    UnknownStyle(String),
    #[error("preference store failed: {0}")]
    Store(#[source] E),
}

/// Notification published when a preference changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceChange {
    MapStyle(&'static MapStyle),
}

type Listener = Rc<dyn Fn(&PreferenceChange)>;

#[derive(Default)]
struct ChannelInner {
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

/// Publish/subscribe channel scoped to the process. Clones share subscribers.
#[derive(Clone, Default)]
pub struct PreferenceChannel {
    inner: Rc<RefCell<ChannelInner>>,
}

impl PreferenceChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener until the returned [`Subscription`] is dropped.
    pub fn subscribe(&self, listener: impl Fn(&PreferenceChange) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.insert(id, Rc::new(listener));
        Subscription {
            id,
            channel: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver `change` to every current subscriber and return how many got it.
    pub fn publish(&self, change: PreferenceChange) -> usize {
        // Snapshot first so listeners can subscribe or unsubscribe re-entrantly.
        let listeners: Vec<Listener> = self.inner.borrow().listeners.values().cloned().collect();
        for listener in &listeners {
            listener(&change);
        }
        log::debug!("published {change:?} to {} subscriber(s)", listeners.len());
        listeners.len()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl PartialEq for PreferenceChannel {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for PreferenceChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceChannel")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Live registration on a [`PreferenceChannel`].
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    channel: Weak<RefCell<ChannelInner>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.channel.upgrade() {
            inner.borrow_mut().listeners.remove(&self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Persisted map style plus change notification.
#[derive(Debug, Clone)]
pub struct StylePreferences<S> {
    store: S,
    channel: PreferenceChannel,
}

impl<S: PreferenceStore> StylePreferences<S> {
    pub fn new(store: S) -> Self {
        Self::with_channel(store, PreferenceChannel::new())
    }

    pub const fn with_channel(store: S, channel: PreferenceChannel) -> Self {
        Self { store, channel }
    }

    #[must_use]
    pub const fn channel(&self) -> &PreferenceChannel {
        &self.channel
    }

    /// Currently stored style. Read failures are logged and yield the default.
    #[must_use]
    pub fn current(&self) -> &'static MapStyle {
        match self.store.read(MAP_STYLE_KEY) {
            Ok(stored) => MapStyle::resolve(stored.as_deref()),
            Err(err) => {
                log::warn!("could not read map style preference: {err}");
                MapStyle::default_style()
            }
        }
    }

    /// Persist a style and notify subscribers.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown style ids or when the store rejects the write.
    pub fn select(&self, id: &str) -> Result<&'static MapStyle, PreferenceError<S::Error>> {
        let style =
            MapStyle::find(id).ok_or_else(|| PreferenceError::UnknownStyle(id.to_string()))?;
        self.store
            .write(MAP_STYLE_KEY, style.id)
            .map_err(PreferenceError::Store)?;
        self.channel.publish(PreferenceChange::MapStyle(style));
        Ok(style)
    }
}
