use yew_router::prelude::*;

#[derive(Clone, Copy, Debug, Routable, PartialEq, Eq)]
pub enum Route {
    #[at("/")]
    Map,
    #[at("/camera")]
    Camera,
    #[at("/settings")]
    Settings,
    #[at("/404")]
    #[not_found]
    NotFound,
}

impl Route {
    /// Tabs shown in the bottom navigation, in order.
    pub const TABS: [Self; 3] = [Self::Map, Self::Camera, Self::Settings];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Map => "Map",
            Self::Camera => "Camera",
            Self::Settings => "Settings",
            Self::NotFound => "Not found",
        }
    }

    /// Full-screen routes hide the bottom navigation.
    #[must_use]
    pub const fn is_fullscreen(self) -> bool {
        matches!(self, Self::Camera)
    }
}

#[cfg(test)]
mod tests {
    use super::Route;
    use yew_router::Routable;

    #[test]
    fn paths_round_trip() {
        for route in Route::TABS {
            assert_eq!(Route::recognize(&route.to_path()), Some(route));
        }
        assert_eq!(Route::recognize("/nowhere"), Some(Route::NotFound));
    }

    #[test]
    fn only_camera_is_fullscreen() {
        assert!(Route::Camera.is_fullscreen());
        assert!(!Route::Map.is_fullscreen());
        assert!(!Route::Settings.is_fullscreen());
    }
}
