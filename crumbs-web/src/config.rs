//! Build-time configuration.
//!
//! Everything here is read with `option_env!` so a static deploy needs no
//! runtime config file: `PUBLIC_URL` sets the base path (e.g. `/crumbs` on
//! GitHub Pages), `CRUMBS_MAPBOX_TOKEN` the map access token and
//! `CRUMBS_LOG` the console log level.

use crumbs_core::{LngLat, TravelProfile};
use log::LevelFilter;

/// Where the map opens before the first position fix.
pub const DEFAULT_CENTER: LngLat = LngLat::new(-0.481_747_846_041_145, 51.323_337_965_023_2);
pub const DEFAULT_ZOOM: f64 = 15.0;
/// Padding around a route when fitting the camera to it.
pub const ROUTE_PADDING_PX: u32 = 50;
pub const ROUTE_PROFILE: TravelProfile = TravelProfile::Walking;

/// Mapbox access token, if one was provided at build time.
#[must_use]
pub fn mapbox_token() -> Option<&'static str> {
    token_from(option_env!("CRUMBS_MAPBOX_TOKEN"))
}

/// Console log level; defaults to `info`.
#[must_use]
pub fn log_level() -> LevelFilter {
    level_from(option_env!("CRUMBS_LOG"))
}

/// Base path for the router, or `None` when served from the root.
#[must_use]
pub fn router_base() -> Option<String> {
    router_base_with_base(option_env!("PUBLIC_URL").unwrap_or(""))
}

fn token_from(raw: Option<&'static str>) -> Option<&'static str> {
    raw.map(str::trim).filter(|token| !token.is_empty())
}

fn level_from(raw: Option<&str>) -> LevelFilter {
    raw.and_then(|level| level.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

fn router_base_with_base(base: &str) -> Option<String> {
    let base = base.trim_end_matches('/').trim();
    if base.is_empty() {
        None
    } else {
        Some(base.to_string())
    }
}
