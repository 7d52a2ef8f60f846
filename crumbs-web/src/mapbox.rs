//! Mapbox GL JS bindings and the browser [`MapAdapter`].
//!
//! Expects `mapbox-gl.js` to be loaded by the host page (see `index.html`).

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crumbs_core::{
    Challenge, ChallengeId, ChallengeKind, DirectionsError, LngLat, LngLatBounds, MapAdapter,
    MapStyle, PositionHandler, PositionWatch, RoutePath, RouteRequest, SelectHandler,
    directions_url, parse_directions,
};
use js_sys::Reflect;
use serde_json::json;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{GeolocationPosition, GeolocationPositionError, HtmlElement};

use crate::config;
use crate::dom::{self, FetchError};

const ROUTE_ID: &str = "route";
const ROUTE_COLOR: &str = "#3b82f6";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Map)]
    #[derive(Debug, Clone)]
    pub type GlMap;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Map")]
    pub fn new(options: &JsValue) -> GlMap;

    #[wasm_bindgen(method, js_name = setStyle)]
    pub fn set_style(this: &GlMap, url: &str);

    #[wasm_bindgen(method, js_name = getSource)]
    pub fn get_source(this: &GlMap, id: &str) -> Option<GeoJsonSource>;

    #[wasm_bindgen(method, js_name = getLayer)]
    pub fn get_layer(this: &GlMap, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = addLayer)]
    pub fn add_layer(this: &GlMap, layer: &JsValue);

    #[wasm_bindgen(method, js_name = removeLayer)]
    pub fn remove_layer(this: &GlMap, id: &str);

    #[wasm_bindgen(method, js_name = removeSource)]
    pub fn remove_source(this: &GlMap, id: &str);

    #[wasm_bindgen(method, js_name = fitBounds)]
    pub fn fit_bounds(this: &GlMap, bounds: &JsValue, options: &JsValue);

    #[wasm_bindgen(method)]
    pub fn remove(this: &GlMap);

    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Marker)]
    #[derive(Debug, Clone)]
    pub type GlMarker;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Marker")]
    pub fn new(options: &JsValue) -> GlMarker;

    #[wasm_bindgen(method, js_name = setLngLat)]
    pub fn set_lng_lat(this: &GlMarker, lng_lat: &JsValue) -> GlMarker;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &GlMarker, map: &GlMap) -> GlMarker;

    #[wasm_bindgen(method)]
    pub fn remove(this: &GlMarker);

    #[derive(Debug, Clone)]
    pub type GeoJsonSource;

    #[wasm_bindgen(method, js_name = setData)]
    pub fn set_data(this: &GeoJsonSource, data: &JsValue);
}

fn lng_lat(point: LngLat) -> JsValue {
    let pair = js_sys::Array::new();
    pair.push(&JsValue::from_f64(point.lng));
    pair.push(&JsValue::from_f64(point.lat));
    pair.into()
}

fn bounds_value(bounds: LngLatBounds) -> JsValue {
    let pair = js_sys::Array::new();
    pair.push(&lng_lat(bounds.south_west));
    pair.push(&lng_lat(bounds.north_east));
    pair.into()
}

fn set_access_token(token: &str) -> Result<(), JsValue> {
    let gl = Reflect::get(&js_sys::global(), &JsValue::from_str("mapboxgl"))?;
    if gl.is_undefined() {
        return Err(JsValue::from_str("mapbox-gl.js is not loaded"));
    }
    Reflect::set(&gl, &JsValue::from_str("accessToken"), &JsValue::from_str(token))?;
    Ok(())
}

const fn marker_colour(kind: ChallengeKind) -> &'static str {
    match kind {
        ChallengeKind::Photo => "bg-purple-500",
        ChallengeKind::Location => "bg-green-500",
    }
}

const fn marker_icon(kind: ChallengeKind) -> &'static str {
    match kind {
        ChallengeKind::Photo => {
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="h-5 w-5 text-white" fill="none" viewBox="0 0 24 24" stroke="currentColor"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M3 9a2 2 0 012-2h.93a2 2 0 001.664-.89l.812-1.22A2 2 0 0110.07 4h3.86a2 2 0 011.664.89l.812 1.22A2 2 0 0018.07 7H19a2 2 0 012 2v9a2 2 0 01-2 2H5a2 2 0 01-2-2V9z"/><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M15 13a3 3 0 11-6 0 3 3 0 016 0z"/></svg>"#
        }
        ChallengeKind::Location => {
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="h-5 w-5 text-white" fill="none" viewBox="0 0 24 24" stroke="currentColor"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M17.657 16.657L13.414 20.9a1.998 1.998 0 01-2.827 0l-4.244-4.243a8 8 0 1111.314 0z"/><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M15 11a3 3 0 11-6 0 3 3 0 016 0z"/></svg>"#
        }
    }
}

struct PlacedMarker {
    marker: GlMarker,
    _on_click: Closure<dyn FnMut()>,
}

struct RouteLayer {
    map: GlMap,
}

impl RouteLayer {
    fn draw(&self, path: &RoutePath) -> Result<(), JsValue> {
        if let Some(source) = self.map.get_source(ROUTE_ID) {
            source.set_data(&dom::to_js(&path.to_geojson())?);
        } else {
            let layer = dom::to_js(&json!({
                "id": ROUTE_ID,
                "type": "line",
                "source": { "type": "geojson", "data": path.to_geojson() },
                "layout": { "line-join": "round", "line-cap": "round" },
                "paint": {
                    "line-color": ROUTE_COLOR,
                    "line-width": 4,
                    "line-opacity": 0.75
                }
            }))?;
            self.map.add_layer(&layer);
        }
        if let Some(bounds) = path.bounds() {
            let options = dom::to_js(&json!({ "padding": config::ROUTE_PADDING_PX }))?;
            self.map.fit_bounds(&bounds_value(bounds), &options);
        }
        Ok(())
    }

    fn clear(&self) {
        if !self.map.get_layer(ROUTE_ID).is_undefined() {
            self.map.remove_layer(ROUTE_ID);
        }
        if self.map.get_source(ROUTE_ID).is_some() {
            self.map.remove_source(ROUTE_ID);
        }
    }
}

#[allow(clippy::future_not_send)]
async fn fetch_route(request: &RouteRequest, token: &str) -> Result<RoutePath, DirectionsError> {
    let url = directions_url(config::ROUTE_PROFILE, request.from, request.to, token);
    let body = dom::fetch_text(&url).await.map_err(|err| match err {
        FetchError::Status(status) => DirectionsError::Status(status),
        FetchError::Network(message) => DirectionsError::Request(message),
    })?;
    parse_directions(&body)
}

/// Mapbox GL map bound to a container element.
pub struct MapboxAdapter {
    map: GlMap,
    token: &'static str,
    markers: BTreeMap<ChallengeId, PlacedMarker>,
    user_marker: Rc<RefCell<Option<GlMarker>>>,
}

impl MapboxAdapter {
    /// Create the map inside `container`.
    ///
    /// # Errors
    /// Fails if mapbox-gl.js is missing or rejects the options.
    pub fn mount(
        container: &HtmlElement,
        style: &MapStyle,
        token: &'static str,
    ) -> Result<Self, JsValue> {
        set_access_token(token)?;
        let options = dom::js_object(&[
            ("container", container.clone().into()),
            ("style", JsValue::from_str(style.url)),
            ("center", lng_lat(config::DEFAULT_CENTER)),
            ("zoom", JsValue::from_f64(config::DEFAULT_ZOOM)),
        ])?;
        let map = GlMap::new(&options);
        log::info!("map mounted with style '{}'", style.id);
        Ok(Self {
            map,
            token,
            markers: BTreeMap::new(),
            user_marker: Rc::new(RefCell::new(None)),
        })
    }

    fn route_layer(&self) -> RouteLayer {
        RouteLayer {
            map: self.map.clone(),
        }
    }

    fn place_marker(
        &self,
        challenge: &Challenge,
        on_select: &SelectHandler,
    ) -> Result<PlacedMarker, JsValue> {
        let document = dom::document().ok_or_else(|| JsValue::from_str("document unavailable"))?;
        let element: HtmlElement = document.create_element("div")?.dyn_into()?;
        element.set_class_name(&format!(
            "w-8 h-8 {} rounded-full flex items-center justify-center cursor-pointer shadow-lg",
            marker_colour(challenge.kind)
        ));
        element.set_inner_html(marker_icon(challenge.kind));
        element.set_title(&challenge.title);

        let id = challenge.id.clone();
        let on_select = Rc::clone(on_select);
        let on_click = Closure::<dyn FnMut()>::new(move || on_select(id.clone()));
        element.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;

        let options = dom::js_object(&[("element", element.into())])?;
        let marker = GlMarker::new(&options)
            .set_lng_lat(&lng_lat(challenge.coordinates))
            .add_to(&self.map);
        Ok(PlacedMarker {
            marker,
            _on_click: on_click,
        })
    }

    fn clear_markers(&mut self) {
        for placed in std::mem::take(&mut self.markers).into_values() {
            placed.marker.remove();
        }
    }
}

fn move_user_marker(
    map: &GlMap,
    slot: &RefCell<Option<GlMarker>>,
    fix: LngLat,
) -> Result<(), JsValue> {
    if let Some(marker) = slot.borrow().as_ref() {
        marker.set_lng_lat(&lng_lat(fix));
        return Ok(());
    }
    let document = dom::document().ok_or_else(|| JsValue::from_str("document unavailable"))?;
    let dot: HtmlElement = document.create_element("div")?.dyn_into()?;
    dot.set_class_name("w-4 h-4 bg-blue-500 rounded-full border-2 border-white shadow-lg");
    let options = dom::js_object(&[("element", dot.into())])?;
    let marker = GlMarker::new(&options).set_lng_lat(&lng_lat(fix)).add_to(map);
    slot.replace(Some(marker));
    Ok(())
}

impl MapAdapter for MapboxAdapter {
    fn render_markers(&mut self, challenges: &[Challenge], on_select: SelectHandler) {
        self.clear_markers();
        for challenge in challenges {
            match self.place_marker(challenge, &on_select) {
                Ok(placed) => {
                    self.markers.insert(challenge.id.clone(), placed);
                }
                Err(err) => log::error!(
                    "could not place marker for '{}': {}",
                    challenge.id,
                    dom::js_error_message(&err)
                ),
            }
        }
    }

    fn track_user_position(&mut self, mut on_update: PositionHandler) -> PositionWatch {
        let geolocation = match dom::window()
            .ok_or_else(|| JsValue::from_str("window unavailable"))
            .and_then(|win| win.navigator().geolocation())
        {
            Ok(geolocation) => geolocation,
            Err(err) => {
                log::error!("geolocation unavailable: {}", dom::js_error_message(&err));
                return PositionWatch::detached();
            }
        };

        let map = self.map.clone();
        let user_marker = Rc::clone(&self.user_marker);
        let on_fix = Closure::<dyn FnMut(GeolocationPosition)>::new(
            move |position: GeolocationPosition| {
                let coords = position.coords();
                let fix = LngLat::new(coords.longitude(), coords.latitude());
                if let Err(err) = move_user_marker(&map, &user_marker, fix) {
                    log::warn!("could not draw user marker: {}", dom::js_error_message(&err));
                }
                on_update(fix);
            },
        );
        let on_error = Closure::<dyn FnMut(GeolocationPositionError)>::new(
            |err: GeolocationPositionError| {
                log::error!("error getting location: {}", err.message());
            },
        );

        let watch_id = match geolocation.watch_position_with_error_callback(
            on_fix.as_ref().unchecked_ref(),
            Some(on_error.as_ref().unchecked_ref()),
        ) {
            Ok(id) => id,
            Err(err) => {
                log::error!("could not watch position: {}", dom::js_error_message(&err));
                return PositionWatch::detached();
            }
        };
        log::debug!("watching position (id {watch_id})");

        // The user marker stays at its last fix until the adapter is dropped.
        PositionWatch::new(move || {
            geolocation.clear_watch(watch_id);
            drop((on_fix, on_error));
            log::debug!("stopped watching position (id {watch_id})");
        })
    }

    fn show_route(&mut self, request: RouteRequest) {
        let layer = self.route_layer();
        let token = self.token;
        wasm_bindgen_futures::spawn_local(async move {
            let result = fetch_route(&request, token).await;
            if !request.ticket.is_current() {
                log::debug!("discarding stale route {}", request.ticket.generation());
                return;
            }
            match result {
                Ok(path) => {
                    if let Err(err) = layer.draw(&path) {
                        log::error!("could not draw route: {}", dom::js_error_message(&err));
                    }
                }
                Err(err) => log::error!("error fetching directions: {err}"),
            }
        });
    }

    fn clear_route(&mut self) {
        self.route_layer().clear();
    }

    fn set_style(&mut self, style: &MapStyle) {
        log::info!("switching map style to '{}'", style.id);
        self.map.set_style(style.url);
    }
}

impl Drop for MapboxAdapter {
    fn drop(&mut self) {
        self.clear_markers();
        if let Some(marker) = self.user_marker.borrow_mut().take() {
            marker.remove();
        }
        self.map.remove();
    }
}
