use crumbs_core::{Challenge, ChallengeId, LngLat, MapStyle, PreferenceChannel};
use std::rc::Rc;
use yew::prelude::*;

use crate::map_handle::MapHandle;

#[derive(Properties, Clone, PartialEq)]
pub struct MapViewProps {
    pub challenges: Rc<Vec<Challenge>>,
    pub map: MapHandle,
    pub channel: PreferenceChannel,
    /// Style the map is created with; later changes arrive on `channel`.
    pub style: &'static MapStyle,
    pub track_position: bool,
    pub on_select: Callback<ChallengeId>,
    pub on_position: Callback<LngLat>,
}

/// Host element for the Mapbox map.
///
/// On mount the adapter is attached to the shared [`MapHandle`]; markers are
/// re-rendered whenever the challenge list changes and the position watch
/// runs only while `track_position` is set.
#[function_component(MapView)]
pub fn map_view(props: &MapViewProps) -> Html {
    let container = use_node_ref();

    #[cfg(target_arch = "wasm32")]
    browser::use_map_effects(props, &container);

    let has_token = crate::config::mapbox_token().is_some();
    html! {
        <div class="w-full h-full" data-testid="map-view" data-style={props.style.id}>
            <div ref={container} class="w-full h-full"></div>
            if !has_token {
                <p class="absolute top-1/2 inset-x-8 text-center text-sm text-gray-500">
                    { "Map unavailable: build with CRUMBS_MAPBOX_TOKEN set." }
                </p>
            }
        </div>
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::rc::Rc;

    use crumbs_core::{ChallengeId, MapAdapter, PreferenceChange};
    use yew::prelude::*;

    use super::MapViewProps;
    use crate::config;
    use crate::dom;
    use crate::mapbox::MapboxAdapter;

    #[hook]
    pub fn use_map_effects(props: &MapViewProps, container: &NodeRef) {
        {
            let container = container.clone();
            let map = props.map.clone();
            let style = props.style;
            use_effect_with((), move |()| {
                match (config::mapbox_token(), container.cast::<web_sys::HtmlElement>()) {
                    (Some(token), Some(element)) => {
                        match MapboxAdapter::mount(&element, style, token) {
                            Ok(adapter) => map.attach(adapter),
                            Err(err) => {
                                log::error!("could not create map: {}", dom::js_error_message(&err));
                            }
                        }
                    }
                    (None, _) => log::warn!("CRUMBS_MAPBOX_TOKEN is not set; map disabled"),
                    (_, None) => log::error!("map container is not mounted"),
                }
                move || {
                    map.detach();
                }
            });
        }
        {
            let map = props.map.clone();
            let on_select = props.on_select.clone();
            use_effect_with(props.challenges.clone(), move |challenges| {
                let handler = Rc::new(move |id: ChallengeId| on_select.emit(id));
                map.clone().render_markers(challenges, handler);
                || {}
            });
        }
        {
            let map = props.map.clone();
            let on_position = props.on_position.clone();
            use_effect_with(props.track_position, move |&track| {
                let watch = track.then(|| {
                    map.clone()
                        .track_user_position(Box::new(move |fix| on_position.emit(fix)))
                });
                move || drop(watch)
            });
        }
        {
            let map = props.map.clone();
            use_effect_with(props.channel.clone(), move |channel| {
                let subscription = channel.subscribe(move |change| {
                    let PreferenceChange::MapStyle(style) = change;
                    map.clone().set_style(style);
                });
                move || drop(subscription)
            });
        }
    }
}
