use std::rc::Rc;

use crumbs_core::{ChallengeId, LngLat, Snapshot};
use yew::prelude::*;
use yew_router::prelude::Navigator;

use super::state::{AppState, SessionAction};
use crate::components::bottom_nav::BottomNav;
use crate::components::map_view::MapView;
use crate::pages::camera::CameraPage;
use crate::pages::map::MapPage;
use crate::pages::not_found::NotFound;
use crate::pages::settings::SettingsPage;
use crate::router::Route;

fn dispatcher(state: &AppState, action: SessionAction) -> Callback<()> {
    let session = state.session.clone();
    Callback::from(move |()| session.dispatch(action.clone()))
}

fn map_screen(state: &AppState, navigate: &Callback<Route>) -> Html {
    let store = &*state.session;
    let session = store.session();

    let on_select = {
        let session = state.session.clone();
        Callback::from(move |id: ChallengeId| session.dispatch(SessionAction::Select(id)))
    };
    let on_position = {
        let session = state.session.clone();
        Callback::from(move |fix: LngLat| session.dispatch(SessionAction::Position(fix)))
    };
    let on_start = {
        let store = state.session.clone();
        let target = state.capture_target.clone();
        let navigate = navigate.clone();
        Callback::from(move |()| {
            let photo = store.session().selected().filter(|c| c.is_photo()).cloned();
            store.dispatch(SessionAction::Confirm);
            if let Some(challenge) = photo {
                target.set(Some(challenge));
                navigate.emit(Route::Camera);
            }
        })
    };

    html! {
        <MapPage
            nearby={Rc::new(store.nearby_entries())}
            selected={session.selected().cloned()}
            active={session.active().cloned()}
            show_nearby={session.show_nearby_panel()}
            score={session.score()}
            notice={store.notice().map(AttrValue::from)}
            on_select={on_select.clone()}
            on_toggle_nearby={dispatcher(state, SessionAction::ToggleNearby)}
            on_dismiss={dispatcher(state, SessionAction::Dismiss)}
            on_start={on_start}
            on_cancel={dispatcher(state, SessionAction::Cancel)}
        >
            <MapView
                challenges={Rc::new(session.catalog().as_slice().to_vec())}
                map={state.map.clone()}
                channel={state.channel()}
                style={*state.map_style}
                track_position={session.needs_position_tracking()}
                {on_select}
                {on_position}
            />
        </MapPage>
    }
}

fn camera_screen(state: &AppState, navigate: &Callback<Route>) -> Html {
    let on_close = {
        let target = state.capture_target.clone();
        let navigate = navigate.clone();
        Callback::from(move |()| {
            target.set(None);
            navigate.emit(Route::Map);
        })
    };
    let on_accept = {
        let target = state.capture_target.clone();
        let navigate = navigate.clone();
        Callback::from(move |snapshot: Snapshot| {
            let title = (*target).as_ref().map_or("free photo", |c| c.title.as_str());
            log::info!("saved {}x{} photo for {title}", snapshot.width, snapshot.height);
            target.set(None);
            navigate.emit(Route::Map);
        })
    };
    html! {
        <CameraPage challenge={(*state.capture_target).clone()} {on_close} {on_accept} />
    }
}

fn settings_screen(state: &AppState) -> Html {
    let on_select_style = {
        let state = state.clone();
        Callback::from(move |id: &'static str| state.select_map_style(id))
    };
    html! {
        <SettingsPage current_style={state.map_style.id} {on_select_style} />
    }
}

/// Render the page for `route` inside the phone-sized shell.
pub fn render_app(state: &AppState, route: Option<Route>, navigator: Option<Navigator>) -> Html {
    let route = route.unwrap_or(Route::NotFound);
    let navigate = Callback::from(move |to: Route| {
        if let Some(navigator) = navigator.as_ref() {
            navigator.push(&to);
        }
    });

    let page = match route {
        Route::Map => map_screen(state, &navigate),
        Route::Camera => camera_screen(state, &navigate),
        Route::Settings => settings_screen(state),
        Route::NotFound => html! { <NotFound on_go_home={navigate.reform(|()| Route::Map)} /> },
    };

    html! {
        <div class="min-h-screen flex justify-center bg-gray-100">
            <main id="main" role="main" class="relative w-full max-w-[430px] h-screen bg-gray-50 overflow-hidden">
                { page }
                if !route.is_fullscreen() {
                    <BottomNav current={route} on_navigate={navigate} />
                }
            </main>
        </div>
    }
}
