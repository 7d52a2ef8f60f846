use crate::router::Route;
use yew::prelude::*;
use yew_router::prelude::*;

pub mod state;
pub mod view;

pub use state::{AppState, SessionAction, SessionStore};

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    let router_base = crate::config::router_base().map(AttrValue::from);
    html! {
        <BrowserRouter basename={router_base}>
            <AppInner />
        </BrowserRouter>
    }
}

/// Everything below the router; mounted under a `MemoryHistory` in tests.
#[function_component(AppInner)]
pub fn app_inner() -> Html {
    let app_state = state::use_app_state();
    let navigator = use_navigator();
    let route = use_route::<Route>();

    view::render_app(&app_state, route, navigator)
}
