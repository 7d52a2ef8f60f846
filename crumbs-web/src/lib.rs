#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod app;
pub mod camera;
pub mod components;
pub mod config;
pub mod data;
pub mod dom;
pub mod logging;
pub mod map_handle;
#[cfg(target_arch = "wasm32")]
pub mod mapbox;
pub mod pages;
pub mod router;
pub mod storage;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    if let Err(err) = logging::init(config::log_level()) {
        dom::console_error(&format!("logger already installed: {err}"));
    }
    yew::Renderer::<app::App>::new().render();
}
