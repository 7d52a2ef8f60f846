#![cfg(target_arch = "wasm32")]

use crumbs_core::{MapAdapter, MapCall, PreferenceStore, RecordingMap, StylePreferences};
use crumbs_web::dom;
use crumbs_web::map_handle::MapHandle;
use crumbs_web::storage::BrowserPreferences;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn dom_helpers_find_the_page() {
    assert!(dom::window().is_some());
    assert!(dom::document().is_some());
    assert!(dom::local_storage().is_ok());
}

#[wasm_bindgen_test]
fn style_preference_survives_in_local_storage() {
    let prefs = StylePreferences::new(BrowserPreferences);
    prefs.select("outdoors").expect("write style");
    assert_eq!(
        BrowserPreferences
            .read("crumbs.map_style")
            .expect("read style")
            .as_deref(),
        Some("outdoors")
    );
    assert_eq!(prefs.current().id, "outdoors");
    prefs.select("dark").expect("restore default");
}

#[wasm_bindgen_test]
fn style_broadcast_reaches_attached_map() {
    let prefs = StylePreferences::new(BrowserPreferences);
    let recorder = RecordingMap::new();
    let handle = MapHandle::new();
    handle.attach(recorder.clone());
    let _subscription = {
        let handle = handle.clone();
        prefs.channel().subscribe(move |change| {
            let crumbs_core::PreferenceChange::MapStyle(style) = change;
            handle.clone().set_style(style);
        })
    };
    prefs.select("light").expect("write style");
    assert_eq!(recorder.calls(), vec![MapCall::SetStyle("light")]);
    prefs.select("dark").expect("restore default");
}
