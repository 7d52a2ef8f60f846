use crumbs_web::app::AppInner;
use futures::executor::block_on;
use yew::prelude::*;
use yew::LocalServerRenderer;
use yew_router::history::{AnyHistory, History, MemoryHistory};
use yew_router::Router;

#[derive(Properties, PartialEq)]
struct HarnessProps {
    path: AttrValue,
}

#[function_component(Harness)]
fn harness(props: &HarnessProps) -> Html {
    let history = AnyHistory::from(MemoryHistory::new());
    history.push(props.path.to_string());
    html! {
        <Router {history}>
            <AppInner />
        </Router>
    }
}

fn render_at(path: &'static str) -> String {
    block_on(
        LocalServerRenderer::<Harness>::with_props(HarnessProps { path: path.into() }).render(),
    )
}

#[test]
fn map_route_renders_bundled_challenges() {
    let html = render_at("/");
    assert!(html.contains("map-screen"));
    assert!(html.contains("map-view"));
    assert!(html.contains("Royal Statue"));
    assert!(html.contains("Historic Fountain"));
    assert!(html.contains("0 pts"));
    assert!(html.contains(r#"data-style="dark""#));
    assert!(html.contains("nav-settings"));
}

#[test]
fn camera_route_hides_navigation() {
    let html = render_at("/camera");
    assert!(html.contains("camera-screen"));
    assert!(!html.contains("nav-map"));
}

#[test]
fn settings_route_shows_style_picker() {
    let html = render_at("/settings");
    assert!(html.contains("settings-screen"));
    assert!(html.contains("Map Style"));
    assert!(html.contains(r#"aria-current="page""#));
}

#[test]
fn unknown_route_falls_back_to_not_found() {
    let html = render_at("/elsewhere");
    assert!(html.contains("Back to the map"));
}
