use crumbs_core::{Challenge, ChallengeKind, LngLat};
use crumbs_web::components::nearby_panel::NearbyEntry;
use crumbs_web::pages::{
    camera::{CameraPage, CameraPageProps},
    map::{MapPage, MapPageProps},
    not_found::{NotFound, Props as NotFoundProps},
    settings::{SETTING_GROUPS, SettingsPage, SettingsPageProps},
};
use futures::executor::block_on;
use std::rc::Rc;
use yew::{Callback, LocalServerRenderer};

fn statue() -> Challenge {
    Challenge::new(
        "1",
        LngLat::new(-0.481_747_846_041_145, 51.323_337_965_023_2),
        "Royal Statue",
        "Take a photo with the famous statue in the Royal Gardens",
        ChallengeKind::Photo,
        100,
    )
    .with_distance(0.5)
}

fn fountain() -> Challenge {
    Challenge::new(
        "2",
        LngLat::new(-0.482_747_846_041_145, 51.324_337_965_023_2),
        "Historic Fountain",
        "Find the hidden message near the fountain",
        ChallengeKind::Location,
        150,
    )
    .with_distance(1.2)
}

fn map_props() -> MapPageProps {
    MapPageProps {
        nearby: Rc::new(vec![
            NearbyEntry {
                challenge: statue(),
                distance_km: Some(0.5),
            },
            NearbyEntry {
                challenge: fountain(),
                distance_km: Some(1.2),
            },
        ]),
        selected: None,
        active: None,
        show_nearby: false,
        score: 0,
        notice: None,
        children: yew::Html::default(),
        on_select: Callback::noop(),
        on_toggle_nearby: Callback::noop(),
        on_dismiss: Callback::noop(),
        on_start: Callback::noop(),
        on_cancel: Callback::noop(),
    }
}

fn render_map(props: MapPageProps) -> String {
    block_on(LocalServerRenderer::<MapPage>::with_props(props).render())
}

#[test]
fn idle_map_lists_nearby_challenges() {
    let html = render_map(map_props());
    assert!(html.contains("Nearby Challenges"));
    assert!(html.contains("Royal Statue"));
    assert!(html.contains("0.5km away"));
    assert!(html.contains("150pts"));
    assert!(html.contains("0 pts"));
    assert!(html.contains(r#"data-open="false""#));
    assert!(!html.contains("challenge-popup"));
    assert!(!html.contains("Following directions to:"));
}

#[test]
fn selected_challenge_shows_popup() {
    let html = render_map(MapPageProps {
        selected: Some(fountain()),
        show_nearby: true,
        ..map_props()
    });
    assert!(html.contains("challenge-popup"));
    assert!(html.contains("Find the hidden message near the fountain"));
    assert!(html.contains("150 points"));
    assert!(html.contains("Start Challenge"));
    assert!(html.contains("Close"));
    assert!(html.contains(r#"data-open="true""#));
}

#[test]
fn active_challenge_shows_banner_and_locks_rows() {
    let html = render_map(MapPageProps {
        active: Some(fountain()),
        score: 100,
        ..map_props()
    });
    assert!(html.contains("Following directions to:"));
    assert!(html.contains("Cancel"));
    assert!(html.contains("cursor-not-allowed"));
    assert!(!html.contains("challenge-popup"));
    // The score badge is replaced by the banner while navigating.
    assert!(!html.contains("100 pts"));
}

#[test]
fn notice_is_announced() {
    let html = render_map(MapPageProps {
        notice: Some("Historic Fountain complete! +150 pts".into()),
        ..map_props()
    });
    assert!(html.contains("Historic Fountain complete! +150 pts"));
    assert!(html.contains(r#"role="status""#));
}

#[test]
fn settings_page_lists_groups_and_styles() {
    let props = SettingsPageProps {
        current_style: "satellite".into(),
        on_select_style: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<SettingsPage>::with_props(props).render());
    for group in SETTING_GROUPS {
        assert!(html.contains(group.title));
        for row in group.rows {
            assert!(html.contains(row.label));
        }
    }
    assert!(html.contains("Map Style"));
    assert!(html.contains("Outdoors"));
    let chosen: Vec<&str> = html
        .split("<button")
        .filter(|tag| tag.contains(r#"aria-checked="true""#))
        .collect();
    assert_eq!(chosen.len(), 1);
    assert!(chosen[0].contains(r#"data-style="satellite""#));
    assert!(html.contains("Sign Out"));
}

#[test]
fn camera_page_starts_in_preview() {
    let props = CameraPageProps {
        challenge: Some(statue()),
        on_close: Callback::noop(),
        on_accept: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<CameraPage>::with_props(props).render());
    assert!(html.contains("<video"));
    assert!(html.contains("Take photo"));
    assert!(html.contains("Royal Statue"));
    assert!(!html.contains("Retake"));
}

#[test]
fn not_found_offers_way_home() {
    let html = block_on(
        LocalServerRenderer::<NotFound>::with_props(NotFoundProps {
            on_go_home: Callback::noop(),
        })
        .render(),
    );
    assert!(html.contains("Back to the map"));
}
