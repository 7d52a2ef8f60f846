use crumbs_core::{
    Challenge, ChallengeCatalog, ChallengeKind, ChallengeSession, LngLat, MapAdapter, MapCall,
    RecordingMap, Rejection, SessionPhase, Transition,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const STATUE_AT: LngLat = LngLat::new(-0.481_747_846_041_145, 51.323_337_965_023_2);
const FOUNTAIN_AT: LngLat = LngLat::new(-0.482_747_846_041_145, 51.324_337_965_023_2);
const USER_AT: LngLat = LngLat::new(-0.480_9, 51.322_9);

fn royal_statue() -> Challenge {
    Challenge::new(
        "1",
        STATUE_AT,
        "Royal Statue",
        "Take a photo with the famous statue in the Royal Gardens",
        ChallengeKind::Photo,
        100,
    )
    .with_distance(0.5)
}

fn historic_fountain() -> Challenge {
    Challenge::new(
        "2",
        FOUNTAIN_AT,
        "Historic Fountain",
        "Find the hidden message near the fountain",
        ChallengeKind::Location,
        150,
    )
    .with_distance(1.2)
}

fn seeded_session() -> (ChallengeSession<RecordingMap>, RecordingMap) {
    let catalog = ChallengeCatalog::new(vec![royal_statue(), historic_fountain()]).unwrap();
    let map = RecordingMap::new();
    let mut session = ChallengeSession::new(catalog, map.clone());
    session.update_position(USER_AT);
    (session, map)
}

#[test]
fn fountain_scenario_routes_then_clears() {
    let (mut session, map) = seeded_session();

    session.select_challenge(historic_fountain()).unwrap();
    let transition = session.confirm_start().unwrap();
    assert!(matches!(transition, Transition::Activated { route: Some(_), .. }));

    assert_eq!(session.active().unwrap().title, "Historic Fountain");
    assert!(session.selected().is_none());
    let routes = map.route_requests();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].to, FOUNTAIN_AT);
    assert_eq!(routes[0].from, USER_AT);

    session.cancel_active().unwrap();
    assert!(session.active().is_none());
    assert_eq!(map.clear_route_count(), 1);
}

#[test]
fn statue_scenario_hands_off_without_route() {
    let (mut session, map) = seeded_session();

    session.select_challenge(royal_statue()).unwrap();
    let transition = session.confirm_start().unwrap();
    assert_eq!(transition, Transition::CaptureRequested(royal_statue()));

    assert!(session.selected().is_none());
    assert!(session.active().is_none());
    assert!(map.route_requests().is_empty());
}

#[test]
fn selection_is_locked_while_active() {
    let (mut session, map) = seeded_session();
    session.select_challenge(historic_fountain()).unwrap();
    session.confirm_start().unwrap();
    let calls_before = map.calls();

    for _ in 0..5 {
        assert_eq!(
            session.select_challenge(royal_statue()),
            Err(Rejection::ActiveChallengeLocked)
        );
        assert_eq!(
            session.select_by_id(&"2".into()),
            Err(Rejection::ActiveChallengeLocked)
        );
        assert!(session.selected().is_none());
    }
    assert_eq!(
        session.confirm_start(),
        Err(Rejection::ActiveChallengeLocked)
    );
    assert_eq!(session.active().unwrap().id.as_str(), "2");
    assert_eq!(map.calls(), calls_before);
}

#[test]
fn cancel_twice_clears_route_once() {
    let (mut session, map) = seeded_session();
    session.select_challenge(historic_fountain()).unwrap();
    session.confirm_start().unwrap();

    assert!(session.cancel_active().is_ok());
    assert_eq!(session.cancel_active(), Err(Rejection::NoActiveChallenge));
    assert!(session.show_nearby_panel());
    assert!(session.active().is_none());
    assert_eq!(map.clear_route_count(), 1);
}

#[test]
fn cancel_while_idle_still_opens_panel() {
    let (mut session, map) = seeded_session();
    assert!(!session.show_nearby_panel());
    assert_eq!(session.cancel_active(), Err(Rejection::NoActiveChallenge));
    assert!(session.show_nearby_panel());
    assert_eq!(map.clear_route_count(), 0);
}

#[test]
fn activation_closes_panel() {
    let (mut session, _) = seeded_session();
    session.toggle_nearby_panel();
    assert!(session.show_nearby_panel());
    session.select_challenge(historic_fountain()).unwrap();
    session.confirm_start().unwrap();
    assert!(!session.show_nearby_panel());
}

#[test]
fn stale_route_ticket_is_discarded_after_cancel() {
    let (mut session, map) = seeded_session();
    session.select_challenge(historic_fountain()).unwrap();
    session.confirm_start().unwrap();
    let in_flight = map.route_requests().remove(0).ticket;
    assert!(in_flight.is_current());

    session.cancel_active().unwrap();
    // The directions response arriving now must not be drawn.
    assert!(!in_flight.is_current());
}

#[test]
fn position_watch_drives_rerouting_through_the_map() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let map = RecordingMap::new();
    let catalog = ChallengeCatalog::new(vec![royal_statue(), historic_fountain()]).unwrap();
    let session = Rc::new(RefCell::new(ChallengeSession::new(catalog, map.clone())));

    let watch = {
        let handle = Rc::clone(&session);
        let mut tracker = map.clone();
        tracker.track_user_position(Box::new(move |fix| {
            handle.borrow_mut().update_position(fix);
        }))
    };

    map.emit_position(USER_AT);
    session.borrow_mut().select_by_id(&"2".into()).unwrap();
    session.borrow_mut().confirm_start().unwrap();
    map.emit_position(LngLat::new(-0.4820, 51.3238));
    assert_eq!(map.route_requests().len(), 2);

    drop(watch);
    assert_eq!(map.active_watches(), 0);
    assert_eq!(map.emit_position(FOUNTAIN_AT), 0);
    assert_eq!(map.calls().first(), Some(&MapCall::TrackUserPosition));
}

#[derive(Debug, Clone, Copy)]
enum Action {
    SelectStatue,
    SelectFountain,
    Confirm,
    Cancel,
    Dismiss,
    Toggle,
}

const ACTIONS: [Action; 6] = [
    Action::SelectStatue,
    Action::SelectFountain,
    Action::Confirm,
    Action::Cancel,
    Action::Dismiss,
    Action::Toggle,
];

#[test]
fn random_walks_preserve_invariants() {
    for seed in 0..64_u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (mut session, map) = seeded_session();

        for step in 0..200 {
            let action = ACTIONS[rng.gen_range(0..ACTIONS.len())];
            let selected_before = session.selected().cloned();
            let active_before = session.active().cloned();
            let clears_before = map.clear_route_count();
            let routes_before = map.route_requests().len();

            let outcome = match action {
                Action::SelectStatue => session.select_challenge(royal_statue()),
                Action::SelectFountain => session.select_challenge(historic_fountain()),
                Action::Confirm => session.confirm_start(),
                Action::Cancel => session.cancel_active(),
                Action::Dismiss => session.dismiss_selected(),
                Action::Toggle => Ok(session.toggle_nearby_panel()),
            };

            let context = format!("seed {seed} step {step} {action:?}");
            assert!(
                !(session.selected().is_some() && session.active().is_some()),
                "selected while active: {context}"
            );
            if active_before.is_some()
                && matches!(action, Action::SelectStatue | Action::SelectFountain)
            {
                assert_eq!(session.selected().cloned(), selected_before, "{context}");
            }
            if let Some(active) = session.active() {
                assert_eq!(active.kind, ChallengeKind::Location, "{context}");
            }
            if outcome.is_err() {
                assert_eq!(session.selected().cloned(), selected_before, "{context}");
                assert_eq!(session.active().cloned(), active_before, "{context}");
                assert_eq!(map.clear_route_count(), clears_before, "{context}");
                assert_eq!(map.route_requests().len(), routes_before, "{context}");
            }
            match action {
                Action::Confirm if outcome.is_ok() => {
                    assert!(session.selected().is_none(), "{context}");
                    match selected_before.as_ref().map(|c| c.kind) {
                        Some(ChallengeKind::Photo) => assert!(session.active().is_none()),
                        Some(ChallengeKind::Location) => {
                            assert_eq!(session.active().cloned(), selected_before, "{context}");
                        }
                        None => panic!("confirm accepted with nothing selected: {context}"),
                    }
                }
                Action::Cancel => {
                    assert!(session.active().is_none(), "{context}");
                    assert!(session.show_nearby_panel(), "{context}");
                }
                _ => {}
            }
            let expected_phase = if session.active().is_some() {
                SessionPhase::Active
            } else if session.selected().is_some() {
                SessionPhase::Selected
            } else {
                SessionPhase::Idle
            };
            assert_eq!(session.phase(), expected_phase, "{context}");
        }
    }
}
