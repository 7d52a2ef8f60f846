//! Scenarios driving a real session against a recording map.

use anyhow::{Context, Result, bail, ensure};
use crumbs_core::{
    CaptureError, CaptureFlow, CaptureSurface, Challenge, ChallengeCatalog, ChallengeSession,
    ChallengeSource, CrumbsEngine, LngLat, MapAdapter, MapCall, MemoryPreferences,
    PreferenceChange, RecordingMap, Rejection, SessionPhase, Snapshot, Transition,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::cell::RefCell;
use std::rc::Rc;

const CHALLENGES_JSON: &str = include_str!("../../crumbs-web/static/assets/data/challenges.json");

/// Roughly where the demo challenges are.
const START_AT: LngLat = LngLat::new(-0.4809, 51.3229);

pub struct ScenarioCtx {
    pub seed: u64,
    pub rng: ChaCha8Rng,
    pub verbose: bool,
}

impl ScenarioCtx {
    fn note(&self, message: &str) {
        if self.verbose {
            println!("     · {message}");
        }
        log::debug!("[seed {}] {message}", self.seed);
    }

    /// A start position jittered by up to ~50 m.
    fn start_position(&mut self) -> LngLat {
        LngLat::new(
            START_AT.lng + self.rng.gen_range(-0.0007..0.0007),
            START_AT.lat + self.rng.gen_range(-0.0004..0.0004),
        )
    }
}

pub struct Scenario {
    pub key: &'static str,
    pub description: &'static str,
    pub run: fn(&mut ScenarioCtx) -> Result<()>,
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        key: "smoke",
        description: "Bundled challenges load into an idle session",
        run: smoke,
    },
    Scenario {
        key: "fountain-route",
        description: "Location challenge draws a route and cancel clears it",
        run: fountain_route,
    },
    Scenario {
        key: "statue-capture",
        description: "Photo challenge hands off to the camera flow",
        run: statue_capture,
    },
    Scenario {
        key: "locked-selection",
        description: "Selections are refused while a challenge is active",
        run: locked_selection,
    },
    Scenario {
        key: "stale-route",
        description: "Re-routing and cancelling retire in-flight route tickets",
        run: stale_route,
    },
    Scenario {
        key: "arrival",
        description: "Walking to the fountain completes it and scores points",
        run: arrival,
    },
    Scenario {
        key: "style-broadcast",
        description: "Map style changes persist and reach the map",
        run: style_broadcast,
    },
    Scenario {
        key: "random-walk",
        description: "Random user actions never break session invariants",
        run: random_walk,
    },
];

#[must_use]
pub fn find_scenario(key: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.key == key)
}

pub fn list_scenarios() -> impl Iterator<Item = (&'static str, &'static str)> {
    SCENARIOS.iter().map(|s| (s.key, s.description))
}

fn bundled() -> Result<ChallengeCatalog> {
    ChallengeCatalog::from_json(CHALLENGES_JSON).context("bundled challenge data")
}

fn session_at(ctx: &mut ScenarioCtx) -> Result<(ChallengeSession<RecordingMap>, RecordingMap)> {
    let map = RecordingMap::new();
    let mut session = ChallengeSession::new(bundled()?, map.clone());
    let start = ctx.start_position();
    session.update_position(start);
    ctx.note(&format!("starting at {start}"));
    Ok((session, map))
}

fn pick(session: &ChallengeSession<RecordingMap>, title: &str) -> Result<Challenge> {
    session
        .catalog()
        .iter()
        .find(|c| c.title == title)
        .cloned()
        .with_context(|| format!("challenge '{title}' missing from catalog"))
}

fn smoke(ctx: &mut ScenarioCtx) -> Result<()> {
    let engine = CrumbsEngine::new(bundled()?, MemoryPreferences::new());
    let session = engine.create_session(RecordingMap::new())?;
    ensure!(session.catalog().len() == 2, "expected two bundled challenges");
    ensure!(session.phase() == SessionPhase::Idle, "session must start idle");
    ensure!(!session.show_nearby_panel(), "nearby panel must start closed");
    ensure!(session.needs_position_tracking(), "no fix yet, tracking needed");
    ensure!(engine.map_style().id == "dark", "default style is dark");
    ctx.note(&format!("{} points available", session.catalog().total_points()));
    Ok(())
}

fn fountain_route(ctx: &mut ScenarioCtx) -> Result<()> {
    let (mut session, map) = session_at(ctx)?;
    let fountain = pick(&session, "Historic Fountain")?;

    session.select_challenge(fountain.clone())?;
    let Transition::Activated { route: Some(ticket), .. } = session.confirm_start()? else {
        bail!("fountain did not activate with a route");
    };
    let requests = map.route_requests();
    ensure!(requests.len() == 1, "expected one route request, got {}", requests.len());
    ensure!(requests[0].to == fountain.coordinates, "route must end at the fountain");
    ensure!(ticket.is_current(), "fresh ticket must be current");
    ensure!(session.needs_position_tracking(), "tracking continues while navigating");

    session.cancel_active()?;
    ensure!(map.clear_route_count() == 1, "cancel must clear the route once");
    ensure!(!ticket.is_current(), "cancel must retire the ticket");
    ensure!(session.show_nearby_panel(), "cancel reopens the nearby panel");
    Ok(())
}

/// Camera that produces a fixed frame.
#[derive(Default)]
struct SimulatedCamera {
    streaming: bool,
}

impl CaptureSurface for SimulatedCamera {
    fn start_capture(&mut self) -> Result<(), CaptureError> {
        self.streaming = true;
        Ok(())
    }

    fn take_snapshot(&mut self) -> Result<Snapshot, CaptureError> {
        if !self.streaming {
            return Err(CaptureError::NoFrame);
        }
        Ok(Snapshot {
            data_url: "data:image/jpeg;base64,/9j/".to_string(),
            width: 1920,
            height: 1080,
        })
    }

    fn stop_capture(&mut self) {
        self.streaming = false;
    }
}

fn statue_capture(ctx: &mut ScenarioCtx) -> Result<()> {
    let (mut session, map) = session_at(ctx)?;
    let statue = pick(&session, "Royal Statue")?;

    session.select_challenge(statue.clone())?;
    let transition = session.confirm_start()?;
    ensure!(
        transition == Transition::CaptureRequested(statue),
        "photo challenge must request capture, got {transition:?}"
    );
    ensure!(session.phase() == SessionPhase::Idle, "photo start leaves no active challenge");
    ensure!(map.route_requests().is_empty(), "photo challenges never route");

    let mut camera = CaptureFlow::new(SimulatedCamera::default());
    camera.open()?;
    if ctx.rng.gen_bool(0.5) {
        camera.shutter()?;
        camera.retake()?;
        ctx.note("retook the photo");
    }
    let shot = camera.shutter()?;
    ensure!(!camera.surface().streaming, "shutter stops the feed");
    let kept = camera.accept().context("accept returned nothing")?;
    ensure!(kept == shot && kept.mime_type() == Some("image/jpeg"));
    Ok(())
}

fn locked_selection(ctx: &mut ScenarioCtx) -> Result<()> {
    let (mut session, map) = session_at(ctx)?;
    let statue = pick(&session, "Royal Statue")?;
    session.select_by_id(&"2".into())?;
    session.confirm_start()?;
    let calls = map.calls();

    let attempts = ctx.rng.gen_range(1..=10);
    for _ in 0..attempts {
        ensure!(
            session.select_challenge(statue.clone()) == Err(Rejection::ActiveChallengeLocked),
            "selection must be refused while active"
        );
    }
    ensure!(session.selected().is_none());
    ensure!(map.calls() == calls, "refused selections must not reach the map");
    ctx.note(&format!("{attempts} refused selections"));
    Ok(())
}

fn stale_route(ctx: &mut ScenarioCtx) -> Result<()> {
    let (mut session, map) = session_at(ctx)?;
    session.select_by_id(&"2".into())?;
    session.confirm_start()?;
    let first = map.route_requests().remove(0).ticket;

    let moved = ctx.start_position();
    let second = session
        .update_position(moved)
        .context("moving while active must re-route")?;
    ensure!(!first.is_current(), "older ticket must be superseded");
    ensure!(second.is_current(), "newest ticket must be current");

    session.cancel_active()?;
    ensure!(!second.is_current(), "cancel retires the newest ticket");
    ensure!(session.update_position(moved).is_none(), "idle moves never route");
    Ok(())
}

fn arrival(ctx: &mut ScenarioCtx) -> Result<()> {
    let (session, map) = session_at(ctx)?;
    let session = Rc::new(RefCell::new(session));
    let fountain = pick(&session.borrow(), "Historic Fountain")?;

    let outcome: Rc<RefCell<Option<Transition>>> = Rc::default();
    let watch = {
        let session = Rc::clone(&session);
        let outcome = Rc::clone(&outcome);
        map.clone().track_user_position(Box::new(move |fix| {
            let mut session = session.borrow_mut();
            session.update_position(fix);
            if let Ok(done) = session.arrive() {
                outcome.replace(Some(done));
            }
        }))
    };

    session.borrow_mut().select_by_id(&fountain.id)?;
    session.borrow_mut().confirm_start()?;
    let start = session.borrow().position().context("no start position")?;

    let steps = ctx.rng.gen_range(5..=20_u32);
    for step in 1..=steps {
        let t = f64::from(step) / f64::from(steps);
        let fix = LngLat::new(
            start.lng + (fountain.coordinates.lng - start.lng) * t,
            start.lat + (fountain.coordinates.lat - start.lat) * t,
        );
        map.emit_position(fix);
    }
    drop(watch);

    let session = session.borrow();
    ensure!(
        matches!(*outcome.borrow(), Some(Transition::Arrived(_))),
        "walking to the fountain must complete it"
    );
    ensure!(session.score() == fountain.points, "score must equal the fountain's points");
    ensure!(session.active().is_none(), "arrival ends the challenge");
    ensure!(map.active_watches() == 0, "dropping the watch unsubscribes");
    ctx.note(&format!("arrived after {steps} fixes"));
    Ok(())
}

fn style_broadcast(ctx: &mut ScenarioCtx) -> Result<()> {
    let source = bundled()?;
    ensure!(source.load_challenges()?.len() == 2);
    let engine = CrumbsEngine::new(source, MemoryPreferences::new());
    let map = RecordingMap::new();
    let _subscription = {
        let map = map.clone();
        engine.preferences().channel().subscribe(move |change| {
            let PreferenceChange::MapStyle(style) = change;
            map.clone().set_style(style);
        })
    };

    let ids = ["light", "streets", "outdoors", "satellite", "dark"];
    let id = ids[ctx.rng.gen_range(0..ids.len())];
    engine.select_map_style(id)?;
    ensure!(engine.map_style().id == id, "style must persist");
    ensure!(map.calls() == vec![MapCall::SetStyle(id)], "map must receive the style");
    ensure!(engine.select_map_style("neon").is_err(), "unknown styles are refused");
    ensure!(map.calls().len() == 1, "refused styles are not broadcast");
    Ok(())
}

fn random_walk(ctx: &mut ScenarioCtx) -> Result<()> {
    let (mut session, map) = session_at(ctx)?;
    let challenges: Vec<Challenge> = session.catalog().iter().cloned().collect();

    for step in 0..200 {
        let before = (session.selected().cloned(), session.active().cloned());
        let routes_before = map.route_requests().len();
        let outcome = match ctx.rng.gen_range(0..6) {
            0 => {
                let choice = &challenges[ctx.rng.gen_range(0..challenges.len())];
                session.select_challenge(choice.clone()).map(drop)
            }
            1 => session.confirm_start().map(drop),
            2 => session.cancel_active().map(drop),
            3 => session.dismiss_selected().map(drop),
            4 => {
                session.toggle_nearby_panel();
                Ok(())
            }
            _ => {
                let fix = ctx.start_position();
                session.update_position(fix);
                Ok(())
            }
        };

        ensure!(
            !(session.selected().is_some() && session.active().is_some()),
            "step {step}: selected and active at once"
        );
        if let Some(active) = session.active() {
            ensure!(active.is_location(), "step {step}: photo challenge became active");
        }
        if outcome.is_err() {
            ensure!(
                (session.selected().cloned(), session.active().cloned()) == before,
                "step {step}: refused action changed state"
            );
            ensure!(
                map.route_requests().len() == routes_before,
                "step {step}: refused action reached the map"
            );
        }
    }
    ctx.note(&format!("{} map calls", map.calls().len()));
    Ok(())
}
