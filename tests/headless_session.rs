use glam::Vec3;
use racket_lift::platform::headless::{
    AutopilotFeed, HeadlessWorld, HeadlessWorldConfig, RecordingDisplay, RecordingSound,
    ScriptedPoseFeed,
};
use racket_lift::platform::{BodyTag, Pose, PoseFeed};
use racket_lift::session::{RoundSummary, Session};
use racket_lift::sim::{RoundPhase, ScoreTier, SimTime};
use racket_lift::{RoundController, SetupError, Settings};

type Controller = RoundController<HeadlessWorld, RecordingDisplay, RecordingSound>;

fn controller(settings: Settings) -> Controller {
    RoundController::new(
        settings,
        HeadlessWorld::new(HeadlessWorldConfig::default()),
        RecordingDisplay::new(),
        RecordingSound::with_clips(&["pingpong1", "end"]),
    )
}

fn play<F: PoseFeed>(feed: F, rounds: usize) -> Vec<Option<RoundSummary>> {
    let mut session = Session::new(feed, controller(Settings::default())).unwrap();
    (0..rounds)
        .map(|_| {
            session
                .run_round(1.0 / 60.0, SimTime::from_millis(60_000))
                .unwrap()
        })
        .collect()
}

#[test]
fn autopilot_rounds_are_deterministic() {
    let first = play(AutopilotFeed::new(1234, 0.05), 3);
    let second = play(AutopilotFeed::new(1234, 0.05), 3);
    assert_eq!(first, second);
    assert!(first.iter().all(Option::is_some));

    let generations: Vec<u64> = first.iter().flatten().map(|s| s.generation).collect();
    assert_eq!(generations, vec![1, 2, 3]);
}

#[test]
fn steady_paddle_juggles_until_pulled_away() {
    let rest = Pose::at(Vec3::new(0.0, -0.3, -0.8));
    let mut feed = ScriptedPoseFeed::new(std::iter::repeat_n(rest, 300));
    // Then the player's hand jerks sideways
    for _ in 0..300 {
        feed.push(Pose::at(Vec3::new(0.5, -0.3, -0.8)));
    }

    let mut session = Session::new(feed, controller(Settings::default())).unwrap();
    session.start_round().unwrap();

    // Five seconds of a steady paddle: the ball keeps bouncing
    for _ in 0..300 {
        session.frame(1.0 / 60.0);
    }
    let c = session.controller();
    assert_eq!(c.phase(), RoundPhase::Playing);
    let bounces = c.round().contact_count;
    assert!(bounces >= 3, "only {bounces} bounces");
    assert_eq!(c.display().score, bounces.to_string());

    for _ in 0..120 {
        session.frame(1.0 / 60.0);
    }
    let c = session.controller();
    assert_eq!(c.phase(), RoundPhase::Idle);
    assert_eq!(c.world().count(BodyTag::Ball), 0);
    let result = c.display().result.clone().unwrap();
    assert!(result.starts_with(&format!("Your Score: {bounces}\n")));
    assert!(result.ends_with(ScoreTier::for_count(bounces).message()));
    assert!(c.display().start_visible);
}

#[test]
fn missing_paddle_model_fails_session() {
    let settings = Settings {
        paddle_model: "teapot.usdz".to_string(),
        ..Settings::default()
    };
    let result = Session::new(AutopilotFeed::new(1, 0.01), controller(settings));
    assert!(matches!(result, Err(SetupError::AssetLoad(_))));
}
