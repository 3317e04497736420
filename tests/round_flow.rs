use glam::Vec3;
use racket_lift::error::{AssetLoadError, SetupError};
use racket_lift::platform::headless::{RecordingDisplay, RecordingSound};
use racket_lift::platform::{
    BodyHandle, BodySpec, BodyTag, ContactBody, ContactEvent, PhysicsWorld, Pose,
};
use racket_lift::sim::{Ignored, RoundController, RoundEvent, RoundPhase, StartOutcome};
use racket_lift::Settings;

// World whose ball height is set by the test; contacts are injected directly.
#[derive(Default)]
struct ScriptedWorld {
    bodies: Vec<Option<(BodyTag, Vec3)>>,
    generations: Vec<u32>,
    live_balls: usize,
    max_live_balls: usize,
    fail_ball_spawn: bool,
}

impl ScriptedWorld {
    fn set_height(&mut self, handle: BodyHandle, y: f32) {
        if let Some(Some((_, pos))) = self.bodies.get_mut(handle.index as usize) {
            pos.y = y;
        }
    }

    fn live(&self, handle: BodyHandle) -> bool {
        self.generations.get(handle.index as usize) == Some(&handle.generation)
            && matches!(self.bodies.get(handle.index as usize), Some(Some(_)))
    }
}

impl PhysicsWorld for ScriptedWorld {
    fn spawn(&mut self, spec: &BodySpec) -> Result<BodyHandle, AssetLoadError> {
        if spec.tag == BodyTag::Ball {
            if self.fail_ball_spawn {
                return Err(AssetLoadError::new("ball", "out of memory"));
            }
            self.live_balls += 1;
            self.max_live_balls = self.max_live_balls.max(self.live_balls);
        }
        self.bodies.push(Some((spec.tag, spec.pose.position)));
        self.generations.push(1);
        Ok(BodyHandle {
            index: (self.bodies.len() - 1) as u32,
            generation: 1,
        })
    }

    fn despawn(&mut self, handle: BodyHandle) -> bool {
        if !self.live(handle) {
            return false;
        }
        if let Some((BodyTag::Ball, _)) = self.bodies[handle.index as usize].take() {
            self.live_balls -= 1;
        }
        true
    }

    fn position(&self, handle: BodyHandle) -> Option<Vec3> {
        if !self.live(handle) {
            return None;
        }
        self.bodies[handle.index as usize].map(|(_, pos)| pos)
    }

    fn set_pose(&mut self, handle: BodyHandle, pose: Pose) -> bool {
        if !self.live(handle) {
            return false;
        }
        if let Some((_, pos)) = self.bodies[handle.index as usize].as_mut() {
            *pos = pose.position;
        }
        true
    }

    fn apply_impulse(&mut self, handle: BodyHandle, _impulse: Vec3) -> bool {
        self.live(handle)
    }

    fn step(&mut self, _dt: f32, _contacts: &mut Vec<ContactEvent>) {}
}

type Controller = RoundController<ScriptedWorld, RecordingDisplay, RecordingSound>;

fn ready_controller() -> Controller {
    let mut controller = RoundController::new(
        Settings::default(),
        ScriptedWorld::default(),
        RecordingDisplay::new(),
        RecordingSound::with_clips(&["pingpong1", "end"]),
    );
    controller.setup().expect("paddle loads");
    controller
}

fn contact(c: &Controller) -> ContactEvent {
    ContactEvent {
        a: ContactBody {
            handle: c.ball().expect("ball in play").body,
            tag: BodyTag::Ball,
        },
        b: ContactBody {
            handle: c.paddle().expect("paddle"),
            tag: BodyTag::Paddle,
        },
        impulse: 0.5,
    }
}

#[test]
fn three_bounces_then_drop_on_tick_42() {
    let mut c = ready_controller();
    c.on_pose(Pose::at(Vec3::new(0.0, -0.3, -0.8)));
    assert!(c.display().start_visible);

    assert_eq!(c.start(), Ok(StartOutcome::Started { generation: 1 }));
    assert!(!c.display().start_visible);
    assert_eq!(c.display().timer, "00:00.0");

    // Bounces at 0.5s, 1.5s and 2.5s
    for _ in 0..3 {
        c.advance_by(500_000);
        c.on_contact(&contact(&c));
        c.advance_by(500_000);
    }
    assert_eq!(c.display().score, "3");
    assert_eq!(c.round().elapsed_ticks, 30);
    assert_eq!(c.phase(), RoundPhase::Playing);

    c.advance_by(1_100_000);
    assert_eq!(c.round().elapsed_ticks, 41);
    assert_eq!(c.phase(), RoundPhase::Playing);

    // Paddle at -0.3, drop line at -0.1
    let ball = c.ball().unwrap().body;
    c.world_mut().set_height(ball, -0.15);
    c.advance_by(100_000);

    assert_eq!(c.phase(), RoundPhase::Idle);
    assert_eq!(c.round().elapsed_ticks, 42);
    assert_eq!(c.display().timer, "00:04.2");
    assert_eq!(c.display().result.as_deref(), Some("Your Score: 3\nNice try!"));
    assert!(c.display().start_visible);
    assert_eq!(c.audio().trigger().play_count("pingpong1"), 3);
    assert_eq!(c.audio().trigger().play_count("end"), 1);
    assert!(c.ball().is_none());
    assert_eq!(c.world().live_balls, 0);

    let drops: Vec<_> = c
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, RoundEvent::BallDropped { .. }))
        .collect();
    assert_eq!(drops.len(), 1);

    // Condition stays true for later ticks but nothing more happens
    c.advance_by(2_000_000);
    assert!(
        c.drain_events()
            .iter()
            .all(|e| matches!(e, RoundEvent::Ignored(Ignored::StaleTick)))
    );
    assert_eq!(c.round().elapsed_ticks, 42);
}

#[test]
fn never_more_than_one_ball() {
    let mut c = ready_controller();
    for round in 0..5 {
        c.start().unwrap();
        c.start().unwrap();
        c.advance_by(50_000);
        let ball = c.ball().unwrap().body;
        c.world_mut().set_height(ball, -5.0);
        c.advance_by(50_000);
        assert_eq!(c.phase(), RoundPhase::Idle, "round {round}");
    }
    assert_eq!(c.world().max_live_balls, 1);
    assert_eq!(c.round().generation, 5);
}

#[test]
fn ball_spawn_failure_keeps_idle() {
    let mut c = ready_controller();
    c.world_mut().fail_ball_spawn = true;
    assert!(matches!(c.start(), Err(SetupError::AssetLoad(_))));
    assert_eq!(c.phase(), RoundPhase::Idle);
    assert!(c.display().start_visible);

    // Nothing ticks for a round that never started
    c.advance_by(1_000_000);
    assert_eq!(c.round().elapsed_ticks, 0);

    c.world_mut().fail_ball_spawn = false;
    assert_eq!(c.start(), Ok(StartOutcome::Started { generation: 1 }));
}

#[test]
fn score_keeps_counting_through_tiers() {
    let mut c = ready_controller();
    c.start().unwrap();
    for _ in 0..12 {
        c.on_contact(&contact(&c));
        c.advance_by(110_000);
    }
    let ball = c.ball().unwrap().body;
    c.world_mut().set_height(ball, -1.0);
    c.advance_by(100_000);
    assert_eq!(
        c.display().result.as_deref(),
        Some("Your Score: 12\nExcellent Work!")
    );
}
