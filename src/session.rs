//! Fixed-step frame driver
//!
//! Serializes the three callback streams the controller consumes: the pose
//! for this frame, then for each physics substep the world's contacts followed
//! by any timers that fell due.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT, SIM_STEP_MICROS};
use crate::error::SetupError;
use crate::platform::{DisplaySurface, PhysicsWorld, PoseFeed, SoundTrigger};
use crate::sim::{RoundController, RoundEvent, RoundPhase, ScoreTier, SimTime, StartOutcome};

/// How a round played out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary {
    pub generation: u64,
    pub score: u32,
    pub tier: ScoreTier,
    pub elapsed_ticks: u64,
}

pub struct Session<F, W, D, S>
where
    F: PoseFeed,
    W: PhysicsWorld,
    D: DisplaySurface,
    S: SoundTrigger,
{
    feed: F,
    controller: RoundController<W, D, S>,
    accumulator: f32,
    now: SimTime,
    frames: u64,
}

impl<F, W, D, S> Session<F, W, D, S>
where
    F: PoseFeed,
    W: PhysicsWorld,
    D: DisplaySurface,
    S: SoundTrigger,
{
    /// Check the pose feed and set up the controller's paddle
    pub fn new(feed: F, mut controller: RoundController<W, D, S>) -> Result<Self, SetupError> {
        if !feed.is_available() {
            log::error!("No device pose feed, cannot track the paddle");
            return Err(SetupError::PoseFeedUnavailable);
        }
        controller.setup()?;
        let now = controller.now();
        Ok(Self {
            feed,
            controller,
            accumulator: 0.0,
            now,
            frames: 0,
        })
    }

    /// Press the start control
    pub fn start_round(&mut self) -> Result<StartOutcome, SetupError> {
        self.controller.start()
    }

    /// Run one rendered frame of `dt` seconds. A zero, negative or NaN `dt`
    /// still applies the pose but advances nothing.
    pub fn frame(&mut self, dt: f32) {
        let dt = if dt > 0.0 { dt.min(MAX_FRAME_DT) } else { 0.0 };
        self.frames += 1;

        if let Some(pose) = self.feed.next_pose() {
            self.controller.on_pose(pose);
        }

        self.accumulator += dt;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.controller.step_world(SIM_DT);
            self.now = self.now.after(SIM_STEP_MICROS);
            self.controller.advance_to(self.now);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    /// Start a round and run frames until the ball drops or `max_time` of
    /// simulated time has passed. Returns `None` if the round was still going,
    /// or without starting one if `frame_dt` could never advance the clock.
    pub fn run_round(
        &mut self,
        frame_dt: f32,
        max_time: SimTime,
    ) -> Result<Option<RoundSummary>, SetupError> {
        if !(frame_dt.is_finite() && frame_dt > 0.0) {
            log::warn!("run_round needs a positive frame time, got {frame_dt}");
            return Ok(None);
        }
        if let StartOutcome::AlreadyPlaying = self.start_round()? {
            log::warn!("run_round called with a round already in play");
        }
        let deadline = self.now.after(max_time.as_micros());

        while self.controller.phase() == RoundPhase::Playing && self.now < deadline {
            self.frame(frame_dt);
        }

        let summary = self
            .controller
            .drain_events()
            .into_iter()
            .find_map(|event| match event {
                RoundEvent::BallDropped {
                    generation,
                    score,
                    tier,
                    elapsed_ticks,
                } => Some(RoundSummary {
                    generation,
                    score,
                    tier,
                    elapsed_ticks,
                }),
                _ => None,
            });
        Ok(summary)
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn controller(&self) -> &RoundController<W, D, S> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut RoundController<W, D, S> {
        &mut self.controller
    }

    pub fn feed_mut(&mut self) -> &mut F {
        &mut self.feed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{
        HeadlessWorld, HeadlessWorldConfig, RecordingDisplay, RecordingSound, ScriptedPoseFeed,
    };
    use crate::settings::Settings;

    fn controller() -> RoundController<HeadlessWorld, RecordingDisplay, RecordingSound> {
        RoundController::new(
            Settings::default(),
            HeadlessWorld::new(HeadlessWorldConfig::default()),
            RecordingDisplay::new(),
            RecordingSound::with_clips(&["pingpong1", "end"]),
        )
    }

    #[test]
    fn test_unavailable_feed_refuses_session() {
        let result = Session::new(ScriptedPoseFeed::unavailable(), controller());
        assert!(matches!(result, Err(SetupError::PoseFeedUnavailable)));
    }

    #[test]
    fn test_frame_runs_fixed_substeps() {
        let mut session = Session::new(ScriptedPoseFeed::new(Vec::new()), controller()).unwrap();
        session.frame(0.025);
        assert_eq!(session.now(), SimTime::from_millis(20));
        // Huge frame is clamped to MAX_FRAME_DT and capped at MAX_SUBSTEPS
        session.frame(5.0);
        assert_eq!(session.now(), SimTime::from_millis(100));
    }

    #[test]
    fn test_degenerate_frame_time_does_not_advance() {
        let mut session = Session::new(ScriptedPoseFeed::new(Vec::new()), controller()).unwrap();
        for dt in [0.0, -0.5, f32::NAN] {
            session.frame(dt);
        }
        assert_eq!(session.now(), SimTime::ZERO);
        assert_eq!(session.frames(), 3);

        // A later valid frame is unaffected by the NaN
        session.frame(0.01);
        assert_eq!(session.now(), SimTime::from_millis(10));
    }

    #[test]
    fn test_run_round_rejects_unusable_frame_time() {
        let mut session = Session::new(ScriptedPoseFeed::new(Vec::new()), controller()).unwrap();
        for dt in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert_eq!(session.run_round(dt, SimTime::from_millis(1_000)), Ok(None));
        }
        assert_eq!(session.controller().phase(), RoundPhase::Idle);
        assert_eq!(session.now(), SimTime::ZERO);
    }
}
