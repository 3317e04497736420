//! Round controller
//!
//! Owns the round lifecycle (Idle → Playing → Dropped → Idle), the ball, the
//! contact debounce and the stopwatch. Every entry point is a synchronous
//! callback; the host must deliver pose updates, contacts and clock advances
//! one at a time in arrival order.

use std::mem;

use glam::Vec3;

use super::clock::{SimTime, Task, TimerQueue};
use super::label::{score_label, timer_label};
use super::score::{ScoreTier, result_label};
use super::state::{BallSlot, Ignored, Round, RoundEvent, RoundPhase, StartOutcome};
use crate::audio::{AudioManager, SoundEffect};
use crate::error::SetupError;
use crate::platform::{
    BodyHandle, BodySpec, BodyTag, ContactEvent, DisplaySurface, PhysicsWorld, Pose, SoundTrigger,
};
use crate::settings::Settings;

pub struct RoundController<W, D, S>
where
    W: PhysicsWorld,
    D: DisplaySurface,
    S: SoundTrigger,
{
    settings: Settings,
    world: W,
    display: D,
    audio: AudioManager<S>,
    round: Round,
    paddle: Option<BodyHandle>,
    ball: Option<BallSlot>,
    last_pose: Pose,
    timers: TimerQueue,
    now: SimTime,
    last_generation: u64,
    events: Vec<RoundEvent>,
    contact_buf: Vec<ContactEvent>,
}

impl<W, D, S> RoundController<W, D, S>
where
    W: PhysicsWorld,
    D: DisplaySurface,
    S: SoundTrigger,
{
    pub fn new(settings: Settings, world: W, display: D, sound: S) -> Self {
        let settings = settings.validated();
        let audio = AudioManager::new(sound, &settings);
        let last_pose = Pose::at(settings.paddle_rest_position);
        Self {
            settings,
            world,
            display,
            audio,
            round: Round::idle(),
            paddle: None,
            ball: None,
            last_pose,
            timers: TimerQueue::new(),
            now: SimTime::ZERO,
            last_generation: 0,
            events: Vec::new(),
            contact_buf: Vec::new(),
        }
    }

    /// Create the paddle body and check sound clips.
    ///
    /// A paddle model that fails to load is reported and leaves the controller
    /// unable to start; missing sounds only disable playback.
    pub fn setup(&mut self) -> Result<(), SetupError> {
        if self.paddle.is_some() {
            return Ok(());
        }

        let spec = BodySpec::paddle(self.settings.paddle_model.clone(), self.last_pose);
        let paddle = self.world.spawn(&spec).map_err(|err| {
            log::error!("Paddle setup failed: {err}");
            SetupError::from(err)
        })?;
        self.paddle = Some(paddle);

        let missing = self.audio.preload();
        if missing > 0 {
            log::warn!("{missing} sound clip(s) unavailable, continuing without them");
        }

        self.display.show_score(&score_label(0));
        self.display
            .show_timer(&timer_label(0, self.settings.tick_resolution));
        self.display.show_result(None);
        self.display.set_start_visible(true);
        log::info!("Paddle ready ({})", self.settings.paddle_model);
        Ok(())
    }

    /// Start a round (Idle → Playing).
    ///
    /// Pressing start while a round is in play changes nothing. If the ball
    /// cannot be created the controller stays Idle.
    pub fn start(&mut self) -> Result<StartOutcome, SetupError> {
        if self.round.is_playing() {
            self.ignore(Ignored::AlreadyPlaying);
            return Ok(StartOutcome::AlreadyPlaying);
        }
        let paddle = self.paddle.ok_or(SetupError::NotReady)?;

        if let Some(old) = self.ball.take() {
            self.world.despawn(old.body);
        }

        let paddle_pos = self
            .world
            .position(paddle)
            .unwrap_or(self.last_pose.position);
        let spawn_at = paddle_pos + self.settings.ball_spawn_offset;
        let spec = BodySpec::ball(
            Pose::at(spawn_at),
            self.settings.ball_radius,
            self.settings.ball_restitution,
        );
        let body = self.world.spawn(&spec).map_err(|err| {
            log::error!("Ball spawn failed: {err}");
            SetupError::from(err)
        })?;
        if self.settings.spawn_impulse != Vec3::ZERO
            && !self.world.apply_impulse(body, self.settings.spawn_impulse)
        {
            log::warn!("Spawn impulse rejected by physics world");
        }

        self.last_generation += 1;
        let generation = self.last_generation;
        self.ball = Some(BallSlot { body, generation });
        self.round = Round::begin(generation, self.now);
        self.timers
            .start_ticks(self.now, self.settings.tick_micros());

        self.display.show_result(None);
        self.display.show_score(&score_label(0));
        self.display
            .show_timer(&timer_label(0, self.settings.tick_resolution));
        self.display.set_start_visible(false);

        self.events.push(RoundEvent::RoundStarted { generation });
        log::info!("Round {generation} started, ball at {spawn_at:?}");
        Ok(StartOutcome::Started { generation })
    }

    /// Drive the paddle from a device pose
    pub fn on_pose(&mut self, pose: Pose) {
        self.last_pose = pose;
        if let Some(paddle) = self.paddle {
            if !self.world.set_pose(paddle, pose) {
                log::warn!("Paddle body missing, pose update dropped");
            }
        }
    }

    /// Handle a contact-begin report from the physics world
    pub fn on_contact(&mut self, contact: &ContactEvent) {
        let Some((paddle, ball)) = contact.pair(BodyTag::Paddle, BodyTag::Ball) else {
            self.ignore(Ignored::UnrelatedContact);
            return;
        };
        if self.paddle != Some(paddle.handle) {
            self.ignore(Ignored::UnrelatedContact);
            return;
        }
        if !self.round.is_playing() {
            self.ignore(Ignored::NotPlaying);
            return;
        }
        let Some(slot) = self.ball.filter(|slot| slot.body == ball.handle) else {
            self.ignore(Ignored::StaleBall);
            return;
        };

        self.audio.play(SoundEffect::Contact);

        if self.round.register_contact() {
            let count = self.round.contact_count;
            log::debug!("Contacts: {count}");
            self.display.show_score(&score_label(count));
            self.timers.schedule_once(
                self.now.after(self.settings.debounce_micros()),
                Task::ClearDebounce {
                    generation: slot.generation,
                },
            );
            self.events.push(RoundEvent::ContactCounted { count });
        } else {
            self.events.push(RoundEvent::ContactDebounced);
        }
    }

    /// Advance the physics world by `dt` seconds and dispatch its contacts
    pub fn step_world(&mut self, dt: f32) -> usize {
        let mut contacts = mem::take(&mut self.contact_buf);
        self.world.step(dt, &mut contacts);
        let reported = contacts.len();
        for contact in contacts.drain(..) {
            self.on_contact(&contact);
        }
        self.contact_buf = contacts;
        reported
    }

    /// Fire every timer due at or before `now`, in due order
    pub fn advance_to(&mut self, now: SimTime) {
        while let Some((due, task)) = self.timers.pop_due(now) {
            self.now = self.now.max(due);
            match task {
                Task::ClearDebounce { generation } => self.clear_debounce(generation),
                Task::Tick { source } => self.on_tick(source),
            }
        }
        self.now = self.now.max(now);
    }

    /// Advance the clock by `micros`
    pub fn advance_by(&mut self, micros: u64) {
        self.advance_to(self.now.after(micros));
    }

    fn clear_debounce(&mut self, generation: u64) {
        if generation != self.round.generation {
            self.ignore(Ignored::StaleDebounce);
            return;
        }
        self.round.clear_debounce();
    }

    fn on_tick(&mut self, source: u64) {
        if self.timers.active_tick_source() != Some(source) || !self.round.is_playing() {
            self.ignore(Ignored::StaleTick);
            return;
        }

        self.round.elapsed_ticks += 1;
        let elapsed_ticks = self.round.elapsed_ticks;
        self.display
            .show_timer(&timer_label(elapsed_ticks, self.settings.tick_resolution));
        self.display.show_score(&score_label(self.round.contact_count));
        self.events.push(RoundEvent::Tick { elapsed_ticks });

        if self.ball_below_paddle() {
            self.drop_ball();
        }
    }

    /// Drop check, revalidating both handles against the world
    fn ball_below_paddle(&self) -> bool {
        let Some(slot) = self.ball else {
            return true;
        };
        let Some(ball_pos) = self.world.position(slot.body) else {
            log::warn!("Ball body vanished from the world, ending round");
            return true;
        };
        let paddle_y = self
            .paddle
            .and_then(|p| self.world.position(p))
            .unwrap_or(self.last_pose.position)
            .y;
        ball_pos.y < paddle_y + self.settings.drop_clearance
    }

    /// Playing → Dropped → Idle
    fn drop_ball(&mut self) {
        self.timers.stop_ticks();
        if let Some(slot) = self.ball.take() {
            self.world.despawn(slot.body);
        }
        self.round.phase = RoundPhase::Dropped;

        let score = self.round.contact_count;
        let tier = ScoreTier::for_count(score);
        self.display.show_result(Some(&result_label(score)));
        self.audio.play(SoundEffect::End);
        self.display.set_start_visible(true);

        self.events.push(RoundEvent::BallDropped {
            generation: self.round.generation,
            score,
            tier,
            elapsed_ticks: self.round.elapsed_ticks,
        });
        log::info!(
            "Round {} over after {} ticks: score {} ({})",
            self.round.generation,
            self.round.elapsed_ticks,
            score,
            tier.message()
        );

        self.round.phase = RoundPhase::Idle;
    }

    fn ignore(&mut self, reason: Ignored) {
        log::debug!("Ignored input: {reason:?}");
        self.events.push(RoundEvent::Ignored(reason));
    }

    /// Take the events reported since the last call
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        mem::take(&mut self.events)
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn phase(&self) -> RoundPhase {
        self.round.phase
    }

    pub fn ball(&self) -> Option<BallSlot> {
        self.ball
    }

    pub fn paddle(&self) -> Option<BodyHandle> {
        self.paddle
    }

    pub fn last_pose(&self) -> Pose {
        self.last_pose
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn audio(&self) -> &AudioManager<S> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager<S> {
        &mut self.audio
    }
}
