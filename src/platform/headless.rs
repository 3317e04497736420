//! In-memory collaborators for tests and the native demo
//!
//! `HeadlessWorld` is a tiny point-mass world: balls fall under gravity and
//! bounce off the paddle's circular face (horizontal, ignoring tilt) and off
//! ground planes. It is deterministic for a given sequence of calls.

use std::collections::{HashSet, VecDeque};

use glam::{Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{
    BodyHandle, BodyKind, BodySpec, BodyTag, CollisionMask, ContactBody, ContactEvent,
    DisplaySurface, PhysicsWorld, Pose, PoseFeed, SoundTrigger,
};
use crate::consts::PADDLE_REST_POSITION;
use crate::error::{AssetLoadError, SoundError};

/// Tuning for the headless world
#[derive(Debug, Clone)]
pub struct HeadlessWorldConfig {
    /// Vertical acceleration (m/s²)
    pub gravity: f32,
    /// Centre of the paddle face relative to the paddle origin (the grip)
    pub face_offset: Vec3,
    /// Radius of the paddle face
    pub face_radius: f32,
    /// Cap on rebound speed so bouncy balls settle into a steady rhythm
    pub max_rebound_speed: f32,
    /// Model assets that load successfully
    pub models: Vec<String>,
}

impl Default for HeadlessWorldConfig {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            face_offset: Vec3::new(0.0, 0.2, -0.3),
            face_radius: 0.15,
            max_rebound_speed: 3.0,
            models: vec!["racket.usdz".to_string(), "spoonModel.usdz".to_string()],
        }
    }
}

#[derive(Debug, Clone)]
struct Body {
    tag: BodyTag,
    kind: BodyKind,
    mask: CollisionMask,
    pos: Vec3,
    /// Stored for hosts; the face is treated as level in contacts
    orientation: Quat,
    vel: Vec3,
    /// Position at the start of the last step (kinematic velocity source)
    anchor: Vec3,
    radius: f32,
    restitution: f32,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    body: Option<Body>,
}

/// Point-mass physics world with generation-checked handles
#[derive(Debug, Default)]
pub struct HeadlessWorld {
    config: HeadlessWorldConfig,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl HeadlessWorld {
    pub fn new(config: HeadlessWorldConfig) -> Self {
        Self {
            config,
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn config(&self) -> &HeadlessWorldConfig {
        &self.config
    }

    /// Number of live bodies with the given tag
    pub fn count(&self, tag: BodyTag) -> usize {
        self.bodies().filter(|(_, b)| b.tag == tag).count()
    }

    /// Velocity of a live body
    pub fn velocity(&self, handle: BodyHandle) -> Option<Vec3> {
        self.body(handle).map(|b| b.vel)
    }

    /// Orientation of a live body
    pub fn orientation(&self, handle: BodyHandle) -> Option<Quat> {
        self.body(handle).map(|b| b.orientation)
    }

    /// Move any live body (test setup)
    pub fn teleport(&mut self, handle: BodyHandle, position: Vec3) -> bool {
        match self.body_mut(handle) {
            Some(body) => {
                body.pos = position;
                body.anchor = position;
                true
            }
            None => false,
        }
    }

    fn body(&self, handle: BodyHandle) -> Option<&Body> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.body.as_ref()
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.body.as_mut()
    }

    fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.body.as_ref().map(|b| {
                (
                    BodyHandle {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    b,
                )
            })
        })
    }
}

impl PhysicsWorld for HeadlessWorld {
    fn spawn(&mut self, spec: &BodySpec) -> Result<BodyHandle, AssetLoadError> {
        if let Some(model) = &spec.model {
            if !self.config.models.iter().any(|m| m == model) {
                return Err(AssetLoadError::new(model.clone(), "model not found"));
            }
        }

        let body = Body {
            tag: spec.tag,
            kind: spec.kind,
            mask: spec.mask,
            pos: spec.pose.position,
            orientation: spec.pose.orientation,
            vel: Vec3::ZERO,
            anchor: spec.pose.position,
            radius: spec.radius,
            restitution: spec.restitution,
        };

        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.generation += 1;
        slot.body = Some(body);
        Ok(BodyHandle {
            index,
            generation: slot.generation,
        })
    }

    fn despawn(&mut self, handle: BodyHandle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.index as usize) else {
            return false;
        };
        if slot.generation != handle.generation || slot.body.is_none() {
            return false;
        }
        slot.body = None;
        self.free.push(handle.index);
        true
    }

    fn position(&self, handle: BodyHandle) -> Option<Vec3> {
        self.body(handle).map(|b| b.pos)
    }

    fn set_pose(&mut self, handle: BodyHandle, pose: Pose) -> bool {
        match self.body_mut(handle) {
            Some(body) if body.kind == BodyKind::Kinematic => {
                body.pos = pose.position;
                body.orientation = pose.orientation;
                true
            }
            _ => false,
        }
    }

    fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3) -> bool {
        match self.body_mut(handle) {
            Some(body) if body.kind == BodyKind::Dynamic => {
                body.vel += impulse;
                true
            }
            _ => false,
        }
    }

    fn step(&mut self, dt: f32, contacts: &mut Vec<ContactEvent>) {
        if dt <= 0.0 {
            return;
        }
        let gravity = self.config.gravity;

        for slot in &mut self.slots {
            let Some(body) = slot.body.as_mut() else {
                continue;
            };
            match body.kind {
                BodyKind::Kinematic => {
                    body.vel = (body.pos - body.anchor) / dt;
                    body.anchor = body.pos;
                }
                BodyKind::Dynamic => {
                    body.vel.y += gravity * dt;
                    body.pos += body.vel * dt;
                    body.anchor = body.pos;
                }
                BodyKind::Static => {}
            }
        }

        // Snapshot colliders so balls can be mutated below
        let colliders: Vec<(ContactBody, Body)> = self
            .bodies()
            .filter(|(_, b)| b.kind != BodyKind::Dynamic)
            .map(|(handle, b)| (ContactBody { handle, tag: b.tag }, b.clone()))
            .collect();

        let face_offset = self.config.face_offset;
        let face_radius = self.config.face_radius;
        let max_rebound = self.config.max_rebound_speed;

        for index in 0..self.slots.len() {
            let generation = self.slots[index].generation;
            let Some(ball) = self.slots[index].body.as_mut() else {
                continue;
            };
            if ball.kind != BodyKind::Dynamic {
                continue;
            }
            let ball_side = ContactBody {
                handle: BodyHandle {
                    index: index as u32,
                    generation,
                },
                tag: ball.tag,
            };

            for (other_side, other) in &colliders {
                let (surface_y, surface_vel_y, inside) = match other.tag {
                    BodyTag::Paddle => {
                        let face = other.pos + face_offset;
                        let rel = ball.pos - face;
                        let horizontal = (rel.x * rel.x + rel.z * rel.z).sqrt();
                        let inside = horizontal <= face_radius
                            && rel.y <= ball.radius
                            && rel.y > -ball.radius;
                        (face.y, other.vel.y, inside)
                    }
                    _ => {
                        let inside = ball.pos.y - ball.radius <= other.pos.y;
                        (other.pos.y, 0.0, inside)
                    }
                };
                if !inside {
                    continue;
                }

                let rel_vel_y = ball.vel.y - surface_vel_y;
                if rel_vel_y >= 0.0 {
                    continue;
                }
                let restitution = if other.tag == BodyTag::Paddle {
                    ball.restitution
                } else {
                    other.restitution
                };
                let rebound = (-rel_vel_y * restitution).min(max_rebound);
                let before = ball.vel.y;
                ball.vel.y = surface_vel_y + rebound;
                ball.pos.y = surface_y + ball.radius;
                ball.anchor = ball.pos;

                if ball.mask.reports(&other.mask) {
                    contacts.push(ContactEvent {
                        a: *other_side,
                        b: ball_side,
                        impulse: (ball.vel.y - before).abs(),
                    });
                }
            }
        }
    }
}

/// One change pushed to a `RecordingDisplay`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayUpdate {
    Score(String),
    Timer(String),
    Result(Option<String>),
    StartVisible(bool),
}

/// Display surface that keeps the latest text and a history of updates
#[derive(Debug, Clone)]
pub struct RecordingDisplay {
    pub score: String,
    pub timer: String,
    pub result: Option<String>,
    pub start_visible: bool,
    pub history: Vec<DisplayUpdate>,
}

impl Default for RecordingDisplay {
    fn default() -> Self {
        Self {
            score: String::new(),
            timer: String::new(),
            result: None,
            start_visible: true,
            history: Vec::new(),
        }
    }
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySurface for RecordingDisplay {
    fn show_score(&mut self, text: &str) {
        self.score = text.to_string();
        self.history.push(DisplayUpdate::Score(self.score.clone()));
    }

    fn show_timer(&mut self, text: &str) {
        self.timer = text.to_string();
        self.history.push(DisplayUpdate::Timer(self.timer.clone()));
    }

    fn show_result(&mut self, text: Option<&str>) {
        self.result = text.map(str::to_string);
        self.history.push(DisplayUpdate::Result(self.result.clone()));
    }

    fn set_start_visible(&mut self, visible: bool) {
        self.start_visible = visible;
        self.history.push(DisplayUpdate::StartVisible(visible));
    }
}

/// Sound trigger that records plays and fails for unknown clips
#[derive(Debug, Clone, Default)]
pub struct RecordingSound {
    clips: HashSet<String>,
    pub played: Vec<(String, f32)>,
    pub failures: usize,
}

impl RecordingSound {
    /// Trigger where only `clips` exist
    pub fn with_clips(clips: &[&str]) -> Self {
        Self {
            clips: clips.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Trigger with no clips at all (every play fails)
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn play_count(&self, clip: &str) -> usize {
        self.played.iter().filter(|(c, _)| c == clip).count()
    }
}

impl SoundTrigger for RecordingSound {
    fn preload(&mut self, clip: &str) -> Result<(), SoundError> {
        if self.clips.contains(clip) {
            Ok(())
        } else {
            Err(SoundError::MissingClip(clip.to_string()))
        }
    }

    fn play(&mut self, clip: &str, volume: f32) -> Result<(), SoundError> {
        if !self.clips.contains(clip) {
            self.failures += 1;
            return Err(SoundError::MissingClip(clip.to_string()));
        }
        self.played.push((clip.to_string(), volume));
        Ok(())
    }
}

/// Pose feed replaying a fixed list of poses
#[derive(Debug, Clone)]
pub struct ScriptedPoseFeed {
    poses: VecDeque<Pose>,
    available: bool,
}

impl ScriptedPoseFeed {
    pub fn new(poses: impl IntoIterator<Item = Pose>) -> Self {
        Self {
            poses: poses.into_iter().collect(),
            available: true,
        }
    }

    /// Feed for a device without pose tracking
    pub fn unavailable() -> Self {
        Self {
            poses: VecDeque::new(),
            available: false,
        }
    }

    pub fn push(&mut self, pose: Pose) {
        self.poses.push_back(pose);
    }
}

impl PoseFeed for ScriptedPoseFeed {
    fn is_available(&self) -> bool {
        self.available
    }

    fn next_pose(&mut self) -> Option<Pose> {
        self.poses.pop_front()
    }
}

/// Seeded "player" whose hands drift around the rest position
#[derive(Debug, Clone)]
pub struct AutopilotFeed {
    rng: Pcg32,
    rest: Vec3,
    drift: Vec3,
    /// Largest horizontal hand movement per frame (metres)
    pub wobble: f32,
    /// Fraction of the drift kept each frame (pull back toward rest)
    pub recovery: f32,
}

impl AutopilotFeed {
    pub fn new(seed: u64, wobble: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            rest: Vec3::from_array(PADDLE_REST_POSITION),
            drift: Vec3::ZERO,
            wobble,
            recovery: 0.995,
        }
    }

    pub fn drift(&self) -> Vec3 {
        self.drift
    }
}

impl PoseFeed for AutopilotFeed {
    fn is_available(&self) -> bool {
        true
    }

    fn next_pose(&mut self) -> Option<Pose> {
        let step = Vec3::new(
            self.rng.random_range(-1.0..=1.0),
            0.0,
            self.rng.random_range(-1.0..=1.0),
        ) * self.wobble;
        self.drift = self.drift * self.recovery + step;
        Some(Pose::at(self.rest + self.drift))
    }
}
