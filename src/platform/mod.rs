//! Platform abstraction layer
//!
//! The round logic never talks to an AR session, a scene graph or an audio
//! engine directly. It goes through these collaborator traits:
//! - `PoseFeed`: device pose every frame (drives the paddle)
//! - `PhysicsWorld`: bodies, contacts and impulses
//! - `DisplaySurface`: score/timer/result text and the start control
//! - `SoundTrigger`: fire-and-forget clips
//!
//! `headless` provides in-memory implementations of all four.

pub mod headless;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::{CATEGORY_BALL, CATEGORY_GROUND, CATEGORY_PADDLE};
use crate::error::{AssetLoadError, SoundError};

/// Device or body pose in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Upright pose at a position
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }
}

/// Generation-tagged reference to a body owned by the physics world.
///
/// A world must reject a handle whose slot has since been freed or reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle {
    pub index: u32,
    pub generation: u32,
}

/// Role of a body in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyTag {
    Paddle,
    Ball,
    Ground,
}

impl BodyTag {
    /// Scene node name
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyTag::Paddle => "racket",
            BodyTag::Ball => "ball",
            BodyTag::Ground => "ground",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "racket" | "paddle" | "spoon" => Some(BodyTag::Paddle),
            "ball" => Some(BodyTag::Ball),
            "ground" | "floor" => Some(BodyTag::Ground),
            _ => None,
        }
    }
}

/// How the world moves a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Pose set directly by the host, unaffected by forces
    Kinematic,
    /// Integrated by the world (gravity, impulses, contacts)
    Dynamic,
    /// Never moves
    Static,
}

/// Category and contact-test bitmasks, fixed when the body is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionMask {
    pub category: u32,
    pub contact: u32,
}

impl CollisionMask {
    pub const PADDLE: CollisionMask = CollisionMask {
        category: CATEGORY_PADDLE,
        contact: CATEGORY_BALL,
    };
    pub const BALL: CollisionMask = CollisionMask {
        category: CATEGORY_BALL,
        contact: CATEGORY_PADDLE,
    };
    pub const GROUND: CollisionMask = CollisionMask {
        category: CATEGORY_GROUND,
        contact: CATEGORY_BALL,
    };

    /// Whether a contact between the two bodies should be reported
    pub fn reports(&self, other: &CollisionMask) -> bool {
        self.contact & other.category != 0 || other.contact & self.category != 0
    }
}

/// Everything a world needs to create a body
#[derive(Debug, Clone, PartialEq)]
pub struct BodySpec {
    pub tag: BodyTag,
    pub kind: BodyKind,
    pub mask: CollisionMask,
    pub pose: Pose,
    pub radius: f32,
    pub restitution: f32,
    /// Model asset backing the body's shape, if any
    pub model: Option<String>,
}

impl BodySpec {
    pub fn paddle(model: impl Into<String>, pose: Pose) -> Self {
        Self {
            tag: BodyTag::Paddle,
            kind: BodyKind::Kinematic,
            mask: CollisionMask::PADDLE,
            pose,
            radius: 0.0,
            restitution: 1.0,
            model: Some(model.into()),
        }
    }

    pub fn ball(pose: Pose, radius: f32, restitution: f32) -> Self {
        Self {
            tag: BodyTag::Ball,
            kind: BodyKind::Dynamic,
            mask: CollisionMask::BALL,
            pose,
            radius,
            restitution,
            model: None,
        }
    }

    /// Horizontal ground plane at `height`
    pub fn ground(height: f32) -> Self {
        Self {
            tag: BodyTag::Ground,
            kind: BodyKind::Static,
            mask: CollisionMask::GROUND,
            pose: Pose::at(Vec3::new(0.0, height, 0.0)),
            radius: 0.0,
            restitution: 0.5,
            model: None,
        }
    }
}

/// One side of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContactBody {
    pub handle: BodyHandle,
    pub tag: BodyTag,
}

/// Two bodies began touching
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub a: ContactBody,
    pub b: ContactBody,
    /// Magnitude of the velocity change applied by the world
    pub impulse: f32,
}

impl ContactEvent {
    /// The two bodies ordered as (`first`, `second`) by tag, if they match
    pub fn pair(&self, first: BodyTag, second: BodyTag) -> Option<(ContactBody, ContactBody)> {
        if self.a.tag == first && self.b.tag == second {
            Some((self.a, self.b))
        } else if self.b.tag == first && self.a.tag == second {
            Some((self.b, self.a))
        } else {
            None
        }
    }
}

/// Device pose source driving the paddle
pub trait PoseFeed {
    /// False when the device cannot track its pose at all
    fn is_available(&self) -> bool;

    /// Latest pose for this frame, if one arrived
    fn next_pose(&mut self) -> Option<Pose>;
}

/// Rigid-body world owned by the platform
pub trait PhysicsWorld {
    fn spawn(&mut self, spec: &BodySpec) -> Result<BodyHandle, AssetLoadError>;

    /// Remove a body. Returns false for stale handles.
    fn despawn(&mut self, handle: BodyHandle) -> bool;

    /// Current position, `None` for stale handles
    fn position(&self, handle: BodyHandle) -> Option<Vec3>;

    /// Set a kinematic body's position and orientation. Returns false for
    /// stale handles.
    fn set_pose(&mut self, handle: BodyHandle, pose: Pose) -> bool;

    /// Apply an instantaneous velocity change to a dynamic body
    fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3) -> bool;

    /// Advance the simulation by `dt` seconds, appending contact-begin events
    fn step(&mut self, dt: f32, contacts: &mut Vec<ContactEvent>);
}

/// Text and control surface
pub trait DisplaySurface {
    fn show_score(&mut self, text: &str);
    fn show_timer(&mut self, text: &str);
    /// `None` hides the result panel
    fn show_result(&mut self, text: Option<&str>);
    fn set_start_visible(&mut self, visible: bool);
}

/// Fire-and-forget sound clips
pub trait SoundTrigger {
    /// Check a clip can be played later
    fn preload(&mut self, _clip: &str) -> Result<(), SoundError> {
        Ok(())
    }

    fn play(&mut self, clip: &str, volume: f32) -> Result<(), SoundError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_report_ball_paddle_only() {
        assert!(CollisionMask::PADDLE.reports(&CollisionMask::BALL));
        assert!(CollisionMask::BALL.reports(&CollisionMask::PADDLE));
        assert!(CollisionMask::GROUND.reports(&CollisionMask::BALL));
        assert!(!CollisionMask::GROUND.reports(&CollisionMask::PADDLE));
    }

    #[test]
    fn test_contact_pair_orders_by_tag() {
        let paddle = ContactBody {
            handle: BodyHandle {
                index: 0,
                generation: 1,
            },
            tag: BodyTag::Paddle,
        };
        let ball = ContactBody {
            handle: BodyHandle {
                index: 1,
                generation: 1,
            },
            tag: BodyTag::Ball,
        };
        let contact = ContactEvent {
            a: ball,
            b: paddle,
            impulse: 1.0,
        };
        assert_eq!(contact.pair(BodyTag::Paddle, BodyTag::Ball), Some((paddle, ball)));
        assert_eq!(contact.pair(BodyTag::Ground, BodyTag::Ball), None);
    }

    #[test]
    fn test_tag_names() {
        assert_eq!(BodyTag::from_name("Racket"), Some(BodyTag::Paddle));
        assert_eq!(BodyTag::from_name("spoon"), Some(BodyTag::Paddle));
        assert_eq!(BodyTag::from_name(BodyTag::Ball.as_str()), Some(BodyTag::Ball));
        assert_eq!(BodyTag::from_name("wall"), None);
    }
}
