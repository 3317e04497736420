//! Racket Lift - an AR balance game where a tracked racket keeps a ball aloft
//!
//! Core modules:
//! - `sim`: Deterministic round logic (state machine, scoring, timers)
//! - `platform`: Collaborator traits (pose feed, physics world, display, sound)
//! - `audio`: Best-effort sound effect playback
//! - `settings`: Data-driven tuning and asset names
//! - `session`: Fixed-step frame driver tying the collaborators together

pub mod audio;
pub mod error;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{AssetLoadError, SetupError, SoundError};
pub use session::Session;
pub use settings::{Settings, TickResolution};
pub use sim::{RoundController, RoundEvent, RoundPhase};

/// Game configuration constants
pub mod consts {
    /// Fixed physics timestep (100 Hz, an exact number of microseconds)
    pub const SIM_DT: f32 = 1.0 / 100.0;
    /// Physics timestep in microseconds of simulated time
    pub const SIM_STEP_MICROS: u64 = 10_000;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the session will integrate (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Tick interval for the tenths-resolution stopwatch (microseconds)
    pub const TENTHS_TICK_MICROS: u64 = 100_000;
    /// Tick interval for the whole-second stopwatch (microseconds)
    pub const SECONDS_TICK_MICROS: u64 = 1_000_000;
    /// Window during which repeated contacts count as one bounce (microseconds)
    pub const CONTACT_DEBOUNCE_MICROS: u64 = 100_000;
    /// Longest debounce window accepted from settings (milliseconds)
    pub const MAX_DEBOUNCE_MS: u64 = 10_000;

    /// Ball counts as dropped once it is this far above the paddle origin or lower
    pub const DROP_CLEARANCE: f32 = 0.2;
    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.1;
    pub const BALL_RESTITUTION: f32 = 2.0;
    /// Ball spawn position relative to the paddle origin
    pub const BALL_SPAWN_OFFSET: [f32; 3] = [0.0, 0.3, -0.3];
    /// Paddle pose before the first pose update arrives (camera space)
    pub const PADDLE_REST_POSITION: [f32; 3] = [0.0, -0.3, -0.8];

    /// Collision categories
    pub const CATEGORY_PADDLE: u32 = 1;
    pub const CATEGORY_BALL: u32 = 2;
    pub const CATEGORY_GROUND: u32 = 4;
}
