//! Game settings and tuning
//!
//! Loaded from a JSON file next to the binary; every field has a default so
//! partial files are fine.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Stopwatch resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TickResolution {
    /// 0.1 s ticks, label `MM:SS.t`
    #[default]
    Tenths,
    /// 1 s ticks, label `MM:SS`
    Seconds,
}

impl TickResolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            TickResolution::Tenths => "tenths",
            TickResolution::Seconds => "seconds",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tenths" | "0.1" => Some(TickResolution::Tenths),
            "seconds" | "secs" | "1" => Some(TickResolution::Seconds),
            _ => None,
        }
    }

    /// Tick source interval in microseconds
    pub fn tick_micros(&self) -> u64 {
        match self {
            TickResolution::Tenths => TENTHS_TICK_MICROS,
            TickResolution::Seconds => SECONDS_TICK_MICROS,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Round ===
    pub tick_resolution: TickResolution,
    /// Contact debounce window (milliseconds)
    pub debounce_ms: u64,
    /// Ball below paddle height plus this margin ends the round
    pub drop_clearance: f32,

    // === Ball ===
    /// Spawn position relative to the paddle
    pub ball_spawn_offset: Vec3,
    pub ball_radius: f32,
    /// Bounciness handed to the physics world
    pub ball_restitution: f32,
    /// Velocity change applied to a freshly spawned ball
    pub spawn_impulse: Vec3,

    // === Paddle ===
    /// Paddle position used before the first pose update
    pub paddle_rest_position: Vec3,

    // === Assets ===
    pub paddle_model: String,
    pub contact_clip: String,
    pub end_clip: String,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_resolution: TickResolution::Tenths,
            debounce_ms: CONTACT_DEBOUNCE_MICROS / 1_000,
            drop_clearance: DROP_CLEARANCE,

            ball_spawn_offset: Vec3::from_array(BALL_SPAWN_OFFSET),
            ball_radius: BALL_RADIUS,
            ball_restitution: BALL_RESTITUTION,
            spawn_impulse: Vec3::ZERO,

            paddle_rest_position: Vec3::from_array(PADDLE_REST_POSITION),

            paddle_model: "racket.usdz".to_string(),
            contact_clip: "pingpong1".to_string(),
            end_clip: "end".to_string(),

            master_volume: 1.0,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::validated)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Ignoring malformed settings {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                log::info!("Using default settings ({}: {err})", path.display());
                Self::default()
            }
        }
    }

    /// Clamp out-of-range values
    pub fn validated(mut self) -> Self {
        self.debounce_ms = self.debounce_ms.clamp(1, MAX_DEBOUNCE_MS);
        self.drop_clearance = self.drop_clearance.max(0.0);
        if !(self.ball_radius > 0.0) {
            self.ball_radius = BALL_RADIUS;
        }
        self.ball_restitution = self.ball_restitution.max(0.0);
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }

    /// Debounce window in microseconds
    pub fn debounce_micros(&self) -> u64 {
        self.debounce_ms.saturating_mul(1_000)
    }

    /// Stopwatch interval in microseconds
    pub fn tick_micros(&self) -> u64 {
        self.tick_resolution.tick_micros()
    }
}
