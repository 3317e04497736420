//! Round state and the events a controller reports
//!
//! A `Round` is replaced wholesale when play starts; nothing is reset field
//! by field.

use serde::{Deserialize, Serialize};

use super::clock::SimTime;
use super::score::ScoreTier;
use crate::platform::BodyHandle;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No ball; start control visible
    Idle,
    /// Ball in play, stopwatch running
    Playing,
    /// Ball fell; result being presented (moves on to Idle immediately)
    Dropped,
}

/// One play session from ball spawn to ball drop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub phase: RoundPhase,
    /// Paddle contacts counted so far (after debounce)
    pub contact_count: u32,
    /// Stopwatch ticks since the round started
    pub elapsed_ticks: u64,
    pub start_time: SimTime,
    /// Increases with every round started by a controller (0 = none yet)
    pub generation: u64,
    /// Set while a counted contact's debounce window is open
    counted: bool,
}

impl Default for Round {
    fn default() -> Self {
        Self::idle()
    }
}

impl Round {
    /// Placeholder before the first round
    pub fn idle() -> Self {
        Self {
            phase: RoundPhase::Idle,
            contact_count: 0,
            elapsed_ticks: 0,
            start_time: SimTime::ZERO,
            generation: 0,
            counted: false,
        }
    }

    /// Fresh round entering play
    pub fn begin(generation: u64, now: SimTime) -> Self {
        Self {
            phase: RoundPhase::Playing,
            start_time: now,
            generation,
            ..Self::idle()
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == RoundPhase::Playing
    }

    /// Whether the debounce window of the last counted contact is still open
    pub fn debounce_open(&self) -> bool {
        self.counted
    }

    /// Count a contact unless one was counted within the debounce window.
    /// Returns true if the score went up.
    pub fn register_contact(&mut self) -> bool {
        if !self.is_playing() || self.counted {
            return false;
        }
        self.contact_count += 1;
        self.counted = true;
        true
    }

    /// Close the debounce window
    pub fn clear_debounce(&mut self) {
        self.counted = false;
    }
}

/// The ball body together with the round that spawned it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallSlot {
    pub body: BodyHandle,
    pub generation: u64,
}

/// Why an input was dropped without effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ignored {
    /// Start pressed while a round is in play
    AlreadyPlaying,
    /// Contact arrived while no round is in play
    NotPlaying,
    /// Contact names a ball that is no longer the current one
    StaleBall,
    /// Contact between bodies that do not score (ground, foreign paddle)
    UnrelatedContact,
    /// Debounce clear for a superseded round
    StaleDebounce,
    /// Tick from a stopped or replaced tick source
    StaleTick,
}

/// What happened during a controller callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    RoundStarted { generation: u64 },
    ContactCounted { count: u32 },
    /// Contact inside an open debounce window
    ContactDebounced,
    Tick { elapsed_ticks: u64 },
    BallDropped {
        generation: u64,
        score: u32,
        tier: ScoreTier,
        elapsed_ticks: u64,
    },
    Ignored(Ignored),
}

/// Result of pressing start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started { generation: u64 },
    /// A round was already in play; nothing changed
    AlreadyPlaying,
}
