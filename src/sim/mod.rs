//! Deterministic round logic
//!
//! All gameplay rules live here. This module must stay deterministic:
//! - Virtual time only (`SimTime`), never the wall clock
//! - Timers fire in (due time, scheduling order) order
//! - Collaborators are reached only through `platform` traits

pub mod clock;
pub mod controller;
pub mod label;
pub mod score;
pub mod state;

pub use clock::{SimTime, Task, TimerQueue};
pub use controller::RoundController;
pub use label::{format_seconds, format_tenths, score_label, timer_label};
pub use score::{ScoreTier, result_label, result_message};
pub use state::{BallSlot, Ignored, Round, RoundEvent, RoundPhase, StartOutcome};
