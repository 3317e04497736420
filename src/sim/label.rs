//! Stopwatch and score label formatting

use crate::settings::TickResolution;

/// Format tenth-of-a-second ticks as `MM:SS.t`
pub fn format_tenths(ticks: u64) -> String {
    let minutes = (ticks / 10) / 60;
    let seconds = (ticks / 10) % 60;
    let tenths = ticks - seconds * 10 - minutes * 600;
    format!("{:02}:{:02}.{}", minutes, seconds, tenths)
}

/// Format whole seconds as `MM:SS`
pub fn format_seconds(elapsed_seconds: u64) -> String {
    format!("{:02}:{:02}", elapsed_seconds / 60, elapsed_seconds % 60)
}

/// Stopwatch label for the given tick count at a resolution
pub fn timer_label(ticks: u64, resolution: TickResolution) -> String {
    match resolution {
        TickResolution::Tenths => format_tenths(ticks),
        TickResolution::Seconds => format_seconds(ticks),
    }
}

/// Score label (bare contact count)
pub fn score_label(count: u32) -> String {
    count.to_string()
}
