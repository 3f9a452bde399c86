//! Text rendering of games: the live court, countdown, feedback and final summaries.
//!
//! Every function here is pure; the engine decides when and where the text is sent.

pub mod court;
pub mod messages;
pub mod summary;

use crate::state::kinematics::TRACK_WIDTH;

/// Title line shared by the countdown and the live frame.
pub const HEADER: &str = "🏀 **MOVING HOOP CHALLENGE**";

/// Horizontal rule spanning the track.
pub fn rule() -> String {
    "═".repeat(TRACK_WIDTH)
}
