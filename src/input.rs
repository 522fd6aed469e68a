//! Navigation intents coming from the visitor.
//!
//! The presentation layer turns button presses and key presses into one of two discrete
//! [`Intent`]s. Intents are fire-and-forget: an intent that arrives at a bad moment is
//! simply ignored by the controller.

use std::fmt::{Display, Formatter};

/// A discrete navigation request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Step towards the current exhibit, or on to the next one when already close.
    Advance,
    /// Step back from the current exhibit, or back to the previous one.
    Retreat,
}

impl Intent {
    /// Maps a keyboard key name (DOM `KeyboardEvent.key` style) to an intent.
    ///
    /// `ArrowUp`, `w` and `W` advance. `ArrowDown`, `s` and `S` retreat.
    pub fn from_key(key: &str) -> Option<Intent> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Intent::Advance),
            "ArrowDown" | "s" | "S" => Some(Intent::Retreat),
            _ => None,
        }
    }
}

impl Display for Intent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Advance => write!(f, "Advance"),
            Intent::Retreat => write!(f, "Retreat"),
        }
    }
}
