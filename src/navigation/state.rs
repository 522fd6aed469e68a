//! Navigation state machine.
//!
//! The visitor's place in the corridor is one of four modes. Positions run over
//! `0..=len`, where `len` is the portal behind the last exhibit:
//!
//! ```text
//!             advance                 advance
//! AtDistance(p) ──────▶ Approached(p) ──────▶ Transitioning(p → p+1) ──settle──▶ AtDistance(p+1)
//!      ▲                    │                                            └──▶ AtPortal (p+1 == len)
//!      └────── retreat ─────┘
//!
//! AtDistance(p), p > 0 ──retreat──▶ Transitioning(p → p-1) ──settle──▶ AtDistance(p-1)
//! AtPortal             ──retreat──▶ Transitioning(len → len-1)
//! ```
//!
//! Combinations such as "approached at the portal" cannot be represented.

use crate::input::Intent;
use std::fmt::{Display, Formatter};

/// Where the visitor is and what they are doing there.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NavigationState {
    /// Standing at the standard viewing distance of the exhibit at this position.
    AtDistance(usize),
    /// Stepped up close to the exhibit at this position.
    Approached(usize),
    /// Moving between stations. Position already reports `to`.
    Transitioning { from: usize, to: usize },
    /// Past the last exhibit.
    AtPortal,
}

/// Why an intent was ignored. Ignored intents are normal races with animation timers, not
/// errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum IgnoredIntent {
    /// A move is still settling.
    Transitioning,
    /// Retreat at the very first station with nothing approached.
    AtStart,
    /// Advance while already at the portal.
    AtPortal,
}

impl Display for IgnoredIntent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IgnoredIntent::Transitioning => write!(f, "transition in progress"),
            IgnoredIntent::AtStart => write!(f, "already at the first exhibit"),
            IgnoredIntent::AtPortal => write!(f, "already at the portal"),
        }
    }
}

/// Outcome of feeding one intent into the state machine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    /// Closed the distance to the exhibit at this position.
    Approached(usize),
    /// Stepped back from the exhibit at this position without moving.
    SteppedBack(usize),
    /// Started moving between stations; a settle must follow.
    Moving { from: usize, to: usize },
    /// Nothing changed.
    Ignored(IgnoredIntent),
}

impl Step {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Step::Ignored(_))
    }
}

impl NavigationState {
    /// Initial state for a sequence of `len` exhibits. An empty sequence starts at the portal.
    pub fn initial(len: usize) -> Self {
        if len == 0 {
            NavigationState::AtPortal
        } else {
            NavigationState::AtDistance(0)
        }
    }

    /// Index into the exhibit sequence, `len` meaning the portal.
    pub fn position(&self, len: usize) -> usize {
        match *self {
            NavigationState::AtDistance(p) | NavigationState::Approached(p) => p,
            NavigationState::Transitioning { to, .. } => to,
            NavigationState::AtPortal => len,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self, NavigationState::Transitioning { .. })
    }

    pub fn is_approached(&self) -> bool {
        matches!(self, NavigationState::Approached(_))
    }

    /// The single transition function for visitor intents.
    pub fn next(self, intent: Intent, len: usize) -> (NavigationState, Step) {
        use NavigationState::*;

        match (self, intent) {
            (Transitioning { .. }, _) => (self, Step::Ignored(IgnoredIntent::Transitioning)),

            (AtDistance(p), Intent::Advance) => (Approached(p), Step::Approached(p)),
            (Approached(p), Intent::Advance) => {
                let to = p + 1;
                (Transitioning { from: p, to }, Step::Moving { from: p, to })
            }
            (AtPortal, Intent::Advance) => (self, Step::Ignored(IgnoredIntent::AtPortal)),

            (Approached(p), Intent::Retreat) => (AtDistance(p), Step::SteppedBack(p)),
            (AtDistance(0), Intent::Retreat) => (self, Step::Ignored(IgnoredIntent::AtStart)),
            (AtDistance(p), Intent::Retreat) => {
                let to = p - 1;
                (Transitioning { from: p, to }, Step::Moving { from: p, to })
            }
            (AtPortal, Intent::Retreat) => {
                if len == 0 {
                    return (self, Step::Ignored(IgnoredIntent::AtStart));
                }
                let to = len - 1;
                (Transitioning { from: len, to }, Step::Moving { from: len, to })
            }
        }
    }

    /// Ends a move. Returns `self` unchanged when nothing is in flight.
    pub fn settle(self, len: usize) -> NavigationState {
        match self {
            NavigationState::Transitioning { to, .. } if to >= len => NavigationState::AtPortal,
            NavigationState::Transitioning { to, .. } => NavigationState::AtDistance(to),
            other => other,
        }
    }
}
