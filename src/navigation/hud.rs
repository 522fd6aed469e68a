//! Heads-up display and overlay projections.
//!
//! Everything in here is derived from the controller's state; nothing is stored. The wall
//! clock shown in the HUD comes from an injected [`Clock`] so the state machine itself stays
//! free of time.

use crate::exhibit::Exhibit;
use std::sync::Arc;

/// Shown as the medium when no exhibit is current.
pub const NO_MEDIUM: &str = "—";
/// Position label at the portal.
pub const FINAL_LABEL: &str = "FINAL";
/// Blinking status text in the HUD corner.
pub const SYSTEM_STATUS: &str = "SYSTEM ACTIVE";

/// Label and enabled state for one on-screen navigation button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlAffordance {
    pub label: &'static str,
    pub enabled: bool,
}

/// Summary shown along the bottom of the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudSummary {
    /// `"<position+1>/<len>"` or `"FINAL"` at the portal.
    pub position_label: String,
    /// Category of the current exhibit, or `"—"`.
    pub medium: String,
    /// `APPROACH` or `NEXT`.
    pub forward: ControlAffordance,
    /// `GO BACK` or `STEP BACK`.
    pub backward: ControlAffordance,
}

impl HudSummary {
    /// Right-hand status line: fixed status text plus the clock reading.
    pub fn status_line(&self, clock: &dyn Clock) -> StatusLine {
        StatusLine { status: SYSTEM_STATUS, time: clock.now_hms() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub status: &'static str,
    pub time: String,
}

/// Tick source for the HUD timestamp.
pub trait Clock: Send + Sync {
    /// Current time as 24-hour `HH:MM:SS`.
    fn now_hms(&self) -> String;
}

/// Wall clock (UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_hms(&self) -> String {
        let now = time::OffsetDateTime::now_utc();
        format!("{:02}:{:02}:{:02}", now.hour(), now.minute(), now.second())
    }
}

/// Always reports the same time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedClock(pub String);

impl Clock for FixedClock {
    fn now_hms(&self) -> String {
        self.0.clone()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_hms(&self) -> String {
        (**self).now_hms()
    }
}

/// Detail panel shown while an exhibit is approached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExhibitDetail {
    pub heading: String,
    pub title: String,
    pub category: String,
    pub description: String,
}

impl From<&Exhibit> for ExhibitDetail {
    fn from(exhibit: &Exhibit) -> Self {
        Self {
            heading: format!("ARTWORK #{}", exhibit.id),
            title: exhibit.title.to_uppercase(),
            category: exhibit.category.clone(),
            description: exhibit.description.clone(),
        }
    }
}

/// Terminal call to action once the sequence is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalNotice {
    pub title: &'static str,
    pub message: &'static str,
    pub cta_label: &'static str,
    pub href: String,
}

impl PortalNotice {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            title: "PORTAL DETECTED",
            message: "FULL PORTFOLIO ACCESS POINT",
            cta_label: "ENTER FULL PORTFOLIO",
            href: href.into(),
        }
    }
}
