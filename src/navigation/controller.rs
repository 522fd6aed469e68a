use crate::config::GalleryConfig;
use crate::exhibit::{Exhibit, Exhibits};
use crate::input::Intent;
use crate::navigation::camera::{CameraTarget, SceneLayout};
use crate::navigation::hud::{ControlAffordance, ExhibitDetail, HudSummary, PortalNotice, FINAL_LABEL, NO_MEDIUM};
use crate::navigation::state::{NavigationState, Step};
use log::debug;
use std::time::Duration;

/// Result of ending a move.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Settled {
    /// Position the visitor arrived at.
    pub position: usize,
    /// True only on the settle that first reaches the portal.
    pub exhausted_now: bool,
}

/// Owns the visitor's navigation state for one gallery session.
///
/// [`advance`](Self::advance) and [`retreat`](Self::retreat) are the only intent-driven
/// mutators and never fail; an intent that cannot apply is ignored and reported as
/// [`Step::Ignored`]. A move leaves the controller transitioning until
/// [`settle`](Self::settle) is called, which the session does once the settle interval has
/// elapsed. Everything else is a read-only projection of the current state.
#[derive(Debug, Clone)]
pub struct GalleryController {
    exhibits: Exhibits,
    state: NavigationState,
    sequence_exhausted: bool,
    layout: SceneLayout,
    settle_interval: Duration,
    portal_href: String,
}

impl GalleryController {
    pub fn new(exhibits: Exhibits, config: &GalleryConfig) -> Self {
        let state = NavigationState::initial(exhibits.len());

        Self {
            // An empty sequence starts at the portal, so it is exhausted from the outset.
            sequence_exhausted: state == NavigationState::AtPortal,
            exhibits,
            state,
            layout: config.layout,
            settle_interval: config.settle_interval,
            portal_href: config.portal_href.clone(),
        }
    }

    pub fn advance(&mut self) -> Step {
        self.apply(Intent::Advance)
    }

    pub fn retreat(&mut self) -> Step {
        self.apply(Intent::Retreat)
    }

    /// Feeds one intent through the state machine.
    pub fn apply(&mut self, intent: Intent) -> Step {
        let (next, step) = self.state.next(intent, self.exhibits.len());

        match step {
            Step::Ignored(reason) => {
                debug!("Gallery: ignoring {intent} at {:?}: {reason}", self.state);
            }
            _ => {
                debug!("Gallery: {intent} {:?} -> {:?}", self.state, next);
                self.state = next;
            }
        }

        step
    }

    /// Ends the move in flight, if any. Reaching the portal latches `sequence_exhausted`;
    /// the latch is raised at most once per controller.
    pub fn settle(&mut self) -> Option<Settled> {
        if !self.state.is_transitioning() {
            return None;
        }

        let len = self.exhibits.len();
        self.state = self.state.settle(len);
        let position = self.state.position(len);

        let exhausted_now = self.state == NavigationState::AtPortal && !self.sequence_exhausted;
        if exhausted_now {
            self.sequence_exhausted = true;
            debug!("Gallery: sequence exhausted at position {position}");
        }

        Some(Settled { position, exhausted_now })
    }

    #[inline]
    pub fn state(&self) -> NavigationState {
        self.state
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.state.position(self.exhibits.len())
    }

    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.state.is_transitioning()
    }

    #[inline]
    pub fn is_approached(&self) -> bool {
        self.state.is_approached()
    }

    #[inline]
    pub fn sequence_exhausted(&self) -> bool {
        self.sequence_exhausted
    }

    pub fn settle_interval(&self) -> Duration {
        self.settle_interval
    }

    pub fn exhibits(&self) -> &Exhibits {
        &self.exhibits
    }

    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    /// Exhibit at the current position, `None` at the portal.
    pub fn current_exhibit(&self) -> Option<&Exhibit> {
        self.exhibits.get(self.position())
    }

    pub fn camera_target(&self) -> CameraTarget {
        self.layout.camera_target(self.position(), self.is_approached())
    }

    pub fn hud_summary(&self) -> HudSummary {
        let len = self.exhibits.len();
        let position = self.position();

        let position_label = if position >= len {
            FINAL_LABEL.to_string()
        } else {
            format!("{}/{}", position + 1, len)
        };

        let medium = self
            .current_exhibit()
            .map(|e| e.category.clone())
            .unwrap_or_else(|| NO_MEDIUM.to_string());

        let approached = self.is_approached();
        let moving = self.is_transitioning();

        HudSummary {
            position_label,
            medium,
            forward: ControlAffordance {
                label: if approached { "NEXT" } else { "APPROACH" },
                enabled: !moving && self.state != NavigationState::AtPortal,
            },
            backward: ControlAffordance {
                label: if approached { "STEP BACK" } else { "GO BACK" },
                enabled: !moving && (approached || position > 0) && len > 0,
            },
        }
    }

    /// Detail panel for the exhibit being looked at up close.
    pub fn detail(&self) -> Option<ExhibitDetail> {
        match self.state {
            NavigationState::Approached(p) => self.exhibits.get(p).map(ExhibitDetail::from),
            _ => None,
        }
    }

    /// End-of-sequence call to action, once the sequence has been exhausted.
    pub fn portal_notice(&self) -> Option<PortalNotice> {
        self.sequence_exhausted.then(|| PortalNotice::new(self.portal_href.clone()))
    }
}
