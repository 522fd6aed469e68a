use crate::exhibit::{Exhibit, ExhibitId};
use crate::navigation::{CameraTarget, ExhibitDetail, GalleryController, HudSummary, NavigationState, PortalNotice};
use crate::navigation::hud::{Clock, StatusLine};
use crate::render::AssetStatus;
use std::collections::BTreeMap;

/// Coarse navigation mode, for hosts that do not care about positions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GalleryMode {
    AtDistance,
    Approached,
    Transitioning,
    AtPortal,
}

impl From<NavigationState> for GalleryMode {
    fn from(state: NavigationState) -> Self {
        match state {
            NavigationState::AtDistance(_) => GalleryMode::AtDistance,
            NavigationState::Approached(_) => GalleryMode::Approached,
            NavigationState::Transitioning { .. } => GalleryMode::Transitioning,
            NavigationState::AtPortal => GalleryMode::AtPortal,
        }
    }
}

/// Everything a presentation layer needs to draw one frame of the gallery.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryView {
    pub state: NavigationState,
    pub mode: GalleryMode,
    pub position: usize,
    pub sequence_exhausted: bool,
    pub camera: CameraTarget,
    pub hud: HudSummary,
    pub status: StatusLine,
    pub current: Option<Exhibit>,
    pub detail: Option<ExhibitDetail>,
    /// `None` until exhausted, or after the host dismissed it.
    pub portal_notice: Option<PortalNotice>,
    pub assets: BTreeMap<ExhibitId, AssetStatus>,
}

impl GalleryView {
    pub(crate) fn project(
        controller: &GalleryController,
        clock: &dyn Clock,
        portal_dismissed: bool,
        assets: BTreeMap<ExhibitId, AssetStatus>,
    ) -> Self {
        let state = controller.state();
        let hud = controller.hud_summary();

        Self {
            state,
            mode: state.into(),
            position: controller.position(),
            sequence_exhausted: controller.sequence_exhausted(),
            camera: controller.camera_target(),
            status: hud.status_line(clock),
            hud,
            current: controller.current_exhibit().cloned(),
            detail: controller.detail(),
            portal_notice: if portal_dismissed { None } else { controller.portal_notice() },
            assets,
        }
    }

    pub fn asset(&self, id: ExhibitId) -> Option<AssetStatus> {
        self.assets.get(&id).copied()
    }
}
