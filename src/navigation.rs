//! Visitor navigation through the gallery corridor.
//!
//! - [`state`]: the explicit navigation state machine.
//! - [`controller`]: [`GalleryController`], owner of the state and its projections.
//! - [`camera`]: corridor geometry and camera framing.
//! - [`hud`]: heads-up display and overlay projections.

pub mod camera;
pub mod controller;
pub mod hud;
pub mod state;

pub use camera::{CameraTarget, Orientation, SceneLayout};
pub use controller::{GalleryController, Settled};
pub use hud::{Clock, ControlAffordance, ExhibitDetail, FixedClock, HudSummary, PortalNotice, SystemClock};
pub use state::{IgnoredIntent, NavigationState, Step};
