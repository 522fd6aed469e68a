//! A running gallery: navigation, settle timing and asset resolution on one task.
//!
//! [`GallerySession`] owns a [`GalleryController`](crate::navigation::GalleryController) and an
//! [`ExhibitRenderer`](crate::render::ExhibitRenderer). Once started it is driven through a
//! cloneable [`GalleryHandle`] and reports back on a broadcast bus of [`GalleryEvent`]s.

mod events;
mod handle;
mod session;
mod view;

pub use events::{GalleryCommand, GalleryEvent};
pub use handle::GalleryHandle;
pub use session::{GallerySession, SessionId};
pub use view::{GalleryMode, GalleryView};
