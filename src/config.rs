//! Gallery configuration.
//!
//! `GalleryConfig` controls timing, asset lookup and scene geometry for a single
//! [`GallerySession`](crate::session::GallerySession). It provides sensible defaults via
//! [`Default`] and a fluent [`GalleryConfig::builder()`] that validates on build.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use gallery_engine::config::GalleryConfig;
//! let cfg = GalleryConfig::default();
//! assert_eq!(cfg.settle_interval.as_millis(), 1000);
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use std::time::Duration;
//! use gallery_engine::config::GalleryConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = GalleryConfig::builder()
//!     .asset_root("https://example.org/")?
//!     .settle_interval(Duration::from_millis(600))
//!     .fetch_timeout(Duration::from_secs(3))
//!     .build()?;
//! assert_eq!(cfg.asset_root.as_str(), "https://example.org/");
//! # Ok(()) }
//! ```
//!
//! # Fields (summary)
//! - `asset_root`: Base URL that exhibit image paths resolve against (`http(s)://` or `file://`).
//! - `user_agent`: UA string sent with asset requests.
//! - `settle_interval`: How long a move between stations blocks further intents (default: 1s).
//! - `fetch_timeout`: Upper bound for a single asset fetch (default: 10s).
//! - `fallback_size`: Edge length in pixels of synthesized fallback textures (default: 512).
//! - `layout`: Corridor geometry used for camera and exhibit placement.
//! - `portal_href`: Where the end-of-sequence call to action points.
//! - `event_capacity`: Capacity of the session command and event channels.
//!
//! # Errors
//!
//! Builder validation returns [`ConfigError`] when values are unusable, e.g. a zero settle
//! interval or an approach offset that would not bring the camera closer.

use crate::navigation::SceneLayout;
use crate::render::backend::MAX_SURFACE_EDGE;
use std::fmt;
use std::time::Duration;
use url::Url;

const DEFAULT_USER_AGENT: &str = "GalleryEngine/0.1";
const DEFAULT_ASSET_ROOT: &str = "http://localhost:3000/";

/// Smallest fallback canvas that still fits the border, pattern and title.
pub const MIN_FALLBACK_SIZE: u32 = 64;

/// Largest fallback canvas a backend will allocate.
pub const MAX_FALLBACK_SIZE: u32 = MAX_SURFACE_EDGE;

#[derive(Debug, Clone)]
pub struct GalleryConfig {
    pub asset_root: Url,
    pub user_agent: String,
    pub settle_interval: Duration,
    pub fetch_timeout: Duration,
    pub fallback_size: u32,
    pub layout: SceneLayout,
    pub portal_href: String,
    pub event_capacity: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            asset_root: default_asset_root(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            settle_interval: Duration::from_millis(1000),
            fetch_timeout: Duration::from_secs(10),
            fallback_size: 512,
            layout: SceneLayout::default(),
            portal_href: "/portfolio".to_string(),
            event_capacity: 64,
        }
    }
}

fn default_asset_root() -> Url {
    match Url::parse(DEFAULT_ASSET_ROOT) {
        Ok(url) => url,
        Err(_) => unreachable!("default asset root is a valid URL"),
    }
}

impl GalleryConfig {
    pub fn builder() -> GalleryConfigBuilder {
        GalleryConfigBuilder::default()
    }
}

/// Builder for [`GalleryConfig`].
#[derive(Debug, Clone, Default)]
pub struct GalleryConfigBuilder {
    inner: GalleryConfig,
}

impl GalleryConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut GalleryConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    /// Parses and sets the asset root. A root without a trailing `/` gets one, so that
    /// exhibit paths resolve beneath it rather than beside it.
    pub fn asset_root(self, root: &str) -> Result<Self, ConfigError> {
        let mut url = Url::parse(root).map_err(|e| ConfigError::InvalidAssetRoot(e.to_string()))?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(self.map(|c| c.asset_root = url))
    }

    pub fn user_agent<S: Into<String>>(self, ua: S) -> Self { self.map(|c| c.user_agent = ua.into()) }
    pub fn settle_interval(self, d: Duration) -> Self { self.map(|c| c.settle_interval = d) }
    pub fn fetch_timeout(self, d: Duration) -> Self { self.map(|c| c.fetch_timeout = d) }
    pub fn fallback_size(self, px: u32) -> Self { self.map(|c| c.fallback_size = px) }
    pub fn layout(self, layout: SceneLayout) -> Self { self.map(|c| c.layout = layout) }
    pub fn portal_href<S: Into<String>>(self, href: S) -> Self { self.map(|c| c.portal_href = href.into()) }
    pub fn event_capacity(self, n: usize) -> Self { self.map(|c| c.event_capacity = n) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut GalleryConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<GalleryConfig, ConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidAssetRoot(String),
    ZeroSettleInterval,
    ZeroFetchTimeout,
    FallbackTooSmall(u32),
    FallbackTooLarge(u32),
    InvalidSpacing(f32),
    ApproachTooFar { offset: f32, spacing: f32 },
    PitchOutOfRange(f32),
    ZeroCapacity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidAssetRoot(e) =>
                write!(f, "asset_root is not a valid URL: {e}"),
            ConfigError::ZeroSettleInterval =>
                write!(f, "settle_interval must be greater than zero"),
            ConfigError::ZeroFetchTimeout =>
                write!(f, "fetch_timeout must be greater than zero"),
            ConfigError::FallbackTooSmall(px) =>
                write!(f, "fallback_size {px} is below the minimum of {MIN_FALLBACK_SIZE}"),
            ConfigError::FallbackTooLarge(px) =>
                write!(f, "fallback_size {px} exceeds the maximum of {MAX_FALLBACK_SIZE}"),
            ConfigError::InvalidSpacing(s) =>
                write!(f, "station spacing {s} must be positive"),
            ConfigError::ApproachTooFar { offset, spacing } =>
                write!(f, "approach offset {offset} must be in (0, {spacing})"),
            ConfigError::PitchOutOfRange(p) =>
                write!(f, "approach pitch {p} is out of range (expected -π/2..π/2)"),
            ConfigError::ZeroCapacity =>
                write!(f, "event_capacity must be at least 1"),
        }
    }
}
impl std::error::Error for ConfigError {}

fn validate(c: &GalleryConfig) -> Result<(), ConfigError> {
    if c.settle_interval.is_zero() {
        return Err(ConfigError::ZeroSettleInterval);
    }
    if c.fetch_timeout.is_zero() {
        return Err(ConfigError::ZeroFetchTimeout);
    }
    if c.fallback_size < MIN_FALLBACK_SIZE {
        return Err(ConfigError::FallbackTooSmall(c.fallback_size));
    }
    if c.fallback_size > MAX_FALLBACK_SIZE {
        return Err(ConfigError::FallbackTooLarge(c.fallback_size));
    }
    let layout = &c.layout;
    if !(layout.station_spacing > 0.0) {
        return Err(ConfigError::InvalidSpacing(layout.station_spacing));
    }
    if !(layout.approach_offset > 0.0 && layout.approach_offset < layout.station_spacing) {
        return Err(ConfigError::ApproachTooFar {
            offset: layout.approach_offset,
            spacing: layout.station_spacing,
        });
    }
    let half_pi = std::f32::consts::FRAC_PI_2;
    if !(layout.approach_pitch > -half_pi && layout.approach_pitch < half_pi) {
        return Err(ConfigError::PitchOutOfRange(layout.approach_pitch));
    }
    if c.event_capacity == 0 {
        return Err(ConfigError::ZeroCapacity);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = GalleryConfig::builder().build().unwrap();
        assert_eq!(cfg.fallback_size, 512);
        assert_eq!(cfg.settle_interval, Duration::from_secs(1));
        assert_eq!(cfg.portal_href, "/portfolio");
    }

    #[test]
    fn asset_root_gets_trailing_slash() {
        let cfg = GalleryConfig::builder()
            .asset_root("https://example.org/static")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(cfg.asset_root.as_str(), "https://example.org/static/");
    }

    #[test]
    fn bad_asset_root_is_rejected() {
        let err = GalleryConfig::builder().asset_root("not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAssetRoot(_)));
    }

    #[test]
    fn zero_durations_are_rejected() {
        let err = GalleryConfig::builder().settle_interval(Duration::ZERO).build().unwrap_err();
        assert_eq!(err, ConfigError::ZeroSettleInterval);

        let err = GalleryConfig::builder().fetch_timeout(Duration::ZERO).build().unwrap_err();
        assert_eq!(err, ConfigError::ZeroFetchTimeout);
    }

    #[test]
    fn approach_must_stay_inside_station() {
        let err = GalleryConfig::builder()
            .with(|c| c.layout.approach_offset = c.layout.station_spacing)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ApproachTooFar { .. }));
        assert!(err.to_string().contains("approach offset"));
    }

    #[test]
    fn tiny_fallback_is_rejected() {
        let err = GalleryConfig::builder().fallback_size(16).build().unwrap_err();
        assert_eq!(err, ConfigError::FallbackTooSmall(16));
    }

    #[test]
    fn oversized_fallback_is_rejected() {
        let err = GalleryConfig::builder().fallback_size(70_000).build().unwrap_err();
        assert_eq!(err, ConfigError::FallbackTooLarge(70_000));
        assert!(err.to_string().contains("8192"));

        let cfg = GalleryConfig::builder().fallback_size(MAX_FALLBACK_SIZE).build().unwrap();
        assert_eq!(cfg.fallback_size, MAX_FALLBACK_SIZE);
    }
}
