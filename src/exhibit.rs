//! Exhibit records and the immutable sequence a gallery session walks through.
//!
//! Exhibits are looked up by position only. The [`ExhibitId`] keys per-exhibit state such as
//! asset resolutions and is shown in overlays, but it never drives navigation.

use crate::errors::GalleryError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::sync::Arc;

/// Stable identifier of an exhibit within a sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExhibitId(pub u64);

impl Display for ExhibitId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One displayable work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exhibit {
    pub id: ExhibitId,
    pub title: String,
    /// Logical path of the primary visual. May be absent or point at nothing.
    #[serde(default, alias = "image")]
    pub image_path: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl Exhibit {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id: ExhibitId(id),
            title: title.into(),
            image_path: None,
            category: String::new(),
            description: String::new(),
        }
    }

    pub fn with_image(mut self, path: impl Into<String>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Ordered, immutable exhibit sequence. Cheap to clone; all clones share the same storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Exhibits(Arc<[Exhibit]>);

impl Exhibits {
    /// Validates and freezes a sequence. Titles must be non-empty and ids unique.
    pub fn new(exhibits: Vec<Exhibit>) -> Result<Self, GalleryError> {
        let mut seen = HashSet::with_capacity(exhibits.len());
        for (index, exhibit) in exhibits.iter().enumerate() {
            if exhibit.title.trim().is_empty() {
                return Err(GalleryError::InvalidExhibits(format!(
                    "exhibit {} at position {index} has an empty title",
                    exhibit.id
                )));
            }
            if !seen.insert(exhibit.id) {
                return Err(GalleryError::InvalidExhibits(format!(
                    "duplicate exhibit id {} at position {index}",
                    exhibit.id
                )));
            }
        }

        Ok(Self(exhibits.into()))
    }

    /// Parses a JSON array of exhibit records, as the site's listings provide them.
    pub fn from_json(json: &str) -> Result<Self, GalleryError> {
        let exhibits: Vec<Exhibit> =
            serde_json::from_str(json).map_err(|e| GalleryError::InvalidExhibits(e.to_string()))?;
        Self::new(exhibits)
    }

    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }
}

impl Deref for Exhibits {
    type Target = [Exhibit];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_site_listing_with_image_alias() {
        let json = r#"[
            { "id": 1, "title": "Homecoming", "image": "/homecoming.jpg", "category": "Art" },
            { "id": 2, "title": "Metaplane", "imagePath": "metaplane.jpg", "category": "Art",
              "description": "Layered planes" }
        ]"#;

        let exhibits = Exhibits::from_json(json).unwrap();
        assert_eq!(exhibits.len(), 2);
        assert_eq!(exhibits[0].image_path.as_deref(), Some("/homecoming.jpg"));
        assert_eq!(exhibits[1].image_path.as_deref(), Some("metaplane.jpg"));
        assert_eq!(exhibits[1].description, "Layered planes");
        assert_eq!(exhibits[0].description, "");
    }

    #[test]
    fn missing_image_is_allowed() {
        let exhibits = Exhibits::from_json(r#"[{ "id": 7, "title": "Untitled" }]"#).unwrap();
        assert!(exhibits[0].image_path.is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Exhibits::new(vec![Exhibit::new(1, "A"), Exhibit::new(1, "B")]).unwrap_err();
        assert!(err.to_string().contains("duplicate exhibit id 1"));
    }

    #[test]
    fn rejects_blank_titles() {
        let err = Exhibits::new(vec![Exhibit::new(3, "  ")]).unwrap_err();
        assert!(matches!(err, GalleryError::InvalidExhibits(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(Exhibits::from_json("{").is_err());
    }

    #[test]
    fn clones_share_storage() {
        let a = Exhibits::new(vec![Exhibit::new(1, "A")]).unwrap();
        let b = a.clone();
        assert!(std::ptr::eq(a.as_ptr(), b.as_ptr()));
    }
}
