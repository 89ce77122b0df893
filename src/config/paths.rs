//! Canonical output locations for a dump run.
//!
//! Single source of truth - use this instead of joining paths by hand.
//!
//! ## Layout
//!
//! ```text
//! <root>/
//! ├── versions.txt              # Manifest, reset every run
//! ├── xml/
//! │   └── <sdk>.xml             # Raw catalog response, overwritten every run
//! └── releases/
//!     └── <sdk>/
//!         └── <appId>.apk       # One package per saved item
//! ```

use std::path::{Path, PathBuf};

use crate::domain::AppId;

/// Directory holding staged catalog responses
pub const XML_DIR: &str = "xml";

/// Directory holding per-SDK package directories
pub const RELEASES_DIR: &str = "releases";

/// Manifest file name
pub const MANIFEST_FILE: &str = "versions.txt";

/// Extension given to saved packages
pub const PACKAGE_EXTENSION: &str = "apk";

/// Output locations rooted at one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(XML_DIR)
    }

    /// Staged catalog response for an SDK version
    pub fn staging_file(&self, sdk_version: &str) -> PathBuf {
        self.staging_dir().join(format!("{}.xml", sdk_version))
    }

    /// Package directory for an SDK version
    pub fn releases_dir(&self, sdk_version: &str) -> PathBuf {
        self.root.join(RELEASES_DIR).join(sdk_version)
    }

    pub fn package_path(&self, sdk_version: &str, app_id: &AppId) -> PathBuf {
        self.releases_dir(sdk_version)
            .join(format!("{}.{}", app_id, PACKAGE_EXTENSION))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = OutputLayout::new("/dump");

        assert_eq!(layout.staging_file("34"), PathBuf::from("/dump/xml/34.xml"));
        assert_eq!(layout.releases_dir("34"), PathBuf::from("/dump/releases/34"));
        assert_eq!(
            layout.package_path("34", &AppId::from("com.example.app")),
            PathBuf::from("/dump/releases/34/com.example.app.apk")
        );
        assert_eq!(layout.manifest_path(), PathBuf::from("/dump/versions.txt"));
    }
}
