//! Catalog entries and resolution records.

use serde::{Deserialize, Serialize};

/// Opaque application identifier from the store catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(String);

impl AppId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier can be used as a bare file name
    pub fn is_safe_file_stem(&self) -> bool {
        is_safe_path_component(&self.0)
    }
}

impl std::fmt::Display for AppId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AppId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Whether `s` names a single entry inside its parent directory
pub fn is_safe_path_component(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\', '\0'])
}

/// Result of resolving one catalog entry.
///
/// `download_uri` is `None` when the store has no package for this device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedItem {
    pub app_id: AppId,
    pub download_uri: Option<String>,
    pub product_name: String,
    pub version_name: String,
}

impl ResolvedItem {
    /// Line recorded in the manifest for a saved package
    pub fn manifest_line(&self) -> String {
        format!("- {} {} ", self.product_name, self.version_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem_safety() {
        assert!(AppId::from("com.samsung.android.goodlock").is_safe_file_stem());
        assert!(!AppId::from("").is_safe_file_stem());
        assert!(!AppId::from("..").is_safe_file_stem());
        assert!(!AppId::from("../etc/passwd").is_safe_file_stem());
        assert!(!AppId::from("a\\b").is_safe_file_stem());
    }

    #[test]
    fn test_manifest_line() {
        let item = ResolvedItem {
            app_id: AppId::from("com.example.app"),
            download_uri: Some("https://cdn.example.com/app.apk".to_string()),
            product_name: "Example".to_string(),
            version_name: "1.2.3".to_string(),
        };
        assert_eq!(item.manifest_line(), "- Example 1.2.3 ");
    }
}
