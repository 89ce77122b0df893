//! Device identity sent with every store request.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::item::is_safe_path_component;

/// Device identity for a single run.
///
/// Built once at process start and passed by reference into every stage.
/// Values are opaque to the dumper and only checked for presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Device model identifier (e.g. "SM-S918B")
    pub device_id: String,

    /// Android SDK level, also keys the output locations
    pub sdk_version: String,

    /// OS label (informational, not sent to the store)
    pub os_label: String,

    /// Carrier sales code
    pub csc: String,

    /// One UI version string
    pub one_ui_version: String,
}

impl DeviceProfile {
    /// Create a profile, rejecting blank fields
    pub fn new(
        device_id: impl Into<String>,
        sdk_version: impl Into<String>,
        os_label: impl Into<String>,
        csc: impl Into<String>,
        one_ui_version: impl Into<String>,
    ) -> Result<Self> {
        let profile = Self {
            device_id: device_id.into(),
            sdk_version: sdk_version.into(),
            os_label: os_label.into(),
            csc: csc.into(),
            one_ui_version: one_ui_version.into(),
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check that every field is present
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("device id", &self.device_id),
            ("sdk version", &self.sdk_version),
            ("os label", &self.os_label),
            ("csc", &self.csc),
            ("one ui version", &self.one_ui_version),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                anyhow::bail!("Device {} cannot be empty", name);
            }
        }

        // The SDK version names output directories
        if !is_safe_path_component(&self.sdk_version) {
            anyhow::bail!(
                "Device sdk version {:?} cannot be used as a directory name",
                self.sdk_version
            );
        }

        Ok(())
    }
}
