//! Galaxy Store client.
//!
//! Wraps the two vendor endpoints used by a dump run:
//! - `getContentCategoryProductList.as`: lists the apps of one category
//! - `stubDownload.as`: maps one app to a time-limited download link
//!
//! Query strings are built from ordered key/value lists and URL-encoded by
//! `url`, so parameter names and order match what the store clients send.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use super::http::HttpClient;
use crate::catalog::{parse_stub, StubError};
use crate::config::StoreSettings;
use crate::domain::{AppId, DeviceProfile, ResolvedItem};

/// Store request errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Stub(#[from] StubError),
}

impl StoreError {
    /// Whether the response arrived but could not be understood
    pub fn is_parse(&self) -> bool {
        matches!(self, StoreError::Stub(_))
    }
}

/// Opaque `systemId` request value.
///
/// The store expects a Unix timestamp a little in the past. It is computed
/// once per run and sent unchanged with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemId(i64);

impl SystemId {
    pub fn at(now: DateTime<Utc>, offset_seconds: i64) -> Self {
        Self(now.timestamp() - offset_seconds)
    }

    pub fn now(offset_seconds: i64) -> Self {
        Self::at(Utc::now(), offset_seconds)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client for the Galaxy Store endpoints
pub struct GalaxyStoreClient {
    http: HttpClient,
    settings: StoreSettings,
    system_id: SystemId,
}

impl GalaxyStoreClient {
    pub fn new(http: HttpClient, settings: StoreSettings, system_id: SystemId) -> Self {
        Self {
            http,
            settings,
            system_id,
        }
    }

    pub fn system_id(&self) -> SystemId {
        self.system_id
    }

    /// Build the category product list URL
    pub fn catalog_url(&self, device: &DeviceProfile) -> Result<Url, StoreError> {
        let s = &self.settings;
        let params: Vec<(&str, String)> = vec![
            ("contentCategoryID", s.content_category_id.clone()),
            ("deviceId", device.device_id.clone()),
            ("sdkVer", device.sdk_version.clone()),
            ("mcc", s.mcc.clone()),
            ("mnc", s.mnc.clone()),
            ("csc", device.csc.clone()),
            ("imgWidth", s.image_width.to_string()),
            ("imgHeight", s.image_height.to_string()),
            ("startNum", s.start_num.to_string()),
            ("endNum", s.end_num.to_string()),
            ("alignOrder", s.align_order.clone()),
            ("callerId", s.catalog_caller_id.clone()),
            ("cc", s.cc.clone()),
            ("systemId", self.system_id.to_string()),
            ("abiType", s.abi_type.clone()),
            ("oneUiVersion", device.one_ui_version.clone()),
        ];

        Ok(Url::parse_with_params(&s.catalog_url, &params)?)
    }

    /// Build the stub download URL for one app
    pub fn stub_url(&self, device: &DeviceProfile, app_id: &AppId) -> Result<Url, StoreError> {
        let s = &self.settings;
        let params: Vec<(&str, String)> = vec![
            ("appId", app_id.to_string()),
            ("deviceId", device.device_id.clone()),
            ("mcc", s.mcc.clone()),
            ("mnc", s.mnc.clone()),
            ("csc", device.csc.clone()),
            ("sdkVer", device.sdk_version.clone()),
            ("pd", s.pd.clone()),
            ("systemId", self.system_id.to_string()),
            ("callerId", s.stub_caller_id.clone()),
            ("callerVersion", s.caller_version.clone()),
            ("abiType", s.abi_type.clone()),
            ("oneUiVersion", device.one_ui_version.clone()),
            ("versionCode", s.version_code.clone()),
            ("extuk", s.extuk.clone()),
        ];

        Ok(Url::parse_with_params(&s.stub_url, &params)?)
    }

    /// Fetch the raw category product list
    #[instrument(skip(self, device), fields(sdk = %device.sdk_version))]
    pub async fn fetch_catalog(&self, device: &DeviceProfile) -> Result<Vec<u8>, StoreError> {
        let url = self.catalog_url(device)?;
        let response = self.get_success(&url).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Resolve one app to its stub record
    pub async fn resolve(
        &self,
        device: &DeviceProfile,
        app_id: &AppId,
    ) -> Result<ResolvedItem, StoreError> {
        let url = self.stub_url(device, app_id)?;
        let response = self.get_success(&url).await?;
        let body = response.text().await?;
        Ok(parse_stub(&body)?)
    }

    /// Download a package body
    pub async fn download(&self, uri: &str) -> Result<Vec<u8>, StoreError> {
        let url = Url::parse(uri)?;
        let response = self.get_success(&url).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn get_success(&self, url: &Url) -> Result<reqwest::Response, StoreError> {
        let response = self.http.get(url).await?;
        let status = response.status();
        debug!(%url, status = status.as_u16(), "Response received");

        if !status.is_success() {
            return Err(StoreError::Status {
                url: redact(url),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

/// URL without its query string, for error messages
fn redact(url: &Url) -> String {
    let mut bare = url.clone();
    bare.set_query(None);
    bare.to_string()
}
