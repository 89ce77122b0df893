//! Per-item stub download record.

use thiserror::Error;

use super::xml::{collect_elements, first_text, XmlError};
use super::APP_ID_TAG;
use crate::domain::{AppId, ResolvedItem};

const DOWNLOAD_URI_TAG: &str = "downloadURI";
const PRODUCT_NAME_TAG: &str = "productName";
const VERSION_NAME_TAG: &str = "versionName";

/// Stub record parse errors
#[derive(Debug, Error)]
pub enum StubError {
    #[error(transparent)]
    Xml(#[from] XmlError),

    #[error("Stub record has no <{0}> element")]
    MissingField(&'static str),

    #[error("Stub record has an empty <{0}> element")]
    EmptyField(&'static str),
}

/// Parse a stub download record.
///
/// A missing or empty `downloadURI` is not an error: it means the store has
/// no package for this device and yields `download_uri: None`.
pub fn parse_stub(xml: &str) -> Result<ResolvedItem, StubError> {
    let elements = collect_elements(
        xml,
        &[APP_ID_TAG, DOWNLOAD_URI_TAG, PRODUCT_NAME_TAG, VERSION_NAME_TAG],
    )?;

    let required = |tag: &'static str| -> Result<String, StubError> {
        first_text(&elements, tag)
            .map(str::to_string)
            .ok_or(StubError::MissingField(tag))
    };

    let app_id = required(APP_ID_TAG)?;
    if app_id.is_empty() {
        return Err(StubError::EmptyField(APP_ID_TAG));
    }

    let download_uri = first_text(&elements, DOWNLOAD_URI_TAG)
        .filter(|uri| !uri.is_empty())
        .map(str::to_string);

    Ok(ResolvedItem {
        app_id: AppId::new(app_id),
        download_uri,
        product_name: required(PRODUCT_NAME_TAG)?,
        version_name: required(VERSION_NAME_TAG)?,
    })
}
