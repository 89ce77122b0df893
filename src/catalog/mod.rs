//! Parsing of store XML responses.
//!
//! Two response shapes are consumed:
//! - The category product list, from which every `appId` is taken
//! - The per-item stub record, from which four fields are taken
//!
//! All other structure is ignored, so new vendor fields never break parsing.

pub mod stub;
pub mod xml;

use crate::domain::AppId;

pub use stub::{parse_stub, StubError};
pub use xml::XmlError;

/// Element naming an application in both response shapes
pub const APP_ID_TAG: &str = "appId";

/// Identifiers listed by one catalog response, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub entries: Vec<AppId>,
}

impl Catalog {
    /// Parse a category product list.
    ///
    /// Elements with no text are skipped rather than treated as errors.
    pub fn from_xml(xml: &str) -> Result<Self, XmlError> {
        let entries = xml::collect_elements(xml, &[APP_ID_TAG])?
            .into_iter()
            .filter(|e| !e.text.is_empty())
            .map(|e| AppId::new(e.text))
            .collect();

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AppId> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<SamsungProtocol networkType="0" version2="0" lang="EN" openApiVersion="28" deviceModel="SM-S918B" storeFilter="themeDeviceModel=SM-S918B_TM||OTFVersion=8000000||gearDeviceModel=SM-S918B_SM-R800||gOSVersion=4.0.0" supportFeature="HOMESCREEN" unifiedStoreVersion="0" version="6.5">
  <result code="0" name=""/>
  <list>
    <value><appId>com.samsung.android.goodlock</appId><productName>Good Lock</productName></value>
    <value><appId>com.samsung.systemui.lockstar</appId><productName>LockStar</productName></value>
    <value><appId></appId><productName>Broken</productName></value>
  </list>
</SamsungProtocol>"#;

    #[test]
    fn test_catalog_parsing() {
        let catalog = Catalog::from_xml(CATALOG_XML).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries[0].as_str(), "com.samsung.android.goodlock");
        assert_eq!(catalog.entries[1].as_str(), "com.samsung.systemui.lockstar");
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::from_xml("<SamsungProtocol><list/></SamsungProtocol>").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_malformed_catalog() {
        assert!(Catalog::from_xml("<SamsungProtocol><list></SamsungProtocol>").is_err());
    }
}
