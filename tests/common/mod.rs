//! Shared fixtures for the integration tests: a mock Galaxy Store.

#![allow(dead_code)]

use std::path::Path;

use storedump::{DeviceProfile, ResolvedConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CATALOG_PATH: &str = "/product/getContentCategoryProductList.as";
pub const STUB_PATH: &str = "/stub/stubDownload.as";
pub const SDK: &str = "34";

pub fn device() -> DeviceProfile {
    DeviceProfile::new("SM-S918B", SDK, "14", "EUX", "6.0").unwrap()
}

/// Config pointing at the mock store, with fast retries
pub fn config(server: &MockServer, root: &Path) -> ResolvedConfig {
    let mut config = ResolvedConfig::default();
    config.store.catalog_url = format!("{}{}", server.uri(), CATALOG_PATH);
    config.store.stub_url = format!("{}{}", server.uri(), STUB_PATH);
    config.http.timeout_seconds = 5;
    config.http.retry.initial_delay_ms = 10;
    config.http.retry.max_delay_ms = 40;
    config.output_root = root.to_path_buf();
    config
}

pub fn catalog_xml(ids: &[&str]) -> String {
    let values: String = ids
        .iter()
        .map(|id| {
            format!(
                "<value><appId>{}</appId><productName>{} app</productName></value>",
                id, id
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<SamsungProtocol networkType="0" version="6.5"><result code="0" name=""/><list>{}</list></SamsungProtocol>"#,
        values
    )
}

pub fn stub_xml(id: &str, download_uri: Option<&str>, name: &str, version: &str) -> String {
    let uri = download_uri
        .map(|u| format!("<downloadURI><![CDATA[{}]]></downloadURI>", u))
        .unwrap_or_else(|| "<downloadURI></downloadURI>".to_string());

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<result><resultCode>1</resultCode><appId>{}</appId>{}<versionName>{}</versionName><productName>{}</productName></result>"#,
        id, uri, version, name
    )
}

pub async fn mount_catalog(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mount a stub record and the package it points to
pub async fn mount_app(server: &MockServer, id: &str, version: &str, package: &[u8]) {
    let download_path = format!("/download/{}.apk", id);
    let uri = format!("{}{}?sig=abc", server.uri(), download_path);

    Mock::given(method("GET"))
        .and(path(STUB_PATH))
        .and(query_param("appId", id))
        .respond_with(ResponseTemplate::new(200).set_body_string(stub_xml(
            id,
            Some(&uri),
            &format!("{} app", id),
            version,
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(download_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(package.to_vec()))
        .mount(server)
        .await;
}

pub fn package_count(root: &Path) -> usize {
    let dir = root.join("releases").join(SDK);
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}

pub fn manifest_lines(root: &Path) -> Vec<String> {
    std::fs::read_to_string(root.join("versions.txt"))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
