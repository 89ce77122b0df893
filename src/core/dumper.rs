//! Dump pipeline: catalog fetch, then resolve and download per item.
//!
//! A catalog failure aborts the run. Every per-item failure is logged,
//! recorded in the report and skipped; the next item is processed anyway.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, info, instrument, warn};

use crate::adapters::{GalaxyStoreClient, HttpClient, StoreError, SystemId};
use crate::catalog::Catalog;
use crate::config::{OutputLayout, ResolvedConfig};
use crate::domain::{AppId, DeviceProfile, FailureStage, ItemOutcome, ResolvedItem, RunReport};

use super::manifest::Manifest;

/// Sequential dump runner
pub struct Dumper {
    client: GalaxyStoreClient,
    device: DeviceProfile,
    layout: OutputLayout,
    item_delay: std::time::Duration,
}

impl Dumper {
    /// Create a dumper for one run
    pub fn new(config: &ResolvedConfig, device: DeviceProfile) -> Result<Self> {
        device.validate()?;

        let http = HttpClient::new(&config.http).context("Failed to build HTTP client")?;
        let system_id = SystemId::now(config.store.system_id_offset_seconds);
        let client = GalaxyStoreClient::new(http, config.store.clone(), system_id);

        Ok(Self {
            client,
            device,
            layout: config.layout(),
            item_delay: config.item_delay(),
        })
    }

    pub fn client(&self) -> &GalaxyStoreClient {
        &self.client
    }

    /// Execute a full dump run
    #[instrument(skip(self), fields(device = %self.device.device_id, sdk = %self.device.sdk_version))]
    pub async fn run(&self) -> Result<RunReport> {
        info!(
            os = %self.device.os_label,
            csc = %self.device.csc,
            one_ui = %self.device.one_ui_version,
            system_id = %self.client.system_id(),
            "Starting dump"
        );

        let manifest = self.prepare_output().await?;
        debug!(manifest = %manifest.path().display(), "Manifest reset");
        let catalog = self.fetch_catalog(true).await?;
        info!(items = catalog.len(), "Catalog fetched");

        let mut report = RunReport::new(&self.device.sdk_version);
        let mut saved: HashSet<AppId> = HashSet::new();

        for (idx, app_id) in catalog.iter().enumerate() {
            if idx > 0 && !self.item_delay.is_zero() {
                tokio::time::sleep(self.item_delay).await;
            }

            let outcome = self.process_item(app_id, &manifest, &mut saved).await;
            report.record(outcome);
        }

        report.finish();
        info!(
            attempted = report.attempted(),
            saved = report.saved(),
            unavailable = report.unavailable(),
            failed = report.failed(),
            "Dump finished"
        );

        Ok(report)
    }

    /// Fetch and parse the catalog, optionally staging the raw response
    pub async fn fetch_catalog(&self, stage: bool) -> Result<Catalog> {
        let body = self
            .client
            .fetch_catalog(&self.device)
            .await
            .context("Failed to fetch catalog")?;

        if stage {
            let staging = self.layout.staging_file(&self.device.sdk_version);
            fs::write(&staging, &body)
                .await
                .with_context(|| format!("Failed to stage catalog: {}", staging.display()))?;
            debug!(path = %staging.display(), bytes = body.len(), "Catalog staged");
        }

        let xml = std::str::from_utf8(&body).context("Catalog response is not valid UTF-8")?;
        Catalog::from_xml(xml).context("Failed to parse catalog")
    }

    /// Resolve a single item without downloading it
    pub async fn resolve(&self, app_id: &AppId) -> Result<ResolvedItem, StoreError> {
        self.client.resolve(&self.device, app_id).await
    }

    /// Create output directories, drop the stale staged catalog and reset the manifest
    async fn prepare_output(&self) -> Result<Manifest> {
        let sdk = &self.device.sdk_version;

        for dir in [self.layout.staging_dir(), self.layout.releases_dir(sdk)] {
            fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        let staging = self.layout.staging_file(sdk);
        match fs::remove_file(&staging).await {
            Ok(()) => debug!(path = %staging.display(), "Stale catalog removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to remove staged catalog: {}", staging.display())
                });
            }
        }

        Manifest::reset(self.layout.manifest_path()).await
    }

    /// Drive one item to a terminal state.
    ///
    /// `saved` holds the identifiers written so far in this run; a second
    /// item resolving to one of them is not written again.
    async fn process_item(
        &self,
        app_id: &AppId,
        manifest: &Manifest,
        saved: &mut HashSet<AppId>,
    ) -> ItemOutcome {
        let failed = |stage: FailureStage, error: String| {
            warn!(app_id = %app_id, %stage, %error, "Item skipped");
            ItemOutcome::Failed {
                app_id: app_id.clone(),
                stage,
                error,
            }
        };

        let item = match self.client.resolve(&self.device, app_id).await {
            Ok(item) => item,
            Err(e) => {
                let stage = if e.is_parse() {
                    FailureStage::Parse
                } else {
                    FailureStage::Resolve
                };
                return failed(stage, e.to_string());
            }
        };

        let Some(uri) = item.download_uri.as_deref() else {
            warn!(app_id = %item.app_id, "No download URI, package not available");
            return ItemOutcome::Unavailable {
                app_id: item.app_id,
            };
        };

        if !item.app_id.is_safe_file_stem() {
            return failed(
                FailureStage::Persist,
                format!("Unusable file name: {:?}", item.app_id.as_str()),
            );
        }

        if saved.contains(&item.app_id) {
            return failed(
                FailureStage::Persist,
                format!("{} already saved in this run", item.app_id),
            );
        }

        let body = match self.client.download(uri).await {
            Ok(body) => body,
            Err(e) => return failed(FailureStage::Download, e.to_string()),
        };

        info!("Found app {} with version {}", item.product_name, item.version_name);

        match self.persist(&item, &body, manifest).await {
            Ok(path) => {
                saved.insert(item.app_id.clone());
                let sha256 = hex::encode(Sha256::digest(&body));
                info!(app_id = %item.app_id, path = %path.display(), %sha256, "Package saved");
                ItemOutcome::Saved {
                    app_id: item.app_id,
                    product_name: item.product_name,
                    version_name: item.version_name,
                    path,
                    size_bytes: body.len() as u64,
                    sha256,
                }
            }
            Err(e) => failed(FailureStage::Persist, format!("{:#}", e)),
        }
    }

    /// Write the package, then its manifest line.
    ///
    /// If the manifest cannot be appended the package is removed again, so
    /// saved files and manifest lines always match.
    async fn persist(
        &self,
        item: &ResolvedItem,
        body: &[u8],
        manifest: &Manifest,
    ) -> Result<PathBuf> {
        let path = self
            .layout
            .package_path(&self.device.sdk_version, &item.app_id);

        fs::write(&path, body)
            .await
            .with_context(|| format!("Failed to write package: {}", path.display()))?;

        if let Err(e) = manifest.append(item).await {
            if let Err(cleanup) = fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %cleanup, "Failed to remove unrecorded package");
            }
            return Err(e);
        }

        Ok(path)
    }
}
