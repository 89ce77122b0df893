//! Configuration for storedump.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (applied by the CLI on top of the resolved config)
//! 2. Environment variables (STOREDUMP_OUTPUT)
//! 3. Config file (.storedump/config.yaml, then <config dir>/storedump/config.yaml)
//! 4. Defaults (the public Galaxy Store endpoints, current directory output)
//!
//! Config file discovery:
//! - Searches the start directory and its parents for .storedump/config.yaml
//! - A relative output root is resolved against the directory holding .storedump/

pub mod paths;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::adapters::http::RetryPolicy;

pub use paths::OutputLayout;

/// Environment variable overriding the output root
pub const OUTPUT_ENV: &str = "STOREDUMP_OUTPUT";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Output root (relative to the directory holding .storedump/)
    pub root: Option<String>,
    /// Pause between catalog items in milliseconds
    pub delay_ms: Option<u64>,
}

/// Store endpoints and the fixed request parameters sent to them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Category product list endpoint
    pub catalog_url: String,
    /// Stub download endpoint
    pub stub_url: String,
    pub content_category_id: String,
    pub mcc: String,
    pub mnc: String,
    pub cc: String,
    pub image_width: u32,
    pub image_height: u32,
    /// First catalog position to list (1-based)
    pub start_num: u32,
    /// Last catalog position to list
    pub end_num: u32,
    pub align_order: String,
    /// Caller identity for the catalog request
    pub catalog_caller_id: String,
    /// Caller identity for stub requests
    pub stub_caller_id: String,
    pub caller_version: String,
    pub abi_type: String,
    pub pd: String,
    pub version_code: String,
    pub extuk: String,
    /// Seconds subtracted from the wall clock to form systemId
    pub system_id_offset_seconds: i64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            catalog_url: "http://vas.samsungapps.com/product/getContentCategoryProductList.as"
                .to_string(),
            stub_url: "https://vas.samsungapps.com/stub/stubDownload.as".to_string(),
            content_category_id: "0000005309".to_string(),
            mcc: "262".to_string(),
            mnc: "01".to_string(),
            cc: "NONE".to_string(),
            image_width: 512,
            image_height: 512,
            start_num: 1,
            end_num: 100,
            align_order: "alphabetical".to_string(),
            catalog_caller_id: "com.samsung.android.goodlock".to_string(),
            stub_caller_id: "com.sec.android.app.samsungapps".to_string(),
            caller_version: "4.5.49.8".to_string(),
            abi_type: "64".to_string(),
            pd: "0".to_string(),
            version_code: "0".to_string(),
            extuk: "0191d6627f38685f".to_string(),
            system_id_offset_seconds: 180,
        }
    }
}

/// Shared HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    pub retry: RetryPolicy,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            retry: RetryPolicy::default(),
        }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub store: StoreSettings,
    pub http: HttpSettings,
    /// Root under which staging, releases and the manifest live
    pub output_root: PathBuf,
    /// Pause between catalog items
    pub delay_ms: u64,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            store: StoreSettings::default(),
            http: HttpSettings::default(),
            output_root: PathBuf::from("."),
            delay_ms: 0,
            config_file: None,
        }
    }
}

impl ResolvedConfig {
    /// Output locations for this configuration
    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(&self.output_root)
    }

    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Find config file by searching `start` and its parents, then the user config dir
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".storedump").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join("storedump").join("config.yaml"))
        .filter(|path| path.exists())
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration, searching for a config file from `start`
pub fn load_config_from(start: &Path) -> Result<ResolvedConfig> {
    let config_file = find_config_file(start);

    let mut resolved = if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;

        // Base directory is the parent of .storedump/ (i.e., grandparent of config.yaml)
        let base_dir = config_path
            .parent()
            .and_then(|p| p.parent())
            .unwrap_or(Path::new("."));

        ResolvedConfig {
            store: config.store,
            http: config.http,
            output_root: config
                .output
                .root
                .as_deref()
                .map(|root| resolve_path(base_dir, root))
                .unwrap_or_else(|| PathBuf::from(".")),
            delay_ms: config.output.delay_ms.unwrap_or(0),
            config_file: config_file.clone(),
        }
    } else {
        ResolvedConfig::default()
    };

    if let Ok(env_root) = std::env::var(OUTPUT_ENV) {
        resolved.output_root = PathBuf::from(env_root);
    }

    Ok(resolved)
}

/// Load configuration from all sources, starting at the current directory
pub fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    load_config_from(&cwd)
}
