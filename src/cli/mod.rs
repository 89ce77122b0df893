//! Command-line interface for storedump.
//!
//! Provides commands for dumping a store category, listing its catalog,
//! resolving a single app, and showing the resolved configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::{self, ResolvedConfig};
use crate::core::Dumper;
use crate::domain::{AppId, DeviceProfile, ItemOutcome, RunReport};

/// storedump - Galaxy Store category dumper
#[derive(Parser, Debug)]
#[command(name = "storedump")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output root (overrides config file and STOREDUMP_OUTPUT)
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download every package in the category and write the manifest
    Dump {
        #[command(flatten)]
        device: DeviceArgs,

        /// Pause between items in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the app identifiers listed in the category
    List {
        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Resolve one app and print its download metadata
    Resolve {
        /// App identifier (e.g., com.samsung.android.goodlock)
        app_id: String,

        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Device identity flags shared by every store command
#[derive(Args, Debug, Clone)]
pub struct DeviceArgs {
    /// Device model identifier
    #[arg(short = 'd', long = "device-id", alias = "deviceId", env = "STOREDUMP_DEVICE_ID")]
    pub device_id: String,

    /// Android SDK level (keys the output directories)
    #[arg(short = 's', long = "sdk", env = "STOREDUMP_SDK")]
    pub sdk: String,

    /// OS label
    #[arg(short = 'o', long = "os", env = "STOREDUMP_OS")]
    pub os: String,

    /// Carrier sales code
    #[arg(short = 'c', long = "csc", env = "STOREDUMP_CSC")]
    pub csc: String,

    /// One UI version
    #[arg(short = 'v', long = "version", env = "STOREDUMP_ONE_UI_VERSION")]
    pub one_ui_version: String,
}

impl DeviceArgs {
    pub fn into_profile(self) -> Result<DeviceProfile> {
        DeviceProfile::new(
            self.device_id,
            self.sdk,
            self.os,
            self.csc,
            self.one_ui_version,
        )
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let mut config = config::load_config()?;
        if let Some(dir) = self.output_dir {
            config.output_root = dir;
        }

        match self.command {
            Commands::Dump {
                device,
                delay_ms,
                json,
            } => {
                if let Some(delay) = delay_ms {
                    config.delay_ms = delay;
                }
                dump(&config, device.into_profile()?, json).await
            }
            Commands::List { device } => {
                list_catalog(&config, device.into_profile()?).await
            }
            Commands::Resolve { app_id, device } => {
                resolve_app(&config, device.into_profile()?, &app_id).await
            }
            Commands::Config => {
                show_config(&config)
            }
        }
    }
}

/// Run a full dump
async fn dump(config: &ResolvedConfig, device: DeviceProfile, json: bool) -> Result<()> {
    let dumper = Dumper::new(config, device)?;
    let report = dumper.run().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &RunReport) {
    println!("{:<45} {:<12} {}", "APP ID", "STATUS", "DETAIL");
    println!("{}", "-".repeat(90));

    for outcome in &report.outcomes {
        let (status, detail) = match outcome {
            ItemOutcome::Saved {
                product_name,
                version_name,
                ..
            } => ("saved", format!("{} {}", product_name, version_name)),
            ItemOutcome::Unavailable { .. } => ("unavailable", "no download URI".to_string()),
            ItemOutcome::Failed { stage, error, .. } => ("failed", format!("[{}] {}", stage, error)),
        };
        println!("{:<45} {:<12} {}", outcome.app_id(), status, detail);
    }

    eprintln!(
        "\n[SDK {}: {} saved, {} unavailable, {} failed of {}]",
        report.sdk_version,
        report.saved(),
        report.unavailable(),
        report.failed(),
        report.attempted()
    );
}

/// Print the identifiers of the category without downloading anything
async fn list_catalog(config: &ResolvedConfig, device: DeviceProfile) -> Result<()> {
    let dumper = Dumper::new(config, device)?;
    let catalog = dumper.fetch_catalog(false).await?;

    if catalog.is_empty() {
        println!("No apps listed");
        return Ok(());
    }

    for app_id in catalog.iter() {
        println!("{}", app_id);
    }
    eprintln!("\n[{} apps]", catalog.len());

    Ok(())
}

/// Resolve one app and print what the store returned
async fn resolve_app(config: &ResolvedConfig, device: DeviceProfile, app_id: &str) -> Result<()> {
    let dumper = Dumper::new(config, device)?;
    let item = dumper
        .resolve(&AppId::new(app_id))
        .await
        .with_context(|| format!("Failed to resolve {}", app_id))?;

    println!("App ID:   {}", item.app_id);
    println!("Name:     {}", item.product_name);
    println!("Version:  {}", item.version_name);
    match item.download_uri {
        Some(uri) => println!("Download: {}", uri),
        None => println!("Download: (not available for this device)"),
    }

    Ok(())
}

/// Show resolved configuration
fn show_config(config: &ResolvedConfig) -> Result<()> {
    println!(
        "Config file: {}",
        config
            .config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );

    let layout = config.layout();
    println!();
    println!("Paths:");
    println!("  Output root: {}", layout.root().display());
    println!("  Manifest:    {}", layout.manifest_path().display());
    println!("  Staging:     {}", layout.staging_dir().display());
    println!();
    println!("{}", serde_yaml::to_string(config)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_dump_arguments() {
        let cli = Cli::try_parse_from([
            "storedump", "dump", "-d", "SM-S918B", "-s", "34", "-o", "14", "-c", "EUX", "-v",
            "6.0", "--delay-ms", "500",
        ])
        .unwrap();

        match cli.command {
            Commands::Dump {
                device, delay_ms, ..
            } => {
                let profile = device.into_profile().unwrap();
                assert_eq!(profile.device_id, "SM-S918B");
                assert_eq!(profile.one_ui_version, "6.0");
                assert_eq!(delay_ms, Some(500));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_output_dir() {
        let cli = Cli::try_parse_from(["storedump", "config", "--output-dir", "/tmp/dump"]).unwrap();
        assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/dump")));
    }
}
