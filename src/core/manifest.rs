//! Append-only manifest of saved packages.
//!
//! The manifest is reset to its header at the start of every run, then
//! gains one line per saved package. The file is opened and closed for each
//! append.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::domain::ResolvedItem;

/// First line of every manifest
pub const MANIFEST_HEADER: &str = "Included apps and versions: ";

/// Manifest file handle (path only, opened per write)
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
}

impl Manifest {
    /// Truncate the manifest and write the header
    pub async fn reset(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(&path, format!("{}\n", MANIFEST_HEADER))
            .await
            .with_context(|| format!("Failed to reset manifest: {}", path.display()))?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a saved package
    pub async fn append(&self, item: &ResolvedItem) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open manifest: {}", self.path.display()))?;

        file.write_all(format!("{}\n", item.manifest_line()).as_bytes())
            .await
            .with_context(|| format!("Failed to append to manifest: {}", self.path.display()))?;
        file.flush().await?;

        Ok(())
    }
}
