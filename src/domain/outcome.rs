//! Terminal states of catalog items and the per-run tally.
//!
//! Each item moves `Pending -> Resolving -> Downloading -> Saved`, and may
//! stop early as `Unavailable` or `Failed`. Only terminal states are recorded.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::AppId;

/// Stage at which an item stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Resolution request failed (transport or status)
    Resolve,

    /// Resolution record could not be parsed
    Parse,

    /// Package download failed (transport or status)
    Download,

    /// Package or manifest could not be written
    Persist,
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureStage::Resolve => write!(f, "resolve"),
            FailureStage::Parse => write!(f, "parse"),
            FailureStage::Download => write!(f, "download"),
            FailureStage::Persist => write!(f, "persist"),
        }
    }
}

/// Terminal state of a single catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ItemOutcome {
    /// Package written and recorded in the manifest
    Saved {
        app_id: AppId,
        product_name: String,
        version_name: String,
        path: PathBuf,
        size_bytes: u64,
        sha256: String,
    },

    /// The store returned no download link
    Unavailable { app_id: AppId },

    /// Item stopped with an error
    Failed {
        app_id: AppId,
        stage: FailureStage,
        error: String,
    },
}

impl ItemOutcome {
    pub fn app_id(&self) -> &AppId {
        match self {
            ItemOutcome::Saved { app_id, .. }
            | ItemOutcome::Unavailable { app_id }
            | ItemOutcome::Failed { app_id, .. } => app_id,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, ItemOutcome::Saved { .. })
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// SDK version the run was keyed by
    pub sdk_version: String,

    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,

    /// Outcomes in catalog order
    pub outcomes: Vec<ItemOutcome>,
}

impl RunReport {
    pub fn new(sdk_version: impl Into<String>) -> Self {
        Self {
            sdk_version: sdk_version.into(),
            started_at: Utc::now(),
            completed_at: None,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: ItemOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn finish(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Number of items processed
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn saved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_saved()).count()
    }

    pub fn unavailable(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ItemOutcome::Unavailable { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ItemOutcome::Failed { .. }))
            .count()
    }

    /// Find the outcome recorded for an item
    pub fn outcome_for(&self, app_id: &str) -> Option<&ItemOutcome> {
        self.outcomes.iter().find(|o| o.app_id().as_str() == app_id)
    }
}
