//! # Campaign Descriptor
//!
//! Optional local metadata naming the campaign and the organization behind it.
//! The descriptor only decorates the checkout line item, so it is read
//! best-effort: a missing or broken file yields the default label.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

/// Product label used when no campaign descriptor is usable
pub const DEFAULT_PRODUCT_LABEL: &str = "Donation";

/// Campaign descriptor as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignConfig {
    /// Display title of the campaign
    #[serde(default)]
    pub campaign_title: Option<String>,

    /// Organization collecting the donations
    #[serde(default)]
    pub organization_name: Option<String>,
}

impl CampaignConfig {
    pub fn new(title: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            campaign_title: Some(title.into()),
            organization_name: Some(organization.into()),
        }
    }

    /// Parse a descriptor from JSON
    pub fn from_json(json: &str) -> Result<Self, CampaignError> {
        serde_json::from_str(json).map_err(|e| CampaignError::Parse(e.to_string()))
    }

    /// Parse a descriptor from TOML
    pub fn from_toml(toml_str: &str) -> Result<Self, CampaignError> {
        toml::from_str(toml_str).map_err(|e| CampaignError::Parse(e.to_string()))
    }

    /// `"{title} — {org}"`, or whichever half is present
    pub fn label(&self) -> Option<String> {
        let title = non_blank(self.campaign_title.as_deref());
        let org = non_blank(self.organization_name.as_deref());

        match (title, org) {
            (Some(t), Some(o)) => Some(format!("{} — {}", t, o)),
            (Some(t), None) => Some(t.to_string()),
            (None, Some(o)) => Some(o.to_string()),
            (None, None) => None,
        }
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Why a campaign descriptor could not be used
#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("Failed to read campaign descriptor {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse campaign descriptor: {0}")]
    Parse(String),
}

/// Source of the campaign descriptor.
///
/// `Ok(None)` means no descriptor is configured; errors are reported so the
/// caller can log them before falling back.
#[async_trait]
pub trait CampaignSource: Send + Sync {
    async fn load(&self) -> Result<Option<CampaignConfig>, CampaignError>;

    /// Label derived from the current descriptor, swallowing failures
    async fn load_campaign_label(&self) -> Option<String> {
        match self.load().await {
            Ok(Some(config)) => config.label(),
            Ok(None) => None,
            Err(e) => {
                warn!("Ignoring campaign descriptor: {}", e);
                None
            }
        }
    }

    /// Label to put on the checkout line item
    async fn product_label(&self) -> String {
        self.load_campaign_label()
            .await
            .unwrap_or_else(|| DEFAULT_PRODUCT_LABEL.to_string())
    }
}

/// Reads the descriptor from disk on every call, so edits apply without a restart
#[derive(Debug, Clone)]
pub struct FileCampaignSource {
    path: PathBuf,
}

impl FileCampaignSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_toml(&self) -> bool {
        self.path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false)
    }
}

#[async_trait]
impl CampaignSource for FileCampaignSource {
    async fn load(&self) -> Result<Option<CampaignConfig>, CampaignError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No campaign descriptor at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(CampaignError::Read {
                    path: self.path.display().to_string(),
                    message: e.to_string(),
                })
            }
        };

        let config = if self.is_toml() {
            CampaignConfig::from_toml(&content)?
        } else {
            CampaignConfig::from_json(&content)?
        };

        Ok(Some(config))
    }
}

/// Fixed descriptor (or none), for deployments without a file and for tests
#[derive(Debug, Clone, Default)]
pub struct StaticCampaignSource {
    config: Option<CampaignConfig>,
}

impl StaticCampaignSource {
    pub fn new(config: Option<CampaignConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CampaignSource for StaticCampaignSource {
    async fn load(&self) -> Result<Option<CampaignConfig>, CampaignError> {
        Ok(self.config.clone())
    }
}
