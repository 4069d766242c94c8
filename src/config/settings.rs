use std::{collections::BTreeSet, path::Path, path::PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{SlipError, SlipResult};

const DEFAULT_ENDPOINT_URL: &str = "https://script.google.com/macros/s/AKfycbxarjkYFt3fJPiZZtqbtIdDaxQCTnTqTS8V3t-Hu28NYVOuYyBGTLkuXN_AfkDnk4IBeg/exec";

const DEFAULT_RANKS: [&str; 8] = [
    "Teacher I",
    "Teacher II",
    "Teacher III",
    "Master Teacher I",
    "School Head",
    "Principal",
    "ADAS",
    "ADA",
];

/// Largest supported raster scale factor.
pub const MAX_RECEIPT_SCALE: f32 = 8.0;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Fixed inputs of the slip flow, supplied at startup.
///
/// Every field has a default so a JSON file only needs to name the values it overrides.
pub struct SlipConfig {
    /// Webhook receiving the JSON submission.
    pub endpoint_url: String,
    /// Printed under the approver signature line.
    pub approver_name: String,
    /// Approver role printed below the name.
    pub approver_title: String,
    /// Full institution name for the receipt header.
    pub institution_name: String,
    /// Short institution code; prefixes transaction identifiers.
    pub institution_code: String,
    /// Acronym of the application, shown as the receipt title.
    pub system_acronym: String,
    /// Long name of the application.
    pub system_name: String,
    /// Rank titles accepted by the form, in display order.
    pub valid_ranks: Vec<String>,
    /// Optional logo composited into the receipt header.
    pub logo_path: Option<PathBuf>,
    /// Receipt output settings.
    pub receipt: ReceiptSettings,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Output settings for the receipt image.
pub struct ReceiptSettings {
    /// File name prefix, joined to the applicant slug with `-`.
    pub file_prefix: String,
    /// Pixel density multiplier applied when rasterizing.
    pub scale: f32,
    /// JPEG quality in `1..=100`.
    pub jpeg_quality: u8,
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        Self {
            file_prefix: "pass-slip".to_string(),
            scale: 2.0,
            jpeg_quality: 95,
        }
    }
}

impl Default for SlipConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            approver_name: "ALEEN B. QUIPQUIPAN".to_string(),
            approver_title: "School Principal".to_string(),
            institution_name: "Guinsiliban National High School".to_string(),
            institution_code: "GNHS".to_string(),
            system_acronym: "GNHS-OLSAS".to_string(),
            system_name: "Online Locator Slip Application System".to_string(),
            valid_ranks: DEFAULT_RANKS.iter().map(|r| r.to_string()).collect(),
            logo_path: None,
            receipt: ReceiptSettings::default(),
        }
    }
}

impl SlipConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(s: &str) -> SlipResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| SlipError::config(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// A relative `logo_path` is resolved against the config file's directory.
    pub fn load(path: &Path) -> SlipResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let mut cfg = Self::from_json_str(&text)?;

        let resolved = match (&cfg.logo_path, path.parent()) {
            (Some(logo), Some(dir)) if logo.is_relative() => Some(dir.join(logo)),
            _ => None,
        };
        if resolved.is_some() {
            cfg.logo_path = resolved;
        }

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Whether `rank` is one of the configured titles.
    pub fn is_valid_rank(&self, rank: &str) -> bool {
        self.valid_ranks.iter().any(|r| r == rank)
    }

    /// Check invariants the rest of the crate relies on.
    pub fn validate(&self) -> SlipResult<()> {
        let url = self.endpoint_url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(SlipError::validation(
                "endpoint_url must be an http(s) URL",
            ));
        }

        if self.valid_ranks.is_empty() {
            return Err(SlipError::validation("valid_ranks must not be empty"));
        }
        let mut seen = BTreeSet::new();
        for rank in &self.valid_ranks {
            if rank.trim().is_empty() {
                return Err(SlipError::validation("valid_ranks must not contain blanks"));
            }
            if !seen.insert(rank.as_str()) {
                return Err(SlipError::validation(format!(
                    "valid_ranks contains '{rank}' twice"
                )));
            }
        }

        if self.receipt.file_prefix.trim().is_empty() {
            return Err(SlipError::validation("receipt.file_prefix must not be empty"));
        }
        let scale = self.receipt.scale;
        if !scale.is_finite() || scale <= 0.0 || scale > MAX_RECEIPT_SCALE {
            return Err(SlipError::validation(format!(
                "receipt.scale must be in (0, {MAX_RECEIPT_SCALE}], got {scale}"
            )));
        }
        if !(1..=100).contains(&self.receipt.jpeg_quality) {
            return Err(SlipError::validation(
                "receipt.jpeg_quality must be in 1..=100",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
