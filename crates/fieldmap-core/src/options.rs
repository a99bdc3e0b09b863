//! Pipeline options.
//!
//! All fields have defaults, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! max_file_size = 5242880
//!
//! [matcher]
//! synonym_fuzzy_discount = 0.85
//!
//! [matcher.thresholds]
//! low = 0.65
//! ```

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use fieldmap_ingest::MAX_UPLOAD_SIZE;
use fieldmap_map::MatcherConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Largest accepted payload in bytes.
    pub max_file_size: u64,
    pub matcher: MatcherConfig,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_file_size: MAX_UPLOAD_SIZE,
            matcher: MatcherConfig::default(),
        }
    }
}

impl PipelineOptions {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let options: Self = toml::from_str(contents).context("Failed to parse pipeline options")?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read options from {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("Invalid options in {}", path.display()))
    }

    /// Rejects scores outside `[0, 1]` and unordered thresholds.
    pub fn validate(&self) -> Result<()> {
        let matcher = &self.matcher;
        let thresholds = &matcher.thresholds;
        for (name, value) in [
            ("thresholds.low", thresholds.low),
            ("thresholds.medium", thresholds.medium),
            ("thresholds.high", thresholds.high),
            ("synonym_confidence", matcher.synonym_confidence),
            ("synonym_fuzzy_discount", matcher.synonym_fuzzy_discount),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("{name} must be between 0 and 1, got {value}");
            }
        }
        if thresholds.low > thresholds.medium || thresholds.medium > thresholds.high {
            bail!(
                "thresholds must satisfy low <= medium <= high, got {} / {} / {}",
                thresholds.low,
                thresholds.medium,
                thresholds.high
            );
        }
        if self.max_file_size == 0 {
            bail!("max_file_size must be positive");
        }
        Ok(())
    }
}
