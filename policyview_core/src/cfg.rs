use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Literal constants used when rendering a `NormalizedPolicy`.
///
/// `Default` carries the values the mobile screens expect. Hosts that need a
/// different placeholder can load overrides from JSON; any field left out keeps
/// its default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeCfg {
    /// Shown for absent descriptive fields (status, premium, agency, ...).
    pub placeholder: String,
    /// Literal prefix for the annual premium. Not locale-aware.
    pub currency_prefix: String,
    /// Time suffix the backend appends to term dates.
    pub midnight_suffix: String,
    pub date_separator: String,
}

impl Default for NormalizeCfg {
    fn default() -> Self {
        Self {
            placeholder: "N/A".to_string(),
            currency_prefix: "$".to_string(),
            midnight_suffix: ", 12:00:00 AM".to_string(),
            date_separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("normalize cfg is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("normalize cfg field `{field}` must not be empty")]
    Empty { field: &'static str },
}

impl NormalizeCfg {
    /// Parse a cfg from JSON, e.g. `{"placeholder": "-"}`.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: NormalizeCfg = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.placeholder.is_empty() {
            return Err(ConfigError::Empty { field: "placeholder" });
        }
        if self.midnight_suffix.is_empty() {
            return Err(ConfigError::Empty { field: "midnight_suffix" });
        }
        Ok(())
    }
}
