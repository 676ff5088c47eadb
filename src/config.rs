//! Tunable constants of the validation pipeline.
//!
//! TOML shape (every key optional):
//! gender_sum_tolerance = 0.1
//! percentage_min = 0.0
//! percentage_max = 100.0
//! max_list_items = 20

use crate::Result;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Allowed distance of male + female percentage from 100.
    pub gender_sum_tolerance: f64,

    /// Inclusive bounds for percentage values.
    pub percentage_min: f64,
    pub percentage_max: f64,

    /// Keep only the first N pieces when free text is split into a list.
    pub max_list_items: Option<usize>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            gender_sum_tolerance: 0.1,
            percentage_min: 0.0,
            percentage_max: 100.0,
            max_list_items: None,
        }
    }
}

impl ValidatorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ValidatorConfig = toml::from_str(text).context("parse config toml")?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("bad config in {}", path.display()))
    }

    fn check(&self) -> Result<()> {
        if self.gender_sum_tolerance.is_nan() || self.gender_sum_tolerance < 0.0 {
            bail!(
                "gender_sum_tolerance must be >= 0, got {}",
                self.gender_sum_tolerance
            );
        }
        if self.percentage_min.is_nan()
            || self.percentage_max.is_nan()
            || self.percentage_min > self.percentage_max
        {
            bail!(
                "percentage_min ({}) must not exceed percentage_max ({})",
                self.percentage_min,
                self.percentage_max
            );
        }
        if self.max_list_items == Some(0) {
            bail!("max_list_items must be at least 1");
        }
        Ok(())
    }

    pub(crate) fn percentage_in_range(&self, v: f64) -> bool {
        self.percentage_min <= v && v <= self.percentage_max
    }
}
