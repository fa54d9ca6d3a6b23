//! Dataset and chat history configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where datasets live and how much of them answers may quote
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Directory holding the dataset files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_crop_production_file")]
    pub crop_production_file: String,

    #[serde(default = "default_rainfall_file")]
    pub rainfall_file: String,

    #[serde(default = "default_social_groups_file")]
    pub social_groups_file: String,

    /// Length of the top-crops ranking in crop summaries
    #[serde(default = "default_top_crops_limit")]
    pub top_crops_limit: usize,

    /// Number of district names listed in crop summaries
    #[serde(default = "default_district_limit")]
    pub district_limit: usize,

    /// Persist chat history as YAML under this directory; in memory when unset
    pub history_dir: Option<PathBuf>,
}

impl DataConfig {
    /// Validate data configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.crop_production_file.trim().is_empty() {
            return Err(ValidationError::EmptyFileName("crop_production_file"));
        }
        if self.rainfall_file.trim().is_empty() {
            return Err(ValidationError::EmptyFileName("rainfall_file"));
        }
        if self.social_groups_file.trim().is_empty() {
            return Err(ValidationError::EmptyFileName("social_groups_file"));
        }
        if self.top_crops_limit == 0 {
            return Err(ValidationError::ZeroLimit("top_crops_limit"));
        }
        if self.district_limit == 0 {
            return Err(ValidationError::ZeroLimit("district_limit"));
        }
        Ok(())
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            crop_production_file: default_crop_production_file(),
            rainfall_file: default_rainfall_file(),
            social_groups_file: default_social_groups_file(),
            top_crops_limit: default_top_crops_limit(),
            district_limit: default_district_limit(),
            history_dir: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_crop_production_file() -> String {
    "crop_production.csv".to_string()
}

fn default_rainfall_file() -> String {
    "rainfall.xls".to_string()
}

fn default_social_groups_file() -> String {
    "social_groups.csv".to_string()
}

fn default_top_crops_limit() -> usize {
    10
}

fn default_district_limit() -> usize {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_config_defaults() {
        let config = DataConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.rainfall_file, "rainfall.xls");
        assert_eq!(config.top_crops_limit, 10);
        assert_eq!(config.district_limit, 20);
        assert!(config.history_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_limits() {
        let config = DataConfig {
            top_crops_limit: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::ZeroLimit("top_crops_limit"))
        );
    }

    #[test]
    fn test_validation_blank_file_name() {
        let config = DataConfig {
            rainfall_file: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::EmptyFileName("rainfall_file"))
        );
    }
}
