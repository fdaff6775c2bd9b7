//! Configuration for extent aggregation.

use std::path::Path;
use std::str::FromStr;

use geo_common::{GeoRefError, GeoRefResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configuration for the extent manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtentManagerConfig {
    /// Samples per axis when reprojecting a layer extent.
    pub sample_grid_size: usize,

    /// How layer extents are merged into the model's world.
    pub merge_policy: MergePolicy,

    /// Maximum number of alias links followed to reach a layer's data.
    pub max_alias_depth: usize,
}

impl Default for ExtentManagerConfig {
    fn default() -> Self {
        Self {
            sample_grid_size: 10,
            merge_policy: MergePolicy::ReplaceOnFirst,
            max_alias_depth: 8,
        }
    }
}

impl ExtentManagerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("EXTENT_SAMPLE_GRID_SIZE") {
            if let Ok(size) = val.parse() {
                config.sample_grid_size = size;
            }
        }

        if let Ok(val) = std::env::var("EXTENT_MERGE_POLICY") {
            match val.parse() {
                Ok(policy) => config.merge_policy = policy,
                Err(e) => warn!(error = %e, "Ignoring EXTENT_MERGE_POLICY"),
            }
        }

        if let Ok(val) = std::env::var("EXTENT_MAX_ALIAS_DEPTH") {
            if let Ok(depth) = val.parse() {
                config.max_alias_depth = depth;
            }
        }

        config
    }

    /// Parse YAML; missing fields take their defaults.
    pub fn from_yaml(yaml: &str) -> GeoRefResult<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| GeoRefError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> GeoRefResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| GeoRefError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&yaml)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> GeoRefResult<()> {
        if self.sample_grid_size < 2 {
            return Err(GeoRefError::Config(
                "sample_grid_size must be >= 2".to_string(),
            ));
        }

        if self.max_alias_depth == 0 {
            return Err(GeoRefError::Config(
                "max_alias_depth must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Strategy for merging layer extents into the world extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Raster layers only; each extent is appended to the world as it is
    /// found. Only correct when a single layer is active.
    AppendAlways,
    /// Every active layer. An uninitialized model adopts the first extent
    /// without notification, later extents are joined and committed once.
    #[default]
    ReplaceOnFirst,
    /// Every active layer is joined into the current world, committed once.
    JoinAlways,
}

impl MergePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppendAlways => "append_always",
            Self::ReplaceOnFirst => "replace_on_first",
            Self::JoinAlways => "join_always",
        }
    }
}

impl FromStr for MergePolicy {
    type Err = GeoRefError;

    /// Case-insensitive; accepts `-` for `_` and the short forms
    /// `append`, `replace` and `join`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "append_always" | "append" => Ok(Self::AppendAlways),
            "replace_on_first" | "replace" => Ok(Self::ReplaceOnFirst),
            "join_always" | "join" => Ok(Self::JoinAlways),
            other => Err(GeoRefError::Config(format!(
                "unknown merge policy '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ExtentManagerConfig::default();
        assert_eq!(config.sample_grid_size, 10);
        assert_eq!(config.merge_policy, MergePolicy::ReplaceOnFirst);
        assert_eq!(config.max_alias_depth, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ExtentManagerConfig {
            sample_grid_size: 1,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GeoRefError::Config(_))));

        let config = ExtentManagerConfig {
            max_alias_depth: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_policy_parsing() {
        assert_eq!("join".parse::<MergePolicy>().unwrap(), MergePolicy::JoinAlways);
        assert_eq!(
            "Append-Always".parse::<MergePolicy>().unwrap(),
            MergePolicy::AppendAlways
        );
        assert_eq!(
            MergePolicy::ReplaceOnFirst.to_string().parse::<MergePolicy>().unwrap(),
            MergePolicy::ReplaceOnFirst
        );
        assert!("sometimes".parse::<MergePolicy>().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = ExtentManagerConfig::from_yaml("merge_policy: join_always\n").unwrap();
        assert_eq!(config.merge_policy, MergePolicy::JoinAlways);
        assert_eq!(config.sample_grid_size, 10);
    }

    #[test]
    fn test_invalid_yaml_is_rejected() {
        assert!(ExtentManagerConfig::from_yaml("sample_grid_size: 1\n").is_err());
        assert!(ExtentManagerConfig::from_yaml("merge_policy: sideways\n").is_err());
    }

    #[test]
    fn test_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sample_grid_size: 21").unwrap();
        writeln!(file, "max_alias_depth: 2").unwrap();

        let config = ExtentManagerConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.sample_grid_size, 21);
        assert_eq!(config.max_alias_depth, 2);

        assert!(ExtentManagerConfig::from_yaml_file("/nonexistent/extent.yaml").is_err());
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("EXTENT_SAMPLE_GRID_SIZE", "4");
        std::env::set_var("EXTENT_MERGE_POLICY", "append");
        std::env::set_var("EXTENT_MAX_ALIAS_DEPTH", "not a number");

        let config = ExtentManagerConfig::from_env();

        std::env::remove_var("EXTENT_SAMPLE_GRID_SIZE");
        std::env::remove_var("EXTENT_MERGE_POLICY");
        std::env::remove_var("EXTENT_MAX_ALIAS_DEPTH");

        assert_eq!(config.sample_grid_size, 4);
        assert_eq!(config.merge_policy, MergePolicy::AppendAlways);
        assert_eq!(config.max_alias_depth, 8);
    }
}
