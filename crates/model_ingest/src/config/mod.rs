//! Builder configuration
//!
//! Loaded from `.toml` or `.ron` files; any field left out keeps its default.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

/// On-disk configuration format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration that can be read from and written to disk
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::of(path)?;
        let contents = std::fs::read_to_string(path)?;

        match format {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::of(path)? {
            Format::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// What `begin_material` does when the name is already in the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateMaterialPolicy {
    /// The new definition replaces the registered one
    #[default]
    Replace,
    /// The first definition wins; later ones are parsed and dropped
    KeepFirst,
}

/// # Builder Configuration
///
/// Injected into every [`ModelBuilder`](crate::builder::ModelBuilder) so a
/// parse session depends only on its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// `log` target used for every record emitted by the session
    pub log_target: String,
    /// Trim whitespace around group names
    pub trim_group_names: bool,
    /// Redefinition policy for material names
    pub duplicate_materials: DuplicateMaterialPolicy,
    /// Warn when a finished model has no faces
    pub warn_on_empty_model: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            log_target: "model_ingest".to_string(),
            trim_group_names: true,
            duplicate_materials: DuplicateMaterialPolicy::Replace,
            warn_on_empty_model: true,
        }
    }
}

impl Config for BuilderConfig {}

impl BuilderConfig {
    /// Set the log target
    pub fn with_log_target(mut self, target: impl Into<String>) -> Self {
        self.log_target = target.into();
        self
    }

    /// Set the duplicate material policy
    pub const fn with_duplicate_materials(mut self, policy: DuplicateMaterialPolicy) -> Self {
        self.duplicate_materials = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: BuilderConfig = toml::from_str(
            r#"
log_target = "scene.ingest"
duplicate_materials = "keep_first"
"#,
        )
        .unwrap();

        assert_eq!(config.log_target, "scene.ingest");
        assert_eq!(config.duplicate_materials, DuplicateMaterialPolicy::KeepFirst);
        assert!(config.trim_group_names);
        assert!(config.warn_on_empty_model);
    }

    #[test]
    fn test_ron_config() {
        let config: BuilderConfig =
            ron::from_str("(trim_group_names: false, warn_on_empty_model: false)").unwrap();

        assert!(!config.trim_group_names);
        assert!(!config.warn_on_empty_model);
        assert_eq!(config.log_target, "model_ingest");
    }

    #[test]
    fn test_save_and_load_round_trip_through_file() {
        let path = std::env::temp_dir().join("model_ingest_config_test.ron");

        let config = BuilderConfig::default()
            .with_log_target("round.trip")
            .with_duplicate_materials(DuplicateMaterialPolicy::KeepFirst);
        config.save_to_file(&path).unwrap();
        let loaded = BuilderConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_format() {
        let result = BuilderConfig::default().save_to_file("config.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));

        let result = BuilderConfig::load_from_file("missing_config.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
