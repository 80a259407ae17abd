//! Mimic configuration system
//!
//! This crate provides centralized configuration management for Mimic
//! hosts, loading settings from `mimic.toml` as an alternative to
//! environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Mimic hosts
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MimicConfig {
    /// Template store settings
    pub templates: TemplatesConfig,
    /// Defaults offered when annotating gradient-level bindings
    pub annotator: AnnotatorConfig,
    /// Update engine settings
    pub engine: EngineConfig,
}

/// Template store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Directory holding the template file; `None` uses the store's
    /// default location under the home directory
    pub dir: Option<PathBuf>,
}

/// Annotation defaults for gradient-level bindings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Color of the filled portion of the gradient
    pub fill_color: String,
    /// Color of the empty portion of the gradient
    pub empty_color: String,
    /// Lower bound of the mapped parameter range
    pub min: f64,
    /// Upper bound of the mapped parameter range
    pub max: f64,
}

/// Update engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Skip elements whose parameter value is unchanged since the last apply
    pub change_detection: bool,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self { dir: None }
    }
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            fill_color: "#0066cc".to_string(),
            empty_color: "#e0e0e0".to_string(),
            min: 0.0,
            max: 100.0,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            change_detection: true,
        }
    }
}

impl MimicConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the mimic.toml configuration file
    ///
    /// # Returns
    /// * `Ok(MimicConfig)` - Successfully loaded configuration
    /// * `Err(String)` - Error message if loading failed
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration from the default location (mimic.toml in the current directory)
    /// or return default configuration if file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("mimic.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// This allows for temporary overrides without modifying the config file.
    pub fn merge_with_env(&mut self) {
        if let Ok(dir) = std::env::var("MIMIC_TEMPLATE_DIR") {
            self.templates.dir = Some(PathBuf::from(dir));
        }

        if let Ok(color) = std::env::var("MIMIC_FILL_COLOR") {
            self.annotator.fill_color = color;
        }
        if let Ok(color) = std::env::var("MIMIC_EMPTY_COLOR") {
            self.annotator.empty_color = color;
        }

        if let Ok(val) = std::env::var("MIMIC_CHANGE_DETECTION") {
            self.engine.change_detection = val == "1" || val.eq_ignore_ascii_case("true");
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// This is the recommended way to load configuration:
    /// 1. Load from mimic.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MimicConfig::default();
        assert_eq!(config.annotator.fill_color, "#0066cc");
        assert_eq!(config.annotator.empty_color, "#e0e0e0");
        assert_eq!(config.annotator.min, 0.0);
        assert_eq!(config.annotator.max, 100.0);
        assert!(config.engine.change_detection);
        assert!(config.templates.dir.is_none());
    }

    #[test]
    fn test_toml_serialization() {
        let config = MimicConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: MimicConfig = toml::from_str(&toml_str).unwrap();
        assert!(parsed.engine.change_detection);
        assert_eq!(parsed.annotator.max, 100.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed: MimicConfig = toml::from_str(
            "[annotator]\nfill_color = \"#ff0000\"\n\n[engine]\nchange_detection = false\n",
        )
        .unwrap();
        assert_eq!(parsed.annotator.fill_color, "#ff0000");
        assert_eq!(parsed.annotator.empty_color, "#e0e0e0");
        assert!(!parsed.engine.change_detection);
        assert!(parsed.templates.dir.is_none());
    }

    #[test]
    fn test_load_or_default() {
        // Should not panic even if mimic.toml doesn't exist
        let config = MimicConfig::load_or_default();
        // Verify defaults are set
        assert!(config.engine.change_detection);
        assert_eq!(config.annotator.min, 0.0);
    }

    #[test]
    fn test_merge_with_env() {
        // Set environment variable
        unsafe {
            std::env::set_var("MIMIC_TEMPLATE_DIR", "/tmp/mimic-templates");
            std::env::set_var("MIMIC_FILL_COLOR", "#123456");
            std::env::set_var("MIMIC_EMPTY_COLOR", "#654321");
            std::env::set_var("MIMIC_CHANGE_DETECTION", "false");
        }

        let mut config = MimicConfig::default();
        config.merge_with_env();

        assert_eq!(
            config.templates.dir.as_deref(),
            Some(Path::new("/tmp/mimic-templates"))
        );
        assert_eq!(config.annotator.fill_color, "#123456");
        assert_eq!(config.annotator.empty_color, "#654321");
        assert!(!config.engine.change_detection);

        // Clean up
        unsafe {
            std::env::remove_var("MIMIC_TEMPLATE_DIR");
            std::env::remove_var("MIMIC_FILL_COLOR");
            std::env::remove_var("MIMIC_EMPTY_COLOR");
            std::env::remove_var("MIMIC_CHANGE_DETECTION");
        }
    }
}
