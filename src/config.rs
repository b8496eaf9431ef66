//! Configuration management for the resume matcher

use crate::error::{Result, ResumeMatchError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Tunables for keyword extraction and coverage matching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub keyword_limit: usize,
    /// Partial-similarity ratio (0-100) a fuzzy match must reach
    pub fuzzy_threshold: f64,
    pub snippet_window: usize,
    pub max_snippets: usize,
    pub max_missing_terms: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProviderKind,
    pub model: String,
    pub models_dir: PathBuf,
    /// Size of the hashed bag-of-words fallback vectors
    pub dimensions: usize,
    pub timeout_ms: u64,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    Hashing,
    Model2Vec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub detailed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            keyword_limit: 50,
            fuzzy_threshold: 90.0,
            snippet_window: 80,
            max_snippets: 5,
            max_missing_terms: 8,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-match")
            .join("models");

        Self {
            provider: EmbeddingProviderKind::Hashing,
            model: "potion-base-8M".to_string(),
            models_dir,
            dimensions: 256,
            timeout_ms: 10_000,
            batch_size: 32,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
            detailed: false,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.keyword_limit == 0 {
            return Err(ResumeMatchError::Configuration(
                "engine.keyword_limit must be at least 1".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.fuzzy_threshold) {
            return Err(ResumeMatchError::Configuration(format!(
                "engine.fuzzy_threshold must be within 0-100, got {}",
                self.fuzzy_threshold
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load from the default location, writing defaults on first use
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str::<Config>(&content).map_err(|e| {
                ResumeMatchError::Configuration(format!("Failed to parse config: {}", e))
            })?
        } else {
            let config = Self::default();
            config.save_to(path)?;
            config
        };

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResumeMatchError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-match")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        if self.embedding.dimensions == 0 {
            return Err(ResumeMatchError::Configuration(
                "embedding.dimensions must be at least 1".to_string(),
            ));
        }
        if self.embedding.batch_size == 0 {
            return Err(ResumeMatchError::Configuration(
                "embedding.batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn models_dir(&self) -> &Path {
        &self.embedding.models_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.keyword_limit, 50);
        assert_eq!(config.engine.fuzzy_threshold, 90.0);
        assert_eq!(config.embedding.provider, EmbeddingProviderKind::Hashing);
    }

    #[test]
    fn test_invalid_engine_config() {
        let mut config = Config::default();
        config.engine.fuzzy_threshold = 120.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.engine.keyword_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_creates_defaults_and_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let created = Config::load_from(&path).unwrap();
        assert!(path.exists());

        let mut changed = created.clone();
        changed.engine.keyword_limit = 20;
        changed.embedding.provider = EmbeddingProviderKind::Model2Vec;
        changed.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.engine.keyword_limit, 20);
        assert_eq!(reloaded.embedding.provider, EmbeddingProviderKind::Model2Vec);
    }

    #[test]
    fn test_partial_config_uses_section_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[output]\nformat = \"json\"\ncolor_output = false\ndetailed = true\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.engine.snippet_window, 80);
    }
}
