//! Model2Vec model registry, download and local lookup

use crate::error::{Result, ResumeMatchError};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

/// A downloadable static-embedding model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub dimensions: u32,
    pub description: String,
}

pub struct ModelManager {
    models_dir: PathBuf,
    registry: Vec<ModelInfo>,
    downloaded: HashSet<String>,
}

const REQUIRED_FILES: &[&str] = &["model.safetensors", "tokenizer.json"];
const OPTIONAL_FILES: &[&str] = &["config.json", "README.md"];

impl ModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                ResumeMatchError::ModelError(format!("Failed to create models directory: {}", e))
            })?;
        }

        let mut manager = Self {
            models_dir,
            registry: Self::default_registry(),
            downloaded: HashSet::new(),
        };
        manager.scan_downloaded_models().await?;

        Ok(manager)
    }

    fn default_registry() -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: "potion-base-8M".to_string(),
                name: "Potion Base 8M".to_string(),
                repo_id: "minishlab/potion-base-8M".to_string(),
                size_mb: 30,
                dimensions: 256,
                description: "Compact static embeddings, the recommended default".to_string(),
            },
            ModelInfo {
                id: "potion-base-32M".to_string(),
                name: "Potion Base 32M".to_string(),
                repo_id: "minishlab/potion-base-32M".to_string(),
                size_mb: 130,
                dimensions: 512,
                description: "Larger static embeddings with better recall".to_string(),
            },
            ModelInfo {
                id: "m2v-base".to_string(),
                name: "Model2Vec Base".to_string(),
                repo_id: "minishlab/M2V_base_output".to_string(),
                size_mb: 90,
                dimensions: 256,
                description: "Original Model2Vec base distillation".to_string(),
            },
        ]
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await.map_err(|e| {
            ResumeMatchError::ModelError(format!("Failed to scan models directory: {}", e))
        })?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && Self::is_model_directory(&entry.path()).await {
                self.downloaded
                    .insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(())
    }

    async fn is_model_directory(path: &Path) -> bool {
        for file in REQUIRED_FILES {
            if fs::metadata(path.join(file)).await.is_err() {
                return false;
            }
        }
        true
    }

    /// Download a registered model into the models directory
    pub async fn download_model(&mut self, model_id: &str, force: bool) -> Result<PathBuf> {
        let info = self
            .model_info(model_id)
            .cloned()
            .ok_or_else(|| ResumeMatchError::ModelNotFound(model_id.to_string()))?;

        let model_dir = self.models_dir.join(&info.id);
        if self.downloaded.contains(&info.id) {
            if !force {
                return Ok(model_dir);
            }
            fs::remove_dir_all(&model_dir).await?;
            self.downloaded.remove(&info.id);
        }

        info!("Downloading {} ({} MB) from {}", info.name, info.size_mb, info.repo_id);
        fs::create_dir_all(&model_dir).await?;

        let api = Api::new().map_err(|e| {
            ResumeMatchError::ModelError(format!("Failed to initialize HF API: {}", e))
        })?;
        let repo = api.model(info.repo_id.clone());

        for file in REQUIRED_FILES.iter().chain(OPTIONAL_FILES) {
            match repo.get(file).await {
                Ok(cached) => {
                    fs::copy(&cached, model_dir.join(file)).await.map_err(|e| {
                        ResumeMatchError::ModelError(format!("Failed to copy {}: {}", file, e))
                    })?;
                    info!("Downloaded {}", file);
                }
                Err(e) if OPTIONAL_FILES.contains(file) => {
                    warn!("Optional file {} not available: {}", file, e);
                }
                Err(e) => {
                    return Err(ResumeMatchError::ModelError(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )));
                }
            }
        }

        self.downloaded.insert(info.id.clone());
        Ok(model_dir)
    }

    pub fn model_path(&self, model_id: &str) -> Option<PathBuf> {
        let id = self.resolve_model_id(model_id)?;
        self.downloaded
            .contains(&id)
            .then(|| self.models_dir.join(id))
    }

    pub fn list_models(&self) -> &[ModelInfo] {
        &self.registry
    }

    pub fn is_downloaded(&self, model_id: &str) -> bool {
        self.resolve_model_id(model_id)
            .map(|id| self.downloaded.contains(&id))
            .unwrap_or(false)
    }

    pub fn model_info(&self, model_id: &str) -> Option<&ModelInfo> {
        let id = self.resolve_model_id(model_id)?;
        self.registry.iter().find(|m| m.id == id)
    }

    /// Accepts the short id, the hub repo id or the display name
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        let input_lower = input.to_lowercase();
        self.registry
            .iter()
            .find(|m| m.id == input)
            .or_else(|| self.registry.iter().find(|m| m.repo_id == input))
            .or_else(|| self.registry.iter().find(|m| m.name.to_lowercase() == input_lower))
            .map(|m| m.id.clone())
    }
}
