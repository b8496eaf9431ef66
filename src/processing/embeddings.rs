//! Text embeddings: pluggable providers and the deterministic fallback

use crate::config::{EmbeddingConfig, EmbeddingProviderKind};
use crate::error::{Result, ResumeMatchError};
use async_trait::async_trait;
use log::{debug, info, warn};
use model2vec_rs::model::StaticModel;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Anything that can turn texts into vectors, one per input text
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Hashed bag-of-words vectors. Identical text always yields the
/// identical vector, on every platform.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in text.to_lowercase().split_whitespace() {
            let bucket = (fnv1a(token.as_bytes()) % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }
        vector
    }

    pub fn embed_all(&self, texts: &[String]) -> Vec<Vec<f32>> {
        texts.iter().map(|t| self.embed_text(t)).collect()
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self.embed_all(texts))
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(PRIME))
}

/// Local Model2Vec static model
pub struct Model2VecEmbedder {
    model: Arc<StaticModel>,
    name: String,
    batch_size: usize,
}

impl Model2VecEmbedder {
    pub fn load(model_path: &Path, name: &str, batch_size: usize) -> Result<Self> {
        if !model_path.is_dir() {
            return Err(ResumeMatchError::ModelNotFound(model_path.display().to_string()));
        }

        let start_time = Instant::now();
        info!("Loading Model2Vec model from {}", model_path.display());

        let model = StaticModel::from_pretrained(model_path, None, None, None)?;

        info!("Model loaded in {:.2?}", start_time.elapsed());
        Ok(Self {
            model: Arc::new(model),
            name: name.to_string(),
            batch_size: batch_size.max(1),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for Model2VecEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let model = Arc::clone(&self.model);
        let texts = texts.to_vec();
        let batch_size = self.batch_size;

        tokio::task::spawn_blocking(move || model.encode_with_args(&texts, Some(512), batch_size))
            .await
            .map_err(|e| ResumeMatchError::Embedding(format!("Encoding task failed: {}", e)))
    }
}

/// Vectors from one embedding call, tagged with where they came from
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingOutcome {
    Provided { provider: String, vectors: Vec<Vec<f32>> },
    Fallback { reason: String, vectors: Vec<Vec<f32>> },
}

impl EmbeddingOutcome {
    pub fn vectors(&self) -> &[Vec<f32>] {
        match self {
            Self::Provided { vectors, .. } | Self::Fallback { vectors, .. } => vectors,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// "provided" or "fallback"
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Provided { .. } => "provided",
            Self::Fallback { .. } => "fallback",
        }
    }
}

/// The engine's embedding capability: an optional provider behind a
/// bounded timeout, with the hashing fallback for every failure path.
#[derive(Clone)]
pub struct Embedder {
    provider: Option<Arc<dyn EmbeddingProvider>>,
    fallback: HashingEmbedder,
    timeout: Duration,
}

impl Embedder {
    pub fn new(
        provider: Option<Arc<dyn EmbeddingProvider>>,
        fallback_dimensions: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            fallback: HashingEmbedder::new(fallback_dimensions),
            timeout,
        }
    }

    pub fn fallback_only(dimensions: usize) -> Self {
        Self::new(None, dimensions, Duration::from_millis(0))
    }

    /// Build from configuration. A model that cannot be loaded leaves the
    /// embedder in fallback mode rather than failing.
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        let timeout = Duration::from_millis(config.timeout_ms);

        let provider: Option<Arc<dyn EmbeddingProvider>> = match config.provider {
            EmbeddingProviderKind::Hashing => None,
            EmbeddingProviderKind::Model2Vec => {
                let model_path = config.models_dir.join(&config.model);
                match Model2VecEmbedder::load(&model_path, &config.model, config.batch_size) {
                    Ok(embedder) => Some(Arc::new(embedder)),
                    Err(e) => {
                        warn!(
                            "Model '{}' unavailable, using hashed bag-of-words: {}",
                            config.model, e
                        );
                        None
                    }
                }
            }
        };

        Self::new(provider, config.dimensions, timeout)
    }

    pub fn provider_name(&self) -> &str {
        self.provider
            .as_ref()
            .map(|p| p.name())
            .unwrap_or_else(|| self.fallback.name())
    }

    /// Embed texts, never failing: provider errors, timeouts and malformed
    /// output all degrade to the hashing fallback.
    pub async fn embed(&self, texts: &[String]) -> EmbeddingOutcome {
        let Some(provider) = &self.provider else {
            return self.fall_back("no embedding provider configured".to_string(), texts);
        };

        let reason = match tokio::time::timeout(self.timeout, provider.embed(texts)).await {
            Ok(Ok(vectors)) => match validate_shape(&vectors, texts.len()) {
                Ok(()) => {
                    debug!("Provider '{}' embedded {} texts", provider.name(), texts.len());
                    return EmbeddingOutcome::Provided {
                        provider: provider.name().to_string(),
                        vectors,
                    };
                }
                Err(e) => e.to_string(),
            },
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("provider timed out after {:?}", self.timeout),
        };

        warn!("Embedding provider '{}' failed, falling back: {}", provider.name(), reason);
        self.fall_back(reason, texts)
    }

    fn fall_back(&self, reason: String, texts: &[String]) -> EmbeddingOutcome {
        EmbeddingOutcome::Fallback {
            reason,
            vectors: self.fallback.embed_all(texts),
        }
    }
}

fn validate_shape(vectors: &[Vec<f32>], expected: usize) -> Result<()> {
    if vectors.len() != expected {
        return Err(ResumeMatchError::Embedding(format!(
            "expected {} vectors, got {}",
            expected,
            vectors.len()
        )));
    }

    let dims = vectors.first().map(Vec::len).unwrap_or(0);
    if expected > 0 && dims == 0 {
        return Err(ResumeMatchError::Embedding("empty vectors".to_string()));
    }
    if vectors.iter().any(|v| v.len() != dims) {
        return Err(ResumeMatchError::Embedding("inconsistent vector dimensions".to_string()));
    }
    Ok(())
}

/// Cosine similarity; zero-norm or mismatched vectors score 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
