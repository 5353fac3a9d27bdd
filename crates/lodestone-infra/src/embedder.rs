//! FastEmbed-based local embedding encoder.
//!
//! Implements the `Embedder` trait from `lodestone-core` using fastembed's
//! BGESmallENV15 model (384 dimensions) with ONNX runtime inference.
//! Inference is CPU-bound, so it runs on the blocking thread pool; the
//! session is serialized behind a mutex.
//!
//! Every output vector is explicitly re-normalized to unit length so
//! inner-product search behaves as cosine similarity regardless of model
//! internals.

use std::sync::{Arc, Mutex, PoisonError};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use lodestone_core::embedder::Embedder;
use lodestone_types::error::EmbedError;

/// Model identifier recorded for the deployment.
pub const MODEL_NAME: &str = "bge-small-en-v1.5";

/// BGESmallENV15 embedding dimension.
pub const EMBEDDING_DIMENSION: usize = 384;

/// Local embedding encoder backed by fastembed's BGESmallENV15 model.
pub struct FastembedEncoder {
    model: Arc<Mutex<TextEmbedding>>,
}

impl FastembedEncoder {
    /// Initialize the ONNX session.
    ///
    /// Downloads the model on first use; a failed load surfaces as
    /// [`EmbedError::ModelUnavailable`].
    pub fn new() -> Result<Self, EmbedError> {
        let model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::BGESmallENV15).with_show_download_progress(false),
        )
        .map_err(|e| EmbedError::ModelUnavailable(e.to_string()))?;

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

impl Embedder for FastembedEncoder {
    fn embed(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, EmbedError>> + Send {
        let model = Arc::clone(&self.model);
        let texts = texts.to_vec();

        async move {
            if texts.is_empty() {
                return Ok(Vec::new());
            }

            tokio::task::spawn_blocking(move || {
                let mut model = model.lock().unwrap_or_else(PoisonError::into_inner);
                let raw = model
                    .embed(texts, None)
                    .map_err(|e| EmbedError::ModelUnavailable(e.to_string()))?;
                Ok(raw.into_iter().map(l2_normalize).collect())
            })
            .await
            .map_err(|e| EmbedError::ModelUnavailable(format!("embedding task failed: {e}")))?
        }
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }
}

/// Scale a vector to unit L2 norm; a zero vector passes through unchanged.
fn l2_normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l2_normalize_produces_unit_vectors() {
        let normalized = l2_normalize(vec![3.0, 4.0]);
        let norm: f32 = normalized.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
        assert!((normalized[0] - 0.6).abs() < 1e-6);
        assert!((normalized[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize_zero_vector_unchanged() {
        assert_eq!(l2_normalize(vec![0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
    }

    #[tokio::test]
    #[ignore = "downloads the embedding model"]
    async fn test_encoder_outputs_unit_norm_384() {
        let encoder = FastembedEncoder::new().unwrap();
        assert_eq!(encoder.dimension(), 384);

        let vectors = encoder
            .embed(&["red ceramic mug".to_string(), "oak bookshelf".to_string()])
            .await
            .unwrap();
        assert_eq!(vectors.len(), 2);
        for vector in &vectors {
            assert_eq!(vector.len(), 384);
            let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-4);
        }

        // Single-item encoding must match the batch result for the same text.
        let single = encoder
            .embed(&["red ceramic mug".to_string()])
            .await
            .unwrap();
        for (a, b) in single[0].iter().zip(vectors[0].iter()) {
            assert!((a - b).abs() < 1e-5);
        }
    }
}
