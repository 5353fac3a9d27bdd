//! Embedder trait for text-to-vector conversion.
//!
//! Defines the interface for embedding catalog text into vectors for
//! semantic search. Implementations (e.g., fastembed local models) live in
//! lodestone-infra.

use lodestone_types::error::EmbedError;

/// Trait for converting text into unit-normalized embedding vectors.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in lodestone-infra.
///
/// Contract: every returned vector has L2 norm 1 (within floating
/// tolerance), so inner-product search behaves as cosine similarity, and
/// the same text embeds to the same vector regardless of batch size or
/// position. A failed model load or inference must surface as
/// [`EmbedError::ModelUnavailable`] -- never as silent zero vectors.
pub trait Embedder: Send + Sync {
    /// Embed one or more texts into vectors, one vector per input text.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, EmbedError>> + Send;

    /// The model name used for embeddings (e.g., "bge-small-en-v1.5").
    fn model_name(&self) -> &str;

    /// The dimensionality of the output vectors.
    fn dimension(&self) -> usize;
}
