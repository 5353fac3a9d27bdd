use thiserror::Error;

/// Errors from embedding text into vectors.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("embedding model unavailable: {0}")]
    ModelUnavailable(String),
}

/// Errors from vector index operations (used by the flat index in
/// lodestone-infra).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("vector/metadata length mismatch: {vectors} vectors, {metadata} metadata records")]
    LengthMismatch { vectors: usize, metadata: usize },

    #[error("corrupt store: {0}")]
    Corrupt(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metadata serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors from query-time retrieval.
#[derive(Debug, Error)]
pub enum RetrieveError {
    #[error("index not built; run ingestion first")]
    IndexNotBuilt,

    #[error(transparent)]
    Embed(#[from] EmbedError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from the catalog ingest pipeline.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot read catalog source '{path}': {reason}")]
    Source { path: String, reason: String },

    #[error(transparent)]
    Embed(#[from] EmbedError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_error_display() {
        let err = EmbedError::ModelUnavailable("onnx session failed".to_string());
        assert_eq!(
            err.to_string(),
            "embedding model unavailable: onnx session failed"
        );
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::DimensionMismatch {
            expected: 384,
            actual: 128,
        };
        assert!(err.to_string().contains("384"));
        assert!(err.to_string().contains("128"));

        let err = StoreError::Corrupt("missing artifact".to_string());
        assert_eq!(err.to_string(), "corrupt store: missing artifact");
    }

    #[test]
    fn test_retrieve_error_wraps_embed_error() {
        let err = RetrieveError::from(EmbedError::ModelUnavailable("gone".to_string()));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_ingest_error_display() {
        let err = IngestError::Source {
            path: "catalog.csv".to_string(),
            reason: "No such file or directory".to_string(),
        };
        assert!(err.to_string().contains("catalog.csv"));
    }
}
