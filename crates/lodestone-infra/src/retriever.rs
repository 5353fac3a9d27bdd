//! Query-time retriever over a persisted flat index.
//!
//! `ProductRetriever` is a constructed service object with an explicit
//! lifecycle: the caller builds it once (the embedding model is expensive)
//! and shares it across queries. The index is loaded lazily on first use
//! and held as an immutable `Arc` snapshot; `refresh` loads a fresh
//! snapshot from disk and swaps the reference atomically, so in-flight
//! searches keep scanning the snapshot they started with and never observe
//! a partially rebuilt store.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use lodestone_core::embedder::Embedder;
use lodestone_core::hydrate::product_view;
use lodestone_types::error::{EmbedError, RetrieveError};
use lodestone_types::product::ScoredProduct;

use crate::flat::{artifacts_exist, FlatIndex};

/// Query-time facade: embeds queries, searches the index snapshot, and
/// hydrates raw metadata into sanitized product views.
pub struct ProductRetriever<E> {
    embedder: E,
    base: PathBuf,
    index: RwLock<Option<Arc<FlatIndex>>>,
}

impl<E: Embedder> ProductRetriever<E> {
    /// Create a retriever over the index artifacts keyed by `base`.
    ///
    /// No IO happens here; the index loads on the first query.
    pub fn new(embedder: E, base: impl Into<PathBuf>) -> Self {
        Self {
            embedder,
            base: base.into(),
            index: RwLock::new(None),
        }
    }

    /// Current snapshot, loading it from disk on first use.
    fn snapshot(&self) -> Result<Arc<FlatIndex>, RetrieveError> {
        let guard = self.index.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(index) = guard.as_ref() {
            return Ok(Arc::clone(index));
        }
        drop(guard);
        self.load_snapshot()
    }

    /// Load the persisted index and swap it in as the current snapshot.
    fn load_snapshot(&self) -> Result<Arc<FlatIndex>, RetrieveError> {
        if !artifacts_exist(&self.base) {
            return Err(RetrieveError::IndexNotBuilt);
        }

        let loaded = Arc::new(FlatIndex::load(&self.base, self.embedder.dimension())?);
        tracing::info!(
            count = loaded.len(),
            dimension = loaded.dimension(),
            base = %self.base.display(),
            "loaded index snapshot"
        );

        let mut guard = self.index.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Reload the index from disk, atomically replacing the snapshot.
    ///
    /// Call after a rebuild; searches that began on the old snapshot
    /// finish against it.
    pub fn refresh(&self) -> Result<(), RetrieveError> {
        self.load_snapshot().map(|_| ())
    }

    /// Search the catalog for the `k` products most similar to `query`.
    ///
    /// Results arrive in descending score order. `k == 0` yields an empty
    /// result; `k` beyond the store size yields everything stored.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredProduct>, RetrieveError> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let index = self.snapshot()?;

        let mut vectors = self.embedder.embed(&[query.to_string()]).await?;
        if vectors.is_empty() {
            return Err(EmbedError::ModelUnavailable(
                "encoder returned no vector for query".to_string(),
            )
            .into());
        }
        let query_vector = vectors.remove(0);

        let hits = index.search(&query_vector, k)?;
        tracing::debug!(query, k, hits = hits.len(), "catalog search");

        Ok(hits
            .into_iter()
            .filter_map(|hit| {
                index.metadata(hit.position).map(|raw| ScoredProduct {
                    product: product_view(raw, hit.position),
                    score: hit.score,
                })
            })
            .collect())
    }
}
