//! Flat vector index with binary + JSON persistence.
//!
//! An append-only sequence of fixed-dimension vectors paired positionally
//! with raw metadata records. Search is an exact linear scan by inner
//! product over every stored vector; with unit-normalized inputs the score
//! is cosine similarity.
//!
//! Persistence writes two aligned artifacts keyed by a shared base path:
//! - `<base>.index` -- magic header, dimension (u32 LE), count (u64 LE),
//!   then f32 LE vector data in insertion order
//! - `<base>.meta.json` -- a JSON array of metadata objects, order-aligned
//!   with the vector sequence
//!
//! Both artifacts are written through a temp file and renamed into place,
//! so a concurrent reader never observes a torn artifact.

use std::io::Write;
use std::path::{Path, PathBuf};

use lodestone_types::error::StoreError;
use lodestone_types::product::{Metadata, SearchHit};

/// Magic bytes identifying a Lodestone flat index artifact.
const INDEX_MAGIC: &[u8; 8] = b"FLATIDX1";

/// Header length: magic + dimension (u32) + count (u64).
const HEADER_LEN: usize = 8 + 4 + 8;

/// Path of the binary vector artifact for a base path.
pub fn index_path(base: &Path) -> PathBuf {
    artifact_path(base, ".index")
}

/// Path of the JSON metadata artifact for a base path.
pub fn meta_path(base: &Path) -> PathBuf {
    artifact_path(base, ".meta.json")
}

/// True when both persisted artifacts exist for `base`.
pub fn artifacts_exist(base: &Path) -> bool {
    index_path(base).exists() && meta_path(base).exists()
}

fn artifact_path(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Append-only flat vector index with positionally aligned metadata.
///
/// Invariant: `vectors.len() == metadata.len()` at all times; position is
/// the sole join key between the two sequences.
pub struct FlatIndex {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
    metadata: Vec<Metadata>,
}

impl FlatIndex {
    /// Create an empty index with a fixed vector dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
            metadata: Vec::new(),
        }
    }

    /// Number of stored vector/metadata pairs.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// True when nothing has been added yet.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// The fixed vector dimension of this index.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The metadata record at `position`, if in range.
    pub fn metadata(&self, position: usize) -> Option<&Metadata> {
        self.metadata.get(position)
    }

    /// Append vector/metadata pairs.
    ///
    /// Validates the pairing and every vector's dimension before mutating,
    /// so a rejected add leaves the index unchanged.
    pub fn add(&mut self, vectors: Vec<Vec<f32>>, metadata: Vec<Metadata>) -> Result<(), StoreError> {
        if vectors.len() != metadata.len() {
            return Err(StoreError::LengthMismatch {
                vectors: vectors.len(),
                metadata: metadata.len(),
            });
        }
        for vector in &vectors {
            if vector.len() != self.dimension {
                return Err(StoreError::DimensionMismatch {
                    expected: self.dimension,
                    actual: vector.len(),
                });
            }
        }

        self.vectors.extend(vectors);
        self.metadata.extend(metadata);
        Ok(())
    }

    /// Exact top-k search by inner product.
    ///
    /// Returns the top `min(k, len)` hits sorted by score descending, ties
    /// broken by lower position. An empty index (or `k == 0`) yields an
    /// empty result, never an error.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, StoreError> {
        if query.len() != self.dimension {
            return Err(StoreError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        if k == 0 || self.vectors.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits: Vec<SearchHit> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| SearchHit {
                position,
                score: dot(query, vector),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.position.cmp(&b.position))
        });
        hits.truncate(k);
        Ok(hits)
    }

    /// Persist both artifacts from one consistent snapshot.
    pub fn save(&self, base: &Path) -> Result<(), StoreError> {
        let dir = base.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(dir) = dir {
            std::fs::create_dir_all(dir)?;
        }
        let dir = dir.unwrap_or_else(|| Path::new("."));

        let mut bytes = Vec::with_capacity(HEADER_LEN + self.vectors.len() * self.dimension * 4);
        bytes.extend_from_slice(INDEX_MAGIC);
        bytes.extend_from_slice(&(self.dimension as u32).to_le_bytes());
        bytes.extend_from_slice(&(self.vectors.len() as u64).to_le_bytes());
        for vector in &self.vectors {
            for value in vector {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
        }
        write_atomic(dir, &index_path(base), &bytes)?;

        let meta = serde_json::to_vec_pretty(&self.metadata)?;
        write_atomic(dir, &meta_path(base), &meta)?;

        tracing::debug!(
            count = self.vectors.len(),
            dimension = self.dimension,
            base = %base.display(),
            "persisted flat index"
        );
        Ok(())
    }

    /// Reconstruct an index from both artifacts.
    ///
    /// A missing artifact, malformed header, truncated payload, or a
    /// vector/metadata count disagreement is a [`StoreError::Corrupt`];
    /// a stored dimension that differs from `expected_dim` is a
    /// [`StoreError::DimensionMismatch`].
    pub fn load(base: &Path, expected_dim: usize) -> Result<Self, StoreError> {
        let index_file = index_path(base);
        let meta_file = meta_path(base);
        if !index_file.exists() {
            return Err(StoreError::Corrupt(format!(
                "missing index artifact: {}",
                index_file.display()
            )));
        }
        if !meta_file.exists() {
            return Err(StoreError::Corrupt(format!(
                "missing metadata artifact: {}",
                meta_file.display()
            )));
        }

        let bytes = std::fs::read(&index_file)?;
        if bytes.len() < HEADER_LEN || &bytes[..8] != INDEX_MAGIC {
            return Err(StoreError::Corrupt(format!(
                "unrecognized index header in {}",
                index_file.display()
            )));
        }
        let dimension = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
        if dimension != expected_dim {
            return Err(StoreError::DimensionMismatch {
                expected: expected_dim,
                actual: dimension,
            });
        }
        let count = u64::from_le_bytes([
            bytes[12], bytes[13], bytes[14], bytes[15], bytes[16], bytes[17], bytes[18], bytes[19],
        ]) as usize;

        let payload = &bytes[HEADER_LEN..];
        let expected_len = count
            .checked_mul(dimension)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| StoreError::Corrupt("index payload length overflow".to_string()))?;
        if payload.len() != expected_len {
            return Err(StoreError::Corrupt(format!(
                "index payload is {} bytes, expected {expected_len}",
                payload.len()
            )));
        }

        let mut vectors = Vec::with_capacity(count);
        for row in payload.chunks_exact(dimension * 4) {
            let mut vector = Vec::with_capacity(dimension);
            for chunk in row.chunks_exact(4) {
                let value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                if !value.is_finite() {
                    return Err(StoreError::Corrupt(
                        "index contains non-finite values".to_string(),
                    ));
                }
                vector.push(value);
            }
            vectors.push(vector);
        }

        let meta_bytes = std::fs::read(&meta_file)?;
        let metadata: Vec<Metadata> = serde_json::from_slice(&meta_bytes).map_err(|e| {
            StoreError::Corrupt(format!(
                "malformed metadata artifact {}: {e}",
                meta_file.display()
            ))
        })?;

        if vectors.len() != metadata.len() {
            return Err(StoreError::Corrupt(format!(
                "vector count {} does not match metadata count {}",
                vectors.len(),
                metadata.len()
            )));
        }

        Ok(Self {
            dimension,
            vectors,
            metadata,
        })
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Write `bytes` to `path` through a temp file in the same directory,
/// renaming into place so readers see either the old or the new artifact.
fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}
