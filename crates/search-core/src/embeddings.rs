//! Text embeddings for the semantic channel
//!
//! The search core does not compute embeddings itself. It asks an
//! [`EmbeddingProvider`] (a remote model, a local model, or the
//! deterministic [`HashEmbedder`]) and memoizes every answer in an
//! [`EmbeddingCache`] keyed by the exact text.

use crate::error::{Result, SearchError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Shared, immutable embedding vector
pub type Embedding = Arc<[f32]>;

/// Source of embedding vectors
///
/// Implementations must return vectors of one fixed dimension for the
/// lifetime of a search. Equal text should yield equal (or near-equal)
/// vectors.
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for Arc<P> {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text)
    }
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for Box<P> {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text)
    }
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for &P {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text)
    }
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Provider calls that returned an error; failures are not cached
    pub failures: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

type Slot = Arc<Mutex<Option<Embedding>>>;

/// Memoizing front for an [`EmbeddingProvider`].
///
/// Keyed by exact text, unbounded, never evicts: memory grows with the number
/// of distinct texts embedded over the cache's lifetime. Each key has its own
/// slot lock, so concurrent requests for one text make at most one provider
/// call while requests for different texts proceed independently. A failed
/// call drops the slot and the next request retries.
pub struct EmbeddingCache<P> {
    provider: P,
    slots: Mutex<HashMap<String, Slot>>,
    filled: AtomicUsize,
    hits: AtomicU64,
    misses: AtomicU64,
    failures: AtomicU64,
}

impl<P: EmbeddingProvider> EmbeddingCache<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            slots: Mutex::new(HashMap::new()),
            filled: AtomicUsize::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// Get the embedding for `text`, calling the provider only on first use.
    pub fn get(&self, text: &str) -> Result<Embedding> {
        let slot = self.slot(text);
        let mut entry = slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(embedding) = entry.as_ref() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(embedding));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let vector = match self.embed_checked(text) {
            Ok(vector) => vector,
            Err(e) => {
                drop(entry);
                self.forget_failed(text, &slot);
                return Err(e);
            }
        };

        debug!("Embedded {} chars into {} dimensions", text.len(), vector.len());
        let embedding: Embedding = vector.into();
        *entry = Some(Arc::clone(&embedding));
        self.filled.fetch_add(1, Ordering::Relaxed);
        Ok(embedding)
    }

    /// Number of texts with a cached embedding
    pub fn len(&self) -> usize {
        self.filled.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn embed_checked(&self, text: &str) -> Result<Vec<f32>> {
        let result = self.provider.embed(text).and_then(|vector| {
            if vector.is_empty() {
                Err(SearchError::Embedding(
                    "provider returned an empty vector".to_string(),
                ))
            } else {
                Ok(vector)
            }
        });
        if result.is_err() {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        result
    }

    /// Drop the empty slot left by a failed call unless another caller
    /// is waiting on it.
    fn forget_failed(&self, text: &str, slot: &Slot) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // Clones are only handed out under the map lock: two owners means
        // the map and us
        let ours = slots.get(text).is_some_and(|current| Arc::ptr_eq(current, slot));
        if ours && Arc::strong_count(slot) == 2 {
            slots.remove(text);
        }
    }

    fn slot(&self, text: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = slots.get(text) {
            return Arc::clone(slot);
        }
        let slot = Slot::default();
        slots.insert(text.to_string(), Arc::clone(&slot));
        slot
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Default dimension for [`HashEmbedder`]
pub const HASH_EMBEDDING_DIM: usize = 384;

/// Deterministic bag-of-words embedder using FNV-1a feature hashing.
///
/// Each lowercase alphanumeric token is hashed into one of `dim` buckets with
/// a hash-derived sign, and the result is L2-normalized. No model, no network:
/// useful offline and in tests. Text without tokens embeds to the zero vector.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self {
            dim: HASH_EMBEDDING_DIM,
        }
    }
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    fn fnv1a(bytes: &[u8]) -> u64 {
        bytes.iter().fold(FNV_OFFSET, |hash, byte| {
            (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
        })
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dim];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = Self::fnv1a(token.to_lowercase().as_bytes());
            let bucket = (hash % self.dim as u64) as usize;
            let sign = if hash >> 63 == 1 { -1.0 } else { 1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }

        Ok(vector)
    }
}
