//! ML engine traits

use anyhow::Result;

/// Trait for voice-embedding engines.
///
/// Implementations must be safe for concurrent read-only inference
/// calls; the embedding is a pure function of one chunk's audio.
pub trait EmbeddingEngine: Send + Sync {
    /// Engine name
    fn name(&self) -> &str;

    /// Length of the embedding vectors this engine produces
    fn embedding_dim(&self) -> usize;

    /// Embed one audio chunk into a fixed-length speaker vector
    fn embed(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<f32>>;
}
