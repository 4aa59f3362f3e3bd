//! Diarization error taxonomy
//!
//! Recoverable errors mean "diarization unavailable for this request",
//! and the caller falls back to the plain transcript. Anything else is
//! a caller bug or an environment fault and propagates.

use thiserror::Error;

/// Errors produced by the diarization pipeline.
#[derive(Debug, Clone, Error)]
pub enum DiarizeError {
    /// Fewer than two chunks survived embedding; there is nothing to
    /// cluster.
    #[error("not enough usable voice embeddings ({usable}) to cluster")]
    InsufficientData { usable: usize },

    /// The clustering step failed unexpectedly.
    #[error("speaker clustering failed: {0}")]
    Clustering(String),

    /// The encoder was fed audio at the wrong rate. This is a call-site
    /// bug, not a per-chunk failure, and is never swallowed.
    #[error("speaker encoder requires {expected} Hz input, got {got} Hz")]
    UnsupportedSampleRate { expected: u32, got: u32 },
}

impl DiarizeError {
    /// Whether the caller should degrade to an undiarized transcript
    /// instead of failing the request.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DiarizeError::InsufficientData { .. } | DiarizeError::Clustering(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_split() {
        assert!(DiarizeError::InsufficientData { usable: 1 }.is_recoverable());
        assert!(DiarizeError::Clustering("x".into()).is_recoverable());
        assert!(!DiarizeError::UnsupportedSampleRate {
            expected: 16000,
            got: 44100
        }
        .is_recoverable());
    }
}
