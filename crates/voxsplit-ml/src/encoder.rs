//! ONNX speaker-embedding encoder
//!
//! Wraps a WeSpeaker-style speaker-embedding model: log-mel features in,
//! one fixed-length speaker vector out.

use crate::error::DiarizeError;
use crate::mel::{MelConfig, MelProcessor};
use crate::traits::EmbeddingEngine;
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use parking_lot::Mutex;

/// Sample rate the encoder models are trained on.
pub const ENCODER_SAMPLE_RATE: u32 = 16_000;

/// Speaker encoder configuration
#[derive(Debug, Clone)]
pub struct SpeakerEncoderConfig {
    /// Path to the speaker-embedding ONNX model
    pub model_path: String,
    /// Embedding vector length, default: 256 (WeSpeaker ResNet34)
    pub embedding_dim: usize,
    /// ONNX Runtime intra-op threads
    pub intra_threads: usize,
}

impl Default for SpeakerEncoderConfig {
    fn default() -> Self {
        Self {
            model_path: String::new(),
            embedding_dim: 256,
            intra_threads: 2,
        }
    }
}

/// ONNX-backed voice embedder
pub struct OnnxSpeakerEncoder {
    session: Mutex<Session>,
    mel: MelProcessor,
    config: SpeakerEncoderConfig,
}

impl OnnxSpeakerEncoder {
    /// Load the embedding model from `config.model_path`.
    pub fn new(config: SpeakerEncoderConfig) -> Result<Self> {
        tracing::info!("Loading speaker encoder from: {}", config.model_path);

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(config.intra_threads)?
            .commit_from_file(&config.model_path)
            .context("Failed to load speaker-embedding ONNX model")?;

        tracing::info!(
            "Speaker encoder initialized: dim={}, input={} Hz mel features",
            config.embedding_dim,
            ENCODER_SAMPLE_RATE
        );

        Ok(Self {
            session: Mutex::new(session),
            mel: MelProcessor::new(MelConfig::default()),
            config,
        })
    }

    /// Create with default configuration and an explicit model path.
    pub fn from_model_path(model_path: &str) -> Result<Self> {
        Self::new(SpeakerEncoderConfig {
            model_path: model_path.to_string(),
            ..SpeakerEncoderConfig::default()
        })
    }
}

impl EmbeddingEngine for OnnxSpeakerEncoder {
    fn name(&self) -> &str {
        "wespeaker-onnx"
    }

    fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    fn embed(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<f32>> {
        if sample_rate != ENCODER_SAMPLE_RATE {
            return Err(DiarizeError::UnsupportedSampleRate {
                expected: ENCODER_SAMPLE_RATE,
                got: sample_rate,
            }
            .into());
        }

        let features = self.mel.compute(samples)?;
        let num_frames = features.len();
        let n_mels = self.mel.n_mels();

        // Flatten to [1, frames, n_mels]
        let mut flat = Vec::with_capacity(num_frames * n_mels);
        for frame in &features {
            flat.extend_from_slice(frame);
        }

        let input_tensor = ort::value::Tensor::from_array((
            [1_i64, num_frames as i64, n_mels as i64],
            flat,
        ))?;

        let embedding = {
            let mut session_guard = self.session.lock();
            let outputs = session_guard.run(ort::inputs![input_tensor])?;

            let (_shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .context("Failed to extract embedding tensor")?;

            if data.len() < self.config.embedding_dim {
                anyhow::bail!(
                    "embedding output too small: {} values, expected {}",
                    data.len(),
                    self.config.embedding_dim
                );
            }

            data[..self.config.embedding_dim].to_vec()
            // session_guard dropped here, lock released
        };

        Ok(normalize_embedding(&embedding))
    }
}

/// Normalize a vector to unit length
fn normalize_embedding(v: &[f32]) -> Vec<f32> {
    let sum_sq: f64 = v.iter().map(|&x| (x as f64) * (x as f64)).sum();

    if sum_sq < 1e-10 {
        return v.to_vec();
    }

    let norm = (1.0 / sum_sq.sqrt()) as f32;
    v.iter().map(|&x| x * norm).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SpeakerEncoderConfig::default();
        assert_eq!(config.embedding_dim, 256);
        assert_eq!(config.intra_threads, 2);
    }

    #[test]
    fn test_normalize_embedding() {
        let v = vec![3.0, 4.0];
        let normalized = normalize_embedding(&v);
        let length: f32 = normalized.iter().map(|&x| x * x).sum::<f32>().sqrt();
        assert!((length - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_normalize_near_zero_is_identity() {
        let v = vec![0.0, 0.0, 0.0];
        assert_eq!(normalize_embedding(&v), v);
    }
}
