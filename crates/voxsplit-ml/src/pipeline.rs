//! Diarization pipeline
//!
//! Wires the re-segmenter, voice embedder, speaker clusterer and
//! transcript assembler into one entry point. The embedding engine is
//! injected at construction; the `Diarizer` is built once and shared
//! across requests.

use crate::assemble::assemble;
use crate::cluster::cluster_embeddings;
use crate::error::DiarizeError;
use crate::resegment::{resegment, DEFAULT_MAX_CHUNK_SECS};
use crate::traits::EmbeddingEngine;
use std::sync::Arc;
use voxsplit_types::{DiarizedTranscript, SpeakerTurn, TimedSegment};

/// Default speaker count when the caller does not supply one.
pub const DEFAULT_NUM_SPEAKERS: usize = 2;

/// Diarization configuration
#[derive(Debug, Clone)]
pub struct DiarizerConfig {
    /// Maximum chunk duration fed to the embedder, default: 5.0 s
    pub max_chunk_duration: f64,
    /// Minimum chunk duration worth embedding, default: 0.3 s
    pub min_chunk_duration: f64,
}

impl Default for DiarizerConfig {
    fn default() -> Self {
        Self {
            max_chunk_duration: DEFAULT_MAX_CHUNK_SECS,
            min_chunk_duration: 0.3,
        }
    }
}

/// Speaker diarization service.
///
/// Speaker labels are per-run cluster ids: the same audio diarized
/// twice may name the same voice 0 in one run and 1 in the other.
pub struct Diarizer {
    encoder: Arc<dyn EmbeddingEngine>,
    config: DiarizerConfig,
}

impl Diarizer {
    pub fn new(encoder: Arc<dyn EmbeddingEngine>, config: DiarizerConfig) -> Self {
        Self { encoder, config }
    }

    /// Create with default configuration
    pub fn with_defaults(encoder: Arc<dyn EmbeddingEngine>) -> Self {
        Self::new(encoder, DiarizerConfig::default())
    }

    /// Attribute transcript segments to `num_speakers` speakers.
    ///
    /// `samples` is the mono waveform the segments were transcribed
    /// from, at `sample_rate`. Chunks that are too short or fail
    /// embedding are dropped (and counted in the result); if fewer than
    /// two chunks survive, `InsufficientData` is returned and the
    /// caller should fall back to the plain transcript.
    pub fn diarize(
        &self,
        samples: &[f32],
        sample_rate: u32,
        segments: &[TimedSegment],
        num_speakers: usize,
    ) -> Result<DiarizedTranscript, DiarizeError> {
        let chunks = resegment(segments, self.config.max_chunk_duration);

        let min_samples = (self.config.min_chunk_duration * sample_rate as f64) as usize;
        let mut usable: Vec<TimedSegment> = Vec::with_capacity(chunks.len());
        let mut embeddings: Vec<Vec<f32>> = Vec::with_capacity(chunks.len());
        let mut dropped = 0usize;

        for chunk in chunks {
            let lo = (chunk.start.max(0.0) * sample_rate as f64) as usize;
            let hi = ((chunk.end.max(0.0) * sample_rate as f64) as usize).min(samples.len());

            if hi <= lo || hi - lo < min_samples {
                tracing::debug!(
                    "Skipping chunk {:.2}s-{:.2}s: below {:.2}s minimum",
                    chunk.start,
                    chunk.end,
                    self.config.min_chunk_duration
                );
                dropped += 1;
                continue;
            }

            match self.encoder.embed(&samples[lo..hi], sample_rate) {
                Ok(embedding) => {
                    embeddings.push(embedding);
                    usable.push(chunk);
                }
                Err(err) => {
                    // A wrong input rate fails every chunk the same way;
                    // surface it instead of dropping the whole batch
                    // one chunk at a time.
                    if let Some(fatal @ DiarizeError::UnsupportedSampleRate { .. }) =
                        err.downcast_ref::<DiarizeError>()
                    {
                        return Err(fatal.clone());
                    }
                    tracing::warn!(
                        "Dropping chunk {:.2}s-{:.2}s: embedding failed: {:#}",
                        chunk.start,
                        chunk.end,
                        err
                    );
                    dropped += 1;
                }
            }
        }

        if embeddings.len() < 2 {
            return Err(DiarizeError::InsufficientData {
                usable: embeddings.len(),
            });
        }

        let labels = cluster_embeddings(&embeddings, num_speakers)?;

        let turns: Vec<SpeakerTurn> = usable
            .into_iter()
            .zip(labels)
            .map(|(chunk, label)| SpeakerTurn {
                start: chunk.start,
                end: chunk.end,
                text: chunk.text,
                speaker: label as u32,
            })
            .collect();

        let mut transcript = assemble(&turns);
        transcript.dropped_chunks = dropped;

        tracing::info!(
            "Diarization: {} turns, {} speakers, {} blocks, {} chunks dropped",
            transcript.turns.len(),
            transcript.num_speakers,
            transcript.blocks.len(),
            dropped
        );

        Ok(transcript)
    }

    /// Diarize, degrading to `None` when diarization is unavailable.
    ///
    /// Recoverable errors (too little usable audio, clustering failure)
    /// log and return `None` so the caller can surface the plain
    /// transcript; anything else propagates.
    pub fn diarize_or_fallback(
        &self,
        samples: &[f32],
        sample_rate: u32,
        segments: &[TimedSegment],
        num_speakers: usize,
    ) -> anyhow::Result<Option<DiarizedTranscript>> {
        match self.diarize(samples, sample_rate, segments, num_speakers) {
            Ok(transcript) => Ok(Some(transcript)),
            Err(err) if err.is_recoverable() => {
                tracing::info!("Diarization unavailable: {}", err);
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}
