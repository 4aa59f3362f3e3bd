//! Diarization crate for VoxSplit
//!
//! Provides the speaker-diarization pipeline: segment re-segmentation,
//! voice embedding, speaker clustering, and transcript assembly.

pub mod assemble;
pub mod cluster;
pub mod encoder;
pub mod error;
pub mod mel;
pub mod pipeline;
pub mod resegment;
pub mod traits;

pub use assemble::assemble;
pub use cluster::{cluster_embeddings, cosine_distance, cosine_similarity};
pub use encoder::{OnnxSpeakerEncoder, SpeakerEncoderConfig, ENCODER_SAMPLE_RATE};
pub use error::DiarizeError;
pub use mel::{MelConfig, MelProcessor};
pub use pipeline::{Diarizer, DiarizerConfig, DEFAULT_NUM_SPEAKERS};
pub use resegment::{resegment, DEFAULT_MAX_CHUNK_SECS};
pub use traits::EmbeddingEngine;
