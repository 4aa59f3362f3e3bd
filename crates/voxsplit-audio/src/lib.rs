//! Audio decoding and analysis crate for VoxSplit
//!
//! Provides audio file decoding, mono downmix, resampling, and waveform
//! statistics.
//!
//! # Features
//! - **WAV decoding** via hound, other formats (mp3, m4a, ogg, flac) via
//!   symphonia
//! - **Resampling** via rubato (the speaker encoder expects 16 kHz mono)
//! - **Audio statistics** (duration, loudness, voice-activity ratio) for
//!   the transcription report

pub mod file_io;
pub mod resampling;
pub mod stats;

pub use file_io::{read_audio, write_wav, RawAudio};
pub use stats::{analyze, analyze_file};

/// Sample rate expected by the speaker-embedding encoder.
pub const EMBEDDING_SAMPLE_RATE: u32 = 16_000;

/// Downmix and resample decoded audio to 16 kHz mono for embedding.
pub fn prepare_for_embedding(audio: &RawAudio) -> anyhow::Result<Vec<f32>> {
    let mono = audio.to_mono();
    resampling::resample(&mono, audio.sample_rate, EMBEDDING_SAMPLE_RATE)
}

/// Resample audio to a target rate.
pub fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> anyhow::Result<Vec<f32>> {
    resampling::resample(samples, source_rate, target_rate)
}
