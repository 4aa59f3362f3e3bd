//! Waveform statistics for the transcription report

use crate::file_io::{self, RawAudio};
use std::path::Path;
use voxsplit_types::AudioStats;

/// Samples with |amplitude| above this count as voice activity.
/// Crude energy gate, not a trained classifier.
const SILENCE_THRESHOLD: f32 = 0.01;

/// Floor added to the RMS before the log, avoids log(0) on digital
/// silence.
const DB_EPSILON: f64 = 1e-10;

/// Compute statistics over an interleaved waveform.
///
/// Multi-channel audio is collapsed to mono by averaging before the
/// metrics are computed; the reported `channel_count` is the source
/// layout.
pub fn analyze(samples: &[f32], channels: u16, sample_rate: u32) -> AudioStats {
    let mono = file_io::downmix_to_mono(samples, channels);

    let duration_s = if sample_rate > 0 {
        mono.len() as f64 / sample_rate as f64
    } else {
        0.0
    };

    let rms = if mono.is_empty() {
        0.0
    } else {
        let sum_sq: f64 = mono.iter().map(|&s| (s as f64) * (s as f64)).sum();
        (sum_sq / mono.len() as f64).sqrt()
    };
    let loudness_db = 20.0 * (rms + DB_EPSILON).log10();

    let voice_activity_pct = if mono.is_empty() {
        0.0
    } else {
        let active = mono.iter().filter(|s| s.abs() > SILENCE_THRESHOLD).count();
        100.0 * active as f64 / mono.len() as f64
    };

    AudioStats {
        duration_s,
        sample_rate,
        channel_count: channels.max(1),
        loudness_db,
        voice_activity_pct,
    }
}

/// Compute statistics over a decoded [`RawAudio`].
pub fn analyze_audio(audio: &RawAudio) -> AudioStats {
    analyze(&audio.samples, audio.channels, audio.sample_rate)
}

/// Fail-soft statistics for an audio file.
///
/// Decode errors are reported as `None` so the rest of the pipeline can
/// still run; the statistics are informational only.
pub fn analyze_file(path: &Path) -> Option<AudioStats> {
    match file_io::read_audio(path) {
        Ok(audio) => Some(analyze_audio(&audio)),
        Err(e) => {
            tracing::warn!("Audio statistics unavailable for {:?}: {:#}", path, e);
            None
        }
    }
}
