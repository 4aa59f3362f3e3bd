//! Transcription report assembly
//!
//! Merges the plain transcript, best-effort diarization and audio
//! statistics into one report.

use anyhow::Result;
use std::path::Path;
use voxsplit_audio as audio;
use voxsplit_ml::Diarizer;
use voxsplit_types::{TimedSegment, TranscriptionReport};

/// Build the report for one transcription request.
///
/// Diarization and statistics are enrichment: statistics go absent if
/// the waveform cannot be decoded, diarization goes absent if too
/// little usable audio survives embedding. The plain transcript is
/// always produced.
pub fn build_report(
    diarizer: Option<&Diarizer>,
    audio_path: &Path,
    segments: &[TimedSegment],
    num_speakers: usize,
    language: Option<String>,
    language_confidence: Option<f32>,
) -> Result<TranscriptionReport> {
    let audio_stats = audio::analyze_file(audio_path);

    let diarization = match diarizer {
        Some(diarizer) => match audio::read_audio(audio_path) {
            Ok(raw) => {
                let mono = audio::prepare_for_embedding(&raw)?;
                diarizer.diarize_or_fallback(
                    &mono,
                    audio::EMBEDDING_SAMPLE_RATE,
                    segments,
                    num_speakers,
                )?
            }
            Err(e) => {
                tracing::warn!("Diarization skipped, audio unreadable: {:#}", e);
                None
            }
        },
        None => None,
    };

    let text = segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let word_count = segments
        .iter()
        .map(|s| s.text.split_whitespace().count())
        .sum();

    let speaker_count = diarization
        .as_ref()
        .map(|d| d.num_speakers)
        .unwrap_or(num_speakers as u32);

    let (diarized_text, speaker_turns) = match diarization {
        Some(d) => (Some(d.to_string()), d.turns),
        None => (None, Vec::new()),
    };

    Ok(TranscriptionReport {
        text,
        diarized_text,
        speaker_turns,
        audio_stats,
        word_count,
        segment_count: segments.len(),
        speaker_count,
        language,
        language_confidence,
    })
}
