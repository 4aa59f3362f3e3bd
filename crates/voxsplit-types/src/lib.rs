//! Shared types for VoxSplit
//!
//! This crate contains all shared data structures used across
//! the VoxSplit workspace: transcript segments, diarization output,
//! audio statistics, the transcription report, and the worker IPC
//! protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Transcript Types
// ============================================================================

/// A timestamped transcript segment produced by an upstream
/// speech-to-text engine.
///
/// Invariant: `end > start`. `text` may be empty after splitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedSegment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Transcribed text
    pub text: String,
}

impl TimedSegment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Segment duration in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

// ============================================================================
// Diarization Types
// ============================================================================

/// A transcript chunk attributed to one speaker cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerTurn {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Transcribed text
    pub text: String,
    /// Speaker cluster id (0, 1, 2...)
    pub speaker: u32,
}

/// Consecutive same-speaker text merged into one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerBlock {
    /// Speaker cluster id
    pub speaker: u32,
    /// Space-joined text of the merged turns
    pub text: String,
}

/// Speaker-labeled transcript for one diarization run.
///
/// `blocks` are chronological and adjacent blocks never share a speaker
/// id. Speaker ids are cluster labels with no identity across runs:
/// speaker 0 in one run need not be the same voice as speaker 0 in
/// another run, even on the same audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiarizedTranscript {
    /// Merged speaker blocks, chronological
    pub blocks: Vec<SpeakerBlock>,
    /// Per-chunk speaker attribution (for programmatic consumers)
    pub turns: Vec<SpeakerTurn>,
    /// Number of distinct speakers in `turns`
    pub num_speakers: u32,
    /// Chunks discarded during embedding (too short, or the encoder
    /// failed on them)
    #[serde(default)]
    pub dropped_chunks: usize,
}

impl fmt::Display for DiarizedTranscript {
    /// Renders `[Speaker N] <text>` lines separated by blank lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                write!(f, "\n\n")?;
            }
            write!(f, "[Speaker {}] {}", block.speaker, block.text)?;
        }
        Ok(())
    }
}

// ============================================================================
// Audio Types
// ============================================================================

/// Descriptive statistics for one input waveform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioStats {
    /// Duration in seconds
    pub duration_s: f64,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count of the source waveform
    pub channel_count: u16,
    /// Mean loudness in dBFS, `20*log10(rms)`
    pub loudness_db: f64,
    /// Percentage of samples above the energy threshold
    pub voice_activity_pct: f64,
}

// ============================================================================
// Report Types
// ============================================================================

/// Transcription report merging the plain transcript, best-effort
/// diarization and audio statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionReport {
    /// Full transcript, space-joined segment text
    pub text: String,
    /// Speaker-labeled rendering, absent when diarization was unavailable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diarized_text: Option<String>,
    /// Per-chunk speaker attribution, empty when diarization was
    /// unavailable
    #[serde(default)]
    pub speaker_turns: Vec<SpeakerTurn>,
    /// Waveform statistics, absent when the audio could not be decoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_stats: Option<AudioStats>,
    /// Word count over all input segments
    pub word_count: usize,
    /// Number of input segments
    pub segment_count: usize,
    /// Detected speaker count, or the requested count when diarization
    /// was unavailable
    pub speaker_count: u32,
    /// Language tag reported by the transcription engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Language confidence reported by the transcription engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_confidence: Option<f32>,
}

// ============================================================================
// Worker IPC Types
// ============================================================================

/// Worker command for IPC
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkerCommand {
    /// Build a full transcription report for an audio file and its
    /// engine-produced segments
    Transcript {
        audio_path: String,
        segments: Vec<TimedSegment>,
        #[serde(skip_serializing_if = "Option::is_none")]
        num_speakers: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        language_confidence: Option<f32>,
    },
    /// Compute audio statistics only
    Analyze { audio_path: String },
    /// Shutdown worker
    Shutdown,
}

/// Worker response for IPC
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkerResponse {
    /// Full transcription report
    Report(TranscriptionReport),
    /// Audio statistics; `None` when the waveform was unreadable
    Stats { stats: Option<AudioStats> },
    /// Error
    Error { message: String },
    /// Acknowledgement
    Ok,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_renders_speaker_blocks() {
        let transcript = DiarizedTranscript {
            blocks: vec![
                SpeakerBlock {
                    speaker: 0,
                    text: "bonjour comment".to_string(),
                },
                SpeakerBlock {
                    speaker: 1,
                    text: "allez vous".to_string(),
                },
            ],
            turns: vec![],
            num_speakers: 2,
            dropped_chunks: 0,
        };

        assert_eq!(
            transcript.to_string(),
            "[Speaker 0] bonjour comment\n\n[Speaker 1] allez vous"
        );
    }

    #[test]
    fn test_report_serde_round_trip() {
        let report = TranscriptionReport {
            text: "un deux trois".to_string(),
            diarized_text: None,
            speaker_turns: vec![],
            audio_stats: Some(AudioStats {
                duration_s: 1.5,
                sample_rate: 16000,
                channel_count: 2,
                loudness_db: -12.3,
                voice_activity_pct: 42.0,
            }),
            word_count: 3,
            segment_count: 1,
            speaker_count: 2,
            language: Some("fr".to_string()),
            language_confidence: Some(0.98),
        };

        let json = serde_json::to_string(&report).unwrap();
        // Absent diarization must not serialize at all
        assert!(!json.contains("diarizedText"));
        assert!(json.contains("audioStats"));

        let back: TranscriptionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, back);
    }

    #[test]
    fn test_worker_command_tagged_serde() {
        let cmd = WorkerCommand::Analyze {
            audio_path: "/tmp/a.wav".to_string(),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"Analyze\""));

        let back: WorkerCommand = serde_json::from_str(&json).unwrap();
        match back {
            WorkerCommand::Analyze { audio_path } => assert_eq!(audio_path, "/tmp/a.wav"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_segment_duration() {
        let seg = TimedSegment::new(1.0, 3.5, "abc");
        assert!((seg.duration() - 2.5).abs() < 1e-9);
    }
}
