//! VoxSplit Worker Process
//!
//! Isolated worker process for diarization and audio analysis, so that
//! ONNX inference cannot destabilize a host application.
//!
//! Communication is via JSON over stdin/stdout.

mod report;

use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voxsplit_ml::{Diarizer, OnnxSpeakerEncoder, DEFAULT_NUM_SPEAKERS};
use voxsplit_types::{WorkerCommand, WorkerResponse};

/// Environment variable holding the speaker-embedding model path.
const ENCODER_MODEL_ENV: &str = "VOXSPLIT_ENCODER_MODEL";

fn main() {
    // Initialize tracing to stderr (stdout is for IPC)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    tracing::info!("VoxSplit worker starting");

    if let Err(e) = run_worker() {
        tracing::error!("Worker error: {}", e);
        std::process::exit(1);
    }
}

/// Build the diarizer once at startup; without an encoder model the
/// worker still serves analysis and undiarized reports.
fn init_diarizer() -> Option<Diarizer> {
    let model_path = match std::env::var(ENCODER_MODEL_ENV) {
        Ok(path) if !path.is_empty() => path,
        _ => {
            tracing::warn!(
                "{} not set, diarization disabled for this worker",
                ENCODER_MODEL_ENV
            );
            return None;
        }
    };

    match OnnxSpeakerEncoder::from_model_path(&model_path) {
        Ok(encoder) => Some(Diarizer::with_defaults(Arc::new(encoder))),
        Err(e) => {
            tracing::error!("Failed to load speaker encoder: {:#}", e);
            None
        }
    }
}

fn run_worker() -> Result<()> {
    let diarizer = init_diarizer();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    tracing::info!(
        "Worker ready, listening for commands (diarization: {})",
        if diarizer.is_some() { "on" } else { "off" }
    );

    for line in stdin.lock().lines() {
        let line = line?;

        if line.is_empty() {
            continue;
        }

        let command: WorkerCommand = match serde_json::from_str(&line) {
            Ok(cmd) => cmd,
            Err(e) => {
                let response = WorkerResponse::Error {
                    message: format!("Invalid command: {}", e),
                };
                writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
                stdout.flush()?;
                continue;
            }
        };

        let response = match command {
            WorkerCommand::Transcript {
                audio_path,
                segments,
                num_speakers,
                language,
                language_confidence,
            } => {
                tracing::debug!(
                    "Building report for {} ({} segments)",
                    audio_path,
                    segments.len()
                );

                match report::build_report(
                    diarizer.as_ref(),
                    Path::new(&audio_path),
                    &segments,
                    num_speakers.unwrap_or(DEFAULT_NUM_SPEAKERS),
                    language,
                    language_confidence,
                ) {
                    Ok(report) => WorkerResponse::Report(report),
                    Err(e) => WorkerResponse::Error {
                        message: format!("{:#}", e),
                    },
                }
            }

            WorkerCommand::Analyze { audio_path } => {
                tracing::debug!("Analyzing {}", audio_path);
                WorkerResponse::Stats {
                    stats: voxsplit_audio::analyze_file(Path::new(&audio_path)),
                }
            }

            WorkerCommand::Shutdown => {
                tracing::info!("Shutdown command received");
                let response = WorkerResponse::Ok;
                writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
                stdout.flush()?;
                break;
            }
        };

        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }

    tracing::info!("Worker shutting down");
    Ok(())
}
