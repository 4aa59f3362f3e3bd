//! Log-mel filterbank front end for the speaker encoder
//!
//! WeSpeaker-style models take 80-bin log-mel features computed from
//! 25 ms frames with a 10 ms hop at 16 kHz.

use anyhow::{Context, Result};
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// Mel feature configuration
#[derive(Debug, Clone)]
pub struct MelConfig {
    pub sample_rate: u32,
    pub n_mels: usize,
    pub win_length: usize,
    pub hop_length: usize,
    pub n_fft: usize,
}

impl Default for MelConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            n_mels: 80,
            win_length: 400, // 25 ms at 16 kHz
            hop_length: 160, // 10 ms at 16 kHz
            n_fft: 512,
        }
    }
}

/// Log-mel feature extractor
pub struct MelProcessor {
    config: MelConfig,
    window: Vec<f32>,
    filterbank: Vec<Vec<f32>>,
    fft: Arc<dyn RealToComplex<f32>>,
}

impl MelProcessor {
    pub fn new(config: MelConfig) -> Self {
        // Hamming window, Kaldi-style fbank framing
        let window: Vec<f32> = (0..config.win_length)
            .map(|i| {
                let n = (config.win_length - 1) as f32;
                0.54 - 0.46 * (2.0 * std::f32::consts::PI * i as f32 / n).cos()
            })
            .collect();

        let filterbank =
            create_mel_filterbank(config.sample_rate, config.n_fft, config.n_mels);

        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(config.n_fft);

        Self {
            config,
            window,
            filterbank,
            fft,
        }
    }

    /// Number of mel bins per frame
    pub fn n_mels(&self) -> usize {
        self.config.n_mels
    }

    /// Compute log-mel features, one `n_mels`-sized row per frame.
    pub fn compute(&self, samples: &[f32]) -> Result<Vec<Vec<f32>>> {
        let win = self.config.win_length;
        let hop = self.config.hop_length;

        if samples.len() < win {
            anyhow::bail!(
                "audio too short for mel features: {} samples, window is {}",
                samples.len(),
                win
            );
        }

        let num_frames = (samples.len() - win) / hop + 1;
        let mut features: Vec<Vec<f32>> = Vec::with_capacity(num_frames);

        let mut input = self.fft.make_input_vec();
        let mut spectrum = self.fft.make_output_vec();

        for frame_idx in 0..num_frames {
            let start = frame_idx * hop;

            // Window the frame, zero-pad to n_fft
            input.fill(0.0);
            for (i, (&s, &w)) in samples[start..start + win]
                .iter()
                .zip(self.window.iter())
                .enumerate()
            {
                input[i] = s * w;
            }

            self.fft
                .process(&mut input, &mut spectrum)
                .ok()
                .context("FFT failed on mel frame")?;

            let mut mel_frame = vec![0.0f32; self.config.n_mels];
            for (m, filter) in self.filterbank.iter().enumerate() {
                let mut sum = 0.0f32;
                for (bin, &weight) in filter.iter().enumerate() {
                    if weight > 0.0 {
                        sum += spectrum[bin].norm_sqr() * weight;
                    }
                }
                // Log mel with floor to avoid log(0)
                mel_frame[m] = sum.max(1e-10).ln();
            }

            features.push(mel_frame);
        }

        Ok(features)
    }
}

/// Create mel filterbank (HTK formula, triangular filters)
fn create_mel_filterbank(sample_rate: u32, n_fft: usize, n_mels: usize) -> Vec<Vec<f32>> {
    let num_bins = n_fft / 2 + 1;
    let fmax = sample_rate as f32 / 2.0;

    let hz_to_mel = |hz: f32| -> f32 { 2595.0 * (1.0 + hz / 700.0).log10() };
    let mel_to_hz = |mel: f32| -> f32 { 700.0 * (10.0_f32.powf(mel / 2595.0) - 1.0) };

    // Frequencies for each FFT bin
    let bin_freqs: Vec<f32> = (0..num_bins)
        .map(|i| i as f32 * fmax / (num_bins - 1) as f32)
        .collect();

    // n_mels + 2 mel-spaced edge points
    let mel_max = hz_to_mel(fmax);
    let edges: Vec<f32> = (0..=n_mels + 1)
        .map(|i| mel_to_hz(i as f32 * mel_max / (n_mels + 1) as f32))
        .collect();

    let mut filterbank = vec![vec![0.0f32; num_bins]; n_mels];

    for m in 0..n_mels {
        let (left, center, right) = (edges[m], edges[m + 1], edges[m + 2]);
        for (k, &freq) in bin_freqs.iter().enumerate() {
            let lower = (freq - left) / (center - left);
            let upper = (right - freq) / (right - center);
            filterbank[m][k] = lower.min(upper).max(0.0);
        }
    }

    filterbank
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mel_filterbank_shape() {
        let filterbank = create_mel_filterbank(16000, 512, 80);
        assert_eq!(filterbank.len(), 80);
        assert_eq!(filterbank[0].len(), 257); // n_fft/2 + 1
    }

    #[test]
    fn test_frame_count() {
        let processor = MelProcessor::new(MelConfig::default());
        // One second of 16 kHz audio: (16000 - 400) / 160 + 1 frames
        let samples = vec![0.0f32; 16000];
        let features = processor.compute(&samples).unwrap();
        assert_eq!(features.len(), 98);
        assert_eq!(features[0].len(), 80);
    }

    #[test]
    fn test_silence_hits_log_floor() {
        let processor = MelProcessor::new(MelConfig::default());
        let samples = vec![0.0f32; 1600];
        let features = processor.compute(&samples).unwrap();
        let floor = (1e-10f32).ln();
        for frame in &features {
            for &v in frame {
                assert!((v - floor).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_too_short_input_errors() {
        let processor = MelProcessor::new(MelConfig::default());
        assert!(processor.compute(&[0.0; 100]).is_err());
    }
}
