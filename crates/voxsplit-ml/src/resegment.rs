//! Segment re-segmentation
//!
//! Voice embeddings get unreliable on intervals much longer than a
//! typical speaker turn, so overlong transcript segments are split into
//! bounded-duration chunks before embedding.

use voxsplit_types::TimedSegment;

/// Default chunk duration cap in seconds.
pub const DEFAULT_MAX_CHUNK_SECS: f64 = 5.0;

/// Split overlong segments into equal-length chunks.
///
/// Segments no longer than `max_duration` pass through unchanged. A
/// longer segment is split into `ceil(duration / max_duration)` windows
/// of equal length partitioning `[start, end]`; its text is
/// word-tokenized and divided evenly across the windows, with the last
/// window absorbing remainder words. Windows whose word slice comes up
/// empty are dropped, so a zero-word segment yields no chunks.
pub fn resegment(segments: &[TimedSegment], max_duration: f64) -> Vec<TimedSegment> {
    let mut chunks = Vec::with_capacity(segments.len());

    for segment in segments {
        let duration = segment.duration();

        if duration <= max_duration {
            chunks.push(segment.clone());
            continue;
        }

        let num_chunks = (duration / max_duration).ceil() as usize;
        let words: Vec<&str> = segment.text.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let chunk_secs = duration / num_chunks as f64;
        let words_per_chunk = (words.len() / num_chunks).max(1);

        for i in 0..num_chunks {
            let word_lo = i * words_per_chunk;
            if word_lo >= words.len() {
                break;
            }
            let word_hi = if i + 1 == num_chunks {
                words.len()
            } else {
                ((i + 1) * words_per_chunk).min(words.len())
            };

            let start = segment.start + i as f64 * chunk_secs;
            let end = if i + 1 == num_chunks {
                segment.end
            } else {
                segment.start + (i + 1) as f64 * chunk_secs
            };

            chunks.push(TimedSegment {
                start,
                end,
                text: words[word_lo..word_hi].join(" "),
            });
        }
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, text: &str) -> TimedSegment {
        TimedSegment::new(start, end, text)
    }

    #[test]
    fn test_short_segments_pass_through_in_order() {
        let segments = vec![
            seg(0.0, 2.0, "bonjour"),
            seg(2.0, 4.0, "comment"),
            seg(4.0, 6.0, "allez vous"),
        ];
        let out = resegment(&segments, 5.0);
        assert_eq!(out, segments);
    }

    #[test]
    fn test_twelve_second_segment_splits_into_three_equal_chunks() {
        let segments = vec![seg(0.0, 12.0, "un deux trois quatre cinq six")];
        let out = resegment(&segments, 5.0);

        assert_eq!(out.len(), 3);
        for (i, chunk) in out.iter().enumerate() {
            assert!((chunk.start - i as f64 * 4.0).abs() < 1e-9);
            assert!((chunk.end - (i as f64 + 1.0) * 4.0).abs() < 1e-9);
        }
        assert_eq!(out[0].text, "un deux");
        assert_eq!(out[1].text, "trois quatre");
        assert_eq!(out[2].text, "cinq six");
    }

    #[test]
    fn test_word_count_is_conserved_and_spans_are_contiguous() {
        let segments = vec![seg(3.0, 16.0, "a b c d e f g")];
        let out = resegment(&segments, 5.0);

        // ceil(13/5) = 3 chunks, 7 words: 2 + 2 + 3
        assert_eq!(out.len(), 3);
        let total_words: usize = out
            .iter()
            .map(|c| c.text.split_whitespace().count())
            .sum();
        assert_eq!(total_words, 7);
        assert_eq!(out[2].text, "e f g");

        assert!((out[0].start - 3.0).abs() < 1e-9);
        for pair in out.windows(2) {
            assert!((pair[0].end - pair[1].start).abs() < 1e-9);
        }
        assert!((out[2].end - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_word_segment_yields_no_chunks() {
        let segments = vec![seg(0.0, 20.0, "   ")];
        assert!(resegment(&segments, 5.0).is_empty());
    }

    #[test]
    fn test_fewer_words_than_windows_drops_empty_chunks() {
        // 13 s -> 3 windows but only 2 words: one word each for the
        // first two windows, third window dropped.
        let segments = vec![seg(0.0, 13.0, "oui non")];
        let out = resegment(&segments, 5.0);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "oui");
        assert_eq!(out[1].text, "non");
    }

    #[test]
    fn test_boundary_duration_not_split() {
        let segments = vec![seg(0.0, 5.0, "exactly at the cap")];
        let out = resegment(&segments, 5.0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0], segments[0]);
    }
}
