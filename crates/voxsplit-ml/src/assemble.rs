//! Transcript assembly
//!
//! Merges consecutive same-speaker chunks back into readable blocks.

use voxsplit_types::{DiarizedTranscript, SpeakerBlock, SpeakerTurn};

/// Merge chronologically ordered speaker turns into blocks.
///
/// Consecutive turns with the same speaker id accumulate into one
/// block (texts joined with a single space); a block is emitted each
/// time the speaker changes, and the final accumulation is flushed at
/// the end. Adjacent blocks therefore never share a speaker id.
pub fn assemble(turns: &[SpeakerTurn]) -> DiarizedTranscript {
    let mut blocks: Vec<SpeakerBlock> = Vec::new();
    let mut current_speaker: Option<u32> = None;
    let mut current_text: Vec<&str> = Vec::new();

    for turn in turns {
        if Some(turn.speaker) == current_speaker {
            current_text.push(&turn.text);
        } else {
            if let Some(speaker) = current_speaker {
                blocks.push(SpeakerBlock {
                    speaker,
                    text: current_text.join(" "),
                });
            }
            current_speaker = Some(turn.speaker);
            current_text.clear();
            current_text.push(&turn.text);
        }
    }

    if let Some(speaker) = current_speaker {
        blocks.push(SpeakerBlock {
            speaker,
            text: current_text.join(" "),
        });
    }

    let mut speakers: Vec<u32> = turns.iter().map(|t| t.speaker).collect();
    speakers.sort_unstable();
    speakers.dedup();

    DiarizedTranscript {
        blocks,
        turns: turns.to_vec(),
        num_speakers: speakers.len() as u32,
        dropped_chunks: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(start: f64, end: f64, text: &str, speaker: u32) -> SpeakerTurn {
        SpeakerTurn {
            start,
            end,
            text: text.to_string(),
            speaker,
        }
    }

    #[test]
    fn test_consecutive_same_speaker_merges() {
        let turns = vec![
            turn(0.0, 2.0, "bonjour", 0),
            turn(2.0, 4.0, "comment", 0),
            turn(4.0, 6.0, "allez vous", 1),
        ];
        let result = assemble(&turns);

        assert_eq!(result.blocks.len(), 2);
        assert_eq!(result.blocks[0].speaker, 0);
        assert_eq!(result.blocks[0].text, "bonjour comment");
        assert_eq!(result.blocks[1].speaker, 1);
        assert_eq!(result.blocks[1].text, "allez vous");
        assert_eq!(result.num_speakers, 2);
    }

    #[test]
    fn test_adjacent_blocks_never_share_speaker() {
        let turns = vec![
            turn(0.0, 1.0, "a", 1),
            turn(1.0, 2.0, "b", 1),
            turn(2.0, 3.0, "c", 0),
            turn(3.0, 4.0, "d", 1),
            turn(4.0, 5.0, "e", 1),
        ];
        let result = assemble(&turns);
        for pair in result.blocks.windows(2) {
            assert_ne!(pair[0].speaker, pair[1].speaker);
        }
    }

    #[test]
    fn test_n_speaker_changes_yield_n_plus_one_blocks() {
        let turns = vec![
            turn(0.0, 1.0, "a", 0),
            turn(1.0, 2.0, "b", 1),
            turn(2.0, 3.0, "c", 0),
            turn(3.0, 4.0, "d", 2),
        ];
        // 3 speaker changes
        let result = assemble(&turns);
        assert_eq!(result.blocks.len(), 4);
    }

    #[test]
    fn test_no_words_lost_or_duplicated() {
        let turns = vec![
            turn(0.0, 1.0, "un deux", 0),
            turn(1.0, 2.0, "trois", 0),
            turn(2.0, 3.0, "quatre", 1),
            turn(3.0, 4.0, "cinq six", 0),
        ];
        let result = assemble(&turns);

        let joined_blocks = result
            .blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let joined_input = turns
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(joined_blocks, joined_input);
    }

    #[test]
    fn test_empty_input_yields_empty_transcript() {
        let result = assemble(&[]);
        assert!(result.blocks.is_empty());
        assert_eq!(result.num_speakers, 0);
    }
}
