//! The complete score: every voice plus tempo.

use alloc::vec::Vec;

use crate::command::{ContinuousDynamicsCommand, NoteCommand};
use crate::voice::VoiceData;

/// Number of pitch rows in the grid (a full piano keyboard).
pub const NUM_NOTES: usize = 88;

/// Number of independent voices.
pub const NUM_VOICES: usize = 6;

/// Tempo used for new scores.
pub const DEFAULT_BPM: f64 = 120.0;

/// Grid columns per beat.
pub const COLUMNS_PER_BEAT: f64 = 6.0;

/// Score data shared by the editors and the player.
#[derive(Clone, Debug)]
pub struct ScoreData {
    voices: Vec<VoiceData>,
    length: usize,
    /// Tempo in beats per minute
    pub bpm: f64,
}

impl ScoreData {
    /// Create an empty score `length` columns long.
    pub fn new(length: usize) -> Self {
        Self {
            voices: (0..NUM_VOICES).map(|_| VoiceData::new(length)).collect(),
            length,
            bpm: DEFAULT_BPM,
        }
    }

    pub fn with_bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Seconds per grid column at the current tempo.
    pub fn seconds_per_column(&self) -> f64 {
        60.0 / self.bpm / COLUMNS_PER_BEAT
    }

    pub fn voice(&self, voice: usize) -> Option<&VoiceData> {
        self.voices.get(voice)
    }

    pub fn voice_mut(&mut self, voice: usize) -> Option<&mut VoiceData> {
        self.voices.get_mut(voice)
    }

    pub fn voices(&self) -> &[VoiceData] {
        &self.voices
    }

    pub fn note(&self, voice: usize, column: usize, pitch: usize) -> NoteCommand {
        self.voice(voice)
            .map_or(NoteCommand::None, |v| v.note(column, pitch))
    }

    pub fn set_note(&mut self, voice: usize, column: usize, pitch: usize, command: NoteCommand) {
        if let Some(v) = self.voice_mut(voice) {
            v.set_note(column, pitch, command);
        }
    }

    pub fn dynamics(&self, voice: usize, column: usize) -> ContinuousDynamicsCommand {
        self.voice(voice)
            .map_or(ContinuousDynamicsCommand::None, |v| v.dynamics(column))
    }

    pub fn set_dynamics(&mut self, voice: usize, column: usize, command: ContinuousDynamicsCommand) {
        if let Some(v) = self.voice_mut(voice) {
            v.set_dynamics(column, command);
        }
    }

    /// Empty every voice in place.
    pub fn clear(&mut self) {
        for voice in &mut self.voices {
            voice.clear();
        }
    }

    /// Change the score length, discarding all commands.
    ///
    /// Storage is only reallocated when the length actually changes.
    pub fn resize(&mut self, length: usize) {
        if length == self.length {
            self.clear();
            return;
        }
        self.length = length;
        self.voices = (0..NUM_VOICES).map(|_| VoiceData::new(length)).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_score_is_empty() {
        let score = ScoreData::new(16);
        assert_eq!(score.len(), 16);
        assert_eq!(score.voices().len(), NUM_VOICES);
        assert_eq!(score.bpm, DEFAULT_BPM);
        assert_eq!(score.note(0, 0, 0), NoteCommand::None);
    }

    #[test]
    fn unknown_voice_reads_empty() {
        let mut score = ScoreData::new(4);
        score.set_note(NUM_VOICES, 0, 0, NoteCommand::Begin);
        assert_eq!(score.note(NUM_VOICES, 0, 0), NoteCommand::None);
        assert!(score.voice(NUM_VOICES).is_none());
    }

    #[test]
    fn seconds_per_column_at_120_bpm() {
        let score = ScoreData::new(4);
        // 0.5s per beat, 6 columns per beat
        assert!((score.seconds_per_column() - 0.5 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn resize_reallocates_and_clears() {
        let mut score = ScoreData::new(4);
        score.set_note(1, 2, 3, NoteCommand::Short);
        score.resize(10);
        assert_eq!(score.len(), 10);
        assert_eq!(score.voice(1).map(|v| v.len()), Some(10));
        assert_eq!(score.note(1, 2, 3), NoteCommand::None);
    }
}
