//! Plain-text views of a score and its schedule.

use std::fmt::Write;

use gs_engine::{Schedule, TriggerKind};
use gs_ir::{ContinuousDynamicsCommand, MaximumBy, NoteCommand, Range, ScoreData, NUM_NOTES};
use gs_editor::ScoreEditor;

fn note_glyph(command: NoteCommand) -> char {
    match command {
        NoteCommand::None => '.',
        NoteCommand::Begin => '[',
        NoteCommand::Hold => '=',
        NoteCommand::End => ']',
        NoteCommand::Short => 'o',
    }
}

fn dynamics_glyph(command: ContinuousDynamicsCommand) -> char {
    match command {
        ContinuousDynamicsCommand::None => '.',
        ContinuousDynamicsCommand::Crescendo => '<',
        ContinuousDynamicsCommand::Diminuendo => '>',
    }
}

/// One row per occupied pitch, then the dynamics lane. Empty voices
/// render as an empty string.
pub fn voice_grid(score: &ScoreData, voice: usize) -> String {
    let mut out = String::new();
    for pitch in 0..NUM_NOTES {
        let row: String = (0..score.len())
            .map(|c| note_glyph(score.note(voice, c, pitch)))
            .collect();
        if row.chars().any(|c| c != '.') {
            let _ = writeln!(out, "{pitch:>3} {row}");
        }
    }
    let lane: String = (0..score.len())
        .map(|c| dynamics_glyph(score.dynamics(voice, c)))
        .collect();
    if lane.chars().any(|c| c != '.') {
        let _ = writeln!(out, "dyn {lane}");
    }
    out
}

/// Every distinct hairpin of a voice, left to right.
pub fn hairpins(editor: &ScoreEditor, voice: usize) -> Vec<(Range, ContinuousDynamicsCommand)> {
    let mut found: Vec<(Range, ContinuousDynamicsCommand)> = Vec::new();
    for column in 0..editor.score().len() {
        if let Some(range) = editor.hairpin(voice, column) {
            if found.last().map(|(r, _)| *r) != Some(range) {
                found.push((range, editor.dynamics(voice, column)));
            }
        }
    }
    found
}

/// The widest hairpin of a voice, if it has any.
pub fn longest_hairpin(editor: &ScoreEditor, voice: usize) -> Option<Range> {
    let mut longest = MaximumBy::new(None, |a: &Option<Range>, b: &Option<Range>| {
        a.map_or(0, |r| r.len()) > b.map_or(0, |r| r.len())
    });
    for (range, _) in hairpins(editor, voice) {
        longest.accept(Some(range));
    }
    longest.into_inner()
}

pub fn schedule_table(schedule: &Schedule) -> String {
    let mut out = String::new();
    for event in &schedule.events {
        let kind = match event.kind {
            TriggerKind::Start => "start",
            TriggerKind::Stop => "stop ",
        };
        let _ = writeln!(
            out,
            "{:>8.3}s  voice {}  {kind}  {:>5} Hz  (pitch {})",
            event.time, event.voice, event.frequency, event.pitch
        );
    }
    let _ = writeln!(out, "duration {:.3}s", schedule.play_duration);
    out
}
