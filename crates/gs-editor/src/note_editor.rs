//! Note painting over the pitch/time grid.

use arrayvec::ArrayVec;
use gs_ir::{NoteCommand, Range, ScoreData, NUM_NOTES, NUM_VOICES};
use tracing::debug;

use crate::boundary::{repair, Boundary};
use crate::error::EditorError;
use crate::interaction::{grid_column, NoteGesture, NoteInteraction, Snap};
use crate::updates::{CallbackKey, NoteCell, PendingUpdates, UpdateRegistry};

/// Columns re-derived after one gesture step, in application order.
type RepairPlan = ArrayVec<(isize, Boundary), 6>;

/// Interprets note drags and keeps every run well formed.
///
/// The editor does not own the score; each operation borrows it so the
/// player can read the same data between gestures.
pub struct NoteEditor {
    interaction: Option<NoteInteraction>,
    snap: Snap,
    pending: PendingUpdates<NoteCell>,
    callbacks: UpdateRegistry<NoteCell>,
}

impl NoteEditor {
    pub fn new() -> Self {
        Self {
            interaction: None,
            snap: Snap::NONE,
            pending: PendingUpdates::new(),
            callbacks: UpdateRegistry::new(),
        }
    }

    pub fn snap(&self) -> Snap {
        self.snap
    }

    /// Snap future gestures to multiples of `interval` columns.
    pub fn set_snap_interval(&mut self, interval: usize) -> Result<(), EditorError> {
        self.snap = Snap::new(interval).ok_or(EditorError::ZeroSnapInterval)?;
        Ok(())
    }

    pub fn interaction(&self) -> Option<&NoteInteraction> {
        self.interaction.as_ref()
    }

    pub fn is_interacting(&self) -> bool {
        self.interaction.is_some()
    }

    /// Register a redraw callback for one cell.
    pub fn register_callback(&mut self, cell: NoteCell, callback: impl FnMut() + 'static) -> CallbackKey {
        self.callbacks.register(cell, callback)
    }

    pub fn unregister_callback(&mut self, key: CallbackKey) -> bool {
        self.callbacks.unregister(key)
    }

    /// Cells changed since the last drain.
    pub fn pending_updates(&self) -> &PendingUpdates<NoteCell> {
        &self.pending
    }

    /// Begin a drag at `column` and apply it as if the pointer had not moved.
    pub fn start_interaction(
        &mut self,
        score: &mut ScoreData,
        voice: usize,
        column: usize,
        pitch: usize,
        gesture: NoteGesture,
    ) {
        debug!(voice, column, pitch, ?gesture, "note interaction started");
        let column = grid_column(column, score.len(), self.snap);
        self.interaction = Some(NoteInteraction::new(gesture, voice, pitch, column, self.snap));
        self.apply_move(score, column);
        self.apply_ui_updates();
    }

    /// Extend the active drag to `column`. No-op without an active drag.
    pub fn move_interaction_to(&mut self, score: &mut ScoreData, column: usize) {
        let Some(interaction) = self.interaction else {
            return;
        };
        self.apply_move(score, grid_column(column, score.len(), interaction.snap));
        self.apply_ui_updates();
    }

    pub fn end_interaction(&mut self) {
        if let Some(interaction) = self.interaction.take() {
            debug!(
                voice = interaction.voice,
                pitch = interaction.pitch,
                anchor = interaction.anchor,
                current = interaction.current(),
                "note interaction ended"
            );
        }
        self.apply_ui_updates();
    }

    /// Empty every note of every voice.
    pub fn clear_notes(&mut self, score: &mut ScoreData) {
        for voice in 0..NUM_VOICES {
            for column in 0..score.len() {
                for pitch in 0..NUM_NOTES {
                    self.set_command(score, voice, column as isize, pitch, NoteCommand::None);
                }
            }
        }
        self.apply_ui_updates();
    }

    fn apply_ui_updates(&mut self) {
        self.pending.drain(&mut self.callbacks);
    }

    fn command(score: &ScoreData, voice: usize, column: isize, pitch: usize) -> NoteCommand {
        if column < 0 {
            return NoteCommand::None;
        }
        score.note(voice, column as usize, pitch)
    }

    fn set_command(&mut self, score: &mut ScoreData, voice: usize, column: isize, pitch: usize, command: NoteCommand) {
        if column < 0 || column as usize >= score.len() || pitch >= NUM_NOTES || voice >= NUM_VOICES {
            return;
        }
        let column = column as usize;
        if score.note(voice, column, pitch) != command {
            score.set_note(voice, column, pitch, command);
            self.pending.push(NoteCell { voice, column, pitch });
        }
    }

    fn fill(&mut self, score: &mut ScoreData, voice: usize, range: Range, pitch: usize, command: NoteCommand) {
        for column in range {
            self.set_command(score, voice, column, pitch, command);
        }
    }

    fn apply_boundary(&mut self, score: &mut ScoreData, voice: usize, column: isize, pitch: usize, kind: Boundary) {
        let current = Self::command(score, voice, column, pitch);
        let has_prev = !Self::command(score, voice, column - 1, pitch).is_none();
        let has_next = !Self::command(score, voice, column + 1, pitch).is_none();
        let repaired = repair(current, kind, has_prev, has_next);
        self.set_command(score, voice, column, pitch, repaired);
    }

    fn repair_plan(gesture: NoteGesture, range: Range) -> RepairPlan {
        let (s, e) = range.endpoints();
        let mut plan = RepairPlan::new();
        match gesture {
            NoteGesture::Write => {
                plan.push((s, Boundary::Start));
                plan.push((e, Boundary::End));
                plan.push((s - 1, Boundary::End));
                plan.push((e + 1, Boundary::Start));
            }
            NoteGesture::Blend => {
                plan.push((s, Boundary::Start));
                plan.push((e, Boundary::End));
                plan.push((s, Boundary::BlendStart));
                plan.push((e, Boundary::BlendEnd));
                plan.push((s - 1, Boundary::BlendEnd));
                plan.push((e + 1, Boundary::BlendStart));
            }
            NoteGesture::Erase => {
                plan.push((s - 1, Boundary::BlendEnd));
                plan.push((e + 1, Boundary::BlendStart));
            }
        }
        plan
    }

    fn apply_move(&mut self, score: &mut ScoreData, column: isize) {
        let Some(interaction) = self.interaction.as_mut() else {
            return;
        };
        let (old, new) = interaction.move_to(column);
        let NoteInteraction { gesture, voice, pitch, .. } = *interaction;
        let grid = Range::for_indices(score.len());
        let (old, new) = (old.trimmed_to(grid), new.trimmed_to(grid));

        match gesture {
            NoteGesture::Write => {
                self.fill(score, voice, old, pitch, NoteCommand::None);
                self.fill(score, voice, new, pitch, NoteCommand::Hold);
            }
            NoteGesture::Blend => self.fill(score, voice, new, pitch, NoteCommand::Hold),
            NoteGesture::Erase => self.fill(score, voice, new, pitch, NoteCommand::None),
        }

        if new.is_empty() {
            return;
        }
        for (col, kind) in Self::repair_plan(gesture, new) {
            self.apply_boundary(score, voice, col, pitch, kind);
        }
    }
}

impl Default for NoteEditor {
    fn default() -> Self {
        Self::new()
    }
}
