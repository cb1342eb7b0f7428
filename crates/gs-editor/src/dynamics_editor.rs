//! Crescendo/diminuendo painting and the derived hairpin intervals.
//!
//! The hairpin table is a materialized view of each voice's dynamics
//! commands: every non-empty column maps to the inclusive interval of the
//! run containing it. Edits recompute only the painted range widened to
//! the hairpins touching either side of it.

use alloc::vec;
use alloc::vec::Vec;

use gs_ir::{ContinuousDynamicsCommand, Range, ScoreData, NUM_VOICES};
use tracing::{debug, trace};

use crate::interaction::{grid_column, DynamicsInteraction, Snap};
use crate::updates::{CallbackKey, DynamicsCell, PendingUpdates, UpdateRegistry};

pub struct DynamicsEditor {
    interaction: Option<DynamicsInteraction>,
    /// hairpins[voice][column]
    hairpins: Vec<Vec<Option<Range>>>,
    pending: PendingUpdates<DynamicsCell>,
    callbacks: UpdateRegistry<DynamicsCell>,
}

impl DynamicsEditor {
    /// Build the editor with hairpins derived from `score`'s current data.
    pub fn new(score: &ScoreData) -> Self {
        let mut editor = Self {
            interaction: None,
            hairpins: Vec::new(),
            pending: PendingUpdates::new(),
            callbacks: UpdateRegistry::new(),
        };
        editor.rebuild(score);
        editor
    }

    /// Re-derive every hairpin after the score's length changed.
    ///
    /// Every dropped hairpin's start is queued for redraw.
    pub fn rebuild(&mut self, score: &ScoreData) {
        for (voice, columns) in self.hairpins.iter().enumerate() {
            for run in columns.iter().flatten() {
                if run.start() >= 0 {
                    self.pending.push(DynamicsCell {
                        voice,
                        column: run.start() as usize,
                    });
                }
            }
        }
        self.hairpins = vec![vec![None; score.len()]; NUM_VOICES];
        for voice in 0..NUM_VOICES {
            self.recalculate(score, voice, Range::for_indices(score.len()));
        }
        self.apply_ui_updates();
    }

    /// The hairpin containing `column`, or `None` for an empty column.
    pub fn hairpin(&self, voice: usize, column: usize) -> Option<Range> {
        self.hairpins.get(voice)?.get(column).copied().flatten()
    }

    pub fn command(&self, score: &ScoreData, voice: usize, column: usize) -> ContinuousDynamicsCommand {
        score.dynamics(voice, column)
    }

    pub fn interaction(&self) -> Option<&DynamicsInteraction> {
        self.interaction.as_ref()
    }

    pub fn is_interacting(&self) -> bool {
        self.interaction.is_some()
    }

    /// Register a redraw callback for one dynamics column.
    pub fn register_callback(&mut self, cell: DynamicsCell, callback: impl FnMut() + 'static) -> CallbackKey {
        self.callbacks.register(cell, callback)
    }

    pub fn unregister_callback(&mut self, key: CallbackKey) -> bool {
        self.callbacks.unregister(key)
    }

    pub fn pending_updates(&self) -> &PendingUpdates<DynamicsCell> {
        &self.pending
    }

    /// Begin painting `command` (or erasing, for `None`) at `column`.
    pub fn start_interaction(
        &mut self,
        score: &mut ScoreData,
        voice: usize,
        column: usize,
        command: ContinuousDynamicsCommand,
    ) {
        debug!(voice, column, ?command, "dynamics interaction started");
        self.sync_length(score);
        let column = grid_column(column, score.len(), Snap::NONE);
        self.interaction = Some(DynamicsInteraction::new(command, voice, column));
        self.apply_move(score, column);
        self.apply_ui_updates();
    }

    pub fn move_interaction_to(&mut self, score: &mut ScoreData, column: usize) {
        if self.interaction.is_none() {
            return;
        }
        self.sync_length(score);
        self.apply_move(score, grid_column(column, score.len(), Snap::NONE));
        self.apply_ui_updates();
    }

    pub fn end_interaction(&mut self) {
        if let Some(interaction) = self.interaction.take() {
            debug!(
                voice = interaction.voice,
                anchor = interaction.anchor,
                current = interaction.current(),
                "dynamics interaction ended"
            );
        }
        self.apply_ui_updates();
    }

    /// Erase every dynamics command of every voice.
    pub fn clear_all(&mut self, score: &mut ScoreData) {
        self.sync_length(score);
        for voice in 0..NUM_VOICES {
            for column in 0..score.len() {
                score.set_dynamics(voice, column, ContinuousDynamicsCommand::None);
            }
            self.recalculate(score, voice, Range::for_indices(score.len()));
        }
        self.apply_ui_updates();
    }

    /// Rebuild when handed a score of a different length than the cache.
    fn sync_length(&mut self, score: &ScoreData) {
        if self.hairpins.first().map_or(0, Vec::len) != score.len() {
            debug!(to = score.len(), "score length changed, rebuilding hairpins");
            self.rebuild(score);
        }
    }

    fn apply_ui_updates(&mut self) {
        self.pending.drain(&mut self.callbacks);
    }

    fn cached(&self, voice: usize, column: isize) -> Option<Range> {
        if column < 0 {
            return None;
        }
        self.hairpin(voice, column as usize)
    }

    fn apply_move(&mut self, score: &mut ScoreData, column: isize) {
        let Some(interaction) = self.interaction.as_mut() else {
            return;
        };
        let painted = interaction.move_to(column);
        let DynamicsInteraction { command, voice, .. } = *interaction;

        let painted = painted.trimmed_to(Range::for_indices(score.len()));
        if painted.is_empty() || voice >= NUM_VOICES {
            return;
        }
        for c in painted {
            score.set_dynamics(voice, c as usize, command);
        }
        self.recalculate(score, voice, painted);
    }

    /// Recompute hairpins for `voice` over `changed`, widened to the runs
    /// that touch it from either side.
    fn recalculate(&mut self, score: &ScoreData, voice: usize, changed: Range) {
        if changed.is_empty() {
            return;
        }
        let mut scan = changed;
        if let Some(left) = self.cached(voice, changed.start_exclusive()) {
            scan.set_start(left.start());
        }
        if let Some(right) = self.cached(voice, changed.end_exclusive()) {
            scan.set_end(right.end());
        }
        trace!(voice, start = scan.start(), end = scan.end(), "recalculating hairpins");

        for c in scan.to_indices(self.hairpins[voice].len()) {
            if let Some(old) = self.hairpins[voice][c].take() {
                self.pending.push(DynamicsCell {
                    voice,
                    column: old.start() as usize,
                });
            }
        }

        let mut run: Option<(isize, ContinuousDynamicsCommand)> = None;
        for c in scan {
            let command = score.dynamics(voice, c as usize);
            if let Some((start, open)) = run {
                if open != command {
                    self.write_run(voice, Range::new(start, c - 1));
                    run = None;
                }
            }
            if run.is_none() && !command.is_none() {
                run = Some((c, command));
            }
        }
        if let Some((start, _)) = run {
            self.write_run(voice, Range::new(start, scan.end()));
        }
    }

    fn write_run(&mut self, voice: usize, run: Range) {
        for c in run.to_indices(self.hairpins[voice].len()) {
            self.hairpins[voice][c] = Some(run);
        }
        self.pending.push(DynamicsCell {
            voice,
            column: run.start() as usize,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use ContinuousDynamicsCommand::{Crescendo, Diminuendo};

    fn paint(editor: &mut DynamicsEditor, score: &mut ScoreData, from: usize, to: usize, command: ContinuousDynamicsCommand) {
        editor.start_interaction(score, 0, from, command);
        editor.move_interaction_to(score, to);
        editor.end_interaction();
    }

    /// Compare every cached hairpin against a direct scan of the commands.
    fn assert_hairpins_match(editor: &DynamicsEditor, score: &ScoreData) {
        for voice in 0..NUM_VOICES {
            for c in 0..score.len() {
                let command = score.dynamics(voice, c);
                let expected = (!command.is_none()).then(|| {
                    let mut start = c;
                    while start > 0 && score.dynamics(voice, start - 1) == command {
                        start -= 1;
                    }
                    let mut end = c;
                    while end + 1 < score.len() && score.dynamics(voice, end + 1) == command {
                        end += 1;
                    }
                    Range::new(start as isize, end as isize)
                });
                assert_eq!(editor.hairpin(voice, c), expected, "voice {voice} column {c}");
            }
        }
    }

    #[test]
    fn adjacent_crescendos_merge() {
        let mut score = ScoreData::new(12);
        let mut editor = DynamicsEditor::new(&score);
        paint(&mut editor, &mut score, 3, 6, Crescendo);
        assert_eq!(editor.hairpin(0, 4), Some(Range::new(3, 6)));

        paint(&mut editor, &mut score, 7, 9, Crescendo);
        for c in 3..=9 {
            assert_eq!(editor.hairpin(0, c), Some(Range::new(3, 9)));
        }
        assert_eq!(editor.hairpin(0, 2), None);
        assert_eq!(editor.hairpin(0, 10), None);
        assert_hairpins_match(&editor, &score);
    }

    #[test]
    fn different_commands_stay_separate() {
        let mut score = ScoreData::new(12);
        let mut editor = DynamicsEditor::new(&score);
        paint(&mut editor, &mut score, 3, 6, Crescendo);
        paint(&mut editor, &mut score, 7, 9, Diminuendo);

        assert_eq!(editor.hairpin(0, 6), Some(Range::new(3, 6)));
        assert_eq!(editor.hairpin(0, 7), Some(Range::new(7, 9)));
        assert_hairpins_match(&editor, &score);
    }

    #[test]
    fn erasing_the_middle_splits_a_hairpin() {
        let mut score = ScoreData::new(12);
        let mut editor = DynamicsEditor::new(&score);
        paint(&mut editor, &mut score, 0, 10, Crescendo);
        paint(&mut editor, &mut score, 4, 5, ContinuousDynamicsCommand::None);

        assert_eq!(editor.hairpin(0, 0), Some(Range::new(0, 3)));
        assert_eq!(editor.hairpin(0, 4), None);
        assert_eq!(editor.hairpin(0, 6), Some(Range::new(6, 10)));
        assert_hairpins_match(&editor, &score);
    }

    #[test]
    fn painting_leftwards_covers_anchor_to_current() {
        let mut score = ScoreData::new(12);
        let mut editor = DynamicsEditor::new(&score);
        paint(&mut editor, &mut score, 8, 2, Diminuendo);
        assert_eq!(editor.hairpin(0, 2), Some(Range::new(2, 8)));
    }

    #[test]
    fn painting_past_the_end_is_clipped() {
        let mut score = ScoreData::new(6);
        let mut editor = DynamicsEditor::new(&score);
        paint(&mut editor, &mut score, 4, 20, Crescendo);
        assert_eq!(editor.hairpin(0, 5), Some(Range::new(4, 5)));
        assert_eq!(editor.hairpin(0, 6), None);
    }

    #[test]
    fn new_derives_hairpins_from_existing_data() {
        let mut score = ScoreData::new(8);
        for c in 2..5 {
            score.set_dynamics(1, c, Diminuendo);
        }
        let editor = DynamicsEditor::new(&score);
        assert_eq!(editor.hairpin(1, 3), Some(Range::new(2, 4)));
        assert!(editor.pending_updates().is_empty());
    }

    #[test]
    fn clear_all_removes_every_hairpin() {
        let mut score = ScoreData::new(8);
        let mut editor = DynamicsEditor::new(&score);
        paint(&mut editor, &mut score, 1, 6, Crescendo);
        editor.clear_all(&mut score);

        assert!((0..8).all(|c| editor.hairpin(0, c).is_none()));
        assert!((0..8).all(|c| score.dynamics(0, c).is_none()));
    }

    #[test]
    fn old_and_new_run_starts_are_redrawn() {
        let mut score = ScoreData::new(12);
        let mut editor = DynamicsEditor::new(&score);
        let redrawn = Rc::new(RefCell::new(Vec::new()));
        for column in 0..12 {
            let log = redrawn.clone();
            editor.register_callback(DynamicsCell { voice: 0, column }, move || {
                log.borrow_mut().push(column)
            });
        }

        paint(&mut editor, &mut score, 3, 6, Crescendo);
        redrawn.borrow_mut().clear();

        // Extending leftwards moves the run start from 3 to 1
        paint(&mut editor, &mut score, 1, 2, Crescendo);
        let mut touched = redrawn.borrow().clone();
        touched.sort();
        touched.dedup();
        assert_eq!(touched, vec![1, 3]);
    }

    #[test]
    fn longer_score_rebuilds_the_cache() {
        let mut editor = DynamicsEditor::new(&ScoreData::new(8));
        let mut score = ScoreData::new(16);
        paint(&mut editor, &mut score, 0, 12, Crescendo);

        assert_eq!(editor.hairpin(0, 12), Some(Range::new(0, 12)));
        assert_hairpins_match(&editor, &score);

        let mut shorter = ScoreData::new(4);
        paint(&mut editor, &mut shorter, 1, 2, Diminuendo);
        assert_eq!(editor.hairpin(0, 1), Some(Range::new(1, 2)));
        assert_eq!(editor.hairpin(0, 12), None);
        assert_hairpins_match(&editor, &shorter);
    }

    #[test]
    fn huge_columns_paint_to_the_grid_end() {
        let mut score = ScoreData::new(8);
        let mut editor = DynamicsEditor::new(&score);
        paint(&mut editor, &mut score, 5, usize::MAX, Diminuendo);
        assert_eq!(editor.hairpin(0, 7), Some(Range::new(5, 7)));

        paint(&mut editor, &mut score, usize::MAX, usize::MAX, Crescendo);
        assert_hairpins_match(&editor, &score);
    }

    #[test]
    fn rebuild_redraws_dropped_hairpins() {
        let mut score = ScoreData::new(8);
        let mut editor = DynamicsEditor::new(&score);
        paint(&mut editor, &mut score, 2, 4, Crescendo);

        let redrawn = Rc::new(RefCell::new(Vec::new()));
        let log = redrawn.clone();
        editor.register_callback(DynamicsCell { voice: 0, column: 2 }, move || log.borrow_mut().push(2));

        score.resize(8);
        editor.rebuild(&score);
        assert_eq!(*redrawn.borrow(), vec![2]);
        assert_eq!(editor.hairpin(0, 3), None);
    }

    #[test]
    fn random_paint_sequences_keep_hairpins_consistent() {
        let mut score = ScoreData::new(30);
        let mut editor = DynamicsEditor::new(&score);
        let mut seed: u64 = 0xd1_a11;
        let mut next = |bound: u64| {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) % bound
        };
        for _ in 0..300 {
            let command = match next(3) {
                0 => Crescendo,
                1 => Diminuendo,
                _ => ContinuousDynamicsCommand::None,
            };
            let voice = next(2) as usize;
            editor.start_interaction(&mut score, voice, next(30) as usize, command);
            for _ in 0..next(3) {
                editor.move_interaction_to(&mut score, next(32) as usize);
            }
            editor.end_interaction();
            assert_hairpins_match(&editor, &score);
        }
    }
}
