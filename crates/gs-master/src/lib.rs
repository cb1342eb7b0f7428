//! Headless controller for the gridscore editor.
//!
//! Owns a score editor, a player and the scroll syncer they share, and
//! stands in for the host event loop: it pumps animation frames and fires
//! the auto-stop timer. Both the CLI and integration tests drive it.

mod event_log;
mod transport;

use std::cell::RefCell;
use std::rc::Rc;

use gs_editor::ScoreEditor;
use gs_engine::{
    schedule_score, EngineError, FrameTicket, Instrument, PaneKey, PaneSyncer, PlayStart, Schedule, ScorePlayer,
    ScrollSyncer, SharedSyncer, StopTimer, Transport, VirtualPane,
};
use gs_ir::ValueConverter;
use tracing::{debug, info};

// Re-export common types so callers don't need the lower crates directly.
pub use gs_editor::{EditorError, NoteGesture};
pub use gs_engine::{InstrumentKind, SyncMode, TriggerEvent, TriggerKind};
pub use gs_ir::{ContinuousDynamicsCommand, NoteCommand, Range, ScoreData, NUM_NOTES, NUM_VOICES};

pub use event_log::{EventLog, EventLogInstrument, LoggedCall};
pub use transport::SystemTransport;

/// Editor, player and the main grid viewport.
pub struct Controller<T = SystemTransport> {
    editor: ScoreEditor,
    player: ScorePlayer<T>,
    syncer: Rc<RefCell<PaneSyncer>>,
    /// The grid view every other pane follows
    view: PaneKey,
    frame: Option<FrameTicket>,
    timer: Option<StopTimer>,
}

impl Controller<SystemTransport> {
    pub fn new(length: usize) -> Self {
        Self::with_transport(length, SystemTransport::new(), SyncMode::Absolute)
    }
}

impl<T: Transport> Controller<T> {
    pub fn with_transport(length: usize, transport: T, mode: SyncMode) -> Self {
        let player = ScorePlayer::new(transport);
        let syncer = Rc::new(RefCell::new(PaneSyncer::new(mode)));
        let view = Self::register_view(&syncer, &player, length);
        Self {
            editor: ScoreEditor::new(length),
            player,
            syncer,
            view,
            frame: None,
            timer: None,
        }
    }

    fn register_view(syncer: &Rc<RefCell<PaneSyncer>>, player: &ScorePlayer<T>, length: usize) -> PaneKey {
        let extent = player.geometry().columns_to_scroll().forwards(length as f64);
        syncer
            .borrow_mut()
            .register_pane(Box::new(VirtualPane::new(extent, 0.0)))
    }

    // --- Editing ---

    pub fn editor(&self) -> &ScoreEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut ScoreEditor {
        &mut self.editor
    }

    pub fn score(&self) -> &ScoreData {
        self.editor.score()
    }

    /// Start over with an empty score of `length` columns.
    pub fn resize(&mut self, length: usize) {
        self.stop();
        self.editor.resize(length);
        self.syncer.borrow_mut().unregister_pane(self.view);
        self.view = Self::register_view(&self.syncer, &self.player, length);
    }

    // --- Scrolling ---

    pub fn syncer(&self) -> SharedSyncer {
        self.syncer.clone()
    }

    /// Horizontal offset of the grid view.
    pub fn view_scroll(&self) -> f64 {
        self.syncer
            .borrow()
            .pane(self.view)
            .map_or(0.0, |pane| pane.scroll_x())
    }

    /// Scroll the grid view so playback would start at `column`.
    pub fn scroll_to_column(&mut self, column: f64) {
        let x = self.player.geometry().columns_to_scroll().forwards(column);
        self.syncer.borrow_mut().scroll_pane_x(self.view, x);
    }

    // --- Playback ---

    pub fn set_instrument(&mut self, voice: usize, instrument: Box<dyn Instrument>) -> Result<(), EngineError> {
        self.player.set_instrument(voice, instrument)?;
        self.frame = None;
        self.timer = None;
        Ok(())
    }

    /// Give every voice an instrument appending to one shared log.
    pub fn log_all_voices(&mut self) -> Result<EventLog, EngineError> {
        let log = EventLog::default();
        for voice in 0..NUM_VOICES {
            self.set_instrument(voice, Box::new(EventLogInstrument::new(voice, log.clone())))?;
        }
        Ok(log)
    }

    pub fn play(&mut self) -> PlayStart {
        self.editor.end_interaction();
        let started = self.player.play(self.editor.score(), self.syncer());
        self.frame = Some(started.frame);
        self.timer = Some(started.timer);
        info!(
            start_column = started.start_column,
            duration = started.play_duration,
            "playing"
        );
        started
    }

    pub fn stop(&mut self) {
        self.player.stop();
        self.frame = None;
        self.timer = None;
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    /// Transport time of the current session.
    pub fn position(&self) -> f64 {
        self.player.transport().now()
    }

    /// Run one animation frame, then fire the auto-stop timer if due.
    ///
    /// Returns whether playback is still running.
    pub fn pump(&mut self) -> bool {
        if let Some(ticket) = self.frame.take() {
            self.frame = self.player.on_frame(ticket);
        }
        if let Some(timer) = self.timer {
            if self.player.transport().now() >= timer.fires_at {
                self.timer = None;
                if self.player.on_stop_timer(timer) {
                    debug!("auto-stop timer fired");
                }
                self.frame = None;
            }
        }
        self.player.is_playing()
    }

    /// Pump frames until playback ends, calling `wait` between frames.
    ///
    /// Returns the number of frames pumped.
    pub fn run_to_end(&mut self, mut wait: impl FnMut()) -> usize {
        let mut frames = 0;
        while self.pump() {
            frames += 1;
            wait();
        }
        frames
    }

    // --- Offline rendering ---

    /// The triggers a `play` from the current view position would issue.
    pub fn render_schedule(&self) -> Schedule {
        let start = self
            .player
            .geometry()
            .columns_to_scroll()
            .backwards(self.view_scroll())
            .max(0.0);
        schedule_score(self.editor.score(), start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs_engine::{ManualClock, ManualTransport};

    fn manual(length: usize) -> (Controller<ManualTransport>, ManualClock) {
        let clock = ManualClock::new();
        let controller = Controller::with_transport(length, ManualTransport::new(clock.clone()), SyncMode::Absolute);
        (controller, clock)
    }

    fn write(controller: &mut Controller<ManualTransport>, pitch: usize, from: usize, to: usize) {
        let editor = controller.editor_mut();
        editor.start_note_interaction(from, pitch, NoteGesture::Write);
        editor.mouse_enter_column(to);
        editor.end_interaction();
    }

    #[test]
    fn pump_runs_until_auto_stop() {
        let (mut controller, clock) = manual(16);
        let log = controller.log_all_voices().unwrap();
        write(&mut controller, 39, 0, 3);

        let started = controller.play();
        let step = started.play_duration / 10.0;
        let frames = controller.run_to_end(|| clock.advance(step));

        assert!(frames >= 9);
        assert!(!controller.is_playing());
        let stops = log.borrow().iter().filter(|c| matches!(c, LoggedCall::StopAll { .. })).count();
        assert_eq!(stops, NUM_VOICES);
        // Snapped to the end of the last note
        let expected = 19.0 + 3.999 * 14.0;
        assert!((controller.view_scroll() - expected).abs() < 1e-6);
    }

    #[test]
    fn render_schedule_matches_play() {
        let (mut controller, _clock) = manual(16);
        let log = controller.log_all_voices().unwrap();
        write(&mut controller, 20, 2, 6);
        write(&mut controller, 30, 8, 8);
        controller.scroll_to_column(4.0);

        let schedule = controller.render_schedule();
        controller.play();
        let played = log
            .borrow()
            .iter()
            .filter(|c| !matches!(c, LoggedCall::StopAll { .. }))
            .count();
        assert_eq!(played, schedule.events.len());
    }

    #[test]
    fn resize_keeps_one_view_pane() {
        let (mut controller, _clock) = manual(8);
        controller.scroll_to_column(3.0);
        controller.resize(32);
        assert_eq!(controller.view_scroll(), 0.0);
        assert_eq!(controller.score().len(), 32);
        controller.scroll_to_column(20.0);
        assert_eq!(controller.view_scroll(), 19.0 + 20.0 * 14.0);
    }
}
