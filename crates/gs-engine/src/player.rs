//! Score playback with a scroll position that follows the transport.
//!
//! The player has no event loop of its own. `play` hands back a
//! [`FrameTicket`] and a [`StopTimer`]; the host calls
//! [`ScorePlayer::on_frame`] every animation frame with the latest ticket
//! and [`ScorePlayer::on_stop_timer`] once the timer's deadline passes.
//! Both carry the session generation they were issued for, so tickets from
//! a stopped or restarted session are inert.

use alloc::boxed::Box;

use arrayvec::ArrayVec;
use gs_ir::{Composed, Inverted, Linear, ScoreData, ValueConverter, NUM_VOICES};
use tracing::{debug, trace};

use crate::error::EngineError;
use crate::instrument::{Instrument, NullInstrument};
use crate::schedule::{columns_to_seconds, schedule_score, TriggerEvent, TriggerKind};
use crate::scroll::{PaneKey, SharedSyncer, VirtualPane};
use crate::transport::Transport;

/// Grid layout needed to map columns to horizontal scroll offsets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollGeometry {
    /// Pixels per column
    pub column_width: f64,
    /// Pixels before column 0
    pub left_margin: f64,
}

impl ScrollGeometry {
    pub fn columns_to_scroll(&self) -> Linear {
        Linear::new(self.column_width, self.left_margin)
    }
}

impl Default for ScrollGeometry {
    fn default() -> Self {
        Self {
            column_width: 14.0,
            left_margin: 19.0,
        }
    }
}

/// Permission to run one animation frame of a play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct FrameTicket {
    generation: u64,
}

/// The auto-stop deadline of a play session.
#[derive(Clone, Copy, Debug, PartialEq)]
#[must_use]
pub struct StopTimer {
    generation: u64,
    /// Seconds after playback start
    pub fires_at: f64,
}

/// What `play` started.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayStart {
    pub frame: FrameTicket,
    pub timer: StopTimer,
    pub start_column: f64,
    pub play_duration: f64,
    pub triggers: usize,
}

struct PlaySession {
    syncer: SharedSyncer,
    pane: PaneKey,
    time_to_scroll: Composed<Inverted<Linear>, Linear>,
    play_duration: f64,
}

impl PlaySession {
    fn scroll_at(&self, elapsed: f64) -> f64 {
        self.time_to_scroll.forwards(elapsed.min(self.play_duration))
    }
}

pub struct ScorePlayer<T> {
    instruments: ArrayVec<Box<dyn Instrument>, NUM_VOICES>,
    transport: T,
    geometry: ScrollGeometry,
    generation: u64,
    session: Option<PlaySession>,
}

impl<T: Transport> ScorePlayer<T> {
    /// A player with a silent instrument on every voice.
    pub fn new(transport: T) -> Self {
        let mut instruments = ArrayVec::new();
        for _ in 0..NUM_VOICES {
            instruments.push(Box::new(NullInstrument) as Box<dyn Instrument>);
        }
        Self {
            instruments,
            transport,
            geometry: ScrollGeometry::default(),
            generation: 0,
            session: None,
        }
    }

    pub fn with_geometry(mut self, geometry: ScrollGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn geometry(&self) -> ScrollGeometry {
        self.geometry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_some()
    }

    /// Replace a voice's instrument. Stops playback first.
    pub fn set_instrument(&mut self, voice: usize, instrument: Box<dyn Instrument>) -> Result<(), EngineError> {
        if voice >= self.instruments.len() {
            return Err(EngineError::UnknownVoice(voice));
        }
        self.stop();
        self.instruments[voice] = instrument;
        Ok(())
    }

    pub fn instrument(&self, voice: usize) -> Result<&dyn Instrument, EngineError> {
        self.instruments
            .get(voice)
            .map(|i| i.as_ref())
            .ok_or(EngineError::UnknownVoice(voice))
    }

    /// Start playing `score` from the column currently scrolled into view.
    pub fn play(&mut self, score: &ScoreData, syncer: SharedSyncer) -> PlayStart {
        self.stop();

        let columns_to_scroll = self.geometry.columns_to_scroll();
        let extent = columns_to_scroll.forwards(score.len() as f64);
        let pane = syncer
            .borrow_mut()
            .register_pane(Box::new(VirtualPane::new(extent, 0.0)));
        let scroll = syncer.borrow().pane(pane).map_or(0.0, |p| p.scroll_x());
        let start_column = columns_to_scroll.backwards(scroll).max(0.0);

        self.transport.set_position(0.0);
        self.transport.start();

        let schedule = schedule_score(score, start_column);
        for event in &schedule.events {
            self.trigger(event);
        }

        let time_to_scroll = columns_to_seconds(score, start_column)
            .inverted()
            .then(columns_to_scroll);
        let play_duration = schedule.play_duration;

        self.generation += 1;
        let generation = self.generation;
        self.session = Some(PlaySession {
            syncer,
            pane,
            time_to_scroll,
            play_duration,
        });
        debug!(
            generation,
            start_column,
            play_duration,
            triggers = schedule.events.len(),
            "playback started"
        );

        PlayStart {
            frame: FrameTicket { generation },
            timer: StopTimer {
                generation,
                fires_at: play_duration,
            },
            start_column,
            play_duration,
            triggers: schedule.events.len(),
        }
    }

    fn trigger(&mut self, event: &TriggerEvent) {
        let Some(instrument) = self.instruments.get_mut(event.voice) else {
            return;
        };
        trace!(
            voice = event.voice,
            frequency = event.frequency,
            time = event.time,
            kind = ?event.kind,
            "trigger"
        );
        match event.kind {
            TriggerKind::Start => instrument.start(event.frequency, event.time),
            TriggerKind::Stop => instrument.stop(event.frequency, event.time),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.session.is_some() && generation == self.generation
    }

    /// Advance the scroll follower one frame.
    ///
    /// Returns the ticket for the next frame, or `None` once the session
    /// this ticket belongs to has ended.
    pub fn on_frame(&mut self, ticket: FrameTicket) -> Option<FrameTicket> {
        if !self.is_current(ticket.generation) {
            return None;
        }
        let session = self.session.as_ref()?;
        let x = session.scroll_at(self.transport.now());
        session.syncer.borrow_mut().scroll_pane_x(session.pane, x);
        Some(ticket)
    }

    /// Handle the auto-stop deadline: snap to the final position and stop.
    ///
    /// Returns false for a timer from an earlier session.
    pub fn on_stop_timer(&mut self, timer: StopTimer) -> bool {
        if !self.is_current(timer.generation) {
            return false;
        }
        if let Some(session) = &self.session {
            let x = session.scroll_at(session.play_duration);
            session.syncer.borrow_mut().scroll_pane_x(session.pane, x);
        }
        self.stop();
        true
    }

    /// Release every instrument and rewind the transport. No-op when idle.
    pub fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        for instrument in &mut self.instruments {
            instrument.stop_all();
        }
        self.transport.cancel();
        self.transport.stop();
        self.transport.set_position(0.0);
        self.transport.cancel();

        self.generation += 1;
        session.syncer.borrow_mut().unregister_pane(session.pane);
        debug!(generation = self.generation, "playback stopped");
    }
}
