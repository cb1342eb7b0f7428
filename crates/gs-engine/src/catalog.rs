//! The instruments a voice can be assigned, and a readiness gate for
//! instruments whose samples load asynchronously.

use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use core::fmt;
use core::str::FromStr;

use tracing::{trace, warn};

use crate::error::EngineError;
use crate::instrument::Instrument;
use crate::task::LoadTask;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstrumentKind {
    Piano,
    Guitar,
    Violin,
    Violas,
    Cello,
    DoubleBasses,
    Flute,
    Oboe,
    Clarinet,
    Bassoon,
    Trumpet,
    Trombone,
    Tuba,
}

impl InstrumentKind {
    pub const ALL: [InstrumentKind; 13] = [
        InstrumentKind::Piano,
        InstrumentKind::Guitar,
        InstrumentKind::Violin,
        InstrumentKind::Violas,
        InstrumentKind::Cello,
        InstrumentKind::DoubleBasses,
        InstrumentKind::Flute,
        InstrumentKind::Oboe,
        InstrumentKind::Clarinet,
        InstrumentKind::Bassoon,
        InstrumentKind::Trumpet,
        InstrumentKind::Trombone,
        InstrumentKind::Tuba,
    ];

    /// Display name, as shown in instrument selectors.
    pub const fn name(self) -> &'static str {
        match self {
            InstrumentKind::Piano => "Piano",
            InstrumentKind::Guitar => "Guitar",
            InstrumentKind::Violin => "Violin",
            InstrumentKind::Violas => "Violas",
            InstrumentKind::Cello => "Cello",
            InstrumentKind::DoubleBasses => "Double Basses",
            InstrumentKind::Flute => "Flute",
            InstrumentKind::Oboe => "Oboe",
            InstrumentKind::Clarinet => "Clarinet",
            InstrumentKind::Bassoon => "Bassoon",
            InstrumentKind::Trumpet => "Trumpet",
            InstrumentKind::Trombone => "Trombone",
            InstrumentKind::Tuba => "Tuba",
        }
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InstrumentKind {
    type Err = EngineError;

    /// Case-insensitive match on the display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        InstrumentKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                warn!(name = s, "unknown instrument");
                EngineError::UnknownInstrument(s.to_owned())
            })
    }
}

/// Wraps an instrument whose backend is still loading.
///
/// Triggers arriving before loading completes are dropped.
pub struct GatedInstrument<I> {
    kind: InstrumentKind,
    inner: I,
    loading: LoadTask<()>,
}

impl<I: Instrument> GatedInstrument<I> {
    /// A gate that stays closed until [`GatedInstrument::finish_loading`].
    pub fn new(kind: InstrumentKind, inner: I) -> Self {
        Self {
            kind,
            inner,
            loading: LoadTask::new(),
        }
    }

    pub fn loaded(kind: InstrumentKind, inner: I) -> Self {
        Self {
            kind,
            inner,
            loading: LoadTask::finished(()),
        }
    }

    pub fn kind(&self) -> InstrumentKind {
        self.kind
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }

    pub fn finish_loading(&mut self) {
        trace!(instrument = %self.kind, "instrument loaded");
        self.loading.finish(());
    }
}

impl<I: Instrument> Instrument for GatedInstrument<I> {
    fn start(&mut self, frequency: u32, at: f64) {
        if self.loading.is_finished() {
            self.inner.start(frequency, at);
        } else {
            trace!(instrument = %self.kind, frequency, "dropped start while loading");
        }
    }

    fn stop(&mut self, frequency: u32, at: f64) {
        if self.loading.is_finished() {
            self.inner.stop(frequency, at);
        }
    }

    fn stop_all(&mut self) {
        self.inner.stop_all();
    }

    fn is_ready(&self) -> bool {
        self.loading.is_finished()
    }

    fn on_ready(&mut self, callback: Box<dyn FnOnce()>) {
        self.loading.on_finished(move |_| callback());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default)]
    struct Counting {
        starts: Rc<Cell<usize>>,
    }

    impl Instrument for Counting {
        fn start(&mut self, _frequency: u32, _at: f64) {
            self.starts.set(self.starts.get() + 1);
        }
        fn stop(&mut self, _frequency: u32, _at: f64) {}
        fn stop_all(&mut self) {}
    }

    #[test]
    fn names_round_trip() {
        for kind in InstrumentKind::ALL {
            assert_eq!(kind.name().parse::<InstrumentKind>(), Ok(kind));
        }
        assert_eq!("double basses".parse::<InstrumentKind>(), Ok(InstrumentKind::DoubleBasses));
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert_eq!(
            "Kazoo".parse::<InstrumentKind>(),
            Err(EngineError::UnknownInstrument("Kazoo".into()))
        );
    }

    #[test]
    fn gate_drops_triggers_until_loaded() {
        let starts = Rc::new(Cell::new(0));
        let mut gated = GatedInstrument::new(
            InstrumentKind::Cello,
            Counting { starts: starts.clone() },
        );
        let ready = Rc::new(RefCell::new(false));
        let r = ready.clone();
        gated.on_ready(Box::new(move || *r.borrow_mut() = true));

        gated.start(220, 0.0);
        assert_eq!(starts.get(), 0);
        assert!(!gated.is_ready());

        gated.finish_loading();
        assert!(*ready.borrow());
        gated.start(220, 0.0);
        assert_eq!(starts.get(), 1);
    }

    #[test]
    fn loaded_gate_is_ready_immediately() {
        let gated = GatedInstrument::loaded(InstrumentKind::Piano, Counting::default());
        assert!(gated.is_ready());
        assert_eq!(gated.kind().to_string(), "Piano");
    }
}
