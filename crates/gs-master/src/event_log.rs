//! An instrument that records what it was asked to play.

use std::cell::RefCell;
use std::rc::Rc;

use gs_engine::Instrument;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LoggedCall {
    Start { voice: usize, frequency: u32, at: f64 },
    Stop { voice: usize, frequency: u32, at: f64 },
    StopAll { voice: usize },
}

impl LoggedCall {
    pub fn voice(&self) -> usize {
        match *self {
            LoggedCall::Start { voice, .. } | LoggedCall::Stop { voice, .. } | LoggedCall::StopAll { voice } => voice,
        }
    }
}

/// Calls from every voice, in arrival order.
pub type EventLog = Rc<RefCell<Vec<LoggedCall>>>;

/// Appends each call to a log shared across voices.
#[derive(Clone, Debug)]
pub struct EventLogInstrument {
    voice: usize,
    log: EventLog,
}

impl EventLogInstrument {
    pub fn new(voice: usize, log: EventLog) -> Self {
        Self { voice, log }
    }
}

impl Instrument for EventLogInstrument {
    fn start(&mut self, frequency: u32, at: f64) {
        trace!(voice = self.voice, frequency, at, "start");
        self.log.borrow_mut().push(LoggedCall::Start {
            voice: self.voice,
            frequency,
            at,
        });
    }

    fn stop(&mut self, frequency: u32, at: f64) {
        trace!(voice = self.voice, frequency, at, "stop");
        self.log.borrow_mut().push(LoggedCall::Stop {
            voice: self.voice,
            frequency,
            at,
        });
    }

    fn stop_all(&mut self) {
        self.log
            .borrow_mut()
            .push(LoggedCall::StopAll { voice: self.voice });
    }
}
