//! The playback clock.

use alloc::rc::Rc;
use core::cell::Cell;

use tracing::trace;

/// A clock the player schedules against and samples each frame.
pub trait Transport {
    /// Seconds elapsed on the transport timeline.
    fn now(&self) -> f64;

    fn start(&mut self);

    /// Pause, keeping the current position.
    fn stop(&mut self);

    /// Drop anything scheduled on the timeline.
    fn cancel(&mut self);

    fn set_position(&mut self, seconds: f64);

    fn is_running(&self) -> bool;
}

/// A shareable wall clock advanced by hand.
#[derive(Clone, Debug, Default)]
pub struct ManualClock(Rc<Cell<f64>>);

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.0.get()
    }

    pub fn set(&self, seconds: f64) {
        self.0.set(seconds);
    }

    pub fn advance(&self, seconds: f64) {
        self.0.set(self.0.get() + seconds);
    }
}

/// Transport driven by a [`ManualClock`], for tests and offline rendering.
#[derive(Clone, Debug, Default)]
pub struct ManualTransport {
    clock: ManualClock,
    /// Clock reading when the transport last started or was repositioned
    origin: f64,
    position: f64,
    running: bool,
    cancels: usize,
}

impl ManualTransport {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// How many times the timeline was cancelled.
    pub fn cancels(&self) -> usize {
        self.cancels
    }
}

impl Transport for ManualTransport {
    fn now(&self) -> f64 {
        if self.running {
            self.position + (self.clock.now() - self.origin)
        } else {
            self.position
        }
    }

    fn start(&mut self) {
        if !self.running {
            self.origin = self.clock.now();
            self.running = true;
        }
    }

    fn stop(&mut self) {
        self.position = self.now();
        self.running = false;
    }

    fn cancel(&mut self) {
        trace!("transport cancelled");
        self.cancels += 1;
    }

    fn set_position(&mut self, seconds: f64) {
        self.position = seconds;
        self.origin = self.clock.now();
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_only_advances_while_running() {
        let clock = ManualClock::new();
        let mut transport = ManualTransport::new(clock.clone());
        clock.advance(5.0);
        assert_eq!(transport.now(), 0.0);

        transport.start();
        clock.advance(1.5);
        assert_eq!(transport.now(), 1.5);

        transport.stop();
        clock.advance(10.0);
        assert_eq!(transport.now(), 1.5);
    }

    #[test]
    fn set_position_rebases_the_timeline() {
        let clock = ManualClock::new();
        let mut transport = ManualTransport::new(clock.clone());
        transport.start();
        clock.advance(2.0);
        transport.set_position(0.0);
        assert_eq!(transport.now(), 0.0);
        clock.advance(0.25);
        assert_eq!(transport.now(), 0.25);
    }
}
