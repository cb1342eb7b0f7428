//! The sound-producing capability the player drives.

use alloc::boxed::Box;

/// A per-voice sound source.
///
/// Triggers are fire-and-forget: times are seconds on the transport clock
/// and may lie in the future.
pub trait Instrument {
    fn start(&mut self, frequency: u32, at: f64);

    fn stop(&mut self, frequency: u32, at: f64);

    /// Release every sounding or scheduled note immediately.
    fn stop_all(&mut self);

    fn is_ready(&self) -> bool {
        true
    }

    /// Run `callback` once the instrument can play. Ready instruments run
    /// it immediately.
    fn on_ready(&mut self, callback: Box<dyn FnOnce()>) {
        callback();
    }
}

/// Silent placeholder used for voices without an instrument.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullInstrument;

impl Instrument for NullInstrument {
    fn start(&mut self, _frequency: u32, _at: f64) {}

    fn stop(&mut self, _frequency: u32, _at: f64) {}

    fn stop_all(&mut self) {}
}
