//! Wall-clock transport.

use std::time::Instant;

use gs_engine::Transport;
use tracing::trace;

/// Transport timed by [`Instant`].
#[derive(Clone, Debug, Default)]
pub struct SystemTransport {
    /// Set while running
    origin: Option<Instant>,
    position: f64,
}

impl SystemTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for SystemTransport {
    fn now(&self) -> f64 {
        match self.origin {
            Some(origin) => self.position + origin.elapsed().as_secs_f64(),
            None => self.position,
        }
    }

    fn start(&mut self) {
        if self.origin.is_none() {
            self.origin = Some(Instant::now());
        }
    }

    fn stop(&mut self) {
        self.position = self.now();
        self.origin = None;
    }

    fn cancel(&mut self) {
        trace!("transport cancelled");
    }

    fn set_position(&mut self, seconds: f64) {
        self.position = seconds;
        if self.origin.is_some() {
            self.origin = Some(Instant::now());
        }
    }

    fn is_running(&self) -> bool {
        self.origin.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_transport_holds_position() {
        let mut transport = SystemTransport::new();
        transport.set_position(1.25);
        assert_eq!(transport.now(), 1.25);
        assert!(!transport.is_running());
    }

    #[test]
    fn running_transport_moves_forward() {
        let mut transport = SystemTransport::new();
        transport.start();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(transport.now() > 0.0);

        transport.stop();
        let held = transport.now();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert_eq!(transport.now(), held);
    }
}
