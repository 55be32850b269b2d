//! Settle waits.

use std::time::Duration;

/// Blocks for the settle time after a command.
pub trait Delay {
    /// Wait for `duration`. A zero duration must return immediately.
    fn delay(&mut self, duration: Duration);
}

/// Sleeps the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Delay for ThreadSleep {
    fn delay(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Records requested delays without waiting.
///
/// Useful with the simulated module, which answers instantly.
#[derive(Debug, Clone, Default)]
pub struct RecordedDelay {
    delays: Vec<Duration>,
}

impl RecordedDelay {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every delay requested so far, in order.
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    /// Sum of all requested delays.
    pub fn total(&self) -> Duration {
        self.delays.iter().sum()
    }

    /// Forget recorded delays.
    pub fn clear(&mut self) {
        self.delays.clear();
    }
}

impl Delay for RecordedDelay {
    fn delay(&mut self, duration: Duration) {
        self.delays.push(duration);
    }
}

impl<D: Delay + ?Sized> Delay for &mut D {
    fn delay(&mut self, duration: Duration) {
        (**self).delay(duration)
    }
}
