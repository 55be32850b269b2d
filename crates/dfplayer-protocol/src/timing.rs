//! Per-command settle delays.
//!
//! The module offers no flow control and no acknowledgement for most
//! commands. After each write the host waits for a command-specific settle
//! time before the next write or before reading a reply:
//!
//! | Class       | Commands                                   | Delay            |
//! |-------------|--------------------------------------------|------------------|
//! | `Media`     | set-media                                  | 200 ms           |
//! | `Reset`     | reset                                      | 1000 ms          |
//! | `Scan`      | file-count queries (USB, SD, flash, folder) | 500 ms          |
//! | `Immediate` | play, resume, stop, advert play/stop       | none             |
//! | `Default`   | everything else                            | configurable     |

use std::time::Duration;

use crate::commands::Command;
use crate::constants::*;

/// Settle class of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleClass {
    /// Module remounts its storage.
    Media,
    /// Module reinitializes completely.
    Reset,
    /// Module scans its storage to count files.
    Scan,
    /// Transport-level command, safe to issue back-to-back.
    Immediate,
    /// Generic processing headroom.
    Default,
}

/// Maps commands to the delay to observe after sending them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingPolicy {
    default_latency: Duration,
}

impl Default for TimingPolicy {
    fn default() -> Self {
        TimingPolicy {
            default_latency: Duration::from_millis(DEFAULT_LATENCY_MS),
        }
    }
}

impl TimingPolicy {
    /// Create a policy with the given delay for `Default`-class commands.
    pub fn new(default_latency: Duration) -> Self {
        TimingPolicy { default_latency }
    }

    /// Delay applied to `Default`-class commands.
    pub fn default_latency(&self) -> Duration {
        self.default_latency
    }

    /// Delay for a settle class.
    pub fn class_delay(&self, class: SettleClass) -> Duration {
        match class {
            SettleClass::Media => Duration::from_millis(SETTLE_MEDIA_MS),
            SettleClass::Reset => Duration::from_millis(SETTLE_RESET_MS),
            SettleClass::Scan => Duration::from_millis(SETTLE_SCAN_MS),
            SettleClass::Immediate => Duration::ZERO,
            SettleClass::Default => self.default_latency,
        }
    }

    /// Delay to wait after sending `command`.
    pub fn settle_delay(&self, command: Command) -> Duration {
        self.class_delay(command.settle_class())
    }
}
