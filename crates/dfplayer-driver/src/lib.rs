//! Blocking driver for DFPlayer Mini class audio modules.
//!
//! The driver sits on any byte [`Transport`] (a UART, a TCP serial bridge or
//! the [`sim::SimulatedDevice`]) and turns method calls into command frames.
//! Each call writes one frame, waits the command's settle time and, for
//! queries, drains the transport for the most recent reply.
//!
//! # Example
//!
//! ```rust
//! use dfplayer_driver::{sim::SimulatedDevice, DfPlayer, DriverConfig, RecordedDelay};
//!
//! let device = SimulatedDevice::new();
//! let mut player = DfPlayer::with_delay(device, RecordedDelay::new(), &DriverConfig::default())?;
//!
//! player.set_volume(80)?;
//! player.play_track(3)?;
//! assert_eq!(player.volume()?, Some(80));
//! # Ok::<(), dfplayer_driver::DriverError>(())
//! ```
//!
//! Queries return `None` when the module does not answer in time or answers
//! a different query; a reading of zero is `Some(0)`.

mod config;
mod delay;
mod driver;
mod error;
mod poller;
pub mod sim;
mod transport;

pub use config::*;
pub use delay::*;
pub use driver::*;
pub use error::*;
pub use poller::*;
pub use transport::*;

pub use dfplayer_protocol as protocol;
