//! DFPlayer Serial Protocol
//!
//! This crate provides types and utilities for talking to DFPlayer Mini class
//! audio modules over their UART protocol. The module accepts fixed-size
//! command frames and answers queries with fixed-size response frames.
//!
//! # Protocol Overview
//!
//! - **Commands** (host → module): 8 bytes, `7E FF 06 <CMD> 00 <DataH> <DataL> EF`
//! - **Responses** (module → host): 10 bytes, `7E FF 06 <CMD> <FB> <DataH> <DataL> <CkH> <CkL> EF`
//!
//! The module has no flow control. Hosts wait a command-specific settle time
//! after every write (see [`TimingPolicy`]) before reading any reply.
//!
//! # Example
//!
//! ```rust
//! use dfplayer_protocol::{Command, CommandFrame, ResponseFrame};
//!
//! let frame = CommandFrame::new(Command::SetVolume, 15, 0);
//! assert_eq!(frame.as_bytes(), &[0x7E, 0xFF, 0x06, 0x06, 0x00, 0x00, 0x0F, 0xEF]);
//!
//! let reply = ResponseFrame::decode(&ResponseFrame::new(0x43, 15).to_bytes()).unwrap();
//! assert_eq!(reply.data(), 15);
//! ```

mod commands;
mod constants;
mod error;
mod frame;
mod timing;
mod types;

pub use commands::*;
pub use constants::*;
pub use error::*;
pub use frame::*;
pub use timing::*;
pub use types::*;
