//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when working with the DFPlayer protocol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Unknown command code.
    #[error("unknown command code: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Unknown media source code.
    #[error("unknown media source code: {0}")]
    UnknownMediaSource(u8),

    /// A textual value did not name any known variant.
    #[error("unknown {kind}: {name:?}")]
    UnknownName {
        /// What was being parsed ("media source", "equalizer preset").
        kind: &'static str,
        /// The rejected input.
        name: String,
    },
}

/// Result type alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
