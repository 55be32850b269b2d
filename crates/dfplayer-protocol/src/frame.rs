//! Frame encoding/decoding.
//!
//! Host → module frames carry no checksum:
//!
//! ```text
//! +------+------+------+-----+------+-------+-------+------+
//! | 0x7E | 0xFF | 0x06 | cmd | 0x00 | dataH | dataL | 0xEF |
//! +------+------+------+-----+------+-------+-------+------+
//! ```
//!
//! Module → host frames append a 16-bit checksum before the end marker:
//!
//! ```text
//! +------+------+------+-----+----+-------+-------+-----+-----+------+
//! | 0x7E | 0xFF | 0x06 | cmd | fb | dataH | dataL | ckH | ckL | 0xEF |
//! +------+------+------+-----+----+-------+-------+-----+-----+------+
//! ```
//!
//! The checksum is carried but never verified on decode; a response is valid
//! when its length and four marker bytes match.

use std::fmt;

use bytes::{Buf, BufMut};

use crate::commands::{Command, DataArity};
use crate::constants::*;

/// An encoded host → module command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame {
    command: Command,
    bytes: [u8; COMMAND_FRAME_SIZE],
}

impl CommandFrame {
    /// Build a frame from a command and its two data bytes.
    ///
    /// Data bytes are taken as-is; range checks belong to the caller.
    pub fn new(command: Command, data_low: u8, data_high: u8) -> Self {
        CommandFrame {
            command,
            bytes: Self::encode(command, data_low, data_high),
        }
    }

    /// Build a frame carrying a 16-bit value split across both data bytes.
    pub fn with_value(command: Command, value: u16) -> Self {
        let [high, low] = value.to_be_bytes();
        Self::new(command, low, high)
    }

    /// Encode a command to its 8 wire bytes.
    pub fn encode(command: Command, data_low: u8, data_high: u8) -> [u8; COMMAND_FRAME_SIZE] {
        let mut out = [0u8; COMMAND_FRAME_SIZE];
        let mut buf = &mut out[..];
        buf.put_u8(FRAME_START);
        buf.put_u8(FRAME_VERSION);
        buf.put_u8(FRAME_LENGTH);
        buf.put_u8(command.code());
        buf.put_u8(FEEDBACK_OFF);
        buf.put_u8(data_high);
        buf.put_u8(data_low);
        buf.put_u8(FRAME_END);
        out
    }

    /// The command carried by this frame.
    pub fn command(&self) -> Command {
        self.command
    }

    /// Low data byte (wire offset 6).
    pub fn data_low(&self) -> u8 {
        self.bytes[6]
    }

    /// High data byte (wire offset 5).
    pub fn data_high(&self) -> u8 {
        self.bytes[5]
    }

    /// Both data bytes as a big-endian value.
    pub fn data(&self) -> u16 {
        u16::from_be_bytes([self.data_high(), self.data_low()])
    }

    /// The wire bytes.
    pub fn as_bytes(&self) -> &[u8; COMMAND_FRAME_SIZE] {
        &self.bytes
    }
}

impl AsRef<[u8]> for CommandFrame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for CommandFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command.arity() {
            DataArity::None => write!(f, "{}", self.command),
            DataArity::One => write!(f, "{} [{}]", self.command, self.data_low()),
            DataArity::Two => write!(
                f,
                "{} [low={}, high={}]",
                self.command,
                self.data_low(),
                self.data_high()
            ),
        }
    }
}

/// A decoded module → host response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseFrame {
    command: u8,
    feedback: u8,
    data: u16,
    checksum: u16,
}

impl ResponseFrame {
    /// Build a response for `command` carrying `data`, with the module's checksum.
    pub fn new(command: u8, data: u16) -> Self {
        let mut frame = ResponseFrame {
            command,
            feedback: FEEDBACK_OFF,
            data,
            checksum: 0,
        };
        frame.checksum = frame.expected_checksum();
        frame
    }

    /// Decode a raw response.
    ///
    /// Returns `None` unless `raw` is exactly 10 bytes with matching start,
    /// version, length and end markers.
    pub fn decode(raw: &[u8]) -> Option<ResponseFrame> {
        if raw.len() != RESPONSE_FRAME_SIZE {
            log::trace!("response rejected: {} bytes", raw.len());
            return None;
        }
        if raw[0] != FRAME_START
            || raw[1] != FRAME_VERSION
            || raw[2] != FRAME_LENGTH
            || raw[RESPONSE_FRAME_SIZE - 1] != FRAME_END
        {
            log::trace!("response rejected: bad markers {:02X?}", raw);
            return None;
        }

        let mut buf = &raw[3..RESPONSE_FRAME_SIZE - 1];
        let command = buf.get_u8();
        let feedback = buf.get_u8();
        let data = buf.get_u16();
        let checksum = buf.get_u16();

        Some(ResponseFrame {
            command,
            feedback,
            data,
            checksum,
        })
    }

    /// Encode to the 10 wire bytes.
    pub fn to_bytes(&self) -> [u8; RESPONSE_FRAME_SIZE] {
        let mut out = [0u8; RESPONSE_FRAME_SIZE];
        let mut buf = &mut out[..];
        buf.put_u8(FRAME_START);
        buf.put_u8(FRAME_VERSION);
        buf.put_u8(FRAME_LENGTH);
        buf.put_u8(self.command);
        buf.put_u8(self.feedback);
        buf.put_u16(self.data);
        buf.put_u16(self.checksum);
        buf.put_u8(FRAME_END);
        out
    }

    /// Raw command code echoed by the module.
    pub fn command_code(&self) -> u8 {
        self.command
    }

    /// Echoed command, if it is one this crate knows.
    pub fn command(&self) -> Option<Command> {
        Command::from_code(self.command)
    }

    /// Whether this frame answers `command`.
    pub fn answers(&self, command: Command) -> bool {
        self.command == command.code()
    }

    /// Feedback flag as sent by the module.
    pub fn feedback(&self) -> u8 {
        self.feedback
    }

    /// Data bytes as a big-endian value.
    pub fn data(&self) -> u16 {
        self.data
    }

    /// Checksum as carried on the wire.
    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    // Two's complement of the sum of version, length, command, feedback and data.
    fn expected_checksum(&self) -> u16 {
        let [high, low] = self.data.to_be_bytes();
        let sum = [FRAME_VERSION, FRAME_LENGTH, self.command, self.feedback, high, low]
            .iter()
            .map(|&b| u16::from(b))
            .fold(0u16, u16::wrapping_add);
        0u16.wrapping_sub(sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build the 10-byte response a module would send for the same command and data.
    fn response_for(frame: &CommandFrame) -> [u8; RESPONSE_FRAME_SIZE] {
        let b = frame.as_bytes();
        [b[0], b[1], b[2], b[3], 0x00, b[5], b[6], 0xFE, 0x01, b[7]]
    }

    #[test]
    fn test_encode_layout() {
        let frame = CommandFrame::new(Command::PlayTrack, 0x34, 0x12);
        assert_eq!(
            frame.as_bytes(),
            &[0x7E, 0xFF, 0x06, 0x03, 0x00, 0x12, 0x34, 0xEF]
        );
        assert_eq!(frame.data(), 0x1234);
        assert_eq!(frame.command(), Command::PlayTrack);
    }

    #[test]
    fn test_encode_with_value() {
        let frame = CommandFrame::with_value(Command::PlayAdvert, 9999);
        assert_eq!(frame.data_low(), 0x0F);
        assert_eq!(frame.data_high(), 0x27);
    }

    #[test]
    fn test_decode_matches_encode_for_every_command() {
        let pairs = [(0u8, 0u8), (1, 0), (0, 1), (0x0F, 0x27), (0xFF, 0xFF), (0x80, 0x7F)];
        for cmd in Command::ALL {
            for (low, high) in pairs {
                let frame = CommandFrame::new(cmd, low, high);
                let decoded = ResponseFrame::decode(&response_for(&frame))
                    .unwrap_or_else(|| panic!("{cmd} ({low}, {high}) should decode"));
                assert!(decoded.answers(cmd));
                assert_eq!(decoded.command(), Some(cmd));
                assert_eq!(decoded.data(), u16::from(high) * 256 + u16::from(low));
            }
        }
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let valid = ResponseFrame::new(0x42, 0x0201).to_bytes();
        assert!(ResponseFrame::decode(&[]).is_none());
        assert!(ResponseFrame::decode(&valid[..9]).is_none());

        let mut long = valid.to_vec();
        long.push(0xEF);
        assert!(ResponseFrame::decode(&long).is_none());
    }

    #[test]
    fn test_decode_rejects_marker_corruption() {
        let valid = ResponseFrame::new(0x43, 15).to_bytes();
        for pos in [0usize, 1, 2, 9] {
            for value in 0..=255u8 {
                if value == valid[pos] {
                    continue;
                }
                let mut corrupted = valid;
                corrupted[pos] = value;
                assert!(
                    ResponseFrame::decode(&corrupted).is_none(),
                    "byte {pos} = 0x{value:02X} should be rejected"
                );
            }
        }
    }

    #[test]
    fn test_decode_ignores_payload_corruption() {
        let valid = ResponseFrame::new(0x43, 15).to_bytes();
        for pos in 3..9 {
            let mut corrupted = valid;
            corrupted[pos] ^= 0xA5;
            assert!(ResponseFrame::decode(&corrupted).is_some(), "byte {pos}");
        }
    }

    #[test]
    fn test_checksum_is_not_verified() {
        let mut raw = ResponseFrame::new(0x48, 12).to_bytes();
        raw[7] = 0;
        raw[8] = 0;
        let decoded = ResponseFrame::decode(&raw).expect("checksum is opaque");
        assert_eq!(decoded.data(), 12);
        assert_eq!(decoded.checksum(), 0);
    }

    #[test]
    fn test_module_checksum() {
        // Status reply captured from a module: playing from SD.
        let raw = ResponseFrame::new(0x42, 0x0201).to_bytes();
        assert_eq!(raw, [0x7E, 0xFF, 0x06, 0x42, 0x00, 0x02, 0x01, 0xFE, 0xB6, 0xEF]);
    }

    #[test]
    fn test_unknown_echo_is_kept_raw() {
        let decoded = ResponseFrame::decode(&ResponseFrame::new(0x3D, 7).to_bytes()).unwrap();
        assert_eq!(decoded.command(), None);
        assert_eq!(decoded.command_code(), 0x3D);
    }

    #[test]
    fn test_display_follows_arity() {
        assert_eq!(
            CommandFrame::new(Command::Pause, 0, 0).to_string(),
            "pause (0x0E)"
        );
        assert_eq!(
            CommandFrame::new(Command::SetEq, 3, 0).to_string(),
            "set-eq (0x07) [3]"
        );
        assert_eq!(
            CommandFrame::new(Command::PlayFolderTrack, 5, 2).to_string(),
            "play-folder-track (0x0F) [low=5, high=2]"
        );
    }
}
