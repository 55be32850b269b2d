//! Drain-to-latest response polling.
//!
//! The module may emit stale replies or echoes ahead of the answer to the
//! query just sent. Rather than stopping at the first valid frame, the poller
//! consumes every complete frame currently buffered and keeps the last valid
//! one. A frame still arriving stays buffered for the next drain.

use std::io;

use dfplayer_protocol::{ResponseFrame, RESPONSE_FRAME_SIZE};
use tracing::trace;

use crate::transport::Transport;

/// Read and decode frames while a full frame is buffered, returning the most
/// recent valid one.
///
/// Never waits for bytes to arrive: with fewer than a frame's worth buffered
/// it returns at once and leaves them unread. Frames that fail to decode are
/// dropped.
pub fn drain_latest<T: Transport + ?Sized>(transport: &mut T) -> io::Result<Option<ResponseFrame>> {
    let mut latest = None;
    let mut chunk = [0u8; RESPONSE_FRAME_SIZE];

    loop {
        if transport.bytes_available()? < RESPONSE_FRAME_SIZE {
            return Ok(latest);
        }

        let mut filled = 0;
        while filled < RESPONSE_FRAME_SIZE {
            let n = transport.read(&mut chunk[filled..])?;
            if n == 0 {
                trace!(bytes = ?&chunk[..filled], "transport ran dry mid-frame");
                return Ok(latest);
            }
            filled += n;
        }

        match ResponseFrame::decode(&chunk) {
            Some(frame) => {
                trace!(
                    command = frame.command_code(),
                    data = frame.data(),
                    "decoded response"
                );
                latest = Some(frame);
            }
            None => trace!(bytes = ?chunk, "discarded invalid frame"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct Buffered {
        rx: VecDeque<u8>,
        // Report a full frame as available but hand back nothing.
        stuck: bool,
    }

    impl Buffered {
        fn with(bytes: &[u8]) -> Self {
            Buffered {
                rx: bytes.iter().copied().collect(),
                stuck: false,
            }
        }
    }

    impl Transport for Buffered {
        fn write(&mut self, _bytes: &[u8]) -> io::Result<()> {
            Ok(())
        }

        fn bytes_available(&mut self) -> io::Result<usize> {
            Ok(if self.stuck {
                RESPONSE_FRAME_SIZE
            } else {
                self.rx.len()
            })
        }

        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.rx.len());
            for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..n)) {
                *slot = byte;
            }
            Ok(n)
        }
    }

    fn frame(cmd: u8, data: u16) -> [u8; RESPONSE_FRAME_SIZE] {
        ResponseFrame::new(cmd, data).to_bytes()
    }

    #[test]
    fn test_empty_transport_returns_none() {
        let mut transport = Buffered::default();
        assert_eq!(drain_latest(&mut transport).unwrap(), None);
    }

    #[test]
    fn test_returns_latest_of_two_frames() {
        let mut bytes = frame(0x42, 0x0200).to_vec();
        bytes.extend_from_slice(&frame(0x43, 15));
        let mut transport = Buffered::with(&bytes);

        let latest = drain_latest(&mut transport).unwrap().expect("frame");
        assert_eq!(latest.command_code(), 0x43);
        assert_eq!(latest.data(), 15);
        assert!(transport.rx.is_empty());
    }

    #[test]
    fn test_invalid_chunks_are_skipped() {
        let mut bytes = frame(0x44, 3).to_vec();
        bytes.extend_from_slice(&[0u8; RESPONSE_FRAME_SIZE]);
        let mut transport = Buffered::with(&bytes);

        let latest = drain_latest(&mut transport).unwrap().expect("frame");
        assert_eq!(latest.command_code(), 0x44);
    }

    #[test]
    fn test_trailing_partial_frame_is_left_buffered() {
        let mut bytes = frame(0x46, 8).to_vec();
        bytes.extend_from_slice(&[0x7E, 0xFF, 0x06]);
        let mut transport = Buffered::with(&bytes);

        let latest = drain_latest(&mut transport).unwrap().expect("frame");
        assert_eq!(latest.data(), 8);
        assert_eq!(transport.rx.len(), 3);
    }

    #[test]
    fn test_frame_split_across_polls() {
        let volume = frame(0x43, 15);
        let mut transport = Buffered::with(&volume[..6]);

        assert_eq!(drain_latest(&mut transport).unwrap(), None);
        assert_eq!(transport.rx.len(), 6, "partial frame stays buffered");

        transport.rx.extend(volume[6..].iter().copied());
        transport.rx.extend(frame(0x46, 70).iter().copied());

        let latest = drain_latest(&mut transport).unwrap().expect("frame");
        assert_eq!(latest.command_code(), 0x46);
        assert_eq!(latest.data(), 70);
        assert!(transport.rx.is_empty());
    }

    #[test]
    fn test_only_garbage_returns_none() {
        let mut transport = Buffered::with(&[0xAA; 25]);
        assert_eq!(drain_latest(&mut transport).unwrap(), None);
        assert_eq!(transport.rx.len(), 5);
    }

    #[test]
    fn test_empty_read_ends_drain() {
        let mut transport = Buffered {
            stuck: true,
            ..Default::default()
        };
        assert_eq!(drain_latest(&mut transport).unwrap(), None);
    }
}
