//! Simulated module.
//!
//! [`SimulatedDevice`] implements [`Transport`] by parsing the command frames
//! written to it, updating a model of the module's state and queueing reply
//! frames for queries. Replies are available immediately after the write,
//! unless reply chunking is enabled, in which case they trickle out a few
//! bytes per availability check as they would over a slow serial link.

use std::collections::{HashMap, VecDeque};
use std::io;

use bytes::{Buf, BytesMut};
use dfplayer_protocol::{
    Command, CommandFrame, EqPreset, MediaSource, PlaybackStatus, ResponseFrame,
    COMMAND_FRAME_SIZE, FRAME_END, FRAME_LENGTH, FRAME_START, FRAME_VERSION, MAX_VOLUME,
};
use tracing::{debug, trace};

use crate::transport::Transport;

/// Firmware version reported unless configured otherwise.
pub const SIM_FIRMWARE_VERSION: u16 = 8;

/// Observable state of the simulated module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceState {
    pub media: MediaSource,
    /// Volume step, 0-30.
    pub volume: u8,
    pub eq: EqPreset,
    pub status: PlaybackStatus,
    pub current_file: u16,
    pub firmware_version: u16,
    pub standby: bool,
    /// Advert track currently interrupting playback.
    pub advert: Option<u16>,
    pub loop_track: bool,
    pub loop_all: bool,
    pub loop_folder: Option<u8>,
    pub file_counts: HashMap<MediaSource, u16>,
    pub folder_file_counts: HashMap<u8, u16>,
}

impl Default for DeviceState {
    fn default() -> Self {
        DeviceState {
            media: MediaSource::SdCard,
            volume: 20,
            eq: EqPreset::Normal,
            status: PlaybackStatus::Stopped,
            current_file: 0,
            firmware_version: SIM_FIRMWARE_VERSION,
            standby: false,
            advert: None,
            loop_track: false,
            loop_all: false,
            loop_folder: None,
            file_counts: HashMap::new(),
            folder_file_counts: HashMap::new(),
        }
    }
}

impl DeviceState {
    fn file_count(&self, media: MediaSource) -> u16 {
        self.file_counts.get(&media).copied().unwrap_or(0)
    }

    fn apply(&mut self, frame: &CommandFrame) -> Option<u16> {
        let low = frame.data_low();
        match frame.command() {
            Command::Next => {
                let total = self.file_count(self.media).max(1);
                self.current_file = self.current_file % total + 1;
                self.status = PlaybackStatus::Playing;
            }
            Command::Previous => {
                let total = self.file_count(self.media).max(1);
                self.current_file = if self.current_file <= 1 {
                    total
                } else {
                    self.current_file - 1
                };
                self.status = PlaybackStatus::Playing;
            }
            Command::PlayTrack | Command::PlayFolderTrack | Command::PlayFolder => {
                self.current_file = frame.data();
                self.status = PlaybackStatus::Playing;
            }
            Command::VolumeUp => self.volume = (self.volume + 1).min(MAX_VOLUME),
            Command::VolumeDown => self.volume = self.volume.saturating_sub(1),
            Command::SetVolume => self.volume = low.min(MAX_VOLUME),
            Command::SetEq => self.eq = EqPreset::from(low),
            Command::SetMedia => {
                if let Ok(media) = MediaSource::try_from(low) {
                    self.media = media;
                }
                self.status = PlaybackStatus::Stopped;
            }
            Command::Standby => self.standby = true,
            Command::Wake => self.standby = false,
            Command::Reset => {
                let file_counts = std::mem::take(&mut self.file_counts);
                let folder_file_counts = std::mem::take(&mut self.folder_file_counts);
                let firmware_version = self.firmware_version;
                *self = DeviceState {
                    file_counts,
                    folder_file_counts,
                    firmware_version,
                    ..DeviceState::default()
                };
            }
            Command::Resume => self.status = PlaybackStatus::Playing,
            Command::Pause => self.status = PlaybackStatus::Paused,
            Command::LoopAll => self.loop_all = low == 1,
            Command::PlayAdvert => self.advert = Some(frame.data()),
            Command::StopAdvert => self.advert = None,
            Command::Stop => self.status = PlaybackStatus::Stopped,
            Command::LoopFolder => {
                self.loop_folder = Some(low);
                self.status = PlaybackStatus::Playing;
            }
            Command::Random => self.status = PlaybackStatus::Playing,
            // The module takes 0 to enable and 1 to disable.
            Command::LoopTrack => self.loop_track = low == 0,
            Command::QueryStatus => return Some(self.status.into()),
            Command::QueryVolume => return Some(u16::from(self.volume)),
            Command::QueryEq => return Some(u16::from(self.eq.code())),
            Command::QueryMode => return Some(u16::from(self.media.code())),
            Command::QueryVersion => return Some(self.firmware_version),
            Command::QueryUsbFiles => return Some(self.file_count(MediaSource::UsbDisk)),
            Command::QuerySdFiles => return Some(self.file_count(MediaSource::SdCard)),
            Command::QueryFlashFiles => return Some(self.file_count(MediaSource::Flash)),
            Command::QueryCurrentFile => return Some(self.current_file),
            Command::QueryFolderFiles => {
                return Some(self.folder_file_counts.get(&low).copied().unwrap_or(0))
            }
        }
        None
    }
}

/// An in-memory module that answers like the real one.
#[derive(Debug)]
pub struct SimulatedDevice {
    inbox: BytesMut,
    outbox: VecDeque<u8>,
    received: Vec<CommandFrame>,
    state: DeviceState,
    responsive: bool,
    chunking: Option<usize>,
    // Outbox bytes already visible to the host when chunking.
    released: usize,
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedDevice {
    /// Create a responsive module with an empty SD card.
    pub fn new() -> Self {
        SimulatedDevice {
            inbox: BytesMut::with_capacity(COMMAND_FRAME_SIZE * 4),
            outbox: VecDeque::new(),
            received: Vec::new(),
            state: DeviceState::default(),
            responsive: true,
            chunking: None,
            released: 0,
        }
    }

    /// Create a module that accepts commands but never replies.
    pub fn unresponsive() -> Self {
        SimulatedDevice {
            responsive: false,
            ..Self::new()
        }
    }

    /// Set the number of files on a media.
    pub fn with_file_count(mut self, media: MediaSource, count: u16) -> Self {
        self.state.file_counts.insert(media, count);
        self
    }

    /// Set the number of files in a folder.
    pub fn with_folder_file_count(mut self, folder: u8, count: u16) -> Self {
        self.state.folder_file_counts.insert(folder, count);
        self
    }

    /// Set the firmware version the module reports.
    pub fn with_firmware_version(mut self, version: u16) -> Self {
        self.state.firmware_version = version;
        self
    }

    /// Deliver reply bytes `chunk` at a time, one chunk per
    /// [`Transport::bytes_available`] call.
    pub fn with_reply_chunking(mut self, chunk: usize) -> Self {
        self.set_reply_chunking(Some(chunk));
        self
    }

    /// Change reply chunking; `None` makes every queued byte visible at once.
    pub fn set_reply_chunking(&mut self, chunk: Option<usize>) {
        self.chunking = chunk.map(|n| n.max(1));
        self.released = 0;
    }

    /// Start or stop answering queries.
    pub fn set_responsive(&mut self, responsive: bool) {
        self.responsive = responsive;
    }

    /// Current module state.
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Mutable module state, for staging scenarios.
    pub fn state_mut(&mut self) -> &mut DeviceState {
        &mut self.state
    }

    /// Queue raw bytes for the host to read, ahead of any later replies.
    pub fn inject(&mut self, bytes: &[u8]) {
        self.outbox.extend(bytes.iter().copied());
    }

    /// Every valid command frame received, in order.
    pub fn received(&self) -> &[CommandFrame] {
        &self.received
    }

    /// Most recent command frame received.
    pub fn last_received(&self) -> Option<&CommandFrame> {
        self.received.last()
    }

    /// Forget the received command log.
    pub fn clear_received(&mut self) {
        self.received.clear();
    }

    /// Bytes waiting to be read by the host.
    pub fn pending_reply_bytes(&self) -> usize {
        self.outbox.len()
    }

    fn process_inbox(&mut self) {
        loop {
            // Resynchronize on the start marker.
            while !self.inbox.is_empty() && self.inbox[0] != FRAME_START {
                self.inbox.advance(1);
            }
            if self.inbox.len() < COMMAND_FRAME_SIZE {
                return;
            }

            let raw = &self.inbox[..COMMAND_FRAME_SIZE];
            if raw[1] != FRAME_VERSION || raw[2] != FRAME_LENGTH || raw[7] != FRAME_END {
                trace!(bytes = ?raw, "simulated module skipping malformed frame");
                self.inbox.advance(1);
                continue;
            }

            let (code, high, low) = (raw[3], raw[5], raw[6]);
            self.inbox.advance(COMMAND_FRAME_SIZE);

            let Some(command) = Command::from_code(code) else {
                debug!(code, "simulated module ignoring unknown command");
                continue;
            };
            let frame = CommandFrame::new(command, low, high);
            self.received.push(frame);

            let reply = self.state.apply(&frame);
            if let (Some(data), true) = (reply, self.responsive) {
                trace!(%frame, data, "simulated module replying");
                self.outbox
                    .extend(ResponseFrame::new(code, data).to_bytes().iter().copied());
            }
        }
    }
}

impl Transport for SimulatedDevice {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inbox.extend_from_slice(bytes);
        self.process_inbox();
        Ok(())
    }

    fn bytes_available(&mut self) -> io::Result<usize> {
        match self.chunking {
            Some(chunk) => {
                self.released = (self.released + chunk).min(self.outbox.len());
                Ok(self.released)
            }
            None => Ok(self.outbox.len()),
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let visible = match self.chunking {
            Some(_) => self.released,
            None => self.outbox.len(),
        };
        let n = buf.len().min(visible);
        for (slot, byte) in buf.iter_mut().zip(self.outbox.drain(..n)) {
            *slot = byte;
        }
        self.released = self.released.saturating_sub(n);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dfplayer_protocol::RESPONSE_FRAME_SIZE;

    fn send(device: &mut SimulatedDevice, command: Command, low: u8, high: u8) {
        device
            .write(CommandFrame::new(command, low, high).as_bytes())
            .unwrap();
    }

    fn read_reply(device: &mut SimulatedDevice) -> ResponseFrame {
        let mut buf = [0u8; RESPONSE_FRAME_SIZE];
        assert_eq!(device.read(&mut buf).unwrap(), RESPONSE_FRAME_SIZE);
        ResponseFrame::decode(&buf).expect("valid reply")
    }

    #[test]
    fn test_query_produces_reply() {
        let mut device = SimulatedDevice::new();
        send(&mut device, Command::SetVolume, 15, 0);
        assert_eq!(device.bytes_available().unwrap(), 0);

        send(&mut device, Command::QueryVolume, 0, 0);
        let reply = read_reply(&mut device);
        assert!(reply.answers(Command::QueryVolume));
        assert_eq!(reply.data(), 15);
    }

    #[test]
    fn test_unresponsive_records_but_never_replies() {
        let mut device = SimulatedDevice::unresponsive();
        send(&mut device, Command::QueryStatus, 0, 0);
        assert_eq!(device.bytes_available().unwrap(), 0);
        assert_eq!(device.received().len(), 1);
    }

    #[test]
    fn test_split_and_noisy_writes() {
        let mut device = SimulatedDevice::new();
        let frame = CommandFrame::new(Command::SetEq, 4, 0);
        let bytes = frame.as_bytes();

        device.write(&[0x00, 0x13]).unwrap();
        device.write(&bytes[..3]).unwrap();
        assert!(device.received().is_empty());
        device.write(&bytes[3..]).unwrap();

        assert_eq!(device.received(), &[frame]);
        assert_eq!(device.state().eq, EqPreset::Classic);
    }

    #[test]
    fn test_reply_chunking_trickles_bytes() {
        let mut device = SimulatedDevice::new().with_reply_chunking(4);
        send(&mut device, Command::QueryVersion, 0, 0);

        assert_eq!(device.bytes_available().unwrap(), 4);
        let mut buf = [0u8; RESPONSE_FRAME_SIZE];
        assert_eq!(device.read(&mut buf).unwrap(), 4);
        assert_eq!(device.pending_reply_bytes(), 6);

        assert_eq!(device.bytes_available().unwrap(), 4);
        assert_eq!(device.bytes_available().unwrap(), 6);
        assert_eq!(device.read(&mut buf).unwrap(), 6);
        assert_eq!(device.bytes_available().unwrap(), 0);
    }

    #[test]
    fn test_volume_steps_saturate() {
        let mut device = SimulatedDevice::new();
        send(&mut device, Command::SetVolume, 200, 0);
        assert_eq!(device.state().volume, 30);
        send(&mut device, Command::VolumeUp, 0, 0);
        assert_eq!(device.state().volume, 30);
        send(&mut device, Command::SetVolume, 0, 0);
        send(&mut device, Command::VolumeDown, 0, 0);
        assert_eq!(device.state().volume, 0);
    }

    #[test]
    fn test_reset_keeps_storage() {
        let mut device = SimulatedDevice::new()
            .with_file_count(MediaSource::SdCard, 12)
            .with_firmware_version(5);
        send(&mut device, Command::PlayTrack, 3, 0);
        send(&mut device, Command::Reset, 0, 0);

        assert_eq!(device.state().status, PlaybackStatus::Stopped);
        assert_eq!(device.state().current_file, 0);
        assert_eq!(device.state().file_count(MediaSource::SdCard), 12);
        assert_eq!(device.state().firmware_version, 5);
    }

    #[test]
    fn test_next_wraps() {
        let mut device = SimulatedDevice::new().with_file_count(MediaSource::SdCard, 3);
        send(&mut device, Command::PlayTrack, 3, 0);
        send(&mut device, Command::Next, 0, 0);
        assert_eq!(device.state().current_file, 1);
        send(&mut device, Command::Previous, 0, 0);
        assert_eq!(device.state().current_file, 3);
    }
}
