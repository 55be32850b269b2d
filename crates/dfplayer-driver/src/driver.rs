//! The command driver.
//!
//! Every operation is one complete cycle: encode a frame, write it, wait the
//! command's settle time and, for queries, drain the transport for the latest
//! reply. Nothing is pipelined and nothing is retried.

use dfplayer_protocol::{
    Command, CommandFrame, EqPreset, MediaSource, PlaybackStatus, TimingPolicy, Volume,
    MAX_ADVERT_TRACK, MIN_ADVERT_TRACK,
};
use tracing::{debug, info, trace, warn};

use crate::config::DriverConfig;
use crate::delay::{Delay, ThreadSleep};
use crate::error::{DriverError, DriverResult};
use crate::poller::drain_latest;
use crate::transport::Transport;

/// What to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayTarget {
    /// Resume the last playback.
    Resume,
    /// A track by global index.
    Track(u16),
    /// A folder.
    Folder(u8),
    /// A track within a folder.
    FolderTrack { folder: u8, track: u8 },
}

/// Driver for one module on one transport.
///
/// The driver owns its transport exclusively. Calls block for the settle time
/// of the command they send.
pub struct DfPlayer<T, D = ThreadSleep> {
    transport: T,
    delay: D,
    timing: TimingPolicy,
    media: MediaSource,
}

impl<T: Transport> DfPlayer<T> {
    /// Bring up the module, sleeping the calling thread between commands.
    ///
    /// Selects `config.media`, then checks the module answers a status query
    /// before applying the initial volume and equalizer.
    pub fn new(transport: T, config: &DriverConfig) -> DriverResult<Self> {
        Self::with_delay(transport, ThreadSleep, config)
    }
}

impl<T: Transport, D: Delay> DfPlayer<T, D> {
    /// Bring up the module using `delay` for settle waits.
    pub fn with_delay(transport: T, delay: D, config: &DriverConfig) -> DriverResult<Self> {
        let mut player = DfPlayer {
            transport,
            delay,
            timing: config.timing(),
            media: config.media,
        };

        player.set_media(config.media)?;
        match player.status()? {
            Some(status) => info!(%status, media = %config.media, "module ready"),
            None => {
                warn!("module did not answer status query");
                return Err(DriverError::NotResponding);
            }
        }
        player.set_volume(config.volume.percent().into())?;
        player.set_eq(config.eq)?;

        Ok(player)
    }

    // ------------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------------

    fn send(&mut self, command: Command, data_low: u8, data_high: u8) -> DriverResult<()> {
        let frame = CommandFrame::new(command, data_low, data_high);
        let settle = self.timing.settle_delay(command);

        debug!(%frame, ?settle, "sending command");
        trace!(bytes = ?frame.as_bytes(), "tx");
        self.transport.write(frame.as_bytes())?;
        self.delay.delay(settle);
        Ok(())
    }

    fn send_value(&mut self, command: Command, value: u16) -> DriverResult<()> {
        let [high, low] = value.to_be_bytes();
        self.send(command, low, high)
    }

    /// Send a query and return its data if the latest reply echoes it.
    fn query(&mut self, command: Command, data_low: u8) -> DriverResult<Option<u16>> {
        self.send(command, data_low, 0)?;
        Ok(match drain_latest(&mut self.transport)? {
            Some(frame) if frame.answers(command) => Some(frame.data()),
            Some(frame) => {
                warn!(
                    expected = command.code(),
                    got = frame.command_code(),
                    "reply does not answer query"
                );
                None
            }
            None => {
                debug!(%command, "no reply");
                None
            }
        })
    }

    // ------------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------------

    /// Start playback of `target`.
    pub fn play(&mut self, target: PlayTarget) -> DriverResult<()> {
        match target {
            PlayTarget::Resume => self.send(Command::Resume, 0, 0),
            PlayTarget::Track(index) => self.send_value(Command::PlayTrack, index),
            PlayTarget::Folder(folder) => self.send(Command::PlayFolder, folder, 0),
            PlayTarget::FolderTrack { folder, track } => {
                self.send(Command::PlayFolderTrack, track, folder)
            }
        }
    }

    /// Resume the last playback.
    pub fn resume(&mut self) -> DriverResult<()> {
        self.play(PlayTarget::Resume)
    }

    /// Play a track by global index.
    pub fn play_track(&mut self, index: u16) -> DriverResult<()> {
        self.play(PlayTarget::Track(index))
    }

    /// Play the files of `folder`.
    pub fn play_folder(&mut self, folder: u8) -> DriverResult<()> {
        self.play(PlayTarget::Folder(folder))
    }

    /// Play `track` within `folder`.
    pub fn play_folder_track(&mut self, folder: u8, track: u8) -> DriverResult<()> {
        self.play(PlayTarget::FolderTrack { folder, track })
    }

    /// Skip to the next track.
    pub fn next(&mut self) -> DriverResult<()> {
        self.send(Command::Next, 0, 0)
    }

    /// Go back to the previous track.
    pub fn previous(&mut self) -> DriverResult<()> {
        self.send(Command::Previous, 0, 0)
    }

    /// Shuffle play everything on the media.
    pub fn random(&mut self) -> DriverResult<()> {
        self.send(Command::Random, 0, 0)
    }

    /// Pause playback.
    pub fn pause(&mut self) -> DriverResult<()> {
        self.send(Command::Pause, 0, 0)
    }

    /// Stop playback.
    pub fn stop(&mut self) -> DriverResult<()> {
        self.send(Command::Stop, 0, 0)
    }

    /// Loop the current track, or stop looping it.
    pub fn loop_track(&mut self, on: bool) -> DriverResult<()> {
        // Inverted on the wire: 0 starts the loop.
        self.send(Command::LoopTrack, if on { 0 } else { 1 }, 0)
    }

    /// Loop every file on the media, or stop looping.
    pub fn loop_all(&mut self, on: bool) -> DriverResult<()> {
        self.send(Command::LoopAll, u8::from(on), 0)
    }

    /// Loop every file in `folder`.
    pub fn loop_folder(&mut self, folder: u8) -> DriverResult<()> {
        self.send(Command::LoopFolder, folder, 0)
    }

    // ------------------------------------------------------------------------
    // Adverts
    // ------------------------------------------------------------------------

    /// Interrupt playback with `track` from the advert folder.
    ///
    /// Fails with [`DriverError::InvalidAdvertTrack`] before writing anything
    /// unless `1 <= track <= 9999`.
    pub fn play_advert(&mut self, track: u16) -> DriverResult<()> {
        if !(MIN_ADVERT_TRACK..=MAX_ADVERT_TRACK).contains(&track) {
            return Err(DriverError::InvalidAdvertTrack(track));
        }
        self.send_value(Command::PlayAdvert, track)
    }

    /// Stop the advert and resume the interrupted track.
    pub fn stop_advert(&mut self) -> DriverResult<()> {
        self.send(Command::StopAdvert, 0, 0)
    }

    // ------------------------------------------------------------------------
    // Volume & EQ
    // ------------------------------------------------------------------------

    /// Set the volume in percent, clamped to 0-100.
    pub fn set_volume(&mut self, percent: i32) -> DriverResult<()> {
        let step = Volume::from(percent).device_step();
        self.send(Command::SetVolume, step, 0)
    }

    /// Raise the volume by one device step.
    pub fn volume_up(&mut self) -> DriverResult<()> {
        self.send(Command::VolumeUp, 0, 0)
    }

    /// Lower the volume by one device step.
    pub fn volume_down(&mut self) -> DriverResult<()> {
        self.send(Command::VolumeDown, 0, 0)
    }

    /// Current volume in percent, or `None` if the module did not answer.
    pub fn volume(&mut self) -> DriverResult<Option<u8>> {
        Ok(self
            .query(Command::QueryVolume, 0)?
            .map(|step| Volume::from_device(step).percent()))
    }

    /// Select an equalizer preset. Unknown codes select `Normal`.
    pub fn set_eq(&mut self, eq: impl Into<EqPreset>) -> DriverResult<()> {
        let eq = eq.into();
        self.send(Command::SetEq, eq.code(), 0)
    }

    /// Current equalizer preset, or `None` if the module did not answer.
    pub fn eq(&mut self) -> DriverResult<Option<EqPreset>> {
        Ok(self.query(Command::QueryEq, 0)?.map(EqPreset::from))
    }

    // ------------------------------------------------------------------------
    // Media & power
    // ------------------------------------------------------------------------

    /// Select the playback media.
    pub fn set_media(&mut self, media: MediaSource) -> DriverResult<()> {
        self.media = media;
        self.send(Command::SetMedia, media.code(), 0)
    }

    /// Media last selected through this driver.
    pub fn media(&self) -> MediaSource {
        self.media
    }

    /// Put the module into low-power standby.
    pub fn standby(&mut self) -> DriverResult<()> {
        self.send(Command::Standby, 0, 0)
    }

    /// Wake the module from standby.
    pub fn wake(&mut self) -> DriverResult<()> {
        self.send(Command::Wake, 0, 0)
    }

    /// Enter standby when `on`, leave it otherwise.
    pub fn set_standby(&mut self, on: bool) -> DriverResult<()> {
        if on {
            self.standby()
        } else {
            self.wake()
        }
    }

    /// Reinitialize the module. Blocks for a second.
    pub fn reset(&mut self) -> DriverResult<()> {
        self.send(Command::Reset, 0, 0)
    }

    // ------------------------------------------------------------------------
    // Status queries
    // ------------------------------------------------------------------------

    /// Playback status, or `None` if the module did not answer.
    pub fn status(&mut self) -> DriverResult<Option<PlaybackStatus>> {
        Ok(self.query(Command::QueryStatus, 0)?.map(PlaybackStatus::from))
    }

    /// Current playback source as reported by the module.
    pub fn mode(&mut self) -> DriverResult<Option<u16>> {
        self.query(Command::QueryMode, 0)
    }

    /// Firmware version reported by the module.
    pub fn firmware_version(&mut self) -> DriverResult<Option<u16>> {
        self.query(Command::QueryVersion, 0)
    }

    /// Index of the file currently playing.
    pub fn current_file(&mut self) -> DriverResult<Option<u16>> {
        self.query(Command::QueryCurrentFile, 0)
    }

    /// Number of files in `folder`.
    pub fn folder_file_count(&mut self, folder: u8) -> DriverResult<Option<u16>> {
        self.query(Command::QueryFolderFiles, folder)
    }

    /// Number of files on `media`, or on the current media when `None`.
    ///
    /// Media without files (AUX, sleep) report `Some(0)` without touching the
    /// transport.
    pub fn file_count(&mut self, media: Option<MediaSource>) -> DriverResult<Option<u16>> {
        let media = media.unwrap_or(self.media);
        match media.file_count_query() {
            Some(command) => self.query(command, 0),
            None => Ok(Some(0)),
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Settle delays in use.
    pub fn timing(&self) -> &TimingPolicy {
        &self.timing
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Borrow the delay source.
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Release the transport and delay.
    pub fn into_parts(self) -> (T, D) {
        (self.transport, self.delay)
    }
}

impl<T, D> std::fmt::Debug for DfPlayer<T, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DfPlayer")
            .field("media", &self.media)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::RecordedDelay;
    use crate::sim::SimulatedDevice;
    use std::time::Duration;

    type TestPlayer = DfPlayer<SimulatedDevice, RecordedDelay>;

    fn player() -> TestPlayer {
        player_with(SimulatedDevice::new())
    }

    fn player_with(device: SimulatedDevice) -> TestPlayer {
        let mut player =
            DfPlayer::with_delay(device, RecordedDelay::new(), &DriverConfig::default())
                .expect("simulated module answers");
        player.transport_mut().clear_received();
        player
    }

    fn last(player: &TestPlayer) -> CommandFrame {
        *player.transport().last_received().expect("a frame was sent")
    }

    #[test]
    fn test_construction_sequence() {
        let config = DriverConfig::default()
            .with_media(MediaSource::UsbDisk)
            .with_volume(50)
            .with_eq(EqPreset::Rock);
        let player =
            DfPlayer::with_delay(SimulatedDevice::new(), RecordedDelay::new(), &config).unwrap();

        let sent: Vec<_> = player
            .transport()
            .received()
            .iter()
            .map(|f| (f.command(), f.data_low()))
            .collect();
        assert_eq!(
            sent,
            vec![
                (Command::SetMedia, 1),
                (Command::QueryStatus, 0),
                (Command::SetVolume, 15),
                (Command::SetEq, 2),
            ]
        );
        assert_eq!(
            player.delay().delays(),
            &[
                Duration::from_millis(200),
                Duration::from_millis(100),
                Duration::from_millis(100),
                Duration::from_millis(100),
            ]
        );
        assert_eq!(player.media(), MediaSource::UsbDisk);
    }

    #[test]
    fn test_construction_fails_without_reply() {
        let result = DfPlayer::with_delay(
            SimulatedDevice::unresponsive(),
            RecordedDelay::new(),
            &DriverConfig::default(),
        );
        assert!(matches!(result, Err(DriverError::NotResponding)));
    }

    #[test]
    fn test_play_targets() {
        let mut player = player();

        player.resume().unwrap();
        assert_eq!(last(&player).command(), Command::Resume);
        assert_eq!(last(&player).data(), 0);

        player.play_track(517).unwrap();
        assert_eq!(last(&player).command(), Command::PlayTrack);
        assert_eq!((last(&player).data_low(), last(&player).data_high()), (5, 2));

        player.play_folder(7).unwrap();
        assert_eq!(last(&player).command(), Command::PlayFolder);
        assert_eq!((last(&player).data_low(), last(&player).data_high()), (7, 0));

        player.play_folder_track(2, 5).unwrap();
        assert_eq!(last(&player).command(), Command::PlayFolderTrack);
        assert_eq!((last(&player).data_low(), last(&player).data_high()), (5, 2));
    }

    #[test]
    fn test_play_commands_do_not_wait() {
        let mut player = player();
        let before = player.delay().delays().len();

        player.play(PlayTarget::Track(1)).unwrap();
        player.resume().unwrap();
        player.stop().unwrap();

        assert!(player.delay().delays()[before..]
            .iter()
            .all(|d| d.is_zero()));
    }

    #[test]
    fn test_loop_flags() {
        let mut player = player();

        player.loop_track(true).unwrap();
        assert_eq!(last(&player).data_low(), 0);
        player.loop_track(false).unwrap();
        assert_eq!(last(&player).data_low(), 1);

        player.loop_all(true).unwrap();
        assert_eq!(last(&player).data_low(), 1);
        player.loop_all(false).unwrap();
        assert_eq!(last(&player).data_low(), 0);

        player.loop_folder(3).unwrap();
        assert_eq!(last(&player).command(), Command::LoopFolder);
        assert_eq!(last(&player).data_low(), 3);
    }

    #[test]
    fn test_standby_uses_distinct_codes() {
        let mut player = player();
        player.set_standby(true).unwrap();
        assert_eq!(last(&player).command(), Command::Standby);
        assert!(player.transport().state().standby);
        player.set_standby(false).unwrap();
        assert_eq!(last(&player).command(), Command::Wake);
        assert_eq!(last(&player).data(), 0);
    }

    #[test]
    fn test_set_media_updates_state() {
        let mut player = player();
        player.set_media(MediaSource::Flash).unwrap();
        assert_eq!(player.media(), MediaSource::Flash);
        assert_eq!(last(&player).data_low(), 5);
        assert_eq!(player.mode().unwrap(), Some(5));
    }

    #[test]
    fn test_volume_query_scaling() {
        let mut player = player();
        for (step, percent) in [(0u8, 0u8), (1, 3), (15, 50), (29, 96), (30, 100)] {
            player.transport_mut().state_mut().volume = step;
            assert_eq!(player.volume().unwrap(), Some(percent), "step {step}");
        }
    }

    #[test]
    fn test_query_without_reply_is_none() {
        let mut player = player();
        player.transport_mut().set_responsive(false);
        assert_eq!(player.volume().unwrap(), None);
        assert_eq!(player.eq().unwrap(), None);
        assert_eq!(player.status().unwrap(), None);
    }
}
