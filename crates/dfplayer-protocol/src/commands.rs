//! Commands that can be sent to the module.

use std::fmt;

use crate::constants::*;
use crate::error::ProtocolError;
use crate::timing::SettleClass;

/// Commands understood by the module.
///
/// Each command travels in its own 8-byte frame together with two data
/// bytes. Only some commands give meaning to those bytes, see [`Command::arity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Play the next track.
    Next,
    /// Play the previous track.
    Previous,
    /// Play a track by global index (two data bytes).
    PlayTrack,
    /// Step volume up by one device step.
    VolumeUp,
    /// Step volume down by one device step.
    VolumeDown,
    /// Set volume to a device step (0-30).
    SetVolume,
    /// Select an equalizer preset.
    SetEq,
    /// Select the playback media.
    SetMedia,
    /// Enter low-power standby.
    Standby,
    /// Leave standby.
    Wake,
    /// Reinitialize the module.
    Reset,
    /// Resume playback.
    Resume,
    /// Pause playback.
    Pause,
    /// Play a track within a folder (folder in the high byte, track in the low byte).
    PlayFolderTrack,
    /// Loop every track on the media.
    LoopAll,
    /// Play from a folder.
    PlayFolder,
    /// Interrupt playback with a track from the advert folder.
    PlayAdvert,
    /// Stop the advert and resume the interrupted track.
    StopAdvert,
    /// Stop playback.
    Stop,
    /// Loop every track in a folder.
    LoopFolder,
    /// Shuffle play.
    Random,
    /// Loop the current track.
    LoopTrack,
    /// Query playback status.
    QueryStatus,
    /// Query volume.
    QueryVolume,
    /// Query equalizer preset.
    QueryEq,
    /// Query playback mode.
    QueryMode,
    /// Query firmware version.
    QueryVersion,
    /// Query number of files on the USB disk.
    QueryUsbFiles,
    /// Query number of files on the SD card.
    QuerySdFiles,
    /// Query number of files in flash.
    QueryFlashFiles,
    /// Query the index of the current file.
    QueryCurrentFile,
    /// Query number of files in a folder.
    QueryFolderFiles,
}

/// Number of data bytes a command gives meaning to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DataArity {
    /// Both data bytes are zero.
    None,
    /// Only the low data byte is used.
    One,
    /// Both bytes form a 16-bit value (or two 8-bit values).
    Two,
}

impl Command {
    /// Every command, in code order.
    pub const ALL: [Command; 32] = [
        Command::Next,
        Command::Previous,
        Command::PlayTrack,
        Command::VolumeUp,
        Command::VolumeDown,
        Command::SetVolume,
        Command::SetEq,
        Command::SetMedia,
        Command::Standby,
        Command::Wake,
        Command::Reset,
        Command::Resume,
        Command::Pause,
        Command::PlayFolderTrack,
        Command::LoopAll,
        Command::PlayFolder,
        Command::PlayAdvert,
        Command::StopAdvert,
        Command::Stop,
        Command::LoopFolder,
        Command::Random,
        Command::LoopTrack,
        Command::QueryStatus,
        Command::QueryVolume,
        Command::QueryEq,
        Command::QueryMode,
        Command::QueryVersion,
        Command::QueryUsbFiles,
        Command::QuerySdFiles,
        Command::QueryFlashFiles,
        Command::QueryCurrentFile,
        Command::QueryFolderFiles,
    ];

    /// Get the command code for this command.
    pub fn code(self) -> u8 {
        match self {
            Command::Next => CMD_NEXT,
            Command::Previous => CMD_PREVIOUS,
            Command::PlayTrack => CMD_PLAY_TRACK,
            Command::VolumeUp => CMD_VOLUME_UP,
            Command::VolumeDown => CMD_VOLUME_DOWN,
            Command::SetVolume => CMD_SET_VOLUME,
            Command::SetEq => CMD_SET_EQ,
            Command::SetMedia => CMD_SET_MEDIA,
            Command::Standby => CMD_STANDBY,
            Command::Wake => CMD_WAKE,
            Command::Reset => CMD_RESET,
            Command::Resume => CMD_RESUME,
            Command::Pause => CMD_PAUSE,
            Command::PlayFolderTrack => CMD_PLAY_FOLDER_TRACK,
            Command::LoopAll => CMD_LOOP_ALL,
            Command::PlayFolder => CMD_PLAY_FOLDER,
            Command::PlayAdvert => CMD_PLAY_ADVERT,
            Command::StopAdvert => CMD_STOP_ADVERT,
            Command::Stop => CMD_STOP,
            Command::LoopFolder => CMD_LOOP_FOLDER,
            Command::Random => CMD_RANDOM,
            Command::LoopTrack => CMD_LOOP_TRACK,
            Command::QueryStatus => CMD_QUERY_STATUS,
            Command::QueryVolume => CMD_QUERY_VOLUME,
            Command::QueryEq => CMD_QUERY_EQ,
            Command::QueryMode => CMD_QUERY_MODE,
            Command::QueryVersion => CMD_QUERY_VERSION,
            Command::QueryUsbFiles => CMD_QUERY_USB_FILES,
            Command::QuerySdFiles => CMD_QUERY_SD_FILES,
            Command::QueryFlashFiles => CMD_QUERY_FLASH_FILES,
            Command::QueryCurrentFile => CMD_QUERY_CURRENT_FILE,
            Command::QueryFolderFiles => CMD_QUERY_FOLDER_FILES,
        }
    }

    /// Look up a command by its code.
    pub fn from_code(code: u8) -> Option<Command> {
        Command::ALL.into_iter().find(|cmd| cmd.code() == code)
    }

    /// Number of meaningful data bytes.
    pub fn arity(self) -> DataArity {
        match self {
            Command::PlayTrack | Command::PlayFolderTrack | Command::PlayAdvert => DataArity::Two,
            Command::SetVolume
            | Command::SetEq
            | Command::SetMedia
            | Command::LoopAll
            | Command::PlayFolder
            | Command::LoopFolder
            | Command::LoopTrack
            | Command::QueryFolderFiles => DataArity::One,
            _ => DataArity::None,
        }
    }

    /// Settle class used by the timing policy.
    pub fn settle_class(self) -> SettleClass {
        match self {
            Command::SetMedia => SettleClass::Media,
            Command::Reset => SettleClass::Reset,
            Command::QueryUsbFiles
            | Command::QuerySdFiles
            | Command::QueryFlashFiles
            | Command::QueryFolderFiles => SettleClass::Scan,
            Command::PlayTrack
            | Command::Resume
            | Command::PlayFolderTrack
            | Command::PlayFolder
            | Command::PlayAdvert
            | Command::StopAdvert
            | Command::Stop => SettleClass::Immediate,
            _ => SettleClass::Default,
        }
    }

    /// Whether the module answers this command with a response frame.
    pub fn is_query(self) -> bool {
        self.code() >= CMD_QUERY_STATUS
    }

    /// Short human-readable name, used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Command::Next => "next",
            Command::Previous => "previous",
            Command::PlayTrack => "play-track",
            Command::VolumeUp => "volume-up",
            Command::VolumeDown => "volume-down",
            Command::SetVolume => "set-volume",
            Command::SetEq => "set-eq",
            Command::SetMedia => "set-media",
            Command::Standby => "standby",
            Command::Wake => "wake",
            Command::Reset => "reset",
            Command::Resume => "resume",
            Command::Pause => "pause",
            Command::PlayFolderTrack => "play-folder-track",
            Command::LoopAll => "loop-all",
            Command::PlayFolder => "play-folder",
            Command::PlayAdvert => "play-advert",
            Command::StopAdvert => "stop-advert",
            Command::Stop => "stop",
            Command::LoopFolder => "loop-folder",
            Command::Random => "random",
            Command::LoopTrack => "loop-track",
            Command::QueryStatus => "query-status",
            Command::QueryVolume => "query-volume",
            Command::QueryEq => "query-eq",
            Command::QueryMode => "query-mode",
            Command::QueryVersion => "query-version",
            Command::QueryUsbFiles => "query-usb-files",
            Command::QuerySdFiles => "query-sd-files",
            Command::QueryFlashFiles => "query-flash-files",
            Command::QueryCurrentFile => "query-current-file",
            Command::QueryFolderFiles => "query-folder-files",
        }
    }
}

impl TryFrom<u8> for Command {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Command::from_code(code).ok_or(ProtocolError::UnknownCommand(code))
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> Self {
        cmd.code()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02X})", self.name(), self.code())
    }
}
