//! Value types carried in command and response data bytes.

use std::fmt;
use std::str::FromStr;

use crate::commands::Command;
use crate::constants::*;
use crate::error::ProtocolError;

/// Playback media of the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MediaSource {
    /// USB mass storage.
    #[cfg_attr(feature = "serde", serde(rename = "usb", alias = "usb-disk"))]
    UsbDisk,
    /// Micro SD card.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "sd", alias = "sd-card"))]
    SdCard,
    /// Analog auxiliary input.
    Aux,
    /// Sleep (no media).
    Sleep,
    /// On-board flash.
    Flash,
}

impl MediaSource {
    /// Every media source.
    pub const ALL: [MediaSource; 5] = [
        MediaSource::UsbDisk,
        MediaSource::SdCard,
        MediaSource::Aux,
        MediaSource::Sleep,
        MediaSource::Flash,
    ];

    /// Code sent as data with `SetMedia`.
    pub fn code(self) -> u8 {
        match self {
            MediaSource::UsbDisk => MEDIA_USB_DISK,
            MediaSource::SdCard => MEDIA_SD_CARD,
            MediaSource::Aux => MEDIA_AUX,
            MediaSource::Sleep => MEDIA_SLEEP,
            MediaSource::Flash => MEDIA_FLASH,
        }
    }

    /// Query that counts the files on this media, if the media holds files.
    pub fn file_count_query(self) -> Option<Command> {
        match self {
            MediaSource::UsbDisk => Some(Command::QueryUsbFiles),
            MediaSource::SdCard => Some(Command::QuerySdFiles),
            MediaSource::Flash => Some(Command::QueryFlashFiles),
            MediaSource::Aux | MediaSource::Sleep => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            MediaSource::UsbDisk => "usb",
            MediaSource::SdCard => "sd",
            MediaSource::Aux => "aux",
            MediaSource::Sleep => "sleep",
            MediaSource::Flash => "flash",
        }
    }
}

impl TryFrom<u8> for MediaSource {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        MediaSource::ALL
            .into_iter()
            .find(|m| m.code() == code)
            .ok_or(ProtocolError::UnknownMediaSource(code))
    }
}

impl FromStr for MediaSource {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "usb" | "usb-disk" | "udisk" => Ok(MediaSource::UsbDisk),
            "sd" | "sd-card" | "sdcard" => Ok(MediaSource::SdCard),
            "aux" => Ok(MediaSource::Aux),
            "sleep" => Ok(MediaSource::Sleep),
            "flash" => Ok(MediaSource::Flash),
            _ => Err(ProtocolError::UnknownName {
                kind: "media source",
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Equalizer preset.
///
/// Conversion from an integer never fails: codes outside 0-5 fall back to
/// [`EqPreset::Normal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EqPreset {
    #[default]
    Normal,
    Pop,
    Rock,
    Jazz,
    Classic,
    Bass,
}

impl EqPreset {
    /// Every preset, in code order.
    pub const ALL: [EqPreset; 6] = [
        EqPreset::Normal,
        EqPreset::Pop,
        EqPreset::Rock,
        EqPreset::Jazz,
        EqPreset::Classic,
        EqPreset::Bass,
    ];

    /// Code sent as data with `SetEq`.
    pub fn code(self) -> u8 {
        match self {
            EqPreset::Normal => EQ_NORMAL,
            EqPreset::Pop => EQ_POP,
            EqPreset::Rock => EQ_ROCK,
            EqPreset::Jazz => EQ_JAZZ,
            EqPreset::Classic => EQ_CLASSIC,
            EqPreset::Bass => EQ_BASS,
        }
    }

    /// Preset for a code, normalizing unknown codes to `Normal`.
    pub fn from_code(code: i32) -> EqPreset {
        EqPreset::ALL
            .into_iter()
            .find(|eq| i32::from(eq.code()) == code)
            .unwrap_or_default()
    }

    fn name(self) -> &'static str {
        match self {
            EqPreset::Normal => "normal",
            EqPreset::Pop => "pop",
            EqPreset::Rock => "rock",
            EqPreset::Jazz => "jazz",
            EqPreset::Classic => "classic",
            EqPreset::Bass => "bass",
        }
    }
}

impl From<u8> for EqPreset {
    fn from(code: u8) -> Self {
        EqPreset::from_code(i32::from(code))
    }
}

impl From<u16> for EqPreset {
    fn from(code: u16) -> Self {
        EqPreset::from_code(i32::from(code))
    }
}

impl From<i32> for EqPreset {
    fn from(code: i32) -> Self {
        EqPreset::from_code(code)
    }
}

impl From<EqPreset> for u8 {
    fn from(eq: EqPreset) -> Self {
        eq.code()
    }
}

impl FromStr for EqPreset {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        EqPreset::ALL
            .into_iter()
            .find(|eq| eq.name() == lower)
            .ok_or_else(|| ProtocolError::UnknownName {
                kind: "equalizer preset",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for EqPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Volume as a percentage of the module's maximum.
///
/// The module works in 31 steps (0-30). Percentages are clamped to 0-100 and
/// mapped linearly, truncating in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "u8", into = "u8"))]
pub struct Volume(u8);

impl Volume {
    /// Create from a percentage, clamping to 100.
    pub fn from_percent(percent: u8) -> Self {
        Volume(percent.min(MAX_VOLUME_PERCENT))
    }

    /// Create from a device step as reported by the module.
    ///
    /// Steps above 30 read as 100 %.
    pub fn from_device(step: u16) -> Self {
        let percent = u32::from(step) * u32::from(MAX_VOLUME_PERCENT) / u32::from(MAX_VOLUME);
        Volume(percent.min(u32::from(MAX_VOLUME_PERCENT)) as u8)
    }

    /// Percentage, 0-100.
    pub fn percent(self) -> u8 {
        self.0
    }

    /// Device step, 0-30.
    pub fn device_step(self) -> u8 {
        (u16::from(self.0) * u16::from(MAX_VOLUME) / u16::from(MAX_VOLUME_PERCENT)) as u8
    }
}

impl From<u8> for Volume {
    fn from(percent: u8) -> Self {
        Volume::from_percent(percent)
    }
}

impl From<i32> for Volume {
    fn from(percent: i32) -> Self {
        Volume(percent.clamp(0, i32::from(MAX_VOLUME_PERCENT)) as u8)
    }
}

impl From<Volume> for u8 {
    fn from(volume: Volume) -> Self {
        volume.percent()
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Playback status reported by `QueryStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Stopped,
    Playing,
    Paused,
    /// Any other value (some firmware revisions report media in the high byte).
    Other(u16),
}

impl From<u16> for PlaybackStatus {
    fn from(value: u16) -> Self {
        match value {
            STATUS_STOPPED => PlaybackStatus::Stopped,
            STATUS_PLAYING => PlaybackStatus::Playing,
            STATUS_PAUSED => PlaybackStatus::Paused,
            _ => PlaybackStatus::Other(value),
        }
    }
}

impl From<PlaybackStatus> for u16 {
    fn from(status: PlaybackStatus) -> Self {
        match status {
            PlaybackStatus::Stopped => STATUS_STOPPED,
            PlaybackStatus::Playing => STATUS_PLAYING,
            PlaybackStatus::Paused => STATUS_PAUSED,
            PlaybackStatus::Other(v) => v,
        }
    }
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackStatus::Stopped => write!(f, "stopped"),
            PlaybackStatus::Playing => write!(f, "playing"),
            PlaybackStatus::Paused => write!(f, "paused"),
            PlaybackStatus::Other(v) => write!(f, "unknown (0x{:04X})", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_clamps() {
        assert_eq!(Volume::from_percent(150), Volume::from_percent(100));
        assert_eq!(Volume::from_percent(255).device_step(), 30);
        assert_eq!(Volume::from(-7), Volume::from_percent(0));
        assert_eq!(Volume::from(40_000), Volume::from_percent(100));
        assert_eq!(Volume::from(64i32).percent(), 64);
    }

    #[test]
    fn test_volume_to_device() {
        assert_eq!(Volume::from_percent(0).device_step(), 0);
        assert_eq!(Volume::from_percent(1).device_step(), 0);
        assert_eq!(Volume::from_percent(4).device_step(), 1);
        assert_eq!(Volume::from_percent(50).device_step(), 15);
        assert_eq!(Volume::from_percent(99).device_step(), 29);
        assert_eq!(Volume::from_percent(100).device_step(), 30);
    }

    #[test]
    fn test_volume_from_device() {
        assert_eq!(Volume::from_device(0).percent(), 0);
        assert_eq!(Volume::from_device(1).percent(), 3);
        assert_eq!(Volume::from_device(15).percent(), 50);
        assert_eq!(Volume::from_device(29).percent(), 96);
        assert_eq!(Volume::from_device(30).percent(), 100);
        assert_eq!(Volume::from_device(31).percent(), 100);
        assert_eq!(Volume::from_device(u16::MAX).percent(), 100);
    }

    #[test]
    fn test_eq_normalizes_out_of_range() {
        assert_eq!(EqPreset::from(9u8), EqPreset::Normal);
        assert_eq!(EqPreset::from(-1i32), EqPreset::Normal);
        assert_eq!(EqPreset::from(6u16), EqPreset::Normal);
        assert_eq!(EqPreset::from(5u8), EqPreset::Bass);
        assert_eq!(EqPreset::from(2u8), EqPreset::Rock);
    }

    #[test]
    fn test_eq_parse() {
        assert_eq!("Jazz".parse::<EqPreset>(), Ok(EqPreset::Jazz));
        assert!("loud".parse::<EqPreset>().is_err());
        assert_eq!(EqPreset::Classic.to_string(), "classic");
    }

    #[test]
    fn test_media_codes() {
        for media in MediaSource::ALL {
            assert_eq!(MediaSource::try_from(media.code()), Ok(media));
            assert_eq!(media.to_string().parse::<MediaSource>(), Ok(media));
        }
        assert_eq!(
            MediaSource::try_from(0),
            Err(ProtocolError::UnknownMediaSource(0))
        );
    }

    #[test]
    fn test_media_file_count_query() {
        assert_eq!(MediaSource::UsbDisk.file_count_query(), Some(Command::QueryUsbFiles));
        assert_eq!(MediaSource::SdCard.file_count_query(), Some(Command::QuerySdFiles));
        assert_eq!(MediaSource::Flash.file_count_query(), Some(Command::QueryFlashFiles));
        assert_eq!(MediaSource::Aux.file_count_query(), None);
        assert_eq!(MediaSource::Sleep.file_count_query(), None);
    }

    #[test]
    fn test_playback_status() {
        assert_eq!(PlaybackStatus::from(0x0201), PlaybackStatus::Playing);
        assert_eq!(PlaybackStatus::from(0x0512), PlaybackStatus::Other(0x0512));
        assert_eq!(u16::from(PlaybackStatus::Paused), 0x0202);
    }
}
