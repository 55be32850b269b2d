//! Protocol constants
//!
//! Frame markers, command codes and value ranges used by the DFPlayer
//! serial protocol.

// ============================================================================
// Frame Layout
// ============================================================================

/// First byte of every frame.
pub const FRAME_START: u8 = 0x7E;
/// Protocol version byte.
pub const FRAME_VERSION: u8 = 0xFF;
/// Length byte (counts version through data, excluding checksum).
pub const FRAME_LENGTH: u8 = 0x06;
/// Last byte of every frame.
pub const FRAME_END: u8 = 0xEF;

/// Size of a host → module command frame (no checksum).
pub const COMMAND_FRAME_SIZE: usize = 8;
/// Size of a module → host response frame (with checksum).
pub const RESPONSE_FRAME_SIZE: usize = 10;

/// Feedback flag sent with every command. Acknowledgements are never requested.
pub const FEEDBACK_OFF: u8 = 0x00;

// ============================================================================
// Command Codes: playback
// ============================================================================

/// Play next track.
pub const CMD_NEXT: u8 = 0x01;
/// Play previous track.
pub const CMD_PREVIOUS: u8 = 0x02;
/// Play track by global index.
pub const CMD_PLAY_TRACK: u8 = 0x03;
/// Step volume up.
pub const CMD_VOLUME_UP: u8 = 0x04;
/// Step volume down.
pub const CMD_VOLUME_DOWN: u8 = 0x05;
/// Set volume (0-30).
pub const CMD_SET_VOLUME: u8 = 0x06;
/// Set equalizer preset.
pub const CMD_SET_EQ: u8 = 0x07;
/// Select playback media.
pub const CMD_SET_MEDIA: u8 = 0x09;
/// Enter standby.
pub const CMD_STANDBY: u8 = 0x0A;
/// Leave standby.
pub const CMD_WAKE: u8 = 0x0B;
/// Reset the module.
pub const CMD_RESET: u8 = 0x0C;
/// Resume playback.
pub const CMD_RESUME: u8 = 0x0D;
/// Pause playback.
pub const CMD_PAUSE: u8 = 0x0E;
/// Play track within folder.
pub const CMD_PLAY_FOLDER_TRACK: u8 = 0x0F;
/// Loop all tracks on the media.
pub const CMD_LOOP_ALL: u8 = 0x11;
/// Play from folder.
pub const CMD_PLAY_FOLDER: u8 = 0x12;
/// Interrupt with an advert track.
pub const CMD_PLAY_ADVERT: u8 = 0x13;
/// Stop advert and resume.
pub const CMD_STOP_ADVERT: u8 = 0x15;
/// Stop playback.
pub const CMD_STOP: u8 = 0x16;
/// Loop all tracks in a folder.
pub const CMD_LOOP_FOLDER: u8 = 0x17;
/// Shuffle play.
pub const CMD_RANDOM: u8 = 0x18;
/// Loop the current track.
pub const CMD_LOOP_TRACK: u8 = 0x19;

// ============================================================================
// Command Codes: queries
// ============================================================================

/// Query playback status.
pub const CMD_QUERY_STATUS: u8 = 0x42;
/// Query volume.
pub const CMD_QUERY_VOLUME: u8 = 0x43;
/// Query equalizer preset.
pub const CMD_QUERY_EQ: u8 = 0x44;
/// Query playback mode.
pub const CMD_QUERY_MODE: u8 = 0x45;
/// Query firmware version.
pub const CMD_QUERY_VERSION: u8 = 0x46;
/// Query number of files on USB disk.
pub const CMD_QUERY_USB_FILES: u8 = 0x47;
/// Query number of files on SD card.
pub const CMD_QUERY_SD_FILES: u8 = 0x48;
/// Query number of files in flash.
pub const CMD_QUERY_FLASH_FILES: u8 = 0x49;
/// Query current file index.
pub const CMD_QUERY_CURRENT_FILE: u8 = 0x4C;
/// Query number of files in a folder.
pub const CMD_QUERY_FOLDER_FILES: u8 = 0x4E;

// ============================================================================
// Values
// ============================================================================

/// Highest device volume step.
pub const MAX_VOLUME: u8 = 30;
/// Highest volume percent accepted by the API.
pub const MAX_VOLUME_PERCENT: u8 = 100;

/// First valid advert track.
pub const MIN_ADVERT_TRACK: u16 = 1;
/// Last valid advert track.
pub const MAX_ADVERT_TRACK: u16 = 9999;

/// Media source codes.
pub const MEDIA_USB_DISK: u8 = 1;
pub const MEDIA_SD_CARD: u8 = 2;
pub const MEDIA_AUX: u8 = 3;
pub const MEDIA_SLEEP: u8 = 4;
pub const MEDIA_FLASH: u8 = 5;

/// Equalizer preset codes.
pub const EQ_NORMAL: u8 = 0;
pub const EQ_POP: u8 = 1;
pub const EQ_ROCK: u8 = 2;
pub const EQ_JAZZ: u8 = 3;
pub const EQ_CLASSIC: u8 = 4;
pub const EQ_BASS: u8 = 5;

/// Playback status values reported by `CMD_QUERY_STATUS`.
pub const STATUS_STOPPED: u16 = 0x0200;
pub const STATUS_PLAYING: u16 = 0x0201;
pub const STATUS_PAUSED: u16 = 0x0202;

/// Settle delays in milliseconds.
pub const SETTLE_MEDIA_MS: u64 = 200;
pub const SETTLE_RESET_MS: u64 = 1000;
pub const SETTLE_SCAN_MS: u64 = 500;
pub const DEFAULT_LATENCY_MS: u64 = 100;
