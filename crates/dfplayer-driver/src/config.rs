//! Driver configuration.

use std::path::Path;
use std::time::Duration;

use dfplayer_protocol::{EqPreset, MediaSource, TimingPolicy, Volume, DEFAULT_LATENCY_MS};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings applied when the driver is constructed.
///
/// Can be loaded from YAML; missing keys take their defaults:
///
/// ```yaml
/// media: sd
/// volume: 50
/// eq: normal
/// latency_ms: 100
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Media selected at startup.
    pub media: MediaSource,
    /// Initial volume in percent (clamped to 100).
    pub volume: Volume,
    /// Initial equalizer preset.
    pub eq: EqPreset,
    /// Settle delay for commands without a fixed one, in milliseconds.
    pub latency_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            media: MediaSource::SdCard,
            volume: Volume::from_percent(50),
            eq: EqPreset::Normal,
            latency_ms: DEFAULT_LATENCY_MS,
        }
    }
}

impl DriverConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Set the media selected at startup.
    pub fn with_media(mut self, media: MediaSource) -> Self {
        self.media = media;
        self
    }

    /// Set the initial volume percent.
    pub fn with_volume(mut self, percent: u8) -> Self {
        self.volume = Volume::from_percent(percent);
        self
    }

    /// Set the startup equalizer preset; unknown codes select `Normal`.
    pub fn with_eq(mut self, eq: impl Into<EqPreset>) -> Self {
        self.eq = eq.into();
        self
    }

    /// Set the default settle delay.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Default settle delay.
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Timing policy built from this configuration.
    pub fn timing(&self) -> TimingPolicy {
        TimingPolicy::new(self.latency())
    }
}
