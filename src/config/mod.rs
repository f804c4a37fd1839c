// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for TONELINE.
//!
//! This module provides the runtime settings file: engine parameters
//! (timeline length, tick rate) and audio output parameters. Session
//! content (tracks and blocks) is in-memory only and never persisted.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::audio::AudioConfig;

/// Root settings file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SettingsFile {
    /// Engine settings
    #[serde(default)]
    pub engine: EngineSettings,
    /// Audio output settings
    #[serde(default)]
    pub audio: AudioSettings,
}

impl SettingsFile {
    /// Load settings from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read settings file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML settings")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize settings to YAML")
    }

    /// Save settings to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write settings file: {:?}", path.as_ref()))
    }

    /// Check ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.engine.timeline_duration <= 0.0 {
            anyhow::bail!("timeline_duration must be positive");
        }
        if self.engine.tick_rate_hz == 0 {
            anyhow::bail!("tick_rate_hz must be at least 1");
        }
        if self.audio.channels == 0 {
            anyhow::bail!("channels must be at least 1");
        }
        Ok(())
    }
}

/// Engine-level settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineSettings {
    /// Timeline length in seconds
    #[serde(default = "default_timeline_duration")]
    pub timeline_duration: f64,
    /// Frame tick rate in Hz (the display-refresh stand-in)
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: u32,
}

fn default_timeline_duration() -> f64 {
    60.0
}
fn default_tick_rate() -> u32 {
    60
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            timeline_duration: default_timeline_duration(),
            tick_rate_hz: default_tick_rate(),
        }
    }
}

/// Audio output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioSettings {
    /// Sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Buffer size in frames
    #[serde(default = "default_buffer_size")]
    pub buffer_size: u32,
    /// Number of output channels
    #[serde(default = "default_channels")]
    pub channels: u16,
    /// Master gain (0.0 - 1.0)
    #[serde(default = "default_master_gain")]
    pub master_gain: f32,
}

fn default_sample_rate() -> u32 {
    44100
}
fn default_buffer_size() -> u32 {
    512
}
fn default_channels() -> u16 {
    2
}
fn default_master_gain() -> f32 {
    0.5
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            buffer_size: default_buffer_size(),
            channels: default_channels(),
            master_gain: default_master_gain(),
        }
    }
}

impl AudioSettings {
    /// Build the output stream configuration
    pub fn to_audio_config(&self) -> AudioConfig {
        AudioConfig {
            sample_rate: self.sample_rate,
            buffer_size: self.buffer_size,
            channels: self.channels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settings() {
        let yaml = r#"
engine:
  timeline_duration: 120
  tick_rate_hz: 30

audio:
  sample_rate: 48000
  buffer_size: 256
  master_gain: 0.8
"#;

        let settings = SettingsFile::from_yaml(yaml).unwrap();
        assert_eq!(settings.engine.timeline_duration, 120.0);
        assert_eq!(settings.engine.tick_rate_hz, 30);
        assert_eq!(settings.audio.sample_rate, 48000);
        assert_eq!(settings.audio.buffer_size, 256);
        assert_eq!(settings.audio.channels, 2); // defaulted
        assert!((settings.audio.master_gain - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_default_values() {
        let yaml = "engine: {}\n";

        let settings = SettingsFile::from_yaml(yaml).unwrap();
        assert_eq!(settings.engine.timeline_duration, 60.0);
        assert_eq!(settings.engine.tick_rate_hz, 60);
        assert_eq!(settings.audio.sample_rate, 44100);
        assert_eq!(settings.audio.buffer_size, 512);
    }

    #[test]
    fn test_round_trip() {
        let original = SettingsFile {
            engine: EngineSettings {
                timeline_duration: 90.0,
                tick_rate_hz: 120,
            },
            audio: AudioSettings {
                sample_rate: 48000,
                buffer_size: 1024,
                channels: 1,
                master_gain: 0.3,
            },
        };

        let yaml = original.to_yaml().unwrap();
        let parsed = SettingsFile::from_yaml(&yaml).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let mut settings = SettingsFile::default();
        assert!(settings.validate().is_ok());

        settings.engine.timeline_duration = 0.0;
        assert!(settings.validate().is_err());

        settings.engine.timeline_duration = 60.0;
        settings.engine.tick_rate_hz = 0;
        assert!(settings.validate().is_err());

        settings.engine.tick_rate_hz = 60;
        settings.audio.channels = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_and_save_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");

        let settings = SettingsFile::default();
        settings.save(&path).unwrap();

        let loaded = SettingsFile::load(&path).unwrap();
        assert_eq!(settings, loaded);
    }

    #[test]
    fn test_load_missing_file_fails_with_context() {
        let err = SettingsFile::load("/nonexistent/settings.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read settings file"));
    }

    #[test]
    fn test_to_audio_config() {
        let settings = AudioSettings::default();
        let config = settings.to_audio_config();
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.buffer_size, 512);
        assert_eq!(config.channels, 2);
    }
}
