// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Track representation for the timeline.
//!
//! A track is a named lane grouping zero or more blocks and carrying
//! the defaults applied to blocks created on it.

use super::block::{Waveform, MAX_FREQUENCY, MIN_FREQUENCY};

/// Unique identifier for tracks
pub type TrackId = u64;

/// A named timeline lane
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Unique identifier, assigned by the store and never reused
    pub id: TrackId,
    /// Track name
    pub name: String,
    /// Frequency assigned to newly added blocks (Hz)
    pub default_frequency: f32,
    /// Waveform assigned to newly added blocks
    pub default_waveform: Waveform,
}

impl Track {
    /// Create a new track with the given defaults.
    /// The default frequency is clamped to the audible range.
    pub fn new(
        id: TrackId,
        name: impl Into<String>,
        default_frequency: f32,
        default_waveform: Waveform,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            default_frequency: default_frequency.clamp(MIN_FREQUENCY, MAX_FREQUENCY),
            default_waveform,
        }
    }
}
