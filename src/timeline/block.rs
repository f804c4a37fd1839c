// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Block representation for the timeline.
//!
//! A block is a time-bounded configuration of a single synthesized tone
//! within a track: start time, duration, frequency, and waveform.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for blocks
pub type BlockId = u64;

/// Lowest frequency accepted at the edit boundary (Hz)
pub const MIN_FREQUENCY: f32 = 20.0;

/// Highest frequency accepted at the edit boundary (Hz)
pub const MAX_FREQUENCY: f32 = 20_000.0;

/// Shortest duration a resize may produce (seconds)
pub const MIN_DURATION: f64 = 0.01;

/// Duration assigned to newly added blocks (seconds)
pub const DEFAULT_DURATION: f64 = 1.0;

/// Oscillator waveform shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

impl Waveform {
    /// Evaluate one sample of this waveform at a normalized phase in [0, 1)
    pub fn sample(&self, phase: f64) -> f32 {
        let value = match self {
            Waveform::Sine => (2.0 * std::f64::consts::PI * phase).sin(),
            Waveform::Triangle => {
                if phase < 0.5 {
                    4.0 * phase - 1.0
                } else {
                    3.0 - 4.0 * phase
                }
            }
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
        };
        value as f32
    }
}

impl Default for Waveform {
    fn default() -> Self {
        Waveform::Sine
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Waveform::Sine => "sine",
            Waveform::Triangle => "triangle",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
        };
        write!(f, "{}", name)
    }
}

/// A tone block on the timeline.
///
/// A block is audible whenever the playhead lies within its half-open
/// interval: `start_time <= t < start_time + duration`. Blocks on the
/// same track may overlap; each sounds independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    /// Unique identifier, assigned by the store and never reused
    pub id: BlockId,
    /// Owning track
    pub track_id: super::TrackId,
    /// Start position in seconds from the timeline origin
    pub start_time: f64,
    /// Length in seconds, always positive
    pub duration: f64,
    /// Oscillator frequency in Hz
    pub frequency: f32,
    /// Oscillator waveform shape
    pub waveform: Waveform,
}

impl Block {
    /// Get the end position of this block in seconds
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Check whether the playhead position falls inside this block.
    /// Inclusive at the start, exclusive at the end.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(start_time: f64, duration: f64) -> Block {
        Block {
            id: 1,
            track_id: 1,
            start_time,
            duration,
            frequency: 440.0,
            waveform: Waveform::Sine,
        }
    }

    #[test]
    fn test_end_time() {
        let b = block(2.0, 3.5);
        assert!((b.end_time() - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_contains_half_open() {
        let b = block(1.0, 2.0);

        assert!(b.contains(1.0)); // start is inclusive
        assert!(b.contains(2.0));
        assert!(b.contains(2.999));
        assert!(!b.contains(3.0)); // end is exclusive
        assert!(!b.contains(0.999));
    }

    #[test]
    fn test_waveform_sample_sine() {
        assert!(Waveform::Sine.sample(0.0).abs() < 1e-6);
        assert!((Waveform::Sine.sample(0.25) - 1.0).abs() < 1e-6);
        assert!((Waveform::Sine.sample(0.75) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_waveform_sample_square() {
        assert_eq!(Waveform::Square.sample(0.25), 1.0);
        assert_eq!(Waveform::Square.sample(0.75), -1.0);
    }

    #[test]
    fn test_waveform_sample_triangle() {
        assert!((Waveform::Triangle.sample(0.0) + 1.0).abs() < 1e-6);
        assert!((Waveform::Triangle.sample(0.25)).abs() < 1e-6);
        assert!((Waveform::Triangle.sample(0.5) - 1.0).abs() < 1e-6);
        assert!((Waveform::Triangle.sample(0.75)).abs() < 1e-6);
    }

    #[test]
    fn test_waveform_sample_sawtooth() {
        assert!((Waveform::Sawtooth.sample(0.0) + 1.0).abs() < 1e-6);
        assert!((Waveform::Sawtooth.sample(0.5)).abs() < 1e-6);
        assert!((Waveform::Sawtooth.sample(0.999) - 0.998).abs() < 1e-3);
    }

    #[test]
    fn test_waveform_display() {
        assert_eq!(Waveform::Sine.to_string(), "sine");
        assert_eq!(Waveform::Sawtooth.to_string(), "sawtooth");
    }
}
