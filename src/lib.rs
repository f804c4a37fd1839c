// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! TONELINE - a multi-track tone sequencer engine.
//!
//! A timeline of oscillator blocks across named tracks, a transport
//! clock, an active-set reconciler that diffs the sounding set against
//! the timeline on every frame, and a tone backend that turns
//! start/stop/update instructions into live oscillator voices.

pub mod audio;
pub mod config;
pub mod playback;
pub mod timeline;
pub mod timing;

pub use audio::{AudioConfig, AudioError, SynthBackend, ToneAdapter, ToneBackend, ToneId};
pub use config::{AudioSettings, EngineSettings, SettingsFile};
pub use playback::{PlaybackEngine, Reconciler, ToneCommand};
pub use timeline::{Block, BlockId, BlockStore, BlockUpdate, Track, TrackId, Waveform};
pub use timing::{ClockState, TransportClock};
