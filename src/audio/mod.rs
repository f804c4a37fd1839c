// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Audio engine for the TONELINE sequencer.
//!
//! This module provides:
//! - The tone backend seam (one live oscillator voice per active block)
//! - The adapter enforcing the at-most-one-voice-per-block invariant
//! - A software oscillator bank rendered via cpal

pub mod adapter;
pub mod output;
pub mod synth;

pub use adapter::ToneAdapter;
pub use output::{AudioConfig, AudioOutput};
pub use synth::{SynthBackend, VoiceBank};

use thiserror::Error;

use crate::timeline::Waveform;

/// Identifier for a live tone voice inside a backend.
///
/// Ids are assigned per start and never reused: a stopped voice cannot
/// be restarted, a fresh one must be created.
pub type ToneId = u64;

/// Audio error types
#[derive(Debug, Clone, Error)]
pub enum AudioError {
    /// Failed to initialize audio
    #[error("Audio initialization failed: {0}")]
    InitFailed(String),
    /// Failed to start audio stream
    #[error("Audio stream failed: {0}")]
    StreamFailed(String),
    /// Failed to acquire the voice bank lock
    #[error("Failed to acquire audio lock")]
    LockFailed,
    /// No audio device available
    #[error("No audio device available")]
    NoDevice,
    /// Invalid configuration
    #[error("Invalid audio configuration: {0}")]
    InvalidConfig(String),
    /// Backend has been shut down
    #[error("Audio backend unavailable")]
    Unavailable,
}

/// Tone generation capability consumed by the adapter.
///
/// A backend owns a shared output mix and a set of live voices. `stop`
/// is irreversible for a given id. `shutdown` must stop every live
/// voice before releasing the output resource; dropping a backend does
/// the same.
pub trait ToneBackend: Send {
    /// Create a voice at the given frequency and waveform and start it
    /// sounding immediately. Returns the id of the new voice.
    fn start_tone(&mut self, frequency: f32, waveform: Waveform) -> Result<ToneId, AudioError>;

    /// Stop and release a voice. No-op if the id is unknown.
    fn stop_tone(&mut self, id: ToneId);

    /// Retune a live voice. No-op if the id is unknown. Applies
    /// immediately with no fade.
    fn set_frequency(&mut self, id: ToneId, frequency: f32);

    /// Reshape a live voice. No-op if the id is unknown. Applies
    /// immediately with no fade.
    fn set_waveform(&mut self, id: ToneId, waveform: Waveform);

    /// Number of live voices
    fn voice_count(&self) -> usize;

    /// Stop all voices, then release the output mix resource.
    /// Idempotent.
    fn shutdown(&mut self);
}
