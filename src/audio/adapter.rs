// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Tone adapter: block ids to live backend voices.
//!
//! The adapter owns the backend and the block-to-voice map, and
//! guarantees at most one live voice per block id at any time.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::{ToneBackend, ToneId};
use crate::playback::ToneCommand;
use crate::timeline::{BlockId, Waveform};

/// Translates reconciliation instructions into backend calls, keyed by
/// block identity.
pub struct ToneAdapter {
    backend: Box<dyn ToneBackend>,
    /// Live voice per block. Invariant: at most one entry per block id.
    voices: HashMap<BlockId, ToneId>,
}

impl ToneAdapter {
    /// Create an adapter over a backend
    pub fn new(backend: Box<dyn ToneBackend>) -> Self {
        Self {
            backend,
            voices: HashMap::new(),
        }
    }

    /// Start a voice for a block.
    ///
    /// A block that already has a live voice is a logic bug upstream;
    /// it is logged and resolved by stopping the stale voice first, so
    /// the one-voice-per-block invariant holds even then.
    pub fn start(&mut self, block: BlockId, frequency: f32, waveform: Waveform) {
        if let Some(stale) = self.voices.remove(&block) {
            warn!(block, "Voice already live for block, restarting");
            self.backend.stop_tone(stale);
        }
        match self.backend.start_tone(frequency, waveform) {
            Ok(id) => {
                self.voices.insert(block, id);
            }
            Err(e) => warn!(block, "Failed to start voice: {}", e),
        }
    }

    /// Stop the voice for a block. No-op if the block has none.
    pub fn stop(&mut self, block: BlockId) {
        if let Some(id) = self.voices.remove(&block) {
            self.backend.stop_tone(id);
        }
    }

    /// Retune a block's live voice. No-op if the block has none.
    pub fn set_frequency(&mut self, block: BlockId, frequency: f32) {
        if let Some(&id) = self.voices.get(&block) {
            self.backend.set_frequency(id, frequency);
        }
    }

    /// Reshape a block's live voice. No-op if the block has none.
    pub fn set_waveform(&mut self, block: BlockId, waveform: Waveform) {
        if let Some(&id) = self.voices.get(&block) {
            self.backend.set_waveform(id, waveform);
        }
    }

    /// Apply one reconciliation batch in order
    pub fn apply(&mut self, commands: &[ToneCommand]) {
        for command in commands {
            match *command {
                ToneCommand::Stop { block } => self.stop(block),
                ToneCommand::SetFrequency { block, frequency } => {
                    self.set_frequency(block, frequency)
                }
                ToneCommand::SetWaveform { block, waveform } => {
                    self.set_waveform(block, waveform)
                }
                ToneCommand::Start {
                    block,
                    frequency,
                    waveform,
                } => self.start(block, frequency, waveform),
            }
        }
    }

    /// Check whether a block has a live voice
    pub fn has_voice(&self, block: BlockId) -> bool {
        self.voices.contains_key(&block)
    }

    /// Number of live voices
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Stop every live voice
    pub fn stop_all(&mut self) {
        for (_, id) in self.voices.drain() {
            self.backend.stop_tone(id);
        }
    }

    /// Tear down: stop all voices, then shut the backend down.
    /// The ordering is fixed here so callers cannot release the output
    /// mix while voices are still live.
    pub fn shutdown(&mut self) {
        debug!(voices = self.voices.len(), "Shutting down tone adapter");
        self.stop_all();
        self.backend.shutdown();
    }
}

impl Drop for ToneAdapter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
