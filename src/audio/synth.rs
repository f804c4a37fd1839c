// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Software oscillator bank.
//!
//! Provides the tone generation backend: a bank of phase-accumulator
//! oscillator voices mixed into a shared output, rendered by the cpal
//! stream callback.

use std::sync::{Arc, Mutex};

use tracing::warn;

use super::output::{AudioConfig, AudioOutput};
use super::{AudioError, ToneBackend, ToneId};
use crate::timeline::Waveform;

/// Per-voice amplitude before the master gain
const VOICE_AMPLITUDE: f32 = 0.2;

/// A single oscillator voice
#[derive(Debug)]
struct Voice {
    id: ToneId,
    frequency: f32,
    waveform: Waveform,
    /// Normalized phase in [0, 1)
    phase: f64,
}

impl Voice {
    /// Render the next sample and advance the phase
    fn next_sample(&mut self, sample_rate: f64) -> f32 {
        let sample = self.waveform.sample(self.phase) * VOICE_AMPLITUDE;
        self.phase += self.frequency as f64 / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        sample
    }
}

/// Bank of live oscillator voices sharing one output mix.
///
/// Mutated from the engine thread and rendered from the audio callback
/// thread; both sides go through the same mutex.
#[derive(Debug)]
pub struct VoiceBank {
    voices: Vec<Voice>,
    /// Master gain applied to the mixed output (0.0 - 1.0)
    gain: f32,
    /// Sample rate for phase advancement
    sample_rate: f64,
}

impl VoiceBank {
    /// Create an empty bank
    pub fn new(sample_rate: f64, gain: f32) -> Self {
        Self {
            voices: Vec::new(),
            gain: gain.clamp(0.0, 1.0),
            sample_rate,
        }
    }

    /// Add a voice. The oscillator starts at phase zero.
    fn add(&mut self, id: ToneId, frequency: f32, waveform: Waveform) {
        self.voices.push(Voice {
            id,
            frequency,
            waveform,
            phase: 0.0,
        });
    }

    /// Remove a voice by id. Returns false if the id is unknown.
    fn remove(&mut self, id: ToneId) -> bool {
        let before = self.voices.len();
        self.voices.retain(|v| v.id != id);
        self.voices.len() != before
    }

    /// Retune a voice in place, preserving its phase
    fn set_frequency(&mut self, id: ToneId, frequency: f32) {
        if let Some(voice) = self.voices.iter_mut().find(|v| v.id == id) {
            voice.frequency = frequency;
        }
    }

    /// Reshape a voice in place, preserving its phase
    fn set_waveform(&mut self, id: ToneId, waveform: Waveform) {
        if let Some(voice) = self.voices.iter_mut().find(|v| v.id == id) {
            voice.waveform = waveform;
        }
    }

    /// Number of live voices
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    /// Check if the bank has no voices
    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Remove all voices
    fn clear(&mut self) {
        self.voices.clear();
    }

    /// Set master gain (0.0 - 1.0)
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
    }

    /// Get current gain
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Mix all voices into an interleaved buffer.
    ///
    /// The same mixed sample goes to every channel of a frame.
    pub fn render(&mut self, buffer: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }
        for frame in buffer.chunks_mut(channels) {
            let mut mixed = 0.0f32;
            for voice in self.voices.iter_mut() {
                mixed += voice.next_sample(self.sample_rate);
            }
            mixed *= self.gain;
            for sample in frame.iter_mut() {
                *sample = mixed;
            }
        }
    }
}

/// Tone backend rendering oscillator voices through cpal.
///
/// The output stream is created once at construction and released on
/// shutdown, after all voices have been cleared.
pub struct SynthBackend {
    bank: Arc<Mutex<VoiceBank>>,
    output: Option<AudioOutput>,
    next_id: ToneId,
}

impl SynthBackend {
    /// Create a backend and open the output stream
    pub fn new(config: AudioConfig, gain: f32) -> Result<Self, AudioError> {
        let bank = Arc::new(Mutex::new(VoiceBank::new(config.sample_rate as f64, gain)));

        let render_bank = Arc::clone(&bank);
        let output = AudioOutput::new(config, move |buffer, channels| {
            if let Ok(mut bank) = render_bank.lock() {
                bank.render(buffer, channels);
            }
        })?;

        Ok(Self {
            bank,
            output: Some(output),
            next_id: 1,
        })
    }

    /// Get the shared voice bank
    pub fn bank(&self) -> Arc<Mutex<VoiceBank>> {
        Arc::clone(&self.bank)
    }

    /// Get output latency in milliseconds, if the stream is open
    pub fn latency_ms(&self) -> Option<f64> {
        self.output.as_ref().map(|o| o.latency_ms())
    }
}

impl ToneBackend for SynthBackend {
    fn start_tone(&mut self, frequency: f32, waveform: Waveform) -> Result<ToneId, AudioError> {
        if self.output.is_none() {
            return Err(AudioError::Unavailable);
        }
        let mut bank = self.bank.lock().map_err(|_| AudioError::LockFailed)?;
        let id = self.next_id;
        self.next_id += 1;
        bank.add(id, frequency, waveform);
        Ok(id)
    }

    fn stop_tone(&mut self, id: ToneId) {
        if let Ok(mut bank) = self.bank.lock() {
            bank.remove(id);
        }
    }

    fn set_frequency(&mut self, id: ToneId, frequency: f32) {
        if let Ok(mut bank) = self.bank.lock() {
            bank.set_frequency(id, frequency);
        }
    }

    fn set_waveform(&mut self, id: ToneId, waveform: Waveform) {
        if let Ok(mut bank) = self.bank.lock() {
            bank.set_waveform(id, waveform);
        }
    }

    fn voice_count(&self) -> usize {
        self.bank.lock().map(|bank| bank.len()).unwrap_or(0)
    }

    fn shutdown(&mut self) {
        // Voices first, stream last
        match self.bank.lock() {
            Ok(mut bank) => bank.clear(),
            Err(_) => warn!("Voice bank lock poisoned during shutdown"),
        }
        self.output = None;
    }
}

impl Drop for SynthBackend {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_add_remove() {
        let mut bank = VoiceBank::new(44100.0, 0.5);
        assert!(bank.is_empty());

        bank.add(1, 440.0, Waveform::Sine);
        bank.add(2, 220.0, Waveform::Square);
        assert_eq!(bank.len(), 2);

        assert!(bank.remove(1));
        assert_eq!(bank.len(), 1);
        assert!(!bank.remove(1));
    }

    #[test]
    fn test_bank_gain_clamped() {
        let mut bank = VoiceBank::new(44100.0, 2.0);
        assert_eq!(bank.gain(), 1.0);

        bank.set_gain(-0.5);
        assert_eq!(bank.gain(), 0.0);

        bank.set_gain(0.8);
        assert!((bank.gain() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_render_empty_bank_is_silence() {
        let mut bank = VoiceBank::new(44100.0, 1.0);
        let mut buffer = vec![1.0f32; 64];

        bank.render(&mut buffer, 2);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_render_square_voice() {
        // A square wave at a quarter of the sample rate alternates
        // every other sample starting positive
        let mut bank = VoiceBank::new(4.0, 1.0);
        bank.add(1, 1.0, Waveform::Square);

        let mut buffer = vec![0.0f32; 4];
        bank.render(&mut buffer, 1);

        assert_eq!(buffer[0], VOICE_AMPLITUDE);
        assert_eq!(buffer[1], VOICE_AMPLITUDE);
        assert_eq!(buffer[2], -VOICE_AMPLITUDE);
        assert_eq!(buffer[3], -VOICE_AMPLITUDE);
    }

    #[test]
    fn test_render_mixes_voices() {
        let mut bank = VoiceBank::new(4.0, 1.0);
        bank.add(1, 1.0, Waveform::Square);
        bank.add(2, 1.0, Waveform::Square);

        let mut buffer = vec![0.0f32; 2];
        bank.render(&mut buffer, 1);
        assert!((buffer[0] - 2.0 * VOICE_AMPLITUDE).abs() < 1e-6);
    }

    #[test]
    fn test_render_interleaves_channels() {
        let mut bank = VoiceBank::new(4.0, 1.0);
        bank.add(1, 1.0, Waveform::Square);

        let mut buffer = vec![0.0f32; 4];
        bank.render(&mut buffer, 2);

        // Both channels of each frame carry the same sample
        assert_eq!(buffer[0], buffer[1]);
        assert_eq!(buffer[2], buffer[3]);
    }

    #[test]
    fn test_set_frequency_preserves_phase() {
        let mut bank = VoiceBank::new(8.0, 1.0);
        bank.add(1, 1.0, Waveform::Sawtooth);

        let mut buffer = vec![0.0f32; 2];
        bank.render(&mut buffer, 1);

        bank.set_frequency(1, 2.0);
        let phase = bank.voices[0].phase;
        assert!(phase > 0.0); // retune did not reset the oscillator
    }
}
