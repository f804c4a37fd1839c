// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playback engine: the coordination facade.
//!
//! Owns the clock, the block store, the reconciler, and the tone
//! adapter, and routes every user intent through one place. Mutations
//! made while playing reconcile synchronously so edits are heard
//! immediately instead of on the next frame tick.

use std::time::Instant;

use tracing::{debug, warn};

use crate::audio::{ToneAdapter, ToneBackend};
use crate::timeline::block::{MAX_FREQUENCY, MIN_DURATION, MIN_FREQUENCY};
use crate::timeline::{Block, BlockId, BlockStore, BlockUpdate, Track, TrackId, Waveform};
use crate::timing::TransportClock;

use super::reconciler::{Reconciler, ToneCommand};

/// The playback and editing engine.
///
/// Single-threaded: all commands and the frame tick run from one
/// driver loop; the only cross-thread boundary is inside the audio
/// backend. Dropping the engine tears down playback in order (voices
/// first, output mix last).
pub struct PlaybackEngine {
    clock: TransportClock,
    store: BlockStore,
    reconciler: Reconciler,
    /// None when the tone backend failed to initialize; timeline and
    /// transport stay functional, sound dispatch becomes a no-op.
    adapter: Option<ToneAdapter>,
    /// At most one selected block; suppresses click-seek routing
    selected: Option<BlockId>,
    /// Origin of the driver timebase
    epoch: Instant,
}

impl PlaybackEngine {
    /// Create an engine with a tone backend
    pub fn new(timeline_duration: f64, backend: Box<dyn ToneBackend>) -> Self {
        Self::build(timeline_duration, Some(ToneAdapter::new(backend)))
    }

    /// Create an engine without sound.
    ///
    /// Used when the tone backend is unavailable (no device, denied
    /// permission). Logged once here; playback commands still run the
    /// clock but dispatch nothing.
    pub fn without_audio(timeline_duration: f64) -> Self {
        warn!("Tone backend unavailable, running silent");
        Self::build(timeline_duration, None)
    }

    fn build(timeline_duration: f64, adapter: Option<ToneAdapter>) -> Self {
        Self {
            clock: TransportClock::new(timeline_duration),
            store: BlockStore::new(),
            reconciler: Reconciler::new(),
            adapter,
            selected: None,
            epoch: Instant::now(),
        }
    }

    /// Seconds elapsed on the driver timebase
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    // ---- Queries ----

    /// Get the playhead position in seconds
    pub fn current_time(&self) -> f64 {
        self.clock.current_time()
    }

    /// Check if the transport is playing
    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    /// Get the timeline length in seconds
    pub fn timeline_duration(&self) -> f64 {
        self.clock.timeline_duration()
    }

    /// Get all blocks, sorted by start time
    pub fn blocks(&self) -> &[Block] {
        self.store.blocks()
    }

    /// Get a block by id
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.store.block(id)
    }

    /// Get all tracks
    pub fn tracks(&self) -> &[Track] {
        self.store.tracks()
    }

    /// Get the ids of the blocks currently sounding, sorted
    pub fn active_block_ids(&self) -> Vec<BlockId> {
        self.reconciler.sounding_ids()
    }

    /// Get the selected block id, if any
    pub fn selected_block(&self) -> Option<BlockId> {
        self.selected
    }

    /// Check whether a tone backend is attached
    pub fn audio_available(&self) -> bool {
        self.adapter.is_some()
    }

    // ---- Transport ----

    /// Start playback from the current position
    pub fn play(&mut self) {
        if self.clock.is_playing() {
            return;
        }
        debug!(position = self.clock.current_time(), "Transport play");
        self.clock.start(self.now());
        self.reconcile_now();
    }

    /// Pause playback, keeping the playhead position
    pub fn pause(&mut self) {
        if !self.clock.is_playing() {
            return;
        }
        debug!(position = self.clock.current_time(), "Transport pause");
        self.clock.stop();
        self.silence_all();
    }

    /// Stop playback and rewind to the timeline origin
    pub fn stop(&mut self) {
        debug!("Transport stop");
        self.clock.stop();
        self.clock.seek(0.0, self.now());
        self.silence_all();
    }

    /// Jump the playhead.
    ///
    /// Suppressed while a block is selected: a click on the timeline
    /// with a selection routes to deselection, not seeking.
    pub fn seek(&mut self, target: f64) {
        if self.selected.is_some() {
            debug!(time = target, "Seek suppressed while a block is selected");
            return;
        }
        self.clock.seek(target, self.now());
        self.reconcile_after_edit();
    }

    /// Frame-driver entry point: advance the clock and reconcile.
    ///
    /// A tick while stopped is a no-op, so a frame callback that fires
    /// after stop cannot restart sound.
    pub fn tick(&mut self) {
        if !self.clock.is_playing() {
            return;
        }
        let auto_stopped = self.clock.tick(self.now());
        if auto_stopped {
            debug!("Timeline end reached, auto-stop");
            self.silence_all();
        } else {
            self.reconcile_now();
        }
    }

    // ---- Edits ----

    /// Add a track and return its id
    pub fn add_track(
        &mut self,
        name: impl Into<String>,
        default_frequency: f32,
        default_waveform: Waveform,
    ) -> TrackId {
        self.store
            .add_track(name, default_frequency, default_waveform)
    }

    /// Remove a track and every block on it.
    ///
    /// Blocks removed by the cascade have their voices stopped
    /// unconditionally, like an explicit delete.
    pub fn remove_track(&mut self, id: TrackId) {
        let removed = self.store.remove_track(id);
        for block in removed {
            self.stop_deleted(block);
        }
        self.reconcile_after_edit();
    }

    /// Add a block on a track at the given time, with the track's
    /// defaults. No-op returning `None` when the track is absent.
    pub fn add_block(&mut self, track_id: TrackId, at_time: f64) -> Option<BlockId> {
        let id = self.store.add_block(track_id, at_time)?;
        self.reconcile_after_edit();
        Some(id)
    }

    /// Delete a block.
    ///
    /// If the block is sounding, its voice is stopped immediately and
    /// unconditionally, bypassing the normal diff: the block no longer
    /// exists to be queried, so the diff alone could not see it.
    pub fn delete_block(&mut self, id: BlockId) {
        if self.store.remove(id).is_none() {
            return;
        }
        self.stop_deleted(id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.reconcile_after_edit();
    }

    /// Move a block to a new start time (clamped to the timeline origin)
    pub fn move_block(&mut self, id: BlockId, new_start_time: f64) {
        self.store.update(
            id,
            BlockUpdate {
                start_time: Some(new_start_time.max(0.0)),
                ..Default::default()
            },
        );
        self.reconcile_after_edit();
    }

    /// Resize a block (clamped to the minimum duration)
    pub fn resize_block(&mut self, id: BlockId, new_duration: f64) {
        self.store.update(
            id,
            BlockUpdate {
                duration: Some(new_duration.max(MIN_DURATION)),
                ..Default::default()
            },
        );
        self.reconcile_after_edit();
    }

    /// Set a block's frequency (clamped to the audible range)
    pub fn set_frequency(&mut self, id: BlockId, frequency: f32) {
        self.store.update(
            id,
            BlockUpdate {
                frequency: Some(frequency.clamp(MIN_FREQUENCY, MAX_FREQUENCY)),
                ..Default::default()
            },
        );
        self.reconcile_after_edit();
    }

    /// Set a block's waveform
    pub fn set_waveform(&mut self, id: BlockId, waveform: Waveform) {
        self.store.update(
            id,
            BlockUpdate {
                waveform: Some(waveform),
                ..Default::default()
            },
        );
        self.reconcile_after_edit();
    }

    /// Select a block, or clear the selection with `None`.
    /// Selecting an unknown id clears the selection.
    pub fn select(&mut self, id: Option<BlockId>) {
        self.selected = id.filter(|&id| self.store.block(id).is_some());
    }

    // ---- Internal ----

    /// Unconditional stop for a block that no longer exists
    fn stop_deleted(&mut self, id: BlockId) {
        if self.reconciler.forget(id) {
            if let Some(adapter) = self.adapter.as_mut() {
                adapter.stop(id);
            }
        }
    }

    /// Reconcile after a mutation, but only while playing; edits made
    /// while stopped are picked up when playback starts.
    fn reconcile_after_edit(&mut self) {
        if self.clock.is_playing() {
            self.reconcile_now();
        }
    }

    /// Diff the active set at the current position and dispatch
    fn reconcile_now(&mut self) {
        let commands = self
            .reconciler
            .reconcile(&self.store, self.clock.current_time());
        self.dispatch(&commands);
    }

    /// Stop every sounding voice and clear the baseline
    fn silence_all(&mut self) {
        let commands = self.reconciler.drain();
        self.dispatch(&commands);
    }

    fn dispatch(&mut self, commands: &[ToneCommand]) {
        if commands.is_empty() {
            return;
        }
        if let Some(adapter) = self.adapter.as_mut() {
            adapter.apply(commands);
        }
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        // Baseline first, then the adapter's own ordered teardown
        self.reconciler.drain();
        if let Some(adapter) = self.adapter.as_mut() {
            adapter.shutdown();
        }
    }
}
