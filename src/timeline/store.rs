// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Block store: the owned, immediately-consistent timeline collection.
//!
//! All mutations are explicit command methods; edits referencing a
//! missing id are silent no-ops since the UI may race deletes against
//! in-flight edits.

use super::block::{Block, BlockId, Waveform, DEFAULT_DURATION};
use super::track::{Track, TrackId};

/// Partial update applied atomically to one block.
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockUpdate {
    pub start_time: Option<f64>,
    pub duration: Option<f64>,
    pub frequency: Option<f32>,
    pub waveform: Option<Waveform>,
    pub track_id: Option<TrackId>,
}

/// Owned collection of tracks and blocks.
///
/// Ids are assigned monotonically and never reused. Blocks are kept
/// sorted by start time. Every operation is synchronous and leaves the
/// store immediately consistent.
#[derive(Debug, Default)]
pub struct BlockStore {
    tracks: Vec<Track>,
    blocks: Vec<Block>,
    next_track_id: TrackId,
    next_block_id: BlockId,
}

impl BlockStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            blocks: Vec::new(),
            next_track_id: 1,
            next_block_id: 1,
        }
    }

    /// Add a track and return its id
    pub fn add_track(
        &mut self,
        name: impl Into<String>,
        default_frequency: f32,
        default_waveform: Waveform,
    ) -> TrackId {
        let id = self.next_track_id;
        self.next_track_id += 1;
        self.tracks
            .push(Track::new(id, name, default_frequency, default_waveform));
        id
    }

    /// Get a track by id
    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Get all tracks
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Remove a track and cascade-remove its blocks.
    /// Returns the ids of the removed blocks, empty if the track was absent.
    pub fn remove_track(&mut self, id: TrackId) -> Vec<BlockId> {
        let Some(index) = self.tracks.iter().position(|t| t.id == id) else {
            return Vec::new();
        };
        self.tracks.remove(index);
        self.remove_by_track(id)
    }

    /// Add a block on a track at the given start time.
    ///
    /// The block takes the track's default frequency and waveform and
    /// the fixed default duration. Returns `None` (no-op) when the
    /// track does not exist.
    pub fn add_block(&mut self, track_id: TrackId, start_time: f64) -> Option<BlockId> {
        let track = self.track(track_id)?;
        let block = Block {
            id: self.next_block_id,
            track_id,
            start_time: start_time.max(0.0),
            duration: DEFAULT_DURATION,
            frequency: track.default_frequency,
            waveform: track.default_waveform,
        };
        self.next_block_id += 1;
        let id = block.id;
        self.insert_sorted(block);
        Some(id)
    }

    /// Replace the mutable fields of a block atomically.
    ///
    /// Returns `false` (silent no-op) when the id is absent.
    pub fn update(&mut self, id: BlockId, update: BlockUpdate) -> bool {
        let Some(index) = self.blocks.iter().position(|b| b.id == id) else {
            return false;
        };

        let block = &mut self.blocks[index];
        if let Some(start_time) = update.start_time {
            block.start_time = start_time;
        }
        if let Some(duration) = update.duration {
            block.duration = duration;
        }
        if let Some(frequency) = update.frequency {
            block.frequency = frequency;
        }
        if let Some(waveform) = update.waveform {
            block.waveform = waveform;
        }
        if let Some(track_id) = update.track_id {
            block.track_id = track_id;
        }

        if update.start_time.is_some() {
            let block = self.blocks.remove(index);
            self.insert_sorted(block);
        }
        true
    }

    /// Remove a block by id
    pub fn remove(&mut self, id: BlockId) -> Option<Block> {
        let index = self.blocks.iter().position(|b| b.id == id)?;
        Some(self.blocks.remove(index))
    }

    /// Remove every block on a track, returning the removed ids
    pub fn remove_by_track(&mut self, track_id: TrackId) -> Vec<BlockId> {
        let removed: Vec<BlockId> = self
            .blocks
            .iter()
            .filter(|b| b.track_id == track_id)
            .map(|b| b.id)
            .collect();
        self.blocks.retain(|b| b.track_id != track_id);
        removed
    }

    /// Get a block by id
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Get all blocks, sorted by start time
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Find the blocks whose interval contains the given time
    pub fn query_active(&self, time: f64) -> Vec<&Block> {
        self.blocks.iter().filter(|b| b.contains(time)).collect()
    }

    /// Get the number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the store has no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Insert keeping blocks sorted by start time
    fn insert_sorted(&mut self, block: Block) {
        let insert_pos = self
            .blocks
            .binary_search_by(|b| {
                b.start_time
                    .partial_cmp(&block.start_time)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or_else(|pos| pos);
        self.blocks.insert(insert_pos, block);
    }
}
