// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Active-set reconciliation.
//!
//! On every tick (and on every edit while playing) the reconciler
//! recomputes which blocks should be sounding and diffs that against
//! the previously-sounding baseline, emitting stop, update, and start
//! instructions for the tone adapter.

use std::collections::HashMap;

use crate::timeline::{BlockId, BlockStore, Waveform};

/// Instruction for the tone adapter.
///
/// One reconciliation pass yields instructions in a fixed order: stops
/// first, then in-place updates, then starts. Stopping before starting
/// releases voices before new ones are acquired, so the number of live
/// voices never exceeds the true active-set size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToneCommand {
    /// Release the voice for a block that left the active set
    Stop { block: BlockId },
    /// Retune a still-active block's voice in place
    SetFrequency { block: BlockId, frequency: f32 },
    /// Reshape a still-active block's voice in place
    SetWaveform { block: BlockId, waveform: Waveform },
    /// Acquire a voice for a block that entered the active set
    Start {
        block: BlockId,
        frequency: f32,
        waveform: Waveform,
    },
}

/// Sounding parameters remembered per block between passes
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sounding {
    frequency: f32,
    waveform: Waveform,
}

/// Diffs the desired active set against the previously-sounding set.
#[derive(Debug, Default)]
pub struct Reconciler {
    /// Blocks currently sounding, with the parameters last applied
    sounding: HashMap<BlockId, Sounding>,
}

impl Reconciler {
    /// Create a reconciler with an empty baseline
    pub fn new() -> Self {
        Self {
            sounding: HashMap::new(),
        }
    }

    /// Compute the instructions that bring the sounding set in line
    /// with the blocks active at `time`.
    ///
    /// An unchanged active set with unchanged parameters yields an
    /// empty list. Blocks that stay active but changed frequency or
    /// waveform get in-place updates rather than a stop/start pair,
    /// which would restart the oscillator phase audibly.
    pub fn reconcile(&mut self, store: &BlockStore, time: f64) -> Vec<ToneCommand> {
        let desired: HashMap<BlockId, Sounding> = store
            .query_active(time)
            .into_iter()
            .map(|b| {
                (
                    b.id,
                    Sounding {
                        frequency: b.frequency,
                        waveform: b.waveform,
                    },
                )
            })
            .collect();

        let mut commands = Vec::new();

        // Stops: previously sounding, no longer desired
        let mut to_stop: Vec<BlockId> = self
            .sounding
            .keys()
            .filter(|id| !desired.contains_key(id))
            .copied()
            .collect();
        to_stop.sort_unstable();
        for block in to_stop {
            commands.push(ToneCommand::Stop { block });
        }

        // Updates: in both sets with changed parameters
        let mut to_update: Vec<BlockId> = desired
            .keys()
            .filter(|id| self.sounding.contains_key(id))
            .copied()
            .collect();
        to_update.sort_unstable();
        for block in to_update {
            let previous = self.sounding[&block];
            let current = desired[&block];
            if current.frequency != previous.frequency {
                commands.push(ToneCommand::SetFrequency {
                    block,
                    frequency: current.frequency,
                });
            }
            if current.waveform != previous.waveform {
                commands.push(ToneCommand::SetWaveform {
                    block,
                    waveform: current.waveform,
                });
            }
        }

        // Starts: desired, not previously sounding
        let mut to_start: Vec<BlockId> = desired
            .keys()
            .filter(|id| !self.sounding.contains_key(id))
            .copied()
            .collect();
        to_start.sort_unstable();
        for block in to_start {
            let sounding = desired[&block];
            commands.push(ToneCommand::Start {
                block,
                frequency: sounding.frequency,
                waveform: sounding.waveform,
            });
        }

        self.sounding = desired;
        commands
    }

    /// Stop everything: emit a stop for each sounding block and clear
    /// the baseline. Used when the transport pauses or stops.
    pub fn drain(&mut self) -> Vec<ToneCommand> {
        let mut ids: Vec<BlockId> = self.sounding.keys().copied().collect();
        ids.sort_unstable();
        self.sounding.clear();
        ids.into_iter()
            .map(|block| ToneCommand::Stop { block })
            .collect()
    }

    /// Remove one block from the baseline without emitting a command.
    ///
    /// Used when a block is deleted outright: the caller stops its
    /// voice unconditionally since the block can no longer be queried,
    /// then forgets it here so the next diff stays consistent.
    pub fn forget(&mut self, id: BlockId) -> bool {
        self.sounding.remove(&id).is_some()
    }

    /// Check whether a block is in the sounding baseline
    pub fn is_sounding(&self, id: BlockId) -> bool {
        self.sounding.contains_key(&id)
    }

    /// Get the sounding block ids, sorted
    pub fn sounding_ids(&self) -> Vec<BlockId> {
        let mut ids: Vec<BlockId> = self.sounding.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Get the number of sounding blocks
    pub fn active_count(&self) -> usize {
        self.sounding.len()
    }
}
