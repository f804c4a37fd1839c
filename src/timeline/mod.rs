// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timeline data model.
//!
//! This module provides the in-memory timeline:
//! - Blocks (time-bounded tone segments) and their waveforms
//! - Tracks (named lanes with per-track defaults)
//! - The block store with point-in-time membership queries

pub mod block;
pub mod store;
pub mod track;

pub use block::{Block, BlockId, Waveform};
pub use store::{BlockStore, BlockUpdate};
pub use track::{Track, TrackId};
