// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playback core: active-set reconciliation and the engine facade.
//!
//! This module provides:
//! - The reconciler that diffs the sounding set against the timeline
//! - The playback engine coordinating clock, store, edits, and audio

pub mod engine;
pub mod reconciler;

pub use engine::PlaybackEngine;
pub use reconciler::{Reconciler, ToneCommand};
