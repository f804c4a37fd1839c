// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Transport clock implementation.
//!
//! This module provides the playback clock: a Stopped/Playing state
//! machine that maps a monotonic driver timebase onto a position within
//! the timeline, with auto-stop at the timeline end.

/// Transport clock state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Stopped,
    Playing,
}

impl Default for ClockState {
    fn default() -> Self {
        ClockState::Stopped
    }
}

/// Playback clock for the timeline.
///
/// All times are in seconds. `now` values come from a single monotonic
/// timebase owned by the driver (the engine derives them from an
/// `Instant` epoch); the clock itself never reads the wall clock, so
/// every transition is deterministic.
#[derive(Debug)]
pub struct TransportClock {
    /// Current state
    state: ClockState,
    /// Playhead position in seconds, always within [0, timeline_duration]
    current_time: f64,
    /// Reference epoch in driver time; only meaningful while playing.
    /// Invariant while playing: current_time == now - reference.
    reference: f64,
    /// Total timeline length in seconds
    timeline_duration: f64,
}

impl TransportClock {
    /// Create a new stopped clock for a timeline of the given length
    pub fn new(timeline_duration: f64) -> Self {
        assert!(
            timeline_duration > 0.0,
            "Timeline duration must be positive"
        );
        Self {
            state: ClockState::Stopped,
            current_time: 0.0,
            reference: 0.0,
            timeline_duration,
        }
    }

    /// Get the current state
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Check if the clock is playing
    pub fn is_playing(&self) -> bool {
        self.state == ClockState::Playing
    }

    /// Get the playhead position in seconds
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Get the timeline length in seconds
    pub fn timeline_duration(&self) -> f64 {
        self.timeline_duration
    }

    /// Change the timeline length, clamping the playhead into range
    pub fn set_timeline_duration(&mut self, duration: f64) {
        assert!(duration > 0.0, "Timeline duration must be positive");
        self.timeline_duration = duration;
        if self.current_time > duration {
            self.current_time = duration;
        }
    }

    /// Start playback, resuming from the current position.
    ///
    /// The reference epoch is computed so the playhead continues from
    /// its prior value rather than restarting. No-op if already playing.
    pub fn start(&mut self, now: f64) {
        if self.state == ClockState::Playing {
            return;
        }
        self.reference = now - self.current_time;
        self.state = ClockState::Playing;
    }

    /// Stop playback, freezing the playhead at its last computed value.
    ///
    /// Idempotent: stopping an already-stopped clock is a no-op.
    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
    }

    /// Advance the playhead while playing.
    ///
    /// Recomputes `current_time` from the reference epoch. When the
    /// playhead reaches the timeline end it wraps to 0, the clock
    /// stops, and `true` is returned. A tick on a stopped clock is a
    /// no-op returning `false`, so a stray tick fired after stop
    /// cannot move the playhead.
    pub fn tick(&mut self, now: f64) -> bool {
        if self.state != ClockState::Playing {
            return false;
        }

        self.current_time = now - self.reference;

        if self.current_time >= self.timeline_duration {
            self.current_time = 0.0;
            self.state = ClockState::Stopped;
            return true;
        }

        false
    }

    /// Jump the playhead to a target position.
    ///
    /// The target is clamped to [0, timeline_duration]. While playing,
    /// the reference epoch is rebased so the next tick continues from
    /// the new position without a discontinuity.
    pub fn seek(&mut self, target: f64, now: f64) {
        self.current_time = target.clamp(0.0, self.timeline_duration);
        if self.state == ClockState::Playing {
            self.reference = now - self.current_time;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_creation() {
        let clock = TransportClock::new(60.0);
        assert_eq!(clock.state(), ClockState::Stopped);
        assert_eq!(clock.current_time(), 0.0);
        assert_eq!(clock.timeline_duration(), 60.0);
        assert!(!clock.is_playing());
    }

    #[test]
    #[should_panic(expected = "Timeline duration must be positive")]
    fn test_zero_duration_rejected() {
        TransportClock::new(0.0);
    }

    #[test]
    fn test_start_and_tick() {
        let mut clock = TransportClock::new(60.0);

        clock.start(10.0);
        assert!(clock.is_playing());

        clock.tick(12.5);
        assert!((clock.current_time() - 2.5).abs() < 1e-9);

        clock.tick(15.0);
        assert!((clock.current_time() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_start_resumes_from_position() {
        let mut clock = TransportClock::new(60.0);

        clock.start(0.0);
        clock.tick(4.0);
        clock.stop();
        assert!((clock.current_time() - 4.0).abs() < 1e-9);

        // Resume 100 seconds of wall time later
        clock.start(100.0);
        clock.tick(101.0);
        assert!((clock.current_time() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_start_while_playing_is_noop() {
        let mut clock = TransportClock::new(60.0);

        clock.start(0.0);
        clock.tick(3.0);

        // A second start must not rebase the reference
        clock.start(50.0);
        clock.tick(4.0);
        assert!((clock.current_time() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_stop_freezes_and_is_idempotent() {
        let mut clock = TransportClock::new(60.0);

        clock.start(0.0);
        clock.tick(7.0);
        clock.stop();
        assert_eq!(clock.state(), ClockState::Stopped);
        assert!((clock.current_time() - 7.0).abs() < 1e-9);

        clock.stop();
        assert_eq!(clock.state(), ClockState::Stopped);
        assert!((clock.current_time() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_tick_while_stopped_is_noop() {
        let mut clock = TransportClock::new(60.0);

        clock.start(0.0);
        clock.tick(5.0);
        clock.stop();

        // A stray tick after stop must not move the playhead
        assert!(!clock.tick(20.0));
        assert!((clock.current_time() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_auto_stop_at_end() {
        let mut clock = TransportClock::new(10.0);

        clock.start(0.0);
        assert!(!clock.tick(9.9));
        assert!(clock.is_playing());

        // Reaching the end wraps to 0 and stops
        assert!(clock.tick(10.0));
        assert_eq!(clock.state(), ClockState::Stopped);
        assert_eq!(clock.current_time(), 0.0);
    }

    #[test]
    fn test_seek_clamps() {
        let mut clock = TransportClock::new(60.0);

        clock.seek(-5.0, 0.0);
        assert_eq!(clock.current_time(), 0.0);

        clock.seek(75.0, 0.0);
        assert_eq!(clock.current_time(), 60.0);

        clock.seek(30.0, 0.0);
        assert_eq!(clock.current_time(), 30.0);
    }

    #[test]
    fn test_seek_while_playing_rebases() {
        let mut clock = TransportClock::new(60.0);

        clock.start(0.0);
        clock.tick(5.0);

        clock.seek(20.0, 5.0);
        assert_eq!(clock.current_time(), 20.0);

        // One second later the playhead is at 21, not back at 6
        clock.tick(6.0);
        assert!((clock.current_time() - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_seek_while_stopped_keeps_position_on_restart() {
        let mut clock = TransportClock::new(60.0);

        clock.seek(12.0, 0.0);
        assert_eq!(clock.current_time(), 12.0);

        clock.start(100.0);
        clock.tick(100.5);
        assert!((clock.current_time() - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_set_timeline_duration_clamps_playhead() {
        let mut clock = TransportClock::new(60.0);
        clock.seek(45.0, 0.0);

        clock.set_timeline_duration(30.0);
        assert_eq!(clock.current_time(), 30.0);
        assert_eq!(clock.timeline_duration(), 30.0);
    }
}
