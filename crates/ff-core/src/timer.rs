//! Timestamp-based timer state.
//!
//! Elapsed time is always recomputed from wall-clock timestamps, never
//! accumulated by counting ticks: `elapsed = accumulated + (now - started)`
//! while running, `accumulated` otherwise. This keeps the reported time
//! correct across process restarts, OS sleep, and arbitrarily many missed
//! polls. All transitions take an explicit `now` so callers (and tests)
//! control the clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timer lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Paused,
}

impl TimerStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
        }
    }
}

impl std::fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistent timer state, stored separately from the active session record.
///
/// Serialized field names match the original local-storage shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub status: TimerStatus,
    /// Epoch milliseconds of the last (re)start. `None` when paused or idle.
    pub start_timestamp: Option<i64>,
    /// Seconds banked before the current running interval.
    pub accumulated_seconds: f64,
    /// Epoch milliseconds of the last pause. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_at: Option<i64>,
    /// Optional planned ceiling; reaching it auto-completes the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_seconds: Option<u64>,
}

impl TimerState {
    /// Starts a fresh running timer at `now`.
    #[must_use]
    pub fn start(now: DateTime<Utc>, target_seconds: Option<u64>) -> Self {
        Self {
            status: TimerStatus::Running,
            start_timestamp: Some(now.timestamp_millis()),
            accumulated_seconds: 0.0,
            paused_at: None,
            target_seconds,
        }
    }

    /// Total elapsed seconds as of `now`.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "millis fit f64 until year 287396")]
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> f64 {
        match (self.status, self.start_timestamp) {
            (TimerStatus::Running, Some(started)) => {
                let running = (now.timestamp_millis() - started) as f64 / 1000.0;
                // A clock stepped backwards must not shrink banked time
                self.accumulated_seconds + running.max(0.0)
            }
            _ => self.accumulated_seconds,
        }
    }

    /// Freezes the timer, banking elapsed time into `accumulated_seconds`.
    ///
    /// No-op unless currently running.
    #[must_use]
    pub fn pause(self, now: DateTime<Utc>) -> Self {
        if self.status != TimerStatus::Running {
            return self;
        }
        let elapsed = self.elapsed_at(now);
        Self {
            status: TimerStatus::Paused,
            start_timestamp: None,
            accumulated_seconds: elapsed,
            paused_at: Some(now.timestamp_millis()),
            ..self
        }
    }

    /// Resumes a paused timer, keeping banked seconds.
    ///
    /// No-op unless currently paused.
    #[must_use]
    pub fn resume(self, now: DateTime<Utc>) -> Self {
        if self.status != TimerStatus::Paused {
            return self;
        }
        Self {
            status: TimerStatus::Running,
            start_timestamp: Some(now.timestamp_millis()),
            paused_at: None,
            ..self
        }
    }

    /// Whether the planned target has been reached as of `now`.
    ///
    /// Always false when no target is set or the timer is not running.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "targets are user-scale durations")]
    pub fn target_reached(&self, now: DateTime<Utc>) -> bool {
        match self.target_seconds {
            Some(target) if self.status == TimerStatus::Running => {
                self.elapsed_at(now) >= target as f64
            }
            _ => false,
        }
    }
}

/// Formats elapsed seconds as `H:MM:SS` when hours > 0, else `MM:SS`.
///
/// Minutes and seconds are always zero-padded; hours never are.
/// Fractional seconds are truncated.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "negative and oversized inputs are clamped first"
)]
pub fn format_elapsed(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Converts raw elapsed seconds to whole minutes for a completed record.
///
/// Rounded to the nearest minute with a floor of one, so per-subject
/// percentage math never divides by zero.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "rounded non-negative minutes fit u32 for any realistic session"
)]
pub fn minutes_from_seconds(seconds: f64) -> u32 {
    ((seconds.max(0.0) / 60.0).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn elapsed_accumulates_across_pause_resume_cycles() {
        // run 30s, pause 100s, run 45s, pause, run 15s => 90s total
        let t = TimerState::start(at(0), None);
        let t = t.pause(at(30));
        assert!((t.elapsed_at(at(130)) - 30.0).abs() < f64::EPSILON);
        let t = t.resume(at(130));
        let t = t.pause(at(175));
        let t = t.resume(at(500));
        assert!((t.elapsed_at(at(515)) - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn elapsed_while_paused_ignores_wall_clock() {
        let t = TimerState::start(at(0), None).pause(at(60));
        assert!((t.elapsed_at(at(1_000_000)) - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn elapsed_survives_missed_polls() {
        // No intermediate ticks: a single recomputation after a long gap
        // still reports true wall-clock elapsed.
        let t = TimerState::start(at(0), None);
        assert!((t.elapsed_at(at(86_400)) - 86_400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pause_outside_running_is_noop() {
        let t = TimerState::start(at(0), None).pause(at(10));
        let again = t.clone().pause(at(20));
        assert_eq!(again, t);
    }

    #[test]
    fn resume_outside_paused_is_noop() {
        let t = TimerState::start(at(0), None);
        let again = t.clone().resume(at(20));
        assert_eq!(again, t);
    }

    #[test]
    fn backwards_clock_does_not_shrink_elapsed() {
        let t = TimerState::start(at(100), None);
        assert!((t.elapsed_at(at(50)) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn target_reached_only_while_running() {
        let t = TimerState::start(at(0), Some(120));
        assert!(!t.target_reached(at(119)));
        assert!(t.target_reached(at(120)));
        assert!(t.target_reached(at(500)));
        let paused = t.pause(at(30));
        assert!(!paused.target_reached(at(500)));
    }

    #[test]
    fn no_target_never_reached() {
        let t = TimerState::start(at(0), None);
        assert!(!t.target_reached(at(1_000_000)));
    }

    #[test]
    fn format_pads_minutes_and_seconds_not_hours() {
        assert_eq!(format_elapsed(0.0), "00:00");
        assert_eq!(format_elapsed(59.9), "00:59");
        assert_eq!(format_elapsed(65.0), "01:05");
        assert_eq!(format_elapsed(3600.0), "1:00:00");
        assert_eq!(format_elapsed(3661.0), "1:01:01");
        assert_eq!(format_elapsed(36_000.0 + 754.0), "10:12:34");
    }

    #[test]
    fn minutes_round_with_floor_of_one() {
        assert_eq!(minutes_from_seconds(0.0), 1);
        assert_eq!(minutes_from_seconds(29.0), 1);
        assert_eq!(minutes_from_seconds(90.0), 2);
        assert_eq!(minutes_from_seconds(89.0), 1);
        assert_eq!(minutes_from_seconds(3600.0), 60);
    }

    #[test]
    fn timer_state_serde_uses_camel_case() {
        let t = TimerState::start(at(0), Some(300));
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("startTimestamp"));
        assert!(json.contains("accumulatedSeconds"));
        assert!(json.contains("targetSeconds"));
        let parsed: TimerState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, t);
    }
}
