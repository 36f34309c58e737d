// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frames-per-second accounting.
//!
//! [`FpsCounter`] accumulates frame observations against a caller-supplied
//! monotonic clock and emits a [`FpsReport`] whenever the configured
//! reporting interval has elapsed. The clock is injected as nanosecond
//! ticks so the counter stays `no_std` and deterministic under test; the
//! compositor feeds it from the process monotonic clock.

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// One emitted frame-rate observation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FpsReport {
    /// Frames observed during the window.
    pub frames: u64,
    /// Window length in nanoseconds.
    pub elapsed_nanos: u64,
    /// Frames divided by elapsed seconds.
    pub fps: f64,
}

/// Interval-based frame counter.
///
/// An interval of zero seconds disables reporting entirely:
/// [`FpsCounter::observe`] then never returns a report. Between reports the
/// counter holds only the frame count and the window start time; emitting a
/// report resets both.
#[derive(Clone, Copy, Debug)]
pub struct FpsCounter {
    interval_nanos: u64,
    frames: u64,
    window_start: Option<u64>,
}

impl FpsCounter {
    /// Creates a counter reporting every `interval_seconds`. Zero disables.
    #[must_use]
    pub const fn new(interval_seconds: u64) -> Self {
        Self {
            interval_nanos: interval_seconds.saturating_mul(NANOS_PER_SECOND),
            frames: 0,
            window_start: None,
        }
    }

    /// Returns whether reporting is enabled.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.interval_nanos > 0
    }

    /// Records one presented frame at monotonic time `now_nanos`.
    ///
    /// Returns a report when at least the configured interval has elapsed
    /// since the current window began, and starts a fresh window.
    pub fn observe(&mut self, now_nanos: u64) -> Option<FpsReport> {
        if !self.enabled() {
            return None;
        }
        let start = *self.window_start.get_or_insert(now_nanos);
        self.frames += 1;

        let elapsed = now_nanos.saturating_sub(start);
        if elapsed < self.interval_nanos {
            return None;
        }

        #[expect(clippy::cast_precision_loss, reason = "display-only rate")]
        let fps = self.frames as f64 * NANOS_PER_SECOND as f64 / elapsed as f64;
        let report = FpsReport {
            frames: self.frames,
            elapsed_nanos: elapsed,
            fps,
        };
        self.frames = 0;
        self.window_start = Some(now_nanos);
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::{FpsCounter, NANOS_PER_SECOND};

    #[test]
    fn zero_interval_disables_reporting() {
        let mut counter = FpsCounter::new(0);
        assert!(!counter.enabled());
        for frame in 0..100u64 {
            assert_eq!(counter.observe(frame * NANOS_PER_SECOND), None);
        }
    }

    #[test]
    fn thirty_frames_in_just_over_a_second_report_once() {
        // 30 frames spread over 1.1 s with a 1 s interval: exactly one
        // report, rate between 27 and 30.
        let mut counter = FpsCounter::new(1);
        let spacing = 1_100_000_000 / 29;

        let mut emitted = 0;
        let mut last = None;
        for frame in 0..30u64 {
            if let Some(report) = counter.observe(frame * spacing) {
                emitted += 1;
                last = Some(report);
            }
        }
        assert_eq!(emitted, 1, "exactly one report in 1.1 s");
        let report = last.expect("one report emitted");
        assert!(
            (27.0..=30.0).contains(&report.fps),
            "rate {} within expected band",
            report.fps
        );
    }

    #[test]
    fn window_resets_after_each_report() {
        let mut counter = FpsCounter::new(1);
        let mut reports = 0;
        // 10 frames per second for 3 s.
        for frame in 0..30u64 {
            let now = frame * NANOS_PER_SECOND / 10;
            if let Some(report) = counter.observe(now) {
                reports += 1;
                assert!(
                    (9.0..=11.0).contains(&report.fps),
                    "steady 10 fps reported as {}",
                    report.fps
                );
            }
        }
        assert_eq!(reports, 2, "reports at the 1 s and 2 s marks");
    }

    #[test]
    fn non_monotonic_input_saturates_instead_of_underflowing() {
        let mut counter = FpsCounter::new(1);
        assert_eq!(counter.observe(5 * NANOS_PER_SECOND), None);
        // A clock step backwards must not panic or report.
        assert_eq!(counter.observe(0), None);
    }
}
