//! Per-event timing for the progress bar (feature `progress`).
//!
//! [`EventTimer`] measures the wall-clock time between two calls to [`EventTimer::tick`]
//! and keeps an exponential moving average of it, so the progress message shows a stable
//! "time per event" even when event sizes vary a lot:
//!
//! `avg ← α·dt + (1 − α)·avg`, with `α ∈ (0, 1]`; the first tick seeds the average.
use std::time::{Duration, Instant};

pub(crate) struct EventTimer {
    last: Instant,
    avg_ns: f64,
    alpha: f64,
    ticks: u64,
}

impl EventTimer {
    pub(crate) fn new(alpha: f64) -> Self {
        Self {
            last: Instant::now(),
            avg_ns: 0.0,
            alpha: alpha.clamp(f64::EPSILON, 1.0),
            ticks: 0,
        }
    }

    /// Close the current interval and return its duration.
    pub(crate) fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        self.record(dt);
        dt
    }

    fn record(&mut self, dt: Duration) {
        self.ticks += 1;
        let dt_ns = dt.as_nanos() as f64;
        self.avg_ns = if self.ticks == 1 {
            dt_ns
        } else {
            self.alpha * dt_ns + (1.0 - self.alpha) * self.avg_ns
        };
    }

    pub(crate) fn average(&self) -> Duration {
        if self.ticks == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.avg_ns as u64)
        }
    }
}

/// `253µs`, `42ms` or `3.14s` depending on the magnitude.
pub(crate) fn fmt_duration(d: Duration) -> String {
    let us = d.as_micros();
    if us < 1_000 {
        format!("{us}µs")
    } else if d.as_millis() < 1_000 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.2}s", d.as_secs_f32())
    }
}
