//! Dual-window call budget for the upstream API.
//!
//! [`RateLimiter`] keeps the instants of recent calls in two rolling
//! windows (one minute, one day). [`RateLimiter::acquire()`] suspends the
//! caller until both windows have room and then records the call.
//!
//! # Serialisation
//!
//! The whole purge → check → suspend → record sequence runs under a single
//! async gate, so concurrent callers queue in FIFO order and never both
//! observe the same free slot. The window state itself sits behind a short
//! synchronous lock that is never held across an `.await`, which keeps
//! [`RateLimiter::get_remaining()`] non-blocking even while an acquirer is
//! sleeping.

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::telemetry;
use crate::{MatchdayError, Result};

/// Length of the short window.
pub const MINUTE_WINDOW: Duration = Duration::from_secs(60);

/// Length of the long window.
pub const DAY_WINDOW: Duration = Duration::from_secs(86_400);

/// Call ceilings for the two windows.
///
/// ```rust
/// # use matchday::RateLimitConfig;
/// let config = RateLimitConfig::new().per_minute(10).per_day(7_500);
/// assert_eq!(config.calls_per_minute, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum calls in any 60 s span. Default: 30.
    pub calls_per_minute: u32,
    /// Maximum calls in any 24 h span. Default: 100.
    pub calls_per_day: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            calls_per_minute: 30,
            calls_per_day: 100,
        }
    }
}

impl RateLimitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn per_minute(mut self, calls: u32) -> Self {
        self.calls_per_minute = calls;
        self
    }

    pub fn per_day(mut self, calls: u32) -> Self {
        self.calls_per_day = calls;
        self
    }

    /// Reject ceilings that could never admit a call.
    pub fn validate(&self) -> Result<()> {
        if self.calls_per_minute == 0 || self.calls_per_day == 0 {
            return Err(MatchdayError::Configuration(
                "rate limit ceilings must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Remaining capacity in each window, as reported by
/// [`RateLimiter::get_remaining()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemainingBudget {
    pub minute: u32,
    pub day: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowKind {
    Minute,
    Day,
}

impl WindowKind {
    fn as_str(self) -> &'static str {
        match self {
            WindowKind::Minute => "minute",
            WindowKind::Day => "day",
        }
    }
}

#[derive(Debug)]
struct Window {
    span: Duration,
    ceiling: u32,
    calls: VecDeque<Instant>,
}

impl Window {
    fn new(span: Duration, ceiling: u32) -> Self {
        Self {
            span,
            ceiling,
            calls: VecDeque::new(),
        }
    }

    /// Drop instants that are at least one window old.
    fn purge(&mut self, now: Instant) {
        while let Some(&oldest) = self.calls.front() {
            if now.saturating_duration_since(oldest) >= self.span {
                self.calls.pop_front();
            } else {
                break;
            }
        }
    }

    /// Time until the oldest in-window call ages out, if the window is full.
    fn wait_time(&self, now: Instant) -> Option<Duration> {
        if (self.calls.len() as u64) < u64::from(self.ceiling) {
            return None;
        }
        let wait = match self.calls.front() {
            Some(&oldest) => self.span.saturating_sub(now.saturating_duration_since(oldest)),
            None => self.span,
        };
        Some(wait)
    }

    fn remaining(&self) -> u32 {
        let used = u32::try_from(self.calls.len()).unwrap_or(u32::MAX);
        self.ceiling.saturating_sub(used)
    }
}

#[derive(Debug)]
struct Windows {
    minute: Window,
    day: Window,
}

impl Windows {
    fn purge(&mut self, now: Instant) {
        self.minute.purge(now);
        self.day.purge(now);
    }
}

/// Rolling per-minute and per-day budget guarding upstream calls.
///
/// Created once per gateway and shared by every fetch.
#[derive(Debug)]
pub struct RateLimiter {
    gate: tokio::sync::Mutex<()>,
    windows: parking_lot::Mutex<Windows>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            gate: tokio::sync::Mutex::new(()),
            windows: parking_lot::Mutex::new(Windows {
                minute: Window::new(MINUTE_WINDOW, config.calls_per_minute),
                day: Window::new(DAY_WINDOW, config.calls_per_day),
            }),
        }
    }

    /// Wait for a free slot in both windows, then record the call.
    ///
    /// The minute window is checked first, then the day window. When a
    /// window is full the caller sleeps until its oldest call ages out and
    /// re-checks. There is no cap on the total wait: an exhausted day
    /// budget can suspend the caller for up to 24 hours.
    pub async fn acquire(&self) {
        let _gate = self.gate.lock().await;
        loop {
            let now = Instant::now();
            let blocked = {
                let mut windows = self.windows.lock();
                windows.purge(now);
                if let Some(wait) = windows.minute.wait_time(now) {
                    Some((WindowKind::Minute, wait))
                } else if let Some(wait) = windows.day.wait_time(now) {
                    Some((WindowKind::Day, wait))
                } else {
                    windows.minute.calls.push_back(now);
                    windows.day.calls.push_back(now);
                    None
                }
            };

            let Some((window, wait)) = blocked else {
                debug!("rate limit slot acquired");
                return;
            };

            metrics::counter!(telemetry::RATE_LIMIT_WAITS_TOTAL, "window" => window.as_str())
                .increment(1);
            match window {
                WindowKind::Minute => warn!(
                    wait_secs = wait.as_secs_f64(),
                    "rate limit reached, sleeping"
                ),
                WindowKind::Day => error!(
                    wait_secs = wait.as_secs_f64(),
                    "daily limit reached, sleeping"
                ),
            }
            tokio::time::sleep(wait).await;
        }
    }

    /// Remaining capacity after purging expired instants.
    ///
    /// Observability only: does not reserve anything and never waits on an
    /// in-flight [`acquire()`](Self::acquire).
    pub fn get_remaining(&self) -> RemainingBudget {
        let now = Instant::now();
        let mut windows = self.windows.lock();
        windows.purge(now);
        RemainingBudget {
            minute: windows.minute.remaining(),
            day: windows.day.remaining(),
        }
    }
}
