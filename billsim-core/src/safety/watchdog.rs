//! Communication watchdog
//!
//! A resettable deadline. Every parsed host poll resets it; if the host
//! stays silent for a full interval the watchdog fires once, and the owner
//! disables note acceptance.

/// Watchdog condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogStatus {
    /// Reset within the interval
    Healthy,
    /// Interval elapsed without a reset
    Expired,
    /// Disarmed for shutdown
    Stopped,
}

/// Resettable communication deadline
#[derive(Debug, Clone)]
pub struct Watchdog {
    /// Allowed silence (ms)
    interval_ms: u64,
    /// Time of the last reset (ms)
    last_reset_ms: u64,
    /// Already fired for the current silence
    expired: bool,
    /// Disarmed; never fires again
    stopped: bool,
}

impl Watchdog {
    /// Create a watchdog armed from `now_ms`
    pub fn new(interval_ms: u32, now_ms: u64) -> Self {
        Self {
            interval_ms: u64::from(interval_ms),
            last_reset_ms: now_ms,
            expired: false,
            stopped: false,
        }
    }

    /// Record a sign of life from the host
    pub fn reset(&mut self, now_ms: u64) {
        self.last_reset_ms = now_ms;
        self.expired = false;
    }

    /// Advance to `now_ms`
    ///
    /// Returns true exactly once per silence, on the call that first
    /// observes the deadline as passed.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if self.stopped || self.expired {
            return false;
        }
        if now_ms.saturating_sub(self.last_reset_ms) >= self.interval_ms {
            self.expired = true;
            return true;
        }
        false
    }

    /// Disarm for shutdown
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Current condition
    pub fn status(&self) -> WatchdogStatus {
        if self.stopped {
            WatchdogStatus::Stopped
        } else if self.expired {
            WatchdogStatus::Expired
        } else {
            WatchdogStatus::Healthy
        }
    }

    /// Check if the watchdog has fired since the last reset
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Check if the watchdog has been disarmed
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Configured interval (ms)
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}
