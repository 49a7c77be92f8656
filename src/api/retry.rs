//! Bounded polling for measures absent from the host column set.
//!
//! The host may answer a configuration change asynchronously, and nothing
//! pushes a notification when the missing columns finally arrive. The
//! machine re-checks the host result set on a schedule instead, up to a
//! fixed attempt ceiling, and then stops for good.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Lifecycle of one missing-measure wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetryState {
    Idle,
    Pending,
    Checking,
    Resolved,
    Exhausted,
}

/// Poll schedule, in seconds on the host's monotonic clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryTiming {
    #[serde(default = "default_initial_delay_seconds")]
    pub initial_delay_seconds: f64,
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: f64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for RetryTiming {
    fn default() -> Self {
        Self {
            initial_delay_seconds: default_initial_delay_seconds(),
            interval_seconds: default_interval_seconds(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// What the driving loop should do at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPoll {
    /// Nothing armed; no deadline outstanding.
    Idle,
    /// Armed, deadline not yet reached.
    Waiting,
    /// The deadline passed; the caller should re-check the host columns.
    CheckDue,
}

/// State machine tracking measures that have not yet appeared.
///
/// Time is injected: every method that can move a deadline takes `now` in
/// seconds, so tests drive the machine with a virtual clock.
#[derive(Debug, Clone)]
pub struct MeasureRetryMachine {
    timing: RetryTiming,
    state: RetryState,
    missing: Vec<String>,
    attempts: u32,
    deadline: Option<f64>,
}

impl Default for MeasureRetryMachine {
    fn default() -> Self {
        Self::new(RetryTiming::default())
    }
}

impl MeasureRetryMachine {
    #[must_use]
    pub const fn new(timing: RetryTiming) -> Self {
        Self {
            timing,
            state: RetryState::Idle,
            missing: Vec::new(),
            attempts: 0,
            deadline: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> RetryState {
        self.state
    }

    #[must_use]
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Whether a deadline is outstanding or a check is in flight.
    #[must_use]
    pub const fn is_waiting(&self) -> bool {
        matches!(self.state, RetryState::Pending | RetryState::Checking)
    }

    /// Arms the machine for a set of missing measures.
    ///
    /// Arming with the set already being waited on keeps the existing
    /// schedule, so a render cycle that re-discovers the same gap does not
    /// push the deadline out. A different set restarts from attempt zero.
    /// Once Exhausted, the same set never re-arms.
    pub fn arm(&mut self, missing: Vec<String>, now: f64) {
        if missing.is_empty() {
            self.cancel();
            return;
        }
        let same_set = self.missing == missing;
        match self.state {
            RetryState::Pending | RetryState::Checking if same_set => return,
            RetryState::Exhausted if same_set => return,
            _ => {}
        }
        debug!(missing = ?missing, "waiting for measures to appear");
        self.state = RetryState::Pending;
        self.missing = missing;
        self.attempts = 0;
        self.deadline = Some(now + self.timing.initial_delay_seconds);
    }

    /// Clears the deadline and returns to Idle.
    ///
    /// Called when a new data version supersedes the wait and when a fresh
    /// render cycle starts with nothing missing.
    pub fn cancel(&mut self) {
        self.state = RetryState::Idle;
        self.missing.clear();
        self.attempts = 0;
        self.deadline = None;
    }

    /// Reports whether a host check is due at `now`.
    #[must_use]
    pub fn poll(&self, now: f64) -> RetryPoll {
        match (self.state, self.deadline) {
            (RetryState::Pending, Some(deadline)) if now >= deadline => RetryPoll::CheckDue,
            (RetryState::Pending, Some(_)) | (RetryState::Checking, _) => RetryPoll::Waiting,
            _ => RetryPoll::Idle,
        }
    }

    /// Marks the due check as started and consumes the deadline.
    pub fn begin_check(&mut self) {
        if self.state == RetryState::Pending {
            self.state = RetryState::Checking;
            self.deadline = None;
            self.attempts = self.attempts.saturating_add(1);
        }
    }

    /// Feeds back the measures still missing after a check.
    ///
    /// An empty set resolves the machine. A smaller set keeps waiting on
    /// the remainder without resetting the attempt count. Returns `true`
    /// on the single transition into Exhausted so the caller emits its
    /// diagnostic exactly once.
    pub fn complete_check(&mut self, still_missing: Vec<String>, now: f64) -> bool {
        if self.state != RetryState::Checking {
            return false;
        }
        if still_missing.is_empty() {
            debug!(attempts = self.attempts, "missing measures appeared");
            self.state = RetryState::Resolved;
            self.missing.clear();
            self.deadline = None;
            return false;
        }
        if self.attempts >= self.timing.max_attempts {
            warn!(
                missing = ?still_missing,
                attempts = self.attempts,
                "measures never appeared; giving up"
            );
            self.state = RetryState::Exhausted;
            self.missing = still_missing;
            self.deadline = None;
            return true;
        }
        self.state = RetryState::Pending;
        self.missing = still_missing;
        self.deadline = Some(now + self.timing.interval_seconds);
        false
    }
}

const fn default_initial_delay_seconds() -> f64 {
    0.5
}

const fn default_interval_seconds() -> f64 {
    2.0
}

const fn default_max_attempts() -> u32 {
    30
}
