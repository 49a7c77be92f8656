//! Debounced container-resize tracking.
//!
//! Resize observers fire in bursts while the host lays out its own tree,
//! and occasionally deliver zero-size boxes before the container settles.
//! The coordinator collapses each burst into a single relayout by holding
//! the newest box until the notifications stop for a debounce window.

use tracing::warn;

use crate::core::ContainerBox;

/// Seconds a burst must stay quiet before the pending box is released.
pub const RESIZE_DEBOUNCE_SECONDS: f64 = 0.2;

/// Trailing-edge debounce over container boxes, driven by injected time.
#[derive(Debug, Clone)]
pub struct ResizeCoordinator {
    debounce_seconds: f64,
    current: Option<ContainerBox>,
    pending: Option<ContainerBox>,
    deadline: Option<f64>,
}

impl Default for ResizeCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResizeCoordinator {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_debounce(RESIZE_DEBOUNCE_SECONDS)
    }

    #[must_use]
    pub const fn with_debounce(debounce_seconds: f64) -> Self {
        Self {
            debounce_seconds,
            current: None,
            pending: None,
            deadline: None,
        }
    }

    /// Records a notification. Later notifications replace the pending box
    /// and push the deadline out; the box itself is applied only by `poll`.
    pub fn observe(&mut self, container: ContainerBox, now: f64) {
        if !container.is_valid() {
            warn!(
                width = container.width,
                height = container.height,
                "ignoring zero-size container notification"
            );
            return;
        }
        if self.pending.is_none() && self.current == Some(container) {
            // The settled size was re-reported; nothing to recompute.
            return;
        }
        self.pending = Some(container);
        self.deadline = Some(now + self.debounce_seconds);
    }

    /// Releases the pending box once the debounce window has elapsed.
    ///
    /// At most one box is released per call; a notification arriving while
    /// the caller is still recomputing simply becomes the next pending box.
    pub fn poll(&mut self, now: f64) -> Option<ContainerBox> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        let container = self.pending.take()?;
        self.current = Some(container);
        Some(container)
    }

    /// The last box released to the caller.
    #[must_use]
    pub const fn current(&self) -> Option<ContainerBox> {
        self.current
    }

    /// Whether a notification is waiting out its debounce window.
    #[must_use]
    pub const fn is_settling(&self) -> bool {
        self.deadline.is_some()
    }

    /// Adopts a box immediately, bypassing the debounce. Used for the
    /// initial container measurement where there is no burst to collapse.
    pub fn adopt(&mut self, container: ContainerBox) {
        if !container.is_valid() {
            warn!(
                width = container.width,
                height = container.height,
                "ignoring zero-size container measurement"
            );
            return;
        }
        self.current = Some(container);
        self.pending = None;
        self.deadline = None;
    }
}
