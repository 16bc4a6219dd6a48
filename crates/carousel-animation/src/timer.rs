//! Cancellable single-fire deferred action.

use web_time::{Duration, Instant};

/// A one-shot timer polled by the host: the action fires on the first
/// poll at or past the deadline, at most once. Cancelling (or dropping)
/// the timer discards the action deterministically; nothing fires later.
///
/// Used for tap/double-tap disambiguation, where a pending "it was a
/// single click" action must be revocable until the double-click window
/// closes.
pub struct OneShotTimer {
    deadline: Instant,
    action: Option<Box<dyn FnOnce()>>,
}

impl OneShotTimer {
    pub fn new(deadline: Instant, action: impl FnOnce() + 'static) -> Self {
        Self {
            deadline,
            action: Some(Box::new(action)),
        }
    }

    pub fn after(delay: Duration, action: impl FnOnce() + 'static) -> Self {
        Self::new(Instant::now() + delay, action)
    }

    #[inline]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Whether the action is still armed (not fired, not cancelled).
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.action.is_some()
    }

    /// Fires the action if `now` has reached the deadline. Returns `true`
    /// exactly once, on the poll that fires.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        if now < self.deadline {
            return false;
        }
        match self.action.take() {
            Some(action) => {
                action();
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        self.action = None;
    }
}
