//! Cancellable deferred actions on the scene clock.
//!
//! The engine has no executor. Deferred work is modelled as a handle holding
//! at most one `(deadline, action)` pair; the frame loop (or a host wake-up
//! timer) polls it with the current time. Once cancelled or fired, the action
//! is gone, so a cancelled timer can never fire late.

#[cfg(test)]
#[path = "timer_test.rs"]
mod timer_test;

/// An owned, cancellable, single-shot deferred action.
#[derive(Debug, Clone)]
pub struct Deferred<A> {
    pending: Option<(f64, A)>,
}

impl<A> Default for Deferred<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A> Deferred<A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer to fire `action` once `delay_ms` has elapsed after `now_ms`.
    ///
    /// Any action already pending is cancelled and returned.
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, action: A) -> Option<A> {
        let previous = self.pending.replace((now_ms + delay_ms.max(0.0), action));
        previous.map(|(_, action)| action)
    }

    /// Cancel the pending action. Returns `false` if nothing was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time at which the pending action becomes due.
    #[must_use]
    pub fn deadline(&self) -> Option<f64> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// The pending action, without consuming it.
    #[must_use]
    pub fn action(&self) -> Option<&A> {
        self.pending.as_ref().map(|(_, action)| action)
    }

    /// Take the action if it is due at `now_ms`. Fires at most once.
    pub fn poll(&mut self, now_ms: f64) -> Option<A> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|(deadline, _)| now_ms >= *deadline);
        if !due {
            return None;
        }
        self.pending.take().map(|(_, action)| action)
    }
}
