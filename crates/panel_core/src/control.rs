//! Busy/idle lifecycle of a triggering control.

use std::fmt;

use shared::domain::ControlState;
use tokio::sync::watch;

/// A named trigger that gates re-entrant dispatches. Front ends subscribe to
/// render it enabled or disabled.
pub struct Control {
    name: String,
    state: watch::Sender<ControlState>,
}

impl Control {
    pub fn new(name: impl Into<String>) -> Self {
        let (state, _) = watch::channel(ControlState::Idle);
        Self {
            name: name.into(),
            state,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ControlState {
        *self.state.borrow()
    }

    pub fn is_busy(&self) -> bool {
        self.state() == ControlState::Busy
    }

    pub fn subscribe(&self) -> watch::Receiver<ControlState> {
        self.state.subscribe()
    }

    /// Flips Idle to Busy. Returns `None` when the control is already busy.
    /// The returned guard puts the control back to Idle when dropped.
    pub fn try_begin(&self) -> Option<BusyGuard<'_>> {
        let acquired = self.state.send_if_modified(|state| {
            if *state == ControlState::Idle {
                *state = ControlState::Busy;
                true
            } else {
                false
            }
        });
        acquired.then(|| BusyGuard { control: self })
    }

    fn release(&self) {
        self.state.send_replace(ControlState::Idle);
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("name", &self.name)
            .field("state", &self.state())
            .finish()
    }
}

#[must_use = "the control returns to idle as soon as the guard is dropped"]
pub struct BusyGuard<'a> {
    control: &'a Control,
}

impl BusyGuard<'_> {
    /// Returns the control to Idle now.
    pub fn finish(self) {}
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.control.release();
    }
}
