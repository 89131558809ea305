//! Single-slot alert channel.
//!
//! A new alert fully replaces any prior one; clearing removes it entirely.
//! No queueing, no stacking. Empty messages never render.

use parking_lot::Mutex;
use serde::Serialize;

/// Alert severity. Maps to distinct styling in the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Info,
    Error,
}

/// A transient message for the single alert slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    /// Build an alert, rejecting empty/whitespace messages.
    pub fn new(kind: AlertKind, message: &str) -> Option<Self> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            message: message.to_string(),
        })
    }
}

/// The single alert slot.
pub struct AlertChannel {
    slot: Mutex<Option<Alert>>,
}

impl AlertChannel {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Replace the current alert. A blank message is a no-op (the existing
    /// alert, if any, stays).
    pub fn show(&self, kind: AlertKind, message: &str) {
        if let Some(alert) = Alert::new(kind, message) {
            *self.slot.lock() = Some(alert);
        }
    }

    /// Replace the slot with an already-built alert, or clear it.
    pub fn replace(&self, alert: Option<Alert>) {
        *self.slot.lock() = alert;
    }

    pub fn clear(&self) {
        *self.slot.lock() = None;
    }

    pub fn current(&self) -> Option<Alert> {
        self.slot.lock().clone()
    }
}

impl Default for AlertChannel {
    fn default() -> Self {
        Self::new()
    }
}
