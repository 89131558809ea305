//! The sync controller.
//!
//! Owns the single appointment snapshot and every piece of presentation
//! state derived from it. Each user action and each poll tick is a discrete
//! method call that replaces the snapshot wholesale and recomputes the
//! render model; there are no ambient globals and no partial mutations.
//!
//! Overlapping fetches follow "last response wins": each response is a
//! complete replacement, so a late-resolving older response simply becomes
//! the current state. The applied sequence number is recorded for
//! observability, matching the source behavior (a known staleness caveat,
//! deliberately not reordered here).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

use crate::alert::{AlertChannel, AlertKind, Alert};
use crate::error::{ControllerError, RemoteError};
use crate::frame::{FramePhase, MeetingFrame};
use crate::notes::NotesAutosave;
use crate::poll::Poller;
use crate::remote::BackendApi;
use crate::storage::NotesStore;
use crate::types::{AppointmentCreateRequest, AppointmentSnapshot};
use crate::view::{derive_view, JoiningView, SchedulingView};

/// Which role's view is currently active in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Scheduling,
    Joining,
}

/// Everything the rendering layer needs, computed in one pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderModel {
    pub scheduling_view: SchedulingView,
    pub joining_view: JoiningView,
    pub scheduling_party_name: Option<String>,
    pub joining_party_name: Option<String>,
    pub scheduling_url: Option<String>,
    pub joining_url: Option<String>,
    pub alert: Option<Alert>,
    pub frame_phase: FramePhase,
    pub frame_target: String,
    pub frame_placeholder: Option<&'static str>,
    pub notes_status: String,
    pub polling: bool,
}

/// Client-side controller for the shared appointment resource.
pub struct Controller {
    api: Arc<dyn BackendApi>,
    snapshot: Mutex<Option<AppointmentSnapshot>>,
    active_role: Mutex<Role>,
    alert: AlertChannel,
    frame: Mutex<MeetingFrame>,
    notes: NotesAutosave,
    poller: Poller,
    /// Sequence number handed to each outgoing fetch.
    issued_seq: AtomicU64,
    /// Sequence number of the response currently applied.
    applied_seq: AtomicU64,
}

impl Controller {
    pub fn new(
        api: Arc<dyn BackendApi>,
        notes_store: Box<dyn NotesStore>,
        poll_interval: Duration,
        notes_debounce: Duration,
    ) -> Self {
        Self {
            api,
            snapshot: Mutex::new(None),
            active_role: Mutex::new(Role::Scheduling),
            alert: AlertChannel::new(),
            frame: Mutex::new(MeetingFrame::new()),
            notes: NotesAutosave::new(notes_store, notes_debounce),
            poller: Poller::new(poll_interval),
            issued_seq: AtomicU64::new(0),
            applied_seq: AtomicU64::new(0),
        }
    }

    pub fn notes(&self) -> &NotesAutosave {
        &self.notes
    }

    fn next_seq(&self) -> u64 {
        self.issued_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replace the snapshot wholesale and recompute everything derived from
    /// it: role views, the alert slot (a backend-recorded error surfaces, a
    /// clean snapshot clears any stale alert) and the frame target.
    fn apply_snapshot(&self, snapshot: Option<AppointmentSnapshot>, seq: u64) {
        let view = derive_view(snapshot.as_ref());
        *self.snapshot.lock() = snapshot;
        self.applied_seq.store(seq, Ordering::SeqCst);

        self.alert.replace(view.render.alert);
        self.sync_frame();
    }

    /// Point the frame at the meeting URL for the active role, or reset it
    /// when no meeting exists.
    fn sync_frame(&self) {
        let role = *self.active_role.lock();
        let url = {
            let guard = self.snapshot.lock();
            guard.as_ref().and_then(|s| s.meeting.as_ref()).map(|m| {
                match role {
                    Role::Scheduling => m.scheduling_party_url.clone(),
                    Role::Joining => m.joining_party_url.clone(),
                }
            })
        };

        let mut frame = self.frame.lock();
        match url {
            Some(url) => frame.assign(&url),
            None => frame.reset(),
        }
    }

    /// Switch the active role view. The joining party's view polls for
    /// changes; the scheduling party's does not. Stopping is synchronous:
    /// no timer survives the switch (in-flight requests still land).
    pub fn activate_view(self: &Arc<Self>, role: Role) {
        *self.active_role.lock() = role;
        match role {
            Role::Joining => self.start_polling(),
            Role::Scheduling => self.poller.stop(),
        }
        self.sync_frame();
    }

    /// Start the periodic refresh loop. Idempotent: at most one timer.
    pub fn start_polling(self: &Arc<Self>) {
        let controller = Arc::clone(self);
        self.poller.start(move || {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move {
                controller.poll_tick().await;
            });
        });
    }

    pub fn stop_polling(&self) {
        self.poller.stop();
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_active()
    }

    /// One background refresh cycle. Fetch errors are swallowed (no alert
    /// spam every interval); the last-known-good snapshot stays displayed
    /// unless the backend says the resource itself is gone.
    pub(crate) async fn poll_tick(&self) {
        let seq = self.next_seq();
        match self.api.fetch_appointment().await {
            Ok(snapshot) => self.apply_snapshot(snapshot, seq),
            Err(e) if e.is_gone() => self.apply_snapshot(None, seq),
            Err(e) => {
                log::warn!("Background refresh failed, keeping last known state: {e}");
            }
        }
    }

    /// User-triggered refresh. Unlike a poll tick, a failure here clears
    /// the snapshot (fail-safe to "unknown" rather than stale data) and
    /// surfaces the error in the alert slot.
    pub async fn refresh(&self) -> Result<(), ControllerError> {
        let seq = self.next_seq();
        match self.api.fetch_appointment().await {
            Ok(snapshot) => {
                self.apply_snapshot(snapshot, seq);
                Ok(())
            }
            Err(e) => {
                self.apply_snapshot(None, seq);
                self.alert.show(AlertKind::Error, &e.to_string());
                Err(e.into())
            }
        }
    }

    /// Create (or replace) the appointment. The scheduling party's name is
    /// required; an empty name is rejected before any network traffic.
    pub async fn create_appointment(
        &self,
        scheduling_party_name: &str,
        joining_party_name: Option<&str>,
    ) -> Result<(), ControllerError> {
        let scheduling_party_name = scheduling_party_name.trim();
        if scheduling_party_name.is_empty() {
            let message = "Scheduling party name is required";
            self.alert.show(AlertKind::Error, message);
            return Err(ControllerError::Validation(message.to_string()));
        }

        let request = AppointmentCreateRequest {
            scheduling_party_name: scheduling_party_name.to_string(),
            joining_party_name: joining_party_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        };

        let seq = self.next_seq();
        match self.api.create_appointment(&request).await {
            Ok(snapshot) => {
                self.apply_snapshot(Some(snapshot), seq);
                Ok(())
            }
            Err(e) => self.fail_action(e),
        }
    }

    /// Ask the backend to attach a meeting to the current appointment.
    pub async fn create_meeting(&self) -> Result<(), ControllerError> {
        let seq = self.next_seq();
        match self.api.create_meeting().await {
            Ok(snapshot) => {
                self.apply_snapshot(Some(snapshot), seq);
                Ok(())
            }
            Err(e) => self.fail_action(e),
        }
    }

    /// Delete the appointment. On success the snapshot clears, the frame
    /// resets to blank and a confirmation shows in the alert slot.
    pub async fn delete_appointment(&self) -> Result<(), ControllerError> {
        let seq = self.next_seq();
        match self.api.delete_appointment().await {
            Ok(()) => {
                self.apply_snapshot(None, seq);
                self.alert.show(AlertKind::Info, "Appointment deleted");
                Ok(())
            }
            Err(e) => self.fail_action(e),
        }
    }

    /// Hand the joining party's link to the shell for clipboard use.
    pub fn copy_joining_link(&self) -> Result<String, ControllerError> {
        let url = self
            .snapshot
            .lock()
            .as_ref()
            .and_then(|s| s.meeting.as_ref())
            .map(|m| m.joining_party_url.clone());

        match url {
            Some(url) => {
                self.alert.show(AlertKind::Info, "Joining link copied");
                Ok(url)
            }
            None => {
                let message = "No meeting link to copy yet";
                self.alert.show(AlertKind::Error, message);
                Err(ControllerError::Validation(message.to_string()))
            }
        }
    }

    /// Load-completion signal from the embedded frame.
    pub fn frame_load_completed(&self) {
        self.frame.lock().load_completed();
    }

    /// Surface a failed user action: alert, no state mutation.
    fn fail_action(&self, e: RemoteError) -> Result<(), ControllerError> {
        self.alert.show(AlertKind::Error, &e.to_string());
        Err(e.into())
    }

    /// Sequence number of the response currently applied.
    pub fn applied_seq(&self) -> u64 {
        self.applied_seq.load(Ordering::SeqCst)
    }

    /// Compute the full presentation surface from current state.
    pub fn render(&self) -> RenderModel {
        let snapshot = self.snapshot.lock().clone();
        let view = derive_view(snapshot.as_ref());
        let frame = self.frame.lock().clone();

        RenderModel {
            scheduling_view: view.scheduling,
            joining_view: view.joining,
            scheduling_party_name: view.render.scheduling_party_name,
            joining_party_name: view.render.joining_party_name,
            scheduling_url: view.render.scheduling_url,
            joining_url: view.render.joining_url,
            alert: self.alert.current(),
            frame_phase: frame.phase(),
            frame_target: frame.target().to_string(),
            frame_placeholder: frame.placeholder(),
            notes_status: self.notes.status().to_string(),
            polling: self.poller.is_active(),
        }
    }
}
