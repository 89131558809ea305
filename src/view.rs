//! Pure view-state reducer.
//!
//! Maps the current (nullable) appointment snapshot to exactly one named UI
//! state per role, plus the data the rendering layer needs. Both roles are
//! derived in lockstep from the same snapshot, so their states can never
//! disagree.

use serde::Serialize;

use crate::alert::{Alert, AlertKind};
use crate::types::AppointmentSnapshot;

/// View states for the scheduling party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulingView {
    /// No appointment exists.
    Empty,
    /// Appointment exists, meeting not yet created.
    Pending,
    /// Meeting exists and can be joined.
    Live,
}

/// View states for the joining party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JoiningView {
    None,
    Waiting,
    Ready,
}

/// Everything the rendering layer needs beyond the two state names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderData {
    pub scheduling_party_name: Option<String>,
    pub joining_party_name: Option<String>,
    pub scheduling_url: Option<String>,
    pub joining_url: Option<String>,
    /// Alert accompanying this transition: an error when the snapshot
    /// carries a backend-recorded failure, otherwise `None`, which the
    /// controller treats as "clear any previous alert".
    pub alert: Option<Alert>,
}

/// Output of one reduction: both role states plus render data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub scheduling: SchedulingView,
    pub joining: JoiningView,
    pub render: RenderData,
}

/// Derive both role views from the snapshot.
pub fn derive_view(snapshot: Option<&AppointmentSnapshot>) -> ViewState {
    let (scheduling, joining) = match snapshot {
        None => (SchedulingView::Empty, JoiningView::None),
        Some(snap) => match snap.meeting {
            None => (SchedulingView::Pending, JoiningView::Waiting),
            Some(_) => (SchedulingView::Live, JoiningView::Ready),
        },
    };

    let meeting = snapshot.and_then(|s| s.meeting.as_ref());
    let render = RenderData {
        scheduling_party_name: snapshot.map(|s| s.scheduling_party_name.clone()),
        joining_party_name: snapshot.and_then(|s| s.joining_party_name.clone()),
        scheduling_url: meeting.map(|m| m.scheduling_party_url.clone()),
        joining_url: meeting.map(|m| m.joining_party_url.clone()),
        alert: snapshot
            .and_then(|s| s.last_error.as_deref())
            .and_then(|msg| Alert::new(AlertKind::Error, msg)),
    };

    ViewState {
        scheduling,
        joining,
        render,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MeetingInfo, Provider};

    fn snapshot(meeting: Option<MeetingInfo>) -> AppointmentSnapshot {
        AppointmentSnapshot {
            appointment_id: "appt-1".to_string(),
            scheduling_party_name: "Dr. A".to_string(),
            joining_party_name: Some("Pat B".to_string()),
            created_at: None,
            meeting,
            last_error: None,
        }
    }

    fn meeting() -> MeetingInfo {
        MeetingInfo {
            provider: Provider::Mock,
            base_url: "https://x".to_string(),
            scheduling_party_url: "https://x/d".to_string(),
            joining_party_url: "https://x/p".to_string(),
            created_at: None,
            host_token: None,
        }
    }

    #[test]
    fn test_no_snapshot_yields_empty_and_none() {
        let view = derive_view(None);
        assert_eq!(view.scheduling, SchedulingView::Empty);
        assert_eq!(view.joining, JoiningView::None);
        assert_eq!(view.render.joining_url, None);
        assert_eq!(view.render.scheduling_party_name, None);
    }

    #[test]
    fn test_snapshot_without_meeting_yields_pending_and_waiting() {
        let snap = snapshot(None);
        let view = derive_view(Some(&snap));
        assert_eq!(view.scheduling, SchedulingView::Pending);
        assert_eq!(view.joining, JoiningView::Waiting);
        assert_eq!(view.render.scheduling_party_name.as_deref(), Some("Dr. A"));
        assert_eq!(view.render.joining_url, None);
    }

    #[test]
    fn test_snapshot_with_meeting_yields_live_and_ready() {
        let snap = snapshot(Some(meeting()));
        let view = derive_view(Some(&snap));
        assert_eq!(view.scheduling, SchedulingView::Live);
        assert_eq!(view.joining, JoiningView::Ready);
        assert_eq!(view.render.joining_url.as_deref(), Some("https://x/p"));
        assert_eq!(view.render.scheduling_url.as_deref(), Some("https://x/d"));
    }

    #[test]
    fn test_last_error_becomes_error_alert() {
        let mut snap = snapshot(None);
        snap.last_error = Some("meeting provider rejected the request".to_string());

        let view = derive_view(Some(&snap));
        let alert = view.render.alert.unwrap();
        assert_eq!(alert.kind, AlertKind::Error);
        assert_eq!(alert.message, "meeting provider rejected the request");
    }

    #[test]
    fn test_clean_snapshot_clears_alert() {
        let snap = snapshot(Some(meeting()));
        let view = derive_view(Some(&snap));
        assert!(view.render.alert.is_none());
    }
}
