//! Wire types for the appointment resource.
//!
//! Field names on the wire are camelCase, matching the backend contract.
//! The snapshot is replaced wholesale on every successful fetch and never
//! mutated in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which meeting provider produced the URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Real,
    Mock,
}

/// Meeting session attached to an appointment. Immutable once attached.
///
/// Either absent from the snapshot or fully populated; a meeting object
/// missing any URL field fails deserialization, so partial meeting data
/// never reaches the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingInfo {
    pub provider: Provider,
    pub base_url: String,
    pub scheduling_party_url: String,
    pub joining_party_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Host-privilege token from the provider. Carried opaquely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_token: Option<String>,
}

/// Complete current state of the server-held appointment, as last fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentSnapshot {
    #[serde(default)]
    pub appointment_id: String,
    pub scheduling_party_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joining_party_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting: Option<MeetingInfo>,
    /// Last backend-recorded failure, independent of client-side fetch errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Body of `POST /api/appointment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentCreateRequest {
    pub scheduling_party_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joining_party_name: Option<String>,
}

/// Response envelope shared by every appointment endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentEnvelope {
    pub appointment: Option<AppointmentSnapshot>,
}
