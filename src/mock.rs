//! In-memory backend for demos and tests.
//!
//! Mirrors the real backend contract: a single appointment slot plus a mock
//! meeting provider that fabricates joinable URLs without any external API.

use chrono::Utc;
use parking_lot::Mutex;
use url::Url;
use uuid::Uuid;

use crate::error::RemoteError;
use crate::remote::BackendApi;
use crate::types::{AppointmentCreateRequest, AppointmentSnapshot, MeetingInfo, Provider};

const DEFAULT_HOST: &str = "mock.meet.local";

/// Single-slot in-memory appointment store with a mock meeting provider.
pub struct MockBackend {
    host: String,
    appointment: Mutex<Option<AppointmentSnapshot>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::with_host(DEFAULT_HOST)
    }

    pub fn with_host(host: &str) -> Self {
        Self {
            host: host.to_string(),
            appointment: Mutex::new(None),
        }
    }

    /// Build the three meeting URLs: a shared base carrying the room id and
    /// pin, plus auto-join variants for each party. The scheduling party's
    /// URL additionally carries the host token.
    fn build_meeting(&self, scheduling_name: &str, joining_name: &str) -> Result<MeetingInfo, RemoteError> {
        let meeting_id = Uuid::new_v4().simple().to_string()[..10].to_uppercase();
        let pin = format!("{:06}", Uuid::new_v4().as_u128() % 1_000_000);

        let base = Url::parse_with_params(
            &format!("https://{}/guest", self.host),
            [("meetingId", meeting_id.as_str()), ("pwd", pin.as_str())],
        )
        .map_err(|e| RemoteError::Api {
            status: 500,
            message: format!("Invalid mock meeting host: {e}"),
        })?;

        let host_token = "mock-host-token";
        let scheduling_url = with_params(
            &base,
            &[
                ("name", scheduling_name),
                ("autoJoin", "true"),
                ("hostToken", host_token),
            ],
        );
        let joining_url = with_params(&base, &[("name", joining_name), ("autoJoin", "true")]);

        Ok(MeetingInfo {
            provider: Provider::Mock,
            base_url: base.to_string(),
            scheduling_party_url: scheduling_url.to_string(),
            joining_party_url: joining_url.to_string(),
            created_at: Some(Utc::now()),
            host_token: Some(host_token.to_string()),
        })
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Append query parameters, replacing any existing values for the same keys.
fn with_params(base: &Url, params: &[(&str, &str)]) -> Url {
    let existing: Vec<(String, String)> = base
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut url = base.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &existing {
            if !params.iter().any(|(pk, _)| pk == k) {
                pairs.append_pair(k, v);
            }
        }
        for (k, v) in params {
            pairs.append_pair(k, v);
        }
    }
    url
}

#[async_trait::async_trait]
impl BackendApi for MockBackend {
    async fn fetch_appointment(&self) -> Result<Option<AppointmentSnapshot>, RemoteError> {
        Ok(self.appointment.lock().clone())
    }

    async fn create_appointment(
        &self,
        req: &AppointmentCreateRequest,
    ) -> Result<AppointmentSnapshot, RemoteError> {
        let snapshot = AppointmentSnapshot {
            appointment_id: Uuid::new_v4().simple().to_string(),
            scheduling_party_name: req.scheduling_party_name.trim().to_string(),
            joining_party_name: req
                .joining_party_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            created_at: Some(Utc::now()),
            meeting: None,
            last_error: None,
        };
        // Creating replaces any existing appointment
        *self.appointment.lock() = Some(snapshot.clone());
        Ok(snapshot)
    }

    async fn create_meeting(&self) -> Result<AppointmentSnapshot, RemoteError> {
        let mut guard = self.appointment.lock();
        let appointment = guard.as_mut().ok_or(RemoteError::Api {
            status: 404,
            message: "No appointment".to_string(),
        })?;

        let joining_name = appointment
            .joining_party_name
            .clone()
            .unwrap_or_else(|| "Guest".to_string());
        let meeting = self.build_meeting(&appointment.scheduling_party_name, &joining_name)?;

        appointment.meeting = Some(meeting);
        appointment.last_error = None;
        Ok(appointment.clone())
    }

    async fn delete_appointment(&self) -> Result<(), RemoteError> {
        *self.appointment.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_meeting_requires_appointment() {
        let backend = MockBackend::new();
        let err = backend.create_meeting().await.unwrap_err();
        assert!(err.is_gone());
    }

    #[tokio::test]
    async fn test_mock_meeting_urls_carry_party_params() {
        let backend = MockBackend::new();
        backend
            .create_appointment(&AppointmentCreateRequest {
                scheduling_party_name: "Dr. A".to_string(),
                joining_party_name: Some("Pat B".to_string()),
            })
            .await
            .unwrap();

        let snapshot = backend.create_meeting().await.unwrap();
        let meeting = snapshot.meeting.unwrap();

        assert_eq!(meeting.provider, Provider::Mock);
        assert!(meeting.base_url.contains("meetingId="));
        assert!(meeting.scheduling_party_url.contains("hostToken=mock-host-token"));
        assert!(meeting.scheduling_party_url.contains("autoJoin=true"));
        assert!(!meeting.joining_party_url.contains("hostToken"));
        assert!(meeting.joining_party_url.contains("name=Pat"));
    }

    #[tokio::test]
    async fn test_create_replaces_existing_appointment() {
        let backend = MockBackend::new();
        for name in ["Dr. A", "Dr. B"] {
            backend
                .create_appointment(&AppointmentCreateRequest {
                    scheduling_party_name: name.to_string(),
                    joining_party_name: None,
                })
                .await
                .unwrap();
        }

        let current = backend.fetch_appointment().await.unwrap().unwrap();
        assert_eq!(current.scheduling_party_name, "Dr. B");
        assert!(current.meeting.is_none());
    }
}
