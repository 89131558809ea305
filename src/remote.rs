//! HTTP client for the appointment backend.
//!
//! JSON in, JSON out, no automatic retries — retry policy belongs to the
//! caller (the next poll tick). Non-success responses are normalized into a
//! single `RemoteError` with a human-readable detail message.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use url::Url;

use crate::error::RemoteError;
use crate::types::{AppointmentCreateRequest, AppointmentEnvelope, AppointmentSnapshot};

const APPOINTMENT_PATH: &str = "/api/appointment";
const MEETING_PATH: &str = "/api/appointment/meeting";

/// The four backend operations the controller performs.
///
/// Trait seam so tests (and the mock demo mode) can substitute an in-memory
/// backend for the HTTP client.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn fetch_appointment(&self) -> Result<Option<AppointmentSnapshot>, RemoteError>;
    async fn create_appointment(
        &self,
        req: &AppointmentCreateRequest,
    ) -> Result<AppointmentSnapshot, RemoteError>;
    async fn create_meeting(&self) -> Result<AppointmentSnapshot, RemoteError>;
    async fn delete_appointment(&self) -> Result<(), RemoteError>;
}

/// Extract a display message from an error response body.
///
/// Precedence: JSON `detail` field, then JSON `message`, then the raw body
/// text, then a generic `HTTP {status}`.
fn error_detail(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                if !msg.trim().is_empty() {
                    return msg.trim().to_string();
                }
            }
        }
    }
    let raw = body.trim();
    if !raw.is_empty() {
        return raw.to_string();
    }
    format!("HTTP {status}")
}

/// reqwest-backed client for the appointment endpoint.
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RemoteClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Perform one JSON request. A 204 resolves to `None`; any non-2xx
    /// status becomes a `RemoteError::Api` with a normalized message.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Option<serde_json::Value>, RemoteError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let mut req = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let text = resp.text().await?;
        if !status.is_success() {
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message: error_detail(status.as_u16(), &text),
            });
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    fn parse_envelope(
        value: Option<serde_json::Value>,
    ) -> Result<Option<AppointmentSnapshot>, RemoteError> {
        match value {
            None => Ok(None),
            Some(value) => {
                let envelope: AppointmentEnvelope = serde_json::from_value(value)
                    .map_err(|e| RemoteError::Decode(e.to_string()))?;
                Ok(envelope.appointment)
            }
        }
    }
}

#[async_trait]
impl BackendApi for RemoteClient {
    async fn fetch_appointment(&self) -> Result<Option<AppointmentSnapshot>, RemoteError> {
        let value = self.request(Method::GET, APPOINTMENT_PATH, None).await?;
        Self::parse_envelope(value)
    }

    async fn create_appointment(
        &self,
        req: &AppointmentCreateRequest,
    ) -> Result<AppointmentSnapshot, RemoteError> {
        let body = serde_json::to_value(req).map_err(|e| RemoteError::Decode(e.to_string()))?;
        let value = self
            .request(Method::POST, APPOINTMENT_PATH, Some(&body))
            .await?;
        Self::parse_envelope(value)?
            .ok_or_else(|| RemoteError::Decode("response missing appointment".to_string()))
    }

    async fn create_meeting(&self) -> Result<AppointmentSnapshot, RemoteError> {
        let value = self.request(Method::POST, MEETING_PATH, None).await?;
        Self::parse_envelope(value)?
            .ok_or_else(|| RemoteError::Decode("response missing appointment".to_string()))
    }

    async fn delete_appointment(&self) -> Result<(), RemoteError> {
        self.request(Method::DELETE, APPOINTMENT_PATH, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_prefers_detail_field() {
        let body = r#"{"detail": "No appointment", "message": "other"}"#;
        assert_eq!(error_detail(404, body), "No appointment");
    }

    #[test]
    fn test_error_detail_falls_back_to_message_field() {
        let body = r#"{"message": "Unable to create meeting"}"#;
        assert_eq!(error_detail(502, body), "Unable to create meeting");
    }

    #[test]
    fn test_error_detail_falls_back_to_raw_text() {
        assert_eq!(error_detail(500, "boom"), "boom");
        // Non-string detail (e.g. a validation error list) falls through too
        let body = r#"{"detail": [{"loc": ["body"]}]}"#;
        assert_eq!(error_detail(422, body), body);
    }

    #[test]
    fn test_error_detail_generic_for_empty_body() {
        assert_eq!(error_detail(503, ""), "HTTP 503");
        assert_eq!(error_detail(503, "   "), "HTTP 503");
    }

    #[test]
    fn test_envelope_with_null_appointment() {
        let value = serde_json::json!({ "appointment": null });
        let parsed = RemoteClient::parse_envelope(Some(value)).unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_envelope_rejects_partial_meeting() {
        // A meeting object missing its URL fields must fail to parse rather
        // than produce a half-populated snapshot.
        let value = serde_json::json!({
            "appointment": {
                "schedulingPartyName": "Dr. A",
                "meeting": { "provider": "mock", "baseUrl": "https://x" }
            }
        });
        assert!(matches!(
            RemoteClient::parse_envelope(Some(value)),
            Err(RemoteError::Decode(_))
        ));
    }
}
