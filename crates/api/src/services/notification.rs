//! Outbound push notification delivery.
//!
//! Handlers never await delivery; [`NotificationService::dispatch`] spawns
//! the send so a slow or dead push endpoint cannot stall a booking request.
//! Payloads are signed with HMAC-SHA256 and retried with backoff on
//! transient failures. One service (and its connection pool) is built at
//! startup and shared through the app state.

use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Serialize;
use sha2::Sha256;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::NotificationConfig;

/// Signature header on outbound notification requests.
const SIGNATURE_HEADER: &str = "X-Signature";

/// Base delay between retry attempts.
const RETRY_BASE_DELAY_MS: u64 = 500;

/// Errors that can occur during notification delivery.
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HMAC signing error: {0}")]
    SigningError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Delivery exhausted after {attempts} attempts, last status {last_status:?}")]
    Exhausted {
        attempts: u32,
        last_status: Option<u16>,
    },
}

/// Envelope sent to the push endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationEnvelope<'a> {
    event: &'a str,
    sent_at: i64,
    data: &'a serde_json::Value,
}

/// Service for delivering push notifications.
///
/// Cloning is cheap; the underlying HTTP client is shared.
#[derive(Clone)]
pub struct NotificationService {
    config: NotificationConfig,
    client: Client,
}

impl NotificationService {
    /// Create a new notification service.
    pub fn new(config: NotificationConfig) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { config, client })
    }

    /// Deliver one event. Retries on timeouts, 429 and 5xx responses up to
    /// the configured attempt cap.
    pub async fn send(
        &self,
        event: &str,
        data: &serde_json::Value,
    ) -> Result<(), NotificationError> {
        if !self.config.enabled {
            debug!(event = event, "Notification delivery disabled, skipping");
            return Ok(());
        }

        let envelope = NotificationEnvelope {
            event,
            sent_at: chrono::Utc::now().timestamp_millis(),
            data,
        };
        let body = serde_json::to_string(&envelope)?;
        let signature = self.sign_payload(&body)?;

        let mut last_status: Option<u16> = None;
        for attempt in 1..=self.config.max_attempts {
            let result = self
                .client
                .post(&self.config.push_url)
                .header("Content-Type", "application/json")
                .header(SIGNATURE_HEADER, &signature)
                .body(body.clone())
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        info!(event = event, attempt = attempt, "Notification delivered");
                        return Ok(());
                    }
                    last_status = Some(status.as_u16());
                    // 4xx other than 429 will not improve with a retry
                    if status.is_client_error() && status.as_u16() != 429 {
                        break;
                    }
                    warn!(
                        event = event,
                        attempt = attempt,
                        status = status.as_u16(),
                        "Notification delivery returned retryable status"
                    );
                }
                Err(e) => {
                    warn!(
                        event = event,
                        attempt = attempt,
                        error = %e,
                        "Notification delivery failed"
                    );
                }
            }

            if attempt < self.config.max_attempts {
                let delay = RETRY_BASE_DELAY_MS * 2u64.pow(attempt - 1);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }

        Err(NotificationError::Exhausted {
            attempts: self.config.max_attempts,
            last_status,
        })
    }

    /// Sign the payload with HMAC-SHA256 using the shared secret.
    fn sign_payload(&self, payload: &str) -> Result<String, NotificationError> {
        type HmacSha256 = Hmac<Sha256>;

        let mut mac = HmacSha256::new_from_slice(self.config.signing_secret.as_bytes())
            .map_err(|e| NotificationError::SigningError(e.to_string()))?;

        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(format!("sha256={}", signature))
    }

    /// Fire-and-forget delivery of one event.
    pub fn dispatch(&self, event: &'static str, data: serde_json::Value) {
        if !self.config.enabled {
            debug!(event = event, "Notification delivery disabled, skipping");
            return;
        }
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(e) = service.send(event, &data).await {
                warn!(event = event, error = %e, "Notification dropped");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(enabled: bool) -> NotificationConfig {
        NotificationConfig {
            enabled,
            push_url: "https://push.example.com/notify".to_string(),
            signing_secret: "test-secret".to_string(),
            timeout_ms: 1000,
            max_attempts: 2,
        }
    }

    #[test]
    fn test_disabled_delivery_is_a_noop() {
        let service = NotificationService::new(config(false)).unwrap();
        let result = tokio_test::block_on(service.send("booking.created", &json!({"x": 1})));
        assert!(result.is_ok());
    }

    #[test]
    fn test_dispatch_disabled_never_spawns() {
        // No tokio runtime here; dispatch would panic if it reached spawn
        let service = NotificationService::new(config(false)).unwrap();
        service.dispatch("booking.created", json!({"x": 1}));
    }

    #[test]
    fn test_signature_format() {
        let service = NotificationService::new(config(true)).unwrap();
        let signature = service.sign_payload(r#"{"event":"test"}"#).unwrap();
        assert!(signature.starts_with("sha256="));
        // 32-byte digest hex encoded
        assert_eq!(signature.len(), "sha256=".len() + 64);
    }

    #[test]
    fn test_signature_is_deterministic() {
        let service = NotificationService::new(config(true)).unwrap();
        let a = service.sign_payload("payload").unwrap();
        let b = service.sign_payload("payload").unwrap();
        assert_eq!(a, b);
        let c = service.sign_payload("other").unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_envelope_serialization() {
        let data = json!({"bookingId": "abc"});
        let envelope = NotificationEnvelope {
            event: "booking.created",
            sent_at: 1_724_700_000_000,
            data: &data,
        };
        let body = serde_json::to_string(&envelope).unwrap();
        assert!(body.contains(r#""event":"booking.created""#));
        assert!(body.contains(r#""sentAt""#));
    }
}
