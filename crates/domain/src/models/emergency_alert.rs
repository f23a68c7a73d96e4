//! Emergency alert domain model.
//!
//! Providers raise an alert from the field; admin dashboards poll the
//! pending list and acknowledge. Acknowledgement is terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::{validate_latitude, validate_longitude};

/// Alert lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Pending,
    Acknowledged,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Pending => "pending",
            AlertStatus::Acknowledged => "acknowledged",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(AlertStatus::Pending),
            "acknowledged" => Some(AlertStatus::Acknowledged),
            _ => None,
        }
    }
}

/// An emergency alert raised by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyAlert {
    pub id: i64,
    pub alert_id: Uuid,
    pub therapist_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub latitude: f64,
    pub longitude: f64,
    pub note: Option<String>,
    pub status: AlertStatus,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for triggering an alert.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TriggerAlertRequest {
    pub therapist_id: Uuid,

    pub booking_id: Option<Uuid>,

    #[validate(custom(function = "validate_latitude"))]
    pub latitude: f64,

    #[validate(custom(function = "validate_longitude"))]
    pub longitude: f64,

    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}

/// Response payload for alert operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertResponse {
    pub alert_id: Uuid,
    pub therapist_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<Uuid>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub status: AlertStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledged_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<EmergencyAlert> for AlertResponse {
    fn from(a: EmergencyAlert) -> Self {
        Self {
            alert_id: a.alert_id,
            therapist_id: a.therapist_id,
            booking_id: a.booking_id,
            latitude: a.latitude,
            longitude: a.longitude,
            note: a.note,
            status: a.status,
            acknowledged_by: a.acknowledged_by,
            acknowledged_at: a.acknowledged_at,
            created_at: a.created_at,
        }
    }
}

/// Response for listing alerts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAlertsResponse {
    pub alerts: Vec<AlertResponse>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        assert_eq!(AlertStatus::parse("pending"), Some(AlertStatus::Pending));
        assert_eq!(
            AlertStatus::parse("acknowledged"),
            Some(AlertStatus::Acknowledged)
        );
        assert_eq!(AlertStatus::parse("resolved"), None);
    }

    #[test]
    fn test_trigger_request_validation() {
        let ok = TriggerAlertRequest {
            therapist_id: Uuid::new_v4(),
            booking_id: None,
            latitude: -8.65,
            longitude: 115.21,
            note: Some("Customer is acting aggressively".to_string()),
        };
        assert!(ok.validate().is_ok());

        let bad = TriggerAlertRequest {
            therapist_id: Uuid::new_v4(),
            booking_id: None,
            latitude: 95.0,
            longitude: 115.21,
            note: None,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_trigger_request_deserialization() {
        let json = r#"{
            "therapistId": "550e8400-e29b-41d4-a716-446655440000",
            "latitude": -8.65,
            "longitude": 115.21
        }"#;
        let request: TriggerAlertRequest = serde_json::from_str(json).unwrap();
        assert!(request.booking_id.is_none());
        assert!(request.note.is_none());
    }
}
