//! Provider (therapist/place/facial clinic) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Kind of provider profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    Therapist,
    Place,
    Facial,
}

impl ProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Therapist => "therapist",
            ProviderType::Place => "place",
            ProviderType::Facial => "facial",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "therapist" => Some(ProviderType::Therapist),
            "place" => Some(ProviderType::Place),
            "facial" => Some(ProviderType::Facial),
            _ => None,
        }
    }
}

/// Provider availability as shown to customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,
    Busy,
    Offline,
}

impl AvailabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::Available => "available",
            AvailabilityStatus::Busy => "busy",
            AvailabilityStatus::Offline => "offline",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(AvailabilityStatus::Available),
            "busy" => Some(AvailabilityStatus::Busy),
            "offline" => Some(AvailabilityStatus::Offline),
            _ => None,
        }
    }
}

/// A service provider on the marketplace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Therapist {
    pub id: i64,
    pub therapist_id: Uuid,
    pub name: String,
    pub provider_type: ProviderType,
    pub city: String,
    pub country_code: String,
    pub status: AvailabilityStatus,
    pub booking_enabled: bool,
    pub schedule_enabled: bool,
    pub deactivation_reason: Option<String>,
    /// Map of duration in minutes to price in IDR, e.g. `{"60": 200000}`.
    pub pricing: Option<serde_json::Value>,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Therapist {
    /// Whether new bookings may be created against this provider.
    pub fn is_bookable(&self) -> bool {
        self.booking_enabled && self.status == AvailabilityStatus::Available
    }
}

/// Request payload for registering a provider.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTherapistRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    pub provider_type: ProviderType,

    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,

    #[validate(length(equal = 2, message = "Country code must be 2 letters"))]
    pub country_code: String,

    pub pricing: Option<serde_json::Value>,

    #[validate(url(message = "Profile image must be a valid URL"))]
    pub profile_image_url: Option<String>,
}

/// Request payload for updating a provider profile (partial update).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTherapistRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "City must be 1-100 characters"))]
    pub city: Option<String>,

    pub pricing: Option<serde_json::Value>,

    #[validate(url(message = "Profile image must be a valid URL"))]
    pub profile_image_url: Option<String>,
}

/// Request payload for updating availability.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAvailabilityRequest {
    pub status: AvailabilityStatus,
}

/// Response payload for provider operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TherapistResponse {
    pub therapist_id: Uuid,
    pub name: String,
    pub provider_type: ProviderType,
    pub city: String,
    pub country_code: String,
    pub status: AvailabilityStatus,
    pub booking_enabled: bool,
    pub schedule_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deactivation_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Therapist> for TherapistResponse {
    fn from(t: Therapist) -> Self {
        Self {
            therapist_id: t.therapist_id,
            name: t.name,
            provider_type: t.provider_type,
            city: t.city,
            country_code: t.country_code,
            status: t.status,
            booking_enabled: t.booking_enabled,
            schedule_enabled: t.schedule_enabled,
            deactivation_reason: t.deactivation_reason,
            pricing: t.pricing,
            profile_image_url: t.profile_image_url,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Response for listing providers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTherapistsResponse {
    pub therapists: Vec<TherapistResponse>,
    pub total: usize,
}

/// Query parameters for listing providers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTherapistsQuery {
    pub city: Option<String>,
    pub status: Option<AvailabilityStatus>,
    pub provider_type: Option<ProviderType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn therapist(status: AvailabilityStatus, booking_enabled: bool) -> Therapist {
        Therapist {
            id: 1,
            therapist_id: Uuid::new_v4(),
            name: "Putu".to_string(),
            provider_type: ProviderType::Therapist,
            city: "Denpasar".to_string(),
            country_code: "ID".to_string(),
            status,
            booking_enabled,
            schedule_enabled: true,
            deactivation_reason: None,
            pricing: None,
            profile_image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_bookable() {
        assert!(therapist(AvailabilityStatus::Available, true).is_bookable());
        assert!(!therapist(AvailabilityStatus::Busy, true).is_bookable());
        assert!(!therapist(AvailabilityStatus::Offline, true).is_bookable());
        assert!(!therapist(AvailabilityStatus::Available, false).is_bookable());
    }

    #[test]
    fn test_provider_type_roundtrip() {
        for t in [ProviderType::Therapist, ProviderType::Place, ProviderType::Facial] {
            assert_eq!(ProviderType::parse(t.as_str()), Some(t));
        }
        assert_eq!(ProviderType::parse("salon"), None);
    }

    #[test]
    fn test_availability_roundtrip() {
        for s in [
            AvailabilityStatus::Available,
            AvailabilityStatus::Busy,
            AvailabilityStatus::Offline,
        ] {
            assert_eq!(AvailabilityStatus::parse(s.as_str()), Some(s));
        }
    }

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterTherapistRequest {
            name: "Putu".to_string(),
            provider_type: ProviderType::Therapist,
            city: "Denpasar".to_string(),
            country_code: "ID".to_string(),
            pricing: None,
            profile_image_url: None,
        };
        assert!(ok.validate().is_ok());

        let bad = RegisterTherapistRequest {
            country_code: "IDN".to_string(),
            ..ok
        };
        assert!(bad.validate().is_err());
    }
}
