//! Repository implementations for database operations.

pub mod api_key;
pub mod booking;
pub mod commission;
pub mod discount_code;
pub mod emergency_alert;
pub mod location;
pub mod payment;
pub mod stats;
pub mod support_ticket;
pub mod therapist;

pub use api_key::ApiKeyRepository;
pub use booking::{BookingInput, BookingListQuery, BookingRepository};
pub use commission::{CommissionInput, CommissionRepository, UnpaidSummary};
pub use discount_code::{DiscountCodeRepository, DiscountStats, GenerateOutcome};
pub use emergency_alert::EmergencyAlertRepository;
pub use location::LocationRepository;
pub use payment::PaymentRepository;
pub use stats::{CommissionTotals, StatsRepository, StatusCount};
pub use support_ticket::SupportTicketRepository;
pub use therapist::TherapistRepository;
