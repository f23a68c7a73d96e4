//! Domain models for the marketplace.

pub mod booking;
pub mod commission;
pub mod discount_code;
pub mod emergency_alert;
pub mod location;
pub mod payment;
pub mod support_ticket;
pub mod therapist;

pub use booking::{Booking, BookingStatus};
pub use commission::{CommissionRecord, CommissionStatus};
pub use discount_code::{DiscountCode, DiscountCodeState, DiscountRejection};
pub use emergency_alert::{AlertStatus, EmergencyAlert};
pub use location::{City, Country};
pub use payment::{PaymentMethod, PaymentStatus, PaymentTransaction};
pub use support_ticket::{SupportTicket, TicketPriority, TicketStatus};
pub use therapist::{AvailabilityStatus, ProviderType, Therapist};
