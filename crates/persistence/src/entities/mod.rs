//! Database entity definitions.
//!
//! Entities are direct mappings to database rows. Status columns are stored
//! as TEXT; conversion to domain enums is fallible and surfaces as
//! [`EntityError`] so a corrupted row never panics a request.

use thiserror::Error;

pub mod api_key;
pub mod booking;
pub mod commission_record;
pub mod discount_code;
pub mod emergency_alert;
pub mod location;
pub mod payment_transaction;
pub mod support_ticket;
pub mod therapist;

pub use api_key::ApiKeyEntity;
pub use booking::BookingEntity;
pub use commission_record::CommissionRecordEntity;
pub use discount_code::DiscountCodeEntity;
pub use emergency_alert::EmergencyAlertEntity;
pub use location::{CityEntity, CountryEntity};
pub use payment_transaction::PaymentTransactionEntity;
pub use support_ticket::SupportTicketEntity;
pub use therapist::TherapistEntity;

/// Row-to-model conversion failure.
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("invalid {column} value in {table} row: {value}")]
    InvalidColumn {
        table: &'static str,
        column: &'static str,
        value: String,
    },
}

impl EntityError {
    pub(crate) fn invalid(table: &'static str, column: &'static str, value: &str) -> Self {
        Self::InvalidColumn {
            table,
            column,
            value: value.to_string(),
        }
    }
}
