//! HTTP route handlers.

pub mod admin;
pub mod bookings;
pub mod commissions;
pub mod discount_codes;
pub mod emergency_alerts;
pub mod health;
pub mod locations;
pub mod payments;
pub mod support_tickets;
pub mod therapists;
