//! Domain layer for the marketplace backend.
//!
//! This crate contains:
//! - Domain models (Booking, CommissionRecord, DiscountCode, ...)
//! - Pure business services (pricing arithmetic, orphan reconciliation)
//! - Domain error types

pub mod models;
pub mod services;
