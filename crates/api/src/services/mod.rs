//! Outbound integration services.

pub mod notification;

pub use notification::NotificationService;
