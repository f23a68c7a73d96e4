//! Background job scheduler and job implementations.

mod booking_expiry;
mod commission_overdue;
mod reconciliation;
mod scheduler;

pub use booking_expiry::BookingExpiryJob;
pub use commission_overdue::CommissionOverdueJob;
pub use reconciliation::ReconciliationJob;
pub use scheduler::JobScheduler;
