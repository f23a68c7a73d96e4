//! Pure business services. No I/O, no persistence dependencies.

pub mod pricing;
pub mod reconciliation;
