//! Commission overdue background job.
//!
//! Commissions unpaid five hours after acceptance go overdue: a flat late
//! fee is added and the provider is deactivated until an admin reactivates
//! them after settlement.

use sqlx::PgPool;
use tracing::{info, warn};

use persistence::repositories::{CommissionRepository, TherapistRepository};

use super::scheduler::{Job, JobFrequency};
use crate::config::Config;
use crate::middleware::metrics;

const DEACTIVATION_REASON: &str = "overdue commission payment";

/// Background job that marks overdue commissions and suspends their providers.
pub struct CommissionOverdueJob {
    pool: PgPool,
    late_fee: i64,
}

impl CommissionOverdueJob {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self {
            pool,
            late_fee: config.limits.late_fee_idr,
        }
    }
}

#[async_trait::async_trait]
impl Job for CommissionOverdueJob {
    fn name(&self) -> &'static str {
        "commission_overdue"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(5)
    }

    async fn execute(&self) -> Result<(), String> {
        let commissions = CommissionRepository::new(self.pool.clone());
        let therapists = TherapistRepository::new(self.pool.clone());

        let overdue = commissions
            .mark_overdue_past_deadline(self.late_fee)
            .await
            .map_err(|e| format!("Failed to mark overdue commissions: {}", e))?;

        if overdue.is_empty() {
            return Ok(());
        }

        metrics::record_commissions_overdue(overdue.len());

        for record in &overdue {
            warn!(
                commission_id = %record.commission_id,
                therapist_id = %record.therapist_id,
                late_fee = self.late_fee,
                "Commission went overdue"
            );

            // Deactivation is idempotent; a provider with several overdue
            // records is simply deactivated again.
            match therapists
                .deactivate(record.therapist_id, DEACTIVATION_REASON)
                .await
            {
                Ok(Some(_)) => {
                    info!(
                        therapist_id = %record.therapist_id,
                        "Provider deactivated for overdue commission"
                    );
                }
                Ok(None) => {
                    warn!(
                        therapist_id = %record.therapist_id,
                        "Overdue commission references an unknown provider"
                    );
                }
                Err(e) => {
                    return Err(format!(
                        "Failed to deactivate provider {}: {}",
                        record.therapist_id, e
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_sweep_runs_every_five_minutes() {
        let freq = JobFrequency::Minutes(5);
        assert_eq!(freq.duration(), Duration::from_secs(300));
    }

    #[test]
    fn test_deactivation_reason_is_stable() {
        // The reactivation flow surfaces this string to admins.
        assert_eq!(DEACTIVATION_REASON, "overdue commission payment");
    }
}
