use chrono::{DateTime, Duration, Local, Utc};
use tracing::{Span, field::display};

use crate::domain::{InactiveCustomer, OrderPolicy};
use crate::purge_log::PurgeLog;
use crate::store::{CustomerStore, PurgeOutcome};
use crate::utils::error_chain_fmt;

#[derive(Debug, Clone)]
pub struct PurgeSettings {
    pub inactivity_days: u32,
    pub order_policy: OrderPolicy,
}

impl Default for PurgeSettings {
    fn default() -> Self {
        Self {
            inactivity_days: 365,
            order_policy: OrderPolicy::default(),
        }
    }
}

#[derive(thiserror::Error)]
pub enum PurgeError {
    #[error("An inactivity window of {0} days is out of range.")]
    InvalidWindow(u32),
    #[error("Failed to purge inactive customers.")]
    Store(#[source] anyhow::Error),
}

impl std::fmt::Debug for PurgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Start of the activity window. Orders created at or after it keep their customer.
pub fn cutoff(now: DateTime<Utc>, inactivity_days: u32) -> Result<DateTime<Utc>, PurgeError> {
    if inactivity_days == 0 {
        return Err(PurgeError::InvalidWindow(inactivity_days));
    }
    Duration::try_days(i64::from(inactivity_days))
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or(PurgeError::InvalidWindow(inactivity_days))
}

/// Deletes every customer without an order inside the window ending at `now`.
/// `deleted_customers` of the outcome is captured before the delete runs.
#[tracing::instrument(
    skip(store, settings),
    fields(
        inactivity_days = settings.inactivity_days,
        order_policy = %settings.order_policy,
        cutoff = tracing::field::Empty,
    )
)]
pub async fn purge_inactive_customers<S: CustomerStore>(
    store: &S,
    now: DateTime<Utc>,
    settings: &PurgeSettings,
) -> Result<PurgeOutcome, PurgeError> {
    let cutoff = cutoff(now, settings.inactivity_days)?;
    Span::current().record("cutoff", display(cutoff));

    let outcome = store
        .purge_inactive_customers(cutoff, settings.order_policy, now)
        .await
        .map_err(PurgeError::Store)?;

    tracing::info!(
        deleted_customers = outcome.deleted_customers,
        deleted_orders = outcome.deleted_orders,
        archived_orders = outcome.archived_orders,
        retained_customers = outcome.retained_customers,
        "Inactive customer purge completed"
    );
    Ok(outcome)
}

/// Lists the customers a purge at `now` would delete, without deleting anything.
#[tracing::instrument(skip(store, settings), fields(inactivity_days = settings.inactivity_days))]
pub async fn preview_inactive_customers<S: CustomerStore>(
    store: &S,
    now: DateTime<Utc>,
    settings: &PurgeSettings,
) -> Result<Vec<InactiveCustomer>, PurgeError> {
    let cutoff = cutoff(now, settings.inactivity_days)?;
    let candidates = store
        .find_inactive_customers(cutoff)
        .await
        .map_err(PurgeError::Store)?;

    let candidates: Vec<InactiveCustomer> = candidates
        .into_iter()
        .filter(|c| settings.order_policy != OrderPolicy::Protect || !c.has_order_history())
        .collect();
    for candidate in &candidates {
        tracing::info!(
            customer_id = candidate.customer.id,
            customer_email = %candidate.customer.email,
            historical_orders = candidate.historical_orders,
            "Customer would be purged"
        );
    }
    Ok(candidates)
}

/// Runs a purge and records it in `log`.
///
/// The log entry is written after the purge has committed. A failed append is
/// reported but does not fail the run, since the deletion already happened.
pub async fn run<S: CustomerStore>(
    store: &S,
    log: &PurgeLog,
    now: DateTime<Utc>,
    settings: &PurgeSettings,
) -> Result<PurgeOutcome, PurgeError> {
    let outcome = purge_inactive_customers(store, now, settings).await?;

    let local_now = now.with_timezone(&Local).naive_local();
    if let Err(e) = log.append(local_now, outcome.deleted_customers).await {
        tracing::error!(
            error.cause_chain = ?e,
            error.message = %e,
            log_file = %log.path().display(),
            "Failed to record the purge in the log file"
        );
    }
    Ok(outcome)
}
