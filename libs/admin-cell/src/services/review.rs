use chrono::{Months, Utc};
use serde_json::{json, Value};
use tracing::info;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use subscription_cell::models::Subscription;

use crate::models::{AdminError, ReviewAction};

/// Applies manual review decisions to submitted subscriptions.
pub struct ReviewService {
    supabase: SupabaseClient,
}

impl ReviewService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Apply a review decision to a pending subscription. Approval opens
    /// a one-calendar-month validity window starting now; rejection only
    /// flips the status. A finalized subscription is never re-reviewed.
    pub async fn act(
        &self,
        subscription_id: &str,
        action: ReviewAction,
    ) -> Result<Subscription, AdminError> {
        let current = self.fetch(subscription_id).await?;

        if !current.status.can_transition_to(action.target_status()) {
            return Err(AdminError::AlreadyFinalized(current.status));
        }

        let path = format!("/rest/v1/subscriptions?id=eq.{}", subscription_id);
        let rows = self
            .supabase
            .update_rows(&path, review_patch(action))
            .await
            .map_err(|e| AdminError::DatabaseError(e.to_string()))?;

        let updated = rows.into_iter().next().ok_or_else(|| {
            AdminError::DatabaseError(format!(
                "Update of subscription {} returned no rows",
                subscription_id
            ))
        })?;

        let subscription: Subscription = serde_json::from_value(updated)
            .map_err(|e| AdminError::DatabaseError(format!("Malformed subscription row: {}", e)))?;

        info!(
            subscription_id = %subscription.id,
            status = %subscription.status,
            "Subscription reviewed"
        );

        Ok(subscription)
    }

    async fn fetch(&self, subscription_id: &str) -> Result<Subscription, AdminError> {
        let path = format!("/rest/v1/subscriptions?id=eq.{}", subscription_id);
        let rows: Vec<Value> = self
            .supabase
            .select(&path)
            .await
            .map_err(|e| AdminError::DatabaseError(e.to_string()))?;

        let row = rows.into_iter().next().ok_or(AdminError::NotFound)?;

        serde_json::from_value(row)
            .map_err(|e| AdminError::DatabaseError(format!("Malformed subscription row: {}", e)))
    }
}

fn review_patch(action: ReviewAction) -> Value {
    match action {
        ReviewAction::Approve => {
            let start_date = Utc::now();
            // Overflow is unreachable for any plausible clock.
            let end_date = start_date
                .checked_add_months(Months::new(1))
                .unwrap_or(start_date);
            json!({
                "status": action.target_status(),
                "start_date": start_date,
                "end_date": end_date,
            })
        }
        ReviewAction::Reject => json!({ "status": action.target_status() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn approve_patch_opens_validity_window() {
        let patch = review_patch(ReviewAction::Approve);

        assert_eq!(patch["status"], "approved");

        let start: DateTime<Utc> = serde_json::from_value(patch["start_date"].clone()).unwrap();
        let end: DateTime<Utc> = serde_json::from_value(patch["end_date"].clone()).unwrap();
        assert_eq!(start.checked_add_months(Months::new(1)), Some(end));
    }

    #[test]
    fn reject_patch_touches_only_the_status() {
        let patch = review_patch(ReviewAction::Reject);

        assert_eq!(patch["status"], "rejected");
        assert_eq!(patch.as_object().map(|o| o.len()), Some(1));
    }
}
