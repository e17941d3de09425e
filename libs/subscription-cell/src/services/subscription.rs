use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::User;

use crate::models::{
    plan_amount, NewSubscription, SubmitSubscriptionRequest, Subscription, SubscriptionError,
    SubscriptionStatus,
};

pub struct SubscriptionService {
    supabase: SupabaseClient,
}

impl SubscriptionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Submit a subscription for manual review. The amount comes from the
    /// plan catalog and the email/name snapshots come from the validated
    /// token, so neither can be forged by the client.
    pub async fn submit(
        &self,
        request: SubmitSubscriptionRequest,
        user: &User,
    ) -> Result<Subscription, SubscriptionError> {
        let plan = request
            .plan
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(SubscriptionError::MissingFields)?;

        let transaction_id = request
            .transaction_id
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(SubscriptionError::MissingFields)?;

        let amount =
            plan_amount(plan).ok_or_else(|| SubscriptionError::UnknownPlan(plan.to_string()))?;

        let subscription = NewSubscription {
            user_id: user.id.clone(),
            user_email: user.email.clone().unwrap_or_default(),
            user_name: user.display_name(),
            plan: plan.to_string(),
            amount,
            transaction_id: transaction_id.to_string(),
            upi_id: request.upi_id,
            status: SubscriptionStatus::Pending,
        };

        let row = self
            .supabase
            .insert_row("subscriptions", json!(subscription))
            .await
            .map_err(|e| SubscriptionError::DatabaseError(e.to_string()))?;

        let stored: Subscription = serde_json::from_value(row).map_err(|e| {
            SubscriptionError::DatabaseError(format!("Malformed subscription row: {}", e))
        })?;

        info!(
            subscription_id = %stored.id,
            plan = %stored.plan,
            amount = stored.amount,
            "Subscription submitted for review"
        );

        Ok(stored)
    }

    /// The caller's most recent approved subscription, if any, plus
    /// whether it is still inside its validity window.
    pub async fn status_for_user(
        &self,
        user_id: &str,
    ) -> Result<(Option<Subscription>, bool), SubscriptionError> {
        let path = format!(
            "/rest/v1/subscriptions?user_id=eq.{}&status=eq.approved&order=created_at.desc&limit=1",
            user_id
        );

        let rows: Vec<Value> = self
            .supabase
            .select(&path)
            .await
            .map_err(|e| SubscriptionError::DatabaseError(e.to_string()))?;

        debug!("Fetched {} approved subscription rows for {}", rows.len(), user_id);

        let subscription: Option<Subscription> = rows
            .into_iter()
            .next()
            .and_then(|row| serde_json::from_value(row).ok());

        let is_active = subscription
            .as_ref()
            .map(|sub| sub.is_active_at(Utc::now()))
            .unwrap_or(false);

        Ok((subscription, is_active))
    }
}
