use anyhow::Result;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{HealthReport, NewHealthReport};

/// Persistence layer for the `health_reports` collection.
pub struct ReportStore {
    supabase: SupabaseClient,
}

impl ReportStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Insert a report row and return the stored id.
    pub async fn insert_report(&self, report: &NewHealthReport) -> Result<String> {
        let row = self.supabase.insert_row("health_reports", json!(report)).await?;

        let id = row["id"]
            .as_str()
            .map(|s| s.to_string())
            .unwrap_or_default();

        debug!("Stored health report {}", id);
        Ok(id)
    }

    /// All reports owned by one user, newest first.
    pub async fn reports_for_user(&self, user_id: &str) -> Result<Vec<HealthReport>> {
        let path = format!(
            "/rest/v1/health_reports?user_id=eq.{}&order=created_at.desc",
            user_id
        );

        let rows: Vec<Value> = self.supabase.select(&path).await?;

        let reports = rows
            .into_iter()
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect();

        Ok(reports)
    }
}
