use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AdminError, AdminStats};

/// Read-only aggregates and listings for the admin dashboard.
pub struct ReportingService {
    supabase: SupabaseClient,
}

impl ReportingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Dashboard totals. Both collections are fetched concurrently and
    /// reduced in a single pass each.
    pub async fn stats(&self) -> Result<AdminStats, AdminError> {
        let (reports, bookings) = tokio::join!(
            self.supabase
                .select("/rest/v1/health_reports?select=user_id"),
            self.supabase
                .select("/rest/v1/doctor_bookings?select=status,amount"),
        );

        let reports = reports.map_err(|e| AdminError::DatabaseError(e.to_string()))?;
        let bookings = bookings.map_err(|e| AdminError::DatabaseError(e.to_string()))?;

        Ok(AdminStats {
            total_users: unique_user_count(&reports),
            total_reports: reports.len(),
            total_bookings: bookings.len(),
            total_revenue: booking_revenue(&bookings),
            pending_bookings: count_status(&bookings, "pending"),
            completed_bookings: count_status(&bookings, "completed"),
        })
    }

    pub async fn all_reports(&self) -> Result<Vec<Value>, AdminError> {
        self.list("/rest/v1/health_reports?order=created_at.desc")
            .await
    }

    pub async fn all_bookings(&self) -> Result<Vec<Value>, AdminError> {
        self.list("/rest/v1/doctor_bookings?order=created_at.desc")
            .await
    }

    pub async fn all_subscriptions(&self) -> Result<Vec<Value>, AdminError> {
        self.list("/rest/v1/subscriptions?order=created_at.desc")
            .await
    }

    async fn list(&self, path: &str) -> Result<Vec<Value>, AdminError> {
        let rows = self
            .supabase
            .select(path)
            .await
            .map_err(|e| AdminError::DatabaseError(e.to_string()))?;

        debug!("Fetched {} rows from {}", rows.len(), path);

        Ok(rows)
    }
}

/// Distinct owners across report rows. Anonymous uploads carry a null
/// user_id and do not count.
fn unique_user_count(reports: &[Value]) -> usize {
    reports
        .iter()
        .filter_map(|row| row["user_id"].as_str())
        .collect::<HashSet<_>>()
        .len()
}

fn booking_revenue(bookings: &[Value]) -> i64 {
    bookings
        .iter()
        .map(|row| row["amount"].as_i64().unwrap_or(0))
        .sum()
}

fn count_status(bookings: &[Value], status: &str) -> usize {
    bookings.iter().filter(|row| row["status"] == status).count()
}
