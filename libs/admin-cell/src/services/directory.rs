use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AdminError, AdminUserView};

/// Aggregated activity for one user while the directory is being built.
#[derive(Default)]
struct ActivitySummary {
    email: Option<String>,
    name: Option<String>,
    first_seen: Option<DateTime<Utc>>,
    reports: usize,
    bookings: usize,
}

/// Builds the admin user directory from activity rows alone. Report and
/// booking rows carry email/name snapshots captured at submission time,
/// so the directory never fans out to the identity provider.
pub struct DirectoryService {
    supabase: SupabaseClient,
}

impl DirectoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn users(&self) -> Result<Vec<AdminUserView>, AdminError> {
        let (reports, bookings) = tokio::join!(
            self.supabase
                .select("/rest/v1/health_reports?select=user_id,user_email,created_at"),
            self.supabase
                .select("/rest/v1/doctor_bookings?select=user_id,name,email,created_at"),
        );

        let reports = reports.map_err(|e| AdminError::DatabaseError(e.to_string()))?;
        let bookings = bookings.map_err(|e| AdminError::DatabaseError(e.to_string()))?;

        let users = build_directory(&reports, &bookings);

        debug!(
            "Built directory of {} users from {} reports and {} bookings",
            users.len(),
            reports.len(),
            bookings.len()
        );

        Ok(users)
    }
}

fn build_directory(reports: &[Value], bookings: &[Value]) -> Vec<AdminUserView> {
    let mut summaries: HashMap<String, ActivitySummary> = HashMap::new();

    for row in reports {
        let Some(user_id) = row["user_id"].as_str() else {
            continue;
        };
        let entry = summaries.entry(user_id.to_string()).or_default();
        entry.reports += 1;
        merge_identity(entry, text(row, "user_email"), None);
        merge_first_seen(entry, timestamp(row));
    }

    for row in bookings {
        let Some(user_id) = row["user_id"].as_str() else {
            continue;
        };
        let entry = summaries.entry(user_id.to_string()).or_default();
        entry.bookings += 1;
        merge_identity(entry, text(row, "email"), text(row, "name"));
        merge_first_seen(entry, timestamp(row));
    }

    let mut users: Vec<AdminUserView> = summaries
        .into_iter()
        .map(|(id, summary)| AdminUserView {
            id,
            email: summary.email.unwrap_or_else(|| "N/A".to_string()),
            name: summary.name.unwrap_or_else(|| "Anonymous".to_string()),
            created_at: summary.first_seen,
            reports_count: summary.reports,
            bookings_count: summary.bookings,
        })
        .collect();

    // Newest first; rows without a parseable timestamp sink to the end.
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    users
}

/// The first snapshot seen wins; later rows never overwrite it.
fn merge_identity(entry: &mut ActivitySummary, email: Option<String>, name: Option<String>) {
    if entry.email.is_none() {
        entry.email = email;
    }
    if entry.name.is_none() {
        entry.name = name;
    }
}

fn merge_first_seen(entry: &mut ActivitySummary, seen: Option<DateTime<Utc>>) {
    match (entry.first_seen, seen) {
        (None, Some(ts)) => entry.first_seen = Some(ts),
        (Some(current), Some(ts)) if ts < current => entry.first_seen = Some(ts),
        _ => {}
    }
}

fn text(row: &Value, key: &str) -> Option<String> {
    row[key]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn timestamp(row: &Value) -> Option<DateTime<Utc>> {
    row["created_at"]
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn directory_counts_activity_per_user() {
        let reports = vec![
            json!({ "user_id": "u1", "user_email": "one@example.com", "created_at": "2024-02-01T00:00:00Z" }),
            json!({ "user_id": "u1", "user_email": "one@example.com", "created_at": "2024-02-02T00:00:00Z" }),
            json!({ "user_id": "u2", "user_email": "two@example.com", "created_at": "2024-03-01T00:00:00Z" }),
        ];
        let bookings = vec![
            json!({ "user_id": "u1", "name": "User One", "email": "one@example.com", "created_at": "2024-02-03T00:00:00Z" }),
        ];

        let users = build_directory(&reports, &bookings);

        assert_eq!(users.len(), 2);

        let u1 = users.iter().find(|u| u.id == "u1").unwrap();
        assert_eq!(u1.reports_count, 2);
        assert_eq!(u1.bookings_count, 1);
        assert_eq!(u1.email, "one@example.com");
        assert_eq!(u1.name, "User One");

        let u2 = users.iter().find(|u| u.id == "u2").unwrap();
        assert_eq!(u2.reports_count, 1);
        assert_eq!(u2.bookings_count, 0);
        assert_eq!(u2.name, "Anonymous");
    }

    #[test]
    fn directory_skips_anonymous_activity() {
        let reports = vec![
            json!({ "user_id": null, "created_at": "2024-01-01T00:00:00Z" }),
            json!({ "created_at": "2024-01-01T00:00:00Z" }),
        ];
        let bookings = vec![json!({ "user_id": null, "name": "Walk In" })];

        assert!(build_directory(&reports, &bookings).is_empty());
    }

    #[test]
    fn first_seen_is_the_earliest_activity() {
        let reports = vec![
            json!({ "user_id": "u1", "created_at": "2024-05-10T00:00:00Z" }),
            json!({ "user_id": "u1", "created_at": "2024-01-02T00:00:00Z" }),
        ];
        let bookings = vec![
            json!({ "user_id": "u1", "created_at": "2024-03-01T00:00:00Z" }),
        ];

        let users = build_directory(&reports, &bookings);
        let first_seen = users[0].created_at.unwrap();
        assert_eq!(first_seen.to_rfc3339(), "2024-01-02T00:00:00+00:00");
    }

    #[test]
    fn directory_sorts_newest_users_first() {
        let reports = vec![
            json!({ "user_id": "old", "created_at": "2023-01-01T00:00:00Z" }),
            json!({ "user_id": "new", "created_at": "2024-06-01T00:00:00Z" }),
            json!({ "user_id": "undated" }),
        ];

        let users = build_directory(&reports, &[]);
        let order: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(order, vec!["new", "old", "undated"]);
    }

    #[test]
    fn blank_snapshots_do_not_claim_identity() {
        let reports = vec![
            json!({ "user_id": "u1", "user_email": "  ", "created_at": "2024-01-01T00:00:00Z" }),
        ];
        let bookings = vec![
            json!({ "user_id": "u1", "email": "real@example.com", "name": "", "created_at": "2024-01-02T00:00:00Z" }),
        ];

        let users = build_directory(&reports, &bookings);
        assert_eq!(users[0].email, "real@example.com");
        assert_eq!(users[0].name, "Anonymous");
    }
}
