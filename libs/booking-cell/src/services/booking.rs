use chrono::{DateTime, NaiveDateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::User;

use crate::models::{
    BookingError, BookingRequest, BookingStatus, DoctorBooking, NewDoctorBooking, PaymentStatus,
};

/// Consultation fee charged for every booking, regardless of what the
/// client submits.
pub const BOOKING_AMOUNT: i64 = 199;

const BOOKING_ID_SUFFIX_LEN: usize = 9;

pub struct BookingService {
    supabase: SupabaseClient,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Create a booking. Identity is optional; anonymous bookings carry no
    /// user id. Status, payment status, and amount are forced server-side.
    pub async fn create_booking(
        &self,
        request: BookingRequest,
        user: Option<&User>,
    ) -> Result<DoctorBooking, BookingError> {
        let name = required(&request.name)?;
        let phone = required(&request.phone)?;
        let email = required(&request.email)?;
        let concern = required(&request.concern)?;
        let preferred_raw = required(&request.preferred_time)?;

        let preferred_time = parse_preferred_time(preferred_raw)?;
        if preferred_time <= Utc::now() {
            return Err(BookingError::PastPreferredTime);
        }

        let booking = NewDoctorBooking {
            booking_id: generate_booking_id(),
            user_id: user.map(|u| u.id.clone()),
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            concern: concern.to_string(),
            preferred_time,
            booking_time: Utc::now(),
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            amount: BOOKING_AMOUNT,
            whatsapp_number: phone.to_string(),
        };

        let row = self
            .supabase
            .insert_row("doctor_bookings", json!(booking))
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        let stored: DoctorBooking = serde_json::from_value(row)
            .map_err(|e| BookingError::DatabaseError(format!("Malformed booking row: {}", e)))?;

        info!(
            booking_id = %stored.booking_id,
            anonymous = stored.user_id.is_none(),
            "Booking created"
        );

        Ok(stored)
    }

    /// All bookings owned by one user, newest first.
    pub async fn bookings_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<DoctorBooking>, BookingError> {
        let path = format!(
            "/rest/v1/doctor_bookings?user_id=eq.{}&order=created_at.desc",
            user_id
        );

        let rows: Vec<Value> = self
            .supabase
            .select(&path)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        debug!("Fetched {} booking rows for {}", rows.len(), user_id);

        let bookings = rows
            .into_iter()
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect();

        Ok(bookings)
    }
}

fn required(field: &Option<String>) -> Result<&str, BookingError> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(BookingError::MissingFields)
}

/// Booking forms submit `datetime-local` values without an offset; API
/// callers send RFC 3339. Accept both, treating offset-less values as UTC.
fn parse_preferred_time(raw: &str) -> Result<DateTime<Utc>, BookingError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(BookingError::InvalidPreferredTime)
}

/// `DOC-<unix millis>-<9 uppercase alphanumerics>`. Display-grade
/// uniqueness; the store does not enforce a uniqueness constraint.
fn generate_booking_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BOOKING_ID_SUFFIX_LEN)
        .map(char::from)
        .collect::<String>()
        .to_uppercase();

    format!("DOC-{}-{}", Utc::now().timestamp_millis(), suffix)
}
